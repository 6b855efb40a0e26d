use bytes::Bytes;

use crate::error::Result;
use crate::wire;

/// A full-duplex, frame-oriented endpoint.
///
/// One `send`/`recv` call transfers exactly one frame. Frames belonging to
/// the same logical message are linked by the continuation flag: `send`
/// takes it explicitly, and `has_more` reports the flag of the most
/// recently received frame.
pub trait Endpoint {
    /// Send one frame, marking whether more frames of the same message
    /// follow. Returns the number of payload bytes sent.
    fn send(&mut self, frame: &[u8], more: bool) -> Result<usize>;

    /// Receive one frame (blocking).
    fn recv(&mut self) -> Result<Bytes>;

    /// Whether the last received frame is followed by more frames of the
    /// same message. Only meaningful immediately after a `recv`.
    fn has_more(&self) -> Result<bool>;
}

/// Configuration for a concrete endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Maximum frame payload size in bytes. Default: 16 MiB.
    pub max_frame_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            max_frame_size: wire::DEFAULT_MAX_FRAME,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
