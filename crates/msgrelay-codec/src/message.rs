use bytes::Bytes;
use msgrelay_transport::{Endpoint, Result};
use tracing::trace;

use crate::part::{flatten, Part};

/// Multipart send/receive on top of any [`Endpoint`].
///
/// A message is an ordered group of frames delimited by the continuation
/// flag: every frame except the last is sent with the flag set.
pub trait MessageExt: Endpoint {
    /// Send all parts as one multipart message.
    ///
    /// Parts are flattened first (sequence parts expand in place), so a
    /// trailing empty sequence still contributes zero frames. Sending zero
    /// flattened units is a valid no-op returning `Ok(0)`.
    ///
    /// Returns total payload bytes sent. A failed send aborts the message
    /// immediately; no partial byte count is reported.
    fn send_message<I>(&mut self, parts: I) -> Result<usize>
    where
        I: IntoIterator<Item = Part>,
        Self: Sized,
    {
        let units = flatten(parts);
        if units.is_empty() {
            return Ok(0);
        }

        let last = units.len() - 1;
        let mut total = 0usize;
        for (i, unit) in units.iter().enumerate() {
            total += self.send(unit, i < last)?;
        }

        trace!(frames = units.len(), bytes = total, "sent message");
        Ok(total)
    }

    /// Receive one complete message as raw frames.
    ///
    /// Accumulates frames until one arrives without the continuation flag.
    /// On any failure the accumulated frames are discarded and only the
    /// error is returned; frames already consumed from the endpoint are
    /// lost, since the frame stream has no resynchronization marker.
    fn recv_message_bytes(&mut self) -> Result<Vec<Bytes>> {
        let mut frames = Vec::new();
        loop {
            let frame = self.recv()?;
            frames.push(frame);
            if !self.has_more()? {
                break;
            }
        }

        trace!(frames = frames.len(), "received message");
        Ok(frames)
    }

    /// Receive one complete message, decoding each frame as text.
    ///
    /// Invalid UTF-8 sequences are replaced, not rejected; use
    /// [`MessageExt::recv_message_bytes`] when payloads must be preserved
    /// byte-for-byte.
    fn recv_message(&mut self) -> Result<Vec<String>> {
        let frames = self.recv_message_bytes()?;
        Ok(frames
            .into_iter()
            .map(|frame| String::from_utf8_lossy(&frame).into_owned())
            .collect())
    }
}

impl<E: Endpoint> MessageExt for E {}
