use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, trace};

use crate::endpoint::{Endpoint, EndpointConfig};
use crate::error::{Result, TransportError};
use crate::wire::{self, HEADER_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// A connected frame endpoint over a Unix domain socket stream.
///
/// Reads are exact (header, then payload) with no read-ahead buffering, so
/// poll readiness on the underlying descriptor stays truthful: bytes the
/// kernel reports readable have not already been consumed into user space.
pub struct UnixEndpoint {
    stream: UnixStream,
    send_buf: BytesMut,
    rcv_more: bool,
    config: EndpointConfig,
}

impl UnixEndpoint {
    pub(crate) fn from_stream(stream: UnixStream) -> Self {
        Self::with_config(stream, EndpointConfig::default())
    }

    pub(crate) fn with_config(stream: UnixStream, config: EndpointConfig) -> Self {
        Self {
            stream,
            send_buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            rcv_more: false,
            config,
        }
    }

    /// Connect to a listening endpoint (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with_config(path, EndpointConfig::default())
    }

    /// Connect with explicit configuration. Read/write timeouts from the
    /// config are applied to the stream.
    pub fn connect_with_config(path: impl AsRef<Path>, config: EndpointConfig) -> Result<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|e| TransportError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        debug!(?path, "connected to endpoint");
        Ok(Self::with_config(stream, config))
    }

    /// Create a connected pair of endpoints over an anonymous socket pair.
    pub fn pair() -> Result<(Self, Self)> {
        let (left, right) = UnixStream::pair()?;
        Ok((Self::from_stream(left), Self::from_stream(right)))
    }

    /// Update maximum frame size for subsequent sends and receives.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current endpoint configuration.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

/// Read exactly `buf.len()` bytes. Interrupted reads are retried; any other
/// error, including `WouldBlock` from a configured read timeout, propagates.
fn read_full(stream: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match stream.read(&mut buf[offset..]) {
            Ok(0) => return Err(TransportError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
    Ok(())
}

/// Write all of `buf` and flush. Interrupted writes are retried; any other
/// error, including `WouldBlock` from a configured write timeout, propagates.
fn write_full(stream: &mut impl Write, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match stream.write(&buf[offset..]) {
            Ok(0) => return Err(TransportError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match stream.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

impl Endpoint for UnixEndpoint {
    fn send(&mut self, frame: &[u8], more: bool) -> Result<usize> {
        if frame.len() > self.config.max_frame_size {
            return Err(TransportError::FrameTooLarge {
                size: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        self.send_buf.clear();
        wire::encode_frame(frame, more, &mut self.send_buf)?;
        write_full(&mut self.stream, &self.send_buf)?;

        trace!(len = frame.len(), more, "sent frame");
        Ok(frame.len())
    }

    fn recv(&mut self) -> Result<Bytes> {
        let mut header = [0u8; HEADER_SIZE];
        read_full(&mut self.stream, &mut header)?;
        let (payload_len, more) = wire::decode_header(&header, self.config.max_frame_size)?;

        let mut payload = vec![0u8; payload_len];
        read_full(&mut self.stream, &mut payload)?;
        self.rcv_more = more;

        trace!(len = payload_len, more, "received frame");
        Ok(Bytes::from(payload))
    }

    fn has_more(&self) -> Result<bool> {
        Ok(self.rcv_more)
    }
}

impl AsRawFd for UnixEndpoint {
    fn as_raw_fd(&self) -> RawFd {
        self.stream.as_raw_fd()
    }
}

impl std::fmt::Debug for UnixEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixEndpoint")
            .field("fd", &self.stream.as_raw_fd())
            .field("rcv_more", &self.rcv_more)
            .finish()
    }
}

/// Listening side of a Unix domain socket endpoint.
///
/// Binds a filesystem-path socket and accepts connected [`UnixEndpoint`]s.
/// The socket file is removed on drop if its identity is unchanged.
pub struct EndpointListener {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
    config: EndpointConfig,
}

impl EndpointListener {
    /// Default permission mode for created socket paths.
    pub const DEFAULT_SOCKET_MODE: u32 = 0o600;
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind and listen on a filesystem-path Unix domain socket.
    ///
    /// If the path already exists and is a socket, it is removed first
    /// (stale socket cleanup). Existing non-socket files are never removed.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_config(path, EndpointConfig::default())
    }

    /// Bind with explicit endpoint configuration for accepted connections.
    pub fn bind_with_config(path: impl AsRef<Path>, config: EndpointConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale socket");
                std::fs::remove_file(&path).map_err(|e| TransportError::Bind {
                    path: path.clone(),
                    source: e,
                })?;
            } else {
                return Err(TransportError::Bind {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "existing path is not a unix socket",
                    ),
                });
            }
        }

        let listener = UnixListener::bind(&path).map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;

        std::fs::set_permissions(
            &path,
            std::fs::Permissions::from_mode(Self::DEFAULT_SOCKET_MODE),
        )
        .map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;
        let created_metadata =
            std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
        let created_inode = Some((created_metadata.dev(), created_metadata.ino()));

        info!(?path, "listening for endpoint connections");

        Ok(Self {
            listener,
            path,
            created_inode,
            config,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<UnixEndpoint> {
        let (stream, _addr) = self.listener.accept().map_err(TransportError::Accept)?;
        stream.set_read_timeout(self.config.read_timeout)?;
        stream.set_write_timeout(self.config.write_timeout)?;
        debug!("accepted endpoint connection");
        Ok(UnixEndpoint::with_config(stream, self.config.clone()))
    }

    /// The path this listener is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EndpointListener {
    fn drop(&mut self) {
        if let Some((expected_dev, expected_ino)) = self.created_inode {
            if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
                if metadata.file_type().is_socket()
                    && metadata.dev() == expected_dev
                    && metadata.ino() == expected_ino
                {
                    debug!(path = ?self.path, "cleaning up socket file");
                    let _ = std::fs::remove_file(&self.path);
                } else {
                    debug!(
                        path = ?self.path,
                        "socket path identity changed; skipping cleanup"
                    );
                }
            }
        }
    }
}
