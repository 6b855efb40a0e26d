//! Frame-oriented endpoint transport with continuation flags.
//!
//! This is the lowest layer of msgrelay. It provides:
//! - The [`Endpoint`] trait: send/receive one frame at a time, with a
//!   per-frame continuation flag linking frames into logical messages
//! - [`UnixEndpoint`] and [`EndpointListener`]: the concrete transport over
//!   Unix domain sockets
//! - [`Poller`]: a readiness multiplexer over registered endpoints
//!
//! Everything else builds on the frame/continuation contract defined here.

pub mod endpoint;
pub mod error;
pub mod wire;

#[cfg(unix)]
pub mod poller;
#[cfg(unix)]
pub mod uds;

pub use endpoint::{Endpoint, EndpointConfig};
pub use error::{Result, TransportError};
pub use wire::{DEFAULT_MAX_FRAME, FLAG_MORE, HEADER_SIZE, MAGIC};

#[cfg(unix)]
pub use poller::Poller;
#[cfg(unix)]
pub use uds::{EndpointListener, UnixEndpoint};
