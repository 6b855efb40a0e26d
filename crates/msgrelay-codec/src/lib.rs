//! Multipart message assembly over continuation-flagged frame endpoints.
//!
//! The send path flattens heterogeneous [`Part`]s into an ordered sequence
//! of wire frames; the receive path accumulates frames back into an ordered
//! sequence of values. Both sides rely on the same primitive: the per-frame
//! continuation flag carried by the [`Endpoint`](msgrelay_transport::Endpoint)
//! contract.

pub mod message;
pub mod part;

pub use message::MessageExt;
pub use part::{flatten, Part};
