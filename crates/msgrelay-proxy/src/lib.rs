//! Poll-driven multipart message relay between two frame endpoints.
//!
//! The proxy waits for readiness, then drains and forwards one complete
//! logical message per ready endpoint per pass. This preserves the two core
//! guarantees simultaneously: multipart atomicity (frames of one message
//! are forwarded contiguously, never interleaved) and fairness (one message
//! per endpoint per pass bounds how long one direction can hold the loop).
//!
//! The loop is single-threaded and cooperative. A blocking send to a slow
//! peer stalls the whole loop, including the unrelated direction; this is
//! an accepted limitation of synchronous frame relay, not speculative
//! buffering territory.

pub mod proxy;

pub use proxy::{forward_message, Proxy};
