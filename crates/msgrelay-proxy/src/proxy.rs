use std::os::fd::AsRawFd;
use std::time::Duration;

use msgrelay_transport::{Endpoint, Poller, Result};
use tracing::{debug, trace};

/// Forward exactly one complete message from `src` to `dst`.
///
/// This is the drain sub-loop: each frame is received together with its
/// continuation flag and immediately re-sent to the peer with the same
/// flag, until the frame without continuation has been forwarded. Any
/// receive or send failure aborts the message mid-flight; no partial
/// recovery is attempted.
pub fn forward_message<S, D>(src: &mut S, dst: &mut D) -> Result<()>
where
    S: Endpoint,
    D: Endpoint,
{
    let mut frames = 0usize;
    loop {
        let frame = src.recv()?;
        let more = src.has_more()?;
        dst.send(&frame, more)?;
        frames += 1;

        if !more {
            trace!(frames, "forwarded message");
            return Ok(());
        }
    }
}

/// A poll-driven relay between two fixed endpoints.
///
/// The two endpoints are symmetric peers: traffic arriving on either side
/// is forwarded to the other. Each poll pass forwards at most one complete
/// message per ready endpoint, so neither direction can monopolize the loop
/// beyond the length of a single message, and no message is ever split
/// across poll passes.
pub struct Proxy<F, B> {
    frontend: F,
    backend: B,
    poller: Poller,
}

const FRONTEND: usize = 0;
const BACKEND: usize = 1;

impl<F, B> Proxy<F, B>
where
    F: Endpoint + AsRawFd,
    B: Endpoint + AsRawFd,
{
    /// Create a proxy over two connected endpoints. Both are registered
    /// for readability; registrations are fixed for the proxy's lifetime.
    pub fn new(frontend: F, backend: B) -> Self {
        let mut poller = Poller::new();
        poller.register(&frontend);
        poller.register(&backend);
        Self {
            frontend,
            backend,
            poller,
        }
    }

    /// Run one poll pass: wait up to `timeout` for readiness, then forward
    /// one complete message from each ready endpoint to its peer.
    ///
    /// Returns the number of messages forwarded. An interrupted wait
    /// forwards nothing and returns `Ok(0)`; any other failure is fatal.
    pub fn run_once(&mut self, timeout: Option<Duration>) -> Result<usize> {
        let ready = match self.poller.wait(timeout) {
            Ok(ready) => ready,
            Err(err) if err.is_interrupted() => {
                debug!("poll wait interrupted; retrying");
                return Ok(0);
            }
            Err(err) => return Err(err),
        };

        let mut forwarded = 0usize;
        for token in ready {
            match token {
                FRONTEND => {
                    forward_message(&mut self.frontend, &mut self.backend)?;
                    trace!(direction = "frontend to backend", "relayed message");
                }
                BACKEND => {
                    forward_message(&mut self.backend, &mut self.frontend)?;
                    trace!(direction = "backend to frontend", "relayed message");
                }
                _ => unreachable!("proxy registers exactly two endpoints"),
            }
            forwarded += 1;
        }

        Ok(forwarded)
    }

    /// Relay messages between the two endpoints until a fatal error.
    ///
    /// There is no built-in stop signal: the loop ends when a peer closes
    /// (surfacing as a receive failure) or an I/O error bubbles out of a
    /// drain sub-loop. Interrupted waits are retried.
    pub fn run(&mut self) -> Result<()> {
        debug!("proxy loop started");
        loop {
            self.run_once(None)?;
        }
    }

    /// Consume the proxy and return the endpoints.
    pub fn into_inner(self) -> (F, B) {
        (self.frontend, self.backend)
    }
}
