use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use tracing::trace;

use crate::error::{Result, TransportError};

/// Readiness multiplexer over a set of registered endpoints.
///
/// Registrations are static: endpoints are registered once before the wait
/// loop starts and keep their token for the poller's lifetime. Interest is
/// always readability. `wait` reports ready tokens in registration order,
/// which keeps per-call ordering deterministic.
#[derive(Debug, Default)]
pub struct Poller {
    fds: Vec<RawFd>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint for readability. Returns its token.
    pub fn register(&mut self, source: &impl AsRawFd) -> usize {
        self.fds.push(source.as_raw_fd());
        self.fds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }

    /// Block until at least one registered endpoint has data available for
    /// reading, or `timeout` elapses. `None` blocks indefinitely.
    ///
    /// Returns the tokens of ready endpoints in registration order. A wait
    /// cut short by a signal fails with [`TransportError::Interrupted`],
    /// which callers may treat as retryable; hangup and error conditions
    /// count as readable so the failure surfaces through the next `recv`.
    pub fn wait(&self, timeout: Option<Duration>) -> Result<Vec<usize>> {
        let mut pollfds: Vec<libc::pollfd> = self
            .fds
            .iter()
            .map(|&fd| libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        let timeout_ms = match timeout {
            None => -1,
            Some(d) => d.as_millis().min(i32::MAX as u128) as i32,
        };

        // SAFETY: `pollfds` is a valid mutable slice of `pollfd` structs for
        // the given length, and the descriptors were copied from live
        // registrations owned by the caller.
        let rc = unsafe {
            libc::poll(
                pollfds.as_mut_ptr(),
                pollfds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Err(TransportError::Interrupted);
            }
            return Err(TransportError::Io(err));
        }

        let readable = libc::POLLIN | libc::POLLHUP | libc::POLLERR;
        let ready: Vec<usize> = pollfds
            .iter()
            .enumerate()
            .filter(|(_, p)| p.revents & readable != 0)
            .map(|(token, _)| token)
            .collect();

        trace!(ready = ready.len(), "poll returned");
        Ok(ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::uds::UnixEndpoint;

    #[test]
    fn wait_times_out_with_no_data() {
        let (left, _right) = UnixEndpoint::pair().unwrap();

        let mut poller = Poller::new();
        poller.register(&left);

        let ready = poller.wait(Some(Duration::from_millis(10))).unwrap();
        assert!(ready.is_empty());
    }

    #[test]
    fn wait_reports_readable_endpoint() {
        let (mut left, right) = UnixEndpoint::pair().unwrap();

        let mut poller = Poller::new();
        let token = poller.register(&right);

        left.send(b"data", false).unwrap();

        let ready = poller.wait(Some(Duration::from_millis(100))).unwrap();
        assert_eq!(ready, vec![token]);
    }

    #[test]
    fn ready_tokens_follow_registration_order() {
        let (mut a_peer, a) = UnixEndpoint::pair().unwrap();
        let (mut b_peer, b) = UnixEndpoint::pair().unwrap();

        let mut poller = Poller::new();
        let token_a = poller.register(&a);
        let token_b = poller.register(&b);
        assert_eq!((token_a, token_b), (0, 1));

        b_peer.send(b"b", false).unwrap();
        a_peer.send(b"a", false).unwrap();

        let ready = poller.wait(Some(Duration::from_millis(100))).unwrap();
        assert_eq!(ready, vec![token_a, token_b]);
    }

    #[test]
    fn peer_hangup_counts_as_readable() {
        let (left, right) = UnixEndpoint::pair().unwrap();

        let mut poller = Poller::new();
        let token = poller.register(&right);

        drop(left);

        let ready = poller.wait(Some(Duration::from_millis(100))).unwrap();
        assert_eq!(ready, vec![token]);
    }

    #[test]
    fn empty_poller_times_out() {
        let poller = Poller::new();
        assert!(poller.is_empty());

        let ready = poller.wait(Some(Duration::from_millis(1))).unwrap();
        assert!(ready.is_empty());
    }
}
