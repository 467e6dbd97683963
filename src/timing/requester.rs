// Frame requests - the host side of the tick loop
//
// The scheduler asks the host for "one more display refresh" and receives a
// handle. The host later delivers that handle back with the refresh
// timestamp. Cancelled or superseded handles are recognised by the scheduler
// and ignored, so hosts that cannot retract a request (winit's
// `request_redraw`) are still correct.

/// Identifies one requested display refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Host scheduling interface
pub trait FrameRequester {
    /// Request one display refresh callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request (best effort)
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Requester that only records requests; the caller delivers ticks by hand
///
/// Used for headless runs, tests and benchmarks.
#[derive(Debug, Default)]
pub struct ManualRequester {
    next_id: u64,
    pending: Option<FrameHandle>,
    requests: u64,
}

impl ManualRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the outstanding request for delivery
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total number of requests made
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameRequester for ManualRequester {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requests += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let mut requester = ManualRequester::new();
        let a = requester.request_frame();
        let b = requester.request_frame();
        assert_ne!(a, b);
        assert_eq!(requester.pending(), Some(b));
        assert_eq!(requester.requests(), 2);
    }

    #[test]
    fn test_cancel_only_matching_handle() {
        let mut requester = ManualRequester::new();
        let a = requester.request_frame();
        let b = requester.request_frame();

        requester.cancel_frame(a);
        assert_eq!(requester.pending(), Some(b));

        requester.cancel_frame(b);
        assert_eq!(requester.pending(), None);
    }

    #[test]
    fn test_take_pending() {
        let mut requester = ManualRequester::new();
        let a = requester.request_frame();
        assert_eq!(requester.take_pending(), Some(a));
        assert_eq!(requester.take_pending(), None);
    }
}
