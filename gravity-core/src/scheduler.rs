//! Frame scheduling for the run loop.
//!
//! The host (a GUI event loop, a test, a headless driver) calls back once
//! per display refresh with the token it was handed. [`Ticker`] makes sure
//! only the most recently scheduled token is honoured, so a frame that was
//! queued before a restart or clear can never step stale state.

/// Handle for one scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

#[derive(Debug, Default)]
pub struct Ticker {
    next_id: u64,
    pending: Option<FrameToken>,
    collision_latched: bool,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next frame, superseding any frame still pending.
    pub fn schedule(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some(token);
        token
    }

    /// Drops the pending frame and forgets any latched collision.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.collision_latched = false;
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending frame if `token` is it.
    ///
    /// ### Returns
    /// `false` for a cancelled, superseded or already-claimed token.
    pub fn claim(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Remembers that the last step hit a wall; observed by the next frame.
    pub fn latch_collision(&mut self) {
        self.collision_latched = true;
    }

    /// Returns and clears the latched collision flag.
    pub fn take_collision(&mut self) -> bool {
        std::mem::take(&mut self.collision_latched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_accepts_only_the_pending_token_once() {
        let mut t = Ticker::new();
        let token = t.schedule();

        assert!(t.is_pending());
        assert!(t.claim(token));
        assert!(!t.claim(token));
        assert!(!t.is_pending());
    }

    #[test]
    fn rescheduling_supersedes_old_token() {
        let mut t = Ticker::new();
        let old = t.schedule();
        let new = t.schedule();

        assert_ne!(old, new);
        assert!(!t.claim(old));
        assert!(t.claim(new));
    }

    #[test]
    fn cancel_invalidates_pending_and_clears_latch() {
        let mut t = Ticker::new();
        let token = t.schedule();
        t.latch_collision();

        t.cancel();

        assert!(!t.claim(token));
        assert_eq!(t.pending(), None);
        assert!(!t.take_collision());
    }

    #[test]
    fn take_collision_resets_the_latch() {
        let mut t = Ticker::new();
        t.latch_collision();
        assert!(t.take_collision());
        assert!(!t.take_collision());
    }
}
