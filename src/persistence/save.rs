//! Single-flight save coalescing
//!
//! At most one save is in flight. Requests that arrive meanwhile collapse
//! into one trailing save, dispatched when the in-flight one completes and
//! built from whatever the world looks like at that moment.

/// Where the save pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    InFlight,
    /// In flight, and at least one more request arrived since dispatch
    InFlightWithPendingRetry,
}

/// Save request state machine
#[derive(Debug, Clone, Default)]
pub struct SaveQueue {
    state: SaveState,
}

impl SaveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// A save was asked for. Returns true if the caller must dispatch one now.
    pub fn request(&mut self) -> bool {
        match self.state {
            SaveState::Idle => {
                self.state = SaveState::InFlight;
                true
            }
            SaveState::InFlight | SaveState::InFlightWithPendingRetry => {
                log::debug!("Save already in flight, coalescing request");
                self.state = SaveState::InFlightWithPendingRetry;
                false
            }
        }
    }

    /// The in-flight save finished (either way). Returns true if the caller
    /// must dispatch the trailing save now.
    pub fn complete(&mut self) -> bool {
        match self.state {
            SaveState::Idle => {
                log::warn!("Save completion with no save in flight");
                false
            }
            SaveState::InFlight => {
                self.state = SaveState::Idle;
                false
            }
            SaveState::InFlightWithPendingRetry => {
                self.state = SaveState::InFlight;
                true
            }
        }
    }

    /// A dispatch was abandoned before reaching the network
    pub fn abandon(&mut self) {
        self.state = SaveState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_request_dispatches() {
        let mut queue = SaveQueue::new();
        assert!(queue.request());
        assert_eq!(queue.state(), SaveState::InFlight);
        assert!(!queue.complete());
        assert_eq!(queue.state(), SaveState::Idle);
    }

    #[test]
    fn test_burst_collapses_to_one_trailing_save() {
        let mut queue = SaveQueue::new();
        assert!(queue.request());
        assert!(!queue.request());
        assert!(!queue.request());
        assert_eq!(queue.state(), SaveState::InFlightWithPendingRetry);

        // First save lands: exactly one trailing save goes out
        assert!(queue.complete());
        assert_eq!(queue.state(), SaveState::InFlight);
        assert!(!queue.complete());
        assert_eq!(queue.state(), SaveState::Idle);
    }

    #[test]
    fn test_stray_completion_ignored() {
        let mut queue = SaveQueue::new();
        assert!(!queue.complete());
        assert_eq!(queue.state(), SaveState::Idle);
    }
}
