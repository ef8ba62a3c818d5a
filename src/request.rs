/// Lifecycle state of one user-triggered request, owned by its action slot.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

/// One action slot: the request state plus the monotonically increasing token
/// that identifies the most recently issued request.
///
/// Settlements arriving with an older token belong to a superseded request
/// and are dropped, which is the only "cancellation" the client has. Slots
/// are never shared between actions, so one action settling can never clobber
/// another.
#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    state: RequestState<T>,
    token: u64,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            token: 0,
        }
    }

    /// Starts a new request: clears any previous result or error and returns
    /// the token the settlement must echo.
    pub fn begin(&mut self) -> u64 {
        self.token += 1;
        self.state = RequestState::Loading;
        self.token
    }

    /// Applies a settlement if it belongs to the current request.
    /// Returns whether it was applied.
    pub fn settle(&mut self, token: u64, outcome: Result<T, String>) -> bool {
        if token != self.token {
            return false;
        }
        self.state = match outcome {
            Ok(payload) => RequestState::Success(payload),
            Err(message) => RequestState::Error(message),
        };
        true
    }

    /// Records a failure without a request round-trip (input validation).
    pub fn fail(&mut self, message: impl Into<String>) {
        self.token += 1;
        self.state = RequestState::Error(message.into());
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match &self.state {
            RequestState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_clears_previous_outcome() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let t1 = slot.begin();
        assert!(slot.settle(t1, Ok(7)));
        assert_eq!(slot.success(), Some(&7));

        slot.begin();
        assert!(slot.is_loading());
        assert!(slot.success().is_none());
    }

    #[test]
    fn stale_settlement_is_dropped() {
        let mut slot: RequestSlot<&str> = RequestSlot::new();
        let t1 = slot.begin();
        let t2 = slot.begin();

        // t1 completes after t2 was issued; it must not apply.
        assert!(!slot.settle(t1, Ok("old")));
        assert!(slot.is_loading());

        assert!(slot.settle(t2, Ok("new")));
        assert_eq!(slot.success(), Some(&"new"));
    }

    #[test]
    fn stale_settlement_after_current_one_is_also_dropped() {
        let mut slot: RequestSlot<&str> = RequestSlot::new();
        let t1 = slot.begin();
        let t2 = slot.begin();

        assert!(slot.settle(t2, Ok("new")));
        assert!(!slot.settle(t1, Err("late failure".to_string())));
        assert_eq!(slot.success(), Some(&"new"));
    }

    #[test]
    fn error_settlement_surfaces_the_message() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let t = slot.begin();
        assert!(slot.settle(t, Err("http 500: boom".to_string())));
        assert_eq!(slot.error(), Some("http 500: boom"));
    }

    #[test]
    fn fail_supersedes_an_in_flight_request() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let t = slot.begin();
        slot.fail("Pick both teams first.");
        assert_eq!(slot.error(), Some("Pick both teams first."));
        // The old request settles late and is ignored.
        assert!(!slot.settle(t, Ok(1)));
        assert_eq!(slot.error(), Some("Pick both teams first."));
    }
}
