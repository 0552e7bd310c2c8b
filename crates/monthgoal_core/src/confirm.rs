//! Two-phase confirmation requests.
//!
//! Destructive actions (goal deletion, replace-import) are first recorded as
//! pending and only handed back for execution once confirmed.

/// Pending-confirmation state for one action slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<A> {
    Idle,
    Pending(A),
}

impl<A> Default for Confirmation<A> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<A> Confirmation<A> {
    /// Records `action` as awaiting confirmation, replacing any earlier request.
    pub fn request(&mut self, action: A) {
        *self = Self::Pending(action);
    }

    /// Resolves the request; returns the action to execute.
    pub fn confirm(&mut self) -> Option<A> {
        match std::mem::replace(self, Self::Idle) {
            Self::Pending(action) => Some(action),
            Self::Idle => None,
        }
    }

    /// Drops the pending request without executing it.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn pending(&self) -> Option<&A> {
        match self {
            Self::Pending(action) => Some(action),
            Self::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

#[cfg(test)]
mod tests {
    use super::Confirmation;

    #[test]
    fn confirm_returns_pending_action_once() {
        let mut slot = Confirmation::default();
        slot.request("delete");
        assert!(slot.is_pending());
        assert_eq!(slot.confirm(), Some("delete"));
        assert_eq!(slot.confirm(), None);
        assert!(!slot.is_pending());
    }

    #[test]
    fn cancel_discards_request() {
        let mut slot = Confirmation::default();
        slot.request(7);
        slot.cancel();
        assert_eq!(slot.pending(), None);
        assert_eq!(slot.confirm(), None);
    }
}
