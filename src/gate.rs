//! Access gating for authenticated-only views
//!
//! Pure decision over the current session status; the gated content is
//! always rendered, with a blocking prompt layered on top for anonymous
//! visitors so they can see what signing in unlocks.

use crate::session::SessionStatus;

/// What a gated view should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the content only
    Passthrough,
    /// Render the content plus a blocking login prompt
    PassthroughWithPrompt,
    /// Session check still in flight; render a neutral loading indicator
    Loading,
}

/// Decide how to render protected content for the given session status
pub fn access_decision(status: SessionStatus) -> GateDecision {
    match status {
        SessionStatus::Authenticated => GateDecision::Passthrough,
        SessionStatus::Anonymous => GateDecision::PassthroughWithPrompt,
        SessionStatus::Checking => GateDecision::Loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_truth_table() {
        assert_eq!(
            access_decision(SessionStatus::Authenticated),
            GateDecision::Passthrough
        );
        assert_eq!(
            access_decision(SessionStatus::Anonymous),
            GateDecision::PassthroughWithPrompt
        );
        assert_eq!(
            access_decision(SessionStatus::Checking),
            GateDecision::Loading
        );
    }
}
