//! State machine trait for status enums.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their legal transitions; validated transitions and the
/// terminal check come for free.
///
/// ```ignore
/// let next = ConversationStatus::Collecting.transition_to(ConversationStatus::Escalated)?;
/// assert!(next.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Green,
        Amber,
        Off,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Green => vec![Light::Amber, Light::Off],
                Light::Amber => vec![Light::Off],
                Light::Off => vec![],
            }
        }
    }

    #[test]
    fn transition_to_returns_target_when_allowed() {
        assert_eq!(Light::Green.transition_to(Light::Amber).unwrap(), Light::Amber);
    }

    #[test]
    fn transition_to_rejects_illegal_move() {
        let err = Light::Off.transition_to(Light::Green).unwrap_err();
        assert!(err.to_string().contains("Cannot transition from Off to Green"));
    }

    #[test]
    fn terminal_means_no_outgoing_transitions() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Amber.is_terminal());
    }
}
