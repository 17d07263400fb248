//! The authoritative discrete morph state.
//!
//! [`MorphController`] is the only writer.  Gesture-derived requests and the
//! explicit UI toggle both enter through [`MorphController::request_transition`]
//! and [`MorphController::toggle`]; animators receive the state by value each
//! tick and never hold a reference to the controller.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// MorphState
// ════════════════════════════════════════════════════════════════════════════

/// Which of the two arrangements the field is heading toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphState {
    /// Entities drift inside the scatter ball.
    #[default]
    Scattered,
    /// Entities sit on the cone.
    Assembled,
}

impl MorphState {
    /// Blend factor the animators approach for this state.
    pub fn target_factor(self) -> f32 {
        match self {
            MorphState::Scattered => 0.0,
            MorphState::Assembled => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            MorphState::Scattered => MorphState::Assembled,
            MorphState::Assembled => MorphState::Scattered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MorphState::Scattered => "scattered",
            MorphState::Assembled => "assembled",
        }
    }
}

impl std::fmt::Display for MorphState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MorphController
// ════════════════════════════════════════════════════════════════════════════

/// Single writer of [`MorphState`].
///
/// `revision` counts accepted changes and only ever increases; observers can
/// compare it against a remembered value to detect a new request.
#[derive(Clone, Debug, Default)]
pub struct MorphController {
    state:    MorphState,
    revision: u64,
}

impl MorphController {
    pub fn new(initial: MorphState) -> Self {
        MorphController { state: initial, revision: 0 }
    }

    pub fn current(&self) -> MorphState {
        self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move to `target`.  Returns false (and changes nothing) when `target`
    /// is already the current state.
    pub fn request_transition(&mut self, target: MorphState) -> bool {
        if target == self.state {
            return false;
        }
        self.state = target;
        self.revision += 1;
        log::debug!("morph state -> {} (revision {})", target, self.revision);
        true
    }

    /// Flip to the other state and return it.
    pub fn toggle(&mut self) -> MorphState {
        let next = self.state.flipped();
        self.request_transition(next);
        next
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_scattered() {
        let c = MorphController::default();
        assert_eq!(c.current(), MorphState::Scattered);
        assert_eq!(c.revision(), 0);
    }

    #[test]
    fn repeated_request_is_idempotent() {
        let mut c = MorphController::default();
        assert!(c.request_transition(MorphState::Assembled));
        assert!(!c.request_transition(MorphState::Assembled));
        assert_eq!(c.revision(), 1);
    }

    #[test]
    fn toggle_flips_and_counts() {
        let mut c = MorphController::new(MorphState::Assembled);
        assert_eq!(c.toggle(), MorphState::Scattered);
        assert_eq!(c.toggle(), MorphState::Assembled);
        assert_eq!(c.current(), MorphState::Assembled);
        assert_eq!(c.revision(), 2);
    }

    #[test]
    fn target_factor_matches_state() {
        assert_eq!(MorphState::Scattered.target_factor(), 0.0);
        assert_eq!(MorphState::Assembled.target_factor(), 1.0);
    }
}
