//! Scene lifecycle states

use std::fmt;

/// Where a scene is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    /// Registered with the game, no hook called yet
    Constructed,
    /// `init` has run
    Initialized,
    /// `preload` has run; waiting for the loader to drain
    Preloading,
    /// `create` has run
    Created,
    /// Updated and rendered every tick
    Running,
    /// Rendered every tick, not updated
    Paused,
    /// Terminal; display objects released
    Destroyed,
}

impl SceneState {
    /// Whether moving from `self` to `to` is a legal lifecycle step
    pub fn can_transition_to(self, to: SceneState) -> bool {
        use SceneState::*;
        matches!(
            (self, to),
            (Constructed, Initialized)
                | (Initialized, Preloading)
                | (Preloading, Created)
                | (Created, Running)
                | (Created, Paused)
                | (Running, Paused)
                | (Paused, Running)
        ) || (self != Destroyed && to == Destroyed)
    }

    /// Whether the scene has been started and not yet destroyed
    pub fn is_active(self) -> bool {
        !matches!(self, SceneState::Constructed | SceneState::Destroyed)
    }

    /// Whether `create` has run, so the scene renders each tick
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            SceneState::Created | SceneState::Running | SceneState::Paused
        )
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::SceneState::*;

    #[test]
    fn test_forward_path_is_legal() {
        let path = [Constructed, Initialized, Preloading, Created, Running, Paused, Running, Destroyed];
        for step in path.windows(2) {
            assert!(step[0].can_transition_to(step[1]), "{:?} -> {:?}", step[0], step[1]);
        }
    }

    #[test]
    fn test_skipping_and_reversing_are_illegal() {
        assert!(!Constructed.can_transition_to(Created));
        assert!(!Created.can_transition_to(Preloading));
        assert!(!Running.can_transition_to(Created));
        assert!(!Destroyed.can_transition_to(Destroyed));
        assert!(!Destroyed.can_transition_to(Running));
    }

    #[test]
    fn test_any_live_state_can_be_destroyed() {
        for state in [Constructed, Initialized, Preloading, Created, Running, Paused] {
            assert!(state.can_transition_to(Destroyed));
        }
    }

    #[test]
    fn test_activity_flags() {
        assert!(!Constructed.is_active());
        assert!(Preloading.is_active());
        assert!(!Preloading.is_visible());
        assert!(Paused.is_visible());
        assert!(!Destroyed.is_active());
    }
}
