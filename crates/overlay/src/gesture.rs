use foundation::math::Vec2;

/// Distinguishes a click on a pin from a drag-release that happens to end on
/// one, so orbiting the globe never spuriously activates a pin.
///
/// State is exactly one "last pointer-down position or none", reset after
/// every pointer-up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClickGuard {
    down: Option<Vec2>,
    drag_threshold_px: f64,
}

impl Default for ClickGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// What to do with the release event's default action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReleaseAction {
    Activate,
    /// The pointer travelled beyond the drag threshold: cancel navigation.
    Suppress,
}

impl ClickGuard {
    pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 6.0;

    pub fn new() -> Self {
        Self::with_threshold(Self::DEFAULT_DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(drag_threshold_px: f64) -> Self {
        Self {
            down: None,
            drag_threshold_px,
        }
    }

    pub fn pointer_down(&mut self, x_px: f64, y_px: f64) {
        self.down = Some(Vec2::new(x_px, y_px));
    }

    pub fn pointer_up(&mut self, x_px: f64, y_px: f64) -> ReleaseAction {
        let Some(down) = self.down.take() else {
            // A release with no recorded press never suppresses.
            return ReleaseAction::Activate;
        };
        if down.distance(Vec2::new(x_px, y_px)) > self.drag_threshold_px {
            ReleaseAction::Suppress
        } else {
            ReleaseAction::Activate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickGuard, ReleaseAction};

    #[test]
    fn short_travel_activates() {
        let mut guard = ClickGuard::new();
        guard.pointer_down(100.0, 100.0);
        assert_eq!(guard.pointer_up(100.0, 103.0), ReleaseAction::Activate);
    }

    #[test]
    fn long_travel_suppresses() {
        let mut guard = ClickGuard::new();
        guard.pointer_down(100.0, 100.0);
        assert_eq!(guard.pointer_up(108.0, 100.0), ReleaseAction::Suppress);
    }

    #[test]
    fn exact_threshold_still_activates() {
        let mut guard = ClickGuard::new();
        guard.pointer_down(0.0, 0.0);
        assert_eq!(guard.pointer_up(6.0, 0.0), ReleaseAction::Activate);
    }

    #[test]
    fn state_resets_after_every_release() {
        let mut guard = ClickGuard::new();
        guard.pointer_down(0.0, 0.0);
        assert_eq!(guard.pointer_up(50.0, 0.0), ReleaseAction::Suppress);
        // No new pointer-down: the stale position must not linger.
        assert_eq!(guard.pointer_up(50.0, 0.0), ReleaseAction::Activate);
    }

    #[test]
    fn release_without_press_activates() {
        let mut guard = ClickGuard::new();
        assert_eq!(guard.pointer_up(10.0, 10.0), ReleaseAction::Activate);
    }
}
