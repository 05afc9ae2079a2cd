use glam::Vec2;

/// Where the mouse-look tracker is between cursor samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LookState {
    /// Armed: the next cursor sample with the button held becomes the baseline.
    #[default]
    Idle,
    /// Following the cursor from the last recorded position.
    Tracking { last: Vec2 },
}

/// Turns absolute cursor positions into look deltas while the look button is held.
///
/// Deltas are raw pixels: X grows to the right, Y grows upward (screen Y is
/// inverted so that moving the cursor up looks up). Scaling by sensitivity is
/// the camera's job.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    state: LookState,
    held: bool,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LookState {
        self.state
    }

    /// Whether the look button is currently held.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Record a look-button transition. Any change of button state re-arms the tracker.
    pub fn set_button(&mut self, pressed: bool) {
        if pressed != self.held {
            self.state = LookState::Idle;
        }
        self.held = pressed;
    }

    /// Feed an absolute cursor position. Returns the delta since the previous
    /// sample, or `None` when the button is up or this sample is the new baseline.
    pub fn cursor_moved(&mut self, pos: Vec2) -> Option<Vec2> {
        if !self.held {
            self.state = LookState::Idle;
            return None;
        }

        match self.state {
            LookState::Idle => {
                tracing::debug!("mouse look baseline at ({:.1}, {:.1})", pos.x, pos.y);
                self.state = LookState::Tracking { last: pos };
                None
            }
            LookState::Tracking { last } => {
                self.state = LookState::Tracking { last: pos };
                Some(Vec2::new(pos.x - last.x, last.y - pos.y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_released() {
        let look = MouseLook::new();
        assert_eq!(look.state(), LookState::Idle);
        assert!(!look.is_held());
    }

    #[test]
    fn no_delta_while_released() {
        let mut look = MouseLook::new();
        assert_eq!(look.cursor_moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(look.cursor_moved(Vec2::new(50.0, 80.0)), None);
        assert_eq!(look.state(), LookState::Idle);
    }

    #[test]
    fn first_sample_after_press_is_baseline() {
        let mut look = MouseLook::new();
        look.set_button(true);
        assert_eq!(look.cursor_moved(Vec2::new(100.0, 200.0)), None);
        assert_eq!(
            look.state(),
            LookState::Tracking {
                last: Vec2::new(100.0, 200.0)
            }
        );
    }

    #[test]
    fn delta_inverts_y() {
        let mut look = MouseLook::new();
        look.set_button(true);
        look.cursor_moved(Vec2::new(100.0, 100.0));
        let d = look.cursor_moved(Vec2::new(110.0, 90.0)).unwrap();
        assert_eq!(d, Vec2::new(10.0, 10.0));
        let d = look.cursor_moved(Vec2::new(105.0, 120.0)).unwrap();
        assert_eq!(d, Vec2::new(-5.0, -30.0));
    }

    #[test]
    fn release_then_press_never_jumps() {
        let mut look = MouseLook::new();
        look.set_button(true);
        look.cursor_moved(Vec2::new(0.0, 0.0));
        look.cursor_moved(Vec2::new(5.0, 5.0));
        look.set_button(false);
        assert_eq!(look.state(), LookState::Idle);

        // Cursor wanders far away while released.
        look.cursor_moved(Vec2::new(700.0, 550.0));
        look.set_button(true);
        assert_eq!(look.cursor_moved(Vec2::new(790.0, 10.0)), None);
        let d = look.cursor_moved(Vec2::new(791.0, 10.0)).unwrap();
        assert_eq!(d, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn release_without_cursor_event_still_rearms() {
        let mut look = MouseLook::new();
        look.set_button(true);
        look.cursor_moved(Vec2::new(0.0, 0.0));
        look.set_button(false);
        look.set_button(true);
        assert_eq!(look.cursor_moved(Vec2::new(400.0, 400.0)), None);
    }

    #[test]
    fn repeated_press_keeps_tracking() {
        let mut look = MouseLook::new();
        look.set_button(true);
        look.cursor_moved(Vec2::new(0.0, 0.0));
        look.set_button(true);
        assert_eq!(
            look.cursor_moved(Vec2::new(2.0, 0.0)),
            Some(Vec2::new(2.0, 0.0))
        );
    }
}
