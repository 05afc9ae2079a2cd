use serde::{Deserialize, Serialize};

/// One of the four camera movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

/// Which movement keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: MoveKey, pressed: bool) {
        match key {
            MoveKey::Forward => self.forward = pressed,
            MoveKey::Back => self.back = pressed,
            MoveKey::Left => self.left = pressed,
            MoveKey::Right => self.right = pressed,
        }
    }

    pub fn is_pressed(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Forward => self.forward,
            MoveKey::Back => self.back,
            MoveKey::Left => self.left,
            MoveKey::Right => self.right,
        }
    }

    /// True if any movement key is held.
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }

    /// Release every key (e.g. when the window loses focus).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_query() {
        let mut keys = MoveKeys::new();
        assert!(!keys.any());
        keys.set(MoveKey::Left, true);
        assert!(keys.is_pressed(MoveKey::Left));
        assert!(!keys.is_pressed(MoveKey::Right));
        assert!(keys.any());
        keys.set(MoveKey::Left, false);
        assert!(!keys.any());
    }

    #[test]
    fn clear_releases_all() {
        let mut keys = MoveKeys {
            forward: true,
            back: true,
            left: true,
            right: true,
        };
        keys.clear();
        assert_eq!(keys, MoveKeys::default());
    }
}
