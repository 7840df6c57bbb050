//! Polled input snapshot
//!
//! The platform layer pushes key/mouse transitions in from DOM events;
//! the simulation only ever polls. "Released" edges are debounced at the
//! source: reading one consumes it.

use std::collections::HashMap;

const LEFT_BUTTON: usize = 0;
const RIGHT_BUTTON: usize = 2;
const BUTTON_COUNT: usize = 3;

/// Keyboard and mouse state as of the last host events
#[derive(Default)]
pub struct InputManager {
    keys: HashMap<String, bool>,
    mouse_down: [bool; BUTTON_COUNT],
    mouse_released: [bool; BUTTON_COUNT],
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition (names are case-insensitive)
    pub fn set_key(&mut self, key: &str, down: bool) {
        self.keys.insert(key.to_lowercase(), down);
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys
            .get(&key.to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    /// Record a mouse button transition; a release also arms the
    /// one-shot released edge
    pub fn set_mouse_button(&mut self, button: usize, down: bool) {
        if button >= BUTTON_COUNT {
            return;
        }
        if self.mouse_down[button] && !down {
            self.mouse_released[button] = true;
        }
        self.mouse_down[button] = down;
    }

    pub fn is_left_mouse_down(&self) -> bool {
        self.mouse_down[LEFT_BUTTON]
    }

    pub fn is_right_mouse_down(&self) -> bool {
        self.mouse_down[RIGHT_BUTTON]
    }

    /// True exactly once per release
    pub fn is_left_mouse_released(&mut self) -> bool {
        let released = self.mouse_released[LEFT_BUTTON];
        self.mouse_released[LEFT_BUTTON] = false;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_case_insensitive() {
        let mut input = InputManager::new();
        input.set_key("ArrowLeft", true);
        assert!(input.is_key_down("arrowleft"));
        input.set_key("arrowleft", false);
        assert!(!input.is_key_down("ArrowLeft"));
    }

    #[test]
    fn test_released_edge_consumed_on_read() {
        let mut input = InputManager::new();
        input.set_mouse_button(0, true);
        assert!(input.is_left_mouse_down());
        assert!(!input.is_left_mouse_released());

        input.set_mouse_button(0, false);
        assert!(input.is_left_mouse_released());
        assert!(!input.is_left_mouse_released());
    }
}
