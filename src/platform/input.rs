//! Keyboard and touch input mapped onto per-tick intents
//!
//! Keys are tracked by `KeyboardEvent.code`. Touch buttons carry the code of
//! the key they stand in for, so both feed the same held set.

use std::collections::HashSet;

use crate::sim::state::Cheat;
use crate::sim::TickInput;

const LEFT: [&str; 2] = ["ArrowLeft", "KeyA"];
const RIGHT: [&str; 2] = ["ArrowRight", "KeyD"];
const JUMP: [&str; 3] = ["ArrowUp", "KeyW", "Space"];

/// One-shot commands triggered on key down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Cheat(Cheat),
    ToggleDebug,
    SaveNow,
}

/// Map a key press with modifiers to a command, if any
pub fn key_action(code: &str, ctrl: bool, shift: bool) -> Option<KeyAction> {
    if shift && !ctrl && code == "KeyD" {
        return Some(KeyAction::ToggleDebug);
    }
    if !ctrl {
        return None;
    }
    let action = match code {
        "KeyQ" => KeyAction::Cheat(Cheat::AddScore),
        "KeyT" => KeyAction::Cheat(Cheat::CycleTimeline),
        "KeyB" => KeyAction::Cheat(Cheat::AddBananas),
        "KeyL" => KeyAction::Cheat(Cheat::AddLives),
        "KeyN" => KeyAction::Cheat(Cheat::NextLevel),
        "KeyR" => KeyAction::Cheat(Cheat::ResetLevel),
        "KeyP" => KeyAction::ToggleDebug,
        "KeyS" => KeyAction::SaveNow,
        _ => return None,
    };
    Some(action)
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<String>,
    /// Escape went down since the last tick
    pause_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        // Auto-repeat arrives as repeated key downs
        let fresh = self.held.insert(code.to_string());
        if fresh && code == "Escape" {
            self.pause_pressed = true;
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.pause_pressed = false;
    }

    fn any(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Snapshot for one tick. Consumes the pause edge.
    pub fn tick_input(&mut self) -> TickInput {
        TickInput {
            left: self.any(&LEFT),
            right: self.any(&RIGHT),
            jump: self.any(&JUMP),
            scan: self.is_held("Digit1"),
            time_jump: self.is_held("Digit2"),
            entangle: self.is_held("Digit3"),
            pause: std::mem::take(&mut self.pause_pressed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_mapping() {
        let mut input = InputState::new();
        input.key_down("KeyA");
        input.key_down("Space");
        input.key_down("Digit2");
        let t = input.tick_input();
        assert!(t.left && t.jump && t.time_jump);
        assert!(!t.right && !t.scan && !t.entangle && !t.pause);

        input.key_up("KeyA");
        input.key_down("ArrowRight");
        let t = input.tick_input();
        assert!(!t.left && t.right);
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.tick_input().pause);
        // Still held, and auto-repeat does not re-arm it
        input.key_down("Escape");
        assert!(!input.tick_input().pause);
        input.key_up("Escape");
        input.key_down("Escape");
        assert!(input.tick_input().pause);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.key_down("Escape");
        input.clear();
        let t = input.tick_input();
        assert!(!t.left && !t.pause);
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(key_action("KeyQ", true, false), Some(KeyAction::Cheat(Cheat::AddScore)));
        assert_eq!(key_action("KeyN", true, false), Some(KeyAction::Cheat(Cheat::NextLevel)));
        assert_eq!(key_action("KeyD", false, true), Some(KeyAction::ToggleDebug));
        assert_eq!(key_action("KeyQ", false, false), None);
        assert_eq!(key_action("KeyD", false, false), None);
        assert_eq!(key_action("KeyZ", true, false), None);
    }
}
