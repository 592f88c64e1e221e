//! Input normalization
//!
//! Keyboard, mouse and the two on-screen touch sticks all collapse into a
//! single `TickInput` per frame. Hosts feed raw events in canvas pixels.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Aim, TickInput};

/// Left stick ignores drags shorter than this (px)
pub const MOVE_DEADZONE: f32 = 5.0;
/// Left stick reaches full strength at this drag length (px)
pub const MOVE_MAX_DRAG: f32 = 40.0;
/// Right stick aims and fires past this drag length (px)
pub const AIM_DEADZONE: f32 = 10.0;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Shift,
    C,
    R,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "arrowup" | "up" => Some(Key::ArrowUp),
            "arrowdown" | "down" => Some(Key::ArrowDown),
            "arrowleft" | "left" => Some(Key::ArrowLeft),
            "arrowright" | "right" => Some(Key::ArrowRight),
            " " | "space" | "spacebar" => Some(Key::Space),
            "escape" | "esc" => Some(Key::Escape),
            "shift" => Some(Key::Shift),
            "c" => Some(Key::C),
            "r" => Some(Key::R),
            _ => None,
        }
    }
}

/// Which half of the screen a touch landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenHalf {
    /// Movement stick
    Left,
    /// Aim/fire stick
    Right,
}

/// One virtual joystick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    /// Touch identifier holding this stick
    pub id: Option<u32>,
    pub origin: Vec2,
    pub current: Vec2,
}

impl Stick {
    pub fn is_held(&self) -> bool {
        self.id.is_some()
    }

    /// Drag vector from where the touch started
    pub fn delta(&self) -> Vec2 {
        self.current - self.origin
    }

    fn grab(&mut self, id: u32, pos: Vec2) {
        self.id = Some(id);
        self.origin = pos;
        self.current = pos;
    }

    fn release(&mut self) {
        self.id = None;
        self.current = self.origin;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchSticks {
    pub left: Stick,
    pub right: Stick,
}

/// Everything the player is currently pressing
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    /// Mouse position in canvas pixels
    pub pointer: Vec2,
    pub pointer_down: bool,
    pub sticks: TouchSticks,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn pointer_pressed(&mut self, down: bool) {
        self.pointer_down = down;
    }

    /// Forget held keys and buttons (focus lost, run restarted)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer_down = false;
        self.sticks = TouchSticks::default();
    }

    /// Claim the stick on the touched half if it is free
    pub fn touch_start(&mut self, id: u32, pos: Vec2, screen_width: f32) -> Option<ScreenHalf> {
        let half = if pos.x < screen_width / 2.0 {
            ScreenHalf::Left
        } else {
            ScreenHalf::Right
        };
        let stick = match half {
            ScreenHalf::Left => &mut self.sticks.left,
            ScreenHalf::Right => &mut self.sticks.right,
        };
        if stick.is_held() {
            return None;
        }
        stick.grab(id, pos);
        Some(half)
    }

    /// Update whichever stick `id` is holding; unknown ids are ignored
    pub fn touch_move(&mut self, id: u32, pos: Vec2) {
        if self.sticks.left.id == Some(id) {
            self.sticks.left.current = pos;
        } else if self.sticks.right.id == Some(id) {
            self.sticks.right.current = pos;
        }
    }

    /// Release whichever stick `id` is holding; unknown ids are ignored
    pub fn touch_end(&mut self, id: u32) {
        if self.sticks.left.id == Some(id) {
            self.sticks.left.release();
        } else if self.sticks.right.id == Some(id) {
            self.sticks.right.release();
            self.pointer_down = false;
        }
    }

    /// Keyboard direction, unit length or zero
    fn keyboard_movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_held(Key::W) || self.is_held(Key::ArrowUp) {
            dir.y -= 1.0;
        }
        if self.is_held(Key::S) || self.is_held(Key::ArrowDown) {
            dir.y += 1.0;
        }
        if self.is_held(Key::A) || self.is_held(Key::ArrowLeft) {
            dir.x -= 1.0;
        }
        if self.is_held(Key::D) || self.is_held(Key::ArrowRight) {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    /// Collapse the current devices into one frame of commands
    pub fn control(&self) -> TickInput {
        // A held left stick overrides the keyboard, even inside its deadzone
        let movement = if self.sticks.left.is_held() {
            let delta = self.sticks.left.delta();
            let len = delta.length();
            if len > MOVE_DEADZONE {
                delta / len * (len.min(MOVE_MAX_DRAG) / MOVE_MAX_DRAG)
            } else {
                Vec2::ZERO
            }
        } else {
            self.keyboard_movement()
        };

        let (aim, trigger) = if self.sticks.right.is_held() {
            let delta = self.sticks.right.delta();
            if delta.length() > AIM_DEADZONE {
                (Aim::Angle(delta.y.atan2(delta.x)), true)
            } else {
                (Aim::Hold, false)
            }
        } else {
            (Aim::Pointer(self.pointer), self.pointer_down)
        };

        TickInput {
            movement,
            aim,
            fire: trigger || self.is_held(Key::Space),
        }
    }
}
