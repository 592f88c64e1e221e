//! Secret unlock prompt
//!
//! Shift+C opens a ten second prompt. Typing the arrow sequence unlocks
//! every fighter; letting the clock run out blows the prompt up and throws
//! the session back to the title screen.

use std::collections::VecDeque;

use serde::Serialize;

use crate::consts::FRAMES_PER_SEC;
use crate::platform::Key;

pub const CHEAT_SEQUENCE: [Key; 8] = [
    Key::ArrowUp,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::ArrowLeft,
    Key::ArrowRight,
];

/// Time allowed to enter the sequence
pub const CHEAT_WINDOW_FRAMES: u32 = 10 * FRAMES_PER_SEC;
/// How long the explosion shows before the reset
pub const CHEAT_DETONATION_FRAMES: u32 = FRAMES_PER_SEC;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheatPrompt {
    #[default]
    Closed,
    Open {
        frames_left: u32,
        /// Last keys typed, `None` for keys the game does not track
        recent: VecDeque<Option<Key>>,
    },
    Exploded {
        frames_left: u32,
    },
}

/// What a frame of countdown produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheatTick {
    Idle,
    /// Timer ran out; the prompt just exploded
    Detonated,
    /// Explosion finished; the session must return to the menu
    Reset,
}

/// Renderer view of the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheatView {
    Open { seconds_left: u32 },
    Exploded,
}

impl CheatPrompt {
    /// Open (or restart) the prompt. Ignored while the explosion plays.
    pub fn open(&mut self) {
        if matches!(self, CheatPrompt::Exploded { .. }) {
            return;
        }
        *self = CheatPrompt::Open {
            frames_left: CHEAT_WINDOW_FRAMES,
            recent: VecDeque::with_capacity(CHEAT_SEQUENCE.len()),
        };
        log::debug!("Cheat prompt opened");
    }

    pub fn close(&mut self) {
        *self = CheatPrompt::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, CheatPrompt::Open { .. })
    }

    /// Record a key press; returns true when the sequence completes
    pub fn key(&mut self, key: Option<Key>) -> bool {
        let CheatPrompt::Open { recent, .. } = self else {
            return false;
        };
        recent.push_back(key);
        if recent.len() > CHEAT_SEQUENCE.len() {
            recent.pop_front();
        }
        let matched = recent.len() == CHEAT_SEQUENCE.len()
            && recent.iter().zip(CHEAT_SEQUENCE.iter()).all(|(k, want)| *k == Some(*want));
        if matched {
            *self = CheatPrompt::Closed;
        }
        matched
    }

    /// Count the prompt down by one frame
    pub fn tick(&mut self) -> CheatTick {
        match self {
            CheatPrompt::Closed => CheatTick::Idle,
            CheatPrompt::Open { frames_left, .. } => {
                *frames_left = frames_left.saturating_sub(1);
                if *frames_left > 0 {
                    return CheatTick::Idle;
                }
                *self = CheatPrompt::Exploded {
                    frames_left: CHEAT_DETONATION_FRAMES,
                };
                CheatTick::Detonated
            }
            CheatPrompt::Exploded { frames_left } => {
                *frames_left = frames_left.saturating_sub(1);
                if *frames_left > 0 {
                    return CheatTick::Idle;
                }
                *self = CheatPrompt::Closed;
                CheatTick::Reset
            }
        }
    }

    pub fn view(&self) -> Option<CheatView> {
        match self {
            CheatPrompt::Closed => None,
            CheatPrompt::Open { frames_left, .. } => Some(CheatView::Open {
                seconds_left: frames_left.div_ceil(FRAMES_PER_SEC),
            }),
            CheatPrompt::Exploded { .. } => Some(CheatView::Exploded),
        }
    }
}
