//! Browser bindings
//!
//! Thin `wasm_bindgen` wrapper so a JS page can drive a session: forward
//! DOM events, call `frame()` from `requestAnimationFrame`, and draw the
//! JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::persistence::LocalStore;
use crate::settings::{QualityPreset, Settings};
use crate::sim::World;
use crate::tuning::Tuning;
use crate::unlocks::CharacterId;

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may override any balance value; bad JSON falls back to defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>, quality: Option<String>) -> WebGame {
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };
        let preset = quality
            .as_deref()
            .and_then(QualityPreset::from_str)
            .unwrap_or_default();
        WebGame {
            game: Game::new(World::from_entropy(tuning), LocalStore, Settings::from_preset(preset)),
        }
    }

    pub fn frame(&mut self) {
        self.game.frame();
    }

    pub fn key_down(&mut self, key: &str, shift: bool) {
        self.game.key_down(key, shift);
    }

    pub fn key_up(&mut self, key: &str) {
        self.game.key_up(key);
    }

    /// Pointer position already scaled to canvas pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.game.input.pointer_moved(Vec2::new(x, y));
    }

    pub fn pointer_button(&mut self, down: bool) {
        self.game.input.pointer_pressed(down);
    }

    pub fn touch_start(&mut self, id: u32, x: f32, y: f32, screen_width: f32) {
        self.game.input.touch_start(id, Vec2::new(x, y), screen_width);
    }

    pub fn touch_move(&mut self, id: u32, x: f32, y: f32) {
        self.game.input.touch_move(id, Vec2::new(x, y));
    }

    pub fn touch_end(&mut self, id: u32) {
        self.game.input.touch_end(id);
    }

    /// Window lost focus: drop held keys and pause a running game
    pub fn blur(&mut self) {
        self.game.input.clear();
        if self.game.phase() == crate::sim::GamePhase::Playing {
            self.game.toggle_pause();
            log::info!("Auto-paused (window blur)");
        }
    }

    pub fn open_character_select(&mut self) -> bool {
        self.game.open_character_select()
    }

    pub fn select_character(&mut self, id: &str) -> bool {
        CharacterId::from_str(id).is_some_and(|id| self.game.select_character(id))
    }

    pub fn start_run(&mut self) -> bool {
        self.game.start_run()
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    pub fn toggle_mute(&mut self) {
        self.game.toggle_mute();
    }

    pub fn music_volume(&self) -> f32 {
        self.game.settings().effective_music_volume()
    }

    /// Current frame as JSON; empty string if serialization fails
    pub fn snapshot_json(&self) -> String {
        self.game.snapshot().to_json().unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            String::new()
        })
    }

    /// Events since the last call as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.game.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }
}
