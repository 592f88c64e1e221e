//! Game session
//!
//! Wraps the simulation with everything that outlives a single run: the
//! unlock list and its store, presentation settings, device input and the
//! cheat prompt. Hosts call `frame()` once per display frame and render
//! `snapshot()` afterwards.

use crate::cheat::{CheatPrompt, CheatTick};
use crate::consts::*;
use crate::persistence::UnlockStore;
use crate::platform::{InputState, Key};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, Task, TickInput, World, tick};
use crate::snapshot::RenderSnapshot;
use crate::unlocks::{CharacterId, Unlocks};

pub struct Game<S: UnlockStore> {
    pub world: World,
    pub input: InputState,
    settings: Settings,
    unlocks: Unlocks,
    store: S,
    cheat: CheatPrompt,
    /// Fighter for the next run
    selected: CharacterId,
    /// Events since the last `drain_events`
    events: Vec<GameEvent>,
}

impl<S: UnlockStore> Game<S> {
    /// New session on the title screen; unlocks are read from `store`
    pub fn new(mut world: World, store: S, settings: Settings) -> Self {
        let unlocks = Unlocks::load(&store);
        world.max_particles = settings.max_particles();
        Self {
            world,
            input: InputState::new(),
            settings,
            unlocks,
            store,
            cheat: CheatPrompt::default(),
            selected: CharacterId::Default,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn unlocks(&self) -> &Unlocks {
        &self.unlocks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cheat(&self) -> &CheatPrompt {
        &self.cheat
    }

    pub fn selected(&self) -> CharacterId {
        self.selected
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.world.max_particles = settings.max_particles();
        self.settings = settings;
    }

    pub fn toggle_mute(&mut self) {
        self.settings.muted = !self.settings.muted;
    }

    /// MENU or GAME_OVER → CHARACTER_SELECT
    pub fn open_character_select(&mut self) -> bool {
        match self.world.phase {
            GamePhase::Menu | GamePhase::GameOver => {
                self.world.phase = GamePhase::CharacterSelect;
                true
            }
            _ => false,
        }
    }

    /// Choose the fighter for the next run; locked fighters are refused
    pub fn select_character(&mut self, id: CharacterId) -> bool {
        if !self.unlocks.is_unlocked(id) {
            log::warn!("{} is still locked", id.display_name());
            return false;
        }
        self.selected = id;
        true
    }

    /// CHARACTER_SELECT or GAME_OVER → PLAYING with a fresh run
    pub fn start_run(&mut self) -> bool {
        match self.world.phase {
            GamePhase::CharacterSelect | GamePhase::GameOver => {
                self.world.start_run(self.selected);
                true
            }
            _ => false,
        }
    }

    /// PLAYING ⇄ PAUSED; ignored in every other phase
    pub fn toggle_pause(&mut self) {
        self.world.phase = match self.world.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Abandon whatever is happening and show the title screen
    pub fn return_to_menu(&mut self) {
        self.world.abandon_boss();
        let cancelled = self.world.tasks.cancel_all();
        self.world.phase = GamePhase::Menu;
        self.world.boss_warning = None;
        self.world.screen_shake = 0.0;
        log::info!("Returned to menu ({} pending tasks cancelled)", cancelled);
    }

    /// Key press by DOM key name
    pub fn key_down(&mut self, name: &str, shift: bool) {
        let key = Key::from_name(name);
        if shift && key == Some(Key::C) {
            self.cheat.open();
            return;
        }
        if self.cheat.key(key) {
            self.on_cheat_success();
        }

        let Some(key) = key else {
            return;
        };
        self.input.key_down(key);
        match key {
            Key::Escape => self.toggle_pause(),
            Key::R if self.world.phase == GamePhase::GameOver => {
                self.start_run();
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.input.key_up(key);
        }
    }

    /// Run one display frame
    pub fn frame(&mut self) {
        match self.cheat.tick() {
            CheatTick::Idle => {}
            CheatTick::Detonated => {
                self.world.screen_shake = SHAKE_DETONATION;
                log::warn!("Cheat prompt expired");
            }
            CheatTick::Reset => self.return_to_menu(),
        }

        // Paused: render the last settled state, mutate nothing
        if self.world.phase != GamePhase::Paused {
            let input = if self.world.phase == GamePhase::Playing {
                self.input.control()
            } else {
                TickInput::default()
            };
            tick(&mut self.world, &input);
        }

        let events = std::mem::take(&mut self.world.events);
        for event in &events {
            self.route_event(event);
        }
        self.events.extend(events);
    }

    /// Events recorded since the previous drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        let mut snapshot = RenderSnapshot::capture(&self.world, &self.settings);
        snapshot.cheat = self.cheat.view();
        snapshot.selected = self.selected;
        snapshot.unlocked = self.unlocks.iter().collect();
        snapshot
    }

    fn route_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BossDefeated { variant } => {
                let fighter = variant.character();
                if self.unlocks.unlock(fighter) {
                    self.unlocks.save(&mut self.store);
                    self.world.tasks.schedule(
                        UNLOCK_NOTICE_FRAMES,
                        Task::AnnounceAtPlayer {
                            text: "NEW FIGHTER UNLOCKED!".to_string(),
                            color: colors::GREEN,
                        },
                    );
                    log::info!("Unlocked {}", fighter.display_name());
                }
            }
            GameEvent::GameOver { .. } => self.cheat.close(),
            _ => {}
        }
    }

    fn on_cheat_success(&mut self) {
        if self.unlocks.unlock_all() {
            self.unlocks.save(&mut self.store);
        }
        self.world
            .spawn_text(World::screen_center(), "ALL CHARACTERS UNLOCKED!", colors::GREEN);
        log::info!("All characters unlocked");
    }
}
