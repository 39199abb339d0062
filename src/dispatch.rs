//! Turns the two hardware event streams into game updates.
//!
//! Interrupt entry points only publish what happened; everything here runs
//! on the single consumer side, so the game is never mutated from two
//! places at once.

use log::trace;

use crate::game::{Game, Phase};
use crate::keyboard::{Command, Keymap, ENTER, RELEASE_BIT};
use crate::vga::{Screen, TextBuffer};

/// Counts timer interrupts and fires once every `timer_hz / target_fps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDecimator {
    counter: u32,
    threshold: u32,
}

impl FrameDecimator {
    pub const fn new(timer_hz: u32, target_fps: u32) -> Self {
        let threshold = if target_fps == 0 || timer_hz < target_fps {
            1
        } else {
            timer_hz / target_fps
        };
        Self {
            counter: 0,
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Call once per timer interrupt. True when a frame is due.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.threshold {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// Everything the two handlers share: the screen, the game and the keymap.
pub struct Arcade<B, K> {
    screen: Screen<B>,
    game: Game,
    keymap: K,
    decimator: FrameDecimator,
}

impl<B: TextBuffer, K: Keymap> Arcade<B, K> {
    pub fn new(buffer: B, keymap: K, decimator: FrameDecimator) -> Self {
        Self {
            screen: Screen::new(buffer),
            game: Game::new(),
            keymap,
            decimator,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn screen(&self) -> &Screen<B> {
        &self.screen
    }

    /// Returns whether this interrupt produced a frame.
    pub fn on_timer(&mut self) -> bool {
        if !self.decimator.tick() {
            return false;
        }
        self.game.advance_frame(&mut self.screen);
        true
    }

    pub fn on_scan_code(&mut self, code: u8) {
        if code & RELEASE_BIT != 0 {
            return;
        }
        if code == ENTER {
            self.screen.newline();
            return;
        }

        let Some(command) = self.keymap.lookup(code).and_then(Command::from_char) else {
            trace!("ignoring scan code {code:#04x}");
            return;
        };
        match (command, self.game.phase()) {
            (Command::Jump, Phase::Playing) => self.game.jump(),
            (Command::Restart, Phase::Over) => self.game.restart(),
            _ => {}
        }
    }
}
