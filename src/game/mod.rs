use log::info;

use crate::config::{
    Lane, BIRD_COLUMN, BIRD_START_ROW, DEAD_ROW, JUMP_SPEED, PIPE_A, PIPE_B, PIPE_GAP,
    PIPE_SPAWN_COLUMN, TERMINAL_VELOCITY,
};
use crate::vga::{Screen, TextBuffer, BUFFER_HEIGHT};

pub mod draw;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bird {
    pub row: i32,
    pub velocity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipe {
    pub column: i32,
    pub gap_row: i32,
    lane: Lane,
}

impl Pipe {
    const fn new(lane: Lane) -> Self {
        Self {
            column: lane.start_column,
            gap_row: lane.start_gap_row,
            lane,
        }
    }

    // The gap follows the player rather than a PRNG.
    fn advance(&mut self, bird_row: i32) {
        if self.column > 0 {
            self.column -= 1;
        } else {
            self.column = PIPE_SPAWN_COLUMN;
            self.gap_row = (bird_row + self.lane.respawn_offset).max(self.lane.min_gap_row);
        }
    }
}

pub struct Game {
    pub bird: Bird,
    pub pipes: [Pipe; 2],
    pub score: u32,
    pub hiscore: u32,
    pub tick: u32,
    phase: Phase,
}

impl Game {
    pub const fn new() -> Self {
        Self {
            bird: Bird {
                row: BIRD_START_ROW,
                velocity: JUMP_SPEED,
            },
            pipes: [Pipe::new(PIPE_A), Pipe::new(PIPE_B)],
            score: 0,
            hiscore: 0,
            tick: 0,
            phase: Phase::Playing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// One logical update: background, physics, sprites, HUD.
    pub fn advance_frame<B: TextBuffer>(&mut self, screen: &mut Screen<B>) {
        screen.paint_sky(self.tick);
        self.step_physics(screen);
        draw::bird(screen, &self.bird);
        self.move_pipes();
        for pipe in &self.pipes {
            draw::pipe(screen, pipe.column, pipe.gap_row);
        }
        draw::hud(screen, self.score, self.hiscore);
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn step_physics<B: TextBuffer>(&mut self, screen: &mut Screen<B>) {
        if self.phase == Phase::Over {
            draw::game_over(screen);
            return;
        }

        // A before B. Their schedules never put both on the bird's column
        // in the same frame.
        for pipe in self.pipes {
            if pipe.column != BIRD_COLUMN {
                continue;
            }
            if num::abs(self.bird.row - pipe.gap_row) > PIPE_GAP {
                self.end_run();
                return;
            }
            self.score += 1;
        }

        if self.bird.velocity < TERMINAL_VELOCITY {
            self.bird.velocity += 1;
        }
        self.bird.row += self.bird.velocity;

        if self.bird.row >= BUFFER_HEIGHT as i32 {
            self.end_run();
        }
    }

    pub fn move_pipes(&mut self) {
        let bird_row = self.bird.row;
        for pipe in &mut self.pipes {
            pipe.advance(bird_row);
        }
    }

    pub fn jump(&mut self) {
        self.bird.velocity = JUMP_SPEED;
    }

    /// Starts a new run, keeping the best score.
    pub fn restart(&mut self) {
        let hiscore = self.hiscore.max(self.score);
        info!("restart: score {}, hiscore {}", self.score, hiscore);
        *self = Self {
            hiscore,
            ..Self::new()
        };
    }

    fn end_run(&mut self) {
        info!("run over at row {}, score {}", self.bird.row, self.score);
        self.bird.row = DEAD_ROW;
        self.phase = Phase::Over;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
