//! Compile-time tuning for the kernel and the game.

// Interrupt controller remap. Vectors 0..32 belong to CPU exceptions,
// so the two 8259s are moved right above them.
pub const PIC_1_OFFSET: u8 = 0x20;
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

pub const TIMER_VECTOR: u8 = PIC_1_OFFSET;
pub const KEYBOARD_VECTOR: u8 = PIC_1_OFFSET + 1;

/// Lines 0 (timer) and 1 (keyboard) open, everything else masked.
pub const IRQ_MASK: u16 = !0b11;

/// Rate the PIT is programmed to. Has to stay above `TARGET_FPS`.
pub const TIMER_HZ: u32 = 100;
/// Logical game updates per second (before integer rounding of the decimator).
pub const TARGET_FPS: u32 = 15;

pub const COM1: u16 = 0x3F8;

// Game tuning.
pub const BIRD_COLUMN: i32 = 5;
pub const BIRD_START_ROW: i32 = 5;
pub const JUMP_SPEED: i32 = -4;
pub const TERMINAL_VELOCITY: i32 = 2;
/// Row the bird is parked on once the run is over.
pub const DEAD_ROW: i32 = 99;

/// How far from a gap center the bird may be and still pass.
pub const PIPE_GAP: i32 = 3;
pub const PIPE_HEIGHT: i32 = 20;
pub const PIPE_SPAWN_COLUMN: i32 = 70;

/// Where a pipe starts and how it picks a new gap when it respawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    pub start_column: i32,
    pub start_gap_row: i32,
    /// Added to the bird's row when the pipe wraps around.
    pub respawn_offset: i32,
    /// Keeps the gap from spawning off the top edge.
    pub min_gap_row: i32,
}

pub const PIPE_A: Lane = Lane {
    start_column: 50,
    start_gap_row: 8,
    respawn_offset: -3,
    min_gap_row: 4,
};

pub const PIPE_B: Lane = Lane {
    start_column: 75,
    start_gap_row: 9,
    respawn_offset: -1,
    min_gap_row: 6,
};
