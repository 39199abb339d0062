use crate::config::{BIRD_COLUMN, JUMP_SPEED, PIPE_GAP, PIPE_HEIGHT};
use crate::vga::{Color, ColorCode, Screen, TextBuffer};

use super::Bird;

const SKY_COLOR: Color = Color::Blue;
const BIRD_COLOR: Color = Color::Yellow;
const PIPE_COLOR: Color = Color::LightGreen;

// code page 437 glyphs
pub const WING_UP: u8 = 0xDC;
pub const WING_DOWN: u8 = b'\\';
pub const EYE: u8 = 0xF8;
pub const BEAK: u8 = 0x10;
pub const SHADE: u8 = 0xB1;
pub const LIGHT: u8 = 0xDD;

const HUD: ColorCode = ColorCode::new(Color::Blue, Color::White);

pub fn bird<B: TextBuffer>(screen: &mut Screen<B>, bird: &Bird) {
    if bird.row < 0 {
        return;
    }
    screen.goto(BIRD_COLUMN, bird.row);

    // wing stays up for the first two frames after a jump
    let wing = if bird.velocity <= JUMP_SPEED + 2 {
        WING_UP
    } else {
        WING_DOWN
    };
    screen.put(wing, ColorCode::new(Color::White, SKY_COLOR));
    screen.print(" ", ColorCode::new(Color::Black, BIRD_COLOR));
    screen.put(EYE, ColorCode::new(Color::Black, BIRD_COLOR));
    screen.put(BEAK, ColorCode::new(Color::LightRed, SKY_COLOR));
}

/// Two shafts of `PIPE_HEIGHT` cells, leaving `2 * PIPE_GAP + 1` free rows
/// around `gap_row`. The far end of each shaft gets a wider lip.
pub fn pipe<B: TextBuffer>(screen: &mut Screen<B>, column: i32, gap_row: i32) {
    for i in 0..PIPE_HEIGHT {
        shaft_cell(screen, column, gap_row - PIPE_GAP - 1 - i, i == PIPE_HEIGHT - 1);
    }
    for i in 0..PIPE_HEIGHT {
        shaft_cell(screen, column, gap_row + PIPE_GAP + 1 + i, i == PIPE_HEIGHT - 1);
    }
}

fn shaft_cell<B: TextBuffer>(screen: &mut Screen<B>, column: i32, row: i32, lip: bool) {
    let body = ColorCode::new(Color::White, PIPE_COLOR);
    if lip {
        screen.goto(column - 1, row);
        screen.put(SHADE, ColorCode::new(Color::Green, PIPE_COLOR));
        screen.print("   ", body);
    } else {
        screen.goto(column, row);
        screen.put(SHADE, ColorCode::new(Color::Green, PIPE_COLOR));
        screen.print(" ", body);
    }
    screen.put(LIGHT, body);
}

pub fn hud<B: TextBuffer>(screen: &mut Screen<B>, score: u32, hiscore: u32) {
    screen.goto(0, 0);
    screen.print("CRAPPY BIRD", HUD);
    screen.newline();
    screen.print("SCORE: ", HUD);
    screen.print_int(score, HUD);
    if hiscore > 0 {
        screen.newline();
        screen.print("HI SCORE: ", HUD);
        screen.print_int(hiscore, HUD);
    }
}

pub fn game_over<B: TextBuffer>(screen: &mut Screen<B>) {
    screen.goto(25, 5);
    screen.print("YOU LOST!!! HAHAHAHAHA!", ColorCode::new(Color::LightRed, Color::Black));
    screen.goto(23, 8);
    screen.print("Press R to play again", ColorCode::new(Color::Yellow, Color::Black));
}
