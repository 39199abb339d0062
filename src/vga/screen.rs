use num::Integer;

use super::{Cell, Color, ColorCode, TextBuffer, BUFFER_WIDTH, CELLS};

const SKY: ColorCode = ColorCode::new(Color::White, Color::Blue);

// Star layers, as periods over the frame buffer's byte offsets.
const NEAR_STAR_PERIOD: usize = 34;
const FAR_STAR_PERIOD: usize = 46;

/// Writes cells through a single cursor that every `put` advances.
///
/// The cursor is a linear cell offset and may leave the grid (pipes get
/// drawn partly off screen); such writes are dropped but still advance it.
pub struct Screen<B> {
    buffer: B,
    cursor: isize,
}

impl<B: TextBuffer> Screen<B> {
    pub fn new(buffer: B) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn goto(&mut self, col: i32, row: i32) {
        self.cursor = row as isize * BUFFER_WIDTH as isize + col as isize;
    }

    pub fn put(&mut self, glyph: u8, color: ColorCode) {
        if (0..CELLS as isize).contains(&self.cursor) {
            self.buffer
                .write_cell(self.cursor as usize, Cell::new(glyph, color));
        }
        self.cursor += 1;
    }

    pub fn print(&mut self, text: &str, color: ColorCode) {
        for b in text.bytes() {
            self.put(b, color);
        }
    }

    pub fn print_int(&mut self, value: impl Into<i64>, color: ColorCode) {
        let value: i64 = value.into();
        if value == 0 {
            self.put(b'0', color);
            return;
        }
        if value < 0 {
            self.put(b'-', color);
        }

        let mut digits = [0u8; 20];
        let mut len = 0;
        let mut rest = value.unsigned_abs();
        while rest > 0 {
            digits[len] = b'0' + (rest % 10) as u8;
            rest /= 10;
            len += 1;
        }
        for &d in digits[..len].iter().rev() {
            self.put(d, color);
        }
    }

    /// Jumps to the next row start strictly after the cursor, so calling this
    /// at column 0 leaves a whole blank row behind.
    pub fn newline(&mut self) {
        let width = BUFFER_WIDTH as isize;
        self.cursor += width - self.cursor.mod_floor(&width);
    }

    /// Clears every cell to sky, sprinkling two star layers that drift at
    /// different speeds as `tick` grows. Leaves the cursor alone.
    pub fn paint_sky(&mut self, tick: u32) {
        for index in 0..CELLS {
            self.buffer
                .write_cell(index, Cell::new(sky_glyph(index, tick), SKY));
        }
    }
}

/// Sky glyph for one cell at a given animation tick.
pub fn sky_glyph(index: usize, tick: u32) -> u8 {
    // the layers are phased on byte offsets into the frame buffer
    let offset = index * 2;
    let tick = tick as usize;
    if ((offset + tick) / 2) % NEAR_STAR_PERIOD == 1 {
        b'.'
    } else if ((offset + tick / 4) / 2) % FAR_STAR_PERIOD == 1 {
        b'+'
    } else {
        b' '
    }
}
