use volatile::Volatile;

mod screen;

pub use screen::{sky_glyph, Screen};

pub const BUFFER_WIDTH: usize = 80;
pub const BUFFER_HEIGHT: usize = 25;
pub const CELLS: usize = BUFFER_WIDTH * BUFFER_HEIGHT;

const VGA_ADDRESS: usize = 0xb8000;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

/// Attribute byte: foreground in the low nibble, background in the high one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self((background as u8) << 4 | (foreground as u8))
    }

    pub const fn foreground(self) -> u8 {
        self.0 & 0x0F
    }

    pub const fn background(self) -> u8 {
        self.0 >> 4
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Cell {
    pub glyph: u8,
    pub color: ColorCode,
}

impl Cell {
    pub const fn new(glyph: u8, color: ColorCode) -> Self {
        Self { glyph, color }
    }
}

/// Anything that holds an 80x25 grid of cells, addressed by linear index.
/// Indices are always below `CELLS`; `Screen` drops everything else.
pub trait TextBuffer {
    fn write_cell(&mut self, index: usize, cell: Cell);
    fn read_cell(&self, index: usize) -> Cell;
}

/// Plain memory grid, used off hardware.
#[derive(Clone)]
pub struct Grid {
    cells: [Cell; CELLS],
}

impl Grid {
    pub const fn new() -> Self {
        Self {
            cells: [Cell::new(0, ColorCode(0)); CELLS],
        }
    }

    pub fn at(&self, col: usize, row: usize) -> Cell {
        self.cells[row * BUFFER_WIDTH + col]
    }

    /// Glyphs of one row, handy for comparing against a string.
    pub fn row_glyphs(&self, row: usize) -> [u8; BUFFER_WIDTH] {
        let mut out = [0; BUFFER_WIDTH];
        for (col, glyph) in out.iter_mut().enumerate() {
            *glyph = self.at(col, row).glyph;
        }
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for Grid {
    fn write_cell(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    fn read_cell(&self, index: usize) -> Cell {
        self.cells[index]
    }
}

#[repr(transparent)]
struct RawBuffer {
    cells: [Volatile<Cell>; CELLS],
}

/// The text mode frame buffer at 0xb8000.
pub struct VgaBuffer {
    raw: &'static mut RawBuffer,
}

impl VgaBuffer {
    /// # Safety
    /// The frame buffer has to be identity mapped (the bootloader does this)
    /// and at most one `VgaBuffer` may be alive.
    pub unsafe fn new() -> Self {
        Self {
            raw: &mut *(VGA_ADDRESS as *mut RawBuffer),
        }
    }
}

impl TextBuffer for VgaBuffer {
    fn write_cell(&mut self, index: usize, cell: Cell) {
        self.raw.cells[index].write(cell);
    }

    fn read_cell(&self, index: usize) -> Cell {
        self.raw.cells[index].read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_nibbles() {
        let c = ColorCode::new(Color::White, Color::Blue);
        assert_eq!(c.as_u8(), 0x1F);
        assert_eq!(c.foreground(), 15);
        assert_eq!(c.background(), 1);
    }

    #[test]
    fn cell_is_two_bytes() {
        assert_eq!(core::mem::size_of::<Cell>(), 2);
        assert_eq!(core::mem::size_of::<[Cell; CELLS]>(), 4000);
    }
}
