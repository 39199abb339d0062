use pc_keyboard::{layouts, DecodedKey, HandleControl, Keyboard, ScancodeSet1};

use crate::interrupts::io::PortBus;

const DATA_PORT: u16 = 0x60;
const STATUS_PORT: u16 = 0x64;
const OUTPUT_FULL: u8 = 1 << 0;

/// Top bit of a set 1 scan code marks a key release.
pub const RELEASE_BIT: u8 = 0x80;
pub const ENTER: u8 = 0x1C;

/// Turns a raw scan code into a character, if it has one.
pub trait Keymap {
    fn lookup(&mut self, scan_code: u8) -> Option<char>;
}

/// Scan code set 1 on a US 104-key layout.
pub struct Us104Keymap {
    keyboard: Keyboard<layouts::Us104Key, ScancodeSet1>,
}

impl Us104Keymap {
    pub fn new() -> Self {
        Self {
            keyboard: Keyboard::new(
                ScancodeSet1::new(),
                layouts::Us104Key,
                HandleControl::Ignore,
            ),
        }
    }
}

impl Default for Us104Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap for Us104Keymap {
    fn lookup(&mut self, scan_code: u8) -> Option<char> {
        let event = self.keyboard.add_byte(scan_code).ok()??;
        match self.keyboard.process_keyevent(event)? {
            DecodedKey::Unicode(c) => Some(c),
            DecodedKey::RawKey(_) => None,
        }
    }
}

/// Reads the pending scan code from the 8042, if the status port says
/// there is one.
pub fn read_scan_code(ports: &mut impl PortBus) -> Option<u8> {
    if ports.read_u8(STATUS_PORT) & OUTPUT_FULL == 0 {
        return None;
    }
    Some(ports.read_u8(DATA_PORT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Restart,
}

impl Command {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Command::Jump),
            'r' => Some(Command::Restart),
            _ => None,
        }
    }
}
