use core::fmt;

use spin::Once;
use x86_64::structures::idt::{HandlerFunc, InterruptDescriptorTable};

pub mod io;
pub mod pic;
pub mod pit;

/// Vectors below this belong to CPU exceptions.
pub const FIRST_EXTERNAL_VECTOR: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallError {
    ReservedVector(u8),
    AlreadyInstalled(u8),
    TableFull,
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::ReservedVector(v) => write!(f, "vector {v:#04x} is reserved for exceptions"),
            InstallError::AlreadyInstalled(v) => write!(f, "vector {v:#04x} already has a handler"),
            InstallError::TableFull => write!(f, "interrupt table is full"),
        }
    }
}

/// Sparse vector -> handler mapping. Only what gets installed here ends up
/// in the descriptor table; every other vector stays not-present.
pub struct InterruptTable<H, const N: usize> {
    entries: [Option<(u8, H)>; N],
}

impl<H: Copy, const N: usize> InterruptTable<H, N> {
    pub const fn new() -> Self {
        Self { entries: [None; N] }
    }

    pub fn install(&mut self, vector: u8, handler: H) -> Result<(), InstallError> {
        if vector < FIRST_EXTERNAL_VECTOR {
            return Err(InstallError::ReservedVector(vector));
        }
        if self.get(vector).is_some() {
            return Err(InstallError::AlreadyInstalled(vector));
        }
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.is_none())
            .ok_or(InstallError::TableFull)?;
        *slot = Some((vector, handler));
        Ok(())
    }

    pub fn get(&self, vector: u8) -> Option<H> {
        self.iter().find(|(v, _)| *v == vector).map(|(_, h)| h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, H)> + '_ {
        self.entries.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Copy, const N: usize> Default for InterruptTable<H, N> {
    fn default() -> Self {
        Self::new()
    }
}

static IDT: Once<InterruptDescriptorTable> = Once::new();

impl<const N: usize> InterruptTable<HandlerFunc, N> {
    /// Builds the hardware descriptor table and points the CPU at it.
    /// The first table loaded wins; it lives for the rest of the boot.
    pub fn load(&self) {
        IDT.call_once(|| {
            let mut idt = InterruptDescriptorTable::new();
            for (vector, handler) in self.iter() {
                idt[vector].set_handler_fn(handler);
            }
            idt
        })
        .load();
    }
}
