#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod config;
pub mod dispatch;
pub mod game;
pub mod interrupts;
pub mod keyboard;
pub mod mailbox;
pub mod serial;
pub mod vga;
