//! Where interrupt entry points leave their events for the idle loop.
//!
//! Every cell here is a lock-free `AtomicCell`, so an entry point can
//! preempt the idle loop halfway through a `drain` and still run to
//! completion. Scan codes queue in a ring with a single producer (the
//! keyboard entry) and a single consumer (the idle loop).

use crossbeam::atomic::AtomicCell;
use log::trace;

use crate::dispatch::Arcade;
use crate::keyboard::Keymap;
use crate::vga::TextBuffer;

pub const SCAN_CODE_SLOTS: usize = 16;

pub struct Mailbox {
    pending_ticks: AtomicCell<u32>,
    scan_codes: [AtomicCell<u8>; SCAN_CODE_SLOTS],
    // head is only written by the producer, tail only by the consumer
    head: AtomicCell<usize>,
    tail: AtomicCell<usize>,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            pending_ticks: AtomicCell::new(0),
            scan_codes: [const { AtomicCell::new(0) }; SCAN_CODE_SLOTS],
            head: AtomicCell::new(0),
            tail: AtomicCell::new(0),
        }
    }

    /// Timer side.
    pub fn post_tick(&self) {
        self.pending_ticks.fetch_add(1);
    }

    /// Keyboard side. Returns false, dropping the code, when the ring is full.
    pub fn post_scan_code(&self, code: u8) -> bool {
        let head = self.head.load();
        if head.wrapping_sub(self.tail.load()) == SCAN_CODE_SLOTS {
            return false;
        }
        self.scan_codes[head % SCAN_CODE_SLOTS].store(code);
        self.head.store(head.wrapping_add(1));
        true
    }

    fn take_scan_code(&self) -> Option<u8> {
        let tail = self.tail.load();
        if tail == self.head.load() {
            return None;
        }
        let code = self.scan_codes[tail % SCAN_CODE_SLOTS].load();
        self.tail.store(tail.wrapping_add(1));
        Some(code)
    }

    pub fn is_empty(&self) -> bool {
        self.pending_ticks.load() == 0 && self.tail.load() == self.head.load()
    }

    /// Hands everything posted so far to `arcade`: key presses first, in
    /// arrival order, then one `on_timer` per pending tick. Returns the
    /// number of frames drawn.
    pub fn drain<B: TextBuffer, K: Keymap>(&self, arcade: &mut Arcade<B, K>) -> u32 {
        while let Some(code) = self.take_scan_code() {
            arcade.on_scan_code(code);
        }
        let ticks = self.pending_ticks.swap(0);
        let mut frames = 0;
        for _ in 0..ticks {
            if arcade.on_timer() {
                frames += 1;
            }
        }
        if ticks > 1 {
            trace!("caught up {} ticks, {} frames", ticks, frames);
        }
        frames
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;
    use crate::config::{JUMP_SPEED, TARGET_FPS, TIMER_HZ};
    use crate::dispatch::FrameDecimator;
    use crate::game::Phase;
    use crate::keyboard::{Us104Keymap, RELEASE_BIT};
    use crate::vga::Grid;

    const W: u8 = 0x11;

    fn arcade() -> Arcade<Grid, Us104Keymap> {
        Arcade::new(
            Grid::new(),
            Us104Keymap::new(),
            FrameDecimator::new(TIMER_HZ, TARGET_FPS),
        )
    }

    #[test]
    fn cells_are_lock_free() {
        // entry points must never spin on a lock held by the idle loop
        assert!(AtomicCell::<u32>::is_lock_free());
        assert!(AtomicCell::<u8>::is_lock_free());
        assert!(AtomicCell::<usize>::is_lock_free());
    }

    #[test]
    fn ticks_become_frames() {
        let mailbox = Mailbox::new();
        let mut a = arcade();
        for _ in 0..13 {
            mailbox.post_tick();
        }
        assert!(!mailbox.is_empty());

        assert_eq!(mailbox.drain(&mut a), 2);
        assert_eq!(a.game().tick, 2);
        assert!(mailbox.is_empty());

        // the leftover tick still counts toward the next frame
        for _ in 0..5 {
            mailbox.post_tick();
        }
        assert_eq!(mailbox.drain(&mut a), 1);
        assert_eq!(a.game().tick, 3);
    }

    #[test]
    fn keys_are_handled_before_ticks() {
        let mailbox = Mailbox::new();
        let mut a = arcade();
        a.game_mut().bird.velocity = 2;
        for _ in 0..6 {
            mailbox.post_tick();
        }
        mailbox.post_scan_code(W);

        assert_eq!(mailbox.drain(&mut a), 1);
        // jump applied, then one gravity step
        assert_eq!(a.game().bird.velocity, JUMP_SPEED + 1);
    }

    #[test]
    fn no_key_press_is_overwritten() {
        let mailbox = Mailbox::new();
        let mut a = arcade();
        a.game_mut().bird.velocity = 2;
        assert!(mailbox.post_scan_code(W));
        assert!(mailbox.post_scan_code(W | RELEASE_BIT));
        assert!(mailbox.post_scan_code(0x1E));

        assert_eq!(mailbox.drain(&mut a), 0);
        assert_eq!(a.game().bird.velocity, JUMP_SPEED);
        assert!(mailbox.is_empty());
    }

    #[test]
    fn full_ring_drops_newest() {
        let mailbox = Mailbox::new();
        for i in 0..SCAN_CODE_SLOTS as u8 {
            assert!(mailbox.post_scan_code(i));
        }
        assert!(!mailbox.post_scan_code(0x7F));

        assert_eq!(mailbox.take_scan_code(), Some(0));
        assert!(mailbox.post_scan_code(0x7F));
        let rest: Vec<u8> = std::iter::from_fn(|| mailbox.take_scan_code()).collect();
        assert_eq!(rest.len(), SCAN_CODE_SLOTS);
        assert_eq!(rest.last(), Some(&0x7F));
    }

    // Producers post while the consumer drains, as the entry points do
    // on hardware.
    #[test]
    fn drains_while_producers_post() {
        static MAILBOX: Mailbox = Mailbox::new();
        static DONE: AtomicBool = AtomicBool::new(false);

        let producer = thread::spawn(|| {
            for i in 0..60 {
                MAILBOX.post_tick();
                if i == 30 {
                    while !MAILBOX.post_scan_code(W) {
                        thread::yield_now();
                    }
                }
            }
            DONE.store(true, Ordering::SeqCst);
        });

        let mut a = arcade();
        let mut frames = 0;
        loop {
            let finished = DONE.load(Ordering::SeqCst);
            frames += MAILBOX.drain(&mut a);
            if finished && MAILBOX.is_empty() {
                break;
            }
            thread::yield_now();
        }
        producer.join().unwrap();

        assert_eq!(frames, 10);
        assert_eq!(a.game().tick, 10);
        assert_eq!(a.game().phase(), Phase::Playing);
    }
}
