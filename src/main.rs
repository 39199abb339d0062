#![no_std]
#![no_main]
#![feature(abi_x86_interrupt)]

use core::panic::PanicInfo;

use bootloader::{entry_point, BootInfo};
use log::{error, info};
use spin::Mutex;
use x86_64::instructions::{hlt, interrupts};
use x86_64::structures::idt::{HandlerFunc, InterruptStackFrame};

use crappy_bird::boot::{arm_interrupts, BootError};
use crappy_bird::config::{KEYBOARD_VECTOR, TARGET_FPS, TIMER_HZ, TIMER_VECTOR};
use crappy_bird::dispatch::{Arcade, FrameDecimator};
use crappy_bird::interrupts::io::IoPorts;
use crappy_bird::interrupts::pic::ChainedPic;
use crappy_bird::interrupts::pit::PeriodicTimer;
use crappy_bird::interrupts::InterruptTable;
use crappy_bird::keyboard::{read_scan_code, Us104Keymap};
use crappy_bird::mailbox::Mailbox;
use crappy_bird::vga::VgaBuffer;

entry_point!(kernel_main);

static MAILBOX: Mailbox = Mailbox::new();
// only ever locked from the entry points below (interrupts off) or before sti
static PICS: Mutex<ChainedPic<IoPorts>> = Mutex::new(ChainedPic::new(IoPorts));

fn kernel_main(_boot_info: &'static BootInfo) -> ! {
    #[cfg(feature = "serial-log")]
    crappy_bird::serial::init(log::LevelFilter::Info);

    if let Err(e) = boot() {
        error!("boot failed: {e}");
        halt();
    }

    // the bootloader identity maps the frame buffer, and this is the only handle to it
    let vga = unsafe { VgaBuffer::new() };
    let arcade = Arcade::new(
        vga,
        Us104Keymap::new(),
        FrameDecimator::new(TIMER_HZ, TARGET_FPS),
    );
    info!("running");
    cpu_loop(arcade)
}

fn boot() -> Result<(), BootError> {
    let mut table: InterruptTable<HandlerFunc, 2> = InterruptTable::new();
    table.install(TIMER_VECTOR, timer_entry)?;
    table.install(KEYBOARD_VECTOR, keyboard_entry)?;
    table.load();
    info!("interrupt table loaded ({} vectors)", table.len());

    // the guard is dropped before sti, or the first tick would deadlock
    arm_interrupts(&mut *PICS.lock(), &mut PeriodicTimer::new(IoPorts))?;
    interrupts::enable();
    Ok(())
}

fn cpu_loop(mut arcade: Arcade<VgaBuffer, Us104Keymap>) -> ! {
    loop {
        MAILBOX.drain(&mut arcade);

        // sleep, unless something arrived during the drain
        interrupts::disable();
        if MAILBOX.is_empty() {
            interrupts::enable_and_hlt();
        } else {
            interrupts::enable();
        }
    }
}

extern "x86-interrupt" fn timer_entry(_frame: InterruptStackFrame) {
    MAILBOX.post_tick();
    PICS.lock().end_of_interrupt(TIMER_VECTOR);
}

extern "x86-interrupt" fn keyboard_entry(_frame: InterruptStackFrame) {
    if let Some(code) = read_scan_code(&mut IoPorts) {
        MAILBOX.post_scan_code(code);
    }
    PICS.lock().end_of_interrupt(KEYBOARD_VECTOR);
}

fn halt() -> ! {
    interrupts::disable();
    loop {
        hlt();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!("{info}");
    halt()
}
