use core::fmt;

use log::info;

use crate::config::{IRQ_MASK, PIC_1_OFFSET, PIC_2_OFFSET, TIMER_HZ};
use crate::interrupts::io::PortBus;
use crate::interrupts::pic::ChainedPic;
use crate::interrupts::pit::{PeriodicTimer, TimerError};
use crate::interrupts::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    Install(InstallError),
    Timer(TimerError),
}

impl From<InstallError> for BootError {
    fn from(e: InstallError) -> Self {
        BootError::Install(e)
    }
}

impl From<TimerError> for BootError {
    fn from(e: TimerError) -> Self {
        BootError::Timer(e)
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::Install(e) => write!(f, "interrupt table: {e}"),
            BootError::Timer(e) => write!(f, "timer: {e}"),
        }
    }
}

/// Remaps the PICs, arms the PIT and only then opens the timer and
/// keyboard lines. Returns the PIT divisor.
pub fn arm_interrupts<P: PortBus, Q: PortBus>(
    pic: &mut ChainedPic<P>,
    timer: &mut PeriodicTimer<Q>,
) -> Result<u16, BootError> {
    pic.configure(PIC_1_OFFSET, PIC_2_OFFSET);
    let divisor = timer.configure(TIMER_HZ)?;
    info!("PIT at {} Hz (divisor {})", TIMER_HZ, divisor);
    pic.set_mask(IRQ_MASK);
    info!("PIC lines open: {:#06x}", !IRQ_MASK);
    Ok(divisor)
}
