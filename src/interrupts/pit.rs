use core::fmt;

use super::io::PortBus;

// https://wiki.osdev.org/Programmable_Interval_Timer
const CHANNEL0_DATA: u16 = 0x40;
const COMMAND: u16 = 0x43;

/// Channel 0, lobyte/hibyte access, mode 3 (square wave), binary.
const SQUARE_WAVE: u8 = 0x36;

pub const INPUT_CLOCK_HZ: u32 = 1_193_182;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    FrequencyOutOfRange(u32),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::FrequencyOutOfRange(hz) => {
                write!(f, "{hz} Hz does not fit the 16 bit PIT divisor")
            }
        }
    }
}

/// Countdown divisor for `hz`, if the PIT can produce it.
pub fn divisor(hz: u32) -> Result<u16, TimerError> {
    if hz == 0 {
        return Err(TimerError::FrequencyOutOfRange(hz));
    }
    match u16::try_from(INPUT_CLOCK_HZ / hz) {
        Ok(0) | Err(_) => Err(TimerError::FrequencyOutOfRange(hz)),
        Ok(d) => Ok(d),
    }
}

pub struct PeriodicTimer<P> {
    ports: P,
}

impl<P: PortBus> PeriodicTimer<P> {
    pub const fn new(ports: P) -> Self {
        Self { ports }
    }

    /// Arms channel 0 to fire `hz` times a second, forever.
    pub fn configure(&mut self, hz: u32) -> Result<u16, TimerError> {
        let divisor = divisor(hz)?;
        let [low, high] = divisor.to_le_bytes();
        self.ports.write_u8(COMMAND, SQUARE_WAVE);
        self.ports.write_u8(CHANNEL0_DATA, low);
        self.ports.write_u8(CHANNEL0_DATA, high);
        Ok(divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupts::io::tests::FakePorts;

    #[test]
    fn hundred_hertz() {
        let mut pit = PeriodicTimer::new(FakePorts::default());
        assert_eq!(pit.configure(100), Ok(11931));
        assert_eq!(pit.ports.writes, [(0x43, 0x36), (0x40, 0x9B), (0x40, 0x2E)]);
    }

    #[test]
    fn rejects_what_the_divisor_cannot_hold() {
        assert_eq!(divisor(0), Err(TimerError::FrequencyOutOfRange(0)));
        assert_eq!(divisor(18), Err(TimerError::FrequencyOutOfRange(18)));
        assert_eq!(divisor(2_000_000), Err(TimerError::FrequencyOutOfRange(2_000_000)));
        assert_eq!(divisor(19), Ok(62799));
        assert_eq!(divisor(INPUT_CLOCK_HZ), Ok(1));
    }

    #[test]
    fn nothing_written_on_error() {
        let mut pit = PeriodicTimer::new(FakePorts::default());
        assert!(pit.configure(1).is_err());
        assert!(pit.ports.writes.is_empty());
    }
}
