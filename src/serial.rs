use core::fmt::{self, Write};

use lazy_static::lazy_static;
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;
use x86_64::instructions::interrupts;

use crate::config::COM1;
use crate::interrupts::io::{IoPorts, PortBus};

// register offsets from the base port
const DATA: u16 = 0;
const INT_ENABLE: u16 = 1;
const FIFO_CTRL: u16 = 2;
const LINE_CTRL: u16 = 3;
const MODEM_CTRL: u16 = 4;
const LINE_STATUS: u16 = 5;

const TRANSMIT_EMPTY: u8 = 0x20;

/// A 16550 UART, write only.
pub struct SerialPort<P> {
    ports: P,
    base: u16,
}

impl<P: PortBus> SerialPort<P> {
    pub const fn new(ports: P, base: u16) -> Self {
        Self { ports, base }
    }

    /// 38400 baud, 8N1, FIFOs on, no UART interrupts.
    pub fn init(&mut self) {
        self.out(INT_ENABLE, 0x00);
        // DLAB on, divisor 3
        self.out(LINE_CTRL, 0x80);
        self.out(DATA, 0x03);
        self.out(INT_ENABLE, 0x00);
        self.out(LINE_CTRL, 0x03);
        self.out(FIFO_CTRL, 0xC7);
        self.out(MODEM_CTRL, 0x0B);
    }

    pub fn send(&mut self, byte: u8) {
        while self.ports.read_u8(self.base + LINE_STATUS) & TRANSMIT_EMPTY == 0 {
            core::hint::spin_loop();
        }
        self.out(DATA, byte);
    }

    fn out(&mut self, register: u16, value: u8) {
        self.ports.write_u8(self.base + register, value);
    }
}

impl<P: PortBus> Write for SerialPort<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}

/// Sends through a shared port one byte per critical section, so a long
/// line never holds interrupts off for more than a character time.
struct BytewiseWriter<'a, P, C> {
    port: &'a Mutex<SerialPort<P>>,
    critical: C,
}

impl<P, C> Write for BytewiseWriter<'_, P, C>
where
    P: PortBus,
    C: FnMut(&mut dyn FnMut()),
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let port = self.port;
        for b in s.bytes() {
            (self.critical)(&mut || port.lock().send(b));
        }
        Ok(())
    }
}

lazy_static! {
    static ref SERIAL1: Mutex<SerialPort<IoPorts>> = {
        let mut port = SerialPort::new(IoPorts, COM1);
        port.init();
        Mutex::new(port)
    };
}

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // the lock must not be held when an interrupt comes in
        let mut out = BytewiseWriter {
            port: &SERIAL1,
            critical: |send: &mut dyn FnMut()| interrupts::without_interrupts(send),
        };
        let _ = writeln!(
            out,
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Sends `log` output to COM1. Only the first call has any effect.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupts::io::tests::FakePorts;

    #[test]
    fn init_programs_the_uart() {
        let mut port = SerialPort::new(FakePorts::default(), 0x3F8);
        port.init();
        assert_eq!(
            port.ports.writes,
            [
                (0x3F9, 0x00),
                (0x3FB, 0x80),
                (0x3F8, 0x03),
                (0x3F9, 0x00),
                (0x3FB, 0x03),
                (0x3FA, 0xC7),
                (0x3FC, 0x0B),
            ]
        );
    }

    #[test]
    fn text_goes_to_the_data_register() {
        let mut ports = FakePorts::default();
        ports.input(0x3FD, TRANSMIT_EMPTY);
        let mut port = SerialPort::new(ports, 0x3F8);
        write!(port, "ok {}", 7).unwrap();
        assert_eq!(
            port.ports.writes,
            [(0x3F8, b'o'), (0x3F8, b'k'), (0x3F8, b' '), (0x3F8, b'7')]
        );
    }

    #[test]
    fn lock_is_released_between_bytes() {
        let mut ports = FakePorts::default();
        ports.input(0x3FD, TRANSMIT_EMPTY);
        let port = Mutex::new(SerialPort::new(ports, 0x3F8));
        let mut sections = 0;
        let mut out = BytewiseWriter {
            port: &port,
            critical: |send: &mut dyn FnMut()| {
                assert!(!port.is_locked());
                sections += 1;
                send();
            },
        };

        writeln!(out, "[INFO ] run over").unwrap();

        assert_eq!(sections, 17);
        let sent: Vec<u8> = port.lock().ports.writes.iter().map(|&(_, b)| b).collect();
        assert_eq!(sent, b"[INFO ] run over\n");
    }
}
