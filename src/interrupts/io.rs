use x86_64::instructions::port::Port;

/// Byte-wide port I/O.
pub trait PortBus {
    fn write_u8(&mut self, port: u16, value: u8);
    fn read_u8(&mut self, port: u16) -> u8;
}

/// The real x86 I/O space.
#[derive(Debug, Default, Clone, Copy)]
pub struct IoPorts;

impl PortBus for IoPorts {
    fn write_u8(&mut self, port: u16, value: u8) {
        let mut port = Port::new(port);
        unsafe { port.write(value) };
    }

    fn read_u8(&mut self, port: u16) -> u8 {
        let mut port = Port::new(port);
        unsafe { port.read() }
    }
}
