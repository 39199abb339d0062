use super::io::PortBus;

// https://wiki.osdev.org/8259_PIC
const MASTER_COMMAND: u16 = 0x20;
const MASTER_DATA: u16 = 0x21;
const SLAVE_COMMAND: u16 = 0xA0;
const SLAVE_DATA: u16 = 0xA1;

const ICW1_INIT: u8 = 0x11; // edge triggered, cascade, ICW4 follows
const ICW4_8086: u8 = 0x01;
const END_OF_INTERRUPT: u8 = 0x20;

// slave hangs off master line 2
const MASTER_CASCADE: u8 = 1 << 2;
const SLAVE_IDENTITY: u8 = 2;

/// The master/slave 8259 pair.
pub struct ChainedPic<P> {
    ports: P,
    offsets: (u8, u8),
}

impl<P: PortBus> ChainedPic<P> {
    pub const fn new(ports: P) -> Self {
        Self {
            ports,
            offsets: (0x08, 0x70),
        }
    }

    /// Moves the master's lines to `offset1..offset1 + 8` and the slave's
    /// to `offset2..offset2 + 8`, wires up the cascade and leaves every
    /// line masked.
    pub fn configure(&mut self, offset1: u8, offset2: u8) {
        self.offsets = (offset1, offset2);

        self.ports.write_u8(MASTER_COMMAND, ICW1_INIT);
        self.ports.write_u8(SLAVE_COMMAND, ICW1_INIT);

        self.ports.write_u8(MASTER_DATA, offset1);
        self.ports.write_u8(SLAVE_DATA, offset2);

        self.ports.write_u8(MASTER_DATA, MASTER_CASCADE);
        self.ports.write_u8(SLAVE_DATA, SLAVE_IDENTITY);

        self.ports.write_u8(MASTER_DATA, ICW4_8086);
        self.ports.write_u8(SLAVE_DATA, ICW4_8086);

        self.set_mask(0xFFFF);
    }

    /// A set bit masks the line. Low byte is the master, high byte the slave.
    pub fn set_mask(&mut self, mask: u16) {
        let [master, slave] = mask.to_le_bytes();
        self.ports.write_u8(MASTER_DATA, master);
        self.ports.write_u8(SLAVE_DATA, slave);
    }

    pub fn handles(&self, vector: u8) -> bool {
        self.is_master(vector) || self.is_slave(vector)
    }

    pub fn end_of_interrupt(&mut self, vector: u8) {
        if self.is_slave(vector) {
            self.ports.write_u8(SLAVE_COMMAND, END_OF_INTERRUPT);
        }
        if self.handles(vector) {
            self.ports.write_u8(MASTER_COMMAND, END_OF_INTERRUPT);
        }
    }

    pub fn ports(&mut self) -> &mut P {
        &mut self.ports
    }

    fn is_master(&self, vector: u8) -> bool {
        (self.offsets.0..self.offsets.0.saturating_add(8)).contains(&vector)
    }

    fn is_slave(&self, vector: u8) -> bool {
        (self.offsets.1..self.offsets.1.saturating_add(8)).contains(&vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupts::io::tests::FakePorts;

    fn configured() -> ChainedPic<FakePorts> {
        let mut pic = ChainedPic::new(FakePorts::default());
        pic.configure(0x20, 0x28);
        pic.ports().writes.clear();
        pic
    }

    #[test]
    fn initialisation_sequence() {
        let mut pic = ChainedPic::new(FakePorts::default());
        pic.configure(0x20, 0x28);
        assert_eq!(
            pic.ports().writes,
            [
                (0x20, 0x11),
                (0xA0, 0x11),
                (0x21, 0x20),
                (0xA1, 0x28),
                (0x21, 0x04),
                (0xA1, 0x02),
                (0x21, 0x01),
                (0xA1, 0x01),
                (0x21, 0xFF),
                (0xA1, 0xFF),
            ]
        );
    }

    #[test]
    fn only_timer_and_keyboard_unmasked() {
        let mut pic = configured();
        pic.set_mask(crate::config::IRQ_MASK);
        assert_eq!(pic.ports().writes, [(0x21, 0xFC), (0xA1, 0xFF)]);
    }

    #[test]
    fn eoi_goes_to_the_right_chips() {
        let mut pic = configured();
        pic.end_of_interrupt(0x21);
        assert_eq!(pic.ports().writes, [(0x20, 0x20)]);

        pic.ports().writes.clear();
        pic.end_of_interrupt(0x2C);
        assert_eq!(pic.ports().writes, [(0xA0, 0x20), (0x20, 0x20)]);

        pic.ports().writes.clear();
        pic.end_of_interrupt(0x80);
        assert!(pic.ports().writes.is_empty());
    }

    #[test]
    fn vector_ranges() {
        let pic = configured();
        assert!(pic.handles(0x20));
        assert!(pic.handles(0x2F));
        assert!(!pic.handles(0x1F));
        assert!(!pic.handles(0x30));
    }
}
