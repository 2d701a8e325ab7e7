use heapless::Vec;

/// Line settings the CTD probe expects: 9600 baud, 8 data bits, no parity, 1 stop bit.
pub const SERIAL_BAUDRATE: u32 = 9600;

/// A port on the serial multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortId(pub u8);

/// A serial line shared by several instruments through a multiplexer.
///
/// Exclusive ownership is not part of this trait: clients hold the
/// multiplexer behind an `embassy_sync::mutex::Mutex` and keep it locked for
/// the duration of an exchange.
pub trait SerialMux {
    type Error;

    /// Route the physical line to `port`.
    fn switch_port(&mut self, port: PortId);

    /// Rewind the receive buffer so the next reply is stored from its start.
    fn reset_rx(&mut self);

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Run `f` over the bytes received since the last [`SerialMux::reset_rx`].
    fn with_received<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R;
}

/// Fixed-size receive buffer filled by the UART receive interrupt.
pub struct RxBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> RxBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Store one received byte. Returns `true` when the byte terminates a line.
    ///
    /// Bytes that do not fit are dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        let _ = self.buf.push(byte);
        byte == b'\n'
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_reports_line_end() {
        let mut rx: RxBuffer<16> = RxBuffer::new();
        assert!(!rx.push(b'$'));
        assert!(!rx.push(b'\r'));
        assert!(rx.push(b'\n'));
        assert_eq!(b"$\r\n", rx.as_slice());

        rx.reset();
        assert!(rx.as_slice().is_empty());
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut rx: RxBuffer<4> = RxBuffer::new();
        for b in b"abcdef" {
            rx.push(*b);
        }
        assert!(rx.is_full());
        assert_eq!(b"abcd", rx.as_slice());
    }
}
