//! Test doubles for the CTD driver's collaborators.
use crate::domain::{CtdReading, Status, Timestamp};
use crate::drivers::sensors::ctd::{nmea::checksum, CtdEvents, TRIGGER_PACKET};
use crate::traits::{
    clock::Rtc,
    logger::{DataLogger, LogEntry, LogSource},
    serial::{PortId, RxBuffer, SerialMux},
};
use core::cell::{Cell, RefCell};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use std::string::String;
use std::vec::Vec;

const RX_CAPACITY: usize = 256;

/// A simulated multiplexed serial line.
///
/// The driver talks to it through a [`TestSerial`]; the test plays the part
/// of the receive interrupt through [`TestLine::receive`].
pub struct TestLine {
    rx: RefCell<RxBuffer<RX_CAPACITY>>,
    sent: RefCell<Vec<(Option<PortId>, Vec<u8>)>>,
    port: Cell<Option<PortId>>,
    rx_resets: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl TestLine {
    pub fn new() -> Self {
        Self {
            rx: RefCell::new(RxBuffer::new()),
            sent: RefCell::new(Vec::new()),
            port: Cell::new(None),
            rx_resets: Cell::new(0),
            fail_writes: Cell::new(false),
        }
    }

    pub fn serial(&self) -> TestSerial<'_> {
        TestSerial { line: self }
    }

    /// Feed bytes as the receive interrupt would. Returns `true` if a line was completed.
    pub fn receive(&self, bytes: &[u8]) -> bool {
        let mut rx = self.rx.borrow_mut();
        let mut complete = false;
        for b in bytes {
            complete |= rx.push(*b);
        }
        complete
    }

    /// Feed `reply` and signal the driver once a full line is in.
    pub fn reply<M: RawMutex>(&self, events: &CtdEvents<M>, reply: &[u8]) {
        if self.receive(reply) {
            events.reply_received();
        }
    }

    /// Wait until `count` trigger packets have been written, then answer with `reply`.
    pub async fn answer<M: RawMutex>(&self, events: &CtdEvents<M>, count: usize, reply: &[u8]) {
        while self.triggers() < count {
            Timer::after(Duration::from_millis(1)).await;
        }
        self.reply(events, reply);
    }

    /// Everything written so far, with the port selected at the time.
    pub fn sent(&self) -> Vec<(Option<PortId>, Vec<u8>)> {
        self.sent.borrow().clone()
    }

    pub fn triggers(&self) -> usize {
        self.sent
            .borrow()
            .iter()
            .filter(|(_, bytes)| bytes[..] == TRIGGER_PACKET[..])
            .count()
    }

    pub fn port(&self) -> Option<PortId> {
        self.port.get()
    }

    pub fn rx_resets(&self) -> usize {
        self.rx_resets.get()
    }

    /// Make every following write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl Default for TestLine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestWriteError;

pub struct TestSerial<'a> {
    line: &'a TestLine,
}

impl<'a> SerialMux for TestSerial<'a> {
    type Error = TestWriteError;

    fn switch_port(&mut self, port: PortId) {
        self.line.port.set(Some(port));
    }

    fn reset_rx(&mut self) {
        self.line.rx.borrow_mut().reset();
        self.line.rx_resets.set(self.line.rx_resets.get() + 1);
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.line.fail_writes.get() {
            return Err(TestWriteError);
        }
        self.line
            .sent
            .borrow_mut()
            .push((self.line.port.get(), bytes.to_vec()));
        Ok(())
    }

    fn with_received<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self.line.rx.borrow().as_slice())
    }
}

/// A [`DataLogger`] that keeps everything in memory.
#[derive(Default)]
pub struct TestLogger {
    entries: Vec<LogEntry>,
}

impl TestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl DataLogger for TestLogger {
    async fn log_ctd(&mut self, reading: &CtdReading) {
        self.entries.push(LogEntry::Ctd(*reading));
    }

    async fn log_status(&mut self, source: LogSource, status: Status) {
        self.entries.push(LogEntry::Status(source, status));
    }
}

/// An [`Rtc`] that advances by one second each time it is read.
pub struct TestClock {
    next: Timestamp,
}

impl TestClock {
    pub fn starting_at(next: Timestamp) -> Self {
        Self { next }
    }
}

impl Rtc for TestClock {
    fn now(&mut self) -> Timestamp {
        let now = self.next;
        self.next += 1;
        now
    }
}

/// Frame `body` as a complete `$...*hh\r\n` sentence.
pub fn checksummed(body: &str) -> String {
    std::format!("${}*{:02X}\r\n", body, checksum(body.as_bytes()))
}
