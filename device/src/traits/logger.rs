use crate::domain::{CtdReading, Status};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;

/// Origin of a status entry in the data log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogSource {
    Ctd,
}

/// One record handed to the persistence subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogEntry {
    Ctd(CtdReading),
    Status(LogSource, Status),
}

/// The data logging subsystem. Drivers never persist data themselves.
pub trait DataLogger {
    /// Record a complete, time-stamped CTD reading.
    async fn log_ctd(&mut self, reading: &CtdReading);

    /// Record a status or error event for `source`.
    async fn log_status(&mut self, source: LogSource, status: Status);
}

/// A [`DataLogger`] that hands entries to the persistence task over a channel.
pub struct ChannelLogger<'a, M: RawMutex, const N: usize> {
    sender: Sender<'a, M, LogEntry, N>,
}

impl<'a, M: RawMutex, const N: usize> ChannelLogger<'a, M, N> {
    pub fn new(sender: Sender<'a, M, LogEntry, N>) -> Self {
        Self { sender }
    }
}

impl<'a, M: RawMutex, const N: usize> DataLogger for ChannelLogger<'a, M, N> {
    async fn log_ctd(&mut self, reading: &CtdReading) {
        self.sender.send(LogEntry::Ctd(*reading)).await;
    }

    async fn log_status(&mut self, source: LogSource, status: Status) {
        self.sender.send(LogEntry::Status(source, status)).await;
    }
}
