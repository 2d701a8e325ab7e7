//! Driver for a CTD probe answering with `$AQCTD` NMEA sentences.
//!
//! The probe sits on one port of a serial multiplexer shared with other
//! instruments. Each acquisition the driver locks the multiplexer, routes it
//! to the probe and sends a fixed trigger packet. The probe measures for
//! about 1.5 seconds and answers with
//!
//! ```text
//! $AQCTD,<temperature>,<pressure>,<conductivity>*<checksum><CR><LF>
//! ```
//!
//! where temperature is in °C (ITS-90), pressure in bar absolute and
//! conductivity in mS/cm, each a signed decimal with two fractional digits.
//!
//! The UART receive interrupt stores the reply through [`SerialMux`] and calls
//! [`CtdEvents::reply_received`] when the line is complete. The scheduler
//! calls [`CtdEvents::trigger`] once per acquisition period.
pub mod nmea;
pub mod parser;

use crate::domain::{CtdReading, Status};
use crate::shared::{ReadingHandle, SharedReading};
use crate::traits::{
    clock::Rtc,
    logger::{DataLogger, LogSource},
    serial::{PortId, SerialMux},
};
use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex, signal::Signal};
use embassy_time::{with_timeout, Duration};

/// Packet that starts one acquisition. Binary, not text.
pub const TRIGGER_PACKET: [u8; 15] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xaa, 0x00, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6c,
];

const SCHEDULER_TICK_MS: u64 = 10;
const REPLY_TIMEOUT_TICKS: u64 = 200;

/// How long to wait for a reply after the trigger packet.
pub const DEFAULT_REPLY_TIMEOUT: Duration =
    Duration::from_millis(REPLY_TIMEOUT_TICKS * SCHEDULER_TICK_MS);

/// Multiplexer port the probe is wired to.
pub const CTD_PORT: PortId = PortId(1);

/// Why a reply was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// No `$AQCTD` sentence in the receive buffer.
    FrameNotFound,
    /// The checksum field is missing, unreadable or wrong.
    ChecksumMismatch,
    /// Fewer than three fields in the sentence.
    MalformedField,
}

/// Settings for a [`Ctd`] driver.
#[derive(Debug, Clone, Copy)]
pub struct CtdConfig {
    /// How long to wait for a reply after triggering.
    pub reply_timeout: Duration,
    /// Multiplexer port the probe is wired to.
    pub port: PortId,
}

impl CtdConfig {
    pub const fn new() -> Self {
        Self {
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            port: CTD_PORT,
        }
    }

    pub fn reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    pub fn port(mut self, port: PortId) -> Self {
        self.port = port;
        self
    }
}

impl Default for CtdConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Wake-ups delivered to the driver from outside its task.
pub struct CtdEvents<M: RawMutex> {
    reply: Signal<M, ()>,
    trigger: Signal<M, ()>,
}

impl<M: RawMutex> CtdEvents<M> {
    pub const fn new() -> Self {
        Self {
            reply: Signal::new(),
            trigger: Signal::new(),
        }
    }

    /// A complete reply line is in the receive buffer.
    pub fn reply_received(&self) {
        self.reply.signal(());
    }

    /// Start the next acquisition.
    pub fn trigger(&self) {
        self.trigger.signal(());
    }

    /// Whether a trigger is waiting to be consumed.
    pub fn trigger_pending(&self) -> bool {
        self.trigger.signaled()
    }
}

impl<M: RawMutex> Default for CtdEvents<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CtdState {
    /// Probing for the instrument before the first acquisition.
    Startup,
    /// Trigger packet being sent.
    Arming,
    /// Waiting for the reply signal.
    AwaitingReply,
    /// Validating and parsing the reply.
    Evaluating,
    /// Reporting and waiting for the next trigger.
    Idle,
    /// The instrument never answered at startup; no further acquisitions.
    Dormant,
}

/// Validate the sentence in `buf` and store its measurements in `reading`.
pub fn read_values(buf: &[u8], reading: &mut CtdReading) -> Result<(), FrameError> {
    let sentence = nmea::validate(buf)?;
    parser::parse_into(sentence, reading)
}

/// Acquisition driver for one CTD probe.
pub struct Ctd<'a, M, S, L, C>
where
    M: RawMutex,
    S: SerialMux,
    L: DataLogger,
    C: Rtc,
{
    serial: &'a Mutex<M, S>,
    reading: &'a SharedReading<M>,
    events: &'a CtdEvents<M>,
    logger: L,
    clock: C,
    config: CtdConfig,
    state: CtdState,
}

impl<'a, M, S, L, C> Ctd<'a, M, S, L, C>
where
    M: RawMutex,
    S: SerialMux,
    L: DataLogger,
    C: Rtc,
{
    pub fn new(
        serial: &'a Mutex<M, S>,
        reading: &'a SharedReading<M>,
        events: &'a CtdEvents<M>,
        logger: L,
        clock: C,
        config: CtdConfig,
    ) -> Self {
        Self {
            serial,
            reading,
            events,
            logger,
            clock,
            config,
            state: CtdState::Startup,
        }
    }

    pub fn state(&self) -> CtdState {
        self.state
    }

    pub fn reading(&self) -> ReadingHandle<'a, M> {
        self.reading.handle()
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Probe for the instrument once, then acquire on every trigger.
    ///
    /// If the probe stays silent at startup the driver logs it and parks
    /// for good, unlike a silence later on which only skips one cycle.
    pub async fn run(&mut self) -> ! {
        if !self.startup().await {
            loop {
                core::future::pending::<()>().await;
            }
        }

        let events = self.events;
        loop {
            events.trigger.wait().await;
            self.cycle().await;
        }
    }

    /// Trigger the probe once to check it is there. The reply is not evaluated.
    ///
    /// Returns `false`, after logging [`Status::Silence`], if nothing came back.
    pub async fn startup(&mut self) -> bool {
        let serial = self.serial;
        let replied = {
            let mut port = serial.lock().await;
            self.trigger_and_wait(&mut port).await
        };

        if replied {
            info!("CTD answered at startup");
            self.enter(CtdState::Idle);
            return true;
        }

        warn!("CTD did not answer at startup, no further acquisitions");
        self.reading.lock().await.set_status(Status::Silence);
        self.logger.log_status(LogSource::Ctd, Status::Silence).await;
        self.enter(CtdState::Dormant);
        false
    }

    /// One full acquisition: trigger, wait, evaluate, report.
    pub async fn cycle(&mut self) -> Status {
        let serial = self.serial;
        let shared = self.reading;

        let mut port = serial.lock().await;
        let replied = self.trigger_and_wait(&mut port).await;
        let (status, committed) = {
            let mut reading = shared.lock().await;
            let status = if replied {
                self.enter(CtdState::Evaluating);
                match port.with_received(|buf| read_values(buf, &mut reading)) {
                    Ok(()) => Status::Ok,
                    Err(e) => {
                        warn!("Rejected CTD reply: {:?}", e);
                        Status::Invalid
                    }
                }
            } else {
                warn!("No reply from CTD");
                Status::Silence
            };
            reading.set_status(status);
            if status == Status::Ok {
                reading.stamp(self.clock.now());
            }
            (status, *reading)
        };
        drop(port);

        self.enter(CtdState::Idle);
        self.report(&committed).await;
        status
    }

    async fn trigger_and_wait(&mut self, port: &mut S) -> bool {
        if self.state != CtdState::Startup {
            self.enter(CtdState::Arming);
        }
        self.events.reply.reset();
        port.reset_rx();
        port.switch_port(self.config.port);
        if port.write_all(&TRIGGER_PACKET).await.is_err() {
            error!("Unable to send CTD trigger packet");
            return false;
        }

        if self.state != CtdState::Startup {
            self.enter(CtdState::AwaitingReply);
        }
        with_timeout(self.config.reply_timeout, self.events.reply.wait())
            .await
            .is_ok()
    }

    async fn report(&mut self, reading: &CtdReading) {
        match reading.status() {
            Status::Ok => {
                debug!("CTD reading: {:?}", reading);
                self.logger.log_ctd(reading).await;
            }
            status => self.logger.log_status(LogSource::Ctd, status).await,
        }
    }

    fn enter(&mut self, state: CtdState) {
        trace!("CTD {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
