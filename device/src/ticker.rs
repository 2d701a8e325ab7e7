use crate::drivers::sensors::ctd::CtdEvents;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker};

/// Default acquisition period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Periodically asks the CTD driver for a new acquisition.
///
/// A trigger that arrives while the driver is still busy is merged with the
/// pending one, so a slow probe never builds up a backlog.
pub struct Trigger<'a, M: RawMutex> {
    events: &'a CtdEvents<M>,
    interval: Duration,
}

impl<'a, M: RawMutex> Trigger<'a, M> {
    pub fn new(events: &'a CtdEvents<M>, interval: Duration) -> Self {
        Self { events, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(self.interval);
        loop {
            ticker.next().await;
            trace!("CTD acquisition due");
            self.events.trigger();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::select::{select, Either};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::Timer;
    use futures::executor::block_on;

    #[test]
    fn test_trigger_fires_after_interval() {
        let events: CtdEvents<NoopRawMutex> = CtdEvents::new();
        let mut trigger = Trigger::new(&events, Duration::from_millis(10));
        assert!(!events.trigger_pending());

        let r = block_on(select(trigger.run(), Timer::after(Duration::from_millis(50))));
        assert!(matches!(r, Either::Second(())));
        assert!(events.trigger_pending());
    }
}
