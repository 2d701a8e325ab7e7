use crate::domain::Timestamp;
use embassy_time::Instant;

/// The real-time clock, consulted when stamping a successful reading.
pub trait Rtc {
    fn now(&mut self) -> Timestamp;
}

/// An [`Rtc`] counting seconds since boot, for boards without a calendar clock.
pub struct UptimeClock;

impl Rtc for UptimeClock {
    fn now(&mut self) -> Timestamp {
        Instant::now().as_secs() as Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_clock_does_not_go_back() {
        let mut clock = UptimeClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
