use super::depth;
use super::units::{Bar, Celsius, MilliSiemensPerCm, Quantity};

/// Scale of the fixed-point representation used for stored and logged measurements.
///
/// A field holding `12340` means `12.340` in the field's unit.
pub const FIXED_POINT_SCALE: i32 = 1000;

/// Seconds as reported by the real-time clock.
pub type Timestamp = u32;

/// Outcome of the most recent acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// A valid reply was received and parsed.
    Ok,
    /// A reply was received but failed checksum or field parsing.
    Invalid,
    /// No reply arrived before the timeout.
    Silence,
}

/// The three fixed-point fields extracted from one reply.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurements {
    pub temperature: i32,
    pub pressure: i32,
    pub conductivity: i32,
}

/// The single CTD record owned by the acquisition driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtdReading {
    measurements: Measurements,
    status: Status,
    timestamp: Timestamp,
}

impl CtdReading {
    pub const fn new() -> Self {
        Self {
            measurements: Measurements {
                temperature: 0,
                pressure: 0,
                conductivity: 0,
            },
            status: Status::Invalid,
            timestamp: 0,
        }
    }

    pub fn measurements(&self) -> Measurements {
        self.measurements
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Time of the last successful acquisition, `None` unless the status is [`Status::Ok`].
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self.status {
            Status::Ok => Some(self.timestamp),
            _ => None,
        }
    }

    pub fn temperature(&self) -> Quantity<Celsius> {
        Quantity::from_fixed(self.measurements.temperature)
    }

    /// Absolute pressure, atmosphere included.
    pub fn pressure(&self) -> Quantity<Bar> {
        Quantity::from_fixed(self.measurements.pressure)
    }

    pub fn conductivity(&self) -> Quantity<MilliSiemensPerCm> {
        Quantity::from_fixed(self.measurements.conductivity)
    }

    /// Depth in meters below the surface at the given latitude.
    ///
    /// See [`depth::depth`] for the standard-ocean assumption this relies on.
    pub fn depth(&self, latitude: f32) -> f32 {
        depth::depth(self.pressure().raw_value(), latitude)
    }

    pub(crate) fn apply(&mut self, measurements: Measurements) {
        self.measurements = measurements;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn stamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }
}

impl Default for CtdReading {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_reading_is_invalid() {
        let reading = CtdReading::new();
        assert_eq!(Status::Invalid, reading.status());
        assert_eq!(Measurements::default(), reading.measurements());
        assert_eq!(None, reading.timestamp());
    }

    #[test]
    fn test_timestamp_only_visible_when_ok() {
        let mut reading = CtdReading::new();
        reading.stamp(1234);
        assert_eq!(None, reading.timestamp());

        reading.set_status(Status::Ok);
        assert_eq!(Some(1234), reading.timestamp());

        reading.set_status(Status::Silence);
        assert_eq!(None, reading.timestamp());
    }

    #[test]
    fn test_typed_accessors() {
        let mut reading = CtdReading::new();
        reading.apply(Measurements {
            temperature: -1250,
            pressure: 11101,
            conductivity: 45670,
        });
        assert!((reading.temperature().raw_value() + 1.25).abs() < 1e-6);
        assert!((reading.pressure().raw_value() - 11.101).abs() < 1e-4);
        assert!((reading.conductivity().raw_value() - 45.67).abs() < 1e-4);
        // ~100 dbar of water above the probe
        let depth = reading.depth(45.0);
        assert!(depth > 98.0 && depth < 100.0, "depth = {}", depth);
    }
}
