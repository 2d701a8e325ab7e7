//! Types and traits related to the physical quantities a CTD probe reports.

use super::reading::FIXED_POINT_SCALE;
use core::fmt::{Debug, Display, Formatter};
use core::marker::PhantomData;
use core::ops::{Add, Sub};

/// Trait representing the unit a quantity is measured in.
pub trait Unit: Send {
    const SYMBOL: &'static str;
}

/// Discriminant for temperatures in degrees _Celsius_ (ITS-90).
#[derive(Clone, Copy)]
pub struct Celsius;

impl Unit for Celsius {
    const SYMBOL: &'static str = "°C";
}

/// Discriminant for absolute pressure in _bar_.
#[derive(Clone, Copy)]
pub struct Bar;

impl Unit for Bar {
    const SYMBOL: &'static str = "bar";
}

/// Discriminant for electrical conductivity in _millisiemens per centimeter_.
#[derive(Clone, Copy)]
pub struct MilliSiemensPerCm;

impl Unit for MilliSiemensPerCm {
    const SYMBOL: &'static str = "mS/cm";
}

/// A measured value with its associated unit.
pub struct Quantity<U: Unit> {
    value: f32,
    _marker: PhantomData<U>,
}

impl<U: Unit> Quantity<U> {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Converts a fixed-point field (value × [`FIXED_POINT_SCALE`]) back into a quantity.
    pub fn from_fixed(fixed: i32) -> Self {
        Self::new(fixed as f32 / FIXED_POINT_SCALE as f32)
    }

    pub fn raw_value(&self) -> f32 {
        self.value
    }
}

impl<U: Unit> Clone for Quantity<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: Unit> Copy for Quantity<U> {}

impl<U: Unit> PartialEq for Quantity<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U: Unit> Debug for Quantity<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", &self.value, U::SYMBOL)
    }
}

#[cfg(feature = "defmt")]
impl<U: Unit> defmt::Format for Quantity<U> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{}{}", &self.value, U::SYMBOL)
    }
}

impl<U: Unit> Display for Quantity<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.value, f)?;
        write!(f, " {}", U::SYMBOL)
    }
}

impl<U: Unit> Sub for Quantity<U> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value - rhs.value)
    }
}

impl<U: Unit> Add for Quantity<U> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value + rhs.value)
    }
}
