//! Depth from pressure.
//!
//! Uses the method of Saunders and Fofonoff (UNESCO Technical Papers in Marine
//! Science 44, 1983; Deep-Sea Res. 23, 109-111, 1976) for a standard ocean,
//! T = 0 °C and S = 35 (PSS-78). Brackish water such as the Baltic has a lower
//! salinity and a non-zero mean temperature, so depths computed here read
//! slightly shallow there. The formula is kept as published.
//!
//! Without `std` the sine comes from `micromath`'s approximation, which costs
//! some accuracy. The resulting depth stays within a meter at full ocean depth.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Absolute pressure at the surface reference, in bar.
pub const SURFACE_PRESSURE_BAR: f32 = 1.101325;

/// Meters of fresh water per decibar of gauge pressure.
pub const FRESHWATER_METERS_PER_DECIBAR: f32 = 1.019716;

const DEGREES_PER_RADIAN: f32 = 57.29578;

fn gauge_decibar(pressure: f32) -> f32 {
    (pressure - SURFACE_PRESSURE_BAR) * 10.0
}

/// Depth in meters for an absolute `pressure` in bar at `latitude` degrees.
///
/// Pressures at or above the surface reference yield `0`.
pub fn depth(pressure: f32, latitude: f32) -> f32 {
    depth_with_sine(pressure, latitude, |x| x.sin())
}

fn depth_with_sine(pressure: f32, latitude: f32, sin: impl Fn(f32) -> f32) -> f32 {
    let p = gauge_decibar(pressure);
    if p < 0.0 {
        return 0.0;
    }

    let specific_volume = p * (9.72659 + p * (-2.2512e-5 + p * (2.279e-10 + p * -1.82e-15)));

    let s = sin(latitude / DEGREES_PER_RADIAN);
    let s = s * s;
    let gravity = 9.780318 * (1.0 + s * (5.2788e-3 + s * 2.36e-5)) + 1.096e-6 * p;

    specific_volume / gravity
}

/// Shallow freshwater approximation: gauge pressure times [`FRESHWATER_METERS_PER_DECIBAR`].
pub fn freshwater_depth(pressure: f32) -> f32 {
    let p = gauge_decibar(pressure);
    if p < 0.0 {
        return 0.0;
    }
    p * FRESHWATER_METERS_PER_DECIBAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_is_zero() {
        for latitude in [-90.0, -45.0, 0.0, 30.0, 54.5, 90.0] {
            assert_eq!(0.0, depth(SURFACE_PRESSURE_BAR, latitude));
        }
        assert_eq!(0.0, freshwater_depth(SURFACE_PRESSURE_BAR));
    }

    #[test]
    fn test_above_surface_saturates() {
        assert_eq!(0.0, depth(1.0, 45.0));
        assert_eq!(0.0, depth(0.0, 0.0));
        assert_eq!(0.0, depth(-3.5, 60.0));
        assert_eq!(0.0, freshwater_depth(0.5));
    }

    #[test]
    fn test_unesco_check_value() {
        // 10000 dbar at 30° is 9712.653 m in the published check table
        let d = depth(1000.0 + SURFACE_PRESSURE_BAR, 30.0);
        assert!((d - 9712.653).abs() < 1.0, "depth = {}", d);
    }

    #[test]
    fn test_micromath_sine_within_tolerance() {
        let approx = |pressure, latitude| {
            depth_with_sine(pressure, latitude, <f32 as micromath::F32Ext>::sin)
        };

        let d = approx(1000.0 + SURFACE_PRESSURE_BAR, 30.0);
        assert!((d - 9712.653).abs() < 1.0, "depth = {}", d);
        for latitude in [0.0, 30.0, 45.0, 54.5, 90.0] {
            let exact = depth(101.0, latitude);
            let d = approx(101.0, latitude);
            assert!((d - exact).abs() < 0.05, "{} vs {} at {}°", d, exact, latitude);
        }
    }

    #[test]
    fn test_monotonic_in_pressure() {
        for latitude in [0.0, 30.0, 60.0, 90.0] {
            let mut previous = 0.0;
            let mut pressure = SURFACE_PRESSURE_BAR;
            while pressure <= 200.0 {
                let d = depth(pressure, latitude);
                assert!(d >= 0.0);
                assert!(d >= previous, "{} < {} at {} bar", d, previous, pressure);
                previous = d;
                pressure += 0.25;
            }
        }
    }

    #[test]
    fn test_gravity_grows_towards_poles() {
        let equator = depth(51.0, 0.0);
        let pole = depth(51.0, 90.0);
        assert!(pole < equator);
    }

    #[test]
    fn test_freshwater_depth() {
        let d = freshwater_depth(2.101325);
        assert!((d - 10.19716).abs() < 1e-3, "depth = {}", d);
    }
}
