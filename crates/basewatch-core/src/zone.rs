//! Coordinate quantization into zone identifiers.
//!
//! Scans of "the same place" are matched by snapping both coordinates to a
//! square grid of `radius` degrees and naming the resulting cell. Two points
//! that snap to the same cell share a location id and therefore one record.
//!
//! # Rounding
//!
//! Each coordinate becomes `(value / radius).round() * radius`. `f64::round`
//! rounds half away from zero, so a value exactly on a cell boundary always
//! moves outward. The snapped values are printed with three decimals and a
//! negative zero is printed as `0.000`.
//!
//! # Example
//!
//! ```
//! use basewatch_core::zone::generate_location_id;
//!
//! let a = generate_location_id(40.7128, -74.0060, 0.01).unwrap();
//! let b = generate_location_id(40.7131, -74.0062, 0.01).unwrap();
//! assert_eq!(a, "base_40.710_-74.010");
//! assert_eq!(a, b);
//! ```

use basewatch_types::{ValidationError, ValidationResult};

/// Default cell size in degrees (roughly 1 km at the equator).
pub const DEFAULT_ZONE_RADIUS: f64 = 0.01;

/// Map a coordinate pair to the id of the grid cell containing it.
///
/// Fails if either coordinate is non-finite or out of range, or if `radius`
/// is not a finite number greater than zero.
pub fn generate_location_id(lat: f64, lng: f64, radius: f64) -> ValidationResult<String> {
    ZoneGrid::new(radius)?.location_id(lat, lng)
}

/// A grid of square cells `radius` degrees on a side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneGrid {
    radius: f64,
}

impl Default for ZoneGrid {
    fn default() -> Self {
        Self {
            radius: DEFAULT_ZONE_RADIUS,
        }
    }
}

impl ZoneGrid {
    /// Create a grid with the given cell size in degrees.
    pub fn new(radius: f64) -> ValidationResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ValidationError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }

    /// Cell size in degrees.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Id of the cell containing `(lat, lng)`.
    pub fn location_id(&self, lat: f64, lng: f64) -> ValidationResult<String> {
        check_coordinate("latitude", lat, 90.0)?;
        check_coordinate("longitude", lng, 180.0)?;

        let (lat, lng) = (self.snap(lat), self.snap(lng));
        // A tiny enough radius overflows the cell index
        if !lat.is_finite() || !lng.is_finite() {
            return Err(ValidationError::InvalidRadius(self.radius));
        }

        Ok(format!(
            "base_{}_{}",
            format_coordinate(lat),
            format_coordinate(lng)
        ))
    }

    fn snap(&self, value: f64) -> f64 {
        (value / self.radius).round() * self.radius
    }
}

fn check_coordinate(axis: &'static str, value: f64, limit: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidCoordinate {
            axis,
            value,
            reason: "must be a finite number",
        });
    }
    if value.abs() > limit {
        return Err(ValidationError::InvalidCoordinate {
            axis,
            value,
            reason: if limit == 90.0 {
                "must be within -90..=90"
            } else {
                "must be within -180..=180"
            },
        });
    }
    Ok(())
}

fn format_coordinate(value: f64) -> String {
    let formatted = format!("{value:.3}");
    // -0.0 and tiny negatives print as "-0.000"
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}
