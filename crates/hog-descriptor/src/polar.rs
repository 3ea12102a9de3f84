use std::f64::consts::PI;

use hog_image::{ops::ensure_same_size, Image};

use crate::{
    config::{AngleConvention, ROUNDING_DECIMALS},
    error::HogError,
    gradient::GradientField,
    parallel::{self, ExecutionStrategy},
};

/// Per-pixel gradient magnitude and orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarField {
    /// Gradient magnitude, `>= 0`.
    pub magnitude: Image<f64, 1>,
    /// Gradient orientation in degrees.
    pub angle: Image<f64, 1>,
}

impl PolarField {
    /// Convert a gradient field to magnitudes and angles.
    ///
    /// # Arguments
    ///
    /// * `gradient` - The gradient field.
    /// * `convention` - How the orientation is mapped to degrees.
    /// * `strategy` - How the rows are processed.
    pub fn from_gradient(
        gradient: &GradientField,
        convention: AngleConvention,
        strategy: ExecutionStrategy,
    ) -> Result<Self, HogError> {
        ensure_same_size(&gradient.gx, &gradient.gy)?;

        let size = gradient.gx.size();
        let mut magnitude = Image::from_size_val(size, 0.0)?;
        let mut angle = Image::from_size_val(size, 0.0)?;

        if size.is_empty() {
            return Ok(Self { magnitude, angle });
        }

        let gx = gradient.gx.as_slice();
        let gy = gradient.gy.as_slice();
        let cols = size.width;

        parallel::for_each_row_pair(
            strategy,
            magnitude.as_slice_mut(),
            angle.as_slice_mut(),
            cols,
            |r, mag_row, ang_row| {
                let offset = r * cols;
                for c in 0..cols {
                    let (m, a) = magnitude_angle(gx[offset + c], gy[offset + c], convention);
                    mag_row[c] = m;
                    ang_row[c] = a;
                }
            },
        )?;

        Ok(Self { magnitude, angle })
    }
}

/// Round a value to a fixed number of fractional digits.
///
/// Halfway cases are rounded away from zero.
///
/// ```
/// use hog_descriptor::polar::round_decimals;
///
/// assert_eq!(round_decimals(0.123456789049, 9), 0.123456789);
/// assert_eq!(round_decimals(2.5, 0), 3.0);
/// ```
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Compute the magnitude and the angle in degrees of a gradient pair.
///
/// Both values are rounded to nine fractional digits.
///
/// With [`AngleConvention::Folded`] the angle is `|atan(gy / gx)|`, which lies
/// in `[0, 90]`, and a zero `gx` gives an angle of `0` whatever `gy` is. With
/// [`AngleConvention::Unsigned`] the angle is `atan2(gy, gx)` in `[0, 180)`.
///
/// ```
/// use hog_descriptor::{polar::magnitude_angle, AngleConvention};
///
/// let (m, a) = magnitude_angle(-1.0, 1.0, AngleConvention::Folded);
/// assert_eq!((m, a), (1.414213562, 45.0));
///
/// let (_, a) = magnitude_angle(-1.0, 1.0, AngleConvention::Unsigned);
/// assert_eq!(a, 135.0);
/// ```
pub fn magnitude_angle(gx: f64, gy: f64, convention: AngleConvention) -> (f64, f64) {
    let magnitude = round_decimals((gx * gx + gy * gy).sqrt(), ROUNDING_DECIMALS);

    let angle = match convention {
        AngleConvention::Folded => {
            if gx == 0.0 {
                0.0
            } else {
                round_decimals((((gy / gx).atan()) * 180.0 / PI).abs(), ROUNDING_DECIMALS)
            }
        }
        AngleConvention::Unsigned => {
            let mut degrees = round_decimals(gy.atan2(gx) * 180.0 / PI, ROUNDING_DECIMALS);
            if degrees < 0.0 {
                degrees += 180.0;
            }
            if degrees >= 180.0 {
                degrees -= 180.0;
            }
            // normalizes -0.0
            degrees + 0.0
        }
    };

    (magnitude, angle)
}
