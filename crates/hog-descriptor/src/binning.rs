use crate::error::HogError;

/// The split of one pixel's magnitude between two adjacent orientation bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationVote {
    /// Index of the bin whose center is at or below the angle.
    pub bin_low: usize,
    /// Share of the magnitude given to `bin_low`.
    pub vote_low: f64,
    /// Index of the next bin, modulo the bin count.
    pub bin_high: usize,
    /// Share of the magnitude given to `bin_high`.
    pub vote_high: f64,
}

/// Maps an angle to its two bounding bins with linear interpolation.
///
/// The bins span `[0, 180)` with a uniform width `step_size = 180 / bin_count`
/// and bin `j` is centered at `step_size * (j + 0.5)`. Bin indices wrap
/// around modulo the bin count: an angle below the first center votes for
/// the last and the first bins, and an angle above the last center votes for
/// the last and the first bins too.
///
/// # Examples
///
/// ```
/// use hog_descriptor::OrientationBinner;
///
/// let binner = OrientationBinner::new(9).unwrap();
/// let vote = binner.vote(2.0, 25.0);
///
/// assert_eq!((vote.bin_low, vote.bin_high), (0, 1));
/// assert_eq!((vote.vote_low, vote.vote_high), (0.5, 1.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationBinner {
    bin_count: usize,
    step_size: f64,
}

impl OrientationBinner {
    /// Create a binner with `bin_count` bins over `[0, 180)`.
    ///
    /// # Errors
    ///
    /// Returns [`HogError::InvalidBinCount`] if `bin_count` is zero.
    pub fn new(bin_count: usize) -> Result<Self, HogError> {
        if bin_count == 0 {
            return Err(HogError::InvalidBinCount(bin_count));
        }
        Ok(Self {
            bin_count,
            step_size: 180.0 / bin_count as f64,
        })
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Width of a bin in degrees.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Signed index of the bin center at or below the angle, `floor(angle / step - 0.5)`.
    ///
    /// The value is `-1` for angles below the first bin center.
    pub fn lower_bin(&self, angle: f64) -> i64 {
        (angle / self.step_size - 0.5).floor() as i64
    }

    /// Center in degrees of the (signed) bin `j`.
    pub fn bin_center(&self, j: i64) -> f64 {
        self.step_size * (j as f64 + 0.5)
    }

    /// Wrap a signed bin index into `[0, bin_count)`.
    pub fn wrap(&self, j: i64) -> usize {
        j.rem_euclid(self.bin_count as i64) as usize
    }

    /// Split `magnitude` between the two bins bounding `angle`.
    ///
    /// `vote_low + vote_high == magnitude` by construction.
    pub fn vote(&self, magnitude: f64, angle: f64) -> OrientationVote {
        let j = self.lower_bin(angle);
        let vote_low = magnitude * ((self.bin_center(j + 1) - angle) / self.step_size);
        let vote_high = magnitude - vote_low;

        OrientationVote {
            bin_low: self.wrap(j),
            vote_low,
            bin_high: self.wrap(j + 1),
            vote_high,
        }
    }

    /// Add the two votes of a pixel to a histogram.
    ///
    /// # Errors
    ///
    /// Returns [`HogError::HistogramLengthMismatch`] if the histogram does not
    /// have exactly `bin_count` entries.
    pub fn accumulate(&self, magnitude: f64, angle: f64, hist: &mut [f64]) -> Result<(), HogError> {
        if hist.len() != self.bin_count {
            return Err(HogError::HistogramLengthMismatch(hist.len(), self.bin_count));
        }
        self.add_vote(magnitude, angle, hist);
        Ok(())
    }

    // callers guarantee `hist.len() == self.bin_count`
    pub(crate) fn add_vote(&self, magnitude: f64, angle: f64, hist: &mut [f64]) {
        let vote = self.vote(magnitude, angle);
        hist[vote.bin_low] += vote.vote_low;
        hist[vote.bin_high] += vote.vote_high;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_invalid_bin_count() {
        assert!(matches!(
            OrientationBinner::new(0),
            Err(HogError::InvalidBinCount(0))
        ));
    }

    #[test]
    fn test_lower_bin() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;
        assert_eq!(binner.step_size(), 20.0);

        let cases = [
            (89.699551773, 3),
            (88.745362256, 3),
            (69.121575212, 2),
            (46.838597471, 1),
            (24.476863127, 0),
            (14.04109124, 0),
            (69.857194452, 2),
            (40.989482415, 1),
            (5.0, -1),
            (0.0, -1),
        ];
        for (angle, expected) in cases {
            assert_eq!(binner.lower_bin(angle), expected, "angle {angle}");
        }
        Ok(())
    }

    #[test]
    fn test_bin_center() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;
        for (j, expected) in [(0, 10.0), (1, 30.0), (2, 50.0), (3, 70.0), (4, 90.0)] {
            assert_eq!(binner.bin_center(j), expected);
        }
        Ok(())
    }

    #[test]
    fn test_vote_values() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;

        // (magnitude, angle, expected vote_low, expected lower bin)
        let cases = [
            (0.002121697, 40.989482415, 0.00095587934, 1),
            (0.005973429, 51.403386204, 0.005554278, 2),
            (0.034484309, 24.476863127, 0.009523077, 0),
            (0.029104762, 88.216660375, 0.0025951848, 3),
            (0.03359077, 69.121575212, 0.0014753497, 2),
            (0.049294209, 46.838597471, 0.007791944, 1),
        ];

        for (magnitude, angle, vote_low, bin_low) in cases {
            let vote = binner.vote(magnitude, angle);
            assert_eq!(vote.bin_low, bin_low);
            assert_eq!(vote.bin_high, bin_low + 1);
            assert_abs_diff_eq!(vote.vote_low, vote_low, epsilon = 1e-8);
        }
        Ok(())
    }

    #[test]
    fn test_vote_conservation() -> Result<(), HogError> {
        for bin_count in [1, 2, 4, 7, 9, 12] {
            let binner = OrientationBinner::new(bin_count)?;
            for i in 0..360 {
                let angle = i as f64 * 0.5;
                let magnitude = 0.25 + (i % 7) as f64;
                let vote = binner.vote(magnitude, angle);

                assert_abs_diff_eq!(vote.vote_low + vote.vote_high, magnitude, epsilon = 1e-9);
                assert_eq!(vote.bin_high, (vote.bin_low + 1) % bin_count);
                assert!(vote.bin_low < bin_count && vote.bin_high < bin_count);
            }
        }
        Ok(())
    }

    #[test]
    fn test_vote_at_bin_center() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;
        let vote = binner.vote(3.0, 10.0);
        assert_eq!(vote.bin_low, 0);
        assert_abs_diff_eq!(vote.vote_low, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vote.vote_high, 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_vote_wraps_around() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;

        // below the first center: last and first bins
        let vote = binner.vote(1.0, 0.0);
        assert_eq!((vote.bin_low, vote.bin_high), (8, 0));
        assert_abs_diff_eq!(vote.vote_low, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(vote.vote_high, 0.5, epsilon = 1e-12);

        // above the last center: last and first bins
        let vote = binner.vote(1.0, 175.0);
        assert_eq!((vote.bin_low, vote.bin_high), (8, 0));
        assert_abs_diff_eq!(vote.vote_low, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(vote.vote_high, 0.25, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_accumulate() -> Result<(), HogError> {
        let binner = OrientationBinner::new(9)?;
        let mut hist = vec![0.0; 9];
        binner.accumulate(2.0, 25.0, &mut hist)?;
        binner.accumulate(1.0, 0.0, &mut hist)?;
        assert_eq!(hist, vec![1.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);

        let mut short = vec![0.0; 3];
        assert!(matches!(
            binner.accumulate(1.0, 1.0, &mut short),
            Err(HogError::HistogramLengthMismatch(3, 9))
        ));
        Ok(())
    }
}
