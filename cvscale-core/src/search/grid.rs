use crate::error::ScaleError;

/// Upper bound on grid size; anything larger is almost certainly a typo in `step`.
pub const MAX_GRID_POINTS: usize = 50_000_000;

/// Half-open arithmetic progression `[min, max)` of scale multipliers.
///
/// # Logic
/// Point `i` is computed as `min + i * step` rather than by repeated addition,
/// so there is no accumulated drift. `len()` is the number of such points that
/// are strictly below `max`, which matches a standard numeric range generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierGrid {
    min: f64,
    step: f64,
    count: usize,
}

impl MultiplierGrid {
    /// # Errors
    /// `InvalidRange` if `max <= min`, `min <= 0`, `step <= 0`, or the grid would
    /// exceed `MAX_GRID_POINTS`.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, ScaleError> {
        let invalid = ScaleError::InvalidRange { min, max, step };
        if !(max > min) || !(min > 0.0) || !(step > 0.0) {
            return Err(invalid);
        }

        let span = (max - min) / step;
        if !span.is_finite() || span > MAX_GRID_POINTS as f64 {
            return Err(invalid);
        }

        // Settle the estimate against the exact point formula.
        let mut count = span.ceil() as usize;
        while count > 1 && min + (count - 1) as f64 * step >= max {
            count -= 1;
        }
        while min + count as f64 * step < max {
            count += 1;
        }

        Ok(Self { min, step, count: count.max(1) })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn multiplier(&self, i: usize) -> f64 {
        self.min + i as f64 * self.step
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |i| self.multiplier(i))
    }
}
