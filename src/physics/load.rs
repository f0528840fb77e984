use rand::{Rng, SeedableRng, rngs::StdRng};

/// A time-of-day household demand model with bounded random jitter.
///
/// `LoadModel` produces demand in three regimes: an evening peak window
/// where base load is multiplied up, an overnight trough at 40% of base,
/// and a daytime standard level. Jitter simulates minor appliance
/// switching and is internal to the model; a seeded RNG keeps runs
/// reproducible.
///
/// The orchestrator only consults this model when no measured load is
/// supplied for a tick, so it is optional in the full pipeline.
#[derive(Debug, Clone)]
pub struct LoadModel {
    /// Average daytime load in kilowatts.
    pub base_kw: f64,

    /// Multiplier applied to base load during the evening peak window.
    pub peak_multiplier: f64,

    /// First hour of the evening peak window (inclusive).
    pub evening_start: u32,

    /// Last hour of the evening peak window (inclusive).
    pub evening_end: u32,

    /// Random number generator for jitter.
    rng: StdRng,
}

/// Last hour of the overnight trough (inclusive, window starts at 0).
const OVERNIGHT_END_HOUR: u32 = 6;

/// Overnight demand as a fraction of base load.
const OVERNIGHT_FRACTION: f64 = 0.4;

impl LoadModel {
    /// Creates a load model with the default evening window (18:00–22:00)
    /// and 1.5× peak multiplier.
    ///
    /// # Arguments
    ///
    /// * `base_kw` - Average daytime load in kW
    /// * `seed` - Random seed for reproducible jitter
    pub fn new(base_kw: f64, seed: u64) -> Self {
        Self::with_peak_window(base_kw, 1.5, 18, 22, seed)
    }

    /// Creates a load model with an explicit peak window and multiplier.
    pub fn with_peak_window(
        base_kw: f64,
        peak_multiplier: f64,
        evening_start: u32,
        evening_end: u32,
        seed: u64,
    ) -> Self {
        Self {
            base_kw,
            peak_multiplier,
            evening_start,
            evening_end,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the expected demand in kilowatts for the given hour of day.
    ///
    /// Hours at or past 24 wrap around, so a free-running simulated clock
    /// can be passed in directly.
    pub fn demand_kw(&mut self, hour_of_day: u32) -> f64 {
        let hour = hour_of_day % 24;

        if self.evening_start <= hour && hour <= self.evening_end {
            let variation: f64 = self.rng.random_range(-0.2..0.3);
            return self.base_kw * self.peak_multiplier * (1.0 + variation);
        }

        if hour <= OVERNIGHT_END_HOUR {
            let variation: f64 = self.rng.random_range(-0.1..0.1);
            return self.base_kw * OVERNIGHT_FRACTION * (1.0 + variation);
        }

        let variation: f64 = self.rng.random_range(-0.2..0.3);
        self.base_kw * (1.0 + variation)
    }
}
