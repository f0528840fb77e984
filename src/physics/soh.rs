/// A state-of-health degradation model driven by cycle and thermal stress.
///
/// SOH is a percentage, 100 when new, monotonically non-increasing and
/// floored at zero. There is no repair operation; a new instance models a
/// new or replaced pack.
#[derive(Debug, Clone)]
pub struct SohModel {
    /// Current state of health in percent.
    soh_percent: f64,

    /// SOH loss per percent of SOC cycled per hour.
    pub cycle_loss_factor: f64,

    /// Loss multiplier applied above the thermal threshold.
    pub thermal_accelerator: f64,

    /// Pack temperature above which degradation accelerates, in °C.
    pub thermal_threshold_c: f64,
}

impl Default for SohModel {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl SohModel {
    /// Creates a degradation model starting at the given health percentage.
    pub fn new(initial_soh_percent: f64) -> Self {
        Self {
            soh_percent: initial_soh_percent,
            cycle_loss_factor: 1e-6,
            thermal_accelerator: 1.5,
            thermal_threshold_c: 40.0,
        }
    }

    /// Current state of health in percent.
    pub fn soh_percent(&self) -> f64 {
        self.soh_percent
    }

    /// SOH loss for one step, without mutating state.
    ///
    /// Cycle stress scales with the absolute SOC change; thermal stress
    /// multiplies the loss when the pack is above the threshold.
    pub fn degradation(&self, soc_change_percent: f64, battery_temp_c: f64, dt_hours: f64) -> f64 {
        let cycle_loss = soc_change_percent.abs() * self.cycle_loss_factor * dt_hours;
        let thermal_multiplier = if battery_temp_c > self.thermal_threshold_c {
            self.thermal_accelerator
        } else {
            1.0
        };
        cycle_loss * thermal_multiplier
    }

    /// Applies one step of degradation and returns the new SOH percentage.
    ///
    /// # Arguments
    ///
    /// * `soc_change_percent` - SOC change over the step (sign ignored)
    /// * `battery_temp_c` - Pack temperature in °C
    /// * `dt_hours` - Step duration in hours
    pub fn update_soh(
        &mut self,
        soc_change_percent: f64,
        battery_temp_c: f64,
        dt_hours: f64,
    ) -> f64 {
        let loss = self.degradation(soc_change_percent, battery_temp_c, dt_hours);
        self.soh_percent = (self.soh_percent - loss).max(0.0);
        self.soh_percent
    }
}
