/// A solar PV array modeled as a pure function of irradiance and cell temperature.
///
/// `SolarPanel` holds only the static plate parameters of the installed array.
/// Output follows the simplified engineering model `P = G × A × η × f(T)`,
/// where `f(T)` derates output linearly above the 25 °C standard test
/// condition and applies no bonus below it.
///
/// The model trusts its inputs: negative irradiance is not rejected here,
/// callers are expected to clamp at the boundary where readings enter the
/// simulation.
#[derive(Debug, Clone)]
pub struct SolarPanel {
    /// Total effective panel area in square meters.
    pub area_m2: f64,

    /// Rated conversion efficiency (0.0 to 1.0, e.g. 0.21 for 21%).
    pub efficiency: f64,

    /// Fractional output loss per °C above 25 °C (e.g. 0.003 for 0.3%/°C).
    pub temp_coeff: f64,
}

/// Cell reference temperature in °C; derating applies only above this point.
const REFERENCE_TEMP_C: f64 = 25.0;

impl SolarPanel {
    /// Creates a new solar array model with the specified plate parameters.
    pub fn new(area_m2: f64, efficiency: f64, temp_coeff: f64) -> Self {
        Self {
            area_m2,
            efficiency,
            temp_coeff,
        }
    }

    /// Returns the instantaneous power output in kilowatts.
    ///
    /// # Arguments
    ///
    /// * `irradiance_w_m2` - Incident irradiance in W/m²
    /// * `cell_temp_c` - Cell temperature in °C (ambient is an accepted proxy)
    pub fn power_output(&self, irradiance_w_m2: f64, cell_temp_c: f64) -> f64 {
        let derate = 1.0 - self.temp_coeff * (cell_temp_c - REFERENCE_TEMP_C).max(0.0);
        let power_watts = irradiance_w_m2 * self.area_m2 * self.efficiency * derate;
        power_watts / 1000.0
    }
}
