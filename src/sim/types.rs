//! Core simulation types: tick inputs, step results, and state labels.

use std::fmt;

use serde::Serialize;

/// Deadband in kW around zero net power within which the system is Idle.
///
/// Suppresses state-label oscillation from sensor and simulation noise;
/// downstream trend consumers rely on this label being stable.
pub const IDLE_DEADBAND_KW: f64 = 0.1;

/// Categorical power-flow state of the site, derived fresh each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemState {
    /// Net power within the deadband.
    Idle,
    /// Net generation surplus flowing into the battery.
    Charging,
    /// Net deficit drawn from the battery.
    Discharging,
}

impl SystemState {
    /// Classifies net power (solar − load) against the deadband.
    pub fn classify(net_kw: f64) -> Self {
        if net_kw.abs() < IDLE_DEADBAND_KW {
            SystemState::Idle
        } else if net_kw > 0.0 {
            SystemState::Charging
        } else {
            SystemState::Discharging
        }
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SystemState::Idle => "Idle",
            SystemState::Charging => "Charging",
            SystemState::Discharging => "Discharging",
        };
        f.pad(s)
    }
}

/// External readings driving one simulation tick.
///
/// The core has no internal clock; the caller supplies elapsed time and
/// environment per tick. Irradiance is clamped to ≥ 0 at this boundary
/// before it reaches the solar model.
#[derive(Debug, Clone)]
pub struct StepInput {
    /// Elapsed time covered by this tick, in seconds.
    pub step_seconds: f64,
    /// Plane-of-array irradiance in W/m².
    pub irradiance_w_m2: f64,
    /// Ambient air temperature in °C.
    pub ambient_temp_c: f64,
    /// Measured site load in kW; when absent the internal load model is
    /// consulted instead.
    pub measured_load_kw: Option<f64>,
}

impl StepInput {
    /// Creates a tick input with no measured load (the internal load
    /// model supplies demand).
    pub fn new(step_seconds: f64, irradiance_w_m2: f64, ambient_temp_c: f64) -> Self {
        Self {
            step_seconds,
            irradiance_w_m2,
            ambient_temp_c,
            measured_load_kw: None,
        }
    }

    /// Creates a tick input carrying a measured load reading.
    pub fn with_measured_load(
        step_seconds: f64,
        irradiance_w_m2: f64,
        ambient_temp_c: f64,
        load_kw: f64,
    ) -> Self {
        Self {
            step_seconds,
            irradiance_w_m2,
            ambient_temp_c,
            measured_load_kw: Some(load_kw),
        }
    }
}

/// Snapshot emitted by one simulation tick.
///
/// Transient by design: the core keeps no history, the caller decides
/// whether and how to log. Fields are rounded for stable display and
/// logging — temperatures and SOC to 1 decimal, powers to 2, SOH and the
/// throughput odometer to 4 — and the struct serializes to a flat record
/// without further transformation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    /// Simulated battery state of charge in percent.
    pub soc_percent: f64,
    /// Simulated battery temperature in °C.
    pub temperature_c: f64,
    /// Simulated state of health in percent.
    pub soh_percent: f64,
    /// Solar generation this tick in kW.
    pub solar_kw: f64,
    /// Site load this tick in kW.
    pub load_kw: f64,
    /// Net power (solar − load) in kW.
    pub net_kw: f64,
    /// Ambient temperature echoed as an independent causal signal, °C.
    pub ambient_temp_c: f64,
    /// Lifetime energy throughput odometer in kWh.
    pub throughput_kwh: f64,
    /// Power-flow state classified against the deadband.
    pub system_state: SystemState,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<11} | SOC={:>5.1}%  temp={:>5.1}°C  SOH={:>8.4}% | \
             solar={:>6.2} kW  load={:>6.2} kW  net={:>6.2} kW | \
             ambient={:>5.1}°C  odo={:.4} kWh",
            self.system_state,
            self.soc_percent,
            self.temperature_c,
            self.soh_percent,
            self.solar_kw,
            self.load_kw,
            self.net_kw,
            self.ambient_temp_c,
            self.throughput_kwh,
        )
    }
}

/// Rounds to the given number of decimal places.
pub(crate) fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_within_deadband_is_idle() {
        assert_eq!(SystemState::classify(0.05), SystemState::Idle);
        assert_eq!(SystemState::classify(-0.05), SystemState::Idle);
        assert_eq!(SystemState::classify(0.0), SystemState::Idle);
        assert_eq!(SystemState::classify(0.0999), SystemState::Idle);
    }

    #[test]
    fn classify_outside_deadband() {
        assert_eq!(SystemState::classify(0.1), SystemState::Charging);
        assert_eq!(SystemState::classify(2.5), SystemState::Charging);
        assert_eq!(SystemState::classify(-0.1), SystemState::Discharging);
        assert_eq!(SystemState::classify(-4.0), SystemState::Discharging);
    }

    #[test]
    fn system_state_display_labels() {
        assert_eq!(SystemState::Idle.to_string(), "Idle");
        assert_eq!(SystemState::Charging.to_string(), "Charging");
        assert_eq!(SystemState::Discharging.to_string(), "Discharging");
    }

    #[test]
    fn round_dp_precision() {
        assert_eq!(round_dp(61.875, 1), 61.9);
        assert_eq!(round_dp(8.1479, 2), 8.15);
        assert_eq!(round_dp(99.9999971, 4), 100.0);
        assert_eq!(round_dp(-0.049, 2), -0.05);
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let r = StepResult {
            soc_percent: 61.9,
            temperature_c: 25.1,
            soh_percent: 100.0,
            solar_kw: 8.15,
            load_kw: 3.0,
            net_kw: 5.15,
            ambient_temp_c: 24.5,
            throughput_kwh: 0.0143,
            system_state: SystemState::Charging,
        };
        let s = format!("{r}");
        assert!(s.contains("Charging"));
    }
}
