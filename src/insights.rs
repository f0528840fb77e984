//! Rule-based qualitative insights derived from a simulation tick.
//!
//! Translates one [`StepResult`] plus the irradiance that drove it into a
//! single physics-grounded message. Rules are ordered most critical
//! first; the first match wins.

use crate::sim::StepResult;

/// Returns one actionable system insight for the given tick.
///
/// # Arguments
///
/// * `result` - The snapshot emitted by the tick
/// * `irradiance_w_m2` - The irradiance reading that drove the tick
pub fn generate_insight(result: &StepResult, irradiance_w_m2: f64) -> &'static str {
    let net = result.net_kw;
    let soc = result.soc_percent;
    let temp = result.temperature_c;
    let ambient = result.ambient_temp_c;

    // Thermal stress: pack well above ambient under high power transfer.
    if temp > ambient + 5.0 && net > 5.0 {
        return "Battery operating at elevated temperature under high power transfer, \
                suggesting potential thermal stress.";
    }

    // High sun but near-flat power flow: charge acceptance or load balance.
    if irradiance_w_m2 > 700.0 && net.abs() < 0.5 && soc < 95.0 {
        return "High solar irradiance detected, but net power flow is minimal, \
                check battery charge acceptance or site load balance.";
    }

    // Deep discharge: low SOC and still draining.
    if soc < 20.0 && net < 0.0 {
        return "Critical: Battery SOC is below 20% and still discharging. \
                Grid support or load shedding may be required.";
    }

    // Healthy SOC but draining fast.
    if net < -5.0 {
        return "High load demand requires rapid discharge, closely monitor \
                discharge rate and battery temperature.";
    }

    if irradiance_w_m2 > 10.0 && soc > 30.0 && temp < ambient + 3.0 {
        return "System is operating efficiently, with stable charge levels and \
                low thermal variance.";
    }

    "System status is nominal. No immediate physics-driven warnings detected."
}
