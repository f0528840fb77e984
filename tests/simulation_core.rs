//! Integration tests for the site digital twin: multi-tick invariants,
//! deadband behavior, determinism, and the serialized snapshot shape.

use twin_sim::config::{DEFAULT_SITE, ProfileRegistry, SiteId};
use twin_sim::physics::{Battery, SohModel, SolarPanel};
use twin_sim::sim::{SimulationCore, StepInput, SystemState};

fn default_core(initial_soc: f64, initial_temp: f64) -> SimulationCore {
    let registry = ProfileRegistry::builtin();
    SimulationCore::new(
        SiteId::new(DEFAULT_SITE),
        initial_soc,
        initial_temp,
        42,
        &registry,
    )
    .expect("builtin profile should be valid")
}

/// One simulated day with a half-sine irradiance curve and a varying
/// measured load, at the given tick length.
fn day_of_inputs(step_seconds: f64) -> Vec<StepInput> {
    let ticks_per_hour = (3600.0 / step_seconds).max(1.0);
    let total = (24.0 * ticks_per_hour) as usize;
    (0..total)
        .map(|t| {
            let hour = t as f64 / ticks_per_hour;
            let irradiance = if (6.0..18.0).contains(&hour) {
                900.0 * (std::f64::consts::PI * (hour - 6.0) / 12.0).sin()
            } else {
                0.0
            };
            let load = 2.0 + 1.5 * ((hour / 24.0) * std::f64::consts::TAU).sin().abs();
            StepInput::with_measured_load(step_seconds, irradiance, 24.0 + hour / 4.0, load)
        })
        .collect()
}

#[test]
fn soc_stays_in_bounds_over_a_full_day() {
    let mut core = default_core(50.0, 25.0);
    for input in day_of_inputs(600.0) {
        let result = core.run_step(&input);
        assert!(
            (0.0..=100.0).contains(&result.soc_percent),
            "SOC out of bounds: {}",
            result.soc_percent
        );
        let raw = core.soc_percent();
        assert!((0.0..=100.0).contains(&raw));
    }
}

#[test]
fn temperature_never_exceeds_ceiling() {
    // Hot site, heavy flows, long ticks: temperature must cap at 55 °C.
    let mut core = default_core(50.0, 54.0);
    for _ in 0..200 {
        let result = core.run_step(&StepInput::with_measured_load(3600.0, 1200.0, 50.0, 80.0));
        assert!(result.temperature_c <= 55.0);
    }
}

#[test]
fn soh_is_monotone_non_increasing() {
    let mut core = default_core(50.0, 25.0);
    let mut prev = core.soh_percent();
    for input in day_of_inputs(300.0) {
        core.run_step(&input);
        let soh = core.soh_percent();
        assert!(soh <= prev, "SOH increased: {prev} -> {soh}");
        assert!(soh >= 0.0);
        prev = soh;
    }
}

#[test]
fn deadband_tick_is_idle_regardless_of_sign() {
    let mut core = default_core(50.0, 25.0);
    // solar at 1000 W/m², 25 °C ambient = 10.5 kW exactly
    for load in [10.41, 10.45, 10.5, 10.55, 10.59] {
        let result = core.run_step(&StepInput::with_measured_load(10.0, 1000.0, 25.0, load));
        assert_eq!(
            result.system_state,
            SystemState::Idle,
            "net {} kW should be Idle",
            10.5 - load
        );
    }
}

#[test]
fn discharge_rate_cap_limits_energy_removed() {
    // Requesting 500 kW from a 40 kWh pack must remove at most 160 kW
    // worth of energy (the 4C limit), not 500.
    let mut core = default_core(100.0, 25.0);
    let before = core.soc_percent() / 100.0 * 40.0;
    core.run_step(&StepInput::with_measured_load(36.0, 0.0, 25.0, 500.0));
    let after = core.soc_percent() / 100.0 * 40.0;
    let removed = before - after;
    let max_removal = 160.0 * (36.0 / 3600.0);
    assert!(removed <= max_removal + 1e-9, "removed {removed} kWh");
    assert_eq!(core.clamp_counters().discharge_rate_caps, 1);
}

#[test]
fn solar_panel_reference_scenario() {
    let panel = SolarPanel::new(50.0, 0.21, 0.003);
    let kw = panel.power_output(800.0, 35.0);
    assert!((kw - 8.148).abs() < 1e-9);
}

#[test]
fn battery_charge_scenario() {
    let mut battery = Battery::new(40.0, 0.95, 0.005);
    let (soc, _) = battery.step(5.0, 0.0, 1.0, 25.0);
    assert!((soc - 61.875).abs() < 1e-9);
}

#[test]
fn soh_thermal_acceleration_scenario() {
    let mut soh = SohModel::new(100.0);
    let new = soh.update_soh(2.0, 45.0, 1.0);
    assert!((new - 99.999997).abs() < 1e-9);
}

#[test]
fn two_sites_are_fully_independent() {
    let mut a = default_core(80.0, 25.0);
    let mut b = default_core(80.0, 25.0);

    // Drive only site A hard; site B must be untouched.
    for _ in 0..50 {
        a.run_step(&StepInput::with_measured_load(3600.0, 0.0, 25.0, 10.0));
    }
    assert!(a.soc_percent() < 80.0);
    assert_eq!(b.soc_percent(), 80.0);
    assert_eq!(b.soh_percent(), 100.0);
    assert_eq!(b.throughput_kwh(), 0.0);

    b.run_step(&StepInput::with_measured_load(3600.0, 0.0, 25.0, 1.0));
    assert!(b.soc_percent() < 80.0);
}

#[test]
fn identical_seeds_produce_identical_days() {
    let run = |seed: u64| {
        let registry = ProfileRegistry::builtin();
        let mut core =
            SimulationCore::new(SiteId::new(DEFAULT_SITE), 50.0, 25.0, seed, &registry)
                .expect("builtin profile should be valid");
        // modeled-load path so the seeded jitter is exercised
        (0..24)
            .map(|_| core.run_step(&StepInput::new(3600.0, 500.0, 26.0)))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn step_result_serializes_to_flat_record() {
    let mut core = default_core(50.0, 25.0);
    let result = core.run_step(&StepInput::with_measured_load(10.0, 800.0, 35.0, 3.0));

    let json = serde_json::to_value(&result).expect("snapshot should serialize");
    let obj = json.as_object().expect("snapshot should be a flat object");

    for field in [
        "soc_percent",
        "temperature_c",
        "soh_percent",
        "solar_kw",
        "load_kw",
        "net_kw",
        "ambient_temp_c",
        "throughput_kwh",
    ] {
        assert!(obj[field].is_number(), "{field} should be numeric");
    }
    assert_eq!(obj["system_state"], serde_json::json!("Charging"));
}

#[test]
fn throughput_odometer_matches_integrated_net_flow() {
    let mut core = default_core(50.0, 25.0);
    let mut expected = 0.0;
    for input in day_of_inputs(900.0) {
        let result = core.run_step(&input);
        // StepResult.net_kw is rounded; recompute from unrounded inputs
        let load = input.measured_load_kw.unwrap_or(0.0);
        let solar = SolarPanel::new(50.0, 0.21, 0.003)
            .power_output(input.irradiance_w_m2.max(0.0), input.ambient_temp_c);
        expected += (solar - load).abs() * input.step_seconds / 3600.0;
        assert!((core.throughput_kwh() - expected).abs() < 1e-6);
        assert!(result.throughput_kwh >= 0.0);
    }
}
