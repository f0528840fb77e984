//! The per-site digital twin orchestrator.

use crate::config::{ConfigError, ProfileRegistry, SiteId, SiteProfile};
use crate::physics::{Battery, ClampCounters, LoadModel, SohModel, SolarPanel};

use super::ledger::ThroughputLedger;
use super::types::{StepInput, StepResult, SystemState, round_dp};

/// Digital twin for one site, advanced one tick at a time.
///
/// Owns one [`Battery`] and one [`SohModel`] plus the stateless solar and
/// load models, all built from the site's resolved [`SiteProfile`]. One
/// instance per site, one caller at a time: `run_step` mutates owned
/// state without locking, so invocations on an instance must be
/// serialized. Each step is O(1), non-blocking, and does no I/O.
pub struct SimulationCore {
    site: SiteId,
    profile: SiteProfile,
    solar: SolarPanel,
    battery: Battery,
    load: LoadModel,
    soh: SohModel,
    ledger: ThroughputLedger,
    elapsed_hours: f64,
}

impl SimulationCore {
    /// Builds the twin for a site, seeded from live readings.
    ///
    /// The site's profile is resolved through the registry; unrecognized
    /// identifiers fall back to the default profile, which is expected
    /// behavior rather than an error. The SOH model always starts at
    /// 100% — a new twin models a new or replaced pack.
    ///
    /// # Arguments
    ///
    /// * `site` - Site identifier used for profile lookup
    /// * `initial_soc_percent` - Measured SOC to seed the battery with
    /// * `initial_temp_c` - Measured pack temperature in °C
    /// * `seed` - Random seed for the load model's jitter
    /// * `registry` - Profile lookup source
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the resolved profile is invalid (for
    /// example a non-positive battery capacity). This is the only hard
    /// failure in the core; everything downstream clamps instead.
    pub fn new(
        site: SiteId,
        initial_soc_percent: f64,
        initial_temp_c: f64,
        seed: u64,
        registry: &ProfileRegistry,
    ) -> Result<Self, ConfigError> {
        let profile = registry.resolve(&site).clone();
        if let Some(err) = profile
            .validate(&format!("profiles.{site}"))
            .into_iter()
            .next()
        {
            return Err(err);
        }

        let solar = SolarPanel::new(
            profile.panel_area_m2,
            profile.panel_efficiency,
            profile.panel_temp_coeff,
        );
        let mut battery = Battery::new(
            profile.battery_capacity_kwh,
            profile.battery_charge_eff,
            profile.battery_thermal_coeff,
        );
        battery.seed_state(initial_soc_percent, initial_temp_c);
        let load = LoadModel::new(profile.base_load_kw, seed);

        Ok(Self {
            site,
            profile,
            solar,
            battery,
            load,
            soh: SohModel::new(100.0),
            ledger: ThroughputLedger::new(0.0),
            elapsed_hours: 0.0,
        })
    }

    /// Carries an existing odometer reading into the twin.
    pub fn with_opening_throughput(mut self, opening_kwh: f64) -> Self {
        self.ledger = ThroughputLedger::new(opening_kwh);
        self
    }

    /// Advances the twin by one tick and returns the resulting snapshot.
    ///
    /// Solar output uses ambient temperature as a proxy for cell
    /// temperature. Load comes from the tick's measured reading when
    /// present, otherwise from the internal time-of-day model. Net power
    /// is classified against the idle deadband, split into non-negative
    /// charge/discharge flows, and pushed through the battery and SOH
    /// models. Never fails: out-of-range physical quantities are clamped
    /// by the components they pass through.
    pub fn run_step(&mut self, input: &StepInput) -> StepResult {
        let dt_hours = input.step_seconds / 3600.0;

        let irradiance = input.irradiance_w_m2.max(0.0);
        let solar_kw = self.solar.power_output(irradiance, input.ambient_temp_c);
        let load_kw = match input.measured_load_kw {
            Some(kw) => kw,
            None => self.load.demand_kw(self.hour_of_day()),
        };

        let net_kw = solar_kw - load_kw;
        let system_state = SystemState::classify(net_kw);

        // Power still flows inside the deadband; only the label is damped.
        let power_in_kw = net_kw.max(0.0);
        let power_out_kw = (-net_kw).max(0.0);

        let prev_soc = self.battery.soc_percent();
        let (soc, temperature) =
            self.battery
                .step(power_in_kw, power_out_kw, dt_hours, input.ambient_temp_c);

        let soc_change = soc - prev_soc;
        let soh = self.soh.update_soh(soc_change.abs(), temperature, dt_hours);

        let throughput = self.ledger.record(net_kw, dt_hours);
        self.elapsed_hours += dt_hours;

        StepResult {
            soc_percent: round_dp(soc, 1),
            temperature_c: round_dp(temperature, 1),
            soh_percent: round_dp(soh, 4),
            solar_kw: round_dp(solar_kw, 2),
            load_kw: round_dp(load_kw, 2),
            net_kw: round_dp(net_kw, 2),
            ambient_temp_c: round_dp(input.ambient_temp_c, 1),
            throughput_kwh: round_dp(throughput, 4),
            system_state,
        }
    }

    /// Simulated hour of day derived from accumulated tick time.
    fn hour_of_day(&self) -> u32 {
        (self.elapsed_hours % 24.0) as u32
    }

    /// The site this twin models.
    pub fn site(&self) -> &SiteId {
        &self.site
    }

    /// The resolved site profile.
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Unrounded battery state of charge in percent.
    pub fn soc_percent(&self) -> f64 {
        self.battery.soc_percent()
    }

    /// Unrounded battery temperature in °C.
    pub fn battery_temperature_c(&self) -> f64 {
        self.battery.temperature_c()
    }

    /// Unrounded state of health in percent.
    pub fn soh_percent(&self) -> f64 {
        self.soh.soh_percent()
    }

    /// Current throughput odometer reading in kWh.
    pub fn throughput_kwh(&self) -> f64 {
        self.ledger.total_kwh()
    }

    /// Clamp events recorded by the owned battery since construction.
    pub fn clamp_counters(&self) -> ClampCounters {
        self.battery.clamp_counters()
    }

    /// Total simulated time advanced so far, in hours.
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_hours
    }
}
