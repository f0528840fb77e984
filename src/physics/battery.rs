/// Counters for clamp events applied during battery steps.
///
/// The step contract never fails on numeric input, it clamps. These
/// counters make sustained out-of-bound attempts visible to a caller
/// without changing the physics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampCounters {
    /// Requested discharge exceeded the 4C rate limit.
    pub discharge_rate_caps: u64,
    /// Stored energy clamped at zero (over-discharge attempt).
    pub energy_floor_clamps: u64,
    /// Stored energy clamped at capacity (over-charge attempt).
    pub energy_ceiling_clamps: u64,
    /// Temperature capped at the safety ceiling.
    pub temp_caps: u64,
}

/// An electro-thermal battery model owning stored energy and temperature.
///
/// The energy balance applies charge efficiency to incoming power only;
/// discharge is not efficiency-derated at this stage. Heat generation is
/// proportional to total power throughput (charge and discharge both heat
/// the pack) and the pack exchanges heat with the environment by
/// first-order Newtonian cooling.
///
/// All inputs are accepted and clamped rather than rejected: energy stays
/// in `[0, capacity]`, discharge is rate-limited to 4C, and temperature is
/// capped at `MAX_TEMP_C` with no lower bound.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nominal maximum capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Charge efficiency (0.0 to 1.0, e.g. 0.95).
    pub charge_efficiency: f64,

    /// Heat generation coefficient (°C per kWh of throughput).
    pub thermal_coeff: f64,

    /// Current stored energy in kilowatt-hours.
    energy_kwh: f64,

    /// Internal pack temperature in °C.
    temperature_c: f64,

    /// Maximum discharge power in kilowatts (4C rate limit).
    max_discharge_kw: f64,

    clamps: ClampCounters,
}

/// Temperature safety ceiling in °C; steps cap, they never exceed it.
pub const MAX_TEMP_C: f64 = 55.0;

/// First-order heat exchange coefficient toward ambient (per hour).
const AMBIENT_EXCHANGE_COEFF: f64 = 0.1;

impl Battery {
    /// Creates a new battery at 50% charge and 25 °C.
    ///
    /// The discharge rate limit is derived as `capacity × 4` (a 4C
    /// hardware current limit).
    ///
    /// # Panics
    ///
    /// Panics if `capacity_kwh` is zero or negative. Profile-level
    /// validation in [`crate::config`] reports this as a configuration
    /// error before a battery is ever built from user input.
    pub fn new(capacity_kwh: f64, charge_efficiency: f64, thermal_coeff: f64) -> Self {
        assert!(capacity_kwh > 0.0, "battery capacity must be > 0 kWh");
        Self {
            capacity_kwh,
            charge_efficiency,
            thermal_coeff,
            energy_kwh: capacity_kwh * 0.5,
            temperature_c: 25.0,
            max_discharge_kw: capacity_kwh * 4.0,
            clamps: ClampCounters::default(),
        }
    }

    /// Seeds the owned state from live readings, syncing the twin to the
    /// real pack at construction time.
    pub fn seed_state(&mut self, soc_percent: f64, temperature_c: f64) {
        let soc = soc_percent.clamp(0.0, 100.0);
        self.energy_kwh = self.capacity_kwh * soc / 100.0;
        self.temperature_c = temperature_c;
    }

    /// Current state of charge in percent, clamped to `[0, 100]`.
    pub fn soc_percent(&self) -> f64 {
        let soc = self.energy_kwh / self.capacity_kwh * 100.0;
        soc.clamp(0.0, 100.0)
    }

    /// Current stored energy in kilowatt-hours.
    pub fn energy_kwh(&self) -> f64 {
        self.energy_kwh
    }

    /// Current pack temperature in °C.
    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    /// Maximum discharge power in kilowatts.
    pub fn max_discharge_kw(&self) -> f64 {
        self.max_discharge_kw
    }

    /// Clamp events recorded since construction.
    pub fn clamp_counters(&self) -> ClampCounters {
        self.clamps
    }

    /// Advances the electro-thermal state by one step and returns the new
    /// `(soc_percent, temperature_c)`.
    ///
    /// # Arguments
    ///
    /// * `power_in_kw` - Charging power in kW (≥ 0 expected)
    /// * `power_out_kw` - Requested discharge power in kW (≥ 0 expected)
    /// * `dt_hours` - Step duration in hours
    /// * `env_temp_c` - Ambient temperature in °C
    pub fn step(
        &mut self,
        power_in_kw: f64,
        power_out_kw: f64,
        dt_hours: f64,
        env_temp_c: f64,
    ) -> (f64, f64) {
        // Rate limit first: excess requested discharge is silently capped,
        // modeling the hardware current limit rather than an error.
        let power_out_kw = if power_out_kw > self.max_discharge_kw {
            self.clamps.discharge_rate_caps += 1;
            self.max_discharge_kw
        } else {
            power_out_kw
        };

        // Energy balance. Efficiency applies to the charging direction only.
        let effective_in = power_in_kw * self.charge_efficiency;
        self.energy_kwh += (effective_in - power_out_kw) * dt_hours;

        if self.energy_kwh < 0.0 {
            self.energy_kwh = 0.0;
            self.clamps.energy_floor_clamps += 1;
        } else if self.energy_kwh > self.capacity_kwh {
            self.energy_kwh = self.capacity_kwh;
            self.clamps.energy_ceiling_clamps += 1;
        }

        let soc = self.soc_percent();

        // Lumped thermal update: heat gain from total throughput, exchange
        // toward ambient, upper cap only.
        let throughput_kw = power_in_kw + power_out_kw;
        let heat_gain = throughput_kw * self.thermal_coeff * dt_hours;
        let exchange = AMBIENT_EXCHANGE_COEFF * (env_temp_c - self.temperature_c) * dt_hours;
        self.temperature_c += exchange + heat_gain;

        if self.temperature_c > MAX_TEMP_C {
            self.temperature_c = MAX_TEMP_C;
            self.clamps.temp_caps += 1;
        }

        (soc, self.temperature_c)
    }
}
