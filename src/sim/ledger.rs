/// A monotone energy-throughput odometer for one site.
///
/// Tracks the cumulative kWh moved through the site regardless of flow
/// direction. The ledger is explicit owned state — constructed with an
/// opening reading and advanced only through [`record`](Self::record) —
/// never a process-wide global.
#[derive(Debug, Clone)]
pub struct ThroughputLedger {
    total_kwh: f64,
}

impl ThroughputLedger {
    /// Creates a ledger with the given opening reading in kWh.
    ///
    /// A replacement twin for an in-service site carries the meter's
    /// existing reading forward; a fresh site starts at zero.
    pub fn new(opening_kwh: f64) -> Self {
        Self {
            total_kwh: opening_kwh.max(0.0),
        }
    }

    /// Records one tick of net power flow and returns the new total.
    ///
    /// Throughput accrues as `|net_kw| × dt_hours`; direction does not
    /// matter for an odometer.
    pub fn record(&mut self, net_kw: f64, dt_hours: f64) -> f64 {
        self.total_kwh += net_kw.abs() * dt_hours;
        self.total_kwh
    }

    /// Current odometer reading in kWh.
    pub fn total_kwh(&self) -> f64 {
        self.total_kwh
    }
}
