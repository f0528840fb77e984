//! Physics components for the site digital twin.

/// Electro-thermal battery storage model.
pub mod battery;
/// Time-of-day demand model.
pub mod load;
/// State-of-health degradation model.
pub mod soh;
/// Solar array output model.
pub mod solar;

// Re-export the main types for convenience
pub use battery::{Battery, ClampCounters};
pub use load::LoadModel;
pub use soh::SohModel;
pub use solar::SolarPanel;
