use serde::{Deserialize, Serialize};

/// The panels of the station UI. Exactly one is active at any time;
/// `Dashboard` is the only one with entry/exit side effects (it drives the
/// telemetry poll).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    General,
    Network,
    Sensors,
    Devices,
    Lookout,
    Alpaca,
    Dashboard,
}
