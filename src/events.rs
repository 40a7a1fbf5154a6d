use serde::{Deserialize, Serialize};

use crate::commands::timer::{TimerId, TimerOutput};
use crate::http_helpers::ActuatorOutcome;
use crate::types::*;

/// Events that can happen in the app, namespaced by domain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Event {
    Ui(UiEvent),
    Config(ConfigEvent),
    Dashboard(DashboardEvent),
}

/// Panel navigation and other pure UI actions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SelectPanel(Panel),
    ClearStatus,
}

/// Configuration form events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ConfigEvent {
    /// Fetch the device configuration and the root CA blob
    Load,
    /// The whole edited form, as JSON, from the shell
    FormUpdate {
        form_json: String,
    },
    // The toggles that re-derive network field visibility
    SetWifiMode(WifiMode),
    SetPrefIface(Iface),
    SetStaIpMode(IpMode),
    SetEthIpMode(IpMode),
    /// Push the full form back as the replacement configuration
    Submit,
    Reboot,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    ConfigFetched(Result<ConfigForm, String>),
    #[serde(skip)]
    RootCaFetched(Result<String, String>),
    #[serde(skip)]
    SubmitResponse(Result<(), String>),
    #[serde(skip)]
    RebootResponse(Result<(), String>),
}

/// Dashboard events: poll lifecycle, telemetry and actuators
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum DashboardEvent {
    StartPolling,
    StopPolling,
    /// One firing of the shell's interval; `timer` identifies the session
    PollTick {
        timer: TimerId,
    },
    OpenDomeShutter,
    CloseDomeShutter,
    SuspendLookout,
    ResumeLookout,
    /// Manual update check; cancels the poll interval first
    OtaUpdate,

    // Shell/HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    TimerAck(TimerOutput),
    #[serde(skip)]
    TelemetryFetched {
        session: TimerId,
        outcome: TelemetryOutcome,
    },
    #[serde(skip)]
    OpenDomeShutterResponse(ActuatorOutcome),
    #[serde(skip)]
    CloseDomeShutterResponse(ActuatorOutcome),
    #[serde(skip)]
    SuspendLookoutResponse(ActuatorOutcome),
    #[serde(skip)]
    ResumeLookoutResponse(ActuatorOutcome),
    #[serde(skip)]
    OtaUpdateResponse(Result<String, String>),
}

/// What one `/get_station_data` round trip produced
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum TelemetryOutcome {
    Snapshot(Box<TelemetrySnapshot>),
    /// HTTP 503: the station is up but not ready to report
    Busy,
    Failed(String),
}
