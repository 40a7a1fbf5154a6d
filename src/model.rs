use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerId;
use crate::types::*;

/// Application Model - the complete state
/// Also serves as the ViewModel when serialized
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Model {
    pub active_panel: Panel,
    pub config: ConfigState,
    pub dashboard: DashboardState,

    // UI state
    pub is_loading: bool,
    pub status_message: Option<String>,
}

impl Model {
    /// Start a loading operation (sets is_loading=true, clears the status line)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.status_message = None;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
    }

    /// Record a status line and stop loading
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.status_message = Some(message.into());
    }

    /// Record a status line, stop loading, and return a render command
    pub fn set_status_and_render(
        &mut self,
        message: impl Into<String>,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_status(message);
        crux_core::render::render()
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

/// State of the configuration form and its fetched companions
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigState {
    pub form: ConfigForm,
    /// Opaque certificate text, fetched and submitted verbatim
    pub root_ca: String,
    pub visibility: NetworkVisibility,
    /// Advisory per-field validation errors; never block a submit
    pub field_errors: HashMap<String, String>,
}

impl ConfigState {
    /// Re-derive everything that is a pure function of the form fields
    pub fn refresh_derived(&mut self) {
        self.visibility = NetworkVisibility::compute(&self.form);
        self.field_errors = self.form.validate();
    }
}

/// Enabled/disabled state of the dome shutter buttons. A command acceptance
/// flips them optimistically; telemetry does not touch them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DomeControl {
    pub open_enabled: bool,
    pub close_enabled: bool,
}

impl Default for DomeControl {
    fn default() -> Self {
        Self {
            open_enabled: true,
            close_enabled: true,
        }
    }
}

/// Dashboard state. The poll timer handle is deliberately private: the only
/// ways to touch it are the session methods below, which uphold the
/// at-most-one-active-interval invariant.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardState {
    pub view: Option<DashboardView>,
    /// "Station not ready" while the device answers 503, cleared on data
    pub station_status: Option<String>,
    /// Verbatim response of the last manual update check
    pub ota_message: Option<String>,
    pub dome_control: DomeControl,

    poll_timer: Option<TimerId>,
    next_timer: TimerId,
}

impl DashboardState {
    /// Open a new poll session: retires the current interval (if any) and
    /// hands out a fresh id. Returns `(retired, fresh)` so the caller can
    /// cancel the one and start the other.
    pub fn begin_poll_session(&mut self) -> (Option<TimerId>, TimerId) {
        let retired = self.poll_timer.take();
        self.next_timer += 1;
        let fresh = self.next_timer;
        self.poll_timer = Some(fresh);
        (retired, fresh)
    }

    /// Close the poll session, returning the interval to cancel. Idempotent:
    /// with no session open this is a no-op returning `None`.
    pub fn end_poll_session(&mut self) -> Option<TimerId> {
        self.poll_timer.take()
    }

    pub fn active_poll_timer(&self) -> Option<TimerId> {
        self.poll_timer
    }

    /// Whether an id belongs to the current poll session; ticks and responses
    /// from retired sessions are stale and must not render.
    pub fn is_current_session(&self, id: TimerId) -> bool {
        self.poll_timer == Some(id)
    }
}
