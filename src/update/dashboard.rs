use crux_core::{render::render, Command};

use crate::actuator_get;
use crate::commands::timer::TimerId;
use crate::events::{DashboardEvent, Event, TelemetryOutcome};
use crate::http_helpers::{
    build_url, extract_error_message, is_response_success, process_string_response, ActuatorOutcome,
};
use crate::model::Model;
use crate::types::{DashboardView, LOOKOUT_ACTIVE, LOOKOUT_SUSPENDED};
use crate::update_field;
use crate::{Effect, HttpCmd, TimerCmd};

/// Refresh cadence of the dashboard
pub const POLL_PERIOD_MS: u32 = 10_000;

const STATION_NOT_READY: &str = "Station not ready";

/// Handle dashboard events: poll lifecycle, telemetry, actuators
pub fn handle(event: DashboardEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        DashboardEvent::StartPolling => start_polling(model),
        DashboardEvent::StopPolling => stop_polling(model),

        DashboardEvent::PollTick { timer } => {
            if model.dashboard.is_current_session(timer) {
                fetch_station_data(timer)
            } else {
                log::debug!("dropping tick of retired poll interval {timer}");
                Command::done()
            }
        }

        DashboardEvent::TimerAck(output) => {
            log::debug!("timer acknowledgement: {output:?}");
            Command::done()
        }

        DashboardEvent::TelemetryFetched { session, outcome } => {
            if !model.dashboard.is_current_session(session) {
                // response of a torn-down dashboard session; never render it
                log::debug!("dropping station data of retired poll session {session}");
                return Command::done();
            }
            match outcome {
                TelemetryOutcome::Snapshot(data) => {
                    model.dashboard.view = Some(DashboardView::project(&data));
                    model.dashboard.station_status = None;
                    render()
                }
                TelemetryOutcome::Busy => update_field!(
                    model.dashboard.station_status,
                    Some(STATION_NOT_READY.to_string())
                ),
                TelemetryOutcome::Failed(e) => {
                    // keep showing the previous readings
                    log::warn!("station data fetch failed: {e}");
                    Command::done()
                }
            }
        }

        DashboardEvent::OpenDomeShutter => {
            actuator_get!("/open_dome_shutter", OpenDomeShutterResponse, "Open shutter")
        }
        DashboardEvent::CloseDomeShutter => {
            actuator_get!(
                "/close_dome_shutter",
                CloseDomeShutterResponse,
                "Close shutter"
            )
        }
        DashboardEvent::SuspendLookout => {
            actuator_get!("/suspend_lookout", SuspendLookoutResponse, "Suspend lookout")
        }
        DashboardEvent::ResumeLookout => {
            actuator_get!("/resume_lookout", ResumeLookoutResponse, "Resume lookout")
        }

        DashboardEvent::OpenDomeShutterResponse(outcome) => match outcome {
            ActuatorOutcome::Accepted => {
                model.dashboard.dome_control.open_enabled = false;
                model.dashboard.dome_control.close_enabled = true;
                render()
            }
            other => actuator_rejected("open shutter", &other),
        },

        DashboardEvent::CloseDomeShutterResponse(outcome) => match outcome {
            ActuatorOutcome::Accepted => {
                model.dashboard.dome_control.open_enabled = true;
                model.dashboard.dome_control.close_enabled = false;
                render()
            }
            other => actuator_rejected("close shutter", &other),
        },

        DashboardEvent::SuspendLookoutResponse(outcome) => match outcome {
            ActuatorOutcome::Accepted => set_lookout_status(model, LOOKOUT_SUSPENDED),
            other => actuator_rejected("suspend lookout", &other),
        },

        DashboardEvent::ResumeLookoutResponse(outcome) => match outcome {
            ActuatorOutcome::Accepted => set_lookout_status(model, LOOKOUT_ACTIVE),
            other => actuator_rejected("resume lookout", &other),
        },

        // A firmware update stops the station's reporting; do not poll over it
        DashboardEvent::OtaUpdate => {
            let mut commands = Vec::new();
            if let Some(retired) = model.dashboard.end_poll_session() {
                commands.push(cancel_timer(retired));
            }
            commands.push(
                HttpCmd::get(build_url("/ota_update"))
                    .build()
                    .then_send(|result| {
                        Event::Dashboard(DashboardEvent::OtaUpdateResponse(
                            process_string_response("Update check", result),
                        ))
                    }),
            );
            Command::all(commands)
        }

        DashboardEvent::OtaUpdateResponse(result) => {
            model.dashboard.ota_message = Some(match result {
                Ok(text) => text,
                Err(e) => format!("Error: {e}"),
            });
            render()
        }
    }
}

/// Open a poll session: one immediate fetch, then a repeating interval. Any
/// previous interval is cancelled first, so at most one is ever active.
pub fn start_polling(model: &mut Model) -> Command<Effect, Event> {
    let (retired, fresh) = model.dashboard.begin_poll_session();

    let mut commands = vec![render()];
    if let Some(retired) = retired {
        commands.push(cancel_timer(retired));
    }
    commands.push(fetch_station_data(fresh));
    commands.push(
        TimerCmd::start(fresh, POLL_PERIOD_MS)
            .build()
            .then_send(|output| Event::Dashboard(DashboardEvent::TimerAck(output))),
    );
    Command::all(commands)
}

/// Close the poll session, cancelling its interval. Idempotent.
pub fn stop_polling(model: &mut Model) -> Command<Effect, Event> {
    match model.dashboard.end_poll_session() {
        Some(retired) => cancel_timer(retired),
        None => Command::done(),
    }
}

fn cancel_timer(id: TimerId) -> Command<Effect, Event> {
    TimerCmd::cancel(id)
        .build()
        .then_send(|output| Event::Dashboard(DashboardEvent::TimerAck(output)))
}

fn fetch_station_data(session: TimerId) -> Command<Effect, Event> {
    HttpCmd::get(build_url("/get_station_data"))
        .build()
        .then_send(move |result| {
            Event::Dashboard(DashboardEvent::TelemetryFetched {
                session,
                outcome: station_data_outcome(result),
            })
        })
}

/// Classify one `/get_station_data` round trip: 200 carries a snapshot, 503
/// means the station is not ready yet, anything else is a failure that keeps
/// the previous readings on screen.
fn station_data_outcome(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> TelemetryOutcome {
    match result {
        Ok(mut response) => {
            if response.status() == crux_http::http::StatusCode::ServiceUnavailable {
                TelemetryOutcome::Busy
            } else if is_response_success(&response) {
                match response.take_body() {
                    Some(body) => match serde_json::from_slice(&body) {
                        Ok(data) => TelemetryOutcome::Snapshot(Box::new(data)),
                        Err(e) => {
                            TelemetryOutcome::Failed(format!("Station data: JSON parse error: {e}"))
                        }
                    },
                    None => TelemetryOutcome::Failed("Station data: Empty response body".to_string()),
                }
            } else {
                TelemetryOutcome::Failed(extract_error_message("Station data", &mut response))
            }
        }
        Err(e) => TelemetryOutcome::Failed(e.to_string()),
    }
}

/// Busy and failed actuator outcomes leave the model untouched; busy is a
/// normal device condition and is not surfaced at all.
fn actuator_rejected(action: &str, outcome: &ActuatorOutcome) -> Command<Effect, Event> {
    match outcome {
        ActuatorOutcome::Busy => log::debug!("{action}: device busy"),
        ActuatorOutcome::Failed(e) => log::warn!("{action}: {e}"),
        ActuatorOutcome::Accepted => unreachable!("accepted outcome passed to rejection handler"),
    }
    Command::done()
}

fn set_lookout_status(model: &mut Model, status: &str) -> Command<Effect, Event> {
    if let Some(view) = &mut model.dashboard.view {
        view.lookout_status = status.to_string();
        render()
    } else {
        Command::done()
    }
}
