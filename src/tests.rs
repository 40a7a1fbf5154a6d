use super::*;
use crux_core::testing::AppTester;

use crate::events::{ConfigEvent, DashboardEvent, Event, TelemetryOutcome, UiEvent};

#[test]
fn test_config_load_sets_loading() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(Event::Config(ConfigEvent::Load), &mut model);

    assert!(model.is_loading);
}

#[test]
fn test_initial_panel_is_general() {
    let model = Model::default();

    assert_eq!(model.active_panel, Panel::General);
    assert_eq!(model.dashboard.active_poll_timer(), None);
}

#[test]
fn test_dashboard_entry_and_exit_drive_the_poll() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Ui(UiEvent::SelectPanel(Panel::Dashboard)),
        &mut model,
    );
    assert!(model.dashboard.active_poll_timer().is_some());

    let _command = app.update(Event::Ui(UiEvent::SelectPanel(Panel::Network)), &mut model);
    assert_eq!(model.dashboard.active_poll_timer(), None);
}

#[test]
fn test_reselecting_dashboard_keeps_one_interval() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Ui(UiEvent::SelectPanel(Panel::Dashboard)),
        &mut model,
    );
    let first = model.dashboard.active_poll_timer();

    let _command = app.update(
        Event::Ui(UiEvent::SelectPanel(Panel::Dashboard)),
        &mut model,
    );
    let second = model.dashboard.active_poll_timer();

    assert!(second.is_some());
    assert_ne!(first, second);
}

#[test]
fn test_station_data_paints_the_dashboard() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Ui(UiEvent::SelectPanel(Panel::Dashboard)),
        &mut model,
    );
    let session = model.dashboard.active_poll_timer().unwrap();

    let data = TelemetrySnapshot {
        wind_direction: 3,
        ota_code: 0,
        available_sensors: WS_SENSOR | RAIN_SENSOR,
        ..Default::default()
    };
    let _command = app.update(
        Event::Dashboard(DashboardEvent::TelemetryFetched {
            session,
            outcome: TelemetryOutcome::Snapshot(Box::new(data)),
        }),
        &mut model,
    );

    let view = model.dashboard.view.as_ref().unwrap();
    assert_eq!(view.wind_direction, "SE");
    assert_eq!(view.ota_status, "Ok");
    assert!(view.sensors.wind_speed);
    assert!(view.sensors.rain);
    assert!(!view.sensors.temperature);
}

#[test]
fn test_station_data_after_leaving_the_dashboard_is_dropped() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Ui(UiEvent::SelectPanel(Panel::Dashboard)),
        &mut model,
    );
    let session = model.dashboard.active_poll_timer().unwrap();

    let _command = app.update(Event::Ui(UiEvent::SelectPanel(Panel::General)), &mut model);
    let _command = app.update(
        Event::Dashboard(DashboardEvent::TelemetryFetched {
            session,
            outcome: TelemetryOutcome::Snapshot(Box::new(TelemetrySnapshot::default())),
        }),
        &mut model,
    );

    assert_eq!(model.dashboard.view, None);
}

#[test]
fn test_clear_status() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        status_message: Some("Some status".to_string()),
        ..Default::default()
    };

    let _command = app.update(Event::Ui(UiEvent::ClearStatus), &mut model);

    assert_eq!(model.status_message, None);
}
