use crux_core::{render::render, Command};

use super::dashboard;
use crate::events::{Event, UiEvent};
use crate::model::Model;
use crate::types::Panel;
use crate::update_field;
use crate::Effect;

/// Handle panel navigation and other pure UI events.
///
/// Selecting a panel always succeeds; there are no guard conditions. The
/// dashboard is the only panel with entry/exit side effects: entering it
/// (re)starts the telemetry poll, leaving it stops the poll.
pub fn handle(event: UiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        UiEvent::SelectPanel(panel) => {
            model.active_panel = panel;
            if panel == Panel::Dashboard {
                dashboard::start_polling(model)
            } else {
                Command::all([dashboard::stop_polling(model), render()])
            }
        }

        UiEvent::ClearStatus => update_field!(model.status_message, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_panel_makes_it_the_only_active_one() {
        let mut model = Model::default();
        assert_eq!(model.active_panel, Panel::General);

        let _ = handle(UiEvent::SelectPanel(Panel::Lookout), &mut model);
        assert_eq!(model.active_panel, Panel::Lookout);

        let _ = handle(UiEvent::SelectPanel(Panel::Network), &mut model);
        assert_eq!(model.active_panel, Panel::Network);
    }

    #[test]
    fn entering_the_dashboard_opens_a_poll_session() {
        let mut model = Model::default();

        let _ = handle(UiEvent::SelectPanel(Panel::Dashboard), &mut model);

        assert_eq!(model.active_panel, Panel::Dashboard);
        assert!(model.dashboard.active_poll_timer().is_some());
    }

    #[test]
    fn leaving_the_dashboard_closes_the_poll_session() {
        let mut model = Model::default();

        let _ = handle(UiEvent::SelectPanel(Panel::Dashboard), &mut model);
        let _ = handle(UiEvent::SelectPanel(Panel::Network), &mut model);

        assert_eq!(model.dashboard.active_poll_timer(), None);
    }

    #[test]
    fn reselecting_the_dashboard_keeps_exactly_one_poll_session() {
        let mut model = Model::default();

        let _ = handle(UiEvent::SelectPanel(Panel::Dashboard), &mut model);
        let first = model.dashboard.active_poll_timer();
        let _ = handle(UiEvent::SelectPanel(Panel::Dashboard), &mut model);
        let second = model.dashboard.active_poll_timer();

        assert!(first.is_some());
        assert!(second.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn clear_status_resets_the_status_line() {
        let mut model = Model {
            status_message: Some("Some status".to_string()),
            ..Default::default()
        };

        let _ = handle(UiEvent::ClearStatus, &mut model);

        assert_eq!(model.status_message, None);
    }
}
