mod config;
mod dashboard;
mod panels;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Ui(event) => panels::handle(event, model),
        Event::Config(event) => config::handle(event, model),
        Event::Dashboard(event) => dashboard::handle(event, model),
    }
}
