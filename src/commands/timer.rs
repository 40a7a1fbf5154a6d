//! Timer command definitions.
//!
//! These types define the interface between the Core and the Shell for
//! repeating intervals. The Shell owns the actual `setInterval` handle: a
//! `Start` operation asks it to create an interval and is acknowledged with
//! `Started`; every subsequent firing of that interval is delivered by the
//! Shell as a regular app event carrying the interval id, until the Core
//! issues `Cancel` for that id.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Identifies one interval requested by the Core.
pub type TimerId = u32;

// Operations the Shell performs on its interval registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    Start { id: TimerId, period_ms: u32 },
    Cancel { id: TimerId },
}

// Acknowledgements from the Shell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Started { id: TimerId },
    Cancelled { id: TimerId },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// Command-based Timer API
pub struct Timer<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Timer<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    /// Ask the Shell to create a repeating interval
    pub fn start(id: TimerId, period_ms: u32) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Start { id, period_ms })
    }

    /// Ask the Shell to clear a previously created interval
    pub fn cancel(id: TimerId) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Cancel { id })
    }
}

/// Request builder for Timer operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: TimerOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: TimerOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = TimerOutput>>
    {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
