/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates; renders only when at
/// least one field actually changed.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.status_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.active_panel, panel;
///     model.is_loading, false
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for the station's GET-style command endpoints (dome shutter,
/// lookout). Issues the request and wraps the classified tri-state outcome
/// (accepted / busy / failed) in the given dashboard response event.
///
/// ```ignore
/// actuator_get!("/open_dome_shutter", OpenDomeShutterResponse, "Open dome shutter")
/// ```
#[macro_export]
macro_rules! actuator_get {
    ($endpoint:expr, $response_event:ident, $action:expr) => {{
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .build()
            .then_send(|result| {
                $crate::events::Event::Dashboard($crate::events::DashboardEvent::$response_event(
                    $crate::http_helpers::actuator_outcome($action, result),
                ))
            })
    }};
}
