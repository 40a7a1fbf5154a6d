use crux_core::{render::render, Command};

use crate::events::{ConfigEvent, Event};
use crate::http_helpers::{
    build_url, process_json_response, process_status_response, process_string_response,
};
use crate::model::Model;
use crate::types::ConfigForm;
use crate::update_field;
use crate::{Effect, HttpCmd};

/// Handle configuration form events (load, edit, submit, reboot)
pub fn handle(event: ConfigEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Two independent fetches with no ordering guarantee: whichever
        // response lands first populates its own part of the state.
        ConfigEvent::Load => {
            model.start_loading();
            Command::all([
                render(),
                HttpCmd::get(build_url("/get_config"))
                    .build()
                    .then_send(|result| {
                        Event::Config(ConfigEvent::ConfigFetched(process_json_response(
                            "Configuration",
                            result,
                        )))
                    }),
                HttpCmd::get(build_url("/get_root_ca"))
                    .build()
                    .then_send(|result| {
                        Event::Config(ConfigEvent::RootCaFetched(process_string_response(
                            "Root CA",
                            result,
                        )))
                    }),
            ])
        }

        ConfigEvent::ConfigFetched(Ok(form)) => {
            model.config.form = form;
            model.config.refresh_derived();
            model.stop_loading();
            render()
        }

        ConfigEvent::ConfigFetched(Err(e)) => {
            // the form stays at its defaults; the status line is the only trace
            log::warn!("configuration load failed: {e}");
            model.set_status_and_render(e)
        }

        ConfigEvent::RootCaFetched(Ok(text)) => update_field!(model.config.root_ca, text),

        ConfigEvent::RootCaFetched(Err(e)) => {
            log::warn!("root CA load failed: {e}");
            Command::done()
        }

        ConfigEvent::FormUpdate { form_json } => {
            match serde_json::from_str::<ConfigForm>(&form_json) {
                Ok(form) => {
                    model.config.form = form;
                    model.config.refresh_derived();
                    render()
                }
                Err(e) => model.set_status_and_render(format!("Invalid form data: {e}")),
            }
        }

        ConfigEvent::SetWifiMode(mode) => {
            model.config.form.wifi_mode = mode;
            model.config.refresh_derived();
            render()
        }

        ConfigEvent::SetPrefIface(iface) => {
            model.config.form.pref_iface = iface;
            model.config.refresh_derived();
            render()
        }

        ConfigEvent::SetStaIpMode(mode) => {
            model.config.form.wifi_sta_ip_mode = mode;
            model.config.refresh_derived();
            render()
        }

        ConfigEvent::SetEthIpMode(mode) => {
            model.config.form.eth_ip_mode = mode;
            model.config.refresh_derived();
            render()
        }

        // The full form is sent as the replacement configuration, no diffing
        ConfigEvent::Submit => {
            let values = model.config.form.to_form_values(&model.config.root_ca);
            model.start_loading();
            match HttpCmd::post(build_url("/set_config"))
                .header("Content-Type", "application/json;charset=UTF-8")
                .body_json(&values)
            {
                Ok(builder) => Command::all([
                    render(),
                    builder.build().then_send(|result| {
                        Event::Config(ConfigEvent::SubmitResponse(process_status_response(
                            "Save configuration",
                            result,
                        )))
                    }),
                ]),
                Err(e) => {
                    model.set_status_and_render(format!("Failed to create save request: {e}"))
                }
            }
        }

        // Fire and forget: nothing is shown on success
        ConfigEvent::SubmitResponse(result) => {
            if let Err(e) = result {
                log::warn!("save configuration failed: {e}");
            }
            model.stop_loading();
            render()
        }

        ConfigEvent::Reboot => HttpCmd::get(build_url("/reboot"))
            .build()
            .then_send(|result| {
                Event::Config(ConfigEvent::RebootResponse(process_status_response(
                    "Reboot", result,
                )))
            }),

        ConfigEvent::RebootResponse(result) => {
            if let Err(e) = result {
                log::debug!("reboot request: {e}");
            }
            Command::done()
        }
    }
}
