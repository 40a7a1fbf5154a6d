use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;

/// Validate IPv4 address format
pub fn is_valid_ipv4(ip: &str) -> bool {
    if ip.is_empty() {
        return true; // Empty is considered valid (for optional fields)
    }

    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        if let Ok(num) = part.parse::<u32>() {
            num <= 255
        } else {
            false
        }
    })
}

/// A free-form form field.
///
/// The firmware's config JSON is loosely typed: the same key may arrive as a
/// string, a number or a bool depending on the firmware revision. Whatever
/// arrives is normalized to its text form, which is also what the form
/// submits back.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormValue(pub String);

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FormValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl serde::de::Visitor<'_> for ScalarVisitor {
            type Value = FormValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number or bool")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FormValue(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FormValue(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FormValue(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(FormValue(v.to_string()))
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(FormValue(if v { "1" } else { "0" }.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A checkbox-backed field.
///
/// Accepts JSON bools, numbers and the firmware's `"0"`/`"1"` strings on the
/// way in; serializes as a plain bool (the form submission turns it back into
/// `"0"`/`"1"`).
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Flag(pub bool);

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FlagVisitor;

        impl serde::de::Visitor<'_> for FlagVisitor {
            type Value = Flag;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a bool, number or \"0\"/\"1\" string")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Flag(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Flag(v != 0))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Flag(v != 0))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Flag(v != 0.0))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Flag(matches!(v, "1" | "true" | "on")))
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Lenient deserializer for the firmware's numeric enumerations: accepts the
/// canonical integer, its decimal string form, and any legacy name the older
/// config pages used. Unknown values fall back to the enum default rather
/// than failing the whole config load.
macro_rules! lenient_enum {
    ($ty:ident, { $($name:literal => $variant:ident),* $(,)? }) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct EnumVisitor;

                impl serde::de::Visitor<'_> for EnumVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "an integer or string {}", stringify!($ty))
                    }

                    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                        Ok($ty::from_index(v as i64))
                    }

                    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                        Ok($ty::from_index(v))
                    }

                    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                        Ok($ty::from_index(v as i64))
                    }

                    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        if let Ok(n) = v.parse::<i64>() {
                            return Ok($ty::from_index(n));
                        }
                        Ok(match v {
                            $($name => $ty::$variant,)*
                            _ => $ty::default(),
                        })
                    }
                }

                deserializer.deserialize_any(EnumVisitor)
            }
        }
    };
}

/// WiFi operating mode (firmware `aws_wifi_mode_t`)
#[derive(Debug, Clone, Copy, Default, Serialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum WifiMode {
    #[default]
    Station = 0,
    AccessPoint = 1,
    Both = 2,
}

impl WifiMode {
    fn from_index(i: i64) -> Self {
        match i {
            1 => Self::AccessPoint,
            2 => Self::Both,
            _ => Self::Station,
        }
    }
}

lenient_enum!(WifiMode, {
    "Client" => Station,
    "AP" => AccessPoint,
    "Both" => Both,
});

/// IP assignment mode (firmware `aws_ip_mode_t`)
#[derive(Debug, Clone, Copy, Default, Serialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum IpMode {
    #[default]
    Dhcp = 0,
    Fixed = 1,
}

impl IpMode {
    fn from_index(i: i64) -> Self {
        if i == 1 {
            Self::Fixed
        } else {
            Self::Dhcp
        }
    }
}

lenient_enum!(IpMode, {
    "dhcp" => Dhcp,
    "fixed" => Fixed,
});

/// Network interface (firmware `aws_iface_t`).
///
/// `Ethernet` is the wired preference value of the current firmware header;
/// older config pages disagreed on the exact number, so the mapping lives
/// here and nowhere else.
#[derive(Debug, Clone, Copy, Default, Serialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum Iface {
    WifiAp = 0,
    #[default]
    WifiSta = 1,
    Ethernet = 2,
}

impl Iface {
    fn from_index(i: i64) -> Self {
        match i {
            0 => Self::WifiAp,
            2 => Self::Ethernet,
            _ => Self::WifiSta,
        }
    }
}

lenient_enum!(Iface, {
    "wifi" => WifiSta,
    "ethernet" => Ethernet,
});

/// Cloud coverage formula selector
#[derive(Debug, Clone, Copy, Default, Serialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum CloudFormula {
    #[default]
    Aws = 0,
    Aag = 1,
}

impl CloudFormula {
    fn from_index(i: i64) -> Self {
        if i == 1 {
            Self::Aag
        } else {
            Self::Aws
        }
    }
}

lenient_enum!(CloudFormula, {
    "aws" => Aws,
    "aag" => Aag,
});

/// The editable device configuration, one field per persisted setting.
///
/// This struct is the single binding table between the device's flat config
/// JSON and the form: each field is declared once with its key, widget kind
/// (its Rust type) and formatter (the type's serde impl). Keys missing from
/// the device's response keep their defaults; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigForm {
    // General
    pub tzname: FormValue,
    pub automatic_updates: Flag,
    pub data_push: Flag,
    pub push_freq: FormValue,
    pub ota_url: FormValue,
    pub discord_wh: FormValue,
    pub remote_server: FormValue,
    pub url_path: FormValue,

    // Network
    pub wifi_mode: WifiMode,
    pub pref_iface: Iface,
    pub has_ethernet: Flag,
    pub eth_ip_mode: IpMode,
    pub eth_ip: FormValue,
    pub eth_gw: FormValue,
    pub eth_dns: FormValue,
    #[serde(alias = "wifi_sta_ssid")]
    pub sta_ssid: FormValue,
    pub wifi_sta_password: FormValue,
    pub wifi_sta_ip_mode: IpMode,
    pub wifi_sta_ip: FormValue,
    pub wifi_sta_gw: FormValue,
    pub wifi_sta_dns: FormValue,
    #[serde(alias = "wifi_ap_ssid")]
    pub ap_ssid: FormValue,
    pub wifi_ap_password: FormValue,
    pub wifi_ap_ip: FormValue,
    pub wifi_ap_gw: FormValue,
    pub wifi_ap_dns: FormValue,

    // Sensors
    pub has_bme: Flag,
    pub has_tsl: Flag,
    pub has_mlx: Flag,
    pub has_ws: Flag,
    pub has_wv: Flag,
    pub has_rain_sensor: Flag,
    pub has_gps: Flag,
    pub anemometer_model: FormValue,
    pub wind_vane_model: FormValue,

    // Devices
    pub has_dome: Flag,

    // Cloud coverage coefficients
    pub k1: FormValue,
    pub k2: FormValue,
    pub k3: FormValue,
    pub k4: FormValue,
    pub k5: FormValue,
    pub k6: FormValue,
    pub k7: FormValue,
    pub cc_aws_cloudy: FormValue,
    pub cc_aws_overcast: FormValue,
    pub cc_aag_cloudy: FormValue,
    pub cc_aag_overcast: FormValue,

    // Lookout
    pub lookout_enabled: Flag,
    pub cloud_coverage_formula: CloudFormula,
    pub unsafe_wind_speed_1_active: Flag,
    pub unsafe_wind_speed_1_max: FormValue,
    pub unsafe_wind_speed_1_delay: FormValue,
    pub unsafe_wind_speed_1_missing: Flag,
    pub unsafe_wind_speed_2_active: Flag,
    pub unsafe_wind_speed_2_max: FormValue,
    pub unsafe_wind_speed_2_delay: FormValue,
    pub unsafe_wind_speed_2_missing: Flag,
    pub unsafe_cloud_coverage_1_active: Flag,
    pub unsafe_cloud_coverage_1_max: FormValue,
    pub unsafe_cloud_coverage_1_delay: FormValue,
    pub unsafe_cloud_coverage_1_missing: Flag,
    pub unsafe_cloud_coverage_2_active: Flag,
    pub unsafe_cloud_coverage_2_max: FormValue,
    pub unsafe_cloud_coverage_2_delay: FormValue,
    pub unsafe_cloud_coverage_2_missing: Flag,
    pub unsafe_rain_intensity_active: Flag,
    pub unsafe_rain_intensity_max: FormValue,
    pub unsafe_rain_intensity_delay: FormValue,
    pub unsafe_rain_intensity_missing: Flag,
    pub safe_wind_speed_active: Flag,
    pub safe_wind_speed_max: FormValue,
    pub safe_wind_speed_delay: FormValue,
    pub safe_cloud_coverage_1_active: Flag,
    pub safe_cloud_coverage_1_max: FormValue,
    pub safe_cloud_coverage_1_delay: FormValue,
    pub safe_cloud_coverage_2_active: Flag,
    pub safe_cloud_coverage_2_max: FormValue,
    pub safe_cloud_coverage_2_delay: FormValue,
    pub safe_rain_intensity_active: Flag,
    pub safe_rain_intensity_max: FormValue,
    pub safe_rain_intensity_delay: FormValue,

    // Alpaca
    pub alpaca_iface: Iface,
}

impl ConfigForm {
    /// The Alpaca server can only listen on the wired interface when that is
    /// the preferred interface; the stored preference applies otherwise.
    pub fn effective_alpaca_iface(&self) -> Iface {
        if self.pref_iface == Iface::Ethernet {
            Iface::Ethernet
        } else {
            self.alpaca_iface
        }
    }

    /// Serialize the whole form (plus the opaque root CA blob) into the flat
    /// key→string map the device expects as its replacement configuration.
    /// Bools become `"0"`/`"1"`, enumerations their decimal value, everything
    /// else is passed through verbatim. No diffing: the full set is sent.
    pub fn to_form_values(&self, root_ca: &str) -> BTreeMap<String, String> {
        let fields = serde_json::to_value(self).unwrap_or_default();

        let mut values: BTreeMap<String, String> = fields
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), scalar_to_string(value)))
                    .collect()
            })
            .unwrap_or_default();

        values.insert(
            "alpaca_iface".to_string(),
            (self.effective_alpaca_iface() as u8).to_string(),
        );
        values.insert("root_ca".to_string(), root_ca.to_string());
        values
    }

    /// Check the dotted-quad fields. Errors are advisory and never block a
    /// submit; the device re-validates on its side.
    pub fn validate(&self) -> HashMap<String, String> {
        let addresses = [
            ("eth_ip", &self.eth_ip),
            ("eth_gw", &self.eth_gw),
            ("eth_dns", &self.eth_dns),
            ("wifi_sta_ip", &self.wifi_sta_ip),
            ("wifi_sta_gw", &self.wifi_sta_gw),
            ("wifi_sta_dns", &self.wifi_sta_dns),
            ("wifi_ap_ip", &self.wifi_ap_ip),
            ("wifi_ap_gw", &self.wifi_ap_gw),
            ("wifi_ap_dns", &self.wifi_ap_dns),
        ];

        let mut errors = HashMap::new();
        for (field, value) in addresses {
            if !is_valid_ipv4(value.as_str()) {
                errors.insert(field.to_string(), "Invalid IPv4 address".to_string());
            }
        }
        errors
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Which groups of network fields the form shows, and which address inputs
/// are editable. A pure function of the form's enum fields, re-derived on
/// every load and on every toggle of those fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkVisibility {
    /// The wired/wireless preference row itself (only offered when the board
    /// has an ethernet port)
    pub iface_choice: bool,
    pub wifi_fields: bool,
    pub eth_fields: bool,
    /// Station-side WiFi fields (SSID, credentials, addressing)
    pub sta_fields: bool,
    /// Access-point-side WiFi fields
    pub ap_fields: bool,
    pub sta_addr_editable: bool,
    pub eth_addr_editable: bool,
    /// The Alpaca interface selector disappears when the station is wired
    /// (the server is then forced onto ethernet)
    pub alpaca_iface_choice: bool,
}

impl NetworkVisibility {
    pub fn compute(form: &ConfigForm) -> Self {
        let wired = form.pref_iface == Iface::Ethernet;
        let wifi = !wired;
        Self {
            iface_choice: form.has_ethernet.0,
            wifi_fields: wifi,
            eth_fields: wired,
            sta_fields: wifi && matches!(form.wifi_mode, WifiMode::Station | WifiMode::Both),
            ap_fields: wifi && matches!(form.wifi_mode, WifiMode::AccessPoint | WifiMode::Both),
            sta_addr_editable: form.wifi_sta_ip_mode == IpMode::Fixed,
            eth_addr_editable: form.eth_ip_mode == IpMode::Fixed,
            alpaca_iface_choice: wifi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config_json() -> &'static str {
        r#"{
            "tzname": "Europe/Paris",
            "automatic_updates": true,
            "data_push": "1",
            "push_freq": 300,
            "ota_url": "https://example.org/ota.json",
            "remote_server": "example.org",
            "url_path": "/aws",
            "wifi_mode": 2,
            "pref_iface": 1,
            "has_ethernet": false,
            "eth_ip_mode": 0,
            "sta_ssid": "obs-wifi",
            "wifi_sta_password": "secret",
            "wifi_sta_ip_mode": 1,
            "wifi_sta_ip": "192.168.1.50",
            "wifi_sta_gw": "192.168.1.1",
            "wifi_sta_dns": "192.168.1.1",
            "ap_ssid": "AstroWeatherStation",
            "has_bme": true,
            "has_tsl": true,
            "has_mlx": false,
            "anemometer_model": "1",
            "k1": 33,
            "k2": 0,
            "k7": 0.5,
            "lookout_enabled": "1",
            "cloud_coverage_formula": "1",
            "unsafe_wind_speed_1_active": "1",
            "unsafe_wind_speed_1_max": 10,
            "unsafe_wind_speed_1_delay": 60,
            "unsafe_wind_speed_1_missing": "0",
            "alpaca_iface": 1
        }"#
    }

    #[test]
    fn mixed_scalar_forms_normalize() {
        let form: ConfigForm = serde_json::from_str(sample_config_json()).unwrap();

        assert_eq!(form.tzname, FormValue::from("Europe/Paris"));
        assert_eq!(form.automatic_updates, Flag(true));
        assert_eq!(form.data_push, Flag(true));
        assert_eq!(form.push_freq, FormValue::from("300"));
        assert_eq!(form.wifi_mode, WifiMode::Both);
        assert_eq!(form.pref_iface, Iface::WifiSta);
        assert_eq!(form.wifi_sta_ip_mode, IpMode::Fixed);
        assert_eq!(form.eth_ip_mode, IpMode::Dhcp);
        assert_eq!(form.lookout_enabled, Flag(true));
        assert_eq!(form.cloud_coverage_formula, CloudFormula::Aag);
        assert_eq!(form.k7, FormValue::from("0.5"));
        assert_eq!(form.unsafe_wind_speed_1_missing, Flag(false));
    }

    #[test]
    fn legacy_string_enums_normalize() {
        let form: ConfigForm =
            serde_json::from_str(r#"{"wifi_mode": "AP", "wifi_ap_ssid": "aws"}"#).unwrap();
        assert_eq!(form.wifi_mode, WifiMode::AccessPoint);
        assert_eq!(form.ap_ssid, FormValue::from("aws"));
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let form: ConfigForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form, ConfigForm::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let form: ConfigForm =
            serde_json::from_str(r#"{"tzname": "UTC", "not_a_field": 42}"#).unwrap();
        assert_eq!(form.tzname, FormValue::from("UTC"));
    }

    #[test]
    fn form_values_round_trip() {
        let form: ConfigForm = serde_json::from_str(sample_config_json()).unwrap();
        let values = form.to_form_values("---CERT---");

        assert_eq!(values["tzname"], "Europe/Paris");
        assert_eq!(values["automatic_updates"], "1");
        assert_eq!(values["data_push"], "1");
        assert_eq!(values["push_freq"], "300");
        assert_eq!(values["wifi_mode"], "2");
        assert_eq!(values["pref_iface"], "1");
        assert_eq!(values["wifi_sta_ip_mode"], "1");
        assert_eq!(values["wifi_sta_ip"], "192.168.1.50");
        assert_eq!(values["lookout_enabled"], "1");
        assert_eq!(values["cloud_coverage_formula"], "1");
        assert_eq!(values["unsafe_wind_speed_1_max"], "10");
        assert_eq!(values["k7"], "0.5");
        assert_eq!(values["alpaca_iface"], "1");
        assert_eq!(values["root_ca"], "---CERT---");
        // untouched fields serialize at their defaults
        assert_eq!(values["has_dome"], "0");
        assert_eq!(values["eth_ip"], "");
    }

    #[test]
    fn reload_of_serialized_values_is_identity() {
        let form: ConfigForm = serde_json::from_str(sample_config_json()).unwrap();
        let values = form.to_form_values("");

        // Feed the submitted map straight back in, as if the device echoed it
        let echoed = serde_json::to_string(&values).unwrap();
        let reloaded: ConfigForm = serde_json::from_str(&echoed).unwrap();

        assert_eq!(reloaded, form);
    }

    #[test]
    fn wired_preference_forces_alpaca_onto_ethernet() {
        let mut form = ConfigForm::default();
        form.alpaca_iface = Iface::WifiSta;
        form.pref_iface = Iface::Ethernet;

        assert_eq!(form.effective_alpaca_iface(), Iface::Ethernet);
        assert_eq!(form.to_form_values("")["alpaca_iface"], "2");
    }

    #[test]
    fn visibility_for_wireless_station_mode() {
        let form: ConfigForm = serde_json::from_str(
            r#"{"pref_iface": 1, "wifi_mode": 0, "wifi_sta_ip_mode": 0, "has_ethernet": true}"#,
        )
        .unwrap();
        let visibility = NetworkVisibility::compute(&form);

        assert!(visibility.iface_choice);
        assert!(visibility.wifi_fields);
        assert!(!visibility.eth_fields);
        assert!(visibility.sta_fields);
        assert!(!visibility.ap_fields);
        assert!(!visibility.sta_addr_editable);
        assert!(visibility.alpaca_iface_choice);
    }

    #[test]
    fn visibility_for_wired_preference() {
        let form: ConfigForm =
            serde_json::from_str(r#"{"pref_iface": 2, "eth_ip_mode": 1, "has_ethernet": true}"#)
                .unwrap();
        let visibility = NetworkVisibility::compute(&form);

        assert!(!visibility.wifi_fields);
        assert!(visibility.eth_fields);
        assert!(!visibility.sta_fields);
        assert!(!visibility.ap_fields);
        assert!(visibility.eth_addr_editable);
        assert!(!visibility.alpaca_iface_choice);
    }

    #[test]
    fn visibility_for_access_point_and_both_modes() {
        let ap_only: ConfigForm = serde_json::from_str(r#"{"wifi_mode": 1}"#).unwrap();
        let visibility = NetworkVisibility::compute(&ap_only);
        assert!(!visibility.sta_fields);
        assert!(visibility.ap_fields);

        let both: ConfigForm = serde_json::from_str(r#"{"wifi_mode": "Both"}"#).unwrap();
        let visibility = NetworkVisibility::compute(&both);
        assert!(visibility.sta_fields);
        assert!(visibility.ap_fields);
    }

    #[test]
    fn ipv4_validation() {
        assert!(is_valid_ipv4(""));
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(!is_valid_ipv4("192.168.1"));
        assert!(!is_valid_ipv4("192.168.1.256"));
        assert!(!is_valid_ipv4("not.an.ip.addr"));

        let mut form = ConfigForm::default();
        form.wifi_sta_ip = FormValue::from("300.1.1.1");
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("wifi_sta_ip"));
    }
}
