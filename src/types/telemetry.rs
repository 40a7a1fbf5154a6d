use serde::{Deserialize, Serialize};

// Sensor/device bits of the `available_sensors` mask (firmware contract)
pub const MLX_SENSOR: u8 = 0x01;
pub const TSL_SENSOR: u8 = 0x02;
pub const BME_SENSOR: u8 = 0x04;
pub const WV_SENSOR: u8 = 0x08;
pub const WS_SENSOR: u8 = 0x10;
pub const RAIN_SENSOR: u8 = 0x20;
pub const GPS_DEVICE: u8 = 0x40;
pub const DOME_DEVICE: u8 = 0x80;

pub const WIND_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

// Index 12 is reached after an OTA update
pub const RESET_REASONS: [&str; 13] = [
    "Unknown",
    "Power on",
    "PIN reset",
    "Reboot",
    "Exception/Panic reset",
    "Interrupt WD",
    "Task WD",
    "Other WD",
    "Deepsleep",
    "Brownout",
    "SDIO reset",
    "USB reset",
    "JTAG reset",
];

pub const DOME_SHUTTER_STATUS: [&str; 5] = ["Open", "Closed", "Opening", "Closing", "Error"];

pub const LOOKOUT_ACTIVE: &str = "Active";
pub const LOOKOUT_SUSPENDED: &str = "Inactive/Suspended";

/// One full reading set from `/get_station_data`. Replaced wholesale on every
/// poll tick; never merged, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySnapshot {
    pub battery_level: f64,
    pub timestamp: i64,
    pub rain_event: bool,
    pub temperature: f64,
    pub pressure: f64,
    pub sl_pressure: f64,
    pub rh: f64,
    pub dew_point: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: i64,
    pub rain_intensity: f64,
    pub sky_temperature: f64,
    pub raw_sky_temperature: f64,
    pub ambient_temperature: f64,
    pub cloud_coverage: f64,
    pub msas: f64,
    pub nelm: f64,
    pub lux: f64,
    pub irradiance: f64,
    pub uptime: u64,
    pub build_id: String,
    pub reset_reason: i64,
    pub init_heap_size: u64,
    pub current_heap_size: u64,
    pub largest_free_heap_block: u64,
    pub ota_board: String,
    pub ota_device: String,
    pub ota_config: String,
    pub ota_code: i64,
    pub gps_fix: bool,
    pub gps_latitude: f64,
    pub gps_longitude: f64,
    pub gps_altitude: f64,
    pub gps_time_sec: i64,
    pub gps_time_usec: i64,
    pub available_sensors: u8,
    pub shutter_status: i64,
    pub lookout_active: bool,
}

/// Per-sensor presence, one independent indicator per bit. The BME module
/// carries the temperature, pressure and humidity channels, the TSL module
/// the light and sky-quality channels; those indicators share a bit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorIndicators {
    pub temperature: bool,
    pub pressure: bool,
    pub humidity: bool,
    pub wind_speed: bool,
    pub wind_vane: bool,
    pub rain: bool,
    pub light: bool,
    pub sky_quality: bool,
    pub cloud: bool,
    pub gps: bool,
    pub dome: bool,
}

impl SensorIndicators {
    pub fn from_bitmask(mask: u8) -> Self {
        let bme = mask & BME_SENSOR != 0;
        let tsl = mask & TSL_SENSOR != 0;
        Self {
            temperature: bme,
            pressure: bme,
            humidity: bme,
            wind_speed: mask & WS_SENSOR != 0,
            wind_vane: mask & WV_SENSOR != 0,
            rain: mask & RAIN_SENSOR != 0,
            light: tsl,
            sky_quality: tsl,
            cloud: mask & MLX_SENSOR != 0,
            gps: mask & GPS_DEVICE != 0,
            dome: mask & DOME_DEVICE != 0,
        }
    }
}

/// 8-point compass name for a wind vane reading. Negative means the vane has
/// no reading to offer.
pub fn wind_direction_name(index: i64) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|i| WIND_DIRECTIONS.get(i))
        .copied()
        .unwrap_or("Unavailable")
}

pub fn reset_reason_name(index: i64) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|i| RESET_REASONS.get(i))
        .copied()
        .unwrap_or("Unknown")
}

pub fn dome_shutter_status_name(index: i64) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|i| DOME_SHUTTER_STATUS.get(i))
        .copied()
        .unwrap_or("Unknown")
}

/// Human-readable phrase for the firmware's OTA result code
pub fn ota_status_message(code: i64) -> &'static str {
    match code {
        -3 => "Update available",
        -2 => "No update profile",
        -1 => "No update available",
        0 => "Ok",
        1 => "Network error (HTTP)",
        2 => "Write error",
        3 => "Profile error",
        4 => "Profile Failed",
        _ => "Unknown",
    }
}

/// Decompose an uptime in seconds into the dashboard's day/hour/minute/second
/// phrase
pub fn format_uptime(uptime: u64) -> String {
    let days = uptime / 86_400;
    let hours = (uptime % 86_400) / 3_600;
    let minutes = (uptime % 3_600) / 60;
    let seconds = uptime % 60;
    format!("{days} days {hours} hours {minutes} minutes {seconds} seconds")
}

/// Reassemble the GPS clock from its whole-seconds and microseconds fields
/// and render it as a UTC `YYYY-MM-DD HH:MM:SS` stamp
pub fn format_gps_time(seconds: i64, microseconds: i64) -> String {
    let extra_seconds = microseconds.div_euclid(1_000_000);
    let nanos = (microseconds.rem_euclid(1_000_000) * 1_000) as u32;
    match chrono::DateTime::from_timestamp(seconds + extra_seconds, nanos) {
        Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Unknown".to_string(),
    }
}

/// The dashboard, fully rendered: a pure projection of one
/// [`TelemetrySnapshot`] into display strings and indicator flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardView {
    pub battery_level: String,
    pub build_id: String,
    pub uptime: String,
    pub reset_reason: String,
    pub initial_heap: String,
    pub current_heap: String,
    pub largest_heap_block: String,
    pub ota_board: String,
    pub ota_device: String,
    pub ota_config: String,
    pub ota_status: String,
    pub gps_fix: String,
    pub gps_has_fix: bool,
    pub gps_latitude: String,
    pub gps_longitude: String,
    pub gps_altitude: String,
    pub gps_time: String,
    pub dome_shutter_status: String,
    pub lookout_status: String,
    pub temperature: String,
    pub dew_point: String,
    pub pressure: String,
    pub rh: String,
    pub wind_speed: String,
    pub wind_gust: String,
    pub wind_direction: String,
    pub msas: String,
    pub nelm: String,
    pub illuminance: String,
    pub irradiance: String,
    pub ambient_temperature: String,
    pub sky_temperature: String,
    pub raw_sky_temperature: String,
    pub cloud_coverage: String,
    pub rain_intensity: String,
    pub sensors: SensorIndicators,
}

impl DashboardView {
    pub fn project(data: &TelemetrySnapshot) -> Self {
        Self {
            battery_level: format!("{}%", data.battery_level),
            build_id: format!("V{}", data.build_id),
            uptime: format_uptime(data.uptime),
            reset_reason: reset_reason_name(data.reset_reason).to_string(),
            initial_heap: format!("{} bytes", data.init_heap_size),
            current_heap: format!("{} bytes", data.current_heap_size),
            largest_heap_block: format!("{} bytes", data.largest_free_heap_block),
            ota_board: data.ota_board.clone(),
            ota_device: data.ota_device.clone(),
            ota_config: data.ota_config.clone(),
            ota_status: ota_status_message(data.ota_code).to_string(),
            gps_fix: if data.gps_fix { "Yes" } else { "No" }.to_string(),
            gps_has_fix: data.gps_fix,
            gps_latitude: data.gps_latitude.to_string(),
            gps_longitude: data.gps_longitude.to_string(),
            gps_altitude: data.gps_altitude.to_string(),
            gps_time: format_gps_time(data.gps_time_sec, data.gps_time_usec),
            dome_shutter_status: dome_shutter_status_name(data.shutter_status).to_string(),
            lookout_status: if data.lookout_active {
                LOOKOUT_ACTIVE
            } else {
                LOOKOUT_SUSPENDED
            }
            .to_string(),
            temperature: format!("{:.2}", data.temperature),
            dew_point: format!("{:.2}", data.dew_point),
            pressure: format!("{:.2}", data.pressure),
            rh: format!("{:.2}", data.rh),
            wind_speed: format!("{:.2}", data.wind_speed),
            wind_gust: format!("{:.2}", data.wind_gust),
            wind_direction: wind_direction_name(data.wind_direction).to_string(),
            msas: format!("{:.2}", data.msas),
            nelm: format!("{:.2}", data.nelm),
            illuminance: format!("{:.2}", data.lux),
            irradiance: format!("{:.2}", data.irradiance),
            ambient_temperature: format!("{:.2}", data.ambient_temperature),
            sky_temperature: format!("{:.2}", data.sky_temperature),
            raw_sky_temperature: format!("{:.2}", data.raw_sky_temperature),
            cloud_coverage: data.cloud_coverage.to_string(),
            rain_intensity: data.rain_intensity.to_string(),
            sensors: SensorIndicators::from_bitmask(data.available_sensors),
        }
    }
}
