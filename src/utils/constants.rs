/// Field that defines the observation count of a run
pub const LONGITUDE_FIELD: &str = "longitude";
pub const LATITUDE_FIELD: &str = "latitude";

/// Field names that resolve to the scene acquisition instant
pub const SCENE_TIME_ALIASES: [&str; 2] = ["nominal_time", "start_time"];

/// Region identifier meaning "store every observation"
pub const NO_REGION: &str = "None";

/// Database credentials
pub const POSTGIS_USER_VAR: &str = "POSTGIS_USER";
pub const POSTGIS_PASSWORD_VAR: &str = "POSTGIS_PASSWORD";

/// Conversion names
pub const TO_INT16: &str = "to_int16";
pub const TO_UINT16: &str = "to_uint16";
pub const TO_INT32: &str = "to_int32";
pub const TO_FLOAT32: &str = "to_float32";
pub const TO_FLOAT64: &str = "to_float64";
pub const DIVIDE_BY_MILLION: &str = "divide_by_million";
pub const DATETIME64_TO_STR: &str = "datetime64_to_str";
pub const DATETIME_TO_STR: &str = "datetime_to_str";

/// Timestamp text formats
pub const UTC_MICROS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f+00:00";
pub const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MICROS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
