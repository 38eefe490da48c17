#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! [`CarouselConfig`] mirrors the options object accepted by the JS
//! constructor. Only `id`, `width` and `height` are required; everything else
//! falls back to the defaults below. Dimensions accept either a number or a
//! CSS-ish string (`"600px"`), read up to the first non-numeric character.

use core::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Default stepper tick interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u32 = 5;
/// Default animation duration budget in milliseconds.
pub const DEFAULT_SPEED_MS: u32 = 300;
/// Default auto-advance period in milliseconds.
pub const DEFAULT_SWITCH_INTERVAL_MS: u32 = 3000;
/// Default wheel settle delay in milliseconds.
pub const DEFAULT_WHEEL_DEBOUNCE_MS: u32 = 20;

/// Carousel options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Id of the container element.
    pub id: String,
    /// Slide width in pixels.
    #[serde(deserialize_with = "deserialize_dimension")]
    pub width: f64,
    /// Slide height in pixels.
    #[serde(deserialize_with = "deserialize_dimension")]
    pub height: f64,
    /// Stepper tick interval (ms).
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Animation duration budget (ms).
    #[serde(default = "default_speed")]
    pub speed: u32,
    /// Auto-advance period (ms).
    #[serde(default = "default_switch_interval")]
    pub switch_interval: u32,
    /// Pause auto-advance while the pointer is over the widget.
    #[serde(default = "default_true")]
    pub pauseable: bool,
    /// Navigate with the mouse wheel.
    #[serde(default)]
    pub wheelable: bool,
    /// Render numeric index indicators.
    #[serde(default = "default_true")]
    pub support_index: bool,
    /// Render left/right arrow controls.
    #[serde(default = "default_true")]
    pub support_arrow_click: bool,
    /// Wheel settle delay (ms).
    #[serde(default = "default_wheel_debounce")]
    pub wheel_debounce: u32,
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_MS
}

fn default_speed() -> u32 {
    DEFAULT_SPEED_MS
}

fn default_switch_interval() -> u32 {
    DEFAULT_SWITCH_INTERVAL_MS
}

fn default_wheel_debounce() -> u32 {
    DEFAULT_WHEEL_DEBOUNCE_MS
}

fn default_true() -> bool {
    true
}

impl CarouselConfig {
    /// Create a config with the required fields and default options.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            interval: DEFAULT_INTERVAL_MS,
            speed: DEFAULT_SPEED_MS,
            switch_interval: DEFAULT_SWITCH_INTERVAL_MS,
            pauseable: true,
            wheelable: false,
            support_index: true,
            support_arrow_click: true,
            wheel_debounce: DEFAULT_WHEEL_DEBOUNCE_MS,
        }
    }

    /// Parse a JSON options object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingId);
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }
        for (field, value) in [
            ("interval", self.interval),
            ("speed", self.speed),
            ("switchInterval", self.switch_interval),
            ("wheelDebounce", self.wheel_debounce),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidTiming(field));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_interval(mut self, ms: u32) -> Self {
        self.interval = ms;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, ms: u32) -> Self {
        self.speed = ms;
        self
    }

    #[must_use]
    pub fn with_switch_interval(mut self, ms: u32) -> Self {
        self.switch_interval = ms;
        self
    }

    #[must_use]
    pub fn with_pauseable(mut self, enabled: bool) -> Self {
        self.pauseable = enabled;
        self
    }

    #[must_use]
    pub fn with_wheelable(mut self, enabled: bool) -> Self {
        self.wheelable = enabled;
        self
    }

    #[must_use]
    pub fn with_index(mut self, enabled: bool) -> Self {
        self.support_index = enabled;
        self
    }

    #[must_use]
    pub fn with_arrows(mut self, enabled: bool) -> Self {
        self.support_arrow_click = enabled;
        self
    }

    #[must_use]
    pub fn with_wheel_debounce(mut self, ms: u32) -> Self {
        self.wheel_debounce = ms;
        self
    }

    /// Stepper tick interval.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval))
    }

    /// Animation duration budget.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed))
    }

    /// Auto-advance period.
    #[must_use]
    pub fn switch_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.switch_interval))
    }

    /// Wheel settle delay.
    #[must_use]
    pub fn wheel_settle(&self) -> Duration {
        Duration::from_millis(u64::from(self.wheel_debounce))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Number(f64),
    Text(String),
}

fn deserialize_dimension<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawDimension::deserialize(deserializer)? {
        RawDimension::Number(n) => n,
        RawDimension::Text(s) => parse_leading_float(&s).unwrap_or(f64::NAN),
    })
}

/// Parse the longest numeric prefix of `s` (after leading whitespace).
///
/// `"600px"` → 600, `" 12.5em"` → 12.5, `"px"` → `None`.
#[must_use]
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_fill_optional_fields() {
        let config =
            CarouselConfig::from_json_str(r#"{"id":"hero","width":500,"height":200}"#).unwrap();
        assert_eq!(config, CarouselConfig::new("hero", 500.0, 200.0));
        assert!(config.pauseable);
        assert!(!config.wheelable);
        assert_eq!(config.switch_period(), Duration::from_secs(3));
    }

    #[test]
    fn camel_case_options() {
        let config = CarouselConfig::from_json_str(
            r#"{"id":"a","width":"600px","height":"300","switchInterval":1000,
                "supportIndex":false,"supportArrowClick":false,"wheelable":true}"#,
        )
        .unwrap();
        assert_eq!(config.width, 600.0);
        assert_eq!(config.height, 300.0);
        assert_eq!(config.switch_interval, 1000);
        assert!(!config.support_index);
        assert!(!config.support_arrow_click);
        assert!(config.wheelable);
    }

    #[test]
    fn missing_height_is_parse_error() {
        let err = CarouselConfig::from_json_str(r#"{"id":"a","width":10}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("height")));
    }

    #[test]
    fn non_numeric_dimension_rejected() {
        let err =
            CarouselConfig::from_json_str(r#"{"id":"a","width":"wide","height":10}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDimension { field: "width", .. }
        ));
    }

    #[test]
    fn empty_id_rejected() {
        let err = CarouselConfig::new(" ", 10.0, 10.0).validate().unwrap_err();
        assert_eq!(err, ConfigError::MissingId);
    }

    #[test]
    fn zero_timing_rejected() {
        let err = CarouselConfig::new("a", 10.0, 10.0)
            .with_interval(0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTiming("interval"));
    }

    #[test]
    fn leading_float_prefixes() {
        assert_eq!(parse_leading_float("600px"), Some(600.0));
        assert_eq!(parse_leading_float("  12.5em"), Some(12.5));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e2px"), Some(100.0));
        assert_eq!(parse_leading_float("1em"), Some(1.0));
        assert_eq!(parse_leading_float("px"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }
}
