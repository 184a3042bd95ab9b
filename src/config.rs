use crate::error::RangeError;
use crate::index::{KEY_RANGE_METERS, MAX_LEVEL};
use crate::range::OneWayPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Travel radius paired with the grid level the range is evaluated at.
///
/// Written as `"{radius}/{level}"`, e.g. `"500/16"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CalculationMethod {
    pub radius_meters: f64,
    pub grid_level: u8,
}

impl CalculationMethod {
    /// 500 m evaluated on level 16 cells.
    pub const L16_500M: CalculationMethod = CalculationMethod {
        radius_meters: 500.0,
        grid_level: 16,
    };

    /// 570 m evaluated on level 17 cells.
    pub const L17_570M: CalculationMethod = CalculationMethod {
        radius_meters: 570.0,
        grid_level: 17,
    };

    pub const PRESETS: [CalculationMethod; 2] = [Self::L16_500M, Self::L17_570M];

    pub fn new(radius_meters: f64, grid_level: u8) -> Result<Self, RangeError> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(RangeError::InvalidRadius(radius_meters));
        }
        if grid_level > MAX_LEVEL {
            return Err(RangeError::InvalidLevel(grid_level));
        }
        Ok(Self {
            radius_meters,
            grid_level,
        })
    }
}

impl Default for CalculationMethod {
    fn default() -> Self {
        Self::L16_500M
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.radius_meters, self.grid_level)
    }
}

impl FromStr for CalculationMethod {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidCalculationMethod(s.to_string());

        let (radius, level) = s.trim().split_once('/').ok_or_else(invalid)?;
        let radius: f64 = radius.trim().parse().map_err(|_| invalid())?;
        let level: u8 = level.trim().parse().map_err(|_| invalid())?;

        Self::new(radius, level)
    }
}

impl From<CalculationMethod> for String {
    fn from(method: CalculationMethod) -> Self {
        method.to_string()
    }
}

impl TryFrom<String> for CalculationMethod {
    type Error = RangeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Range behaviour chosen by the user.
///
/// Mirrors what the settings dialog stores; how and where the caller keeps it
/// is up to the caller, [`RangeSettings::load`] and [`RangeSettings::save`]
/// are plain JSON helpers. Missing fields fall back to the defaults.
///
/// # Example
/// ```
/// use drone_range::{CalculationMethod, RangeSettings};
///
/// let settings = RangeSettings::default()
///     .calculation_method(CalculationMethod::L17_570M)
///     .show_key_range(true);
/// assert_eq!(settings.calculation_method.grid_level, 17);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSettings {
    pub calculation_method: CalculationMethod,
    /// Also report the theoretical key range around the centre.
    pub show_key_range: bool,
    /// Run one-way detection on the highlighted markers.
    pub show_one_way: bool,
    pub one_way_policy: OneWayPolicy,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            calculation_method: CalculationMethod::L16_500M,
            show_key_range: false,
            show_one_way: true,
            one_way_policy: OneWayPolicy::NoReturn,
        }
    }
}

impl RangeSettings {
    pub fn calculation_method(mut self, method: CalculationMethod) -> Self {
        self.calculation_method = method;
        self
    }

    pub fn show_key_range(mut self, show: bool) -> Self {
        self.show_key_range = show;
        self
    }

    pub fn show_one_way(mut self, show: bool) -> Self {
        self.show_one_way = show;
        self
    }

    pub fn one_way_policy(mut self, policy: OneWayPolicy) -> Self {
        self.one_way_policy = policy;
        self
    }

    /// Key range radius in meters when enabled.
    pub fn key_range_meters(&self) -> Option<f64> {
        self.show_key_range.then_some(KEY_RANGE_METERS)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RangeError> {
        serde_json::from_str(json).map_err(|e| RangeError::SerializationError(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, RangeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RangeError::SerializationError(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RangeError> {
        let json = fs::read_to_string(path).map_err(|e| RangeError::IoError(e.to_string()))?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RangeError> {
        fs::write(path, self.to_json_string()?).map_err(|e| RangeError::IoError(e.to_string()))
    }
}
