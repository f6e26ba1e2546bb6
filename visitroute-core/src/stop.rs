//! Stops to visit and the coordinate fields that locate them.
//!
//! A [`Stop`] is whatever record the caller hands over: an identifier, a
//! display name, an address and any other fields travel with it untouched.
//! Only the two coordinate fields named by [`CoordinateKeys`] are inspected.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default field holding a stop's latitude.
pub const DEFAULT_LATITUDE_KEY: &str = "latitud";

/// Default field holding a stop's longitude.
pub const DEFAULT_LONGITUDE_KEY: &str = "longitud";

/// Names of the payload fields carrying latitude and longitude.
///
/// # Examples
/// ```
/// use visitroute_core::CoordinateKeys;
///
/// let keys = CoordinateKeys::new("lat", "lng");
/// assert_eq!(keys.latitude, "lat");
/// assert_eq!(CoordinateKeys::default().longitude, "longitud");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateKeys {
    /// Field holding the latitude in degrees.
    pub latitude: String,
    /// Field holding the longitude in degrees.
    pub longitude: String,
}

impl CoordinateKeys {
    /// Construct keys from explicit field names.
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

impl Default for CoordinateKeys {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE_KEY, DEFAULT_LONGITUDE_KEY)
    }
}

/// Reasons a stop's coordinates cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// The coordinate field is absent or `null`.
    #[error("missing coordinate field `{key}`")]
    Missing {
        /// Name of the absent field.
        key: String,
    },
    /// The field holds something other than a number or numeric string.
    #[error("coordinate field `{key}` is not numeric: {value}")]
    NotNumeric {
        /// Name of the offending field.
        key: String,
        /// The raw JSON value, rendered for diagnostics.
        value: String,
    },
    /// The field parsed, but to NaN or an infinity.
    #[error("coordinate field `{key}` is not finite")]
    NotFinite {
        /// Name of the offending field.
        key: String,
    },
}

/// One location to visit, carrying the caller's full record.
///
/// Serialisation is transparent: a stop reads and writes as the plain JSON
/// object it was built from.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use serde_json::json;
/// use visitroute_core::{CoordinateKeys, Stop};
///
/// let stop: Stop = serde_json::from_value(json!({
///     "id": 1,
///     "latitud": "4.60971",
///     "longitud": -74.08175,
/// }))?;
/// let coord = stop.coordinates(&CoordinateKeys::default())?;
/// assert_eq!(coord, Coord { x: -74.08175, y: 4.60971 });
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stop {
    fields: Map<String, Value>,
}

impl Stop {
    /// Wrap an existing JSON object.
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Borrow the underlying record.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Consume the stop and return the record.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Extract the stop's position.
    ///
    /// The returned coordinate follows the `geo` convention of
    /// `x = longitude`, `y = latitude`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either field is missing, not a
    /// number or numeric string, or not finite.
    pub fn coordinates(&self, keys: &CoordinateKeys) -> Result<Coord<f64>, CoordinateError> {
        let latitude = self.numeric_field(&keys.latitude)?;
        let longitude = self.numeric_field(&keys.longitude)?;
        Ok(Coord {
            x: longitude,
            y: latitude,
        })
    }

    fn numeric_field(&self, key: &str) -> Result<f64, CoordinateError> {
        let parsed = match self.fields.get(key) {
            None | Some(Value::Null) => {
                return Err(CoordinateError::Missing {
                    key: key.to_owned(),
                });
            }
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        let value = parsed.ok_or_else(|| CoordinateError::NotNumeric {
            key: key.to_owned(),
            value: self.fields.get(key).map(Value::to_string).unwrap_or_default(),
        })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CoordinateError::NotFinite {
                key: key.to_owned(),
            })
        }
    }
}

impl From<Map<String, Value>> for Stop {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
