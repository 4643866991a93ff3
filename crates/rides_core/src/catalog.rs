//! City reference data: bounding boxes, fare coefficients, zones and demand
//! share.
//!
//! City-specific behaviour (snow, fog, trip length, tolls) is driven by
//! [`CityTraits`] flags rather than by comparing names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Latitude/longitude box that pickups and dropoffs are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

/// Per-city fare coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareRates {
    pub base_fare: f64,
    pub per_mile: f64,
    pub per_minute: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityTraits {
    /// Never snows (desert or mild-winter climate).
    #[serde(default)]
    pub snow_free: bool,
    /// Elevated fog probability.
    #[serde(default)]
    pub foggy: bool,
    /// Shorter trips and slower base speed.
    #[serde(default)]
    pub dense: bool,
    /// Higher mean toll charge.
    #[serde(default)]
    pub toll_heavy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub state: String,
    pub timezone: String,
    pub bounds: BoundingBox,
    pub rates: FareRates,
    pub zones: Vec<String>,
    /// Relative share of daily volume. Weights need not sum to 1.
    pub weight: f64,
    #[serde(default)]
    pub traits: CityTraits,
}

impl City {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCity {
            city: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(invalid("weight must be a positive finite number"));
        }
        let b = &self.bounds;
        if !(b.lat_min < b.lat_max) || !(b.lon_min < b.lon_max) {
            return Err(invalid("bounding box must have min < max on both axes"));
        }
        let r = &self.rates;
        if [r.base_fare, r.per_mile, r.per_minute]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(invalid("fare rates must be non-negative"));
        }
        if self.zones.is_empty() {
            return Err(invalid("zone list is empty"));
        }
        Ok(())
    }
}

/// Ordered list of cities shared read-only by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    pub fn new(cities: Vec<City>) -> Result<Self, ConfigError> {
        let catalog = Self { cities };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON array of cities.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |reason: String| ConfigError::CatalogFile {
            path: path.display().to_string(),
            reason,
        };
        let body = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let cities: Vec<City> = serde_json::from_str(&body).map_err(|e| file_error(e.to_string()))?;
        Self::new(cities)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cities.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        self.cities.iter().try_for_each(City::validate)
    }

    /// Narrow the catalog to the single city named `name` (case-insensitive).
    pub fn only(&self, name: &str) -> Result<Self, ConfigError> {
        let city = self
            .cities
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigError::UnknownCity(name.to_string()))?;
        Ok(Self {
            cities: vec![city.clone()],
        })
    }

    /// Demand weights rescaled to sum to 1, in catalog order.
    pub fn normalized_weights(&self) -> Vec<f64> {
        let total: f64 = self.cities.iter().map(|c| c.weight).sum();
        self.cities.iter().map(|c| c.weight / total).collect()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, City> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self {
            cities: default_cities(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn city(
    name: &str,
    state: &str,
    timezone: &str,
    (lat_min, lat_max): (f64, f64),
    (lon_min, lon_max): (f64, f64),
    (base_fare, per_mile, per_minute): (f64, f64, f64),
    zones: &[&str],
    weight: f64,
    traits: CityTraits,
) -> City {
    City {
        name: name.to_string(),
        state: state.to_string(),
        timezone: timezone.to_string(),
        bounds: BoundingBox {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        },
        rates: FareRates {
            base_fare,
            per_mile,
            per_minute,
        },
        zones: zones.iter().map(|z| z.to_string()).collect(),
        weight,
        traits,
    }
}

/// The five US markets the dataset ships with.
pub fn default_cities() -> Vec<City> {
    let dense_tolled = CityTraits {
        dense: true,
        toll_heavy: true,
        ..CityTraits::default()
    };
    vec![
        city(
            "New York",
            "NY",
            "America/New_York",
            (40.49, 40.92),
            (-74.27, -73.68),
            (2.75, 3.00, 0.55),
            &["Manhattan", "Brooklyn", "Queens", "Bronx", "Staten Island"],
            0.32,
            dense_tolled,
        ),
        city(
            "Chicago",
            "IL",
            "America/Chicago",
            (41.64, 42.02),
            (-87.94, -87.52),
            (2.25, 2.30, 0.40),
            &["Loop", "North Side", "South Side", "West Side"],
            0.18,
            CityTraits::default(),
        ),
        city(
            "Los Angeles",
            "CA",
            "America/Los_Angeles",
            (33.70, 34.34),
            (-118.67, -118.15),
            (2.20, 2.40, 0.38),
            &["DTLA", "Hollywood", "Santa Monica", "Pasadena", "Venice"],
            0.20,
            CityTraits {
                snow_free: true,
                ..CityTraits::default()
            },
        ),
        city(
            "San Francisco",
            "CA",
            "America/Los_Angeles",
            (37.70, 37.84),
            (-122.52, -122.35),
            (2.50, 3.10, 0.60),
            &["SOMA", "Mission", "Sunset", "Richmond", "FiDi"],
            0.12,
            CityTraits {
                foggy: true,
                ..dense_tolled
            },
        ),
        city(
            "Phoenix",
            "AZ",
            "America/Phoenix",
            (33.26, 33.80),
            (-112.32, -111.90),
            (2.00, 2.05, 0.32),
            &["Downtown", "Tempe", "Scottsdale", "Mesa", "Glendale"],
            0.18,
            CityTraits {
                snow_free: true,
                ..CityTraits::default()
            },
        ),
    ]
}
