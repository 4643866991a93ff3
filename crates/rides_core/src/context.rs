//! Per-ride conditions: weather, traffic level and surge multiplier.
//!
//! The chain is weather → traffic → surge. Only weather and the surge jitter
//! consume randomness; the traffic level is a pure function of its inputs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::City;
use crate::distributions::{categorical, gaussian, normalize, round_to};
use crate::error::SamplingError;
use crate::patterns::{is_commute_hour, is_nightlife_hour};

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Rain,
    Snow,
    Fog,
}

impl Weather {
    /// Sampling order of [`weather_probabilities`].
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Snow, Weather::Fog];

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
            Weather::Fog => "fog",
        }
    }

    /// Anything but clear skies; slows traffic and vehicles.
    pub fn is_adverse(self) -> bool {
        match self {
            Weather::Clear => false,
            Weather::Rain | Weather::Snow | Weather::Fog => true,
        }
    }

    /// Rain or snow; drives surge and cancellations. Fog does not.
    pub fn is_precipitation(self) -> bool {
        match self {
            Weather::Rain | Weather::Snow => true,
            Weather::Clear | Weather::Fog => false,
        }
    }
}

const WET_MONTHS: [u32; 5] = [11, 12, 1, 2, 3];
const WINTER_MONTHS: [u32; 3] = [12, 1, 2];

/// `[clear, rain, snow, fog]` for a calendar month (1-12) in a city.
pub fn weather_probabilities(month: u32, city: &City) -> Result<[f64; 4], SamplingError> {
    let rain: f64 = if WET_MONTHS.contains(&month) { 0.13 } else { 0.10 };
    let snow: f64 = if city.traits.snow_free {
        0.0
    } else if WINTER_MONTHS.contains(&month) {
        0.12
    } else {
        0.02
    };
    let fog: f64 = if city.traits.foggy { 0.05 } else { 0.03 };
    let clear = (1.0 - (rain + snow + fog)).max(0.0);
    normalize("weather", [clear, rain, snow, fog])
}

pub fn choose_weather<R: Rng + ?Sized>(
    rng: &mut R,
    month: u32,
    city: &City,
) -> Result<Weather, SamplingError> {
    let idx = categorical(rng, "weather", weather_probabilities(month, city)?)?;
    Ok(Weather::ALL[idx])
}

// ---------------------------------------------------------------------------
// Traffic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 3] = [TrafficLevel::Low, TrafficLevel::Medium, TrafficLevel::High];

    /// Saturating conversion from the 1-3 ordinal.
    pub fn from_ordinal(level: u8) -> Self {
        match level {
            0 | 1 => TrafficLevel::Low,
            2 => TrafficLevel::Medium,
            _ => TrafficLevel::High,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficLevel::Low => "low",
            TrafficLevel::Medium => "medium",
            TrafficLevel::High => "high",
        }
    }
}

/// Congestion for a start hour.
///
/// Commute hours start at medium, everything else at low. Weekends drop one
/// level but nightlife hours add it back; any adverse weather adds one more.
pub fn traffic_level(hour: u32, is_weekend: bool, weather: Weather) -> TrafficLevel {
    let mut level: u8 = if is_commute_hour(hour) { 2 } else { 1 };
    if is_weekend {
        level = level.saturating_sub(1).max(1);
        if is_nightlife_hour(hour) {
            level += 1;
        }
    }
    if weather.is_adverse() {
        level += 1;
    }
    TrafficLevel::from_ordinal(level.min(3))
}

// ---------------------------------------------------------------------------
// Surge
// ---------------------------------------------------------------------------

pub const SURGE_MIN: f64 = 1.0;
pub const SURGE_MAX: f64 = 3.0;
const SURGE_JITTER_SD: f64 = 0.05;

/// Pricing multiplier, clamped to [`SURGE_MIN`, `SURGE_MAX`] and rounded to
/// two decimals.
pub fn surge_multiplier<R: Rng + ?Sized>(
    traffic: TrafficLevel,
    is_weekend: bool,
    hour: u32,
    weather: Weather,
    rng: &mut R,
) -> f64 {
    let mut surge = 1.0;
    surge += match traffic {
        TrafficLevel::Low => 0.0,
        TrafficLevel::Medium => 0.2,
        TrafficLevel::High => 0.6,
    };
    if is_weekend && is_nightlife_hour(hour) {
        surge += 0.3;
    }
    if weather.is_precipitation() {
        surge += 0.25;
    }
    surge += gaussian(rng, 0.0, SURGE_JITTER_SD);
    round_to(surge.clamp(SURGE_MIN, SURGE_MAX), 2)
}

// ---------------------------------------------------------------------------
// Resolved context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideContext {
    pub weather: Weather,
    pub traffic: TrafficLevel,
    pub surge: f64,
}

/// Weather, then traffic, then surge for one ride.
pub fn resolve_ride_context<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    month: u32,
    hour: u32,
    is_weekend: bool,
) -> Result<RideContext, SamplingError> {
    let weather = choose_weather(rng, month, city)?;
    let traffic = traffic_level(hour, is_weekend, weather);
    let surge = surge_multiplier(traffic, is_weekend, hour, weather, rng);
    Ok(RideContext {
        weather,
        traffic,
        surge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CityCatalog;
    use crate::rng::seeded;

    fn city(name: &str) -> City {
        CityCatalog::default().get(name).cloned().unwrap()
    }

    #[test]
    fn weather_probabilities_follow_table() {
        let chicago = city("Chicago");
        let jan = weather_probabilities(1, &chicago).unwrap();
        assert!((jan[1] - 0.13).abs() < 1e-12);
        assert!((jan[2] - 0.12).abs() < 1e-12);
        assert!((jan[3] - 0.03).abs() < 1e-12);
        assert!((jan[0] - 0.72).abs() < 1e-12);

        let jul = weather_probabilities(7, &chicago).unwrap();
        assert!((jul[1] - 0.10).abs() < 1e-12);
        assert!((jul[2] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn snow_free_cities_never_snow() {
        let phoenix = city("Phoenix");
        let mut rng = seeded(5);
        for month in 1..=12 {
            assert_eq!(weather_probabilities(month, &phoenix).unwrap()[2], 0.0);
        }
        for _ in 0..2_000 {
            assert_ne!(choose_weather(&mut rng, 1, &phoenix).unwrap(), Weather::Snow);
        }
    }

    #[test]
    fn foggy_city_has_more_fog() {
        let sf = weather_probabilities(6, &city("San Francisco")).unwrap();
        let la = weather_probabilities(6, &city("Los Angeles")).unwrap();
        assert!(sf[3] > la[3]);
    }

    #[test]
    fn traffic_rules() {
        assert_eq!(traffic_level(3, false, Weather::Clear), TrafficLevel::Low);
        assert_eq!(traffic_level(12, false, Weather::Clear), TrafficLevel::Low);
        assert_eq!(traffic_level(8, false, Weather::Clear), TrafficLevel::Medium);
        assert_eq!(traffic_level(17, false, Weather::Rain), TrafficLevel::High);
        assert_eq!(traffic_level(12, false, Weather::Fog), TrafficLevel::Medium);
        // weekend commute hour loses its bump
        assert_eq!(traffic_level(8, true, Weather::Clear), TrafficLevel::Low);
        // weekend nightlife adds one back
        assert_eq!(traffic_level(23, true, Weather::Clear), TrafficLevel::Medium);
        assert_eq!(traffic_level(0, true, Weather::Snow), TrafficLevel::High);
    }

    #[test]
    fn traffic_never_exceeds_high() {
        for hour in 0..24 {
            for weekend in [false, true] {
                for weather in Weather::ALL {
                    let level = traffic_level(hour, weekend, weather);
                    assert!((1..=3).contains(&level.ordinal()));
                }
            }
        }
    }

    #[test]
    fn surge_is_bounded_and_rounded() {
        let mut rng = seeded(21);
        for _ in 0..2_000 {
            for traffic in TrafficLevel::ALL {
                let s = surge_multiplier(traffic, true, 23, Weather::Snow, &mut rng);
                assert!((SURGE_MIN..=SURGE_MAX).contains(&s));
                assert!((s * 100.0 - (s * 100.0).round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn surge_centres_on_additive_terms() {
        let mut rng = seeded(4);
        let n = 4_000;
        let mean: f64 = (0..n)
            .map(|_| surge_multiplier(TrafficLevel::High, true, 23, Weather::Rain, &mut rng))
            .sum::<f64>()
            / n as f64;
        // 1.0 + 0.6 + 0.3 + 0.25
        assert!((mean - 2.15).abs() < 0.01, "mean surge {mean}");
    }

    #[test]
    fn fog_is_adverse_but_not_precipitation() {
        assert!(Weather::Fog.is_adverse());
        assert!(!Weather::Fog.is_precipitation());
        assert!(Weather::Snow.is_precipitation());
        assert!(!Weather::Clear.is_adverse());
    }
}
