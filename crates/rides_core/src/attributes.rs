//! Per-ride attribute sampling: timing, outcome, geography, trip physics,
//! identity and metadata for a single ride in a resolved context.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Builder;

use crate::catalog::{BoundingBox, City};
use crate::context::{resolve_ride_context, RideContext, TrafficLevel, Weather};
use crate::day::DayContext;
use crate::distributions::{bounded_gaussian, categorical, gaussian, lognormal, normalize, pick, round_to};
use crate::error::SamplingError;
use crate::patterns::{choose_hour, is_late_night_hour};

// ---------------------------------------------------------------------------
// Closed categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Completed,
    Cancelled,
    NoShow,
}

impl RideStatus {
    pub const ALL: [RideStatus; 3] = [RideStatus::Completed, RideStatus::Cancelled, RideStatus::NoShow];

    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
            RideStatus::NoShow => "no_show",
        }
    }

    pub fn is_completed(self) -> bool {
        self == RideStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Card,
    Wallet,
    Cash,
}

impl PaymentType {
    pub const ALL: [PaymentType; 3] = [PaymentType::Card, PaymentType::Wallet, PaymentType::Cash];
    const WEIGHTS: [f64; 3] = [0.92, 0.06, 0.02];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Card => "card",
            PaymentType::Wallet => "wallet",
            PaymentType::Cash => "cash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Ios,
    Android,
}

impl DeviceType {
    pub const ALL: [DeviceType; 2] = [DeviceType::Ios, DeviceType::Android];
    const WEIGHTS: [f64; 2] = [0.48, 0.52];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Ios => "ios",
            DeviceType::Android => "android",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

const BASE_STATUS_PROBABILITIES: [f64; 3] = [0.92, 0.06, 0.02];

/// `[completed, cancelled, no_show]` after context perturbation.
///
/// Adverse weather (rain, snow or fog) pushes riders to cancel or not show;
/// heavy traffic adds cancellations; a clear weekend makes completion slightly likelier.
pub fn status_probabilities(
    weather: Weather,
    traffic: TrafficLevel,
    is_weekend: bool,
) -> Result<[f64; 3], SamplingError> {
    let [mut completed, mut cancelled, mut no_show] = BASE_STATUS_PROBABILITIES;
    if weather.is_adverse() {
        cancelled += 0.01;
        no_show += 0.01;
        completed -= 0.02;
    }
    if traffic == TrafficLevel::High {
        cancelled += 0.01;
        completed -= 0.01;
    }
    if is_weekend && weather == Weather::Clear {
        completed += 0.01;
        cancelled -= 0.01;
    }
    normalize("status", [completed, cancelled, no_show])
}

pub fn choose_status<R: Rng + ?Sized>(
    rng: &mut R,
    context: &RideContext,
    is_weekend: bool,
) -> Result<RideStatus, SamplingError> {
    let probs = status_probabilities(context.weather, context.traffic, is_weekend)?;
    Ok(RideStatus::ALL[categorical(rng, "status", probs)?])
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Uniform point inside the box, rounded to 6 decimals.
pub fn random_point_in_box<R: Rng + ?Sized>(rng: &mut R, bounds: &BoundingBox) -> GeoPoint {
    let lat = rng.gen_range(bounds.lat_min..bounds.lat_max);
    let lon = rng.gen_range(bounds.lon_min..bounds.lon_max);
    GeoPoint {
        lat: round_to(lat, 6),
        lon: round_to(lon, 6),
    }
}

pub fn pick_zone<'a, R: Rng + ?Sized>(rng: &mut R, city: &'a City) -> Result<&'a str, SamplingError> {
    pick(rng, "zone", &city.zones).map(String::as_str)
}

// ---------------------------------------------------------------------------
// Trip physics
// ---------------------------------------------------------------------------

const MIN_MILES: f64 = 0.3;
const MAX_MILES: f64 = 60.0;
const MIN_SPEED_MPH: f64 = 6.0;
const MIN_DURATION_MINUTES: f64 = 1.0;

/// Log-normal trip length; dense cities skew shorter, weekends longer.
pub fn lognormal_miles<R: Rng + ?Sized>(rng: &mut R, city: &City, is_weekend: bool) -> f64 {
    let median = if city.traits.dense { 4.0_f64 } else { 5.0 };
    let mut miles = lognormal(rng, median.ln(), 0.6);
    if is_weekend {
        miles *= 1.08;
    }
    miles.clamp(MIN_MILES, MAX_MILES)
}

pub fn speed_mph<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    traffic: TrafficLevel,
    weather: Weather,
    hour: u32,
) -> f64 {
    let mut base = if city.traits.dense { 18.0 } else { 24.0 };
    base -= match traffic {
        TrafficLevel::Low => 0.0,
        TrafficLevel::Medium => 3.0,
        TrafficLevel::High => 7.0,
    };
    if weather.is_adverse() {
        base -= 2.0;
    }
    if is_late_night_hour(hour) {
        base += 3.0;
    }
    (base + gaussian(rng, 0.0, 2.0)).max(MIN_SPEED_MPH)
}

/// Distance and time for a ride. All zero but wait/duration when the ride
/// never started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripMetrics {
    pub distance_miles: f64,
    pub avg_speed_mph: f64,
    pub wait_minutes: f64,
    pub duration_minutes: f64,
}

impl TripMetrics {
    /// Minutes spent moving, excluding the pickup wait.
    pub fn billable_minutes(&self) -> f64 {
        (self.duration_minutes - self.wait_minutes).max(0.0)
    }
}

pub fn sample_trip_metrics<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    context: &RideContext,
    status: RideStatus,
    hour: u32,
    is_weekend: bool,
) -> TripMetrics {
    if !status.is_completed() {
        let wait_minutes = gaussian(rng, 5.0, 1.5).max(0.0);
        return TripMetrics {
            distance_miles: 0.0,
            avg_speed_mph: 0.0,
            wait_minutes,
            duration_minutes: wait_minutes,
        };
    }

    let distance_miles = lognormal_miles(rng, city, is_weekend);
    let avg_speed_mph = speed_mph(rng, city, context.traffic, context.weather, hour);
    let drive_minutes = distance_miles / avg_speed_mph * 60.0;
    let wait_mean = if context.traffic >= TrafficLevel::Medium { 4.0 } else { 3.0 };
    let wait_minutes = gaussian(rng, wait_mean, 1.0).max(0.0);
    let duration_minutes =
        (drive_minutes + wait_minutes + gaussian(rng, 0.0, 1.2)).max(MIN_DURATION_MINUTES);

    TripMetrics {
        distance_miles,
        avg_speed_mph,
        wait_minutes,
        duration_minutes,
    }
}

/// End timestamp; rides that never started end when they started.
pub fn end_time(start: DateTime<Utc>, status: RideStatus, duration_minutes: f64) -> DateTime<Utc> {
    if status.is_completed() {
        start + Duration::microseconds((duration_minutes * 60_000_000.0).round() as i64)
    } else {
        start
    }
}

// ---------------------------------------------------------------------------
// Full attribute set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RideAttributes {
    pub ride_id: String,
    pub rider_id: String,
    pub driver_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub hour: u32,
    pub context: RideContext,
    pub status: RideStatus,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub trip: TripMetrics,
    pub payment_type: PaymentType,
    pub device_type: DeviceType,
    pub rider_rating: f64,
    pub driver_rating: f64,
}

/// Draw every non-monetary attribute of one ride in `city` on `day`.
pub fn sample_ride_attributes<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    day: &DayContext,
) -> Result<RideAttributes, SamplingError> {
    let hour = choose_hour(rng, day.is_weekend)?;
    let minute = rng.gen_range(0..60);
    let second = rng.gen_range(0..60);
    let start = day
        .date
        .and_time(NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            SamplingError::InvalidParameters {
                what: "start time",
                reason: format!("{hour:02}:{minute:02}:{second:02}"),
            }
        })?)
        .and_utc();

    let context = resolve_ride_context(rng, city, day.month(), hour, day.is_weekend)?;
    let status = choose_status(rng, &context, day.is_weekend)?;

    let pickup = random_point_in_box(rng, &city.bounds);
    let dropoff = random_point_in_box(rng, &city.bounds);

    let ride_id = Builder::from_random_bytes(rng.gen()).into_uuid().to_string();
    let rider_id = format!("r_{}", rng.gen_range(10_000_000..99_999_999));
    let driver_id = format!("d_{}", rng.gen_range(100_000..999_999));

    let trip = sample_trip_metrics(rng, city, &context, status, hour, day.is_weekend);
    let end = end_time(start, status, trip.duration_minutes);

    let rider_rating = bounded_gaussian(rng, 4.75, 0.18, 3.0, 5.0);
    let driver_rating = bounded_gaussian(rng, 4.80, 0.15, 3.0, 5.0);

    let payment_type = PaymentType::ALL[categorical(rng, "payment", PaymentType::WEIGHTS)?];
    let device_type = DeviceType::ALL[categorical(rng, "device", DeviceType::WEIGHTS)?];
    let pickup_zone = pick_zone(rng, city)?.to_string();
    let dropoff_zone = pick_zone(rng, city)?.to_string();

    Ok(RideAttributes {
        ride_id,
        rider_id,
        driver_id,
        start,
        end,
        hour,
        context,
        status,
        pickup,
        dropoff,
        pickup_zone,
        dropoff_zone,
        trip,
        payment_type,
        device_type,
        rider_rating,
        driver_rating,
    })
}
