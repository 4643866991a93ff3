//! The output row and its column contract.
//!
//! Field order of [`RideRecord`] is the column order downstream sinks rely
//! on; [`RIDE_COLUMNS`] lists the same names for encoders that build columns
//! by hand. Bump [`SCHEMA_VERSION`] whenever either changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::attributes::{DeviceType, PaymentType, RideAttributes, RideStatus};
use crate::catalog::City;
use crate::context::{TrafficLevel, Weather};
use crate::day::DayContext;
use crate::distributions::{money, round_to};
use crate::pricing::{FareBreakdown, PromoCode};

pub const SCHEMA_VERSION: u32 = 1;

pub const RIDE_COLUMNS: [&str; 39] = [
    "ride_id",
    "rider_id",
    "driver_id",
    "city",
    "state",
    "pickup_zone",
    "dropoff_zone",
    "pickup_lat",
    "pickup_lon",
    "dropoff_lat",
    "dropoff_lon",
    "start_time_utc",
    "end_time_utc",
    "status",
    "distance_miles",
    "duration_minutes",
    "wait_time_minutes",
    "avg_speed_mph",
    "traffic_level",
    "weather",
    "surge_multiplier",
    "base_fare",
    "per_mile_rate",
    "per_minute_rate",
    "tolls",
    "taxes",
    "coupon_discount",
    "fare_total",
    "tip",
    "platform_fee",
    "driver_earnings",
    "payment_type",
    "device_type",
    "rider_rating",
    "driver_rating",
    "is_weekend",
    "is_holiday",
    "promo_code",
    "city_timezone",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideRecord {
    pub ride_id: String,
    pub rider_id: String,
    pub driver_id: String,
    pub city: String,
    pub state: String,
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub dropoff_lat: f64,
    pub dropoff_lon: f64,
    pub start_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    pub status: RideStatus,
    pub distance_miles: f64,
    pub duration_minutes: f64,
    pub wait_time_minutes: f64,
    pub avg_speed_mph: f64,
    pub traffic_level: TrafficLevel,
    pub weather: Weather,
    pub surge_multiplier: f64,
    pub base_fare: f64,
    pub per_mile_rate: f64,
    pub per_minute_rate: f64,
    pub tolls: f64,
    pub taxes: f64,
    pub coupon_discount: f64,
    pub fare_total: f64,
    pub tip: f64,
    pub platform_fee: f64,
    pub driver_earnings: f64,
    pub payment_type: PaymentType,
    pub device_type: DeviceType,
    pub rider_rating: f64,
    pub driver_rating: f64,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub promo_code: Option<PromoCode>,
    pub city_timezone: String,
}

impl RideRecord {
    /// Flatten sampled attributes and fare into an output row, applying the
    /// per-column rounding.
    pub fn assemble(city: &City, day: &DayContext, ride: RideAttributes, fare: &FareBreakdown) -> Self {
        Self {
            ride_id: ride.ride_id,
            rider_id: ride.rider_id,
            driver_id: ride.driver_id,
            city: city.name.clone(),
            state: city.state.clone(),
            pickup_zone: ride.pickup_zone,
            dropoff_zone: ride.dropoff_zone,
            pickup_lat: ride.pickup.lat,
            pickup_lon: ride.pickup.lon,
            dropoff_lat: ride.dropoff.lat,
            dropoff_lon: ride.dropoff.lon,
            start_time_utc: ride.start,
            end_time_utc: ride.end,
            status: ride.status,
            distance_miles: round_to(ride.trip.distance_miles, 3),
            duration_minutes: round_to(ride.trip.duration_minutes, 2),
            wait_time_minutes: round_to(ride.trip.wait_minutes, 2),
            avg_speed_mph: round_to(ride.trip.avg_speed_mph, 2),
            traffic_level: ride.context.traffic,
            weather: ride.context.weather,
            surge_multiplier: ride.context.surge,
            base_fare: money(city.rates.base_fare),
            per_mile_rate: money(city.rates.per_mile),
            per_minute_rate: money(city.rates.per_minute),
            tolls: fare.tolls,
            taxes: fare.taxes,
            coupon_discount: fare.coupon_discount,
            fare_total: fare.fare_total,
            tip: fare.tip,
            platform_fee: fare.platform_fee,
            driver_earnings: fare.driver_earnings,
            payment_type: ride.payment_type,
            device_type: ride.device_type,
            rider_rating: round_to(ride.rider_rating, 2),
            driver_rating: round_to(ride.driver_rating, 2),
            is_weekend: day.is_weekend,
            is_holiday: day.is_holiday,
            promo_code: fare.promo_code,
            city_timezone: city.timezone.clone(),
        }
    }
}

/// One day of rides, produced as a whole before any sink sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTable {
    pub date: NaiveDate,
    pub records: Vec<RideRecord>,
}

impl DayTable {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &RIDE_COLUMNS
    }
}
