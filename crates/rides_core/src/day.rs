//! Day assembly: plan the day's volume, then sample every ride city by city.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use tracing::debug;

use crate::attributes::sample_ride_attributes;
use crate::catalog::CityCatalog;
use crate::error::{ConfigError, GenerationError};
use crate::holidays::{HolidayCalendar, HolidayRegion};
use crate::pricing::{calculate_fare, FareDraws, FareInput};
use crate::record::{DayTable, RideRecord};
use crate::volume::{daily_count, split_across_cities};

/// Calendar facts for a simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayContext {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub target_mean: f64,
}

impl DayContext {
    pub fn derive(date: NaiveDate, target_mean: f64, region: HolidayRegion) -> Self {
        let calendar = HolidayCalendar::around(region, date.year());
        Self {
            date,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_holiday: calendar.contains(date),
            target_mean,
        }
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Build every ride for `date`.
///
/// Cities are visited in catalog order so the generator stream is consumed
/// in a fixed sequence. Returns an empty table when the planned count is 0.
pub fn build_day<R: Rng + ?Sized>(
    rng: &mut R,
    date: NaiveDate,
    target_mean: f64,
    catalog: &CityCatalog,
    region: HolidayRegion,
) -> Result<DayTable, GenerationError> {
    if !target_mean.is_finite() || target_mean <= 0.0 {
        return Err(ConfigError::InvalidMean(target_mean).into());
    }
    catalog.validate()?;
    let day = DayContext::derive(date, target_mean, region);
    let total = daily_count(rng, date, day.is_weekend, day.is_holiday, target_mean)?;
    if total == 0 {
        return Ok(DayTable::empty(date));
    }

    let counts = split_across_cities(rng, total, catalog)?;
    debug!(
        %date,
        total,
        weekend = day.is_weekend,
        holiday = day.is_holiday,
        ?counts,
        "planned day"
    );

    let mut records = Vec::with_capacity(total as usize);
    for (city, &count) in catalog.iter().zip(&counts) {
        for _ in 0..count {
            let ride = sample_ride_attributes(rng, city, &day)?;
            let draws = FareDraws::sample(rng, city, ride.status)?;
            let fare = calculate_fare(
                &FareInput {
                    rates: &city.rates,
                    status: ride.status,
                    trip: &ride.trip,
                    surge: ride.context.surge,
                },
                &draws,
            );
            records.push(RideRecord::assemble(city, &day, ride, &fare));
        }
    }

    Ok(DayTable { date, records })
}
