//! Daily volume planning: how many rides happen on a day and where.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::catalog::CityCatalog;
use crate::distributions::{multinomial, poisson};
use crate::error::SamplingError;

const SEASON_AMPLITUDE: f64 = 0.15;
const WEEKEND_MULTIPLIER: f64 = 1.8;
const HOLIDAY_MULTIPLIER: f64 = 2.2;
const MIN_LAMBDA: f64 = 1.0;

/// Mild yearly seasonality peaking in spring/summer.
pub fn season_multiplier(day_of_year: u32) -> f64 {
    1.0 + SEASON_AMPLITUDE * (2.0 * PI * (f64::from(day_of_year) / 365.0)).sin()
}

/// Poisson rate for a day. Weekend and holiday multipliers compose.
pub fn daily_lambda(date: NaiveDate, is_weekend: bool, is_holiday: bool, target_mean: f64) -> f64 {
    let mut lambda = target_mean * season_multiplier(date.ordinal());
    if is_weekend {
        lambda *= WEEKEND_MULTIPLIER;
    }
    if is_holiday {
        lambda *= HOLIDAY_MULTIPLIER;
    }
    lambda.max(MIN_LAMBDA)
}

/// Total rides for a day.
pub fn daily_count<R: Rng + ?Sized>(
    rng: &mut R,
    date: NaiveDate,
    is_weekend: bool,
    is_holiday: bool,
    target_mean: f64,
) -> Result<u64, SamplingError> {
    poisson(rng, daily_lambda(date, is_weekend, is_holiday, target_mean))
}

/// Per-city ride counts, in catalog order, summing to `total`.
pub fn split_across_cities<R: Rng + ?Sized>(
    rng: &mut R,
    total: u64,
    catalog: &CityCatalog,
) -> Result<Vec<u64>, SamplingError> {
    multinomial(rng, "city split", total, &catalog.normalized_weights())
}
