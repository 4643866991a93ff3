#![allow(dead_code)]

use chrono::NaiveDate;
use rides_core::catalog::CityCatalog;
use rides_core::day::build_day;
use rides_core::holidays::HolidayRegion;
use rides_core::rng::seeded;
use rides_core::DayTable;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// A small but realistic day generated from the default catalog.
pub fn sample_day(seed: u64, day: NaiveDate) -> DayTable {
    build_day(&mut seeded(seed), day, 120.0, &CityCatalog::default(), HolidayRegion::UnitedStates)
        .expect("day generation")
}
