//! Public holiday calendars used for the daily volume bump.
//!
//! United States federal holidays, shifted to the observed weekday: a holiday
//! on Saturday is observed the Friday before, on Sunday the Monday after.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayRegion {
    #[default]
    UnitedStates,
    /// No holidays; every day is an ordinary day.
    None,
}

/// Holidays for a window of years, keyed by date.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    days: BTreeMap<NaiveDate, &'static str>,
}

impl HolidayCalendar {
    /// Calendar covering `year - 1 ..= year + 1`.
    ///
    /// The wide window catches observed dates that spill across a year
    /// boundary, e.g. New Year's Day observed on the preceding December 31.
    pub fn around(region: HolidayRegion, year: i32) -> Self {
        let mut days = BTreeMap::new();
        if region == HolidayRegion::UnitedStates {
            for y in (year - 1)..=(year + 1) {
                for (date, name) in us_federal_holidays(y) {
                    days.insert(date, name);
                }
            }
        }
        Self { days }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn name(&self, date: NaiveDate) -> Option<&'static str> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Whether `date` is a holiday in `region`.
pub fn is_holiday(region: HolidayRegion, date: NaiveDate) -> bool {
    HolidayCalendar::around(region, date.year()).contains(date)
}

/// Federal holidays in force for `year`, observed dates included.
pub fn us_federal_holidays(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let mut out = Vec::with_capacity(16);
    let mut fixed = |month: u32, day: u32, name: &'static str| {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            out.push((date, name));
            if let Some(shifted) = observed(date) {
                out.push((shifted, concat_observed(name)));
            }
        }
    };

    fixed(1, 1, "New Year's Day");
    if year >= 2021 {
        fixed(6, 19, "Juneteenth National Independence Day");
    }
    fixed(7, 4, "Independence Day");
    fixed(11, 11, "Veterans Day");
    fixed(12, 25, "Christmas Day");

    let floating = [
        (year >= 1986, nth_weekday(year, 1, Weekday::Mon, 3), "Martin Luther King Jr. Day"),
        (true, nth_weekday(year, 2, Weekday::Mon, 3), "Washington's Birthday"),
        (true, last_weekday(year, 5, Weekday::Mon), "Memorial Day"),
        (true, nth_weekday(year, 9, Weekday::Mon, 1), "Labor Day"),
        (true, nth_weekday(year, 10, Weekday::Mon, 2), "Columbus Day"),
        (true, nth_weekday(year, 11, Weekday::Thu, 4), "Thanksgiving"),
    ];
    for (in_force, date, name) in floating {
        if let (true, Some(date)) = (in_force, date) {
            out.push((date, name));
        }
    }

    out.sort();
    out
}

fn concat_observed(name: &'static str) -> &'static str {
    match name {
        "New Year's Day" => "New Year's Day (observed)",
        "Juneteenth National Independence Day" => "Juneteenth National Independence Day (observed)",
        "Independence Day" => "Independence Day (observed)",
        "Veterans Day" => "Veterans Day (observed)",
        "Christmas Day" => "Christmas Day (observed)",
        _ => "Holiday (observed)",
    }
}

/// Weekday a weekend holiday is observed on, if it falls on a weekend.
fn observed(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => Some(date - Duration::days(1)),
        Weekday::Sun => Some(date + Duration::days(1)),
        _ => None,
    }
}

/// The `n`-th (1-based) `weekday` of a month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    nth_weekday(year, month, weekday, 5).or_else(|| nth_weekday(year, month, weekday, 4))
}
