//! Time-of-day demand shapes and the hour sets the context model keys on.
//!
//! Weights are relative; they are normalized before sampling.

use rand::Rng;

use crate::distributions::categorical;
use crate::error::SamplingError;

/// Monday to Friday demand by hour of day (UTC).
pub const HOUR_WEIGHTS_WEEKDAY: [f64; 24] = [
    0.8, // 12 AM - 1 AM
    0.5, // 1 AM - 2 AM
    0.4, // 2 AM - 3 AM
    0.4, // 3 AM - 4 AM
    0.5, // 4 AM - 5 AM
    0.7, // 5 AM - 6 AM
    1.6, // 6 AM - 7 AM (morning commute)
    2.0, // 7 AM - 8 AM (morning commute peak)
    1.4, // 8 AM - 9 AM
    1.0, // 9 AM - 10 AM
    0.9, // 10 AM - 11 AM
    0.9, // 11 AM - 12 PM
    0.9, // 12 PM - 1 PM
    1.0, // 1 PM - 2 PM
    1.1, // 2 PM - 3 PM
    1.3, // 3 PM - 4 PM
    1.8, // 4 PM - 5 PM (evening commute)
    2.3, // 5 PM - 6 PM (evening commute peak)
    1.9, // 6 PM - 7 PM
    1.6, // 7 PM - 8 PM
    1.4, // 8 PM - 9 PM
    1.2, // 9 PM - 10 PM
    1.0, // 10 PM - 11 PM
    0.9, // 11 PM - 12 AM
];

/// Saturday and Sunday demand by hour: flatter mornings, late-night bumps.
pub const HOUR_WEIGHTS_WEEKEND: [f64; 24] = [
    1.0, // 12 AM - 1 AM
    0.9, // 1 AM - 2 AM
    0.8, // 2 AM - 3 AM
    0.8, // 3 AM - 4 AM
    0.9, // 4 AM - 5 AM
    1.2, // 5 AM - 6 AM
    1.6, // 6 AM - 7 AM
    1.8, // 7 AM - 8 AM
    1.7, // 8 AM - 9 AM
    1.5, // 9 AM - 10 AM
    1.3, // 10 AM - 11 AM
    1.2, // 11 AM - 12 PM
    1.2, // 12 PM - 1 PM
    1.3, // 1 PM - 2 PM
    1.4, // 2 PM - 3 PM
    1.7, // 3 PM - 4 PM
    2.1, // 4 PM - 5 PM
    2.7, // 5 PM - 6 PM (evening peak)
    2.4, // 6 PM - 7 PM
    2.2, // 7 PM - 8 PM
    2.0, // 8 PM - 9 PM
    2.1, // 9 PM - 10 PM
    2.3, // 10 PM - 11 PM (nightlife)
    2.2, // 11 PM - 12 AM (nightlife)
];

const COMMUTE_HOURS: [u32; 6] = [6, 7, 8, 16, 17, 18];
const NIGHTLIFE_HOURS: [u32; 4] = [22, 23, 0, 1];
const LATE_NIGHT_HOURS: [u32; 6] = [22, 23, 0, 1, 2, 3];

pub fn hour_weights(is_weekend: bool) -> [f64; 24] {
    if is_weekend {
        HOUR_WEIGHTS_WEEKEND
    } else {
        HOUR_WEIGHTS_WEEKDAY
    }
}

/// Draw a start hour from the day's demand shape.
pub fn choose_hour<R: Rng + ?Sized>(rng: &mut R, is_weekend: bool) -> Result<u32, SamplingError> {
    let idx = categorical(rng, "hour", hour_weights(is_weekend))?;
    Ok(idx as u32)
}

/// Weekday rush hours.
pub fn is_commute_hour(hour: u32) -> bool {
    COMMUTE_HOURS.contains(&hour)
}

/// Bar-closing hours that lift weekend traffic and surge.
pub fn is_nightlife_hour(hour: u32) -> bool {
    NIGHTLIFE_HOURS.contains(&hour)
}

/// Empty-road hours that raise average speed.
pub fn is_late_night_hour(hour: u32) -> bool {
    LATE_NIGHT_HOURS.contains(&hour)
}
