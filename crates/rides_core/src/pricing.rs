//! Fare and driver earnings for a ride.
//!
//! Random inputs (toll noise, coupon, promo, tip) are drawn up front into
//! [`FareDraws`]; [`calculate_fare`] is then a pure function of the rates, the
//! trip and those draws.
//!
//! Formula (completed rides only, everything else is zero):
//!
//! ```text
//! subtotal        = (base + per_mile * miles + per_minute * billable_minutes + tolls) * surge
//! taxes           = 0.08 * subtotal
//! platform_fee    = 0.25 * subtotal
//! fare_total      = max(0, subtotal + taxes - coupon)
//! driver_earnings = max(0, subtotal - platform_fee + tip)
//! ```
//!
//! Driver earnings never derive from `fare_total`; what the rider pays and
//! what the driver earns differ by taxes and coupons.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attributes::{RideStatus, TripMetrics};
use crate::catalog::{City, FareRates};
use crate::distributions::{categorical, gaussian, money};
use crate::error::SamplingError;

pub const TAX_RATE: f64 = 0.08;
pub const PLATFORM_FEE_RATE: f64 = 0.25;
pub const PROMO_PROBABILITY: f64 = 0.05;

const TOLL_SD: f64 = 0.8;
const COUPON_SD: f64 = 0.6;
const TIP_MEAN: f64 = 2.5;
const TIP_SD: f64 = 1.8;
const PROMO_BONUSES: [f64; 3] = [1.0, 2.0, 3.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    #[serde(rename = "WELCOME5")]
    Welcome5,
    #[serde(rename = "WEEKEND10")]
    Weekend10,
    #[serde(rename = "RAINRIDE")]
    RainRide,
}

impl PromoCode {
    pub const ALL: [PromoCode; 3] = [PromoCode::Welcome5, PromoCode::Weekend10, PromoCode::RainRide];

    pub fn as_str(self) -> &'static str {
        match self {
            PromoCode::Welcome5 => "WELCOME5",
            PromoCode::Weekend10 => "WEEKEND10",
            PromoCode::RainRide => "RAINRIDE",
        }
    }
}

/// A promo applied to a ride: the code shown and its flat bonus discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Promo {
    pub code: PromoCode,
    pub bonus: f64,
}

/// Random fare inputs for one ride. All zero for rides that did not complete.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FareDraws {
    pub tolls: f64,
    pub coupon: f64,
    pub promo: Option<Promo>,
    pub tip: f64,
}

impl FareDraws {
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        city: &City,
        status: RideStatus,
    ) -> Result<Self, SamplingError> {
        if !status.is_completed() {
            return Ok(Self::default());
        }

        let toll_mean = if city.traits.toll_heavy { 1.2 } else { 0.5 };
        let tolls = gaussian(rng, toll_mean, TOLL_SD).max(0.0);
        let coupon = gaussian(rng, 0.0, COUPON_SD).max(0.0);
        let promo = if rng.gen::<f64>() < PROMO_PROBABILITY {
            let code = PromoCode::ALL[categorical(rng, "promo code", [1.0; 3])?];
            let bonus = PROMO_BONUSES[categorical(rng, "promo bonus", [1.0; 3])?];
            Some(Promo { code, bonus })
        } else {
            None
        };
        let tip = gaussian(rng, TIP_MEAN, TIP_SD).max(0.0);

        Ok(Self {
            tolls,
            coupon,
            promo,
            tip,
        })
    }

    /// Baseline coupon jitter plus any promo bonus.
    pub fn total_discount(&self) -> f64 {
        self.coupon + self.promo.map_or(0.0, |p| p.bonus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareInput<'a> {
    pub rates: &'a FareRates,
    pub status: RideStatus,
    pub trip: &'a TripMetrics,
    pub surge: f64,
}

/// Every monetary field of a ride, rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FareBreakdown {
    pub subtotal: f64,
    pub tolls: f64,
    pub taxes: f64,
    pub coupon_discount: f64,
    pub fare_total: f64,
    pub tip: f64,
    pub platform_fee: f64,
    pub driver_earnings: f64,
    pub promo_code: Option<PromoCode>,
}

pub fn calculate_fare(input: &FareInput<'_>, draws: &FareDraws) -> FareBreakdown {
    if !input.status.is_completed() {
        return FareBreakdown::default();
    }

    let rates = input.rates;
    let fare_distance = rates.per_mile * input.trip.distance_miles;
    let fare_time = rates.per_minute * input.trip.billable_minutes();
    let subtotal = (rates.base_fare + fare_distance + fare_time + draws.tolls) * input.surge;
    let taxes = TAX_RATE * subtotal;
    let platform_fee = PLATFORM_FEE_RATE * subtotal;
    let coupon = draws.total_discount();
    let fare_total = (subtotal + taxes - coupon).max(0.0);
    let driver_earnings = (subtotal - platform_fee + draws.tip).max(0.0);

    FareBreakdown {
        subtotal: money(subtotal),
        tolls: money(draws.tolls),
        taxes: money(taxes),
        coupon_discount: money(coupon),
        fare_total: money(fare_total),
        tip: money(draws.tip),
        platform_fee: money(platform_fee),
        driver_earnings: money(driver_earnings),
        promo_code: draws.promo.map(|p| p.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CityCatalog;
    use crate::rng::seeded;

    fn trip(miles: f64, duration: f64, wait: f64) -> TripMetrics {
        TripMetrics {
            distance_miles: miles,
            avg_speed_mph: 20.0,
            wait_minutes: wait,
            duration_minutes: duration,
        }
    }

    fn rates() -> FareRates {
        FareRates {
            base_fare: 2.0,
            per_mile: 2.0,
            per_minute: 0.5,
        }
    }

    #[test]
    fn fare_formula() {
        let rates = rates();
        let t = trip(5.0, 24.0, 4.0);
        let input = FareInput {
            rates: &rates,
            status: RideStatus::Completed,
            trip: &t,
            surge: 1.5,
        };
        let draws = FareDraws {
            tolls: 1.0,
            coupon: 0.5,
            promo: None,
            tip: 3.0,
        };
        let fare = calculate_fare(&input, &draws);
        // (2 + 10 + 10 + 1) * 1.5
        assert_eq!(fare.subtotal, 34.5);
        assert_eq!(fare.taxes, 2.76);
        assert_eq!(fare.platform_fee, 8.63);
        assert_eq!(fare.fare_total, 36.76);
        // 34.5 - 8.625 + 3
        assert_eq!(fare.driver_earnings, 28.88);
        assert_eq!(fare.promo_code, None);
    }

    #[test]
    fn promo_bonus_adds_to_coupon() {
        let rates = rates();
        let t = trip(1.0, 5.0, 2.0);
        let input = FareInput {
            rates: &rates,
            status: RideStatus::Completed,
            trip: &t,
            surge: 1.0,
        };
        let draws = FareDraws {
            tolls: 0.0,
            coupon: 0.25,
            promo: Some(Promo {
                code: PromoCode::RainRide,
                bonus: 3.0,
            }),
            tip: 0.0,
        };
        let fare = calculate_fare(&input, &draws);
        assert_eq!(fare.coupon_discount, 3.25);
        assert_eq!(fare.promo_code, Some(PromoCode::RainRide));
    }

    #[test]
    fn large_discount_floors_fare_at_zero() {
        let rates = FareRates {
            base_fare: 0.5,
            per_mile: 0.0,
            per_minute: 0.0,
        };
        let t = trip(0.3, 1.0, 1.0);
        let input = FareInput {
            rates: &rates,
            status: RideStatus::Completed,
            trip: &t,
            surge: 1.0,
        };
        let draws = FareDraws {
            coupon: 5.0,
            ..FareDraws::default()
        };
        let fare = calculate_fare(&input, &draws);
        assert_eq!(fare.fare_total, 0.0);
        assert!(fare.driver_earnings >= 0.0);
    }

    #[test]
    fn earnings_ignore_coupon_and_taxes() {
        let rates = rates();
        let t = trip(3.0, 12.0, 3.0);
        let input = FareInput {
            rates: &rates,
            status: RideStatus::Completed,
            trip: &t,
            surge: 1.0,
        };
        let low = calculate_fare(&input, &FareDraws::default());
        let discounted = calculate_fare(
            &input,
            &FareDraws {
                coupon: 4.0,
                ..FareDraws::default()
            },
        );
        assert_eq!(low.driver_earnings, discounted.driver_earnings);
        assert!(discounted.fare_total < low.fare_total);
    }

    #[test]
    fn non_completed_rides_cost_nothing() {
        let rates = rates();
        let t = trip(0.0, 5.0, 5.0);
        for status in [RideStatus::Cancelled, RideStatus::NoShow] {
            let input = FareInput {
                rates: &rates,
                status,
                trip: &t,
                surge: 2.0,
            };
            let draws = FareDraws {
                tolls: 1.0,
                coupon: 1.0,
                promo: None,
                tip: 2.0,
            };
            assert_eq!(calculate_fare(&input, &draws), FareBreakdown::default());
        }
    }

    #[test]
    fn draws_for_non_completed_are_empty() {
        let city = CityCatalog::default().cities()[0].clone();
        let mut rng = seeded(1);
        let draws = FareDraws::sample(&mut rng, &city, RideStatus::NoShow).unwrap();
        assert_eq!(draws, FareDraws::default());
    }

    #[test]
    fn sampled_draws_are_non_negative() {
        let city = CityCatalog::default().cities()[0].clone();
        let mut rng = seeded(2);
        let mut promos = 0;
        let n = 5_000;
        for _ in 0..n {
            let d = FareDraws::sample(&mut rng, &city, RideStatus::Completed).unwrap();
            assert!(d.tolls >= 0.0 && d.coupon >= 0.0 && d.tip >= 0.0);
            if let Some(p) = d.promo {
                promos += 1;
                assert!(PROMO_BONUSES.contains(&p.bonus));
            }
        }
        let rate = promos as f64 / n as f64;
        assert!((rate - PROMO_PROBABILITY).abs() < 0.015, "promo rate {rate}");
    }
}
