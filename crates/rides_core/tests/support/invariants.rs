use rides_core::attributes::RideStatus;
use rides_core::record::RideRecord;

/// Every cross-field rule a generated row must satisfy.
pub fn assert_ride_invariants(r: &RideRecord) {
    let id = &r.ride_id;
    for (name, value) in [
        ("fare_total", r.fare_total),
        ("driver_earnings", r.driver_earnings),
        ("tolls", r.tolls),
        ("taxes", r.taxes),
        ("coupon_discount", r.coupon_discount),
        ("tip", r.tip),
        ("platform_fee", r.platform_fee),
    ] {
        assert!(value >= 0.0, "{id}: {name} negative ({value})");
    }

    assert!((3.0..=5.0).contains(&r.rider_rating), "{id}: rider rating {}", r.rider_rating);
    assert!((3.0..=5.0).contains(&r.driver_rating), "{id}: driver rating {}", r.driver_rating);
    assert!(
        (1.0..=3.0).contains(&r.surge_multiplier),
        "{id}: surge {}",
        r.surge_multiplier
    );
    assert!(r.wait_time_minutes >= 0.0);

    if r.status == RideStatus::Completed {
        assert!(r.distance_miles >= 0.3 && r.distance_miles <= 60.0);
        assert!(r.avg_speed_mph >= 6.0);
        assert!(r.duration_minutes >= 1.0);
        assert!(r.end_time_utc > r.start_time_utc);
    } else {
        assert_eq!(r.distance_miles, 0.0, "{id}");
        assert_eq!(r.avg_speed_mph, 0.0, "{id}");
        assert_eq!(r.fare_total, 0.0, "{id}");
        assert_eq!(r.tip, 0.0, "{id}");
        assert_eq!(r.tolls, 0.0, "{id}");
        assert_eq!(r.taxes, 0.0, "{id}");
        assert_eq!(r.coupon_discount, 0.0, "{id}");
        assert_eq!(r.platform_fee, 0.0, "{id}");
        assert_eq!(r.driver_earnings, 0.0, "{id}");
        assert_eq!(r.promo_code, None, "{id}");
        assert_eq!(r.end_time_utc, r.start_time_utc, "{id}");
        assert_eq!(r.duration_minutes, r.wait_time_minutes, "{id}");
    }
}
