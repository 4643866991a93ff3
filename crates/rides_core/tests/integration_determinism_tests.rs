mod support;

use rand_distr::{Distribution, Poisson};
use rides_core::catalog::CityCatalog;
use rides_core::day::build_day;
use rides_core::holidays::{is_holiday, HolidayRegion};
use rides_core::rng::{day_stream, seeded};
use rides_core::run::{run, RunPlan, SeedMode, SinkFailurePolicy};
use rides_core::volume::{daily_count, season_multiplier};
use chrono::{Datelike, Weekday};
use support::date;
use support::sinks::MemorySink;

#[test]
fn same_seed_reproduces_identical_tables() {
    let plan = RunPlan::new(date(2024, 1, 1), date(2024, 1, 10), 17, 300.0, CityCatalog::default());
    let mut first = MemorySink::default();
    let mut second = MemorySink::default();
    run(&plan, &mut first, SinkFailurePolicy::Abort).unwrap();
    run(&plan, &mut second, SinkFailurePolicy::Abort).unwrap();
    assert_eq!(first.tables.len(), 10);
    assert_eq!(first.tables, second.tables);
}

#[test]
fn different_seeds_diverge() {
    let catalog = CityCatalog::default();
    let a = build_day(&mut seeded(1), date(2024, 1, 2), 300.0, &catalog, HolidayRegion::UnitedStates).unwrap();
    let b = build_day(&mut seeded(2), date(2024, 1, 2), 300.0, &catalog, HolidayRegion::UnitedStates).unwrap();
    assert_ne!(a, b);
}

#[test]
fn phoenix_tuesday_count_matches_poisson_draw() {
    let phoenix = CityCatalog::default().only("Phoenix").unwrap();
    let day = date(2024, 3, 5);
    assert_eq!(day.weekday(), Weekday::Tue);
    assert!(!is_holiday(HolidayRegion::UnitedStates, day));

    let lambda = 1000.0 * season_multiplier(day.ordinal());
    let draw: f64 = Poisson::new(lambda).unwrap().sample(&mut seeded(17));
    let expected = draw as u64;

    let count = daily_count(&mut seeded(17), day, false, false, 1000.0).unwrap();
    assert_eq!(count, expected);
    assert_eq!(daily_count(&mut seeded(17), day, false, false, 1000.0).unwrap(), count);

    // The whole day lands in Phoenix.
    let table = build_day(&mut seeded(17), day, 1000.0, &phoenix, HolidayRegion::UnitedStates).unwrap();
    assert_eq!(table.len() as u64, count);
    assert!(table.records.iter().all(|r| r.city == "Phoenix"));
}

#[test]
fn per_day_streams_do_not_depend_on_range() {
    let catalog = CityCatalog::default();
    let short = RunPlan::new(date(2024, 5, 10), date(2024, 5, 12), 9, 200.0, catalog.clone())
        .with_seed_mode(SeedMode::PerDay);
    let long = RunPlan::new(date(2024, 5, 1), date(2024, 5, 12), 9, 200.0, catalog.clone())
        .with_seed_mode(SeedMode::PerDay);

    let mut a = MemorySink::default();
    let mut b = MemorySink::default();
    run(&short, &mut a, SinkFailurePolicy::Abort).unwrap();
    run(&long, &mut b, SinkFailurePolicy::Abort).unwrap();

    assert_eq!(a.tables.len(), 3);
    assert_eq!(&b.tables[b.tables.len() - 3..], &a.tables[..]);

    let direct = build_day(
        &mut day_stream(9, date(2024, 5, 11)),
        date(2024, 5, 11),
        200.0,
        &catalog,
        HolidayRegion::UnitedStates,
    )
    .unwrap();
    assert_eq!(a.tables[1], direct);
}

#[test]
fn per_day_mode_delivers_in_date_order() {
    let plan = RunPlan::new(date(2024, 1, 1), date(2024, 3, 1), 3, 20.0, CityCatalog::default())
        .with_seed_mode(SeedMode::PerDay);
    let mut sink = MemorySink::default();
    run(&plan, &mut sink, SinkFailurePolicy::Abort).unwrap();
    assert_eq!(sink.tables.len(), 61);
    assert!(sink.tables.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn sequential_stream_depends_on_preceding_days() {
    let catalog = CityCatalog::default();
    let mut rng = seeded(4);
    build_day(&mut rng, date(2024, 1, 1), 100.0, &catalog, HolidayRegion::UnitedStates).unwrap();
    let second_in_sequence = build_day(&mut rng, date(2024, 1, 2), 100.0, &catalog, HolidayRegion::UnitedStates).unwrap();
    let fresh = build_day(&mut seeded(4), date(2024, 1, 2), 100.0, &catalog, HolidayRegion::UnitedStates).unwrap();
    assert_ne!(second_in_sequence, fresh);
}
