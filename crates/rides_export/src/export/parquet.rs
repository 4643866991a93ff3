use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use rides_core::{DayTable, RideRecord, SCHEMA_VERSION};

use crate::error::ExportError;

/// Parquet key-value metadata entry carrying [`SCHEMA_VERSION`].
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

const UTC: &str = "UTC";

pub(crate) fn write_parquet<W: Write + Send>(table: &DayTable, sink: W) -> Result<(), ExportError> {
    let batch = build_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(vec![KeyValue::new(
            SCHEMA_VERSION_KEY.to_string(),
            SCHEMA_VERSION.to_string(),
        )]))
        .build();
    let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

pub fn ride_schema() -> Schema {
    Schema::new(vec![
        utf8_field("ride_id"),
        utf8_field("rider_id"),
        utf8_field("driver_id"),
        utf8_field("city"),
        utf8_field("state"),
        utf8_field("pickup_zone"),
        utf8_field("dropoff_zone"),
        f64_field("pickup_lat"),
        f64_field("pickup_lon"),
        f64_field("dropoff_lat"),
        f64_field("dropoff_lon"),
        timestamp_field("start_time_utc"),
        timestamp_field("end_time_utc"),
        utf8_field("status"),
        f64_field("distance_miles"),
        f64_field("duration_minutes"),
        f64_field("wait_time_minutes"),
        f64_field("avg_speed_mph"),
        utf8_field("traffic_level"),
        utf8_field("weather"),
        f64_field("surge_multiplier"),
        f64_field("base_fare"),
        f64_field("per_mile_rate"),
        f64_field("per_minute_rate"),
        f64_field("tolls"),
        f64_field("taxes"),
        f64_field("coupon_discount"),
        f64_field("fare_total"),
        f64_field("tip"),
        f64_field("platform_fee"),
        f64_field("driver_earnings"),
        utf8_field("payment_type"),
        utf8_field("device_type"),
        f64_field("rider_rating"),
        f64_field("driver_rating"),
        bool_field("is_weekend"),
        bool_field("is_holiday"),
        Field::new("promo_code", DataType::Utf8, true),
        utf8_field("city_timezone"),
    ])
}

pub fn build_record_batch(table: &DayTable) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(ride_schema());
    let arrays = build_arrays(&table.records);
    RecordBatch::try_new(schema, arrays)
}

fn build_arrays(records: &[RideRecord]) -> Vec<ArrayRef> {
    vec![
        utf8_column(records, |r| r.ride_id.as_str()),
        utf8_column(records, |r| r.rider_id.as_str()),
        utf8_column(records, |r| r.driver_id.as_str()),
        utf8_column(records, |r| r.city.as_str()),
        utf8_column(records, |r| r.state.as_str()),
        utf8_column(records, |r| r.pickup_zone.as_str()),
        utf8_column(records, |r| r.dropoff_zone.as_str()),
        f64_column(records, |r| r.pickup_lat),
        f64_column(records, |r| r.pickup_lon),
        f64_column(records, |r| r.dropoff_lat),
        f64_column(records, |r| r.dropoff_lon),
        timestamp_column(records, |r| r.start_time_utc.timestamp_micros()),
        timestamp_column(records, |r| r.end_time_utc.timestamp_micros()),
        utf8_column(records, |r| r.status.as_str()),
        f64_column(records, |r| r.distance_miles),
        f64_column(records, |r| r.duration_minutes),
        f64_column(records, |r| r.wait_time_minutes),
        f64_column(records, |r| r.avg_speed_mph),
        utf8_column(records, |r| r.traffic_level.as_str()),
        utf8_column(records, |r| r.weather.as_str()),
        f64_column(records, |r| r.surge_multiplier),
        f64_column(records, |r| r.base_fare),
        f64_column(records, |r| r.per_mile_rate),
        f64_column(records, |r| r.per_minute_rate),
        f64_column(records, |r| r.tolls),
        f64_column(records, |r| r.taxes),
        f64_column(records, |r| r.coupon_discount),
        f64_column(records, |r| r.fare_total),
        f64_column(records, |r| r.tip),
        f64_column(records, |r| r.platform_fee),
        f64_column(records, |r| r.driver_earnings),
        utf8_column(records, |r| r.payment_type.as_str()),
        utf8_column(records, |r| r.device_type.as_str()),
        f64_column(records, |r| r.rider_rating),
        f64_column(records, |r| r.driver_rating),
        bool_column(records, |r| r.is_weekend),
        bool_column(records, |r| r.is_holiday),
        Arc::new(StringArray::from(
            records
                .iter()
                .map(|r| r.promo_code.map(|p| p.as_str()))
                .collect::<Vec<_>>(),
        )),
        utf8_column(records, |r| r.city_timezone.as_str()),
    ]
}

fn utf8_field(name: &'static str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

fn f64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Float64, false)
}

fn bool_field(name: &'static str) -> Field {
    Field::new(name, DataType::Boolean, false)
}

fn timestamp_field(name: &'static str) -> Field {
    Field::new(
        name,
        DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into())),
        false,
    )
}

fn utf8_column<'a>(records: &'a [RideRecord], value: impl Fn(&'a RideRecord) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(records.iter().map(value)))
}

fn f64_column(records: &[RideRecord], value: impl Fn(&RideRecord) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(records.iter().map(value)))
}

fn bool_column(records: &[RideRecord], value: impl Fn(&RideRecord) -> bool) -> ArrayRef {
    Arc::new(BooleanArray::from(records.iter().map(value).collect::<Vec<_>>()))
}

fn timestamp_column(records: &[RideRecord], micros: impl Fn(&RideRecord) -> i64) -> ArrayRef {
    Arc::new(TimestampMicrosecondArray::from_iter_values(records.iter().map(micros)).with_timezone(UTC))
}
