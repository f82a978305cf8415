use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::Serializer;

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-07T10:00:00.000Z`.
pub fn mongo_date_to_str(date: &DateTime) -> String {
    match chrono::DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis()) {
        Some(date) => date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => String::new(),
    }
}

pub fn days_ago(days: u32) -> DateTime {
    let since = Utc::now() - Duration::days(i64::from(days));
    DateTime::from_millis(since.timestamp_millis())
}

pub fn serialize_date<S>(date: &DateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&mongo_date_to_str(date))
}

/// Missing dates become `""` so the webapp always gets a string.
pub fn serialize_date_or_empty<S>(date: &Option<DateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serialize_date(date, serializer),
        None => serializer.serialize_str(""),
    }
}

pub fn serialize_optional_date<S>(date: &Option<DateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serialize_date(date, serializer),
        None => serializer.serialize_none(),
    }
}

pub fn serialize_object_id<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_hex())
}
