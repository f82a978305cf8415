use std::fmt;

use bigdecimal::{BigDecimal, ToPrimitive};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    models::params::{CountType, EventScope, Period, StatFunction, TokenScope},
    state::DatabaseError,
    utils::amounts::{format_amount, scale_base_units},
};

/// One row out of a `$group` stage: a bucket date or an address with its value.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatedDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: Bson,
}

impl AggregatedDocument {
    pub fn bucket_value(&self, fnc: StatFunction) -> Result<BucketValue, DatabaseError> {
        match (fnc, &self.value) {
            (StatFunction::Count, Bson::Int32(count)) => Ok(BucketValue::Count(i64::from(*count))),
            (StatFunction::Count, Bson::Int64(count)) => Ok(BucketValue::Count(*count)),
            (StatFunction::Sum, Bson::String(raw)) => scale_base_units(raw)
                .map(BucketValue::Amount)
                .ok_or_else(|| {
                    DatabaseError::Other(format!("invalid amount {:?} for {}", raw, self.key))
                }),
            (StatFunction::Sum, Bson::Int32(raw)) => {
                Ok(BucketValue::Amount(scaled_integer(i64::from(*raw))))
            }
            (StatFunction::Sum, Bson::Int64(raw)) => Ok(BucketValue::Amount(scaled_integer(*raw))),
            (_, other) => Err(DatabaseError::Other(format!(
                "unexpected value {:?} for {}",
                other, self.key
            ))),
        }
    }
}

fn scaled_integer(raw: i64) -> BigDecimal {
    scale_base_units(&raw.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum BucketValue {
    Count(i64),
    /// Already scaled down from base units.
    Amount(BigDecimal),
}

impl BucketValue {
    pub fn zero(fnc: StatFunction) -> Self {
        match fnc {
            StatFunction::Count => BucketValue::Count(0),
            StatFunction::Sum => BucketValue::Amount(BigDecimal::from(0)),
        }
    }

    pub fn add(self, other: &BucketValue) -> BucketValue {
        match (self, other) {
            (BucketValue::Count(a), BucketValue::Count(b)) => BucketValue::Count(a + b),
            (BucketValue::Amount(a), BucketValue::Amount(b)) => BucketValue::Amount(a + b),
            (BucketValue::Count(a), BucketValue::Amount(b)) => {
                BucketValue::Amount(BigDecimal::from(a) + b)
            }
            (BucketValue::Amount(a), BucketValue::Count(b)) => {
                BucketValue::Amount(a + BigDecimal::from(*b))
            }
        }
    }
}

impl Serialize for BucketValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BucketValue::Count(count) => serializer.serialize_i64(*count),
            BucketValue::Amount(amount) => serializer.serialize_f64(amount.to_f64().unwrap_or(0.0)),
        }
    }
}

impl fmt::Display for BucketValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketValue::Count(count) => write!(f, "{}", count),
            BucketValue::Amount(amount) => write!(f, "{}", format_amount(amount)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountByDate {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueByDate {
    pub date: String,
    pub value: BucketValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactorValue {
    pub address: String,
    pub value: BucketValue,
}

fn bounds<T>(items: &[T], date: impl Fn(&T) -> &str) -> (Option<String>, Option<String>) {
    (
        items.first().map(|item| date(item).to_string()),
        items.last().map(|item| date(item).to_string()),
    )
}

fn total(values: &[ValueByDate], fnc: StatFunction) -> BucketValue {
    values
        .iter()
        .fold(BucketValue::zero(fnc), |acc, item| acc.add(&item.value))
}

#[derive(Debug, Serialize)]
pub struct AccountsList {
    pub accounts: Vec<CountByDate>,
    pub group_by: Period,
    #[serde(rename = "type")]
    pub kind: CountType,
    pub token: TokenScope,
    pub filter: EventScope,
    pub since: Option<String>,
    pub to: Option<String>,
    pub total: i64,
    pub count: usize,
}

impl AccountsList {
    pub fn new(
        accounts: Vec<CountByDate>,
        token: TokenScope,
        filter: EventScope,
        group_by: Period,
    ) -> Self {
        let (since, to) = bounds(&accounts, |a| &a.date);
        AccountsList {
            total: accounts.iter().map(|a| a.count).sum(),
            count: accounts.len(),
            accounts,
            group_by,
            kind: CountType::OnlyNewAccounts,
            token,
            filter,
            since,
            to,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionsStats {
    pub values: Vec<ValueByDate>,
    pub fnc: StatFunction,
    #[serde(rename = "type")]
    pub kind: CountType,
    pub token: TokenScope,
    pub filter: EventScope,
    pub group_by: Period,
    pub since: Option<String>,
    pub to: Option<String>,
    pub total: BucketValue,
    pub count: usize,
}

impl TransactionsStats {
    pub fn new(
        values: Vec<ValueByDate>,
        fnc: StatFunction,
        kind: CountType,
        token: TokenScope,
        filter: EventScope,
        group_by: Period,
    ) -> Self {
        let (since, to) = bounds(&values, |v| &v.date);
        TransactionsStats {
            total: total(&values, fnc),
            count: values.len(),
            values,
            fnc,
            kind,
            token,
            filter,
            group_by,
            since,
            to,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VolumeList {
    pub volumes: Vec<ValueByDate>,
    pub token: TokenScope,
    pub filter: EventScope,
    pub group_by: Period,
    pub since: Option<String>,
    pub to: Option<String>,
    pub total: BucketValue,
    pub count: usize,
}

impl VolumeList {
    pub fn new(
        volumes: Vec<ValueByDate>,
        token: TokenScope,
        filter: EventScope,
        group_by: Period,
    ) -> Self {
        let (since, to) = bounds(&volumes, |v| &v.date);
        VolumeList {
            total: total(&volumes, StatFunction::Sum),
            count: volumes.len(),
            volumes,
            token,
            filter,
            group_by,
            since,
            to,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopTransactorsList {
    pub transactors: Vec<TransactorValue>,
    pub fnc: StatFunction,
    pub token: TokenScope,
    pub filter: EventScope,
    pub days: u32,
    pub top: u32,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn aggregated(key: &str, value: Bson) -> AggregatedDocument {
        AggregatedDocument {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_bucket_value_count() {
        let value = aggregated("2024-01-07", Bson::Int32(46))
            .bucket_value(StatFunction::Count)
            .unwrap();
        assert_eq!(value, BucketValue::Count(46));
    }

    #[test]
    fn test_bucket_value_sum_is_scaled() {
        let value = aggregated("2024-01-31", Bson::String("2500000000000000000".to_string()))
            .bucket_value(StatFunction::Sum)
            .unwrap();
        assert_eq!(
            value,
            BucketValue::Amount(BigDecimal::from_str("2.5").unwrap())
        );
    }

    #[test]
    fn test_bucket_value_rejects_garbage() {
        assert!(aggregated("2024-01-31", Bson::String("abc".to_string()))
            .bucket_value(StatFunction::Sum)
            .is_err());
        assert!(aggregated("2024-01-31", Bson::Null)
            .bucket_value(StatFunction::Count)
            .is_err());
    }

    #[test]
    fn test_accounts_list_summary() {
        let accounts = vec![
            CountByDate {
                date: "2024-01-07".to_string(),
                count: 3,
            },
            CountByDate {
                date: "2024-01-14".to_string(),
                count: 5,
            },
        ];
        let list = AccountsList::new(accounts, TokenScope::All, EventScope::All, Period::Week);
        let value = serde_json::to_value(&list).unwrap();

        assert_eq!(value["since"], "2024-01-07");
        assert_eq!(value["to"], "2024-01-14");
        assert_eq!(value["total"], 8);
        assert_eq!(value["count"], 2);
        assert_eq!(value["group_by"], "week");
        assert_eq!(value["type"], "only_new_accounts");
        assert_eq!(value["accounts"][0]["count"], 3);
    }

    #[test]
    fn test_empty_series_has_no_bounds() {
        let list = VolumeList::new(Vec::new(), TokenScope::Stable, EventScope::All, Period::Month);
        let value = serde_json::to_value(&list).unwrap();

        assert!(value["since"].is_null());
        assert!(value["to"].is_null());
        assert_eq!(value["total"], 0.0);
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn test_volume_total_and_json_numbers() {
        let volumes = vec![
            ValueByDate {
                date: "2024-01-31".to_string(),
                value: BucketValue::Amount(BigDecimal::from_str("1.5").unwrap()),
            },
            ValueByDate {
                date: "2024-02-29".to_string(),
                value: BucketValue::Amount(BigDecimal::from_str("2.25").unwrap()),
            },
        ];
        let list = VolumeList::new(volumes, TokenScope::Stable, EventScope::All, Period::Month);
        let value = serde_json::to_value(&list).unwrap();

        assert_eq!(value["volumes"][0]["value"], 1.5);
        assert_eq!(value["total"], 3.75);
        assert_eq!(value["token"], "stable");
    }
}
