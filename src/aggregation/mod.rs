use mongodb::bson::{doc, DateTime, Document};
use thiserror::Error;

use crate::models::params::{CountType, EventScope, Period, StatFunction, TokenScope};

pub mod stages;

use stages::amount_as_decimal;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    #[error("Only new accounts can be counted, not summed")]
    NewAccountsSum,
    #[error("Amounts of different tokens cannot be summed, choose a token")]
    AllTokensSum,
    #[error("The governance token has no mint or redeem events")]
    GovernanceMintRedeem,
}

fn check_scopes(token: TokenScope, event: EventScope, fnc: StatFunction) -> Result<(), QueryError> {
    if fnc == StatFunction::Sum && token == TokenScope::All {
        return Err(QueryError::AllTokensSum);
    }
    if token == TokenScope::Governance && event.is_mint_or_redeem() {
        return Err(QueryError::GovernanceMintRedeem);
    }
    Ok(())
}

fn filter_stages(token: TokenScope, event: EventScope) -> Vec<Document> {
    token
        .match_stage()
        .into_iter()
        .chain(event.match_stage())
        .collect()
}

/// Date-bucketed count or sum over the `Transaction` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsQuery {
    pub kind: CountType,
    pub token: TokenScope,
    pub event: EventScope,
    pub period: Period,
    pub fnc: StatFunction,
}

impl StatsQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.kind == CountType::OnlyNewAccounts && self.fnc == StatFunction::Sum {
            return Err(QueryError::NewAccountsSum);
        }
        check_scopes(self.token, self.event, self.fnc)
    }

    /// Stages yield `{_id: <bucket date>, value}` sorted by date ascending.
    pub fn pipeline(&self) -> Result<Vec<Document>, QueryError> {
        self.validate()?;
        let summing = self.fnc == StatFunction::Sum;
        let mut pipeline = filter_stages(self.token, self.event);

        match self.kind {
            CountType::All => {
                let mut projection = doc! { "_id": 0, "timestamp": "$confirmationTime" };
                if summing {
                    projection.insert("amount", amount_as_decimal());
                }
                pipeline.push(doc! { "$project": projection });
            }
            CountType::OnlyNewAccounts => {
                pipeline.push(doc! { "$match": { "address": { "$ne": null } } });
                pipeline.push(doc! {
                    "$group": {
                        "_id": "$address",
                        "timestamp": { "$min": "$confirmationTime" }
                    }
                });
            }
        }

        pipeline.push(doc! { "$match": { "timestamp": { "$ne": null } } });

        let mut bucket = doc! { "_id": 0, "date": self.period.bucket_expression() };
        if summing {
            bucket.insert("amount", 1);
        }
        pipeline.push(doc! { "$project": bucket });

        pipeline.push(doc! {
            "$group": {
                "_id": "$date",
                "value": { "$sum": self.fnc.accumulated("$amount") }
            }
        });
        pipeline.push(doc! { "$sort": { "_id": 1 } });
        pipeline.extend(self.fnc.output_stage());

        Ok(pipeline)
    }
}

/// Addresses ranked by transaction count or volume since a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct TopTransactorsQuery {
    pub token: TokenScope,
    pub event: EventScope,
    pub fnc: StatFunction,
    pub since: DateTime,
    pub top: u32,
}

impl TopTransactorsQuery {
    /// Stages yield `{_id: <address>, value}` sorted by value descending.
    pub fn pipeline(&self) -> Result<Vec<Document>, QueryError> {
        check_scopes(self.token, self.event, self.fnc)?;
        let mut pipeline = filter_stages(self.token, self.event);

        pipeline.push(doc! {
            "$match": {
                "address": { "$ne": null },
                "confirmationTime": { "$gte": self.since }
            }
        });

        let accumulated = match self.fnc {
            StatFunction::Count => self.fnc.accumulated("$amount"),
            StatFunction::Sum => amount_as_decimal().into(),
        };
        pipeline.push(doc! {
            "$group": {
                "_id": "$address",
                "value": { "$sum": accumulated }
            }
        });
        pipeline.push(doc! { "$sort": { "value": -1, "_id": 1 } });
        pipeline.push(doc! { "$limit": i64::from(self.top) });
        pipeline.extend(self.fnc.output_stage());

        Ok(pipeline)
    }
}
