use mongodb::bson::{doc, Bson, Document};

use crate::models::params::{EventScope, Period, StatFunction, TokenScope};

const MINT_EVENTS: [&str; 2] = ["RiskProMint", "StableTokenMint"];
const REDEEM_EVENTS: [&str; 2] = ["RiskProRedeem", "FreeStableTokenRedeem"];
const DAY_MS: i64 = 86_400_000;

impl TokenScope {
    /// Value of `tokenInvolved` in the store, `None` for every token.
    pub fn token_involved(&self) -> Option<&'static str> {
        match self {
            TokenScope::All => None,
            TokenScope::Stable => Some("STABLE"),
            TokenScope::Pro => Some("RISKPRO"),
            TokenScope::Governance => Some("MOC"),
        }
    }

    pub fn match_stage(&self) -> Option<Document> {
        self.token_involved()
            .map(|token| doc! { "$match": { "tokenInvolved": token } })
    }
}

impl EventScope {
    pub fn events(&self) -> Option<Vec<&'static str>> {
        match self {
            EventScope::All => None,
            EventScope::Transfer => Some(vec!["Transfer"]),
            EventScope::Mint => Some(MINT_EVENTS.to_vec()),
            EventScope::Redeem => Some(REDEEM_EVENTS.to_vec()),
            EventScope::MintAndRedeem => Some([MINT_EVENTS, REDEEM_EVENTS].concat()),
        }
    }

    pub fn is_mint_or_redeem(&self) -> bool {
        matches!(
            self,
            EventScope::Mint | EventScope::Redeem | EventScope::MintAndRedeem
        )
    }

    pub fn match_stage(&self) -> Option<Document> {
        self.events().map(|events| {
            if events.len() == 1 {
                doc! { "$match": { "event": events[0] } }
            } else {
                doc! { "$match": { "event": { "$in": events } } }
            }
        })
    }
}

impl Period {
    /// `%Y-%m-%d` string of the last day of the period containing `$timestamp`.
    pub fn bucket_expression(&self) -> Document {
        match self {
            Period::Day => doc! {
                "$dateToString": { "format": "%Y-%m-%d", "date": "$timestamp" }
            },
            Period::Week => doc! {
                "$dateToString": {
                    "format": "%Y-%m-%d",
                    "date": {
                        "$dateFromParts": {
                            "isoWeekYear": { "$isoWeekYear": "$timestamp" },
                            "isoWeek": { "$isoWeek": "$timestamp" },
                            "isoDayOfWeek": 7
                        }
                    }
                }
            },
            // first day of the next month, minus one day
            Period::Month => doc! {
                "$dateToString": {
                    "format": "%Y-%m-%d",
                    "date": {
                        "$subtract": [
                            {
                                "$dateFromParts": {
                                    "year": { "$year": "$timestamp" },
                                    "month": { "$add": [{ "$month": "$timestamp" }, 1] }
                                }
                            },
                            DAY_MS
                        ]
                    }
                }
            },
            Period::Year => doc! {
                "$dateToString": { "format": "%Y-12-31", "date": "$timestamp" }
            },
        }
    }
}

/// `amount` as Decimal128; missing or malformed amounts weigh nothing.
pub fn amount_as_decimal() -> Document {
    doc! {
        "$convert": {
            "input": "$amount",
            "to": "decimal",
            "onError": 0,
            "onNull": 0
        }
    }
}

impl StatFunction {
    /// Accumulated expression for a `$sum` over documents carrying `amount_field`.
    pub fn accumulated(&self, amount_field: &str) -> Bson {
        match self {
            StatFunction::Count => Bson::Int32(1),
            StatFunction::Sum => Bson::String(amount_field.to_string()),
        }
    }

    /// Decimal128 sums leave the server as strings to keep every digit.
    pub fn output_stage(&self) -> Option<Document> {
        match self {
            StatFunction::Count => None,
            StatFunction::Sum => Some(doc! { "$project": { "value": { "$toString": "$value" } } }),
        }
    }
}
