use anyhow::Result;
use comfy_table::{presets::NOTHING, Table};

use crate::{
    models::{
        stats::{TransactorValue, ValueByDate},
        transactions::TransactionDocument,
    },
    utils::{
        amounts::{format_amount, signed_amount},
        dates::mongo_date_to_str,
    },
};

/// Rows ready to be printed as a fixed-width table or written as CSV.
#[derive(Debug, Clone)]
pub struct Sheet {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn to_text(&self) -> String {
        let mut table = Table::new();
        table.load_preset(NOTHING).set_header(self.header.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

pub fn ledger_sheet(transactions: &[TransactionDocument]) -> Sheet {
    let rows = transactions
        .iter()
        .map(|tx| {
            vec![
                tx.created_at
                    .as_ref()
                    .map(mongo_date_to_str)
                    .unwrap_or_default(),
                tx.event.clone().unwrap_or_default(),
                tx.token_involved.clone().unwrap_or_default(),
                signed_amount(tx)
                    .map(|amount| format_amount(&amount))
                    .unwrap_or_default(),
                tx.status.clone().unwrap_or_default(),
                tx.transaction_hash.clone().unwrap_or_default(),
            ]
        })
        .collect();

    Sheet {
        header: vec!["Date", "Event", "Token", "Amount", "Status", "Tx Hash"],
        rows,
    }
}

pub fn volumes_sheet(volumes: &[ValueByDate]) -> Sheet {
    Sheet {
        header: vec!["Date", "Volume"],
        rows: volumes
            .iter()
            .map(|v| vec![v.date.clone(), v.value.to_string()])
            .collect(),
    }
}

pub fn transactors_sheet(transactors: &[TransactorValue]) -> Sheet {
    Sheet {
        header: vec!["Rank", "Address", "Value"],
        rows: transactors
            .iter()
            .enumerate()
            .map(|(rank, t)| vec![(rank + 1).to_string(), t.address.clone(), t.value.to_string()])
            .collect(),
    }
}
