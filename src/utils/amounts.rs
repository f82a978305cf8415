use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::models::transactions::TransactionDocument;

pub const BASE_UNIT_DECIMALS: i64 = 18;
const DISPLAY_DECIMALS: i64 = 6;

/// Parses a base-unit string ("1500000000000000000") into token units (1.5).
pub fn scale_base_units(raw: &str) -> Option<BigDecimal> {
    let value = BigDecimal::from_str(raw.trim()).ok()?;
    Some(value * BigDecimal::new(1.into(), BASE_UNIT_DECIMALS))
}

/// Scaled amount of a ledger entry, negative when it leaves the holder.
pub fn signed_amount(tx: &TransactionDocument) -> Option<BigDecimal> {
    let amount = scale_base_units(tx.amount.as_deref()?)?;
    if tx.is_outgoing() {
        Some(-amount)
    } else {
        Some(amount)
    }
}

pub fn format_amount(value: &BigDecimal) -> String {
    value.with_scale(DISPLAY_DECIMALS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transactions::tests::sample_transaction;

    #[test]
    fn test_scale_base_units() {
        assert_eq!(
            scale_base_units("1000000000000000000"),
            Some(BigDecimal::from(1))
        );
        assert_eq!(
            scale_base_units("1500000000000000000"),
            Some(BigDecimal::from_str("1.5").unwrap())
        );
        assert_eq!(
            scale_base_units("1"),
            Some(BigDecimal::from_str("0.000000000000000001").unwrap())
        );
        assert_eq!(scale_base_units("0"), Some(BigDecimal::from(0)));
    }

    #[test]
    fn test_scale_base_units_rejects_non_numbers() {
        assert_eq!(scale_base_units(""), None);
        assert_eq!(scale_base_units("0x10"), None);
        assert_eq!(scale_base_units("ten"), None);
    }

    #[test]
    fn test_signed_amount_direction() {
        let mint = sample_transaction("StableTokenMint", "2000000000000000000", None);
        let redeem = sample_transaction("FreeStableTokenRedeem", "2000000000000000000", None);
        let sent = sample_transaction("Transfer", "500000000000000000", Some(false));
        let received = sample_transaction("Transfer", "500000000000000000", Some(true));

        assert_eq!(signed_amount(&mint), Some(BigDecimal::from(2)));
        assert_eq!(signed_amount(&redeem), Some(BigDecimal::from(-2)));
        assert_eq!(
            signed_amount(&sent),
            Some(BigDecimal::from_str("-0.5").unwrap())
        );
        assert_eq!(
            signed_amount(&received),
            Some(BigDecimal::from_str("0.5").unwrap())
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(&BigDecimal::from(1)), "1.000000");
        assert_eq!(
            format_amount(&BigDecimal::from_str("-0.5").unwrap()),
            "-0.500000"
        );
    }
}
