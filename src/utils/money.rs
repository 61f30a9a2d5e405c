//! 金额换算与奖学金减免计算
//!
//! 数据库中金额以最小货币单位（poisha）存储，百分比以百分之一为单位存储。

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::errors::{Result, TutoriaError};

/// 费用减免明细
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub base_fee: Decimal,
    pub discount: Decimal,
    pub payable: Decimal,
}

/// 四舍五入（半数进位）保留两位小数
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn minor_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

pub fn decimal_to_minor(value: Decimal) -> Result<i64> {
    (round_money(value) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| TutoriaError::validation(format!("Amount out of range: {value}")))
}

pub fn hundredths_to_percent(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}

pub fn percent_to_hundredths(percent: Decimal) -> Result<i64> {
    decimal_to_minor(percent)
}

/// 校验金额非负且最多两位小数
pub fn validate_amount(value: Decimal) -> std::result::Result<(), &'static str> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err("Amount must not be negative");
    }
    if value.normalize().scale() > 2 {
        return Err("Amount must have at most two decimal places");
    }
    Ok(())
}

/// 校验百分比位于 0..=100
pub fn validate_percentage(value: Decimal) -> std::result::Result<(), &'static str> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err("Percentage must be between 0 and 100");
    }
    if value.normalize().scale() > 2 {
        return Err("Percentage must have at most two decimal places");
    }
    Ok(())
}

/// 按奖学金百分比计算应付金额
pub fn apply_scholarship(base_fee: Decimal, percentage: Option<Decimal>) -> FeeBreakdown {
    let discount = match percentage {
        Some(pct) if pct > Decimal::ZERO => round_money(base_fee * pct / Decimal::ONE_HUNDRED),
        _ => Decimal::ZERO,
    };
    FeeBreakdown {
        base_fee,
        discount,
        payable: round_money(base_fee - discount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_no_scholarship() {
        let fee = apply_scholarship(d("1500.00"), None);
        assert_eq!(fee.discount, Decimal::ZERO);
        assert_eq!(fee.payable, d("1500.00"));
    }

    #[test]
    fn test_scholarship_discount() {
        let fee = apply_scholarship(d("1000.00"), Some(d("12.5")));
        assert_eq!(fee.discount, d("125.00"));
        assert_eq!(fee.payable, d("875.00"));
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 333.33 * 15% = 49.9995
        let fee = apply_scholarship(d("333.33"), Some(d("15")));
        assert_eq!(fee.discount, d("50.00"));
        assert_eq!(fee.payable, d("283.33"));

        // 10.05 * 50% = 5.025
        let fee = apply_scholarship(d("10.05"), Some(d("50")));
        assert_eq!(fee.discount, d("5.03"));
        assert_eq!(fee.payable, d("5.02"));
    }

    #[test]
    fn test_full_scholarship() {
        let fee = apply_scholarship(d("800"), Some(d("100")));
        assert_eq!(fee.payable, Decimal::ZERO);
    }

    #[test]
    fn test_minor_units_conversion() {
        assert_eq!(decimal_to_minor(d("12.345")).unwrap(), 1235);
        assert_eq!(minor_to_decimal(1235), d("12.35"));
        assert_eq!(hundredths_to_percent(1250), d("12.50"));
    }

    #[test]
    fn test_validation() {
        assert!(validate_amount(d("10.5")).is_ok());
        assert!(validate_amount(d("-1")).is_err());
        assert!(validate_amount(d("1.001")).is_err());
        assert!(validate_percentage(d("100")).is_ok());
        assert!(validate_percentage(d("100.01")).is_err());
    }
}
