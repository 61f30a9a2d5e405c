use chrono::{Datelike, NaiveDate};

use crate::errors::{Result, TutoriaError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析 `YYYY-MM-DD` 日期
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| TutoriaError::date_parse(format!("Invalid date '{value}': {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 归一化为当月第一天
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 解析账单月份，接受 `YYYY-MM` 或 `YYYY-MM-DD`，统一为当月第一天
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let date = if value.len() == 7 {
        parse_date(&format!("{value}-01"))?
    } else {
        parse_date(value)?
    };
    Ok(first_of_month(date))
}

/// 账单月份标识，如 202501
pub fn year_month_code(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let date = parse_date("2025-03-17").unwrap();
        assert_eq!(format_date(date), "2025-03-17");
        assert!(parse_date("17/03/2025").is_err());
    }

    #[test]
    fn test_first_of_month() {
        let date = parse_date("2025-03-17").unwrap();
        assert_eq!(format_date(first_of_month(date)), "2025-03-01");
        assert_eq!(year_month_code(date), "202503");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(format_date(parse_month("2025-07").unwrap()), "2025-07-01");
        assert_eq!(format_date(parse_month("2025-07-19").unwrap()), "2025-07-01");
        assert!(parse_month("2025-13").is_err());
    }
}
