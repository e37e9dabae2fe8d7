use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SchoolError};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@-]+$").expect("Invalid username regex"));

static CLASS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid class code regex"));

pub const USERNAME_MAX_LEN: usize = 50;
pub const FULL_NAME_MAX_LEN: usize = 100;
pub const CLASS_CODE_MAX_LEN: usize = 10;
pub const TITLE_MAX_LEN: usize = 100;
pub const PASSWORD_MAX_LEN: usize = 128;

pub fn validate_username(username: &str) -> std::result::Result<(), &'static str> {
    // 用户名长度校验：1 <= x <= 50
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err("Username length must be between 1 and 50 characters");
    }
    // 用户名格式校验：字母、数字、下划线、点、@ 或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, '_', '.', '@' or '-'");
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> std::result::Result<(), &'static str> {
    if full_name.chars().count() > FULL_NAME_MAX_LEN {
        return Err("Full name must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> std::result::Result<(), &'static str> {
    if password.chars().count() > PASSWORD_MAX_LEN {
        return Err("Password must be at most 128 characters");
    }
    Ok(())
}

pub fn validate_class_code(class_code: &str) -> std::result::Result<(), &'static str> {
    if class_code.is_empty() || class_code.chars().count() > CLASS_CODE_MAX_LEN {
        return Err("Class code length must be between 1 and 10 characters");
    }
    if !CLASS_CODE_RE.is_match(class_code) {
        return Err("Class code must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_title(title: &str) -> std::result::Result<(), &'static str> {
    if title.chars().count() > TITLE_MAX_LEN {
        return Err("Title must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_score(score: f64) -> std::result::Result<(), &'static str> {
    if !score.is_finite() || score < 0.0 {
        return Err("Score must be a finite number greater than or equal to 0");
    }
    Ok(())
}

/// 必填文本字段：缺失或去除空白后为空都视为缺失
pub fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SchoolError::validation(format!("{field} is required"))),
    }
}

/// 必填字段
pub fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| SchoolError::validation(format!("{field} is required")))
}

/// 将 `&'static str` 校验结果转换为 Validation 错误
pub fn check(result: std::result::Result<(), &'static str>) -> Result<()> {
    result.map_err(SchoolError::validation)
}

/// 解析截止时间：RFC3339、`%Y-%m-%d %H:%M:%S`（UTC）或 `%Y-%m-%d`（UTC 零点）
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }

    Err(SchoolError::validation(format!(
        "Invalid due_date '{value}': expected RFC3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'"
    )))
}

/// 解析考勤日期 `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SchoolError::validation(format!("Invalid date '{value}': expected 'YYYY-MM-DD'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_username() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("j.doe@school").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_class_code() {
        assert!(validate_class_code("CS101").is_ok());
        assert!(validate_class_code("MATH-2_A").is_ok());
        assert!(validate_class_code("").is_err());
        assert!(validate_class_code("TOOLONGCODE").is_err());
        assert!(validate_class_code("CS 101").is_err());
        // 按字符计长：六个非 ASCII 字符由字符集规则拒绝，而非长度规则
        assert_eq!(
            validate_class_code("ÄÖÜäöü"),
            Err("Class code must contain only letters, numbers, underscores or hyphens")
        );
    }

    #[test]
    fn test_score() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(99.5).is_ok());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(f64::NAN).is_err());
        assert!(validate_score(f64::INFINITY).is_err());
    }

    #[test]
    fn test_required_text() {
        assert_eq!(
            required_text("title", Some("  Essay ".into())).unwrap(),
            "Essay"
        );
        assert_eq!(
            required_text("title", Some("   ".into())).unwrap_err(),
            SchoolError::validation("title is required")
        );
        assert!(required_text("title", None).is_err());
        assert_eq!(required("class_id", Some(3)).unwrap(), 3);
        assert!(required::<i64>("class_id", None).is_err());
    }

    #[test]
    fn test_parse_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 20, 8, 30, 0).unwrap();
        assert_eq!(parse_due_date("2026-05-20T08:30:00Z").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-20T10:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-20 08:30:00").unwrap(), expected);
        assert_eq!(
            parse_due_date("2026-05-20").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 20, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_due_date("next friday"),
            Err(SchoolError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("01/09/2026").is_err());
    }
}
