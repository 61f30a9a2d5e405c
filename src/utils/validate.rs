use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 孟加拉国手机号：01XXXXXXXXX / 88XXXXXXXXXX / 880XXXXXXXXXX
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0\d{10}|88\d{10}|880\d{10})$").expect("Invalid phone number regex")
});

static SMS_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^880\d{10}$").expect("Invalid sms number regex"));

/// 登录 / 验证码使用的用户标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    /// 根据是否包含 `@` 区分邮箱与手机号，手机号会做规范化
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains('@') {
            Identifier::Email(raw.to_lowercase())
        } else {
            Identifier::Phone(normalize_phone_number(raw))
        }
    }

    /// 用于缓存键的规范形式
    pub fn as_key(&self) -> &str {
        match self {
            Identifier::Email(v) | Identifier::Phone(v) => v,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Identifier::Email(_))
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number must be in the format 01XXXXXXXXX, 88XXXXXXXXXX or 880XXXXXXXXXX");
    }
    Ok(())
}

/// `+880` 开头的号码转为本地 `0` 开头格式
pub fn normalize_phone_number(phone: &str) -> String {
    let phone = phone.trim().replace(' ', "");
    match phone.strip_prefix("+880") {
        Some(rest) => format!("0{rest}"),
        None => phone,
    }
}

/// 转换为短信网关要求的 13 位 `880` 开头格式
pub fn format_sms_number(phone: &str) -> Result<String, &'static str> {
    let phone = phone.trim().replace(['+', ' '], "");
    let core = if let Some(rest) = phone.strip_prefix("880") {
        rest
    } else if let Some(rest) = phone.strip_prefix("88") {
        rest
    } else if let Some(rest) = phone.strip_prefix('0') {
        rest
    } else {
        phone.as_str()
    };
    let formatted = format!("880{core}");
    if !SMS_NUMBER_RE.is_match(&formatted) {
        return Err("Phone number must be 13 digits starting with '880'");
    }
    Ok(formatted)
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 至少 8 个字符，包含字母和数字，且不是常见弱密码。
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "12345678a",
        "qwerty123",
        "admin123",
        "abcd1234",
        "tutoria123",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_formats() {
        assert!(validate_phone_number("01711111111").is_ok());
        assert!(validate_phone_number("881711111111").is_ok());
        assert!(validate_phone_number("8801711111111").is_ok());
        assert!(validate_phone_number("1711111111").is_err());
        assert!(validate_phone_number("0171111111").is_err());
        assert!(validate_phone_number("+8801711111111").is_err());
    }

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+8801711111111"), "01711111111");
        assert_eq!(normalize_phone_number("01711111111"), "01711111111");
    }

    #[test]
    fn test_format_sms_number() {
        assert_eq!(format_sms_number("01886134904").unwrap(), "8801886134904");
        assert_eq!(format_sms_number("+8801886134904").unwrap(), "8801886134904");
        assert_eq!(format_sms_number("881886134904").unwrap(), "8801886134904");
        assert!(format_sms_number("12345").is_err());
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(
            Identifier::parse(" Teacher@School.com "),
            Identifier::Email("teacher@school.com".to_string())
        );
        assert_eq!(
            Identifier::parse("+8801711111111"),
            Identifier::Phone("01711111111".to_string())
        );
    }

    #[test]
    fn test_email() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("student@example").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("dhaka2024").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
