use rand::Rng;

const DIGITS: &[u8] = b"0123456789";
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

fn random_from(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

/// 生成数字验证码
pub fn generate_otp(length: usize) -> String {
    random_from(DIGITS, length)
}

/// 生成随机密码
pub fn generate_random_password(length: usize) -> String {
    random_from(PASSWORD_CHARSET, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_numeric() {
        let otp = generate_otp(6);
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).len(), 16);
    }
}
