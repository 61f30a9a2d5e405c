//! 验证码与消息投递
//!
//! 验证码和冷却标记存放在缓存中；手机号走短信网关，邮箱走邮件 HTTP 接口。
//! 日志只记录收件人，不记录消息正文。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{Result, TutoriaError};
use crate::utils::random_code::generate_otp;
use crate::utils::validate::{Identifier, format_sms_number};

pub fn otp_key(identifier: &str) -> String {
    format!("otp:{identifier}")
}

pub fn otp_cooldown_key(identifier: &str) -> String {
    format!("otp_cooldown:{identifier}")
}

pub fn invitation_cooldown_key(identifier: &str) -> String {
    format!("invitation_cooldown:{identifier}")
}

/// 冷却期内返回 429，否则写入冷却标记
pub async fn take_cooldown(cache: &Arc<dyn ObjectCache>, key: String, message: &str) -> Result<()> {
    if cache.contains(&key).await {
        warn!("Cooldown active for {}", key);
        return Err(TutoriaError::rate_limited(message));
    }
    cache
        .insert_raw(key, "1".to_string(), AppConfig::get().otp.cooldown_secs)
        .await;
    Ok(())
}

/// 验证码冷却，须在任何写操作之前调用
pub async fn take_otp_cooldown(cache: &Arc<dyn ObjectCache>, identifier: &Identifier) -> Result<()> {
    take_cooldown(
        cache,
        otp_cooldown_key(identifier.as_key()),
        "Please wait before requesting a new OTP.",
    )
    .await
}

/// 检查冷却后生成并发送验证码
pub async fn issue_otp(
    cache: &Arc<dyn ObjectCache>,
    identifier: &Identifier,
    purpose: &str,
) -> Result<()> {
    take_otp_cooldown(cache, identifier).await?;
    send_otp(cache, identifier, purpose).await
}

/// 生成、保存并发送验证码，调用方负责冷却
pub async fn send_otp(
    cache: &Arc<dyn ObjectCache>,
    identifier: &Identifier,
    purpose: &str,
) -> Result<()> {
    let config = &AppConfig::get().otp;
    let otp = generate_otp(config.length);
    cache
        .insert_raw(otp_key(identifier.as_key()), otp.clone(), config.expiry_secs)
        .await;
    info!("OTP stored for {}", identifier.as_key());

    let message = format!(
        "(Tutoria) Your OTP for {purpose} is {otp}. It expires in {} minutes. Do not share this OTP.",
        (config.expiry_secs / 60).max(1)
    );
    deliver(identifier, &format!("Tutoria {purpose}"), &message).await
}

/// 校验验证码，不删除
pub async fn check_otp(cache: &Arc<dyn ObjectCache>, identifier: &Identifier, otp: &str) -> bool {
    cache
        .get_raw(&otp_key(identifier.as_key()))
        .await
        .into_option()
        .is_some_and(|stored| stored == otp.trim())
}

pub async fn clear_otp(cache: &Arc<dyn ObjectCache>, identifier: &Identifier) {
    cache.remove(&otp_key(identifier.as_key())).await;
}

/// 同一标识的邀请冷却
pub async fn take_invitation_cooldown(
    cache: &Arc<dyn ObjectCache>,
    identifier: &Identifier,
) -> Result<()> {
    take_cooldown(
        cache,
        invitation_cooldown_key(identifier.as_key()),
        "Please wait before sending another invitation.",
    )
    .await
}

/// 发送邀请链接
pub async fn send_invitation(
    identifier: &Identifier,
    token: &str,
    role: &str,
    institution_name: &str,
) -> Result<()> {
    let config = AppConfig::get();
    let link = format!("{}?token={token}", config.invitation.accept_url);
    let message = format!(
        "(Tutoria) You are invited to join {institution_name} as a {role}. Accept here: {link}. Expires in {} days.",
        config.invitation.expiry_days
    );
    deliver(identifier, "Tutoria invitation", &message).await
}

async fn deliver(identifier: &Identifier, subject: &str, message: &str) -> Result<()> {
    match identifier {
        Identifier::Email(email) => send_email(email, subject, message).await,
        Identifier::Phone(phone) => send_sms(phone, message).await,
    }
}

fn channel_disabled(channel: &str, recipient: &str) -> TutoriaError {
    warn!("{} channel disabled, message to {} not sent", channel, recipient);
    TutoriaError::service_unavailable(format!("{channel} delivery is not configured"))
}

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub async fn send_email(email: &str, subject: &str, message: &str) -> Result<()> {
    let config = &AppConfig::get().email;
    if !config.enabled || config.api_url.is_empty() {
        return Err(channel_disabled("Email", email));
    }

    let payload = EmailPayload {
        from: &config.from_address,
        to: email,
        subject,
        text: message,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let response = client
        .post(&config.api_url)
        .bearer_auth(&config.api_key)
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        error!("Email sending failed for {}: HTTP {}", email, response.status());
        return Err(TutoriaError::external_service(format!(
            "Email sending failed: HTTP {}",
            response.status().as_u16()
        )));
    }

    info!("Email sent successfully to {}", email);
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SmsPayload<'a> {
    user_name: &'a str,
    #[serde(rename = "Apikey")]
    api_key: &'a str,
    mobile_number: String,
    campaign_id: &'a str,
    sender_name: &'a str,
    transaction_type: &'a str,
    message: &'a str,
}

pub async fn send_sms(phone: &str, message: &str) -> Result<()> {
    let config = &AppConfig::get().sms;
    let number = format_sms_number(phone).map_err(TutoriaError::validation)?;

    if !config.enabled {
        return Err(channel_disabled("SMS", &number));
    }

    let payload = SmsPayload {
        user_name: &config.username,
        api_key: &config.api_key,
        mobile_number: number.clone(),
        campaign_id: "null",
        sender_name: &config.sender_id,
        transaction_type: "T",
        message,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let response: serde_json::Value = client
        .post(&config.api_url)
        .json(&payload)
        .send()
        .await?
        .json()
        .await?;

    if response.get("status").and_then(|s| s.as_str()) == Some("Failed") {
        let reason = response
            .get("responseResult")
            .map(|r| r.to_string())
            .unwrap_or_default();
        error!("SMS sending failed for {}: {}", number, reason);
        return Err(TutoriaError::external_service(format!(
            "SMS sending failed: {reason}"
        )));
    }

    info!("SMS sent successfully to {}", number);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    fn cache() -> Arc<dyn ObjectCache> {
        Arc::new(MokaCacheWrapper::with_capacity(100, 60))
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(otp_key("01712345678"), "otp:01712345678");
        assert_eq!(otp_cooldown_key("a@b.com"), "otp_cooldown:a@b.com");
        assert_eq!(invitation_cooldown_key("x"), "invitation_cooldown:x");
    }

    #[tokio::test]
    async fn test_cooldown_blocks_second_request() {
        let cache = cache();
        assert!(take_cooldown(&cache, "cd:1".into(), "wait").await.is_ok());
        let err = take_cooldown(&cache, "cd:1".into(), "wait")
            .await
            .unwrap_err();
        assert!(matches!(err, TutoriaError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_disabled_email_channel_is_an_error() {
        let id = Identifier::parse("student@example.com");
        let err = deliver(&id, "Tutoria registration", "Your OTP is 918273")
            .await
            .unwrap_err();
        assert!(matches!(err, TutoriaError::ServiceUnavailable(_)));
        assert!(!err.message().contains("918273"));
    }

    #[tokio::test]
    async fn test_disabled_sms_channel_is_an_error() {
        let err = send_sms("01712345678", "Your OTP is 918273")
            .await
            .unwrap_err();
        assert!(matches!(err, TutoriaError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_issue_otp_respects_cooldown_before_storing() {
        let cache = cache();
        let id = Identifier::parse("01812345678");
        take_otp_cooldown(&cache, &id).await.unwrap();

        let err = issue_otp(&cache, &id, "registration").await.unwrap_err();
        assert!(matches!(err, TutoriaError::RateLimited(_)));
        assert!(!cache.contains(&otp_key(id.as_key())).await);
    }

    #[tokio::test]
    async fn test_check_and_clear_otp() {
        let cache = cache();
        let id = Identifier::parse("Student@Example.com");
        cache
            .insert_raw(otp_key(id.as_key()), "123456".into(), 60)
            .await;

        assert!(check_otp(&cache, &id, " 123456").await);
        assert!(!check_otp(&cache, &id, "654321").await);
        clear_otp(&cache, &id).await;
        assert!(!check_otp(&cache, &id, "123456").await);
    }
}
