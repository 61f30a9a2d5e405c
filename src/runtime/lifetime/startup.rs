use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

const DEFAULT_STAFF_EMAIL: &str = "admin@tutoria.local";

/// 首次启动时创建平台管理员账号
///
/// 邮箱与密码取自 `ADMIN_EMAIL` / `ADMIN_PASSWORD`，未设置密码时随机生成并打印一次。
async fn seed_staff(storage: &Arc<dyn Storage>) {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_STAFF_EMAIL.to_string());

    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            debug!("Staff account {} already exists, skipping seed", email);
            return;
        }
        Ok(None) => info!("Creating staff account {}", email),
        Err(e) => {
            warn!("Failed to look up staff account: {}, skipping seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated staff password: {}", generated);
        warn!("  Save this password or set ADMIN_PASSWORD");
        warn!("==========================================================");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash staff password: {}", e);
            return;
        }
    };

    let staff = NewUser {
        email: Some(email),
        phone_number: None,
        password_hash,
        first_name: "Platform".to_string(),
        last_name: "Admin".to_string(),
        is_institution: false,
        is_admission_seeker: false,
        is_active: true,
        is_staff: true,
    };
    match storage.create_user(staff).await {
        Ok(user) => info!("Staff account created (ID: {})", user.id),
        Err(e) => warn!("Failed to create staff account: {}", e),
    }
}

/// 准备服务器启动所需的存储与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 多个依赖都启用了 rustls，需显式选择加密后端
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache backends: {:?}",
            register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_staff(&storage).await;

    let cache = register::build_object_cache(&AppConfig::get().cache.cache_type).await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
