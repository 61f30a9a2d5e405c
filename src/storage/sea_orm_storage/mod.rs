//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod curriculum;
mod enrollments;
mod exams;
mod fees;
mod homeworks;
mod institutions;
mod memberships;
mod notices;
mod payments;
mod quiz;
mod scholarships;
mod syllabus;
mod users;

#[cfg(test)]
mod tests;

use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Select, SqlErr,
};
use tracing::info;
use ts_rs::TS;

use crate::config::AppConfig;
use crate::errors::{Result, TutoriaError};
use crate::models::{PaginatedResponse, PaginationInfo, PaginationQuery};

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接保证所有查询落在同一个库上
    pub async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| TutoriaError::database_connection(format!("SQLite 连接失败: {e}")))?;
        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .map_err(db_error("启用外键约束失败"))?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| TutoriaError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TutoriaError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TutoriaError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TutoriaError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TutoriaError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 数据库错误转换，附带操作描述
pub(crate) fn db_error(action: &'static str) -> impl FnOnce(DbErr) -> TutoriaError {
    move |e| TutoriaError::database_operation(format!("{action}: {e}"))
}

/// 写入时的唯一约束冲突转为 409
pub(crate) fn write_error(
    action: &'static str,
    conflict: &'static str,
) -> impl FnOnce(DbErr) -> TutoriaError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => TutoriaError::conflict(conflict),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            TutoriaError::validation(format!("{action}: referenced record does not exist"))
        }
        _ => TutoriaError::database_operation(format!("{action}: {e}")),
    }
}

/// 分页查询并转换为业务模型
pub(crate) async fn fetch_page<E, T, F>(
    db: &DatabaseConnection,
    select: Select<E>,
    pagination: &PaginationQuery,
    convert: F,
) -> Result<PaginatedResponse<T>>
where
    E: EntityTrait,
    E::Model: Sync,
    T: TS + Send,
    F: Fn(E::Model) -> T + Send,
{
    let (page, size) = pagination.normalized();
    let paginator = select.paginate(db, size);
    let total = paginator
        .num_items()
        .await
        .map_err(db_error("查询总数失败"))?;
    let models = paginator
        .fetch_page(page - 1)
        .await
        .map_err(db_error("查询列表失败"))?;

    Ok(PaginatedResponse::new(
        models.into_iter().map(convert).collect(),
        PaginationInfo::new(page, size, total),
    ))
}
