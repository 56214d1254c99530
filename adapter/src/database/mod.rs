use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{postgres::PgConnectOptions, PgPool};

pub mod model;

fn make_pg_connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
}

#[derive(Clone)]
pub struct ConnectionPool(PgPool);

impl ConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &PgPool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    ConnectionPool(PgPool::connect_lazy_with(make_pg_connect_options(cfg)))
}

// SERIALIZABLE 下ではシリアライズ失敗（40001）やデッドロック（40P01）が
// 起きうる。これらは呼び出し側がリトライ可能なエラーとして返す
fn is_serialization_failure(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db)
            if matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
    )
}

// 外部キー違反（23503）。参照先が先に消えていたケースなので
// 呼び出し側には NotFound として返す
fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23503")
    )
}

pub(crate) fn map_query_error(e: sqlx::Error) -> AppError {
    if is_serialization_failure(&e) {
        AppError::TransactionConflict(e)
    } else if is_foreign_key_violation(&e) {
        AppError::EntityNotFound("参照先のデータが見つかりませんでした。".into())
    } else {
        AppError::SpecificOperationError(e)
    }
}

pub(crate) fn map_commit_error(e: sqlx::Error) -> AppError {
    if is_serialization_failure(&e) {
        AppError::TransactionConflict(e)
    } else {
        AppError::TransactionError(e)
    }
}
