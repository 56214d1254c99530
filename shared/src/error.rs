use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use strum::AsRefStr;

/// 予約が成立しない理由を表す機械可読な種別。
/// レスポンスには kebab-case のラベルとして載せる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ConflictKind {
    RoomBusy,
    EquipmentBusy,
    Maintenance,
    PastTime,
    InvalidRange,
    NothingSelected,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl ConflictKind {
    // 利用者向けのメッセージ。API レイヤーがそのまま返す
    pub fn message(&self) -> &'static str {
        match self {
            ConflictKind::RoomBusy => "指定の時間帯は会議室がすでに予約されています。",
            ConflictKind::EquipmentBusy => "指定の時間帯に予約済みの備品が含まれています。",
            ConflictKind::Maintenance => "指定の時間帯はメンテナンスのため利用できません。",
            ConflictKind::PastTime => "開始時刻は現在時刻より後を指定してください。",
            ConflictKind::InvalidRange => "終了時刻は開始時刻より後を指定してください。",
            ConflictKind::NothingSelected => "会議室または備品を少なくとも 1 つ選択してください。",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{field}: {detail}")]
    ValidationFailed { field: &'static str, detail: String },
    #[error("{0}")]
    ReservationConflict(ConflictKind),
    #[error("この予約はすでに処理されています（{from} から {to} への変更はできません）。")]
    InvalidTransition { from: String, to: String },
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("同時に行われた操作と競合しました。もう一度お試しください。")]
    TransactionConflict(#[source] sqlx::Error),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    NoRowsAffectedError(String),
    #[error(transparent)]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error(transparent)]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("ログインに失敗しました。")]
    UnauthenticatedError,
    #[error("この操作を行う権限がありません。")]
    ForbiddenOperation,
    #[error("{0}")]
    ExternalServiceError(String),
    #[error(transparent)]
    ConversionEntityError(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::UnprocessableEntity(_)
            | AppError::ReservationConflict(_)
            | AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailed { .. } | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::TransactionConflict(_) => StatusCode::CONFLICT,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ExternalServiceError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let mut body = json!({ "error": self.to_string() });
        match &self {
            // クライアントが分岐できるように種別ラベルを付ける
            AppError::ReservationConflict(kind) => {
                body["kind"] = json!(kind.as_ref());
            }
            // リトライで解決しうるエラーであることを伝える
            AppError::TransactionConflict(_) => {
                body["retryable"] = json!(true);
            }
            _ => {}
        }

        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
