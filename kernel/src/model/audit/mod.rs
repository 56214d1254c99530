use crate::model::id::UserId;
use chrono::{DateTime, Utc};
use strum::AsRefStr;

// audit_logs.action に保存する値。追加はあっても変更はしないこと
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum AuditAction {
    Create,
    Approve,
    Reject,
    Cancel,
}

/// 追記専用の監査レコード。コアは INSERT のみを行い、
/// UPDATE / DELETE の経路は存在しない
#[derive(Debug)]
pub struct AuditLog {
    pub user_id: Option<UserId>,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub action: String,
    pub details: Option<String>,
    pub action_timestamp: DateTime<Utc>,
}
