use serde::{Deserialize, Serialize};

// エンティティの ID を i64 のまま引き回すと取り違えが起きやすいので、
// ID ごとにニュータイプを定義するマクロを用意する。
// データベース側の BIGSERIAL に対応する。
macro_rules! define_id {
    ($id_name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id_name(i64);

        impl $id_name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn raw(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $id_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $id_name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $id_name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(UserId);
define_id!(RoomId);
define_id!(EquipmentId);
define_id!(ReservationId);
define_id!(MaintenanceWindowId);
define_id!(AuditLogId);
define_id!(ReviewId);
