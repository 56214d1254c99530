use strum::{AsRefStr, EnumString};

// データベース側は users.role に 'Admin' / 'User' の文字列で保存する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
pub enum Role {
    Admin,
    #[default]
    User,
}
