pub mod event;

/// Redis に保存するアクセストークン。中身は不透明な文字列
pub struct AccessToken(pub String);
