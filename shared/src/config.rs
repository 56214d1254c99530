use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse()?,
        };
        let auth = AuthConfig {
            // アクセストークンの有効期限（秒）
            ttl: std::env::var("AUTH_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
        };
        let calendar = CalendarConfig {
            api_base: std::env::var("CALENDAR_API_BASE")
                .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".into()),
        };
        Ok(Self {
            database,
            redis,
            auth,
            calendar,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    pub ttl: u64,
}

pub struct CalendarConfig {
    pub api_base: String,
}
