use crate::database::{model::user::UserPasswordRow, ConnectionPool};
use crate::redis::RedisClient;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key = auth_key(access_token);
        let value = self.kv.get(&key).await?;
        value
            .map(|raw| {
                raw.parse::<i64>()
                    .map(UserId::new)
                    .map_err(|e| AppError::ConversionEntityError(e.into()))
            })
            .transpose()
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row = sqlx::query_as::<_, UserPasswordRow>(
            r#"
            SELECT user_id, hashed_password FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 存在しないメールアドレスでも同じエラーを返し、
        // アカウントの有無を外から判別できないようにする
        let Some(row) = row else {
            return Err(AppError::UnauthenticatedError);
        };

        let valid = bcrypt::verify(password, &row.hashed_password)?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }

        Ok(row.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = AccessToken(uuid::Uuid::new_v4().simple().to_string());
        self.kv
            .set_ex(
                &auth_key(&token),
                &event.user_id.raw().to_string(),
                self.ttl,
            )
            .await?;
        Ok(token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        self.kv.delete(&auth_key(&access_token)).await
    }
}

fn auth_key(token: &AccessToken) -> String {
    format!("auth:{}", token.0)
}
