use crate::database::{
    map_query_error,
    model::user::UserRow,
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{event::CreateUser, User},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<UserId> {
        let hashed_password = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (email, hashed_password, display_name, role)
            VALUES ($1, $2, $3, 'User')
            RETURNING user_id
            "#,
        )
        .bind(&event.email)
        .bind(&hashed_password)
        .bind(&event.display_name)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            // メールアドレスの一意制約違反
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                AppError::UnprocessableEntity(
                    "このメールアドレスはすでに登録されています。".into(),
                )
            }
            e => map_query_error(e),
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, display_name, email, role
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_calendar_token(&self, user_id: UserId) -> AppResult<Option<String>> {
        // 連携していないユーザーの列は NULL
        let token: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT google_access_token FROM users WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(token.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_find_user(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let user_id = repo
            .create(CreateUser {
                display_name: "山田太郎".into(),
                email: "taro@example.com".into(),
                password: "s3cret-passw0rd".into(),
            })
            .await?;

        let user = repo.find_current_user(user_id).await?.unwrap();
        assert_eq!(user.display_name, "山田太郎");
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());

        // カレンダー未連携なのでトークンは無い
        assert!(repo.find_calendar_token(user_id).await?.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn duplicated_email_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let event = || CreateUser {
            display_name: "山田太郎".into(),
            email: "taro@example.com".into(),
            password: "s3cret-passw0rd".into(),
        };
        repo.create(event()).await?;
        let res = repo.create(event()).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        Ok(())
    }
}
