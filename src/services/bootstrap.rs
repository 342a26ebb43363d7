//! 시작 시 관리자 계정 보장
//!
//! `ADMIN_EMAIL`/`ADMIN_PASSWORD`가 설정되어 있으면 해당 사용자가
//! `admin` 역할로 존재하도록 만듭니다. 이미 있는 계정은 비밀번호를
//! 건드리지 않고 역할만 올립니다.

use sqlx::SqlitePool;

use crate::{
    db::users as db_users,
    error::AppError,
    models::{Role, User},
    services::hash_password,
};

pub async fn ensure_admin(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AppError> {
    if let Some(mut user) = db_users::find_by_email(pool, email).await? {
        if user.role != Role::Admin {
            db_users::set_role(pool, &user.id, Role::Admin).await?;
            user.role = Role::Admin;
            tracing::info!("Promoted {} to admin", user.email);
        }
        return Ok(user);
    }

    let password_hash = hash_password(password)?;
    let id = uuid::Uuid::now_v7().to_string();
    let user =
        db_users::create_user(pool, &id, "Admin", "User", email, &password_hash, Role::Admin).await?;

    tracing::info!("Created admin account {}", user.email);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::memory_pool;
    use crate::services::verify_password;

    #[tokio::test]
    async fn creates_missing_admin() {
        let pool = memory_pool().await;
        let user = ensure_admin(&pool, "root@example.com", "hunter22").await.unwrap();

        assert_eq!(user.role, Role::Admin);
        assert!(verify_password("hunter22", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn promotes_existing_user_and_keeps_password() {
        let pool = memory_pool().await;
        let hash = hash_password("original").unwrap();
        db_users::create_user(&pool, "u1", "Ada", "L", "ada@example.com", &hash, Role::User)
            .await
            .unwrap();

        let user = ensure_admin(&pool, "ADA@example.com", "ignored").await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Admin);

        let stored = db_users::find_by_id(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert!(verify_password("original", &stored.password_hash).unwrap());
    }
}
