use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::User;
use crate::error::RepoError;

/// Entity-shaped access to the `users` table. Each call is one SQL round trip;
/// `update` and `delete` do not report whether a row was affected.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts name and email, writing the generated id back into `user`.
    async fn create(&self, user: &mut User) -> Result<(), RepoError>;
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<User, RepoError>;
    async fn update(&self, user: &User) -> Result<(), RepoError>;
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &mut User) -> Result<(), RepoError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await?;
        user.id = id;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound(id))
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(r#"UPDATE users SET name = $1, email = $2 WHERE id = $3"#)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryUserRepository;
