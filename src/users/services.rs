use std::sync::Arc;

use super::repo::UserRepository;
use super::repo_types::User;
use crate::error::RepoError;

/// Usecase layer over the repository. Currently a straight pass-through.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user: &mut User) -> Result<(), RepoError> {
        self.repo.create(user).await
    }

    pub async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, RepoError> {
        self.repo.find_by_id(id).await
    }

    pub async fn update(&self, user: &User) -> Result<(), RepoError> {
        self.repo.update(user).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.repo.delete(id).await
    }
}
