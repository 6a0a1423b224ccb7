//! User Service
//!
//! Handles the current-user surface: profile and house membership.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{House, HouseRepository, User, UserRepository};

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError>;

    /// Get the houses a user is assigned to, home house first
    async fn get_user_houses(&self, user_id: i64) -> Result<Vec<HousePreviewDto>, UserError>;
}

/// User data transfer object
#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// House preview for a user's house list
#[derive(Debug, Clone)]
pub struct HousePreviewDto {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub home: bool,
}

impl HousePreviewDto {
    pub fn from_house(house: House, home: bool) -> Self {
        Self {
            id: house.id.to_string(),
            name: house.name,
            address: house.address,
            home,
        }
    }
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// UserService implementation
pub struct UserServiceImpl<U, H>
where
    U: UserRepository,
    H: HouseRepository,
{
    user_repo: Arc<U>,
    house_repo: Arc<H>,
}

impl<U, H> UserServiceImpl<U, H>
where
    U: UserRepository,
    H: HouseRepository,
{
    pub fn new(user_repo: Arc<U>, house_repo: Arc<H>) -> Self {
        Self {
            user_repo,
            house_repo,
        }
    }
}

#[async_trait]
impl<U, H> UserService for UserServiceImpl<U, H>
where
    U: UserRepository + 'static,
    H: HouseRepository + 'static,
{
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        Ok(UserDto::from(user))
    }

    async fn get_user_houses(&self, user_id: i64) -> Result<Vec<HousePreviewDto>, UserError> {
        let houses = self
            .house_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        // Houses arrive earliest move-in first, so the first one is home
        Ok(houses
            .into_iter()
            .enumerate()
            .map(|(i, h)| HousePreviewDto::from_house(h, i == 0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::AppError;

    mockall::mock! {
        UserRepo {}

        #[async_trait]
        impl UserRepository for UserRepo {
            async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
            async fn create(&self, user: &User) -> Result<User, AppError>;
            async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
        }
    }

    mockall::mock! {
        HouseRepo {}

        #[async_trait]
        impl HouseRepository for HouseRepo {
            async fn find_by_id(&self, id: i64) -> Result<Option<House>, AppError>;
            async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<House>, AppError>;
        }
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut user_repo = MockUserRepo::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let svc = UserServiceImpl::new(Arc::new(user_repo), Arc::new(MockHouseRepo::new()));
        let result = svc.get_user(1).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_user_houses_marks_first_as_home() {
        let mut house_repo = MockHouseRepo::new();
        house_repo.expect_find_by_user_id().returning(|_| {
            Ok(vec![
                House {
                    id: 10,
                    name: "Sunset Terrace".to_string(),
                    ..Default::default()
                },
                House {
                    id: 20,
                    name: "Maple Court".to_string(),
                    ..Default::default()
                },
            ])
        });

        let svc = UserServiceImpl::new(Arc::new(MockUserRepo::new()), Arc::new(house_repo));
        let houses = svc.get_user_houses(1).await.unwrap();

        assert_eq!(houses.len(), 2);
        assert!(houses[0].home);
        assert!(!houses[1].home);
        assert_eq!(houses[0].id, "10");
    }
}
