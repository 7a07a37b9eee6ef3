use async_trait::async_trait;
use susu_db::DbConnTrait;

use crate::domain::error::DomainError;

/// Many-to-many links between users and businesses.
#[async_trait]
pub trait MembershipsRepository: Send + Sync {
    async fn is_linked<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, DomainError>;

    /// Insert the link if absent. Returns `false` when it already existed.
    async fn link<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, DomainError>;

    /// Remove one link, or every link of the user when `business_id` is `None`.
    /// Returns the number of rows removed.
    async fn unlink<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: Option<i32>,
    ) -> Result<u64, DomainError>;

    /// Ascending.
    async fn list_business_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<i32>, DomainError>;

    /// Ascending.
    async fn list_user_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
    ) -> Result<Vec<i32>, DomainError>;
}
