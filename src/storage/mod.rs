use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::{Result, SchoolError};
use crate::models::users::{entities::User, requests::NewUser};

pub mod sea_orm_storage;

pub use sea_orm_storage::Repository;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 底层连接，服务层在其上开启事务
    fn connection(&self) -> &DatabaseConnection;

    /// 用户管理方法（会话与启动流程使用，无需事务）
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

/// 事务回调返回的 future
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'c>>;

/// 在单个事务中执行操作：返回 Ok 时提交，返回 Err 时回滚
pub async fn run_in_transaction<F, T>(storage: &dyn Storage, operation: F) -> Result<T>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T> + Send,
    T: Send,
{
    storage
        .connection()
        .transaction::<_, T, SchoolError>(operation)
        .await
        .map_err(SchoolError::from)
}
