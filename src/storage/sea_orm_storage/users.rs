//! 用户存储操作

use super::{Repository, read_error, write_error};
use crate::entity::prelude::{UserActiveModel, Users};
use crate::entity::users::Column;
use crate::errors::Result;
use crate::models::users::{
    entities::{User, UserRole},
    requests::NewUser,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 创建用户
    pub async fn insert_user(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = UserActiveModel {
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            full_name: Set(user.full_name),
            role: Set(user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to create user"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 按 ID 顺序列出用户，可按角色筛选
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        let mut select = Users::find();

        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let users = select
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list users"))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 用户总数
    pub async fn count_users(&self) -> Result<u64> {
        Users::find()
            .count(self.conn)
            .await
            .map_err(read_error("Failed to count users"))
    }
}
