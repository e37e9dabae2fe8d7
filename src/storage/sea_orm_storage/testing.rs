//! 测试辅助：迁移过的内存 SQLite 与种子数据

use std::str::FromStr;

use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};

use super::Repository;
use crate::models::classes::entities::Class;
use crate::models::users::{
    entities::{User, UserRole},
    requests::NewUser,
};

/// 单连接的内存数据库（多连接时每个连接各自一份内存库）
pub async fn memory_db() -> DatabaseConnection {
    let opt = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opt)
        .await
        .unwrap();
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 种子用户，密码哈希为占位值
pub async fn seed_user(db: &DatabaseConnection, username: &str, role: UserRole) -> User {
    Repository::new(db)
        .insert_user(NewUser {
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: format!("{username} full name"),
            role,
        })
        .await
        .unwrap()
}

pub async fn seed_class(db: &DatabaseConnection, class_code: &str) -> Class {
    Repository::new(db).insert_class(class_code).await.unwrap()
}

pub async fn link_teacher(db: &DatabaseConnection, teacher_id: i64, class_id: i64) {
    Repository::new(db)
        .insert_teacher_link(teacher_id, class_id)
        .await
        .unwrap();
}

pub async fn enroll_student(db: &DatabaseConnection, student_id: i64, class_id: i64) {
    Repository::new(db)
        .insert_student_link(student_id, class_id)
        .await
        .unwrap();
}
