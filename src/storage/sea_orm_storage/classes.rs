//! 班级存储操作

use super::{Repository, read_error, write_error};
use crate::entity::classes::Column;
use crate::entity::prelude::{
    Assignments, Attendance, ClassActiveModel, Classes, StudentClasses, TeacherClasses,
};
use crate::entity::{assignments, attendance, student_classes, teacher_classes};
use crate::errors::Result;
use crate::models::classes::entities::Class;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 创建班级
    pub async fn insert_class(&self, class_code: &str) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ClassActiveModel {
            class_code: Set(class_code.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to create class"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn find_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query class"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过班级代码获取班级
    pub async fn find_class_by_code(&self, class_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::ClassCode.eq(class_code))
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query class"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 按 ID 顺序列出班级
    pub async fn list_classes(&self) -> Result<Vec<Class>> {
        let classes = Classes::find()
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list classes"))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级代码
    pub async fn update_class_code(&self, class_id: i64, class_code: &str) -> Result<Class> {
        let model = ClassActiveModel {
            id: Set(class_id),
            class_code: Set(class_code.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(self.conn)
            .await
            .map_err(write_error("Failed to update class"))?;

        Ok(result.into_class())
    }

    /// 删除班级及其教师/学生关联
    pub async fn delete_class(&self, class_id: i64) -> Result<bool> {
        TeacherClasses::delete_many()
            .filter(teacher_classes::Column::ClassId.eq(class_id))
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete teacher links"))?;

        StudentClasses::delete_many()
            .filter(student_classes::Column::ClassId.eq(class_id))
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete student links"))?;

        let result = Classes::delete_by_id(class_id)
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete class"))?;

        Ok(result.rows_affected > 0)
    }

    /// 引用该班级的作业数量
    pub async fn count_assignments_in_class(&self, class_id: i64) -> Result<u64> {
        Assignments::find()
            .filter(assignments::Column::ClassId.eq(class_id))
            .count(self.conn)
            .await
            .map_err(read_error("Failed to count assignments"))
    }

    /// 引用该班级的考勤数量
    pub async fn count_attendance_in_class(&self, class_id: i64) -> Result<u64> {
        Attendance::find()
            .filter(attendance::Column::ClassId.eq(class_id))
            .count(self.conn)
            .await
            .map_err(read_error("Failed to count attendance"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::errors::SchoolError;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_class_round_trip() {
        let db = testing::memory_db().await;
        let repo = Repository::new(&db);

        let class = repo.insert_class("CS101").await.unwrap();
        let found = repo.find_class_by_id(class.id).await.unwrap().unwrap();
        assert_eq!(found.class_code, "CS101");

        let updated = repo.update_class_code(class.id, "CS102").await.unwrap();
        assert_eq!(updated.class_code, "CS102");
        assert!(repo.find_class_by_code("CS101").await.unwrap().is_none());
        assert!(repo.find_class_by_code("CS102").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_class_code() {
        let db = testing::memory_db().await;
        let repo = Repository::new(&db);
        repo.insert_class("MATH").await.unwrap();

        let err = repo.insert_class("MATH").await.unwrap_err();
        assert!(matches!(err, SchoolError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn test_delete_class_removes_links() {
        let db = testing::memory_db().await;
        let repo = Repository::new(&db);
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "BIO").await;
        testing::link_teacher(&db, teacher.id, class.id).await;
        testing::enroll_student(&db, student.id, class.id).await;

        assert!(repo.delete_class(class.id).await.unwrap());
        assert!(!repo.teacher_link_exists(teacher.id, class.id).await.unwrap());
        assert!(!repo.student_link_exists(student.id, class.id).await.unwrap());
        assert!(!repo.delete_class(class.id).await.unwrap());
    }
}
