//! 教师/学生与班级关联的存储操作

use std::collections::HashMap;

use super::{Repository, read_error, write_error};
use crate::entity::prelude::{
    StudentClassActiveModel, StudentClasses, TeacherClassActiveModel, TeacherClasses,
};
use crate::entity::{student_classes, teacher_classes};
use crate::errors::Result;
use crate::models::class_members::{
    entities::ClassLink,
    responses::{ClassWithTeachers, StudentWithClasses},
};
use crate::models::users::entities::{UserRole, UserSummary};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 教师是否已分配到班级
    pub async fn teacher_link_exists(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        let count = TeacherClasses::find()
            .filter(teacher_classes::Column::TeacherId.eq(teacher_id))
            .filter(teacher_classes::Column::ClassId.eq(class_id))
            .count(self.conn)
            .await
            .map_err(read_error("Failed to query teacher link"))?;

        Ok(count > 0)
    }

    /// 学生是否已加入班级
    pub async fn student_link_exists(&self, student_id: i64, class_id: i64) -> Result<bool> {
        let count = StudentClasses::find()
            .filter(student_classes::Column::StudentId.eq(student_id))
            .filter(student_classes::Column::ClassId.eq(class_id))
            .count(self.conn)
            .await
            .map_err(read_error("Failed to query student link"))?;

        Ok(count > 0)
    }

    /// 创建教师-班级关联
    pub async fn insert_teacher_link(&self, teacher_id: i64, class_id: i64) -> Result<ClassLink> {
        let model = TeacherClassActiveModel {
            teacher_id: Set(teacher_id),
            class_id: Set(class_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to assign teacher"))?;

        Ok(result.into_link())
    }

    /// 创建学生-班级关联
    pub async fn insert_student_link(&self, student_id: i64, class_id: i64) -> Result<ClassLink> {
        let model = StudentClassActiveModel {
            student_id: Set(student_id),
            class_id: Set(class_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to assign student"))?;

        Ok(result.into_link())
    }

    /// 每个班级及其教师，按班级 ID 排序
    pub async fn classes_with_teachers(&self) -> Result<Vec<ClassWithTeachers>> {
        let classes = self.list_classes().await?;
        let teachers: HashMap<i64, UserSummary> = self
            .list_users(Some(UserRole::Teacher))
            .await?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let links = TeacherClasses::find()
            .order_by_asc(teacher_classes::Column::TeacherId)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list teacher links"))?;

        let mut by_class: HashMap<i64, Vec<UserSummary>> = HashMap::new();
        for link in links {
            if let Some(teacher) = teachers.get(&link.teacher_id) {
                by_class
                    .entry(link.class_id)
                    .or_default()
                    .push(teacher.clone());
            }
        }

        Ok(classes
            .into_iter()
            .map(|class| ClassWithTeachers {
                teachers: by_class.remove(&class.id).unwrap_or_default(),
                id: class.id,
                class_code: class.class_code,
            })
            .collect())
    }

    /// 每个学生及其所在班级，按学生 ID 排序
    pub async fn students_with_classes(&self) -> Result<Vec<StudentWithClasses>> {
        let students = self.list_users(Some(UserRole::Student)).await?;
        let classes: HashMap<i64, _> = self
            .list_classes()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let links = StudentClasses::find()
            .order_by_asc(student_classes::Column::ClassId)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list student links"))?;

        let mut by_student: HashMap<i64, Vec<_>> = HashMap::new();
        for link in links {
            if let Some(class) = classes.get(&link.class_id) {
                by_student
                    .entry(link.student_id)
                    .or_default()
                    .push(class.clone());
            }
        }

        Ok(students
            .into_iter()
            .map(|student| StudentWithClasses {
                classes: by_student.remove(&student.id).unwrap_or_default(),
                id: student.id,
                username: student.username,
                full_name: student.full_name,
            })
            .collect())
    }
}
