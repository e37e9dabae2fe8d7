//! 成绩存储操作

use super::{Repository, read_error, write_error};
use crate::entity::grades::Column;
use crate::entity::prelude::{GradeActiveModel, Grades};
use crate::errors::Result;
use crate::models::grades::{entities::Grade, requests::GradeFilter};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 录入成绩
    pub async fn insert_grade(
        &self,
        assignment_id: i64,
        student_id: i64,
        score: f64,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = GradeActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            score: Set(score),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to create grade"))?;

        Ok(result.into_grade())
    }

    /// 通过 ID 获取成绩
    pub async fn find_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query grade"))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过 (作业, 学生) 获取成绩
    pub async fn find_grade_by_key(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query grade"))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 按 ID 顺序列出成绩
    pub async fn list_grades(&self, filter: GradeFilter) -> Result<Vec<Grade>> {
        let mut select = Grades::find();

        if let Some(assignment_id) = filter.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let grades = select
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list grades"))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 更新分数
    pub async fn update_grade_score(&self, grade_id: i64, score: f64) -> Result<Grade> {
        let model = GradeActiveModel {
            id: Set(grade_id),
            score: Set(score),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(self.conn)
            .await
            .map_err(write_error("Failed to update grade"))?;

        Ok(result.into_grade())
    }

    /// 删除成绩
    pub async fn delete_grade(&self, grade_id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(grade_id)
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete grade"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_grade_crud() {
        let db = testing::memory_db().await;
        let repo = Repository::new(&db);
        let student = testing::seed_user(&db, "s", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let assignment = repo
            .insert_assignment(NewAssignment {
                class_id: class.id,
                title: "Quiz".into(),
                description: None,
                due_date: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let grade = repo
            .insert_grade(assignment.id, student.id, 87.5)
            .await
            .unwrap();
        assert!(repo.insert_grade(assignment.id, student.id, 90.0).await.is_err());

        let updated = repo.update_grade_score(grade.id, 92.0).await.unwrap();
        assert_eq!(updated.score, 92.0);
        assert_eq!(
            repo.count_grades_for_assignment(assignment.id).await.unwrap(),
            1
        );
        assert_eq!(
            repo.find_grade_by_key(assignment.id, student.id)
                .await
                .unwrap()
                .map(|g| g.id),
            Some(grade.id)
        );

        let by_student = repo
            .list_grades(GradeFilter {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_student.len(), 1);

        assert!(repo.delete_grade(grade.id).await.unwrap());
        assert!(repo.find_grade_by_id(grade.id).await.unwrap().is_none());
    }
}
