//! 作业存储操作

use super::{Repository, read_error, write_error};
use crate::entity::assignments::Column;
use crate::entity::grades;
use crate::entity::prelude::{AssignmentActiveModel, Assignments, Grades};
use crate::errors::Result;
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentChanges, NewAssignment},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 创建作业
    pub async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = AssignmentActiveModel {
            class_id: Set(assignment.class_id),
            title: Set(assignment.title),
            description: Set(assignment.description),
            due_date: Set(assignment.due_date.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to create assignment"))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn find_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query assignment"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 按 ID 顺序列出作业，可按班级筛选
    pub async fn list_assignments(&self, class_id: Option<i64>) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();

        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        let assignments = select
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list assignments"))?;

        Ok(assignments
            .into_iter()
            .map(|m| m.into_assignment())
            .collect())
    }

    /// 部分更新作业
    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        changes: AssignmentChanges,
    ) -> Result<Assignment> {
        let mut model = AssignmentActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(class_id) = changes.class_id {
            model.class_id = Set(class_id);
        }

        if let Some(title) = changes.title {
            model.title = Set(title);
        }

        if let Some(description) = changes.description {
            model.description = Set(description);
        }

        if let Some(due_date) = changes.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        let result = model
            .update(self.conn)
            .await
            .map_err(write_error("Failed to update assignment"))?;

        Ok(result.into_assignment())
    }

    /// 删除作业
    pub async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete assignment"))?;

        Ok(result.rows_affected > 0)
    }

    /// 引用该作业的成绩数量
    pub async fn count_grades_for_assignment(&self, assignment_id: i64) -> Result<u64> {
        Grades::find()
            .filter(grades::Column::AssignmentId.eq(assignment_id))
            .count(self.conn)
            .await
            .map_err(read_error("Failed to count grades"))
    }
}
