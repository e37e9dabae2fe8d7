//! 考勤存储操作

use super::{Repository, read_error, write_error};
use crate::entity::attendance::Column;
use crate::entity::prelude::{Attendance, AttendanceActiveModel};
use crate::errors::Result;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{AttendanceFilter, NewAttendance},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl<C: ConnectionTrait> Repository<'_, C> {
    /// 记录考勤
    pub async fn insert_attendance(&self, record: NewAttendance) -> Result<AttendanceRecord> {
        let model = AttendanceActiveModel {
            class_id: Set(record.class_id),
            student_id: Set(record.student_id),
            date: Set(record.date.format(DATE_FORMAT).to_string()),
            status: Set(record.status.to_string()),
            recorded_by: Set(record.recorded_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(self.conn)
            .await
            .map_err(write_error("Failed to record attendance"))?;

        Ok(result.into_attendance())
    }

    /// 通过 ID 获取考勤
    pub async fn find_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query attendance"))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    /// 通过 (班级, 学生, 日期) 获取考勤
    pub async fn find_attendance_by_key(
        &self,
        class_id: i64,
        student_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.eq(date.format(DATE_FORMAT).to_string()))
            .one(self.conn)
            .await
            .map_err(read_error("Failed to query attendance"))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    /// 按 ID 顺序列出考勤
    pub async fn list_attendance(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find();

        if let Some(class_id) = filter.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(date) = filter.date {
            select = select.filter(Column::Date.eq(date.format(DATE_FORMAT).to_string()));
        }

        let records = select
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await
            .map_err(read_error("Failed to list attendance"))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 覆盖考勤记录（调用方已合并部分更新）
    pub async fn update_attendance(
        &self,
        id: i64,
        record: NewAttendance,
    ) -> Result<AttendanceRecord> {
        let model = AttendanceActiveModel {
            id: Set(id),
            class_id: Set(record.class_id),
            student_id: Set(record.student_id),
            date: Set(record.date.format(DATE_FORMAT).to_string()),
            status: Set(record.status.to_string()),
            recorded_by: Set(record.recorded_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .update(self.conn)
            .await
            .map_err(write_error("Failed to update attendance"))?;

        Ok(result.into_attendance())
    }

    /// 删除考勤
    pub async fn delete_attendance(&self, id: i64) -> Result<bool> {
        let result = Attendance::delete_by_id(id)
            .exec(self.conn)
            .await
            .map_err(write_error("Failed to delete attendance"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::errors::SchoolError;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_attendance_unique_per_day() {
        let db = testing::memory_db().await;
        let repo = Repository::new(&db);
        let admin = testing::seed_user(&db, "admin", UserRole::Admin).await;
        let student = testing::seed_user(&db, "s", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let day = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let record = NewAttendance {
            class_id: class.id,
            student_id: student.id,
            date: day,
            status: AttendanceStatus::Present,
            recorded_by: admin.id,
        };
        let created = repo.insert_attendance(record.clone()).await.unwrap();
        assert_eq!(created.date, day);
        assert_eq!(created.status, AttendanceStatus::Present);

        let err = repo.insert_attendance(record).await.unwrap_err();
        assert!(matches!(err, SchoolError::DuplicateIdentity(_)));

        let by_key = repo
            .find_attendance_by_key(class.id, student.id, day)
            .await
            .unwrap();
        assert_eq!(by_key.map(|r| r.id), Some(created.id));

        let filtered = repo
            .list_attendance(AttendanceFilter {
                date: Some(day.succ_opt().unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(filtered.is_empty());
        assert_eq!(repo.count_attendance_in_class(class.id).await.unwrap(), 1);
    }
}
