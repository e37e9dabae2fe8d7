use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
