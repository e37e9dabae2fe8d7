use serde::Serialize;

/// 教师或学生与班级的关联（TeacherClass / StudentClass 的统一视图）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassLink {
    pub user_id: i64,
    pub class_id: i64,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

/// 分配结果：重复分配是无副作用的成功
#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    Created(ClassLink),
    AlreadyAssigned,
}

/// 班级成员类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Teacher,
    Student,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKind::Teacher => write!(f, "teacher"),
            MemberKind::Student => write!(f, "student"),
        }
    }
}
