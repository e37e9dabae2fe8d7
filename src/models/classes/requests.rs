use serde::Deserialize;

// 创建班级请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClassRequest {
    pub class_code: Option<String>,
}

// 更新班级请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassRequest {
    pub class_code: Option<String>,
}
