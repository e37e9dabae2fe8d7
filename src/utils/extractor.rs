//! 路径参数提取器
//!
//! 非数字的 `{id}` 直接返回 400，而不是 actix 默认的 404。

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::errors::SchoolError;

/// 安全的 i64 路径 ID（`{id}`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIdI64(pub i64);

impl FromRequest for SafeIdI64 {
    type Error = SchoolError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("id") {
            Some(raw) => raw
                .parse::<i64>()
                .map(SafeIdI64)
                .map_err(|_| SchoolError::validation(format!("Invalid id: '{raw}'"))),
            None => Err(SchoolError::validation("Missing id")),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let (req, mut payload) = TestRequest::default()
            .param("id", "42")
            .to_http_parts();
        let id = SafeIdI64::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(id, SafeIdI64(42));
    }

    #[actix_web::test]
    async fn test_non_numeric_id() {
        let (req, mut payload) = TestRequest::default()
            .param("id", "abc")
            .to_http_parts();
        let err = SafeIdI64::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
    }
}
