pub mod assignments;

pub mod attendance;

pub mod auth;

pub mod class_members;

pub mod classes;

pub mod grades;

pub mod health;

pub mod users;

pub use assignments::configure_assignments_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use class_members::configure_class_members_routes;
pub use classes::configure_classes_routes;
pub use grades::configure_grades_routes;
pub use health::configure_health_routes;
pub use users::configure_user_routes;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::NewUser};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, testing};
    use crate::storage::{Repository, Storage};
    use crate::utils::password::hash_password;
    use crate::utils::{json_error_handler, query_error_handler};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn configure_api(cfg: &mut web::ServiceConfig) {
        configure_health_routes(cfg);
        configure_auth_routes(cfg);
        configure_user_routes(cfg);
        configure_classes_routes(cfg);
        configure_class_members_routes(cfg);
        configure_assignments_routes(cfg);
        configure_attendance_routes(cfg);
        configure_grades_routes(cfg);
    }

    async fn storage_with_admin() -> Arc<dyn Storage> {
        let db = testing::memory_db().await;
        Repository::new(&db)
            .insert_user(NewUser {
                username: "admin".into(),
                password_hash: hash_password("secret").unwrap(),
                full_name: "Administrator".into(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        Arc::new(SeaOrmStorage::from_connection(db))
    }

    macro_rules! init_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::Data::new($storage))
                    .configure(configure_api),
            )
            .await
        };
    }

    macro_rules! login {
        ($app:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({"username": "admin", "password": "secret"}))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let cookie = resp
                .response()
                .cookies()
                .find(|c| c.name() == "session")
                .expect("session cookie");
            Cookie::new("session", cookie.value().to_string())
        }};
    }

    #[actix_web::test]
    async fn test_health_without_session() {
        let app = init_app!(storage_with_admin().await);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[actix_web::test]
    async fn test_protected_routes_require_session() {
        let app = init_app!(storage_with_admin().await);

        for uri in ["/api/profile", "/api/classes", "/api/get_users", "/api/grades"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }

        let req = test::TestRequest::get()
            .uri("/api/classes")
            .cookie(Cookie::new("session", "garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_login_failure_is_unauthorized() {
        let app = init_app!(storage_with_admin().await);

        for (username, password) in [("admin", "wrong"), ("nobody", "secret")] {
            let req = test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({"username": username, "password": password}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Username or password is incorrect");
        }
    }

    #[actix_web::test]
    async fn test_login_then_profile_and_logout() {
        let app = init_app!(storage_with_admin().await);
        let session = login!(app);

        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(session.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"username": "admin", "role": "admin"}));

        let req = test::TestRequest::post()
            .uri("/api/logout")
            .cookie(session)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("cleared cookie");
        assert_eq!(cleared.value(), "");
    }

    #[actix_web::test]
    async fn test_bad_requests_return_400() {
        let app = init_app!(storage_with_admin().await);
        let session = login!(app);

        let req = test::TestRequest::get()
            .uri("/api/classes/abc")
            .cookie(session.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .cookie(session)
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_class_round_trip_over_http() {
        let app = init_app!(storage_with_admin().await);
        let session = login!(app);

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .cookie(session.clone())
            .set_json(json!({"class_code": "CS101"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/classes/{id}"))
            .cookie(session.clone())
            .set_json(json!({"class_code": "CS102"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/classes/{id}"))
            .cookie(session.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["class_code"], "CS102");

        let req = test::TestRequest::get()
            .uri("/api/classes/9999")
            .cookie(session)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_users_accepts_list_and_wrapped_bodies() {
        let storage = storage_with_admin().await;
        let app = init_app!(storage.clone());
        let session = login!(app);

        let person = |username: &str, role: &str| {
            json!({
                "username": username,
                "password": "pw",
                "full_name": format!("{username} name"),
                "role": role,
            })
        };

        let req = test::TestRequest::post()
            .uri("/api/create_users")
            .cookie(session.clone())
            .set_json(json!([person("s1", "student")]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"message": "Users created successfully", "count": 1})
        );

        let req = test::TestRequest::post()
            .uri("/api/create_users")
            .cookie(session.clone())
            .set_json(json!({"users": [person("s2", "student"), person("t1", "teacher")]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 2);
        assert_eq!(storage.count_users().await.unwrap(), 4);

        // 批内任一条失败则整批不写入
        let req = test::TestRequest::post()
            .uri("/api/create_users")
            .cookie(session)
            .set_json(json!([person("s3", "student"), person("s1", "student")]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert_eq!(storage.count_users().await.unwrap(), 4);
        assert!(storage.get_user_by_username("s3").await.unwrap().is_none());

        // 教师只能批量创建学生
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "t1", "password": "pw"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let teacher_session = resp
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| Cookie::new("session", c.value().to_string()))
            .expect("session cookie");

        let req = test::TestRequest::post()
            .uri("/api/create_users")
            .cookie(teacher_session)
            .set_json(json!({"users": [person("s4", "student"), person("t2", "teacher")]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(storage.count_users().await.unwrap(), 4);
    }
}
