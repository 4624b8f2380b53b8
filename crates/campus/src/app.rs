use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use campus_auth::auth_routes;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        courses::{add_course, drop_course, get_course, list_courses, list_enrollments, pick_course},
        health::{livez, readyz},
        todos::{create_todo, delete_todo, finish_todo, get_board},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Static segments win over `{id}` when matching.
    let course_routes = Router::new()
        .route("/course/info", get(list_courses))
        .route("/course/enrollment", get(list_enrollments))
        .route("/course/pick", post(pick_course))
        .route("/course/drop", post(drop_course))
        .route("/course/add/course", post(add_course))
        .route("/course/{id}", get(get_course));

    let todo_routes = Router::new()
        .route("/to-do/info", get(get_board))
        .route("/to-do/create", post(create_todo))
        .route("/to-do/finish", post(finish_todo))
        .route("/to-do/delete", post(delete_todo));

    Router::new()
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .merge(course_routes)
        .merge(todo_routes)
        .merge(auth_routes().with_state(state.auth.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use campus_core::school::{NewUser, Role};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Creates a user directly in storage and returns a bearer header for it.
    async fn bearer(state: &AppState, username: &str, role: Role) -> String {
        let user = state
            .auth
            .users
            .create_user(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "$argon2id$stub".to_string(),
                role,
            })
            .await
            .unwrap();
        let pair = state.auth.tokens.issue_pair(&user).unwrap();
        format!("Bearer {}", pair.access_token)
    }

    fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, auth)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/livez", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readyz_reports_cache() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/readyz", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ready"], true);
        assert_eq!(json["cache"], "ok");
    }

    #[tokio::test]
    async fn test_list_courses_empty() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/course/info", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_add_course_requires_admin() {
        let state = AppState::default();
        let student = bearer(&state, "sam", Role::Student).await;
        let app = create_app(state);

        let response = app
            .oneshot(post_request(
                "/course/add/course",
                &student,
                serde_json::json!({ "name": "Compilers", "capacity": 30 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_add_course_validates() {
        let state = AppState::default();
        let admin = bearer(&state, "ada", Role::Admin).await;
        let app = create_app(state);

        let response = app
            .oneshot(post_request(
                "/course/add/course",
                &admin,
                serde_json::json!({ "name": "Compilers", "capacity": 0 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_course_is_404() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/course/99", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enrollment_flow() {
        let state = AppState::default();
        let admin = bearer(&state, "ada", Role::Admin).await;
        let student = bearer(&state, "sam", Role::Student).await;
        let other = bearer(&state, "tom", Role::Student).await;
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(post_request(
                "/course/add/course",
                &admin,
                serde_json::json!({ "name": "Compilers", "capacity": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let course_id = body_json(response).await["id"].as_i64().unwrap();

        // Warm the list and single-course keys before the write.
        let response = app
            .clone()
            .oneshot(get_request(&format!("/course/{course_id}"), None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["enrolled"], 0);

        let response = app
            .clone()
            .oneshot(post_request(
                "/course/pick",
                &student,
                serde_json::json!({ "course_id": course_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post_request(
                "/course/pick",
                &other,
                serde_json::json!({ "course_id": course_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/course/{course_id}"), None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["enrolled"], 1);

        let response = app
            .clone()
            .oneshot(get_request("/course/enrollment", Some(&student)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(post_request(
                "/course/drop",
                &student,
                serde_json::json!({ "course_id": course_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/course/info", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json[0]["enrolled"], 0);
    }

    #[tokio::test]
    async fn test_enrollment_requires_token() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/course/enrollment", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_todo_flow() {
        let state = AppState::default();
        let owner = bearer(&state, "uma", Role::Student).await;
        let stranger = bearer(&state, "vic", Role::Student).await;
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(post_request(
                "/to-do/create",
                &owner,
                serde_json::json!({ "title": "Problem set 4" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let todo_id = body_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(get_request("/to-do/info", Some(&owner)))
            .await
            .unwrap();
        let board = body_json(response).await;
        assert_eq!(board["pending"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(post_request(
                "/to-do/finish",
                &stranger,
                serde_json::json!({ "todo_id": todo_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(post_request(
                "/to-do/finish",
                &owner,
                serde_json::json!({ "todo_id": todo_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(get_request("/to-do/info", Some(&owner)))
            .await
            .unwrap();
        let board = body_json(response).await;
        assert!(board["pending"].as_array().unwrap().is_empty());
        assert_eq!(board["done"][0]["id"], todo_id);

        let response = app
            .clone()
            .oneshot(post_request(
                "/to-do/delete",
                &owner,
                serde_json::json!({ "todo_id": todo_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/to-do/info", Some(&owner)))
            .await
            .unwrap();
        let board = body_json(response).await;
        assert!(board["done"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_todo_title_is_rejected() {
        let state = AppState::default();
        let owner = bearer(&state, "wes", Role::Student).await;
        let app = create_app(state);

        let response = app
            .oneshot(post_request(
                "/to-do/create",
                &owner,
                serde_json::json!({ "title": "   " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
