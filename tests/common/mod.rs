#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use messagely::{
    config::{AppConfig, AuthConfig, JwtConfig, PasswordConfig},
    users::repo_types::{NewUser, User},
    AppState,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: String::new(),
        max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "messagely-test".into(),
            audience: "messagely-test-users".into(),
            ttl_minutes: 5,
        },
        auth: AuthConfig {
            verify_user_exists: true,
        },
        password: PasswordConfig {
            work_factor: 1,
            memory_kib: 1024,
        },
    }
}

pub fn state(pool: PgPool) -> AppState {
    AppState::from_parts(pool, Arc::new(test_config())).expect("test state")
}

pub fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password: password.into(),
        first_name: format!("{username}-first"),
        last_name: format!("{username}-last"),
        phone: "+15555550100".into(),
    }
}

pub async fn register(state: &AppState, username: &str) -> User {
    User::register(&state.db, &state.hasher, new_user(username, "password123"))
        .await
        .expect("register")
}

/// Thin request helper over `oneshot`.
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
