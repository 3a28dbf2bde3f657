mod support;

use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use serde_json::json;
use tower::ServiceExt;

use support::{body_json, build, get, json_request};

#[tokio::test]
async fn admin_api_requires_a_token() -> anyhow::Result<()> {
    let app = build(true).await?;
    let resp = app.router.clone().oneshot(get("/admin/api/projects")?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/admin/api/projects")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())?;
    let resp = app.router.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> anyhow::Result<()> {
    let app = build(true).await?;
    let req = json_request("POST", "/admin/login", &json!({"username": "admin", "password": "nope"}))?;
    let resp = app.router.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_sets_cookie_and_token_opens_admin_api() -> anyhow::Result<()> {
    let app = build(true).await?;
    let req = json_request("POST", "/admin/login", &json!({"username": "admin", "password": "s3cret"}))?;
    let resp = app.router.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("set-cookie");
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("HttpOnly"));
    let token = body_json(resp).await?["token"].as_str().expect("token").to_string();

    let req = Request::builder()
        .uri("/admin/api/projects")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.router.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?, json!([]));

    // the cookie alone is enough too
    let cookie_pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder()
        .uri("/admin/api/unknown-things")
        .header(header::COOKIE, cookie_pair)
        .body(Body::empty())?;
    let resp = app.router.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn feedback_is_published_only_after_approval() -> anyhow::Result<()> {
    let app = build(true).await?;
    let submit = json!({"author": "Ada", "company": "Analytical Ltd", "feedback": "Superb", "rating": 9});
    let resp = app.router.clone().oneshot(json_request("POST", "/api/feedback", &submit)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let id = body_json(resp).await?["id"].as_str().expect("id").to_string();

    // pending feedback is not public, and a stocked collection never shows samples
    let page = body_json(app.router.clone().oneshot(get("/api/feedback")?).await?).await?;
    assert_eq!(page["source"], "live");
    assert_eq!(page["data"].as_array().map(Vec::len), Some(0));

    let login = json_request("POST", "/admin/login", &json!({"username": "admin", "password": "s3cret"}))?;
    let token = body_json(app.router.clone().oneshot(login).await?).await?["token"]
        .as_str()
        .expect("token")
        .to_string();
    let approve = Request::builder()
        .method("PATCH")
        .uri(format!("/admin/api/testimonials/{id}/status"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"status": "approved"}))?))?;
    let resp = app.router.clone().oneshot(approve).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let page = body_json(app.router.clone().oneshot(get("/api/feedback")?).await?).await?;
    assert_eq!(page["source"], "live");
    assert_eq!(page["data"][0]["author"], "Ada");
    assert_eq!(page["data"][0]["rating"], 5);

    let back = Request::builder()
        .method("PATCH")
        .uri(format!("/admin/api/testimonials/{id}/status"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"status": "pending"}))?))?;
    let resp = app.router.clone().oneshot(back).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}
