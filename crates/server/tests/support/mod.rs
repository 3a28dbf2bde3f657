#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use configs::AppConfig;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestApp {
    pub router: Router,
    pub cfg: AppConfig,
    _dir: TempDir,
}

pub fn test_config(dir: &Path, configured: bool) -> AppConfig {
    let path = |p: &str| dir.join(p).to_string_lossy().into_owned();
    let mut cfg = AppConfig::default();
    cfg.server.frontend_dir = path("frontend");
    cfg.store.project_id = configured.then(|| "test-site".to_string());
    cfg.store.data_dir = path("data");
    cfg.store.uploads_dir = path("uploads");
    cfg.admin.username = "admin".into();
    cfg.admin.password = Some("s3cret".into());
    cfg.admin.jwt_secret = "test-secret".into();
    cfg
}

pub async fn build(configured: bool) -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let cfg = test_config(dir.path(), configured);
    let router = server::startup::build_app(&cfg).await?;
    Ok(TestApp { router, cfg, _dir: dir })
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

pub fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

pub async fn body_json(resp: Response<Body>) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
