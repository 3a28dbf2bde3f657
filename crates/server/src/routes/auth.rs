use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use configs::{AdminConfig, AppConfig};
use service::ai::{AiProvider, DisabledProvider, OpenAiProvider};
use service::{Backend, MutationAction, PublicReader};

use crate::errors::{JsonApiError, StartupError};
use crate::page_cache::PageCache;

pub const AUTH_COOKIE: &str = "admin_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub username: String,
    /// Argon2 PHC string; `None` disables login.
    pub password_hash: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
}

impl ServerAuthConfig {
    /// Resolve the admin credential to a verified PHC hash. A configured hash
    /// must parse; a plaintext password is hashed here and never kept.
    pub fn from_admin(cfg: &AdminConfig) -> Result<Self, StartupError> {
        let password_hash = match (&cfg.password_hash, &cfg.password) {
            (Some(hash), _) => {
                PasswordHash::new(hash)
                    .map_err(|e| StartupError::InvalidConfig(format!("admin.password_hash: {e}")))?;
                Some(hash.clone())
            }
            (None, Some(plain)) => {
                warn!("ADMIN_PASSWORD is plaintext; set ADMIN_PASSWORD_HASH outside development");
                Some(hash_password(plain).map_err(|e| StartupError::InvalidConfig(format!("admin.password: {e}")))?)
            }
            (None, None) => {
                warn!("no admin credential configured; admin login is disabled");
                None
            }
        };
        Ok(Self {
            username: cfg.username.clone(),
            password_hash,
            jwt_secret: cfg.jwt_secret.clone(),
            session_ttl_secs: cfg.session_ttl_secs,
        })
    }

    fn accepts(&self, username: &str, password: &str) -> bool {
        let Some(hash) = &self.password_hash else { return false };
        let Ok(parsed) = PasswordHash::new(hash) else { return false };
        let pass_ok = Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok();
        pass_ok && username.trim() == self.username
    }
}

pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(plain.as_bytes(), &salt)?.to_string())
}

#[derive(Clone)]
pub struct ServerState {
    pub backend: Backend,
    pub reader: PublicReader,
    pub actions: MutationAction,
    pub pages: Arc<PageCache>,
    pub ai: Arc<dyn AiProvider>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// Wire the handlers' collaborators. Mutations hint the page cache.
    pub fn new(backend: Backend, cfg: &AppConfig) -> Result<Self, StartupError> {
        let pages = Arc::new(PageCache::new(&cfg.cache));
        let ai: Arc<dyn AiProvider> = match OpenAiProvider::from_config(&cfg.ai) {
            Some(provider) => Arc::new(provider),
            None => Arc::new(DisabledProvider),
        };
        Ok(Self {
            reader: backend.reader(),
            actions: backend.actions(pages.clone()),
            backend,
            pages,
            ai,
            auth: ServerAuthConfig::from_admin(&cfg.admin)?,
        })
    }

    pub fn with_ai(mut self, ai: Arc<dyn AiProvider>) -> Self {
        self.ai = ai;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginOutput {
    pub username: String,
    pub token: String,
}

#[utoipa::path(post, path = "/admin/login", tag = "auth", request_body = LoginInput, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let auth = &state.auth;
    if !auth.accepts(&input.username, &input.password) {
        warn!(username = %input.username, "admin login rejected");
        return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("invalid credentials".into())));
    }

    let token = issue_token(auth).map_err(|e| JsonApiError::internal(e.to_string()))?;
    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    info!(username = %auth.username, "admin logged in");
    Ok((jar.add(cookie), Json(LoginOutput { username: auth.username.clone(), token })))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

fn issue_token(auth: &ServerAuthConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as usize;
    let claims = Claims { sub: auth.username.clone(), iat: now, exp: now + auth.session_ttl_secs as usize };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(auth.jwt_secret.as_bytes()))
}

/// Admin middleware: a valid token in `Authorization: Bearer <token>` or
/// the `admin_token` cookie. Missing or invalid tokens get 401.
pub async fn require_admin(
    State(state): State<ServerState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").map(str::to_string).ok_or(()))
        .transpose()
        .map_err(|_| {
            warn!(%path, "invalid Authorization format (expect Bearer)");
            StatusCode::UNAUTHORIZED
        })?;

    let token = match bearer.or_else(|| jar.get(AUTH_COOKIE).map(|c| c.value().to_string())) {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!(%path, "missing Authorization header and admin_token cookie");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(&token, &key, &validation) {
        Ok(_) => Ok(next.run(req).await),
        Err(e) => {
            warn!(%path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
