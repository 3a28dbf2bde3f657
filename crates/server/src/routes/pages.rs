//! Public read surface and public forms.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use models::{
    Article, Content, Document, DocumentId, Event, GalleryImage, Inquiry, Job, ModerationStatus, Project, Service,
    Testimonial,
};
use service::storage::Direction;
use service::{ActionResult, Query, Samples, Source, Sourced};

use crate::errors::JsonApiError;
use crate::forms;
use crate::page_cache::Rendered;
use crate::routes::{action_response, auth::ServerState};

const HOME_SECTION_LIMIT: usize = 6;

fn featured() -> Query { Query::newest_first().filter("featured", true).limit(HOME_SECTION_LIMIT) }

fn approved() -> Query { Query::newest_first().filter("status", ModerationStatus::Approved.as_str()) }

async fn render_list<T: Samples>(state: &ServerState, page: &str, query: Query) -> Result<Json<Value>, JsonApiError> {
    let body = state
        .pages
        .get_or_render(page, async {
            let listed = state.reader.list::<T>(&query).await;
            Ok::<_, JsonApiError>(Rendered {
                cacheable: listed.source != Source::Unavailable,
                body: serde_json::to_value(&listed)?,
            })
        })
        .await?;
    Ok(Json(Value::clone(&body)))
}

async fn render_detail<T: Samples>(state: &ServerState, id: String) -> Result<Json<Value>, JsonApiError> {
    let id = DocumentId::new(id);
    let Some(page) = T::KIND.detail_page(id.as_str()) else {
        return Err(JsonApiError::not_found(T::KIND.singular()));
    };
    let body = state
        .pages
        .get_or_render(&page, async {
            let found = state.reader.get::<T>(&id).await;
            match (&found.data, found.source) {
                (None, Source::Unavailable) => Err(JsonApiError::unavailable("content store unavailable")),
                (None, _) => Err(JsonApiError::not_found(T::KIND.singular())),
                _ => Ok(Rendered { cacheable: true, body: serde_json::to_value(&found)? }),
            }
        })
        .await?;
    Ok(Json(Value::clone(&body)))
}

#[derive(Serialize)]
pub struct HomePage {
    pub services: Sourced<Vec<Document<Service>>>,
    pub projects: Sourced<Vec<Document<Project>>>,
    pub articles: Sourced<Vec<Document<Article>>>,
    pub events: Sourced<Vec<Document<Event>>>,
    pub gallery: Sourced<Vec<Document<GalleryImage>>>,
    pub testimonials: Sourced<Vec<Document<Testimonial>>>,
}

#[utoipa::path(get, path = "/api/pages/home", tag = "public", responses((status = 200, description = "Homepage sections")))]
pub async fn home(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    let body = state
        .pages
        .get_or_render("/", async {
            let reader = &state.reader;
            let featured = featured();
            let approved = approved().limit(HOME_SECTION_LIMIT);
            let (services, projects, articles, events, gallery, testimonials) = tokio::join!(
                reader.list::<Service>(&featured),
                reader.list::<Project>(&featured),
                reader.list::<Article>(&featured),
                reader.list::<Event>(&featured),
                reader.list::<GalleryImage>(&featured),
                reader.list::<Testimonial>(&approved),
            );
            let home = HomePage { services, projects, articles, events, gallery, testimonials };
            let cacheable = [
                home.services.source,
                home.projects.source,
                home.articles.source,
                home.events.source,
                home.gallery.source,
                home.testimonials.source,
            ]
            .iter()
            .all(|s| *s != Source::Unavailable);
            Ok::<_, JsonApiError>(Rendered { cacheable, body: serde_json::to_value(&home)? })
        })
        .await?;
    Ok(Json(Value::clone(&body)))
}

#[utoipa::path(get, path = "/api/services", tag = "public", responses((status = 200, description = "Services")))]
pub async fn services(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Service>(&state, "/services", Query::newest_first()).await
}

#[utoipa::path(get, path = "/api/projects", tag = "public", responses((status = 200, description = "Projects")))]
pub async fn projects(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Project>(&state, "/projects", Query::newest_first()).await
}

pub async fn project(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Value>, JsonApiError> {
    render_detail::<Project>(&state, id).await
}

#[utoipa::path(get, path = "/api/blog", tag = "public", responses((status = 200, description = "Articles, newest first")))]
pub async fn articles(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Article>(&state, "/blog", Query::new().order_by("published_at", Direction::Desc)).await
}

pub async fn article(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Value>, JsonApiError> {
    render_detail::<Article>(&state, id).await
}

#[utoipa::path(get, path = "/api/gallery", tag = "public", responses((status = 200, description = "Gallery images")))]
pub async fn gallery(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<GalleryImage>(&state, "/gallery", Query::newest_first()).await
}

#[utoipa::path(get, path = "/api/events", tag = "public", responses((status = 200, description = "Events by date")))]
pub async fn events(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Event>(&state, "/events", Query::new().order_by("date", Direction::Asc)).await
}

pub async fn event(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Value>, JsonApiError> {
    render_detail::<Event>(&state, id).await
}

#[utoipa::path(get, path = "/api/careers", tag = "public", responses((status = 200, description = "Open positions")))]
pub async fn careers(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Job>(&state, "/careers", Query::newest_first()).await
}

pub async fn career(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Value>, JsonApiError> {
    render_detail::<Job>(&state, id).await
}

#[utoipa::path(get, path = "/api/feedback", tag = "public", responses((status = 200, description = "Approved testimonials")))]
pub async fn feedback(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    render_list::<Testimonial>(&state, "/feedback", approved()).await
}

async fn submit_public<T: Content>(state: &ServerState, body: &Value) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    let input = forms::from_json(body)?;
    let result = state.actions.submit::<T>(input, None).await;
    Ok(action_response(T::KIND, result))
}

#[utoipa::path(post, path = "/api/contact", tag = "public", responses((status = 200, description = "Inquiry received"), (status = 422, description = "Validation Error")))]
pub async fn contact(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    submit_public::<Inquiry>(&state, &body).await
}

/// New testimonials always enter moderation as pending.
#[utoipa::path(post, path = "/api/feedback", tag = "public", responses((status = 200, description = "Feedback received"), (status = 422, description = "Validation Error")))]
pub async fn submit_feedback(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    submit_public::<Testimonial>(&state, &body).await
}
