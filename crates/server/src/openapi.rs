use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Admin create/update body (multipart/form-data): the collection's text
/// fields plus an optional `image` file.
#[derive(ToSchema)]
pub struct ContentFormDoc {
    pub title: Option<String>,
    /// Image file part.
    pub image: Option<String>,
}

#[derive(ToSchema)]
pub struct ActionResultDoc {
    pub success: bool,
    pub outcome: String,
    pub message: String,
    pub field_errors: Option<std::collections::BTreeMap<String, Vec<String>>>,
    pub id: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pages::home,
        crate::routes::pages::services,
        crate::routes::pages::projects,
        crate::routes::pages::articles,
        crate::routes::pages::gallery,
        crate::routes::pages::events,
        crate::routes::pages::careers,
        crate::routes::pages::feedback,
        crate::routes::pages::contact,
        crate::routes::pages::submit_feedback,
        crate::routes::ai::suggest,
        crate::routes::ai::chat,
        crate::routes::auth::login,
        crate::routes::admin::list,
        crate::routes::admin::create,
    ),
    components(
        schemas(
            HealthResponse,
            ContentFormDoc,
            ActionResultDoc,
            crate::routes::auth::LoginInput,
            crate::routes::auth::LoginOutput,
            crate::routes::admin::FeaturedInput,
            crate::routes::admin::StatusInput,
            crate::routes::ai::SuggestInput,
            crate::routes::ai::AiOutput,
        )
    ),
    tags(
        (name = "health"),
        (name = "public"),
        (name = "ai"),
        (name = "auth"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
