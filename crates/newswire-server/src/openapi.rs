use utoipa::OpenApi;

/// OpenAPI document for the news routes.
///
/// The handlers are generic over their capabilities, so the paths are listed
/// by hand rather than collected from the router.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "newswire API",
        version = "0.1.0",
        description = "Validating proxy over the upstream news API."
    ),
    paths(
        crate::routes::list,
        crate::routes::headlines,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::SuccessEnvelope,
        crate::dto::ArticleResponse,
        crate::dto::SourceResponse,
        crate::dto::ErrorResponse,
        crate::dto::FieldErrors,
        crate::dto::FieldError,
        crate::dto::HealthResponse,
    )),
    tags(
        (name = "news", description = "Upstream news queries"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
