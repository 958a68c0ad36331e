/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhub_api::{app::{build_router, AppState}, config::Config};
/// use taskhub_shared::{db::pool::{create_pool, DatabaseConfig}, mail::log::LogMailer, store::postgres::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
///
/// let state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(LogMailer), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::security_headers};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use taskhub_shared::{
    auth::middleware::authenticate,
    mail::Mailer,
    services::accounts::AccountSettings,
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Outgoing mail
    pub mailer: Arc<dyn Mailer>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Derived from `config` once at startup
    pub accounts: Arc<AccountSettings>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        let accounts = Arc::new(config.account_settings());

        Self {
            store,
            mailer,
            config: Arc::new(config),
            accounts,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register               # public
///     │   ├── POST /login                  # public
///     │   ├── GET  /confirm/:token         # public
///     │   ├── POST /forgot-password        # public
///     │   ├── GET  /forgot-password/:token # public
///     │   ├── POST /forgot-password/:token # public
///     │   └── GET  /profile                # authenticated
///     ├── /projects/                       # authenticated
///     │   ├── GET, POST /
///     │   ├── GET, PUT, DELETE /:id
///     │   ├── POST   /:id/collaborators
///     │   └── DELETE /:id/collaborators/:user_id
///     ├── POST /collaborators/search       # authenticated
///     └── /tasks/                          # authenticated
///         ├── POST /
///         ├── GET, PUT, DELETE /:id
///         └── POST /:id/state
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then
/// authentication on the protected route groups.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Account routes (public)
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/confirm/:token", get(routes::auth::confirm))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route(
            "/forgot-password/:token",
            get(routes::auth::check_reset_token).post(routes::auth::new_password),
        );

    // Everything below requires a valid session token
    let protected_auth_routes = Router::new()
        .route("/profile", get(routes::auth::profile))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::edit_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/:id/collaborators",
            post(routes::collaborators::add_collaborator),
        )
        .route(
            "/:id/collaborators/:user_id",
            delete(routes::collaborators::remove_collaborator),
        )
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let collaborator_routes = Router::new()
        .route("/search", post(routes::collaborators::search_collaborator))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::edit_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/state", post(routes::tasks::toggle_task_state))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(protected_auth_routes))
        .nest("/projects", project_routes)
        .nest("/collaborators", collaborator_routes)
        .nest("/tasks", task_routes);

    let cors = cors_layer(&state.config);
    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(middleware::from_fn_with_state(production, security_headers))
        .with_state(state)
}

/// CORS policy: permissive when `*` is configured, otherwise the listed origins
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token, checks the user still exists, then injects
/// `AuthContext` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_context = authenticate(state.store.as_ref(), state.jwt_secret(), req.headers()).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
