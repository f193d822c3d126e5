use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    controllers,
    middlewares::{jwt_auth_middleware, optional_jwt_auth_middleware},
    state::{AppState, SharedAppState},
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_router(app_state: AppState) -> Router {
    let state = Arc::new(app_state);

    let app = Router::new().route("/health", get(controllers::home::health));

    let api_route = Router::new()
        .nest("/auth", auth_routes())
        .merge(protected_routes(state.clone()))
        .merge(public_routes(state.clone()))
        .nest("/catalog", catalog_routes());

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or("");
                let user_agent = request
                    .headers()
                    .get(header::USER_AGENT)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or("");

                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::info_span!(
                    "http_request",
                    request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    path = matched_path,
                    version = ?request.version(),
                    user_agent,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id_header));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.nest("/api/v1", api_route)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(request_id_middleware)
        .with_state(state)
}

fn auth_routes() -> Router<SharedAppState> {
    Router::new()
        .route("/register", post(controllers::auth::register))
        .route("/login", post(controllers::auth::login))
}

fn protected_routes(state: SharedAppState) -> Router<SharedAppState> {
    Router::new()
        .route("/profile", get(controllers::me::index))
        .route("/posts", post(controllers::posts::store))
        .route(
            "/posts/{id}",
            put(controllers::posts::update).delete(controllers::posts::destroy),
        )
        .route("/comments", post(controllers::comments::store))
        .route("/comments/{id}", delete(controllers::comments::destroy))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn public_routes(state: SharedAppState) -> Router<SharedAppState> {
    Router::new()
        .route("/posts", get(controllers::posts::index))
        .route(
            "/posts/most-commented",
            get(controllers::posts::most_commented),
        )
        .route("/posts/{id}", get(controllers::posts::show))
        .route("/posts/{id}/comments", get(controllers::comments::index))
        .route("/users/{id}/posts", get(controllers::users::posts))
        .route_layer(middleware::from_fn_with_state(
            state,
            optional_jwt_auth_middleware,
        ))
}

fn catalog_routes() -> Router<SharedAppState> {
    Router::new()
        .route("/employees", get(controllers::catalog::employees))
        .route("/employees/top-paid", get(controllers::catalog::top_paid))
        .route("/books", get(controllers::catalog::books))
}
