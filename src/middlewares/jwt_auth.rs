use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{decode_jwt, error::AuthError},
    db::user::get_user_by_id_optional,
    error::Error,
    model::User,
    state::{AppState, SharedAppState},
};

/// The caller on routes where a token is optional.
#[derive(Clone, Debug, Default)]
pub struct Viewer(pub Option<Arc<User>>);

#[tracing::instrument(name = "[MIDDLEWARE] jwt auth", skip_all)]
pub async fn jwt_auth_middleware(
    State(app_state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let user = authenticate(&app_state, req.headers()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[tracing::instrument(name = "[MIDDLEWARE] optional jwt auth", skip_all)]
pub async fn optional_jwt_auth_middleware(
    State(app_state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Response<Body> {
    let viewer = match authenticate(&app_state, req.headers()).await {
        Ok(user) => Viewer(Some(user)),
        Err(error) => {
            tracing::debug!(err.msg = %error, "Continuing without viewer");
            Viewer(None)
        }
    };

    req.extensions_mut().insert(viewer);

    next.run(req).await
}

async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<Arc<User>, Error> {
    let auth_header = match headers.get(axum::http::header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| Error::Auth(AuthError::InvalidAuthHeader))?,
        None => {
            return Err(Error::Auth(AuthError::TokenMissing));
        }
    };

    let token = parse_bearer(auth_header)?;

    let token_data = decode_jwt(token, &app_state.config.jwt)
        .map_err(|_| Error::Auth(AuthError::InvalidToken))?;

    let user_optional = get_user_by_id_optional(&app_state.pool, token_data.claims.user_id).await?;
    match user_optional {
        Some(user) => Ok(Arc::new(user)),
        None => Err(Error::Auth(AuthError::InvalidToken)),
    }
}

fn parse_bearer(auth_header: &str) -> Result<&str, Error> {
    let mut header = auth_header.split_whitespace();
    let (bearer, token, rest) = (header.next(), header.next(), header.next());

    match (bearer, token, rest) {
        (Some(bearer), Some(token), None) if bearer.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::Auth(AuthError::InvalidAuthHeader)),
    }
}
