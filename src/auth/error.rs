#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    TokenMissing,
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Jwt error")]
    JwtError(jsonwebtoken::errors::Error),
    #[error("Password error")]
    PasswordError(argon2::password_hash::Error),
    #[error("Invalid username or password")]
    IncorrectCredential,
}
