#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Auth token is missing")]
    TokenMissing,
    #[error("Jwt error")]
    JwtError(jsonwebtoken::errors::Error),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Admin role required")]
    Forbidden,
}
