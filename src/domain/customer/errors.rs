// ============================================================================
// Customer Input Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidInput(#[from] CustomerError),

    #[error("Customer lookup failed: {0}")]
    Store(#[from] crate::store::StoreError),
}
