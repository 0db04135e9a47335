// ============================================================================
// Customer Domain - Login Checks
// ============================================================================
//
// - Value objects (Email, Password)
// - Errors (CustomerError, AuthError)
// - Authenticator (email lookup + credential comparison)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod authenticator;

pub use errors::*;
pub use authenticator::*;
