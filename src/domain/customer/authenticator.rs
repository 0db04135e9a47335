use crate::models::{Customer, CustomerLoginInput};
use crate::store::Store;

use super::errors::AuthError;
use super::value_objects::{Email, Password};

// ============================================================================
// Authenticator
// ============================================================================
//
// Email lookup followed by a verbatim credential comparison. Unknown email
// and wrong password both yield `Ok(None)`.
//
// ============================================================================

pub async fn authenticate_customer(
    store: &dyn Store,
    input: &CustomerLoginInput,
) -> Result<Option<Customer>, AuthError> {
    let email = Email::parse(input.email.as_str())?;
    let password = Password::new(input.password.as_str());

    let customer = store
        .find_customer_by_email(email.as_str())
        .await
        .map_err(|e| {
            tracing::error!(email = %email.as_str(), error = %e, "Customer authentication failed");
            e
        })?;

    let Some(customer) = customer else {
        tracing::debug!(email = %email.as_str(), "No customer with this email");
        return Ok(None);
    };

    if !password.matches(&customer.password_hash) {
        tracing::debug!(customer_id = customer.id, "Credential mismatch");
        return Ok(None);
    }

    tracing::info!(customer_id = customer.id, "🔓 Customer authenticated");
    Ok(Some(customer))
}
