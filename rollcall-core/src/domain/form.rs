//! Form input checks
//!
//! These mirror what the browser enforces on the sign-up and login forms
//! before a submit event ever fires: required fields and the shape of an
//! email address. Anything stricter is the server's call.

use regex::Regex;

use super::result::{Error, Result};

/// The `type=email` pattern from the HTML living standard
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Reject empty values for a required field
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Check that `email` is shaped like an email address
pub fn validate_email(email: &str) -> Result<()> {
    require("Email", email)?;

    let email_re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| Error::Other(format!("Invalid email pattern: {}", e)))?;
    if !email_re.is_match(email.trim()) {
        return Err(Error::validation(format!("'{}' is not a valid email address", email)));
    }
    Ok(())
}
