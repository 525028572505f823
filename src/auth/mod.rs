pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// What the rest of the crate uses, lifted to the module root.
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

/// Signup payload.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must parse as an email address and fit the 255-character column.
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Six characters at minimum; hashed before storage.
    #[validate(length(min = 6))]
    pub password: String,
}

// Plaintext passwords must never reach logs; Debug is written by hand.
impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login form body.
///
/// Following the OAuth2 password flow, the field is named `username` but
/// carries the account email.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token for the `Authorization` header.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_field_rules() {
        let well_formed = RegisterRequest {
            email: "devon@tasknest.test".to_string(),
            password: "orchard-gate-55".to_string(),
        };
        assert!(well_formed.validate().is_ok());

        let not_an_address = RegisterRequest {
            email: "devon-at-tasknest.test".to_string(),
            password: "orchard-gate-55".to_string(),
        };
        assert!(not_an_address.validate().is_err());

        let five_characters = RegisterRequest {
            email: "devon@tasknest.test".to_string(),
            password: "gate5".to_string(),
        };
        assert!(five_characters.validate().is_err());

        // Well-formed as an address (local part 64, labels 63) but longer
        // than the 255 characters the users.email column holds.
        let local = "a".repeat(64);
        let label = "d".repeat(63);
        let over_column_width = RegisterRequest {
            email: format!("{}@{}.{}.{}.test", local, label, label, label),
            password: "orchard-gate-55".to_string(),
        };
        assert!(over_column_width.email.len() > 255);
        assert!(over_column_width.validate().is_err());
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let register = RegisterRequest {
            email: "devon@tasknest.test".to_string(),
            password: "orchard-gate-55".to_string(),
        };
        let shown = format!("{:?}", register);
        assert!(shown.contains("devon@tasknest.test"));
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("orchard-gate-55"));

        let login = LoginForm {
            username: "devon@tasknest.test".to_string(),
            password: "orchard-gate-55".to_string(),
        };
        let shown = format!("{:?}", login);
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("orchard-gate-55"));
    }
}
