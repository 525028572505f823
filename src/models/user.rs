use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account, as stored and as returned by the API.
///
/// The password hash is deliberately not a field of this struct; the login
/// query reads it into a transient tuple, so it can never be serialized
/// into a response.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_without_credential_material() {
        let user = User {
            id: 41,
            email: "ibrahim@tasknest.test".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("email"));
        assert!(object.contains_key("created_at"));
    }
}
