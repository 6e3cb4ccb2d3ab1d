use chrono::NaiveDateTime;
use serde::Serialize;

/// A registered account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique contact address
    pub email: String,
    /// Argon2 PHC string, never the plain password
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Owner check used by every route that mutates a user's own rows
    pub fn owns(&self, owner_id: i64) -> bool {
        self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "$argon2id$hash".to_string(),
            created_at: NaiveDateTime::default(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
        assert!(user.owns(1));
        assert!(!user.owns(2));
    }
}
