use serde::{Deserialize, Serialize};
use std::fmt;

/// An account as reported by the authentication endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Information")?;
        writeln!(f, "First Name: {}", self.first_name)?;
        writeln!(f, "Last Name: {}", self.last_name)?;
        write!(f, "Email: {}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_display() {
        let user = User {
            uid: "u1".into(),
            email: "ana@example.com".into(),
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
        };
        let output = format!("{}", user);
        assert!(output.contains("First Name: Ana"));
        assert!(output.contains("Last Name: Lopez"));
        assert!(output.contains("Email: ana@example.com"));
    }

    #[test]
    fn test_missing_names_default_to_empty() {
        let user: User =
            serde_json::from_str(r#"{"uid":"u1","email":"ana@example.com"}"#).unwrap();
        assert!(user.first_name.is_empty());
        assert!(user.last_name.is_empty());
    }
}
