use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged-in identity on this device.
///
/// The token is a client-generated random marker, not a server credential:
/// it only proves that a login succeeded in this browser. Created on login,
/// removed on explicit logout, otherwise kept indefinitely. The JSON field
/// names match the record the site persists under its `session` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "username")]
    identifier: String,
    token: String,
    #[serde(rename = "createdAt", with = "ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(identifier: impl Into<String>, token: String, created_at: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            token,
            created_at,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Optional opt-in record used to prefill the identifier field on a return
/// visit. Lives and dies independently of `Session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedIdentity {
    #[serde(rename = "username")]
    identifier: String,
}

impl RememberedIdentity {
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn session_serializes_with_site_field_names() {
        let session = Session::new("veinarous", "1-2-3-4".to_string(), fixed_now());
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["username"], "veinarous");
        assert_eq!(json["token"], "1-2-3-4");
        assert_eq!(json["createdAt"], fixed_now().timestamp_millis());
    }

    #[test]
    fn session_round_trips() {
        let session = Session::new("veinarous", "9-9-9-9".to_string(), fixed_now());
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn remembered_identity_uses_username_field() {
        let remembered = RememberedIdentity::new("veinarous");
        let json = serde_json::to_string(&remembered).unwrap();
        assert_eq!(json, r#"{"username":"veinarous"}"#);
    }
}
