use serde::{Deserialize, Serialize};

/// One allow-list entry: an identifier paired with the hex digest of its
/// secret. Loaded once per page, never written back. Field names follow the
/// `users.json` wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "username")]
    pub identifier: String,
    #[serde(rename = "pass_sha256")]
    pub digest: String,
}

impl CredentialRecord {
    #[must_use]
    pub fn new(identifier: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            digest: digest.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_field_names() {
        let record: CredentialRecord =
            serde_json::from_str(r#"{"username":"ada","pass_sha256":"abc123"}"#).unwrap();
        assert_eq!(record.identifier, "ada");
        assert_eq!(record.digest, "abc123");
    }
}
