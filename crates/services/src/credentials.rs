use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use circle8_core::model::CredentialRecord;

use crate::error::FetchError;

/// Compute the lowercase hex SHA-256 digest of a submitted secret.
///
/// Deterministic and free of I/O; matching against the allow-list is plain
/// string equality on the output.
#[must_use]
pub fn sha256_hex(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Check a submitted identifier/secret pair against the allow-list.
///
/// Exact, case-sensitive match on both identifier and digest; no
/// normalization of either field.
#[must_use]
pub fn verify(identifier: &str, secret: &str, records: &[CredentialRecord]) -> bool {
    let digest = sha256_hex(secret);
    records
        .iter()
        .any(|record| record.identifier == identifier && record.digest == digest)
}

/// Allow-list shipped with the page, used whenever `users.json` cannot be
/// fetched. Deterrence only: the list and the digest check both run on the
/// same device that is being gated.
#[must_use]
pub fn embedded_directory() -> Vec<CredentialRecord> {
    vec![CredentialRecord::new(
        "veinarous",
        "7507fa0c4969976e4baacf589f16e908faa2ba3aa6649051e7e608175b3dd823",
    )]
}

/// How the credential directory was resolved.
///
/// There is no empty arm: the embedded list always exists, so the worst case
/// is falling back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryOutcome {
    /// Fresh copy of `users.json`.
    Fetched(Vec<CredentialRecord>),
    /// Fetch failed or the body was malformed; embedded list in use.
    Fallback(Vec<CredentialRecord>),
}

impl DirectoryOutcome {
    #[must_use]
    pub fn records(&self) -> &[CredentialRecord] {
        match self {
            DirectoryOutcome::Fetched(records) | DirectoryOutcome::Fallback(records) => records,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryDocument {
    users: Option<Vec<CredentialRecord>>,
}

/// Decode a `users.json` body.
///
/// # Errors
///
/// Returns `FetchError::Malformed` if the body is not JSON or carries no
/// `users` array.
pub(crate) fn decode_directory(body: &str) -> Result<Vec<CredentialRecord>, FetchError> {
    let doc: DirectoryDocument = serde_json::from_str(body).map_err(|_| FetchError::Malformed)?;
    doc.users.ok_or(FetchError::Malformed)
}

/// Loads the credential allow-list from `{base}/data/users.json`, falling
/// back to the embedded list on any failure. Loading never errors.
#[derive(Clone)]
pub struct CredentialDirectory {
    client: Client,
    base_url: String,
}

impl CredentialDirectory {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve the allow-list, best effort.
    pub async fn load(&self) -> DirectoryOutcome {
        match self.try_fetch().await {
            Ok(records) => DirectoryOutcome::Fetched(records),
            Err(err) => {
                warn!(%err, "users.json unavailable, using embedded credential list");
                DirectoryOutcome::Fallback(embedded_directory())
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<CredentialRecord>, FetchError> {
        let url = format!("{}/data/users.json", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        decode_directory(&body)
    }
}
