//! REST binding of the gateway traits.
//!
//! Wire-level behavior is owned by the backend's client contract; this
//! module is a thin `reqwest` mapping of each capability onto the JSON
//! endpoints under `/v1/projects/{project}`.  No retries and no timeouts:
//! every call is issued exactly once and the caller's loading flag is the
//! only in-flight guard.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::blobs::BlobStore;
use crate::config::GatewayConfig;
use crate::docs::{Direction, Document, DocumentStore, Query, UpdatePatch};
use crate::error::GatewayError;
use crate::identity::{FederatedProvider, IdentityProvider, ProfileUpdate};
use crate::Result;
use owitter_shared::AuthUser;

/// HTTP client for the hosted backend.  Cheap to clone; holds a shared
/// `reqwest::Client` connection pool.
#[derive(Debug, Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<Document>,
}

#[derive(Deserialize)]
struct UrlResponse {
    url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    paths: Vec<String>,
}

impl RestGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.config.api_url, self.config.project_id, suffix
        )
    }

    fn auth_endpoint(&self, suffix: &str) -> String {
        format!("{}/v1/auth/{}", self.config.api_url, suffix)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(resp.url().path().to_string()));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthenticated);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Provider {
            code: status.as_u16().to_string(),
            message: provider_message(&body),
        })
    }
}

/// Pull the human-readable message out of an error body.  The backend sends
/// `{"error": {"message": "..."}}`; anything else is passed through raw.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "provider error".to_string()
            } else {
                body.to_string()
            }
        })
}

fn query_body(query: &Query) -> Value {
    let mut body = json!({});
    if let Some((field, value)) = &query.filter {
        body["filter"] = json!({ "field": field, "equals": value });
    }
    if let Some((field, direction)) = &query.order_by {
        let dir = match direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        body["orderBy"] = json!({ "field": field, "direction": dir });
    }
    if let Some(limit) = query.limit {
        body["limit"] = json!(limit);
    }
    body
}

impl DocumentStore for RestGateway {
    async fn create(&self, collection: &str, fields: Value) -> Result<String> {
        let url = self.endpoint(&format!("documents/{collection}"));
        let resp = self.apply_auth(self.http.post(&url).json(&fields)).send().await?;
        let created: CreateResponse = Self::check(resp).await?.json().await?;
        debug!(collection, id = %created.id, "Created document");
        Ok(created.id)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let url = self.endpoint(&format!("documents/{}:query", query.collection));
        let resp = self
            .apply_auth(self.http.post(&url).json(&query_body(query)))
            .send()
            .await?;
        let found: QueryResponse = Self::check(resp).await?.json().await?;
        debug!(
            collection = %query.collection,
            count = found.documents.len(),
            "Query returned"
        );
        Ok(found.documents)
    }

    async fn update(&self, collection: &str, id: &str, patch: &UpdatePatch) -> Result<()> {
        let url = self.endpoint(&format!("documents/{collection}/{id}"));
        let body = json!({
            "set": patch.set_fields(),
            "delete": patch.deleted_fields(),
        });
        let resp = self.apply_auth(self.http.patch(&url).json(&body)).send().await?;
        Self::check(resp).await?;
        debug!(collection, id, "Updated document");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("documents/{collection}/{id}"));
        let resp = self.apply_auth(self.http.delete(&url)).send().await?;
        Self::check(resp).await?;
        debug!(collection, id, "Deleted document");
        Ok(())
    }
}

impl BlobStore for RestGateway {
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let url = self.endpoint("blobs");
        let resp = self
            .apply_auth(self.http.put(&url).query(&[("path", path)]))
            .body(bytes.to_vec())
            .send()
            .await?;
        Self::check(resp).await?;
        debug!(path, size = bytes.len(), "Uploaded blob");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let url = self.endpoint("blob-url");
        let resp = self
            .apply_auth(self.http.get(&url).query(&[("path", path)]))
            .send()
            .await?;
        let found: UrlResponse = Self::check(resp).await?.json().await?;
        Ok(found.url)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint("blobs");
        let resp = self
            .apply_auth(self.http.delete(&url).query(&[("path", path)]))
            .send()
            .await?;
        Self::check(resp).await?;
        debug!(path, "Deleted blob");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let url = self.endpoint("blobs");
        let resp = self
            .apply_auth(self.http.get(&url).query(&[("prefix", prefix)]))
            .send()
            .await?;
        let found: ListResponse = Self::check(resp).await?.json().await?;
        Ok(found.paths)
    }
}

impl IdentityProvider for RestGateway {
    async fn sign_in(&self, provider: FederatedProvider) -> Result<AuthUser> {
        let url = self.auth_endpoint("sign-in");
        let body = json!({ "provider": provider.id() });
        let resp = self.apply_auth(self.http.post(&url).json(&body)).send().await?;
        let user: AuthUser = Self::check(resp).await?.json().await?;
        debug!(uid = %user.uid, "Signed in");
        Ok(user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser> {
        let url = self.auth_endpoint("profile");
        let resp = self.apply_auth(self.http.patch(&url).json(update)).send().await?;
        let user: AuthUser = Self::check(resp).await?.json().await?;
        debug!(uid = %user.uid, "Profile updated");
        Ok(user)
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let url = self.auth_endpoint("password-reset");
        let body = json!({ "email": email });
        let resp = self.apply_auth(self.http.post(&url).json(&body)).send().await?;
        Self::check(resp).await?;
        debug!("Password reset email requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_include_project() {
        let gw = RestGateway::new(GatewayConfig::default());
        assert_eq!(
            gw.endpoint("documents/tweets"),
            "http://127.0.0.1:8080/v1/projects/owitter-dev/documents/tweets"
        );
        assert_eq!(
            gw.auth_endpoint("sign-in"),
            "http://127.0.0.1:8080/v1/auth/sign-in"
        );
    }

    #[test]
    fn provider_message_prefers_structured_body() {
        let body = r#"{"error": {"message": "auth/popup-closed-by-user"}}"#;
        assert_eq!(provider_message(body), "auth/popup-closed-by-user");
        assert_eq!(provider_message("plain failure"), "plain failure");
        assert_eq!(provider_message(""), "provider error");
    }

    #[test]
    fn query_body_encodes_all_clauses() {
        let q = Query::collection("tweets")
            .where_eq("userId", "u1")
            .order_by("createdAt", Direction::Desc)
            .limit(25);
        let body = query_body(&q);
        assert_eq!(body["filter"]["field"], "userId");
        assert_eq!(body["orderBy"]["direction"], "desc");
        assert_eq!(body["limit"], 25);
    }
}
