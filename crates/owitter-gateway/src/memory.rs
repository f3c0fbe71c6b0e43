//! In-process gateway double for tests and local development.
//!
//! Implements all three capability traits against plain maps behind a
//! `Mutex`.  Every call is recorded so tests can assert exactly which remote
//! operations a workflow issued, and individual operations can be scripted
//! to fail once, which is how the accepted partial-failure states of the
//! multi-step mutations are exercised.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use uuid::Uuid;

use crate::blobs::BlobStore;
use crate::docs::{Direction, Document, DocumentStore, FieldPatch, Query, UpdatePatch};
use crate::error::GatewayError;
use crate::identity::{FederatedProvider, IdentityProvider, ProfileUpdate};
use crate::Result;
use owitter_shared::AuthUser;

/// Operations that can be scripted to fail (once each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    DocCreate,
    DocQuery,
    DocUpdate,
    DocDelete,
    BlobUpload,
    BlobUrl,
    BlobDelete,
    BlobList,
    SignIn,
    ProfileUpdate,
    PasswordReset,
}

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DocCreate { collection: String },
    DocQuery { collection: String },
    DocUpdate { collection: String, id: String, patch: UpdatePatch },
    DocDelete { collection: String, id: String },
    BlobUpload { path: String, size: usize },
    BlobUrl { path: String },
    BlobDelete { path: String },
    BlobList { prefix: String },
    SignIn,
    ProfileUpdate { update: ProfileUpdate },
    PasswordReset { email: String },
}

impl Call {
    /// Whether this call touched the blob store.
    pub fn is_blob_call(&self) -> bool {
        matches!(
            self,
            Call::BlobUpload { .. }
                | Call::BlobUrl { .. }
                | Call::BlobDelete { .. }
                | Call::BlobList { .. }
        )
    }

    /// Whether this call wrote to the document store.
    pub fn is_doc_write(&self) -> bool {
        matches!(
            self,
            Call::DocCreate { .. } | Call::DocUpdate { .. } | Call::DocDelete { .. }
        )
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, Value>>,
    blobs: BTreeMap<String, Vec<u8>>,
    user: Option<AuthUser>,
    sign_in_error: Option<String>,
    reset_emails: Vec<String>,
    fail_next: HashSet<FailPoint>,
    calls: Vec<Call>,
}

/// In-memory gateway implementing [`DocumentStore`], [`BlobStore`] and
/// [`IdentityProvider`].
#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway with a signed-in account already scripted.
    pub fn with_user(user: AuthUser) -> Self {
        let gw = Self::new();
        gw.lock().user = Some(user);
        gw
    }

    /// Script the next occurrence of `point` to fail with a provider error.
    pub fn fail_next(&self, point: FailPoint) {
        self.lock().fail_next.insert(point);
    }

    /// Script the provider error message returned by the next sign-in.
    pub fn deny_sign_in(&self, message: &str) {
        self.lock().sign_in_error = Some(message.to_string());
    }

    // -- test observation helpers --

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().blobs.get(path).cloned()
    }

    pub fn signed_in_user(&self) -> Option<AuthUser> {
        self.lock().user.clone()
    }

    pub fn reset_emails(&self) -> Vec<String> {
        self.lock().reset_emails.clone()
    }

    /// Seed a document with a fixed id, bypassing call recording.
    pub fn seed_document(&self, collection: &str, id: &str, fields: Value) {
        self.lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Seed a blob, bypassing call recording.
    pub fn seed_blob(&self, path: &str, bytes: Vec<u8>) {
        self.lock().blobs.insert(path.to_string(), bytes);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("gateway state lock poisoned")
    }

    fn trip(inner: &mut Inner, point: FailPoint) -> Result<()> {
        if inner.fail_next.remove(&point) {
            return Err(GatewayError::provider(
                "unavailable",
                format!("scripted failure at {point:?}"),
            ));
        }
        Ok(())
    }
}

fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

impl DocumentStore for MemoryGateway {
    async fn create(&self, collection: &str, fields: Value) -> Result<String> {
        let mut inner = self.lock();
        inner.calls.push(Call::DocCreate {
            collection: collection.to_string(),
        });
        Self::trip(&mut inner, FailPoint::DocCreate)?;

        let id = Uuid::new_v4().to_string();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let mut inner = self.lock();
        inner.calls.push(Call::DocQuery {
            collection: query.collection.clone(),
        });
        Self::trip(&mut inner, FailPoint::DocQuery)?;

        let mut docs: Vec<Document> = inner
            .collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, value)) = &query.filter {
            docs.retain(|doc| doc.fields.get(field) == Some(value));
        }
        if let Some((field, direction)) = &query.order_by {
            docs.sort_by(|a, b| {
                let ord = order_values(a.fields.get(field), b.fields.get(field));
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn update(&self, collection: &str, id: &str, patch: &UpdatePatch) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::DocUpdate {
            collection: collection.to_string(),
            id: id.to_string(),
            patch: patch.clone(),
        });
        Self::trip(&mut inner, FailPoint::DocUpdate)?;

        let doc = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| GatewayError::NotFound(format!("{collection}/{id}")))?;
        let map = doc
            .as_object_mut()
            .ok_or_else(|| GatewayError::NotFound(format!("{collection}/{id}")))?;
        for (field, entry) in patch.entries() {
            match entry {
                FieldPatch::Set(value) => {
                    map.insert(field.to_string(), value.clone());
                }
                FieldPatch::Delete => {
                    map.remove(field);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::DocDelete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        Self::trip(&mut inner, FailPoint::DocDelete)?;

        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        match removed {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound(format!("{collection}/{id}"))),
        }
    }
}

impl BlobStore for MemoryGateway {
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::BlobUpload {
            path: path.to_string(),
            size: bytes.len(),
        });
        Self::trip(&mut inner, FailPoint::BlobUpload)?;

        inner.blobs.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let mut inner = self.lock();
        inner.calls.push(Call::BlobUrl {
            path: path.to_string(),
        });
        Self::trip(&mut inner, FailPoint::BlobUrl)?;

        if !inner.blobs.contains_key(path) {
            return Err(GatewayError::NotFound(path.to_string()));
        }
        Ok(format!("https://blobs.invalid/{path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::BlobDelete {
            path: path.to_string(),
        });
        Self::trip(&mut inner, FailPoint::BlobDelete)?;

        match inner.blobs.remove(path) {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound(path.to_string())),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut inner = self.lock();
        inner.calls.push(Call::BlobList {
            prefix: prefix.to_string(),
        });
        Self::trip(&mut inner, FailPoint::BlobList)?;

        Ok(inner
            .blobs
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl IdentityProvider for MemoryGateway {
    async fn sign_in(&self, _provider: FederatedProvider) -> Result<AuthUser> {
        let mut inner = self.lock();
        inner.calls.push(Call::SignIn);
        Self::trip(&mut inner, FailPoint::SignIn)?;
        if let Some(message) = inner.sign_in_error.take() {
            return Err(GatewayError::provider("auth", message));
        }
        inner
            .user
            .clone()
            .ok_or_else(|| GatewayError::provider("auth", "no scripted account"))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser> {
        let mut inner = self.lock();
        inner.calls.push(Call::ProfileUpdate {
            update: update.clone(),
        });
        Self::trip(&mut inner, FailPoint::ProfileUpdate)?;

        let user = inner.user.as_mut().ok_or(GatewayError::Unauthenticated)?;
        if let Some(name) = &update.display_name {
            user.display_name = Some(name.clone());
        }
        if let Some(url) = &update.photo_url {
            user.photo_url = Some(url.clone());
        }
        Ok(user.clone())
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::PasswordReset {
            email: email.to_string(),
        });
        Self::trip(&mut inner, FailPoint::PasswordReset)?;

        inner.reset_emails.push(email.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owitter_shared::UserId;
    use serde_json::json;

    fn user() -> AuthUser {
        AuthUser {
            uid: UserId::new("u1"),
            display_name: Some("ada".into()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn create_update_delete_round_trip() {
        let gw = MemoryGateway::new();
        let id = gw
            .create("tweets", json!({ "tweet": "hello" }))
            .await
            .unwrap();

        let patch = UpdatePatch::new().set("tweet", "world");
        gw.update("tweets", &id, &patch).await.unwrap();
        assert_eq!(gw.document("tweets", &id).unwrap()["tweet"], "world");

        DocumentStore::delete(&gw, "tweets", &id).await.unwrap();
        assert!(gw.document("tweets", &id).is_none());
    }

    #[tokio::test]
    async fn delete_patch_removes_field() {
        let gw = MemoryGateway::new();
        gw.seed_document("tweets", "t1", json!({ "tweet": "hi", "photo": "url" }));

        let patch = UpdatePatch::new().delete_field("photo");
        gw.update("tweets", "t1", &patch).await.unwrap();
        assert!(gw.document("tweets", "t1").unwrap().get("photo").is_none());
    }

    #[tokio::test]
    async fn query_filters_orders_and_limits() {
        let gw = MemoryGateway::new();
        for (id, uid, at) in [("a", "u1", 3i64), ("b", "u2", 2), ("c", "u1", 1), ("d", "u1", 5)] {
            gw.seed_document(
                "tweets",
                id,
                json!({ "userId": uid, "createdAt": at }),
            );
        }

        let q = Query::collection("tweets")
            .where_eq("userId", "u1")
            .order_by("createdAt", Direction::Desc)
            .limit(2);
        let docs = gw.query(&q).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);
    }

    #[tokio::test]
    async fn scripted_failure_fires_once() {
        let gw = MemoryGateway::new();
        gw.seed_blob("avatars/u1", vec![1, 2, 3]);
        gw.fail_next(FailPoint::BlobUpload);

        assert!(gw.upload("avatars/u1", &[9]).await.is_err());
        assert!(gw.upload("avatars/u1", &[9]).await.is_ok());
        assert_eq!(gw.blob("avatars/u1").unwrap(), vec![9]);
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let gw = MemoryGateway::with_user(user());
        gw.seed_blob("avatars/u1", vec![1]);

        gw.download_url("avatars/u1").await.unwrap();
        gw.send_password_reset("a@b.c").await.unwrap();

        let calls = gw.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].is_blob_call());
        assert_eq!(
            calls[1],
            Call::PasswordReset {
                email: "a@b.c".into()
            }
        );
    }

    #[tokio::test]
    async fn profile_update_mutates_scripted_account() {
        let gw = MemoryGateway::with_user(user());
        let updated = gw
            .update_profile(&ProfileUpdate::display_name("grace"))
            .await
            .unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("grace"));
        assert_eq!(
            gw.signed_in_user().unwrap().display_name.as_deref(),
            Some("grace")
        );
    }
}
