//! In-memory Admin API: consumers plus jwt, key-auth and basic-auth credentials.

#![allow(dead_code)]

use async_trait::async_trait;
use kong_reconcile::{ApiRequest, ApiResponse, Transport, TransportError};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const CONSUMER_FIELDS: &[&str] = &["username", "custom_id"];

fn credential_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        "jwt" => &["key", "algorithm", "rsa_public_key", "secret"],
        "key-auth" => &["key"],
        "basic-auth" => &["username", "password"],
        _ => &[],
    }
}

#[derive(Clone, Debug)]
struct Credential {
    consumer: String,
    collection: String,
    fields: Map<String, Value>,
}

#[derive(Default)]
pub struct FakeKong {
    consumers: Mutex<HashMap<String, Map<String, Value>>>,
    credentials: Mutex<HashMap<String, Credential>>,
    requests: AtomicUsize,
}

impl FakeKong {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn consumer(&self, id: &str) -> Option<Value> {
        self.consumers.lock().unwrap().get(id).map(|c| render(id, c, None))
    }

    pub fn credential(&self, id: &str) -> Option<Value> {
        self.credentials
            .lock()
            .unwrap()
            .get(id)
            .map(|c| render(id, &c.fields, Some(&c.consumer)))
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.lock().unwrap().len()
    }

    /// Remove a consumer behind the reconciler's back.
    pub fn drop_consumer(&self, id: &str) {
        self.consumers.lock().unwrap().remove(id);
        self.credentials.lock().unwrap().retain(|_, c| c.consumer != id);
    }

    fn route(&self, req: &ApiRequest) -> ApiResponse {
        let parts: Vec<&str> = req.path.as_str().split('/').collect();
        let body = req.body.clone().and_then(|b| b.as_object().cloned()).unwrap_or_default();
        match (req.method.as_str(), parts.as_slice()) {
            ("POST", ["consumers", ""]) => self.create_consumer(body),
            ("GET", ["consumers", id]) => self.get_consumer(id),
            ("PATCH", ["consumers", id]) => self.patch_consumer(id, body),
            ("DELETE", ["consumers", id]) => self.delete_consumer(id),
            ("POST", ["consumers", owner, coll, ""]) => self.create_credential(owner, coll, body),
            ("GET", ["consumers", owner, coll, id]) => self.with_credential(owner, coll, id, |c, id| {
                ApiResponse::json_body(StatusCode::OK, &render(id, &c.fields, Some(&c.consumer)))
            }),
            ("PATCH", ["consumers", owner, coll, id]) => self.patch_credential(owner, coll, id, body),
            ("DELETE", ["consumers", owner, coll, id]) => {
                let resp = self.with_credential(owner, coll, id, |_, _| ApiResponse::empty(StatusCode::NO_CONTENT));
                if resp.status == StatusCode::NO_CONTENT {
                    self.credentials.lock().unwrap().remove(*id);
                }
                resp
            }
            _ => not_found(),
        }
    }

    fn create_consumer(&self, body: Map<String, Value>) -> ApiResponse {
        let fields = pick(&body, CONSUMER_FIELDS);
        if fields.is_empty() {
            return ApiResponse::json_body(
                StatusCode::BAD_REQUEST,
                &json!({ "message": "at least one of these fields must be non-empty: 'custom_id', 'username'" }),
            );
        }
        let mut consumers = self.consumers.lock().unwrap();
        if let Some(resp) = unique_violation(consumers.values(), &fields, CONSUMER_FIELDS) {
            return resp;
        }
        let id = uuid::Uuid::new_v4().to_string();
        consumers.insert(id.clone(), fields.clone());
        ApiResponse::json_body(StatusCode::CREATED, &render(&id, &fields, None))
    }

    fn get_consumer(&self, id: &str) -> ApiResponse {
        match self.consumers.lock().unwrap().get(id) {
            Some(c) => ApiResponse::json_body(StatusCode::OK, &render(id, c, None)),
            None => not_found(),
        }
    }

    fn patch_consumer(&self, id: &str, body: Map<String, Value>) -> ApiResponse {
        let mut consumers = self.consumers.lock().unwrap();
        let Some(existing) = consumers.get_mut(id) else {
            return not_found();
        };
        existing.extend(pick(&body, CONSUMER_FIELDS));
        let rendered = render(id, existing, None);
        ApiResponse::json_body(StatusCode::OK, &rendered)
    }

    fn delete_consumer(&self, id: &str) -> ApiResponse {
        if self.consumers.lock().unwrap().remove(id).is_none() {
            return not_found();
        }
        self.credentials.lock().unwrap().retain(|_, c| c.consumer != id);
        ApiResponse::empty(StatusCode::NO_CONTENT)
    }

    fn create_credential(&self, owner: &str, collection: &str, body: Map<String, Value>) -> ApiResponse {
        let allowed = credential_fields(collection);
        if allowed.is_empty() || !self.consumers.lock().unwrap().contains_key(owner) {
            return not_found();
        }
        let mut fields = pick(&body, allowed);
        match collection {
            "jwt" => {
                fields.entry("key").or_insert_with(|| Value::String(uuid::Uuid::new_v4().simple().to_string()));
                fields.entry("secret").or_insert_with(|| Value::String(uuid::Uuid::new_v4().simple().to_string()));
                fields.entry("algorithm").or_insert_with(|| json!("HS256"));
            }
            "key-auth" => {
                fields.entry("key").or_insert_with(|| Value::String(uuid::Uuid::new_v4().simple().to_string()));
            }
            _ => {}
        }
        let mut credentials = self.credentials.lock().unwrap();
        let siblings = credentials
            .values()
            .filter(|c| c.collection == collection)
            .map(|c| &c.fields);
        let unique: &[&str] = if collection == "basic-auth" { &["username"] } else { &["key"] };
        if let Some(resp) = unique_violation(siblings, &fields, unique) {
            return resp;
        }
        let id = uuid::Uuid::new_v4().to_string();
        credentials.insert(
            id.clone(),
            Credential {
                consumer: owner.to_string(),
                collection: collection.to_string(),
                fields: fields.clone(),
            },
        );
        ApiResponse::json_body(StatusCode::CREATED, &render(&id, &fields, Some(owner)))
    }

    fn patch_credential(&self, owner: &str, collection: &str, id: &str, body: Map<String, Value>) -> ApiResponse {
        let mut credentials = self.credentials.lock().unwrap();
        match credentials.get_mut(id) {
            Some(c) if c.consumer == owner && c.collection == collection => {
                c.fields.extend(pick(&body, credential_fields(collection)));
                ApiResponse::json_body(StatusCode::OK, &render(id, &c.fields, Some(owner)))
            }
            _ => not_found(),
        }
    }

    fn with_credential<F>(&self, owner: &str, collection: &str, id: &str, f: F) -> ApiResponse
    where
        F: FnOnce(&Credential, &str) -> ApiResponse,
    {
        let credentials = self.credentials.lock().unwrap();
        match credentials.get(id) {
            Some(c) if c.consumer == owner && c.collection == collection => f(c, id),
            _ => not_found(),
        }
    }
}

#[async_trait]
impl Transport for FakeKong {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = &request.body {
            assert!(body.get("consumer").is_none(), "owner reference leaked into body: {}", body);
        }
        Ok(self.route(&request))
    }
}

fn pick(body: &Map<String, Value>, allowed: &[&str]) -> Map<String, Value> {
    body.iter()
        .filter(|(k, v)| allowed.contains(&k.as_str()) && !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Kong reports unset fields as null and embeds the owning consumer as an object.
fn render(id: &str, fields: &Map<String, Value>, consumer: Option<&str>) -> Value {
    let mut out = Map::new();
    out.insert("id".into(), json!(id));
    out.insert("created_at".into(), json!(1_700_000_000));
    out.insert("tags".into(), Value::Null);
    let names: &[&str] = match consumer {
        None => CONSUMER_FIELDS,
        Some(_) => &[],
    };
    for name in names {
        out.insert((*name).into(), Value::Null);
    }
    for (k, v) in fields {
        out.insert(k.clone(), v.clone());
    }
    if let Some(c) = consumer {
        out.insert("consumer".into(), json!({ "id": c }));
    }
    Value::Object(out)
}

fn unique_violation<'a, I>(existing: I, fields: &Map<String, Value>, unique: &[&str]) -> Option<ApiResponse>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    for other in existing {
        for name in unique {
            if let (Some(a), Some(b)) = (fields.get(*name), other.get(*name)) {
                if a == b {
                    return Some(ApiResponse::json_body(
                        StatusCode::CONFLICT,
                        &json!({
                            "message": format!("UNIQUE violation detected on '{{{}={}}}'", name, a),
                            "name": "unique constraint violation",
                            "code": 5
                        }),
                    ));
                }
            }
        }
    }
    None
}

fn not_found() -> ApiResponse {
    ApiResponse::json_body(StatusCode::NOT_FOUND, &json!({ "message": "Not found" }))
}
