//! Scripted in-memory HTTP backend for unit tests.
//!
//! Replies are queued per `"<METHOD> <path>"` key and consumed in order. A
//! gated reply suspends the request until the test releases it, which is how
//! race tests interleave bootstrap, login and invalidation.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::http::{HttpBackend, HttpRequest, HttpResponse, Method};
use super::transport::ApiTransport;
use crate::config::ClientConfig;
use crate::util::credentials::{CredentialStore, MemoryCredentials};

pub const TEST_BASE_URL: &str = "http://api.test";

type Reply = Result<HttpResponse, String>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Releases a gated reply.
pub struct Gate(oneshot::Sender<Reply>);

impl Gate {
    pub fn respond(self, status: u16, body: serde_json::Value) {
        let _ = self.0.send(Ok(HttpResponse::new(status, body.to_string())));
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    replies: RefCell<HashMap<String, VecDeque<Scripted>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

fn key(method: Method, path: &str) -> String {
    format!("{} {path}", method.as_str())
}

impl ScriptedBackend {
    pub fn reply(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Scripted::Ready(Ok(HttpResponse::new(status, body.to_string()))));
    }

    pub fn fail(&self, method: Method, path: &str, error: &str) {
        self.push(method, path, Scripted::Ready(Err(error.to_owned())));
    }

    pub fn gate(&self, method: Method, path: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gated(rx));
        Gate(tx)
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.replies.borrow_mut().entry(key(method, path)).or_default().push_back(scripted);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpBackend for ScriptedBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let path = request.url.strip_prefix(TEST_BASE_URL).unwrap_or(&request.url).to_owned();
        let k = key(request.method, &path);
        self.requests.borrow_mut().push(request);
        let next = self.replies.borrow_mut().get_mut(&k).and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| Err("gate dropped".to_owned())),
            None => Err(format!("no scripted reply for {k}")),
        }
    }
}

/// Transport wired to a scripted backend and an in-memory store.
pub struct Harness {
    pub backend: Rc<ScriptedBackend>,
    pub store: Rc<MemoryCredentials>,
    pub transport: Rc<ApiTransport>,
}

impl Harness {
    pub fn new(token: Option<&str>) -> Self {
        let backend = Rc::new(ScriptedBackend::default());
        let store = Rc::new(token.map_or_else(MemoryCredentials::default, MemoryCredentials::with_token));
        let config = ClientConfig::from_raw(Some(TEST_BASE_URL));
        let transport = Rc::new(ApiTransport::new(
            &config,
            backend.clone(),
            store.clone() as Rc<dyn CredentialStore>,
        ));
        Self { backend, store, transport }
    }
}

pub fn link_json(id: &str, url: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "originalUrl": url,
        "shortUrl": format!("http://localhost:5000/{id}"),
        "shortCode": id,
        "clicks": 0,
        "createdAt": "2026-10-15T12:00:00Z",
        "isActive": true
    })
}

pub fn user_json(username: &str) -> serde_json::Value {
    serde_json::json!({ "_id": format!("u-{username}"), "username": username, "email": format!("{username}@example.com") })
}
