//! Test doubles shared by the unit tests of this crate.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use http::{Method, StatusCode};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::playback::{Attachment, QualitySelection, StreamEvent, StreamingBackend, StreamingSession};
use crate::session::{CredentialStore, Session};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub const API_BASE: &str = "http://api.test";

/// Replays canned responses keyed by method and path. The last response queued for a route is
/// repeated once the queue runs dry. Unknown routes answer `404`.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
    offline: Cell<bool>,
}

impl MockTransport {
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        let response = HttpResponse {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.to_string(),
        };
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.trim_start_matches(API_BASE)))
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline.get() {
            return Err(TransportError("network unreachable".to_string()));
        }

        let path = request.url.trim_start_matches(API_BASE).to_string();
        let mut routes = self.routes.borrow_mut();
        let Some(queue) = routes.get_mut(&(request.method.clone(), path)) else {
            return Ok(HttpResponse {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            });
        };

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(response.expect("routes always hold at least one response"))
    }
}

pub fn client_for(transport: &Rc<MockTransport>, token: Option<&str>) -> ApiClient<Rc<MockTransport>> {
    let config = ClientConfig {
        api_base: API_BASE.parse().expect("valid uri"),
        ..ClientConfig::default()
    };
    let client = ApiClient::new(Rc::new(config), Rc::clone(transport));
    match token {
        Some(token) => client.with_session(Session::new(token)),
        None => client,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    token: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) -> Result<()> {
        self.token.replace(Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.replace(None);
        Ok(())
    }
}

/// Records the lifetime of every streaming session it hands out.
#[derive(Default)]
pub struct StreamLog {
    pub live: Cell<usize>,
    pub max_live: Cell<usize>,
    pub created: RefCell<Vec<String>>,
    pub destroyed: RefCell<Vec<String>>,
    pub quality: RefCell<Vec<QualitySelection>>,
    pub listeners: RefCell<Vec<Rc<dyn Fn(StreamEvent)>>>,
    pub native_detached: Cell<usize>,
}

pub struct MockSession {
    url: String,
    log: Rc<StreamLog>,
}

impl StreamingSession for MockSession {
    fn set_quality(&self, selection: QualitySelection) {
        self.log.quality.borrow_mut().push(selection);
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.log.live.set(self.log.live.get() - 1);
        self.log.destroyed.borrow_mut().push(self.url.clone());
    }
}

pub struct MockBackend {
    pub log: Rc<StreamLog>,
    pub adaptive: bool,
    pub native: bool,
}

impl MockBackend {
    pub fn adaptive() -> Self {
        Self {
            log: Rc::default(),
            adaptive: true,
            native: false,
        }
    }
}

impl StreamingBackend for MockBackend {
    type Session = MockSession;

    fn attach(
        &self,
        url: &str,
        on_event: Rc<dyn Fn(StreamEvent)>,
    ) -> Result<Attachment<MockSession>> {
        if self.adaptive {
            let live = self.log.live.get() + 1;
            self.log.live.set(live);
            self.log.max_live.set(self.log.max_live.get().max(live));
            self.log.created.borrow_mut().push(url.to_string());
            self.log.listeners.borrow_mut().push(on_event);
            Ok(Attachment::Adaptive(MockSession {
                url: url.to_string(),
                log: Rc::clone(&self.log),
            }))
        } else if self.native {
            Ok(Attachment::Native)
        } else {
            Err(ClientError::Stream("HLS is not supported".to_string()))
        }
    }

    fn detach_native(&self) {
        self.log.native_detached.set(self.log.native_detached.get() + 1);
    }
}

/// Course `intro-js`: section "Basics" with `L1` and `L2`, section "Functions" with `L3`.
pub const COURSE_JSON: &str = r#"{
    "success": true,
    "course": {
        "_id": "c1",
        "slug": "intro-js",
        "title": "জাভাস্ক্রিপ্ট পরিচিতি",
        "price": 500,
        "sections": [
            {
                "_id": "s1",
                "title": "Basics",
                "lessons": [
                    { "_id": "L1", "title": "Welcome", "duration": "05:00", "videoUrl": "welcome.mp4" },
                    { "_id": "L2", "title": "Variables", "duration": "12:30", "videoUrl": "variables.mp4" }
                ]
            },
            {
                "_id": "s2",
                "title": "Functions",
                "lessons": [
                    { "_id": "L3", "title": "Closures", "videoUrl": "https://cdn.example.com/closures.m3u8" }
                ]
            }
        ]
    }
}"#;

pub fn course() -> shikkha_api::Course {
    let response: shikkha_api::api::courses::slug::get::Response =
        serde_json::from_str(COURSE_JSON).expect("valid course fixture");
    response.course
}

pub fn video_url_response(lesson: &str) -> String {
    format!(r#"{{"success": true, "playbackUrl": "https://cdn.example.com/{lesson}.m3u8"}}"#)
}
