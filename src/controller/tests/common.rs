use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use crate::client::PokedexClient;
use crate::config::BrowserConfig;
use crate::controller::BrowserController;
use crate::transport::{HttpResponse, Transport, TransportError};

pub const TEST_API_BASE: &str = "http://api.test";

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Debug, Clone)]
struct Route {
    path: String,
    query_fragment: Option<String>,
    reply: Reply,
    delay: Duration,
}

#[derive(Debug, Default)]
struct FakeState {
    routes: Vec<Route>,
    requests: Vec<String>,
}

/// In-memory transport. Routes match on URL path (and optionally a query
/// substring); the most recently registered match wins, and unmatched
/// requests answer 404.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_route(&self, route: Route) {
        self.state.lock().unwrap().routes.push(route);
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.add_route(Route {
            path: path.to_string(),
            query_fragment: None,
            reply: Reply::Response(HttpResponse::new(status, body)),
            delay: Duration::ZERO,
        });
    }

    pub fn respond_json(&self, path: &str, body: Value) {
        self.respond(path, 200, &body.to_string());
    }

    /// Answers requests whose query contains `fragment`, after `delay`.
    pub fn respond_matching(&self, path: &str, fragment: &str, delay: Duration, body: Value) {
        self.add_route(Route {
            path: path.to_string(),
            query_fragment: Some(fragment.to_string()),
            reply: Reply::Response(HttpResponse::new(200, body.to_string())),
            delay,
        });
    }

    /// Answers every request to `path` after `delay`.
    pub fn respond_after(&self, path: &str, delay: Duration, status: u16, body: Value) {
        self.add_route(Route {
            path: path.to_string(),
            query_fragment: None,
            reply: Reply::Response(HttpResponse::new(status, body.to_string())),
            delay,
        });
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.add_route(Route {
            path: path.to_string(),
            query_fragment: None,
            reply: Reply::Failure(message.to_string()),
            delay: Duration::ZERO,
        });
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requested URLs whose path is exactly `path`.
    pub fn requests_to(&self, path: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|url| split_url(url).0 == path)
            .collect()
    }
}

fn split_url(url: &str) -> (String, String) {
    let parsed = url::Url::parse(url).expect("fake transport expects absolute urls");
    (
        parsed.path().to_string(),
        parsed.query().unwrap_or_default().to_string(),
    )
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let (path, query) = split_url(url);
        let route = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(url.to_string());
            state
                .routes
                .iter()
                .rev()
                .find(|route| {
                    route.path == path
                        && route
                            .query_fragment
                            .as_ref()
                            .map_or(true, |fragment| query.contains(fragment.as_str()))
                })
                .cloned()
        };

        let Some(route) = route else {
            return Ok(HttpResponse::new(404, ""));
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        match route.reply {
            Reply::Response(response) => Ok(response),
            Reply::Failure(message) => Err(TransportError(message)),
        }
    }
}

/// A detailed list entry as the backend returns it.
pub fn entry(id: u32, name: &str, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "types": types,
        "sprites": { "front_default": format!("https://img.test/{}.png", id) },
    })
}

/// A paginated envelope with links derived from `offset`, `limit`, `count`.
pub fn envelope(results: Vec<Value>, count: u64, offset: u64, limit: u64) -> Value {
    let link = |o: u64| format!("{}/pokemon?limit={}&offset={}", TEST_API_BASE, limit, o);
    json!({
        "count": count,
        "next": if offset + limit < count { Value::from(link(offset + limit)) } else { Value::Null },
        "previous": if offset > 0 { Value::from(link(offset.saturating_sub(limit))) } else { Value::Null },
        "results": results,
    })
}

pub fn test_config() -> BrowserConfig {
    BrowserConfig {
        api_base: TEST_API_BASE.to_string(),
        ..BrowserConfig::default()
    }
}

/// A controller over `fake` with the types endpoint already stubbed.
pub fn controller_with(fake: &FakeTransport) -> BrowserController<FakeTransport> {
    fake.respond_json("/pokemon/types", json!(["grass", "poison", "fire", "electric"]));
    let client = PokedexClient::new(fake.clone(), TEST_API_BASE);
    BrowserController::new(client, &test_config())
}

pub fn card_names<T: Transport>(controller: &BrowserController<T>) -> Vec<String> {
    controller
        .list_view()
        .cards
        .iter()
        .map(|card| card.name.clone())
        .collect()
}
