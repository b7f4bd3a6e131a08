use std::fmt;

use gloo_timers::callback::Interval;
use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::types::Supplement;

const SUPABASE_URL: &str = "https://xkvqtbzprmwyjdnahfoe.supabase.co";
const SUPABASE_KEY: &str = "sb_publishable_WqK4nR8sYm2vTcEj9pLh3A_xGuBd7fQ";

const TABLE: &str = "supplements";

// ============ CLIENT ============

/// Read-only handle to the supplements table. Constructed once at app
/// start and passed into each page component; `None` from `new` means
/// the backend is unreachable by configuration and is an expected
/// outcome, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    base_url: String,
    anon_key: String,
}

impl Client {
    pub fn new() -> Option<Self> {
        web_sys::window()?;
        if !SUPABASE_URL.starts_with("https://") || SUPABASE_KEY.is_empty() {
            return None;
        }
        Some(Self {
            base_url: SUPABASE_URL.to_string(),
            anon_key: SUPABASE_KEY.to_string(),
        })
    }

    fn headers(&self) -> Result<Headers, JsValue> {
        let headers = Headers::new()?;
        headers.set("apikey", &self.anon_key)?;
        headers.set("Authorization", &format!("Bearer {}", self.anon_key))?;
        headers.set("Content-Type", "application/json")?;
        Ok(headers)
    }

    fn table_url(&self, filters: &str) -> String {
        format!("{}/rest/v1/{}?select=*{}", self.base_url, TABLE, filters)
    }

    async fn fetch_rows(&self, filters: &str) -> Result<Vec<Supplement>, QueryError> {
        let window =
            web_sys::window().ok_or_else(|| QueryError::Network("no window".to_string()))?;

        let headers = self
            .headers()
            .map_err(|_| QueryError::Network("failed to build headers".to_string()))?;
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);
        opts.set_headers(&JsValue::from(&headers));

        let request = Request::new_with_str_and_init(&self.table_url(filters), &opts)
            .map_err(|_| QueryError::Network("failed to create request".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| QueryError::Network("fetch failed".to_string()))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| QueryError::Network("invalid response".to_string()))?;

        match resp.status() {
            401 => return Err(QueryError::AuthFailed),
            403 => return Err(QueryError::PermissionDenied),
            status if !resp.ok() => return Err(QueryError::Http(status)),
            _ => {}
        }

        let json = JsFuture::from(
            resp.json()
                .map_err(|_| QueryError::Decode("no response body".to_string()))?,
        )
        .await
        .map_err(|_| QueryError::Decode("response body read failed".to_string()))?;

        serde_wasm_bindgen::from_value(json).map_err(|e| QueryError::Decode(e.to_string()))
    }

    /// Single-row expect: an empty result is `NotFound`, a normal
    /// outcome distinct from every other failure.
    async fn fetch_single(&self, filters: &str) -> Result<Supplement, QueryError> {
        let rows = self.fetch_rows(&format!("{}&limit=1", filters)).await?;
        rows.into_iter().next().ok_or(QueryError::NotFound)
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Supplement, QueryError> {
        self.fetch_single(&format!("&id=eq.{}", id)).await
    }

    /// Canonical name lookup: web-style full-text search first, then a
    /// conjunctive case-insensitive partial match over every term.
    pub async fn fetch_by_name(&self, name: &str) -> Result<Supplement, QueryError> {
        let phrase = js_sys::encode_uri_component(&format!("\"{}\"", name));
        match self.fetch_single(&format!("&name=wfts.{}", phrase)).await {
            Ok(supplement) => return Ok(supplement),
            Err(QueryError::NotFound) => {}
            Err(other) => return Err(other),
        }

        let filters: String = search_terms(name)
            .iter()
            .map(|term| {
                let pattern = js_sys::encode_uri_component(&format!("*{}*", term));
                format!("&name=ilike.{}", pattern)
            })
            .collect();
        if filters.is_empty() {
            return Err(QueryError::NotFound);
        }
        self.fetch_single(&filters).await
    }

    pub async fn fetch_first(&self) -> Result<Supplement, QueryError> {
        self.fetch_single("").await
    }

    pub async fn fetch_all(&self) -> Result<Vec<Supplement>, QueryError> {
        self.fetch_rows("&order=name.asc").await
    }
}

// ============ ERRORS ============

/// Failure taxonomy for backend reads. `NotFound` is the recognized
/// empty-result outcome of a single-row expect; everything else is a
/// genuine query failure.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryError {
    NotFound,
    AuthFailed,
    PermissionDenied,
    Http(u16),
    Network(String),
    Decode(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NotFound => write!(f, "no row found"),
            QueryError::AuthFailed => write!(f, "authentication failed (401)"),
            QueryError::PermissionDenied => write!(f, "permission denied (403)"),
            QueryError::Http(status) => write!(f, "HTTP error: {}", status),
            QueryError::Network(detail) => write!(f, "network error: {}", detail),
            QueryError::Decode(detail) => write!(f, "decode error: {}", detail),
        }
    }
}

// ============ LOOKUP RESOLUTION ============

/// Which record a detail page shows, resolved from query parameters.
/// Precedence: integer `id`, then `slug`/`name` (normalized), then an
/// arbitrary first record.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    Id(i64),
    Name(String),
    First,
}

impl Lookup {
    pub fn from_params(id: Option<String>, slug: Option<String>, name: Option<String>) -> Lookup {
        if let Some(id) = id.as_deref().and_then(|raw| raw.trim().parse::<i64>().ok()) {
            return Lookup::Id(id);
        }
        match slug.or(name).as_deref().map(normalize_lookup_name) {
            Some(normalized) if !normalized.is_empty() => Lookup::Name(normalized),
            _ => Lookup::First,
        }
    }
}

/// Slug/name normalization: `+` and `-` become spaces, surrounding
/// whitespace is trimmed. Percent-decoding happens at the query-parameter
/// boundary, before this.
pub fn normalize_lookup_name(raw: &str) -> String {
    raw.replace(['+', '-'], " ").trim().to_string()
}

/// Lowercased whitespace-separated terms of a normalized lookup name.
pub fn search_terms(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

// ============ READINESS POLL ============

pub const READY_POLL_INTERVAL_MS: u32 = 500;
pub const READY_POLL_MAX_ATTEMPTS: u32 = 10;

/// Bounded fixed-interval wait for the backend client. No backoff, no
/// cancellation: it runs until the client appears or the cap is hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadyPoll {
    attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PollOutcome {
    Ready,
    Waiting,
    TimedOut,
}

impl ReadyPoll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, ready: bool) -> PollOutcome {
        if ready {
            return PollOutcome::Ready;
        }
        self.attempts += 1;
        if self.attempts >= READY_POLL_MAX_ATTEMPTS {
            PollOutcome::TimedOut
        } else {
            PollOutcome::Waiting
        }
    }
}

/// Run `on_ready` as soon as the client handle is available, checking
/// immediately and then polling at the fixed interval; `on_timeout` fires
/// once after the attempt cap is exhausted.
pub fn when_ready(
    client: ReadSignal<Option<Client>>,
    on_ready: impl Fn(Client) + Copy + 'static,
    on_timeout: impl Fn() + Copy + 'static,
) {
    if let Some(ready) = client.get_untracked() {
        on_ready(ready);
        return;
    }

    let poll = store_value(ReadyPoll::new());
    let done = store_value(false);
    let interval = Interval::new(READY_POLL_INTERVAL_MS, move || {
        if done.get_value() {
            return;
        }
        if let Some(ready) = client.get_untracked() {
            done.set_value(true);
            on_ready(ready);
            return;
        }
        let mut timed_out = false;
        poll.update_value(|p| timed_out = p.tick(false) == PollOutcome::TimedOut);
        if timed_out {
            done.set_value(true);
            on_timeout();
        }
    });
    on_cleanup(move || drop(interval));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_exhausts_after_attempt_cap() {
        let mut poll = ReadyPoll::new();
        for attempt in 1..READY_POLL_MAX_ATTEMPTS {
            assert_eq!(poll.tick(false), PollOutcome::Waiting, "attempt {attempt}");
        }
        assert_eq!(poll.tick(false), PollOutcome::TimedOut);
        // Further ticks stay timed out rather than wrapping.
        assert_eq!(poll.tick(false), PollOutcome::TimedOut);
    }

    #[test]
    fn poll_reports_ready_without_counting() {
        let mut poll = ReadyPoll::new();
        assert_eq!(poll.tick(false), PollOutcome::Waiting);
        assert_eq!(poll.tick(true), PollOutcome::Ready);
    }

    #[test]
    fn id_takes_precedence_over_slug_and_name() {
        let lookup = Lookup::from_params(
            Some("5".to_string()),
            Some("Fish+Oil".to_string()),
            Some("Creatine".to_string()),
        );
        assert_eq!(lookup, Lookup::Id(5));
    }

    #[test]
    fn slug_is_normalized_before_querying() {
        let lookup = Lookup::from_params(None, Some("Fish+Oil".to_string()), None);
        assert_eq!(lookup, Lookup::Name("Fish Oil".to_string()));

        let lookup = Lookup::from_params(None, None, Some("alpha-gpc".to_string()));
        assert_eq!(lookup, Lookup::Name("alpha gpc".to_string()));
    }

    #[test]
    fn slug_wins_over_name() {
        let lookup = Lookup::from_params(
            None,
            Some("Whey".to_string()),
            Some("Creatine".to_string()),
        );
        assert_eq!(lookup, Lookup::Name("Whey".to_string()));
    }

    #[test]
    fn non_integer_id_falls_through() {
        let lookup = Lookup::from_params(Some("abc".to_string()), Some("Zinc".to_string()), None);
        assert_eq!(lookup, Lookup::Name("Zinc".to_string()));
    }

    #[test]
    fn absent_parameters_resolve_to_first_record() {
        assert_eq!(Lookup::from_params(None, None, None), Lookup::First);
        // A slug that normalizes to nothing is treated as absent.
        assert_eq!(
            Lookup::from_params(None, Some("+-".to_string()), None),
            Lookup::First
        );
    }

    #[test]
    fn search_terms_are_lowercased_and_split() {
        assert_eq!(search_terms("Fish Oil"), vec!["fish", "oil"]);
        assert_eq!(search_terms("  Creatine   Monohydrate "), vec!["creatine", "monohydrate"]);
        assert!(search_terms("").is_empty());
    }
}
