//! Analytics tracker
//!
//! One `Tracker` instance corresponds to one page load: it owns the session
//! identifier, the tagged HTTP client, the token gate, and the scroll latch.
//! Event and conversion dispatch is best-effort; failures are logged and
//! handed to the optional failure hook, never surfaced to the caller.

use crate::client::{HttpClientConfig, TaggedClient, create_client};
use crate::gate::{Gate, GateState};
use crate::{Result, TrackerError};
use pagebeacon_core::events::{conversion_types, event_types};
use pagebeacon_core::{ClientContext, Conversion, ConversionOutcome, TokenCheck, TrackedEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Observer invoked with the operation name and the swallowed error every
/// time a best-effort dispatch fails
pub type FailureHook = Arc<dyn Fn(&str, &TrackerError) + Send + Sync>;

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the collector API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Redirect target used when a conversion yields no split-test URL
    #[serde(default = "default_fallback_redirect_url")]
    pub fallback_redirect_url: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpClientConfig,
}

fn default_api_base() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_fallback_redirect_url() -> String {
    "https://line.me/R/ti/p/@example".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            fallback_redirect_url: default_fallback_redirect_url(),
            http: HttpClientConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    /// Set the fallback redirect URL
    pub fn with_fallback_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_redirect_url = url.into();
        self
    }

    /// Set the HTTP client configuration
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Per-page-load analytics client
pub struct Tracker {
    config: TrackerConfig,
    client: TaggedClient,
    page_url: String,
    token: RwLock<Option<String>>,
    gate: Gate,
    scrolled: AtomicBool,
    failure_hook: Option<FailureHook>,
}

impl Tracker {
    /// Create a tracker for one page load. Generates the session identifier
    /// and builds the tagging client.
    pub fn new(
        config: TrackerConfig,
        context: ClientContext,
        page_url: impl Into<String>,
    ) -> Result<Self> {
        let client = create_client(&config.http)?;
        let session_id = pagebeacon_core::generate_session_id();
        let client = TaggedClient::new(client, config.api_base.clone(), session_id, context);

        Ok(Self {
            config,
            client,
            page_url: page_url.into(),
            token: RwLock::new(None),
            gate: Gate::new(),
            scrolled: AtomicBool::new(false),
            failure_hook: None,
        })
    }

    /// Install an observer for swallowed dispatch failures
    pub fn with_failure_hook(mut self, hook: FailureHook) -> Self {
        self.failure_hook = Some(hook);
        self
    }

    /// The session identifier for this page load
    pub fn session_id(&self) -> &str {
        self.client.session_id()
    }

    /// The tagging client, for any other in-origin traffic
    pub fn client(&self) -> &TaggedClient {
        &self.client
    }

    /// Current gate state
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Whether a token is currently held. Pure query, no side effects.
    pub fn has_valid_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Initialize tracking for the page: check the token (forwarding the
    /// page's query string), then emit the `page_load` event. A failed
    /// token check never prevents the page-load event. Returns whether the
    /// token check succeeded.
    pub async fn init(&self, query: &str) -> bool {
        let authorized = self.check_token(query).await;

        self.track_event(event_types::PAGE_LOAD, json!({ "url": self.page_url }))
            .await;

        authorized
    }

    /// Validate access against the collector. On `valid == true` stores the
    /// token and unlocks the gate. Returns false on an invalid token, a
    /// network failure, or a malformed response; never errors, never
    /// retries.
    pub async fn check_token(&self, query: &str) -> bool {
        let mut url = self.client.endpoint("/auth/check-token");
        let query = query.trim_start_matches('?');
        if !query.is_empty() {
            url = format!("{}?{}", url, query);
        }

        match self.fetch_token_check(&url).await {
            Ok(check) if check.valid => {
                *self.token.write().unwrap_or_else(PoisonError::into_inner) = check.token;
                self.gate.unlock();
                debug!(session_id = %self.session_id(), "token check passed");
                true
            }
            Ok(_) => {
                debug!(session_id = %self.session_id(), "token check rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "token check failed");
                self.report_failure("check_token", &e);
                false
            }
        }
    }

    async fn fetch_token_check(&self, url: &str) -> Result<TokenCheck> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Collector {
                status_code: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read error body".to_string()),
            });
        }

        response
            .json::<TokenCheck>()
            .await
            .map_err(|e| TrackerError::Parse(format!("token check body: {}", e)))
    }

    /// Report a discrete event to the collector. Fire-and-forget: any
    /// failure is logged and handed to the failure hook, never surfaced.
    pub async fn track_event(&self, event_type: &str, event_data: Value) {
        let event = TrackedEvent::new(event_type, self.page_url.clone()).with_data(event_data);
        if let Err(e) = self.post_event(&event).await {
            warn!(event_type, error = %e, "event tracking failed");
            self.report_failure("track_event", &e);
        }
    }

    async fn post_event(&self, event: &TrackedEvent) -> Result<()> {
        let response = self
            .client
            .post(&self.client.endpoint("/analytics/track"))
            .json(event)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Collector {
                status_code: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read error body".to_string()),
            });
        }

        // Response body is ignored by contract
        Ok(())
    }

    /// Report a conversion and return the collector's outcome, which may
    /// carry a split-test redirect URL. Returns None on any failure; the
    /// caller picks the fallback action.
    pub async fn track_conversion(
        &self,
        conversion_type: &str,
        conversion_value: f64,
    ) -> Option<ConversionOutcome> {
        let conversion = Conversion::new(conversion_type, conversion_value);
        match self.post_conversion(&conversion).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(conversion_type, error = %e, "conversion tracking failed");
                self.report_failure("track_conversion", &e);
                None
            }
        }
    }

    async fn post_conversion(&self, conversion: &Conversion) -> Result<ConversionOutcome> {
        let response = self
            .client
            .post(&self.client.endpoint("/analytics/conversion"))
            .json(conversion)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Collector {
                status_code: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read error body".to_string()),
            });
        }

        response
            .json::<ConversionOutcome>()
            .await
            .map_err(|e| TrackerError::Parse(format!("conversion body: {}", e)))
    }

    /// Record the `line_redirect` conversion and resolve the URL to open:
    /// the collector's split-test target when present, the configured
    /// fallback otherwise.
    pub async fn conversion_redirect(&self, conversion_value: f64) -> String {
        let outcome = self
            .track_conversion(conversion_types::LINE_REDIRECT, conversion_value)
            .await;
        self.redirect_or_fallback(outcome)
    }

    /// Resolve a conversion outcome to the URL the caller should open
    pub fn redirect_or_fallback(&self, outcome: Option<ConversionOutcome>) -> String {
        outcome
            .and_then(|o| o.redirect_url)
            .unwrap_or_else(|| self.config.fallback_redirect_url.clone())
    }

    /// Notification that the page scrolled. Emits the `scroll` event on the
    /// first call only; the latch stays closed for the page's lifetime.
    pub async fn notify_scroll(&self) {
        if self.scrolled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.track_event(event_types::SCROLL, json!({ "scrolled": true }))
            .await;
    }

    fn report_failure(&self, operation: &str, error: &TrackerError) {
        if let Some(hook) = &self.failure_hook {
            hook(operation, error);
        }
    }
}
