//! Session identity and client context
//!
//! A session lives for exactly one tracker instance (one page load). The
//! identifier is opaque to the collector; it only has to be non-empty and
//! practically collision-free across repeated initializations.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Session identifier (opaque string)
pub type SessionId = String;

const SESSION_PREFIX: &str = "session_";
const FRAGMENT_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh session identifier.
///
/// Format: `session_<9 base-36 chars>_<unix millis>`. Uniqueness is
/// probabilistic only; identifiers are never persisted across page loads.
pub fn generate_session_id() -> SessionId {
    let mut rng = rand::rng();
    let fragment: String = (0..FRAGMENT_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!(
        "{}{}_{}",
        SESSION_PREFIX,
        fragment,
        chrono::Utc::now().timestamp_millis()
    )
}

/// Browser-side context attached to in-origin requests as headers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientContext {
    /// Screen width in pixels
    pub screen_width: u32,

    /// Screen height in pixels
    pub screen_height: u32,

    /// IANA timezone name (e.g. "Asia/Tokyo")
    pub timezone: String,

    /// Client user agent, if known
    pub user_agent: Option<String>,
}

impl ClientContext {
    /// Create a new client context
    pub fn new(screen_width: u32, screen_height: u32, timezone: impl Into<String>) -> Self {
        Self {
            screen_width,
            screen_height,
            timezone: timezone.into(),
            user_agent: None,
        }
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Screen resolution in the `{width}x{height}` header form
    pub fn screen_resolution(&self) -> String {
        format!("{}x{}", self.screen_width, self.screen_height)
    }
}
