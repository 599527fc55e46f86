//! Analytics wire types
//!
//! These structures mirror the collector's JSON contract exactly; field
//! names are camelCase on the wire. All of them are ephemeral: constructed,
//! sent, and discarded. Nothing here is stored locally.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the events the tracker emits on its own
pub mod event_types {
    /// Emitted once when the tracker initializes for a page
    pub const PAGE_LOAD: &str = "page_load";

    /// Emitted at most once per page load, on first scroll
    pub const SCROLL: &str = "scroll";

    /// Emitted for explicit button interactions
    pub const BUTTON_CLICK: &str = "button_click";
}

/// Names of the conversion tags the tracker emits
pub mod conversion_types {
    /// Outbound messenger redirect conversion
    pub const LINE_REDIRECT: &str = "line_redirect";
}

/// A discrete behavioral event, reported to `POST {base}/analytics/track`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    /// Event tag (e.g. `page_load`, `scroll`, `button_click`)
    pub event_type: String,

    /// Open key/value payload
    pub event_data: Value,

    /// URL of the page that produced the event
    pub page_url: String,
}

impl TrackedEvent {
    /// Create an event with an empty payload
    pub fn new(event_type: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            event_data: Value::Object(Map::new()),
            page_url: page_url.into(),
        }
    }

    /// Attach a structured payload
    pub fn with_data(mut self, event_data: Value) -> Self {
        self.event_data = event_data;
        self
    }
}

/// A distinguished desired-action event, reported to
/// `POST {base}/analytics/conversion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Conversion tag (e.g. `line_redirect`)
    pub conversion_type: String,

    /// Numeric value assigned to the conversion
    pub conversion_value: f64,
}

impl Conversion {
    pub fn new(conversion_type: impl Into<String>, conversion_value: f64) -> Self {
        Self {
            conversion_type: conversion_type.into(),
            conversion_value,
        }
    }
}

/// Collector response to a conversion, possibly carrying a split-test
/// redirect target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    /// Redirect target chosen by the collector, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Any additional fields the collector returns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body of `GET {base}/auth/check-token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenCheck {
    /// Whether the caller is authorized
    pub valid: bool,

    /// Access token, present when `valid` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
