//! PageBeacon Analytics Tracker
//!
//! This crate provides the client side of the analytics pipeline:
//! - A request-tagging HTTP client that stamps in-origin traffic with
//!   session and browser metadata headers
//! - Token-gated access checking
//! - Fire-and-forget event and conversion dispatch

pub mod client;
pub mod gate;
pub mod tracker;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collector returned {status_code}: {message}")]
    Collector { status_code: u16, message: String },

    #[error("Failed to parse collector response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

pub use client::{HttpClientConfig, TaggedClient, create_client};
pub use gate::{Gate, GateState};
pub use tracker::{FailureHook, Tracker, TrackerConfig};
