//! PageBeacon Core Types
//!
//! This crate provides the fundamental types shared by the PageBeacon
//! workspace:
//! - Outbound/inbound analytics wire types
//! - Session identity and client context
//! - The fixed event vocabulary

pub mod events;
pub mod session;

pub use events::{Conversion, ConversionOutcome, TokenCheck, TrackedEvent};
pub use session::{ClientContext, SessionId, generate_session_id};
