//! # inksign Core
//!
//! Host-independent logic for capturing a handwritten signature and preparing
//! a contract for submission.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                inksign-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Stroke Capture  │  Contract Document       │
//! │  - Mouse/touch   │  - Placeholders          │
//! │  - Surface trait │  - Services, signer      │
//! ├─────────────────────────────────────────────┤
//! │  Population      │  Validation              │
//! │  - Query string  │  - Name, date, signature │
//! │  - Messages      │                          │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod capture;
pub mod document;
pub mod error;
pub mod event;
pub mod validation;

pub use bridge::{populate, FieldInput, MessageEvent, PopulationBridge, PopulationData};
pub use capture::{Rgba, StrokeCapture, StrokeStyle, Surface};
pub use document::{ContractDocument, FieldValues, Placeholder, Section};
pub use error::{CoreError, CoreResult, ValidationError};
pub use event::{
    EventDisposition, InputEvent, PointerAction, StrokePoint, SurfaceBounds, TouchEvent,
    TouchPhase, TouchPoint,
};
pub use validation::validate;

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
