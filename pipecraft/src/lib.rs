//! # Pipecraft
//!
//! A declarative composer for event-driven integration pipes.
//!
//! Pipecraft assembles one message source, an optional HTTP enrichment step
//! and one target into a single deployable pipe descriptor, together with
//! the least-privilege execution role the pipe runtime assumes:
//!
//! - **Fixed permissions**: each wiring decision maps to a known action set
//! - **Single target**: the target is a sum type; the last target call wins
//! - **Single use**: a composer builds exactly one descriptor
//! - **Deterministic output**: identical inputs give byte-identical JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipecraft::prelude::*;
//!
//! let mut composer = PipeComposer::new("SqsToEventBus")?;
//! let pipe = composer
//!     .with_source("arn:aws:sqs:us-east-1:123456789012:orders", 1, 0, None)?
//!     .with_event_channel_target(
//!         "arn:aws:events:us-east-1:123456789012:event-bus/MyCustomEventBus",
//!         "OrderReceived",
//!         "svc.orders",
//!         r#"{"id": <$.messageId>, "order": <$.body>}"#,
//!     )?
//!     .build()?;
//!
//! println!("{}", pipe.to_json_pretty()?);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod observability;
pub mod permissions;
pub mod pipe;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ComposerState, EnrichmentSpec, HttpMethod, InvocationMode, ResourceHandle, SourceSpec,
        TargetKind, TargetSpec,
    };
    pub use crate::errors::{ConfigurationError, ErrorInfo, PipecraftError};
    pub use crate::observability::{init_tracing, LogFormat, LoggingConfig};
    pub use crate::permissions::{AccessGrant, Action, Effect, PermissionAccumulator};
    pub use crate::pipe::{ExecutionIdentity, PipeComposer, PipeDefinition, PipeDescriptor};
}
