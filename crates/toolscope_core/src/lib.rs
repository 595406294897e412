//! Shared infrastructure for toolscope binaries.
//!
//! - [`TracingSetup`] - Installs a `tracing` subscriber with a chosen
//!   format and filter
//!
//! # Example
//!
//! ```no_run
//! use toolscope_core::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .init();
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`toolscope_context`, `toolscope_models`, `toolscope_core`):
//!   Scopes, message types, logging
//! - **Layer 2** (`toolscope_tools`, `toolscope_stream`): Tool invocation and
//!   stream plumbing
//! - **Layer 3** (`toolscope_callbacks`): Lifecycle hooks tying the layers
//!   together

mod tracing_setup;

pub use tracing_setup::{ParseFormatError, TracingFormat, TracingSetup};
