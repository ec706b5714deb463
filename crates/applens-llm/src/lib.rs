//! Generation-service boundary for AppLens.
//!
//! This crate defines the single call contract the rest of the workspace uses
//! to reach a generative model: a prompt (plus optional system instruction,
//! prior turns and tools) goes in, free-form text plus optional grounding
//! metadata comes out.
//!
//! # Architecture
//!
//! The core abstraction is the [`GenerationBackend`] trait. Transport to an
//! actual provider lives outside this workspace; callers supply their own
//! implementation and tests use [`MockBackend`].
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  GenerationBackend trait                      │
//! │  - generate(GenerationRequest)                │
//! │      -> GenerationResponse { text, grounding }│
//! └───────────────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌──────────────┐          ┌─────────────┐
//!   │ caller's     │          │ MockBackend │
//!   │ provider impl│          │  (tests)    │
//!   └──────────────┘          └─────────────┘
//! ```

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{GenerationBackend, MockBackend, SharedBackend};
pub use error::{LlmError, Result};
pub use types::{
    GenerationRequest, GenerationResponse, GroundingChunk, GroundingMetadata, Role, Tool, Turn,
    WebSource,
};
