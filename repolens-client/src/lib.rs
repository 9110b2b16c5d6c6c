//! RepoLens Client - analysis request lifecycle and result normalization
//!
//! This crate owns the client side of the repository analysis flow:
//!
//! - An HTTP client for the remote analysis service, behind the
//!   [`AnalysisService`] trait so everything above it is testable in-process
//! - Raw payload types in which every service-provided field is optional
//! - A normalizer that resolves the raw payload into a fully-defaulted,
//!   render-ready [`AnalysisReport`]
//! - The [`AnalysisController`] state machine that enforces the
//!   one-request-in-flight submission lifecycle
//! - The [`ChatConversation`] round-trip lifecycle for codebase chat
//!
//! Presentation layers (CLI, web) consume the report and the controller's
//! read-only state; they never touch raw service payloads directly.

pub mod api;
pub mod chat;
pub mod controller;
pub mod normalize;
pub mod raw;
pub mod report;

pub use api::{AnalysisService, ApiClientConfig, ChatReply, HttpAnalysisService};
pub use chat::{ChatConversation, ChatMessage, ChatRole, ChatSession};
pub use controller::{AnalysisController, AnalysisStatus};
pub use normalize::build_report;
pub use raw::RawAnalysis;
pub use report::{AnalysisReport, ComplexityTier};
