//! Core data model shared by every component of the request orchestration
//! core (§3 of the spec).
//!
//! Types here are intentionally plain: the core does not own persistence
//! beyond the [`ConversationStore`] contract, and every ephemeral per-turn
//! object is discarded by the Turn Orchestrator once a turn is committed.

mod catalog;
mod conversation;
mod message;
mod model;
mod profile;
mod routing;
mod store;
mod tool;
mod turn;

pub use catalog::{builtin_models, default_prompt};
pub use conversation::Conversation;
pub use message::{Message, MessageRole};
pub use model::{Capabilities, Model, Pricing, Prompt, SamplingParams};
pub use profile::{PrivacyFlags, UnitPreference, UserProfile};
pub use routing::{RouteKind, RoutingDecision};
pub use store::{ConversationStore, InMemoryStore, StoreError};
pub use tool::ToolDescriptor;
pub use turn::{ContextAnalysis, QuestionType, ResponseMetrics, SearchOutcome, UsageCounter};
