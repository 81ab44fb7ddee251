//! Proposal document service.
//!
//! Turns a priced campaign into an emailed proposal:
//! 1. **Request validation** (`request`) - recipient, client details, active services
//! 2. **Document assembly** (`document`) - cost breakdown and commission taken from the core engines
//! 3. **Text generation** (`llm`) - optional chat-completion enhancement with a local template fallback
//! 4. **Content guard** (`guard`) - rejects generated text that drops prices or the disclaimer
//! 5. **Dispatch** (`email`, `service`) - email transport and the append-only proposal log
//!
//! # Safety Principle
//!
//! The language model only formats text. Prices, totals and commissions are
//! computed by `amplify-core` and are checked back against the generated copy.

pub mod document;
pub mod email;
pub mod error;
pub mod guard;
pub mod llm;
pub mod request;
pub mod service;
pub mod templates;

pub use document::{DocumentSettings, ProposalDocument, ServiceSummary};
pub use email::{EmailTransport, OutgoingEmail, ResendTransport};
pub use error::ProposalError;
pub use guard::{ContentGuard, GuardDecision};
pub use llm::{OpenAiTextGenerator, TextGenerator};
pub use request::{ProposalRequest, Recipient};
pub use service::{DispatchContext, ProposalReceipt, ProposalService};
pub use templates::ProposalTemplates;
