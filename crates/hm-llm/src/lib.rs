//! `hm-llm` — the boundary between the decision engine and an external
//! text-completion service.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`request`]   | `CompletionRequest` — system + user prompt                    |
//! | [`service`]   | `TextCompletionService` trait, `ScriptedCompletion` double    |
//! | [`policy`]    | `CallPolicy` — per-attempt timeout and bounded attempts       |
//! | [`decode`]    | `decode_phase`, `decode_destination`, `DestinationReply`      |
//! | [`error`]     | `CompletionError`, `DecodeError`                              |
//!
//! # Failure model
//!
//! The service is an opaque fallible call.  Every call site goes through
//! [`CallPolicy::call`], which bounds latency (timeout per attempt, fixed
//! attempt count) and folds transport failures and malformed responses into
//! one typed error.  Callers never propagate that error: they log it and
//! apply their own deterministic fallback.

pub mod decode;
pub mod error;
pub mod policy;
pub mod request;
pub mod service;

#[cfg(test)]
mod tests;

pub use decode::{DestinationReply, decode_destination, decode_phase};
pub use error::{CompletionError, DecodeError};
pub use policy::CallPolicy;
pub use request::CompletionRequest;
pub use service::{ScriptedCompletion, TextCompletionService};
