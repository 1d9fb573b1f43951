//! Downstream chat collaborator.
//!
//! The gateway's job ends once a request is admitted; producing the
//! actual reply belongs to whatever sits behind [`ChatBackend`]. The
//! shipped implementation talks to an OpenAI-style completions API.

pub mod backend;

pub use backend::{ChatBackend, ChatBackendError, ChatReply, UpstreamChatBackend};
