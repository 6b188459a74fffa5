//! Conversational refinement loop.

mod orchestrator;

pub use orchestrator::{
    ChatError, ChatReply, DialogueOrchestrator, SessionView, MODIFICATION_FAILURE_REPLY,
};
