//! Application layer - use-case handlers coordinating domain and ports.

pub mod analyze_face;
pub mod chat;
pub mod critique_style;
pub mod synthesize_style;
pub mod try_on;

pub use analyze_face::{AnalysisError, AnalyzeFaceHandler};
pub use chat::{ChatError, ChatReply, DialogueOrchestrator, SessionView};
pub use critique_style::{CritiqueError, CritiqueStyleHandler};
pub use synthesize_style::{SynthesisError, SynthesizeStyleHandler};
pub use try_on::{TryOnError, TryOnHandler, TryOnRequest};
