//! TryOnSession aggregate entity.
//!
//! The session is the single owner of conversation state for one try-on
//! flow. All mutation goes through its methods; the orchestrator holds it
//! behind a per-session lock, so methods here assume exclusive access.
//!
//! # Invariants
//!
//! - `history` is append-only; turns are immutable once appended
//! - `current_image` always holds the last successfully committed portrait
//! - `phase` only moves along the transitions `TurnPhase` allows

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::image::ImageData;

use super::phase::TurnPhase;
use super::turn::ConversationTurn;

/// Opening assistant turn for a fresh session.
pub const STYLIST_GREETING: &str =
    "Hi! I'm your AI stylist. I can help you customize this look. Want it shorter? Different color? Just ask!";

/// The style a session is anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleContext {
    /// Display name of the tried-on style.
    pub style_name: String,
    /// Face shape from analysis, when a photo was analyzed.
    pub face_shape: Option<String>,
}

impl StyleContext {
    /// Creates a style context.
    pub fn new(style_name: impl Into<String>) -> Self {
        Self {
            style_name: style_name.into(),
            face_shape: None,
        }
    }

    /// Sets the analyzed face shape.
    pub fn with_face_shape(mut self, face_shape: impl Into<String>) -> Self {
        self.face_shape = Some(face_shape.into());
        self
    }
}

/// Session aggregate - conversation plus current artifact for one try-on flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryOnSession {
    /// Unique identifier for this session.
    id: SessionId,

    /// Conversation history, append-only.
    history: Vec<ConversationTurn>,

    /// The style this session revolves around.
    style_context: StyleContext,

    /// Last successfully committed portrait.
    current_image: ImageData,

    /// Where the session is within the current chat turn.
    phase: TurnPhase,

    /// When the session was opened.
    created_at: Timestamp,

    /// When the session last changed.
    updated_at: Timestamp,
}

impl TryOnSession {
    /// Opens a new session around a committed initial portrait.
    ///
    /// The history starts with the stylist greeting, as the consultant
    /// surface shows it.
    pub fn open(style_context: StyleContext, initial_image: ImageData) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            history: vec![ConversationTurn::assistant(STYLIST_GREETING)],
            style_context,
            current_image: initial_image,
            phase: TurnPhase::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the conversation history in order.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Returns the style context.
    pub fn style_context(&self) -> &StyleContext {
        &self.style_context
    }

    /// Returns the last successfully committed portrait.
    pub fn current_image(&self) -> &ImageData {
        &self.current_image
    }

    /// Returns the current turn phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Returns when the session was opened.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session last changed.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Appends a user turn.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is empty after trimming; history is
    ///   untouched in that case
    pub fn append_user_turn(&mut self, text: &str) -> Result<(), ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }

        self.history.push(ConversationTurn::user(trimmed));
        self.touch();
        Ok(())
    }

    /// Appends an assistant turn.
    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.history.push(ConversationTurn::assistant(text));
        self.touch();
    }

    /// Marks a conversational-model call as outstanding.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if a turn is already in flight
    pub fn begin_model_turn(&mut self) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(TurnPhase::AwaitingModelResponse)?;
        self.touch();
        Ok(())
    }

    /// Marks a dispatched function call as outstanding.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the session is not awaiting a model response
    pub fn begin_function_call(&mut self) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(TurnPhase::AwaitingFunctionResult)?;
        self.touch();
        Ok(())
    }

    /// Returns the session to idle at the end of a turn, whatever the
    /// in-turn phase was.
    pub fn finish_turn(&mut self) {
        self.phase = TurnPhase::Idle;
        self.touch();
    }

    /// Commits a new portrait as the current artifact.
    ///
    /// Only called after a synthesis call succeeded; a failed call must
    /// leave the previous portrait in place by never reaching this method.
    pub fn commit_image(&mut self, image: ImageData) {
        self.current_image = image;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::TurnRole;

    fn test_image(byte: u8) -> ImageData {
        ImageData::png(vec![byte; 4]).unwrap()
    }

    fn test_session() -> TryOnSession {
        TryOnSession::open(
            StyleContext::new("Wolf Cut").with_face_shape("Oval"),
            test_image(1),
        )
    }

    // Construction tests

    #[test]
    fn open_starts_idle_with_greeting() {
        let session = test_session();
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role(), TurnRole::Assistant);
        assert_eq!(session.history()[0].text(), STYLIST_GREETING);
    }

    #[test]
    fn open_commits_initial_image() {
        let session = test_session();
        assert_eq!(session.current_image(), &test_image(1));
    }

    #[test]
    fn style_context_carries_face_shape() {
        let session = test_session();
        assert_eq!(session.style_context().style_name, "Wolf Cut");
        assert_eq!(session.style_context().face_shape.as_deref(), Some("Oval"));
    }

    // User turn tests

    #[test]
    fn append_user_turn_trims_text() {
        let mut session = test_session();
        session.append_user_turn("  make it shorter  ").unwrap();

        let last = session.history().last().unwrap();
        assert_eq!(last.role(), TurnRole::User);
        assert_eq!(last.text(), "make it shorter");
    }

    #[test]
    fn append_user_turn_rejects_blank_text() {
        let mut session = test_session();
        let before = session.history().len();

        assert!(session.append_user_turn("   ").is_err());
        assert_eq!(session.history().len(), before);
    }

    // Phase tests

    #[test]
    fn begin_model_turn_from_idle_succeeds() {
        let mut session = test_session();
        session.begin_model_turn().unwrap();
        assert_eq!(session.phase(), TurnPhase::AwaitingModelResponse);
    }

    #[test]
    fn begin_model_turn_twice_fails() {
        let mut session = test_session();
        session.begin_model_turn().unwrap();
        assert!(session.begin_model_turn().is_err());
    }

    #[test]
    fn begin_function_call_requires_model_turn() {
        let mut session = test_session();
        assert!(session.begin_function_call().is_err());

        session.begin_model_turn().unwrap();
        session.begin_function_call().unwrap();
        assert_eq!(session.phase(), TurnPhase::AwaitingFunctionResult);
    }

    #[test]
    fn finish_turn_returns_to_idle_from_any_phase() {
        let mut session = test_session();
        session.begin_model_turn().unwrap();
        session.finish_turn();
        assert_eq!(session.phase(), TurnPhase::Idle);

        session.begin_model_turn().unwrap();
        session.begin_function_call().unwrap();
        session.finish_turn();
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    // Commit tests

    #[test]
    fn commit_image_replaces_current() {
        let mut session = test_session();
        session.commit_image(test_image(2));
        assert_eq!(session.current_image(), &test_image(2));
    }

    #[test]
    fn history_is_in_conversation_order() {
        let mut session = test_session();
        session.append_user_turn("dye it blonde").unwrap();
        session.append_assistant_turn("Done - going blonde!");

        let roles: Vec<TurnRole> = session.history().iter().map(|t| t.role()).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Assistant, TurnRole::User, TurnRole::Assistant]
        );
    }
}
