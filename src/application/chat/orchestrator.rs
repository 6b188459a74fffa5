//! DialogueOrchestrator - drives multi-turn chat over a try-on session.
//!
//! The orchestrator owns every active [`TryOnSession`]. Each user message
//! runs the turn state machine: send history to the conversational model
//! with the `modify_hairstyle` capability exposed, dispatch a requested
//! modification to the synthesis client, and commit the result - or report
//! failure without touching the committed artifact.
//!
//! # Concurrency
//!
//! A session's turns are strictly sequential: each session sits behind its
//! own async mutex, so a second message arriving mid-flight queues on the
//! lock rather than interleaving. Different sessions proceed in parallel.
//! Closing a session marks its slot defunct; an in-flight turn observes
//! the flag after each awaited call and discards its result instead of
//! committing to a torn-down session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use crate::application::synthesize_style::SynthesizeStyleHandler;
use crate::domain::chat::{FunctionCallError, StyleCommand};
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::image::ImageData;
use crate::domain::session::{ConversationTurn, StyleContext, TryOnSession, TurnRole};
use crate::ports::{GatewayError, GenerationRequest, ModelGateway};

/// Assistant reply when a modification could not be applied.
pub const MODIFICATION_FAILURE_REPLY: &str =
    "Sorry, I couldn't update the image just now. Your current look is unchanged - want to try a different tweak?";

/// Confirmation used when the post-commit phrasing round-trip fails.
const CONFIRMATION_FALLBACK: &str =
    "Done! I've updated your look - take a peek at the new image.";

/// Assistant reply when the model sends neither text nor a function call.
const EMPTY_REPLY_FALLBACK: &str = "Sorry, I couldn't process that request.";

/// Outcome of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant turn appended for this message.
    pub assistant_text: String,
    /// Whether the session's current artifact was replaced.
    pub artifact_changed: bool,
}

/// Error type for the chat loop.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No session with this id is open.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The session was closed while this turn was in flight; any result
    /// was discarded.
    #[error("session closed: {0}")]
    SessionClosed(SessionId),

    /// Caller input was empty or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The model requested an unsupported or malformed invocation.
    #[error(transparent)]
    FunctionCall(#[from] FunctionCallError),

    /// The conversational call failed or timed out.
    #[error("conversation call failed: {0}")]
    Upstream(#[from] GatewayError),
}

/// Read-only snapshot of a session for presentation layers.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// The style the session revolves around.
    pub style_context: StyleContext,
    /// Conversation history in order.
    pub history: Vec<ConversationTurn>,
    /// The last successfully committed portrait.
    pub current_image: ImageData,
}

/// One registered session: its state behind the per-session serialization
/// point, plus the teardown flag.
struct SessionSlot {
    state: AsyncMutex<TryOnSession>,
    defunct: AtomicBool,
}

/// Orchestrator for the conversational refinement loop.
pub struct DialogueOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    synthesis: SynthesizeStyleHandler,
    chat_model: String,
    sessions: Mutex<HashMap<SessionId, Arc<SessionSlot>>>,
}

impl DialogueOrchestrator {
    /// Creates an orchestrator bound to a gateway, a synthesis client, and
    /// a conversational model.
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        synthesis: SynthesizeStyleHandler,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            synthesis,
            chat_model: chat_model.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a session around a committed initial portrait.
    pub fn open_session(
        &self,
        style_context: StyleContext,
        initial_image: ImageData,
    ) -> SessionId {
        let session = TryOnSession::open(style_context, initial_image);
        let id = session.id();

        let slot = Arc::new(SessionSlot {
            state: AsyncMutex::new(session),
            defunct: AtomicBool::new(false),
        });
        self.registry().insert(id, slot);

        tracing::info!(session = %id, "opened try-on session");
        id
    }

    /// Closes a session, discarding the result of any in-flight turn.
    ///
    /// Returns false if the session was not open.
    pub fn close_session(&self, id: SessionId) -> bool {
        match self.registry().remove(&id) {
            Some(slot) => {
                slot.defunct.store(true, Ordering::Release);
                tracing::info!(session = %id, "closed try-on session");
                true
            }
            None => false,
        }
    }

    /// Returns the number of open sessions.
    pub fn session_count(&self) -> usize {
        self.registry().len()
    }

    /// Snapshots a session for presentation.
    pub async fn session_view(&self, id: SessionId) -> Option<SessionView> {
        let slot = self.slot(id).ok()?;
        let session = slot.state.lock().await;

        Some(SessionView {
            id: session.id(),
            style_context: session.style_context().clone(),
            history: session.history().to_vec(),
            current_image: session.current_image().clone(),
        })
    }

    /// Handles one user chat message.
    ///
    /// At most one image mutation can occur per call, and a failed
    /// modification never changes the committed artifact.
    #[tracing::instrument(skip_all, fields(session = %session_id, model = %self.chat_model))]
    pub async fn handle_user_message(
        &self,
        session_id: SessionId,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        let slot = self.slot(session_id)?;

        // Per-session serialization point: concurrent turns queue here.
        let mut session = slot.state.lock().await;
        if slot.defunct.load(Ordering::Acquire) {
            return Err(ChatError::SessionClosed(session_id));
        }

        session.append_user_turn(text)?;
        session.begin_model_turn()?;

        let request = self
            .transcript_request(&session)
            .with_tools(StyleCommand::definitions());

        let response = match self.gateway.generate(request).await {
            Ok(response) => response,
            Err(err) => {
                session.finish_turn();
                return Err(ChatError::Upstream(err));
            }
        };
        if slot.defunct.load(Ordering::Acquire) {
            return Err(ChatError::SessionClosed(session_id));
        }

        // Consumed exactly once; anything past the first request is ignored
        // to keep the one-mutation-per-turn contract.
        let Some(call) = response.first_function_call() else {
            let reply = non_empty_or(response.text_or_empty(), EMPTY_REPLY_FALLBACK);
            session.append_assistant_turn(reply.clone());
            session.finish_turn();
            return Ok(ChatReply {
                assistant_text: reply,
                artifact_changed: false,
            });
        };

        let command = match StyleCommand::from_request(call) {
            Ok(command) => command,
            Err(err) => {
                session.finish_turn();
                return Err(ChatError::FunctionCall(err));
            }
        };
        let StyleCommand::ModifyHairstyle { description } = command;
        tracing::debug!(call = %call.call_id(), %description, "dispatching hairstyle modification");

        session.begin_function_call()?;
        let base_image = session.current_image().clone();

        match self.synthesis.handle(&description, Some(&base_image)).await {
            Ok(image) => {
                if slot.defunct.load(Ordering::Acquire) {
                    return Err(ChatError::SessionClosed(session_id));
                }

                session.commit_image(image);
                let confirmation = self.confirm_modification(&session, &description).await;
                session.append_assistant_turn(confirmation.clone());
                session.finish_turn();

                Ok(ChatReply {
                    assistant_text: confirmation,
                    artifact_changed: true,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "hairstyle modification failed");
                session.append_assistant_turn(MODIFICATION_FAILURE_REPLY);
                session.finish_turn();

                Ok(ChatReply {
                    assistant_text: MODIFICATION_FAILURE_REPLY.to_string(),
                    artifact_changed: false,
                })
            }
        }
    }

    /// Builds the conversational request: system framing plus the full
    /// transcript as ordered text parts.
    fn transcript_request(&self, session: &TryOnSession) -> GenerationRequest {
        let mut request =
            GenerationRequest::new(&self.chat_model).with_text(framing(session.style_context()));

        for turn in session.history() {
            let speaker = match turn.role() {
                TurnRole::User => "User",
                TurnRole::Assistant => "Stylist",
            };
            request = request.with_text(format!("{}: {}", speaker, turn.text()));
        }

        request
    }

    /// Reports the function outcome back into the conversation to obtain a
    /// natural confirmation. A failed round-trip degrades to a canned line
    /// rather than unwinding the already-committed artifact.
    async fn confirm_modification(&self, session: &TryOnSession, description: &str) -> String {
        let request = self.transcript_request(session).with_text(format!(
            "[Function result] modify_hairstyle succeeded: the portrait now shows \"{}\". \
             Confirm the change to the user in one or two friendly sentences.",
            description
        ));

        match self.gateway.generate(request).await {
            Ok(response) => non_empty_or(response.text_or_empty(), CONFIRMATION_FALLBACK),
            Err(err) => {
                tracing::warn!(error = %err, "confirmation round-trip failed, using fallback");
                CONFIRMATION_FALLBACK.to_string()
            }
        }
    }

    fn slot(&self, id: SessionId) -> Result<Arc<SessionSlot>, ChatError> {
        self.registry()
            .get(&id)
            .cloned()
            .ok_or(ChatError::SessionNotFound(id))
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, Arc<SessionSlot>>> {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
    }
}

/// System framing embedding the session's style context.
fn framing(context: &StyleContext) -> String {
    let mut framing = format!(
        "You are an expert AI hair stylist chatting with a user who is \
         virtually trying on the \"{}\" hairstyle.",
        context.style_name
    );

    if let Some(face_shape) = &context.face_shape {
        framing.push_str(&format!(" Their face shape is {}.", face_shape));
    }

    framing.push_str(
        " Answer styling questions conversationally. When the user asks to \
         change the look itself (length, colour, texture, styling), call \
         modify_hairstyle with a clear description of the change instead of \
         describing it in text.",
    );

    framing
}

fn non_empty_or(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
