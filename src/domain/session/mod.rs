//! Try-on session aggregate.
//!
//! One session per active try-on flow: the append-only conversation
//! history, the style context, the current committed portrait, and the
//! turn-phase state machine.

mod aggregate;
mod phase;
mod turn;

pub use aggregate::{StyleContext, TryOnSession, STYLIST_GREETING};
pub use phase::TurnPhase;
pub use turn::{ConversationTurn, TurnRole};
