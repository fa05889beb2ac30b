//! Text narration port.

use crate::domain::error::MizanError;
use crate::domain::narrative::NarrativeContext;

/// Turns structured analysis facts into prose.
pub trait NarrativePort {
    fn narrate(&self, context: &NarrativeContext) -> Result<String, MizanError>;
}
