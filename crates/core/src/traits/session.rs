//! Assistant session trait

use crate::traits::room::AudioRoom;
use crate::traits::speech::SpeechHandle;
use std::sync::Arc;

/// View of the running assistant session that turn gating needs.
///
/// Exposes the room the session is connected to and the speech handles
/// for work already in flight, so a rejected turn can be unwound: the
/// reply being prepared, the speech currently playing, and the task
/// generating the next reply.
pub trait AssistantSession: Send + Sync {
    /// Room the session is connected to
    fn room(&self) -> Arc<dyn AudioRoom>;

    /// Reply the session has prepared but not yet started voicing
    fn pending_reply(&self) -> Option<Arc<dyn SpeechHandle>>;

    /// Drop the session's reference to the pending reply
    fn clear_pending_reply(&self);

    /// Speech the session is currently voicing
    fn playing_speech(&self) -> Option<Arc<dyn SpeechHandle>>;

    /// Cancel the task generating the next reply, if one is running
    fn cancel_reply_task(&self);
}
