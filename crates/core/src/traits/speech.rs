//! Speech handle trait for in-flight assistant replies

/// Handle to one in-flight assistant speech turn.
///
/// The session hands these out for the reply it is currently preparing
/// (`pending_reply`) and the one it is currently voicing (`playing_speech`).
/// A rejected turn must drive its handles to a terminal state so nothing
/// downstream keeps waiting on speech that will never play.
///
/// Implementations:
/// - Transport adapters wrap the realtime SDK's speech handle
/// - Tests use in-memory mocks with atomic flags
///
/// Every method must be safe to call on a handle that is already terminal;
/// repeated calls are no-ops.
pub trait SpeechHandle: Send + Sync {
    /// Stable identifier for logging
    fn id(&self) -> String;

    /// Whether the user may barge in while this speech is playing
    fn allow_interruptions(&self) -> bool;

    /// Whether nested speech has already been marked finished
    fn nested_speech_done(&self) -> bool;

    /// Mark nested speech as finished
    fn mark_nested_speech_done(&self);

    /// Wake any task waiting on the nested speech flag
    fn notify_nested_speech_changed(&self);

    /// Resolve the future tracking nested speech, if one is still pending
    fn resolve_nested_speech(&self);

    /// Resolve the handle's own completion future, if still pending
    fn resolve_done(&self);

    /// Cancel the underlying speech task
    ///
    /// # Arguments
    /// * `cancel_nested` - Also cancel nested speech spawned by this handle
    fn cancel(&self, cancel_nested: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // Mock implementation for testing
    #[derive(Default)]
    struct MockHandle {
        nested_done: AtomicBool,
        cancels: AtomicUsize,
    }

    impl SpeechHandle for MockHandle {
        fn id(&self) -> String {
            "mock-speech".to_string()
        }

        fn allow_interruptions(&self) -> bool {
            true
        }

        fn nested_speech_done(&self) -> bool {
            self.nested_done.load(Ordering::SeqCst)
        }

        fn mark_nested_speech_done(&self) {
            self.nested_done.store(true, Ordering::SeqCst);
        }

        fn notify_nested_speech_changed(&self) {}

        fn resolve_nested_speech(&self) {}

        fn resolve_done(&self) {}

        fn cancel(&self, _cancel_nested: bool) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_nested_speech_flag_round_trip() {
        let handle = MockHandle::default();
        let dyn_handle: &dyn SpeechHandle = &handle;

        assert!(!dyn_handle.nested_speech_done());
        dyn_handle.mark_nested_speech_done();
        assert!(dyn_handle.nested_speech_done());
    }

    #[test]
    fn test_cancel_is_repeatable() {
        let handle = MockHandle::default();
        let dyn_handle: &dyn SpeechHandle = &handle;

        dyn_handle.cancel(true);
        dyn_handle.cancel(true);
        assert_eq!(handle.cancels.load(Ordering::SeqCst), 2);
    }
}
