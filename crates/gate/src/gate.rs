//! Wake-word listening state machine and reply gating

use crate::GateError;
use parking_lot::Mutex;
use samvad_core::{AssistantSession, AudioRoom, ChatLog, SpeechHandle, Turn, TurnRole};
use samvad_player::{WavPlayer, DEFAULT_VOLUME};
use std::path::PathBuf;

/// Assistant acknowledgement recorded after a bare wake word.
pub const WAKE_ACK_TEXT: &str = "Wake word detected, waiting for command";

/// Where the gate stands between wake word and command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListeningState {
    /// Ignoring utterances until a wake word arrives
    #[default]
    Idle,
    /// Wake word heard on its own; the next utterance is the command
    WakeWordPending,
    /// A command is being handled
    Processing,
}

/// Decision returned by the pre-reasoning hook.
///
/// The current transition table only ever yields `Continue` or `Suppress`.
/// `Force` is part of the interface for pipelines that want to override
/// gating, but nothing constructs it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Let the assistant generate a reply
    Continue,
    /// Drop the turn without replying, after unwinding in-flight work
    Suppress,
    /// Reply even where gating would suppress
    Force,
}

/// Configuration for the wake-word gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Word that opens a turn, matched case-insensitively
    pub wake_word: String,
    /// Sound played when the wake word arrives without a command.
    /// `None` disables notification playback and the record entries
    /// that go with it; gating itself is unaffected.
    pub notification_sound: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            wake_word: "sam".to_string(),
            notification_sound: None,
        }
    }
}

/// Turn gate driven by transcribed utterances.
///
/// Tracks the idle / wake-word-pending / processing cycle and, as the
/// assistant's pre-reasoning hook, suppresses turns that only carry the
/// wake word or arrive while the gate is closed.
pub struct WakeWordGate {
    wake_word: String,
    notification_sound: Option<PathBuf>,
    player: Option<WavPlayer>,
    state: Mutex<ListeningState>,
}

impl WakeWordGate {
    /// Build a gate from config. The wake word is matched lowercase.
    pub fn new(config: GateConfig) -> Self {
        let player = config.notification_sound.is_some().then(WavPlayer::new);
        Self {
            wake_word: config.wake_word.to_lowercase(),
            notification_sound: config.notification_sound,
            player,
            state: Mutex::new(ListeningState::default()),
        }
    }

    /// Current listening state.
    pub fn state(&self) -> ListeningState {
        *self.state.lock()
    }

    /// Advance the listening state for one transcribed utterance.
    ///
    /// Returns the state after the utterance and whether the utterance
    /// should reach the assistant. For a bare wake word the notification
    /// (when configured) plays and the acknowledgement entries land in
    /// `chat` before the state commits, so a playback error leaves the
    /// gate unchanged.
    pub async fn step(
        &self,
        utterance: &str,
        chat: &mut ChatLog,
        room: &dyn AudioRoom,
    ) -> Result<(ListeningState, bool), GateError> {
        let current = self.state();
        tracing::debug!("State {:?}, utterance: {}", current, utterance);

        let lowered = utterance.to_lowercase();
        let cleaned = lowered.trim();

        let (next, should_process) = if cleaned.contains(self.wake_word.as_str()) {
            if is_bare_wake_word(cleaned, &self.wake_word) {
                tracing::info!("Wake word detected, waiting for command");
                self.play_notification(utterance, chat, room).await?;
                (ListeningState::WakeWordPending, false)
            } else {
                tracing::info!("Command included with wake word, processing");
                (ListeningState::Processing, true)
            }
        } else {
            match current {
                ListeningState::Idle => {
                    tracing::debug!("Ignoring utterance while idle");
                    (ListeningState::Idle, false)
                }
                ListeningState::WakeWordPending => {
                    tracing::info!("Processing command after wake word");
                    (ListeningState::Processing, true)
                }
                ListeningState::Processing => {
                    tracing::info!("Returning to idle");
                    (ListeningState::Idle, false)
                }
            }
        };

        *self.state.lock() = next;
        Ok((next, should_process))
    }

    /// Pre-reasoning hook for the assistant pipeline.
    ///
    /// Runs when a reply is about to be generated. When the newest record
    /// entry is a user utterance the gate steps its state machine; a
    /// suppressed turn unwinds the session's in-flight reply work and,
    /// for a bare wake word, drops the utterance from the record.
    pub async fn before_reasoning(
        &self,
        session: &dyn AssistantSession,
        chat: &mut ChatLog,
    ) -> Result<HookOutcome, GateError> {
        let utterance = match chat.last() {
            Some(turn) if turn.role == TurnRole::User => turn.content.clone(),
            _ => return Ok(HookOutcome::Continue),
        };
        let utterance_idx = chat.len() - 1;

        let room = session.room();
        let (state, should_process) = self.step(&utterance, chat, room.as_ref()).await?;

        if should_process {
            tracing::info!("Processing utterance in state {:?}", state);
            return Ok(HookOutcome::Continue);
        }

        tracing::debug!("Utterance rejected, cleaning up in-flight replies");

        if let Some(handle) = session.pending_reply() {
            cleanup_speech_handle(handle.as_ref(), "pending reply");
            session.clear_pending_reply();
        }

        if let Some(handle) = session.playing_speech() {
            if handle.allow_interruptions() {
                cleanup_speech_handle(handle.as_ref(), "playing speech");
            }
        }

        session.cancel_reply_task();

        if state == ListeningState::WakeWordPending {
            chat.remove(utterance_idx);
        }

        Ok(HookOutcome::Suppress)
    }

    async fn play_notification(
        &self,
        utterance: &str,
        chat: &mut ChatLog,
        room: &dyn AudioRoom,
    ) -> Result<(), GateError> {
        if let (Some(player), Some(path)) = (self.player.as_ref(), self.notification_sound.as_ref())
        {
            player.play_once(path, room, DEFAULT_VOLUME).await?;

            // Recorded only after playback completes
            chat.append(Turn::user(utterance));
            chat.append(Turn::assistant(WAKE_ACK_TEXT));
        }
        Ok(())
    }
}

/// A bare wake word is the word alone, allowing a single trailing "." or "?".
fn is_bare_wake_word(cleaned: &str, wake_word: &str) -> bool {
    match cleaned.strip_prefix(wake_word) {
        Some(rest) => matches!(rest, "" | "." | "?"),
        None => false,
    }
}

/// Drive a speech handle to a terminal state so no waiter stays parked.
///
/// Safe to call repeatedly. Signals are satisfied before the cancel call,
/// so a concurrent waiter observing cancellation also sees a resolved
/// done state.
fn cleanup_speech_handle(handle: &dyn SpeechHandle, description: &str) {
    tracing::debug!("Cleaning up {}: {}", description, handle.id());

    handle.resolve_nested_speech();
    if !handle.nested_speech_done() {
        handle.mark_nested_speech_done();
        handle.notify_nested_speech_changed();
    }
    handle.resolve_done();
    handle.cancel(true);
}
