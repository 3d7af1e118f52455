//! services/app/src/reader/speech.rs
//!
//! Read-aloud control over the platform speech facility. Best-effort by
//! design: failures reset to idle without surfacing an error.

use novelink_core::domain::Utterance;
use novelink_core::ports::{SpeechEvent, SpeechSynthesizer};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Speaking,
}

/// Drives the synthesizer for the page currently on screen. Only one
/// utterance is ever active; toggling while speaking stops it.
pub struct SpeechController {
    synth: Arc<dyn SpeechSynthesizer>,
    locale: String,
    state: SpeechState,
}

impl SpeechController {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>, locale: &str) -> Self {
        Self {
            synth,
            locale: locale.to_string(),
            state: SpeechState::Idle,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.state == SpeechState::Speaking
    }

    /// Toggles speech for `page_text` (already tag-stripped). Speaking →
    /// cancel immediately. Idle → submit the text, unless it is blank, in
    /// which case nothing happens. Returns whether speech is active after the
    /// call.
    pub fn toggle(&mut self, page_text: &str) -> bool {
        if self.state == SpeechState::Speaking {
            self.synth.cancel();
            self.state = SpeechState::Idle;
            return false;
        }

        let text = page_text.trim();
        if text.is_empty() {
            return false;
        }

        let utterance = Utterance::reading(text.to_string(), &self.locale);
        match self.synth.speak(&utterance) {
            Ok(()) => {
                self.state = SpeechState::Speaking;
                true
            }
            Err(e) => {
                // Best-effort feature: stay idle, no user-visible error.
                debug!("Speech synthesis unavailable: {}", e);
                false
            }
        }
    }

    /// Stops any active utterance. Safe to call repeatedly while idle.
    pub fn stop(&mut self) {
        if self.state == SpeechState::Speaking {
            self.synth.cancel();
        }
        self.state = SpeechState::Idle;
    }

    /// Completion and error both land back at idle.
    pub fn on_event(&mut self, _event: SpeechEvent) {
        self.state = SpeechState::Idle;
    }
}

impl Drop for SpeechController {
    // Teardown releases the synthesizer even mid-utterance.
    fn drop(&mut self) {
        if self.state == SpeechState::Speaking {
            self.synth.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novelink_core::ports::{PortError, PortResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSynth {
        spoken: Mutex<Vec<Utterance>>,
        cancels: Mutex<usize>,
        fail: bool,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&self, utterance: &Utterance) -> PortResult<()> {
            if self.fail {
                return Err(PortError::Unexpected("no audio device".to_string()));
            }
            self.spoken.lock().unwrap().push(utterance.clone());
            Ok(())
        }

        fn cancel(&self) {
            *self.cancels.lock().unwrap() += 1;
        }
    }

    #[test]
    fn toggle_starts_then_stops() {
        let synth = Arc::new(RecordingSynth::default());
        let mut speech = SpeechController::new(synth.clone(), "zh-CN");

        assert!(speech.toggle("Page one text"));
        assert!(speech.is_speaking());
        {
            let spoken = synth.spoken.lock().unwrap();
            assert_eq!(spoken.len(), 1);
            assert_eq!(spoken[0].language, "zh-CN");
            assert_eq!(spoken[0].rate, 0.9);
        }

        assert!(!speech.toggle("Page one text"));
        assert!(!speech.is_speaking());
        assert_eq!(*synth.cancels.lock().unwrap(), 1);
    }

    #[test]
    fn blank_text_never_reaches_the_synthesizer() {
        let synth = Arc::new(RecordingSynth::default());
        let mut speech = SpeechController::new(synth.clone(), "zh-CN");
        assert!(!speech.toggle("   "));
        assert!(synth.spoken.lock().unwrap().is_empty());
    }

    #[test]
    fn stop_is_idempotent_while_idle() {
        let synth = Arc::new(RecordingSynth::default());
        let mut speech = SpeechController::new(synth.clone(), "zh-CN");
        speech.stop();
        speech.stop();
        assert!(!speech.is_speaking());
        assert_eq!(*synth.cancels.lock().unwrap(), 0);
    }

    #[test]
    fn synthesis_failure_silently_stays_idle() {
        let synth = Arc::new(RecordingSynth {
            fail: true,
            ..Default::default()
        });
        let mut speech = SpeechController::new(synth, "zh-CN");
        assert!(!speech.toggle("some text"));
        assert!(!speech.is_speaking());
    }

    #[test]
    fn completion_and_error_events_reset_to_idle() {
        let synth = Arc::new(RecordingSynth::default());
        let mut speech = SpeechController::new(synth, "zh-CN");

        speech.toggle("text");
        speech.on_event(SpeechEvent::Finished);
        assert!(!speech.is_speaking());

        speech.toggle("text");
        speech.on_event(SpeechEvent::Failed);
        assert!(!speech.is_speaking());
    }

    #[test]
    fn drop_cancels_an_active_utterance() {
        let synth = Arc::new(RecordingSynth::default());
        {
            let mut speech = SpeechController::new(synth.clone(), "zh-CN");
            speech.toggle("text");
        }
        assert_eq!(*synth.cancels.lock().unwrap(), 1);
    }
}
