//! services/app/src/adapters/speech.rs
//!
//! Speech synthesizer adapters implementing the `SpeechSynthesizer` port from
//! the `core` crate. The actual audio facility is platform-provided; when none
//! is wired in, `NullSynthesizer` accepts utterances and logs them.

use novelink_core::domain::Utterance;
use novelink_core::ports::{PortResult, SpeechSynthesizer};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// A synthesizer for hosts without an audio device. Utterances are accepted
/// and logged; the session treats them as active until cancelled.
#[derive(Default)]
pub struct NullSynthesizer {
    active: AtomicBool,
}

impl NullSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, utterance: &Utterance) -> PortResult<()> {
        info!(
            lang = %utterance.language,
            rate = utterance.rate,
            chars = utterance.text.len(),
            "Speech requested"
        );
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
