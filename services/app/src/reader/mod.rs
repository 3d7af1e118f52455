//! services/app/src/reader/mod.rs
//!
//! The reading session: fetches one novel through the content gateway, pages
//! it, and routes keyboard/touch/tap input through bounds-checked navigation
//! while keeping preferences and speech in sync.

pub mod input;
pub mod navigation;
pub mod preferences;
pub mod speech;

use crate::auth;
use crate::error::AppError;
use input::TouchTracker;
use navigation::{Frame, NavigationController};
use novelink_core::domain::{ContentFragment, NavigationIntent, Novel};
use novelink_core::paginate::Paginator;
use novelink_core::ports::{ContentGateway, KeyValueStore, PortError, SpeechEvent, SpeechSynthesizer};
use preferences::PreferenceStore;
use speech::SpeechController;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One open novel and everything needed to read it.
pub struct ReaderSession {
    novel: Novel,
    paginator: Paginator,
    prefs: PreferenceStore,
    nav: NavigationController,
    speech: SpeechController,
    touch: TouchTracker,
    gateway: Arc<dyn ContentGateway>,
}

impl ReaderSession {
    /// Opens a novel for reading.
    ///
    /// Requires a stored auth session (reading is gated behind login) and a
    /// fetchable novel; a missing row maps to [`AppError::ContentUnavailable`]
    /// so the caller can show the empty-state with a return-to-library action.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ContentGateway>,
        synth: Arc<dyn SpeechSynthesizer>,
        novel_id: Uuid,
        system_prefers_dark: bool,
        speech_locale: &str,
    ) -> Result<Self, AppError> {
        if auth::current_session(store.as_ref()).is_none() {
            return Err(AppError::AuthenticationRequired);
        }

        let novel = gateway.fetch_novel(novel_id).await.map_err(|e| match e {
            PortError::NotFound(msg) => AppError::ContentUnavailable(msg),
            other => AppError::Port(other),
        })?;

        let paginator = Paginator::new(&novel.content);
        let mut prefs = PreferenceStore::load(store, novel_id, system_prefers_dark);
        prefs.clamp_page_index(paginator.page_count());
        let nav = NavigationController::new(paginator.page_count(), prefs.page_index());

        info!(
            novel = %novel.id,
            pages = paginator.page_count(),
            resume_page = nav.current_page(),
            "Reader session opened"
        );

        Ok(Self {
            novel,
            paginator,
            prefs,
            nav,
            speech: SpeechController::new(synth, speech_locale),
            touch: TouchTracker::new(),
            gateway,
        })
    }

    //------------------------------------------------------------------
    // Input
    //------------------------------------------------------------------

    pub fn handle_key(
        &mut self,
        code: &str,
        focus_in_text_input: bool,
        now_ms: u64,
        scroll_offset: f32,
    ) -> bool {
        match input::intent_for_key(code, focus_in_text_input) {
            Some(intent) => self.dispatch(intent, now_ms, scroll_offset),
            None => false,
        }
    }

    pub fn handle_touch_start(&mut self, x: f32, y: f32, time_ms: u64) {
        self.touch.touch_start(x, y, time_ms);
    }

    pub fn handle_touch_end(
        &mut self,
        x: f32,
        y: f32,
        time_ms: u64,
        viewport_width: f32,
        scroll_offset: f32,
    ) -> bool {
        match self.touch.touch_end(x, y, time_ms, viewport_width) {
            Some(intent) => self.dispatch(intent, time_ms, scroll_offset),
            None => false,
        }
    }

    pub fn handle_tap(
        &mut self,
        x: f32,
        viewport_width: f32,
        mobile_layout: bool,
        now_ms: u64,
        scroll_offset: f32,
    ) -> bool {
        match input::intent_for_tap(x, viewport_width, mobile_layout) {
            Some(intent) => self.dispatch(intent, now_ms, scroll_offset),
            None => false,
        }
    }

    /// Every input device funnels into this one bounds-checked entry point.
    pub fn dispatch(&mut self, intent: NavigationIntent, now_ms: u64, scroll_offset: f32) -> bool {
        self.nav.dispatch(intent, now_ms, scroll_offset)
    }

    pub fn request_page_change(&mut self, target: usize, now_ms: u64, scroll_offset: f32) -> bool {
        self.nav.request_page_change(target, now_ms, scroll_offset)
    }

    /// Advances the page-turn animation. A committed page index is persisted
    /// in the same call, strictly after the state change.
    pub fn tick(&mut self, now_ms: u64) -> Option<Frame> {
        let frame = self.nav.tick(now_ms)?;
        if let Some(page) = frame.committed {
            self.prefs.set_page_index(page);
        }
        Some(frame)
    }

    //------------------------------------------------------------------
    // Speech
    //------------------------------------------------------------------

    pub fn toggle_speech(&mut self) -> bool {
        let text = self.paginator.page_text(self.nav.current_page());
        self.speech.toggle(&text)
    }

    pub fn on_speech_event(&mut self, event: SpeechEvent) {
        self.speech.on_event(event);
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }

    //------------------------------------------------------------------
    // Preferences
    //------------------------------------------------------------------

    pub fn toggle_dark_mode(&mut self) {
        self.prefs.toggle_dark_mode();
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode()
    }

    pub fn increase_font_size(&mut self) {
        self.prefs.increase_font_size();
    }

    pub fn decrease_font_size(&mut self) {
        self.prefs.decrease_font_size();
    }

    pub fn cycle_font_size(&mut self) {
        self.prefs.cycle_font_size();
    }

    pub fn font_size(&self) -> u32 {
        self.prefs.font_size()
    }

    //------------------------------------------------------------------
    // View
    //------------------------------------------------------------------

    pub fn novel(&self) -> &Novel {
        &self.novel
    }

    pub fn current_page(&self) -> usize {
        self.nav.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.nav.page_count()
    }

    /// The fragments to render for the current page; empty when the novel has
    /// no content.
    pub fn current_fragments(&self) -> &[ContentFragment] {
        self.paginator.page(self.nav.current_page()).unwrap_or(&[])
    }

    pub fn on_last_page(&self) -> bool {
        self.page_count() > 0 && self.current_page() == self.page_count() - 1
    }

    /// Publication date shown in the reading header, `YYYY-MM-DD`.
    pub fn created_date(&self) -> String {
        self.novel.created_at.format("%Y-%m-%d").to_string()
    }

    //------------------------------------------------------------------
    // Likes
    //------------------------------------------------------------------

    /// Increments the like counter and writes it back through the gateway.
    /// The local copy only changes once the gateway accepts the write.
    pub async fn like(&mut self) -> Result<u64, AppError> {
        let mut stats = self.novel.stats.clone();
        stats.likes += 1;
        self.gateway.record_like(self.novel.id, stats.clone()).await?;
        self.novel.stats = stats;
        Ok(self.novel.stats.likes)
    }
}
