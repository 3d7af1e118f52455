//! services/app/src/reader/input.rs
//!
//! Input-device parsing for the reader. Keyboard codes, touch gestures and
//! tap zones are each reduced to a [`NavigationIntent`] here; none of this
//! knows anything about pages or bounds.

use novelink_core::domain::NavigationIntent;

/// A swipe must finish within this long to count as a page-turn gesture.
pub const SWIPE_MAX_DURATION_MS: u64 = 300;
/// Minimum horizontal displacement for a swipe, in pixels.
pub const SWIPE_MIN_DISTANCE_PX: f32 = 30.0;
/// A swipe must also cover this fraction of the viewport width.
pub const SWIPE_VIEWPORT_FRACTION: f32 = 0.1;
/// Width of each edge tap zone as a fraction of the viewport.
pub const TAP_ZONE_FRACTION: f32 = 0.25;

/// Maps a keyboard event to an intent. Suppressed entirely while focus is
/// inside a text input.
pub fn intent_for_key(code: &str, focus_in_text_input: bool) -> Option<NavigationIntent> {
    if focus_in_text_input {
        return None;
    }
    match code {
        "ArrowLeft" | "KeyA" | "KeyK" => Some(NavigationIntent::Previous),
        "ArrowRight" | "KeyD" | "Space" | "KeyJ" => Some(NavigationIntent::Next),
        "Home" => Some(NavigationIntent::First),
        "End" => Some(NavigationIntent::Last),
        _ => None,
    }
}

/// Maps a pointer tap to an intent: fixed quarter-width zones on the left and
/// right screen edges, active in the mobile layout only.
pub fn intent_for_tap(x: f32, viewport_width: f32, mobile_layout: bool) -> Option<NavigationIntent> {
    if !mobile_layout || viewport_width <= 0.0 {
        return None;
    }
    if x < viewport_width * TAP_ZONE_FRACTION {
        Some(NavigationIntent::Previous)
    } else if x > viewport_width * (1.0 - TAP_ZONE_FRACTION) {
        Some(NavigationIntent::Next)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchPoint {
    x: f32,
    y: f32,
    time_ms: u64,
}

/// Tracks one touch from start to end and recognizes the page-turn swipe.
#[derive(Debug, Default)]
pub struct TouchTracker {
    start: Option<TouchPoint>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f32, y: f32, time_ms: u64) {
        self.start = Some(TouchPoint { x, y, time_ms });
    }

    /// Ends the touch and returns an intent when the gesture qualifies: short
    /// (<300 ms), clearly horizontal (|dx| > 30 px and |dx| > |dy|), and wide
    /// enough relative to the viewport (|dx| > 10% of its width). Anything
    /// else is ignored.
    pub fn touch_end(
        &mut self,
        x: f32,
        y: f32,
        time_ms: u64,
        viewport_width: f32,
    ) -> Option<NavigationIntent> {
        let start = self.start.take()?;
        let dx = start.x - x;
        let dy = start.y - y;
        let duration = time_ms.saturating_sub(start.time_ms);

        if duration >= SWIPE_MAX_DURATION_MS
            || dx.abs() <= SWIPE_MIN_DISTANCE_PX
            || dx.abs() <= dy.abs()
        {
            return None;
        }

        let threshold = viewport_width * SWIPE_VIEWPORT_FRACTION;
        if dx > threshold {
            // Finger moved left: forward.
            Some(NavigationIntent::Next)
        } else if dx < -threshold {
            Some(NavigationIntent::Previous)
        } else {
            None
        }
    }
}
