//! services/app/src/reader/navigation.rs
//!
//! Bounds-checked page navigation with a two-phase commit: a request starts a
//! short scroll-to-top animation, and the page index changes only when the
//! animation completes. A newer request cancels whatever is in flight.

use novelink_core::domain::NavigationIntent;

/// Duration of the page-turn scroll animation.
pub const PAGE_TURN_ANIMATION_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Idle,
    Animating {
        target: usize,
        started_at_ms: u64,
        start_scroll: f32,
    },
}

/// One animation step produced by [`NavigationController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Scroll offset the view should adopt for this frame.
    pub scroll_to: f32,
    /// Set on the final frame, once the new page index has been committed.
    pub committed: Option<usize>,
}

fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}

/// Page navigation state for one open novel.
#[derive(Debug)]
pub struct NavigationController {
    current_page: usize,
    page_count: usize,
    transition: Transition,
}

impl NavigationController {
    pub fn new(page_count: usize, initial_page: usize) -> Self {
        Self {
            current_page: initial_page.min(page_count.saturating_sub(1)),
            page_count,
            transition: Transition::Idle,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_animating(&self) -> bool {
        self.transition != Transition::Idle
    }

    /// Requests a move to `target`. Out-of-bounds targets are silently
    /// ignored and leave all state unchanged. A valid request replaces any
    /// in-flight animation (last-request-wins), so at most one animation is
    /// ever active.
    pub fn request_page_change(&mut self, target: usize, now_ms: u64, scroll_offset: f32) -> bool {
        if target >= self.page_count {
            return false;
        }
        self.transition = Transition::Animating {
            target,
            started_at_ms: now_ms,
            start_scroll: scroll_offset,
        };
        true
    }

    /// Resolves an intent against the current page and issues the request.
    /// Relative intents off either end fall out of bounds and are ignored.
    pub fn dispatch(&mut self, intent: NavigationIntent, now_ms: u64, scroll_offset: f32) -> bool {
        let target = match intent {
            NavigationIntent::Previous => match self.current_page.checked_sub(1) {
                Some(p) => p,
                None => return false,
            },
            NavigationIntent::Next => self.current_page + 1,
            NavigationIntent::First => 0,
            NavigationIntent::Last => {
                if self.page_count == 0 {
                    return false;
                }
                self.page_count - 1
            }
        };
        self.request_page_change(target, now_ms, scroll_offset)
    }

    /// Advances the animation. Interpolates the scroll offset toward zero
    /// with an ease-out-cubic curve over [`PAGE_TURN_ANIMATION_MS`]; on the
    /// final frame the target page is committed and the controller returns to
    /// idle. Returns `None` while idle.
    pub fn tick(&mut self, now_ms: u64) -> Option<Frame> {
        let Transition::Animating {
            target,
            started_at_ms,
            start_scroll,
        } = self.transition
        else {
            return None;
        };

        let elapsed = now_ms.saturating_sub(started_at_ms);
        let progress = (elapsed as f32 / PAGE_TURN_ANIMATION_MS as f32).min(1.0);
        let scroll_to = start_scroll * (1.0 - ease_out_cubic(progress));

        if progress >= 1.0 {
            self.current_page = target;
            self.transition = Transition::Idle;
            Some(Frame {
                scroll_to: 0.0,
                committed: Some(target),
            })
        } else {
            Some(Frame {
                scroll_to,
                committed: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(nav: &mut NavigationController, now_ms: u64) -> Option<usize> {
        nav.tick(now_ms).and_then(|f| f.committed)
    }

    #[test]
    fn out_of_bounds_requests_are_silent_no_ops() {
        let mut nav = NavigationController::new(3, 0);
        assert!(!nav.request_page_change(3, 0, 100.0));
        assert!(!nav.request_page_change(usize::MAX, 0, 100.0));
        assert!(!nav.is_animating());
        assert_eq!(nav.current_page(), 0);
    }

    #[test]
    fn previous_off_the_front_is_ignored() {
        let mut nav = NavigationController::new(3, 0);
        assert!(!nav.dispatch(NavigationIntent::Previous, 0, 0.0));
        assert_eq!(nav.current_page(), 0);
    }

    #[test]
    fn next_off_the_end_is_ignored() {
        let mut nav = NavigationController::new(2, 1);
        assert!(!nav.dispatch(NavigationIntent::Next, 0, 0.0));
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn zero_pages_rejects_everything() {
        let mut nav = NavigationController::new(0, 0);
        assert!(!nav.dispatch(NavigationIntent::Next, 0, 0.0));
        assert!(!nav.dispatch(NavigationIntent::Last, 0, 0.0));
        assert!(!nav.request_page_change(0, 0, 0.0));
    }

    #[test]
    fn page_commits_only_when_the_animation_finishes() {
        let mut nav = NavigationController::new(3, 0);
        assert!(nav.request_page_change(1, 0, 400.0));
        assert_eq!(nav.current_page(), 0);

        let frame = nav.tick(75).unwrap();
        assert!(frame.committed.is_none());
        assert_eq!(nav.current_page(), 0);

        assert_eq!(committed(&mut nav, 150), Some(1));
        assert_eq!(nav.current_page(), 1);
        assert!(!nav.is_animating());
    }

    #[test]
    fn scroll_interpolates_monotonically_toward_zero() {
        let mut nav = NavigationController::new(2, 0);
        nav.request_page_change(1, 0, 300.0);

        let mut last = f32::MAX;
        for now in [10, 40, 80, 120, 150] {
            let frame = nav.tick(now).unwrap();
            assert!(frame.scroll_to < last);
            assert!(frame.scroll_to >= 0.0);
            last = frame.scroll_to;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn a_new_request_cancels_the_in_flight_animation() {
        let mut nav = NavigationController::new(5, 0);
        nav.request_page_change(1, 0, 200.0);
        nav.tick(50);

        // Retarget mid-flight; the first request must never commit.
        assert!(nav.request_page_change(3, 60, 120.0));
        assert_eq!(committed(&mut nav, 60 + PAGE_TURN_ANIMATION_MS), Some(3));
        assert_eq!(nav.current_page(), 3);
    }

    #[test]
    fn intents_resolve_against_the_current_page() {
        let mut nav = NavigationController::new(4, 2);
        assert!(nav.dispatch(NavigationIntent::Next, 0, 0.0));
        assert_eq!(committed(&mut nav, PAGE_TURN_ANIMATION_MS), Some(3));

        assert!(nav.dispatch(NavigationIntent::First, 200, 0.0));
        assert_eq!(committed(&mut nav, 200 + PAGE_TURN_ANIMATION_MS), Some(0));

        assert!(nav.dispatch(NavigationIntent::Last, 400, 0.0));
        assert_eq!(committed(&mut nav, 400 + PAGE_TURN_ANIMATION_MS), Some(3));
    }

    #[test]
    fn idle_ticks_produce_no_frames() {
        let mut nav = NavigationController::new(2, 0);
        assert!(nav.tick(1_000).is_none());
    }
}
