//! Scrolling marquee layout engine.
//!
//! `ScrollingMarquee` owns the rendered segments of the ticker bar and moves
//! them left by a constant amount on every tick. Segments are chained: each
//! one starts where the previous one ends. Once the right edge of the last
//! segment has passed the left edge of the viewport, the whole chain is
//! translated right by `viewport_width + total_width` in one step, so the tail
//! re-enters exactly where the head would next have appeared.
//!
//! The wrap lands the tail past the right edge only while the chain is wider
//! than one step. A chain narrower than `scroll_speed` (for example one whose
//! text could not be measured and has zero width) re-enters up to one step
//! inside the viewport.
//!
//! Text measurement is a collaborator (`TextMeasure`); the engine itself never
//! touches fonts.
use std::time::Duration;

use crate::feed::FeedItem;
use crate::quote::Category;

/// Default horizontal speed in pixels per tick.
pub const DEFAULT_SCROLL_SPEED: f32 = 0.5;
/// Interval between two animation ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(15);
/// Wrap distance used while the viewport has no width yet.
pub const FALLBACK_VIEWPORT_WIDTH: f32 = 600.0;

/// Measures the rendered width of a text in pixels.
pub trait TextMeasure {
    /// Width of `text`, or `None` when it cannot be measured.
    fn measure(&self, text: &str) -> Option<f32>;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> Option<f32>,
{
    fn measure(&self, text: &str) -> Option<f32> {
        self(text)
    }
}

/// One symbol's text block positioned on the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSegment {
    /// Text to draw.
    pub text: String,
    /// Color category.
    pub category: Category,
    /// Left edge in viewport coordinates.
    pub position_x: f32,
    /// Measured width; `0` when measurement failed.
    pub width: f32,
}

impl RenderedSegment {
    /// Right edge in viewport coordinates.
    pub fn right_edge(&self) -> f32 {
        self.position_x + self.width
    }
}

/// Whether there is anything to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No segments laid out.
    Idle,
    /// At least one segment is laid out and moving.
    Scrolling,
}

/// Horizontal scrolling layout of marquee segments.
#[derive(Debug, Clone)]
pub struct ScrollingMarquee {
    segments: Vec<RenderedSegment>,
    viewport_width: f32,
    scroll_speed: f32,
}

impl ScrollingMarquee {
    /// Create an idle marquee.
    pub fn new(viewport_width: f32, scroll_speed: f32) -> Self {
        Self {
            segments: Vec::new(),
            viewport_width,
            scroll_speed,
        }
    }

    /// Replace all segments, laying them out from `insertion_x`.
    pub fn load_segments<M: TextMeasure + ?Sized>(
        &mut self,
        items: &[FeedItem],
        viewport_width: f32,
        insertion_x: f32,
        measure: &M,
    ) {
        self.viewport_width = viewport_width;
        let mut x = insertion_x;
        self.segments = items
            .iter()
            .map(|item| {
                let width = measure
                    .measure(&item.text)
                    .filter(|w| w.is_finite() && *w >= 0.0)
                    .unwrap_or(0.0);
                let segment = RenderedSegment {
                    text: item.text.clone(),
                    category: item.category,
                    position_x: x,
                    width,
                };
                x += width;
                segment
            })
            .collect();
    }

    /// Replace all segments, entering at the right edge of the viewport.
    pub fn reload<M: TextMeasure + ?Sized>(&mut self, items: &[FeedItem], measure: &M) {
        let width = self.viewport_width;
        self.load_segments(items, width, width, measure);
    }

    /// Advance the animation by one step.
    pub fn tick(&mut self) {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return;
        };
        let left_edge = first.position_x - self.scroll_speed;
        let right_edge = last.right_edge() - self.scroll_speed;

        let mut dx = -self.scroll_speed;
        if right_edge < 0.0 {
            let total_width = right_edge - left_edge;
            dx += self.wrap_viewport_width() + total_width;
        }
        for segment in &mut self.segments {
            segment.position_x += dx;
        }
    }

    fn wrap_viewport_width(&self) -> f32 {
        if self.viewport_width > 0.0 {
            self.viewport_width
        } else {
            FALLBACK_VIEWPORT_WIDTH
        }
    }

    /// Follow a window resize. Segments keep their positions.
    pub fn set_viewport_width(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.segments.is_empty() {
            Phase::Idle
        } else {
            Phase::Scrolling
        }
    }

    /// Laid out segments, left to right.
    pub fn segments(&self) -> &[RenderedSegment] {
        &self.segments
    }
}

impl Default for ScrollingMarquee {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_SCROLL_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pixels per character.
    fn fixed_width(text: &str) -> Option<f32> {
        Some(text.chars().count() as f32 * 10.0)
    }

    fn items(texts: &[&str]) -> Vec<FeedItem> {
        texts.iter().map(|t| FeedItem::new(*t, Category::Neutral)).collect()
    }

    fn offsets(marquee: &ScrollingMarquee) -> Vec<f32> {
        let base = marquee.segments()[0].position_x;
        marquee.segments().iter().map(|s| s.position_x - base).collect()
    }

    #[test]
    fn segments_chain_from_insertion_point() {
        let mut marquee = ScrollingMarquee::default();
        marquee.load_segments(&items(&["AB", "CDE", "F"]), 300.0, 300.0, &fixed_width);
        let xs: Vec<f32> = marquee.segments().iter().map(|s| s.position_x).collect();
        assert_eq!(xs, vec![300.0, 320.0, 350.0]);
        assert_eq!(marquee.phase(), Phase::Scrolling);
    }

    #[test]
    fn layout_is_deterministic() {
        let input = items(&["AAPL: $1.00   ", "MSFT: $2.00   "]);
        let mut a = ScrollingMarquee::default();
        let mut b = ScrollingMarquee::default();
        a.load_segments(&input, 800.0, 800.0, &fixed_width);
        b.load_segments(&input, 800.0, 800.0, &fixed_width);
        a.load_segments(&input, 800.0, 800.0, &fixed_width);
        assert_eq!(a.segments(), b.segments());
    }

    #[test]
    fn tick_moves_every_segment_by_speed() {
        let mut marquee = ScrollingMarquee::new(100.0, 2.0);
        marquee.load_segments(&items(&["AB", "CD"]), 100.0, 50.0, &fixed_width);
        marquee.tick();
        assert_eq!(marquee.segments()[0].position_x, 48.0);
        assert_eq!(marquee.segments()[1].position_x, 68.0);
    }

    #[test]
    fn tick_on_empty_marquee_stays_idle() {
        let mut marquee = ScrollingMarquee::default();
        for _ in 0..10 {
            marquee.tick();
        }
        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(marquee.segments().is_empty());
    }

    #[test]
    fn loading_nothing_returns_to_idle() {
        let mut marquee = ScrollingMarquee::default();
        marquee.load_segments(&items(&["AB"]), 100.0, 0.0, &fixed_width);
        marquee.load_segments(&[], 100.0, 100.0, &fixed_width);
        assert_eq!(marquee.phase(), Phase::Idle);
    }

    #[test]
    fn chain_wraps_past_right_edge_without_reflow() {
        let mut marquee = ScrollingMarquee::new(200.0, 4.0);
        marquee.load_segments(&items(&["AAAA", "BB", "CCC"]), 200.0, 0.0, &fixed_width);
        let before = offsets(&marquee);

        let mut wrapped = false;
        for _ in 0..200 {
            let prev_right = marquee.segments().last().unwrap().right_edge();
            marquee.tick();
            let right = marquee.segments().last().unwrap().right_edge();
            if right > prev_right {
                assert!(right > marquee.viewport_width);
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        assert_eq!(offsets(&marquee), before);
    }

    #[test]
    fn wrap_places_tail_where_head_would_appear() {
        let mut marquee = ScrollingMarquee::new(100.0, 1.0);
        marquee.load_segments(&items(&["AB"]), 100.0, -20.0, &fixed_width);
        // right edge at 0.0; the next tick leaves it at -1.0 and triggers the wrap
        marquee.tick();
        let segment = &marquee.segments()[0];
        assert_eq!(segment.position_x, -21.0 + 100.0 + 20.0);
        assert_eq!(segment.right_edge(), 119.0);
    }

    #[test]
    fn single_narrow_segment_keeps_cycling() {
        let mut marquee = ScrollingMarquee::new(500.0, 5.0);
        marquee.reload(&items(&["X"]), &fixed_width);
        assert_eq!(marquee.segments()[0].position_x, 500.0);
        let mut wraps = 0;
        let mut prev = marquee.segments()[0].position_x;
        for _ in 0..1000 {
            marquee.tick();
            let x = marquee.segments()[0].position_x;
            if x > prev {
                wraps += 1;
            }
            prev = x;
        }
        assert!(wraps >= 8);
        assert!((-10.0..=500.0).contains(&prev));
    }

    #[test]
    fn unmeasurable_text_counts_as_zero_width() {
        let measure = |text: &str| if text == "bad" { None } else { fixed_width(text) };
        let mut marquee = ScrollingMarquee::default();
        marquee.load_segments(&items(&["AB", "bad", "CD"]), 100.0, 0.0, &measure);
        assert_eq!(marquee.segments()[1].width, 0.0);
        assert_eq!(marquee.segments()[2].position_x, 20.0);
        marquee.tick();
        assert_eq!(marquee.phase(), Phase::Scrolling);
    }

    #[test]
    fn zero_viewport_uses_fallback_wrap_distance() {
        let mut marquee = ScrollingMarquee::new(0.0, 1.0);
        marquee.load_segments(&items(&["AB"]), 0.0, -20.0, &fixed_width);
        marquee.tick();
        assert_eq!(marquee.segments()[0].position_x, -21.0 + FALLBACK_VIEWPORT_WIDTH + 20.0);
    }

    #[test]
    fn resize_does_not_move_segments() {
        let mut marquee = ScrollingMarquee::default();
        marquee.load_segments(&items(&["AB"]), 100.0, 40.0, &fixed_width);
        marquee.set_viewport_width(1920.0);
        assert_eq!(marquee.segments()[0].position_x, 40.0);
        assert_eq!(marquee.viewport_width, 1920.0);
    }

    #[test]
    fn zero_width_chain_wraps_one_step_inside_viewport() {
        let unmeasurable = |_: &str| -> Option<f32> { None };
        let mut marquee = ScrollingMarquee::new(100.0, 0.5);
        marquee.load_segments(&items(&["AAPL"]), 100.0, 0.0, &unmeasurable);
        marquee.tick();
        assert_eq!(marquee.segments()[0].position_x, 99.5);
    }
}
