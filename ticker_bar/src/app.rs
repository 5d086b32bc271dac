//! The ticker bar window.
//!
//! `TickerBarApp` is the single owner of the `ScrollingMarquee`. Every frame it:
//!
//! - drains finished refreshes from the feed worker and lays out the newest
//!   one (cancelling the animation schedule first, restarting it after),
//! - runs the animation ticks that came due since the last frame,
//! - paints the visible segments and the control buttons (a double click on
//!   the bar asks the worker for an immediate refresh),
//! - drives whichever dialog is open.
//!
//! Nothing here blocks: the fetch happens on the worker thread.
use std::time::{Duration, Instant};

use egui::{
    Align, Align2, Button, CentralPanel, Color32, Context, FontId, Frame, Layout, PointerButton,
    Rect, RichText, Sense, Ui, ViewportCommand, Visuals, pos2, vec2,
};
use log::{debug, info, warn};
use ticker_core::feed::FeedItem;
use ticker_core::marquee::{Phase, ScrollingMarquee, TICK_INTERVAL, TextMeasure};
use ticker_core::paths::DataFiles;
use ticker_core::quote::Category;
use ticker_core::schedule::Schedule;
use ticker_core::settings::BarSettings;
use ticker_source::{FeedEvent, FeedHandle, QuoteUpdate};

use crate::dialogs::{
    EditorOutcome, MenuOutcome, SettingsMenu, SizeDialog, SizeOutcome, WatchlistEditor,
};
use crate::placement::BarGeometry;

/// Bar and dialog background.
pub const BACKGROUND: Color32 = Color32::BLACK;
/// Control and dialog text.
pub const FOREGROUND: Color32 = Color32::from_rgb(0, 255, 0);
/// Marquee font size in points.
const MARQUEE_FONT_SIZE: f32 = 15.0;
/// Control glyph size in points.
const CONTROL_FONT_SIZE: f32 = 14.0;
/// Space reserved at the right edge for the control buttons.
const CONTROLS_WIDTH: f32 = 76.0;
/// Upper bound on ticks replayed in one frame after a stall.
const MAX_CATCH_UP_TICKS: u32 = 8;
/// How often an idle bar checks the feed for new quotes.
const IDLE_REPAINT: Duration = Duration::from_millis(250);

/// Text color for a category.
pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Up => FOREGROUND,
        Category::Down => Color32::RED,
        Category::Neutral => Color32::WHITE,
        Category::Error => Color32::GRAY,
    }
}

/// Measures marquee text with the egui font atlas.
struct GlyphMeasure<'a> {
    ctx: &'a Context,
    font: FontId,
}

impl TextMeasure for GlyphMeasure<'_> {
    fn measure(&self, text: &str) -> Option<f32> {
        let width = self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
                .size()
                .x
        });
        width.is_finite().then_some(width)
    }
}

enum Dialog {
    None,
    Menu(SettingsMenu),
    Watchlist(WatchlistEditor),
    Size(SizeDialog),
}

enum DialogAction {
    Stay,
    Close,
    OpenWatchlist,
    OpenSize,
    Reload,
    ApplySize(BarSettings),
}

/// The marquee together with the schedule that animates it.
struct ScrollState {
    marquee: ScrollingMarquee,
    animation: Schedule,
}

impl ScrollState {
    fn new(scroll_speed: f32) -> Self {
        Self {
            scroll: ScrollState::new(scroll_speed),
        }
    }

    /// Cancel the animation, lay `items` out at the right edge of a viewport
    /// `viewport_width` wide, then restart the animation from `now`.
    fn load<M: TextMeasure + ?Sized>(
        &mut self,
        items: &[FeedItem],
        viewport_width: f32,
        measure: &M,
        now: Instant,
    ) {
        self.animation.cancel();
        self.marquee.set_viewport_width(viewport_width);
        self.marquee.reload(items, measure);
        self.animation.start(now);
    }

    /// Run the ticks that came due by `now`.
    fn advance(&mut self, now: Instant) {
        self.scroll.advance(now);
    }
}

/// The last quote update among `events`, if any.
fn newest_update(events: impl Iterator<Item = FeedEvent>) -> Option<QuoteUpdate> {
    events.map(|FeedEvent::Quotes(update)| update).last()
}

/// Root eframe application.
pub struct TickerBarApp {
    feed: FeedHandle,
    scroll: ScrollState,
    files: DataFiles,
    settings: BarSettings,
    placed: bool,
    locked: bool,
    dialog: Dialog,
    font: FontId,
}

impl TickerBarApp {
    /// Build the app around a running feed worker.
    pub fn new(
        ctx: &Context,
        feed: FeedHandle,
        files: DataFiles,
        settings: BarSettings,
        scroll_speed: f32,
    ) -> Self {
        ctx.set_visuals(bar_visuals());
        Self {
            feed,
            scroll: ScrollState::new(scroll_speed),
            files,
            settings,
            placed: false,
            locked: true,
            dialog: Dialog::None,
            font: FontId::monospace(MARQUEE_FONT_SIZE),
        }
    }

    /// Apply the saved geometry once the monitor size is known.
    fn place_once(&mut self, ctx: &Context) {
        if self.placed {
            return;
        }
        let (screen, current) = ctx.input(|i| (i.viewport().monitor_size, i.viewport().outer_rect));
        if let Some(screen) = screen {
            BarGeometry::for_settings(&self.settings, screen, current).apply(ctx);
            self.placed = true;
        }
    }

    fn drain_feed(&mut self, ctx: &Context, now: Instant) {
        if let Some(update) = newest_update(self.feed.try_events()) {
            self.load(ctx, &update, now);
        }
    }

    fn load(&mut self, ctx: &Context, update: &QuoteUpdate, now: Instant) {
        debug!(
            "Quotes for {} symbols at {}",
            update.symbols,
            update.fetched_at.format("%H:%M:%S")
        );
        let measure = GlyphMeasure {
            ctx,
            font: self.font.clone(),
        };
        self.scroll
            .load(&update.items, ctx.screen_rect().width(), &measure, now);
    }

    fn paint_segments(&self, ui: &Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let y = rect.center().y;
        for segment in self.scroll.marquee.segments() {
            if segment.right_edge() < 0.0 || segment.position_x > rect.width() {
                continue;
            }
            painter.text(
                pos2(rect.left() + segment.position_x, y),
                Align2::LEFT_CENTER,
                &segment.text,
                self.font.clone(),
                category_color(segment.category),
            );
        }
    }

    fn controls(&mut self, ui: &mut Ui, rect: Rect) {
        let area = Rect::from_min_max(pos2(rect.right() - CONTROLS_WIDTH, rect.top()), rect.max);
        ui.painter().rect_filled(area, 0.0, BACKGROUND);

        let window_origin = ui
            .ctx()
            .input(|i| i.viewport().outer_rect)
            .map(|outer| outer.min.to_vec2());
        ui.allocate_ui_at_rect(area, |ui| {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let gear = control_button(ui, "⚙");
                if gear.clicked() {
                    self.dialog = match self.dialog {
                        Dialog::Menu(_) => Dialog::None,
                        _ => Dialog::Menu(SettingsMenu::new(
                            window_origin.map(|origin| gear.rect.left_top() + origin - vec2(120.0, 90.0)),
                        )),
                    };
                }
                let lock_glyph = if self.locked { "🔒" } else { "🔓" };
                if control_button(ui, lock_glyph).clicked() {
                    self.locked = !self.locked;
                    debug!("Bar {}", if self.locked { "locked" } else { "unlocked" });
                }
                if control_button(ui, "✖").clicked() {
                    info!("Close requested");
                    ui.ctx().send_viewport_cmd(ViewportCommand::Close);
                }
            });
        });
    }

    fn show_dialog(&mut self, ctx: &Context) {
        let action = match &mut self.dialog {
            Dialog::None => DialogAction::Stay,
            Dialog::Menu(menu) => match menu.show(ctx) {
                MenuOutcome::Open => DialogAction::Stay,
                MenuOutcome::ManageWatchlist => DialogAction::OpenWatchlist,
                MenuOutcome::Size => DialogAction::OpenSize,
                MenuOutcome::Dismissed => DialogAction::Close,
            },
            Dialog::Watchlist(editor) => match editor.show(ctx) {
                EditorOutcome::Open => DialogAction::Stay,
                EditorOutcome::Closed => DialogAction::Reload,
            },
            Dialog::Size(size) => match size.show(ctx) {
                SizeOutcome::Open => DialogAction::Stay,
                SizeOutcome::Apply(settings) => DialogAction::ApplySize(settings),
                SizeOutcome::Default => DialogAction::ApplySize(BarSettings::default()),
                SizeOutcome::Cancel => DialogAction::Close,
            },
        };

        match action {
            DialogAction::Stay => {}
            DialogAction::Close => self.dialog = Dialog::None,
            DialogAction::OpenWatchlist => {
                self.dialog = Dialog::Watchlist(WatchlistEditor::open(self.files.watchlist.clone()));
            }
            DialogAction::OpenSize => self.dialog = Dialog::Size(SizeDialog::new(&self.settings)),
            DialogAction::Reload => {
                self.dialog = Dialog::None;
                if let Err(e) = self.feed.reload() {
                    warn!("Feed worker unavailable: {}", e);
                }
            }
            DialogAction::ApplySize(settings) => {
                self.dialog = Dialog::None;
                self.apply_settings(ctx, settings);
            }
        }
    }

    fn apply_settings(&mut self, ctx: &Context, settings: BarSettings) {
        info!("Bar size: width={} height={}", settings.width, settings.height);
        settings.save_or_warn(&self.files.settings);
        self.settings = settings;
        self.placed = false;
        self.place_once(ctx);
    }
}

fn control_button(ui: &mut Ui, glyph: &str) -> egui::Response {
    ui.add(
        Button::new(RichText::new(glyph).color(FOREGROUND).size(CONTROL_FONT_SIZE))
            .frame(false),
    )
}

fn bar_visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.extreme_bg_color = BACKGROUND;
    visuals.override_text_color = Some(FOREGROUND);
    visuals.selection.bg_fill = FOREGROUND;
    visuals.selection.stroke.color = BACKGROUND;
    visuals
}

impl eframe::App for TickerBarApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.place_once(ctx);
        self.drain_feed(ctx, now);

        self.scroll.advance(now);

        CentralPanel::default()
            .frame(Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.scroll.marquee.set_viewport_width(rect.width());

                let bar = ui.interact(rect, ui.id().with("bar"), Sense::click_and_drag());
                if !self.locked && bar.drag_started_by(PointerButton::Primary) {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }
                if bar.double_clicked() {
                    debug!("Manual refresh");
                    if let Err(e) = self.feed.refresh() {
                        warn!("Feed worker unavailable: {}", e);
                    }
                }

                self.paint_segments(ui, rect);
                self.controls(ui, rect);
            });

        self.show_dialog(ctx);

        let wait = match self.scroll.marquee.phase() {
            Phase::Scrolling => self
                .scroll
                .animation
                .time_until(Instant::now())
                .unwrap_or(TICK_INTERVAL),
            Phase::Idle => IDLE_REPAINT,
        };
        ctx.request_repaint_after(wait);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn categories_map_to_bar_colors() {
        assert_eq!(category_color(Category::Up), Color32::from_rgb(0, 255, 0));
        assert_eq!(category_color(Category::Down), Color32::RED);
        assert_eq!(category_color(Category::Neutral), Color32::WHITE);
        assert_eq!(category_color(Category::Error), Color32::GRAY);
    }

    fn ten_per_char(text: &str) -> Option<f32> {
        Some(text.len() as f32 * 10.0)
    }

    fn update(texts: &[&str]) -> QuoteUpdate {
        QuoteUpdate {
            items: texts.iter().map(|t| FeedItem::new(*t, Category::Up)).collect(),
            symbols: texts.len(),
            fetched_at: Local::now(),
        }
    }

    #[test]
    fn load_mid_scroll_restarts_at_right_edge() {
        let start = Instant::now();
        let mut scroll = ScrollState::new(0.5);
        scroll.load(&update(&["AAPL"]).items, 800.0, &ten_per_char, start);
        scroll.advance(start + TICK_INTERVAL * 4);
        assert_eq!(scroll.marquee.segments()[0].position_x, 798.0);

        let reload_at = start + TICK_INTERVAL * 4 + TICK_INTERVAL / 2;
        scroll.load(&update(&["MSFT", "IBM"]).items, 1000.0, &ten_per_char, reload_at);
        let segments = scroll.marquee.segments();
        assert_eq!(segments[0].position_x, 1000.0);
        assert_eq!(segments[1].position_x, 1040.0);

        // The schedule restarted at the reload, so nothing is due yet.
        assert_eq!(scroll.animation.poll(reload_at), 0);
        assert_eq!(scroll.animation.poll(reload_at + TICK_INTERVAL), 1);
    }

    #[test]
    fn ticks_stop_being_replayed_after_a_long_stall() {
        let start = Instant::now();
        let mut scroll = ScrollState::new(1.0);
        scroll.load(&update(&["AAPL"]).items, 800.0, &ten_per_char, start);
        scroll.advance(start + TICK_INTERVAL * 100);
        assert_eq!(
            scroll.marquee.segments()[0].position_x,
            800.0 - MAX_CATCH_UP_TICKS as f32
        );
    }

    #[test]
    fn only_the_newest_queued_update_is_laid_out() {
        let queued = vec![
            FeedEvent::Quotes(update(&["AAPL", "MSFT"])),
            FeedEvent::Quotes(update(&["NVDA"])),
        ];
        let newest = newest_update(queued.into_iter()).unwrap();

        let mut scroll = ScrollState::new(0.5);
        scroll.load(&newest.items, 800.0, &ten_per_char, Instant::now());
        let texts: Vec<&str> = scroll.marquee.segments().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["NVDA"]);
        assert!(newest_update(std::iter::empty()).is_none());
    }

    #[test]
    fn glyph_measure_grows_with_text() {
        let ctx = Context::default();
        let _ = ctx.run(Default::default(), |_| {});
        let measure = GlyphMeasure {
            ctx: &ctx,
            font: FontId::monospace(MARQUEE_FONT_SIZE),
        };
        let short = measure.measure("AAPL").unwrap();
        let long = measure.measure("AAPL: $101.00 (+1.00%)   ").unwrap();
        assert!(short > 0.0);
        assert!(long > short);
    }
}
