//! Secondary windows: the settings menu, the watchlist editor and the size dialog.
//!
//! Each dialog is an immediate viewport (a real OS window where the backend
//! supports it, an `egui::Window` inside the bar otherwise). Dialogs never
//! touch the feed or the window geometry themselves; they report an outcome
//! and the app acts on it.
use std::path::PathBuf;

use egui::{
    Align, Button, CentralPanel, Context, Frame, Key, Layout, Margin, Pos2, RichText, ScrollArea,
    TextEdit, Ui, ViewportBuilder, ViewportClass, ViewportId, WindowLevel,
};
use log::{info, warn};
use ticker_core::settings::BarSettings;
use ticker_core::watchlist::{AddRejection, Watchlist};

use crate::app::{BACKGROUND, FOREGROUND};

/// What the settings menu asks for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Still open.
    #[default]
    Open,
    /// Open the watchlist editor.
    ManageWatchlist,
    /// Open the size dialog.
    Size,
    /// Closed without a choice.
    Dismissed,
}

/// What the watchlist editor reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// Still open.
    #[default]
    Open,
    /// Closed, saved or not; the feed should reload.
    Closed,
}

/// What the size dialog reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizeOutcome {
    /// Still open.
    #[default]
    Open,
    /// Apply and persist these settings.
    Apply(BarSettings),
    /// Restore the default geometry.
    Default,
    /// Closed without changes.
    Cancel,
}

/// Show `add_contents` in its own viewport. Returns the contents' outcome and
/// whether the user asked to close the window.
fn show_dialog<R: Default>(
    ctx: &Context,
    id: &str,
    title: &str,
    builder: ViewportBuilder,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> (R, bool) {
    ctx.show_viewport_immediate(
        ViewportId::from_hash_of(id),
        builder.with_title(title),
        |ctx, class| {
            if matches!(class, ViewportClass::Embedded) {
                let mut open = true;
                let inner = egui::Window::new(title)
                    .collapsible(false)
                    .resizable(false)
                    .open(&mut open)
                    .show(ctx, add_contents)
                    .and_then(|response| response.inner)
                    .unwrap_or_default();
                return (inner, !open);
            }
            let frame = Frame::none().fill(BACKGROUND).inner_margin(Margin::same(12.0));
            let inner = CentralPanel::default().frame(frame).show(ctx, add_contents).inner;
            let close = ctx.input(|i| i.viewport().close_requested());
            (inner, close)
        },
    )
}

fn dialog_button(ui: &mut Ui, label: &str) -> egui::Response {
    ui.add(Button::new(RichText::new(label).color(FOREGROUND).size(14.0)).fill(BACKGROUND))
}

/// Popup menu opened from the gear button. It closes on a choice, on Escape,
/// or once it loses the focus it had.
pub struct SettingsMenu {
    anchor: Option<Pos2>,
    had_focus: bool,
}

impl SettingsMenu {
    /// Menu whose top-left corner sits at `anchor` (screen coordinates).
    pub fn new(anchor: Option<Pos2>) -> Self {
        Self {
            anchor,
            had_focus: false,
        }
    }

    /// Record the menu window's focus; `true` once focus was gained and lost.
    fn focus_lost(&mut self, focused: Option<bool>) -> bool {
        match focused {
            Some(true) => {
                self.had_focus = true;
                false
            }
            Some(false) => self.had_focus,
            None => false,
        }
    }

    /// Draw the menu for this frame.
    pub fn show(&mut self, ctx: &Context) -> MenuOutcome {
        let mut builder = ViewportBuilder::default()
            .with_inner_size([180.0, 80.0])
            .with_resizable(false)
            .with_decorations(false)
            .with_window_level(WindowLevel::AlwaysOnTop);
        if let Some(anchor) = self.anchor {
            builder = builder.with_position(anchor);
        }
        let ((outcome, focused), close) = show_dialog(ctx, "settings_menu", "Menu", builder, |ui| {
            let mut outcome = MenuOutcome::Open;
            ui.vertical_centered_justified(|ui| {
                if dialog_button(ui, "Manage Watchlist").clicked() {
                    outcome = MenuOutcome::ManageWatchlist;
                }
                if dialog_button(ui, "Size").clicked() {
                    outcome = MenuOutcome::Size;
                }
            });
            if ui.input(|i| i.key_pressed(Key::Escape)) {
                outcome = MenuOutcome::Dismissed;
            }
            (outcome, ui.input(|i| i.viewport().focused))
        });
        let lost = self.focus_lost(focused);
        if outcome == MenuOutcome::Open && (close || lost) {
            MenuOutcome::Dismissed
        } else {
            outcome
        }
    }
}

/// Editable copy of the watchlist file.
pub struct WatchlistEditor {
    watchlist: Watchlist,
    path: PathBuf,
    input: String,
    selected: Option<usize>,
    notice: Option<String>,
}

impl WatchlistEditor {
    /// Open the editor on the file at `path`.
    pub fn open(path: PathBuf) -> Self {
        Self {
            watchlist: Watchlist::load_or_default(&path),
            path,
            input: String::new(),
            selected: None,
            notice: None,
        }
    }

    fn add_input(&mut self) {
        match self.watchlist.add(&self.input) {
            Ok(symbol) => {
                info!("Watchlist: added {}", symbol);
                self.input.clear();
                self.notice = None;
            }
            Err(AddRejection::Duplicate(symbol)) => {
                self.notice = Some(format!("{} is already in the list.", symbol));
            }
            Err(AddRejection::Invalid(raw)) if raw.is_empty() => {}
            Err(AddRejection::Invalid(raw)) => {
                self.notice = Some(format!("\"{}\" is not a valid ticker symbol.", raw));
            }
        }
    }

    fn remove_selected(&mut self) {
        if let Some(symbol) = self.selected.take().and_then(|i| self.watchlist.remove(i)) {
            info!("Watchlist: removed {}", symbol);
        }
    }

    /// Persist the list. On failure the message stays visible in the dialog.
    fn save(&mut self) -> bool {
        match self.watchlist.save(&self.path) {
            Ok(()) => {
                info!("Watchlist saved to {}", self.path.display());
                true
            }
            Err(e) => {
                warn!("Failed to save watchlist: {}", e);
                self.notice = Some(format!("Could not save watchlist: {}", e));
                false
            }
        }
    }

    fn contents(&mut self, ui: &mut Ui) -> EditorOutcome {
        let mut outcome = EditorOutcome::Open;
        ui.vertical_centered(|ui| ui.heading(RichText::new("Ticker Manager").strong()));
        ui.add_space(6.0);

        let list_height = (ui.available_height() - 120.0).max(80.0);
        Frame::group(ui.style()).show(ui, |ui| {
            ScrollArea::vertical().max_height(list_height).auto_shrink([false, false]).show(ui, |ui| {
                for (index, symbol) in self.watchlist.symbols().iter().enumerate() {
                    let label = RichText::new(symbol.as_str()).monospace().size(14.0);
                    if ui.selectable_label(self.selected == Some(index), label).clicked() {
                        self.selected = Some(index);
                    }
                }
            });
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let field = ui.add(
                TextEdit::singleline(&mut self.input)
                    .hint_text("e.g. AAPL")
                    .desired_width(120.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if dialog_button(ui, "➕ Add").clicked() || submitted {
                self.add_input();
            }
            let remove = ui.add_enabled(
                self.selected.is_some(),
                Button::new(RichText::new("❌ Remove").color(FOREGROUND).size(14.0)).fill(BACKGROUND),
            );
            if remove.clicked() {
                self.remove_selected();
            }
        });

        if let Some(notice) = &self.notice {
            ui.label(notice.as_str());
        }

        ui.with_layout(Layout::bottom_up(Align::Center), |ui| {
            if dialog_button(ui, "💾 Save & Close").clicked() && self.save() {
                outcome = EditorOutcome::Closed;
            }
        });
        outcome
    }

    /// Draw the editor for this frame.
    pub fn show(&mut self, ctx: &Context) -> EditorOutcome {
        let builder = ViewportBuilder::default()
            .with_inner_size([400.0, 500.0])
            .with_resizable(false);
        let (outcome, close) =
            show_dialog(ctx, "watchlist_editor", "Manage Watchlist", builder, |ui| self.contents(ui));
        if close { EditorOutcome::Closed } else { outcome }
    }
}

/// Width/height form.
pub struct SizeDialog {
    width: String,
    height: String,
}

impl SizeDialog {
    /// Open the dialog pre-filled with `current`.
    pub fn new(current: &BarSettings) -> Self {
        Self {
            width: current.width.to_string(),
            height: current.height.to_string(),
        }
    }

    fn contents(&mut self, ui: &mut Ui) -> SizeOutcome {
        let mut outcome = SizeOutcome::Open;
        egui::Grid::new("size_fields").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label("Width (px, 0 = full):");
            ui.add(TextEdit::singleline(&mut self.width).desired_width(64.0));
            ui.end_row();
            ui.label("Height (px):");
            ui.add(TextEdit::singleline(&mut self.height).desired_width(64.0));
            ui.end_row();
        });
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if dialog_button(ui, "Apply").clicked() {
                outcome = match BarSettings::from_form(&self.width, &self.height) {
                    Some(settings) => SizeOutcome::Apply(settings),
                    None => SizeOutcome::Cancel,
                };
            }
            if dialog_button(ui, "Default").clicked() {
                outcome = SizeOutcome::Default;
            }
            if dialog_button(ui, "Cancel").clicked() {
                outcome = SizeOutcome::Cancel;
            }
        });
        outcome
    }

    /// Draw the dialog for this frame.
    pub fn show(&mut self, ctx: &Context) -> SizeOutcome {
        let builder = ViewportBuilder::default()
            .with_inner_size([300.0, 130.0])
            .with_resizable(false);
        let (outcome, close) = show_dialog(ctx, "size_dialog", "Size", builder, |ui| self.contents(ui));
        if close && outcome == SizeOutcome::Open {
            SizeOutcome::Cancel
        } else {
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn editor_in(dir: &TempDir) -> WatchlistEditor {
        WatchlistEditor::open(dir.path().join("tickers.json"))
    }

    #[test]
    fn editor_starts_from_default_list() {
        let temp = TempDir::new().unwrap();
        let editor = editor_in(&temp);
        assert_eq!(editor.watchlist, Watchlist::default());
    }

    #[test]
    fn duplicate_add_leaves_a_notice() {
        let temp = TempDir::new().unwrap();
        let mut editor = editor_in(&temp);
        editor.input = "msft".into();
        editor.add_input();
        assert_eq!(editor.watchlist.len(), 2);
        assert_eq!(editor.notice.as_deref(), Some("MSFT is already in the list."));
        assert_eq!(editor.input, "msft");
    }

    #[test]
    fn add_remove_and_save() {
        let temp = TempDir::new().unwrap();
        let mut editor = editor_in(&temp);
        editor.input = " nvda ".into();
        editor.add_input();
        assert!(editor.input.is_empty());

        editor.selected = Some(0);
        editor.remove_selected();
        assert_eq!(editor.selected, None);
        assert!(editor.save());

        let saved = Watchlist::load(&temp.path().join("tickers.json")).unwrap();
        let saved: Vec<String> = saved.symbols().iter().map(|s| s.to_string()).collect();
        assert_eq!(saved, vec!["MSFT", "NVDA"]);
    }

    #[test]
    fn save_failure_keeps_dialog_open_with_message() {
        let temp = TempDir::new().unwrap();
        let mut editor = WatchlistEditor::open(temp.path().join("missing").join("tickers.json"));
        assert!(!editor.save());
        assert!(editor.notice.unwrap().starts_with("Could not save watchlist"));
    }

    #[test]
    fn menu_is_dismissed_only_after_losing_focus_it_had() {
        let mut menu = SettingsMenu::new(None);
        assert!(!menu.focus_lost(None));
        assert!(!menu.focus_lost(Some(false)));
        assert!(!menu.focus_lost(Some(true)));
        assert!(!menu.focus_lost(None));
        assert!(menu.focus_lost(Some(false)));
    }

    #[test]
    fn size_dialog_is_prefilled() {
        let dialog = SizeDialog::new(&BarSettings { width: 1280, height: 32 });
        assert_eq!(dialog.width, "1280");
        assert_eq!(dialog.height, "32");
    }
}
