//! Window placement for the borderless bar.
//!
//! The bar is docked `DOCK_OFFSET` points above the bottom of the screen and
//! spans its full width unless a custom width is saved. Stacking differs per
//! platform: on Windows and Linux the bar is kept below normal windows, on
//! macOS it stays at the normal level.
use egui::{Context, Pos2, Rect, Vec2, ViewportBuilder, ViewportCommand, WindowLevel, pos2, vec2};
use ticker_core::settings::{BarSettings, MIN_HEIGHT};

/// Gap between the bar and the bottom edge of the screen.
pub const DOCK_OFFSET: f32 = 40.0;
/// A bar whose bottom is this close to the screen bottom snaps back to the dock.
pub const SNAP_DISTANCE: f32 = 80.0;
/// Narrowest custom width.
pub const MIN_CUSTOM_WIDTH: f32 = 200.0;
/// Width used before the monitor size is known.
const INITIAL_WIDTH: f32 = 800.0;

/// Position and size of the bar, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

fn clamp_height(height: u32) -> f32 {
    height.max(MIN_HEIGHT) as f32
}

impl BarGeometry {
    /// Full screen width, docked near the bottom.
    pub fn docked(screen: Vec2, height: u32) -> Self {
        let height = clamp_height(height);
        Self {
            x: 0.0,
            y: (screen.y - height - DOCK_OFFSET).max(0.0),
            width: screen.x,
            height,
        }
    }

    /// Custom size that keeps the current position, snapping to the dock when
    /// the bar sits near the bottom of the screen.
    pub fn resized(current: Option<Rect>, screen: Vec2, width: u32, height: u32) -> Self {
        if width == 0 {
            return Self::docked(screen, height);
        }
        let height = clamp_height(height);
        let width = (width as f32).max(MIN_CUSTOM_WIDTH);
        let Some(current) = current else {
            let docked = Self::docked(screen, height as u32);
            return Self { width, ..docked };
        };

        let mut y = current.top();
        if (current.bottom() - screen.y).abs() <= SNAP_DISTANCE {
            y = (screen.y - height - DOCK_OFFSET).max(0.0);
        }
        Self {
            x: current.left(),
            y,
            width,
            height,
        }
    }

    /// Geometry for saved settings.
    pub fn for_settings(settings: &BarSettings, screen: Vec2, current: Option<Rect>) -> Self {
        if settings.is_full_width() {
            Self::docked(screen, settings.height)
        } else {
            Self::resized(current, screen, settings.width, settings.height)
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    /// Size.
    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    /// Move and resize the root window.
    pub fn apply(&self, ctx: &Context) {
        ctx.send_viewport_cmd(ViewportCommand::OuterPosition(self.position()));
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(self.size()));
    }
}

/// Stacking level of the bar on this platform.
pub fn window_level() -> WindowLevel {
    if cfg!(target_os = "macos") {
        WindowLevel::Normal
    } else {
        WindowLevel::AlwaysOnBottom
    }
}

/// Builder for the root viewport: borderless, fixed size, no taskbar entry.
pub fn root_viewport(settings: &BarSettings) -> ViewportBuilder {
    let width = if settings.is_full_width() {
        INITIAL_WIDTH
    } else {
        (settings.width as f32).max(MIN_CUSTOM_WIDTH)
    };
    ViewportBuilder::default()
        .with_title("Ticker")
        .with_decorations(false)
        .with_resizable(false)
        .with_taskbar(false)
        .with_window_level(window_level())
        .with_inner_size([width, clamp_height(settings.height)])
}
