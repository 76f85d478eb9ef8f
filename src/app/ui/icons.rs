//! Unicode UI icon constants.
//!
//! Uses a BMP-only "safe" subset for broad font coverage (no emoji fonts needed).

pub const ICON_MENU: &str = "☰";
pub const ICON_SIDE_TOGGLE: &str = "⟷";
pub const ICON_OPEN: &str = "⊕";
pub const ICON_PASTE: &str = "⎘";
pub const ICON_CLEAR: &str = "✖";
pub const ICON_SAVE: &str = "⇩";
pub const ICON_RESET: &str = "⟳";
pub const ICON_APPLY: &str = "▦";
