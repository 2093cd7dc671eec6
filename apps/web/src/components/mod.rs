//! Reusable UI Components

mod card;
mod header;
mod manual_paste;

pub use card::{BrowserCard, StatItem, SESSION_START_KEY};
pub use header::AppHeader;
pub use manual_paste::ManualPasteDialog;
