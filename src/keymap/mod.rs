//! Keystrokes for action triggers
//!
//! Triggers are configured as strings in the same syntax a keymap file uses:
//!
//! ```ignore
//! let toggle = parse_key_string("ctrl+shift+f")?;
//! ```

mod parse;
mod types;

pub use parse::{parse_key_string, KeymapError};
pub use types::{KeyCode, Keystroke, Modifiers};
