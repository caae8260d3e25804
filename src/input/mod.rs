pub mod keymap;
pub mod terminal;

pub use keymap::{Command, KeyCommandMapper};
pub use terminal::parse_line;
