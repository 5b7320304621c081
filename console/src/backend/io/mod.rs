//! Console front end: menus and input prompts.

pub mod console;
pub mod prompt;

pub use console::Console;
pub use prompt::{InputClosed, Prompt};
