//! Terminal output for abilities and comment threads

mod console;

pub use console::Console;
