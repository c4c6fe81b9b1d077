//! Helper functions shared by the content, query and command layers

mod date;
mod text;

pub use date::*;
pub use text::*;
