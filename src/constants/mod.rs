//! Layout constants and tunable limits.

pub mod fat;
pub mod font;
