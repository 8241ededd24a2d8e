//! Small rendering helpers shared by screens.

pub mod fmt;
pub mod panel;
