//! Binary reading utilities shared by all the format loaders.

pub mod cur;
#[macro_use]
pub mod fields;
pub mod view;
