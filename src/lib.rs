//! Hogs of War character assets.
//!
//! Loads the bone hierarchy, the animation capture, the per-class character
//! meshes and the texture manifests, and assembles them into a
//! [`ModelCache`](cache/struct.ModelCache.html).

#![recursion_limit = "1024"] // for error_chain

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;
extern crate atty;
extern crate cgmath;
extern crate json;
extern crate smallvec;
extern crate termcolor;
#[cfg(test)]
extern crate tempfile;

#[macro_use]
pub mod errors;
#[macro_use]
pub mod util;
pub mod backend;
pub mod cache;
pub mod class;
pub mod config;
pub mod formats;
pub mod logger;
pub mod model;
pub mod names;
pub mod normals;

pub use cache::{CacheState, ModelCache};
pub use class::PigClass;
pub use config::CacheConfig;
pub use errors::{Error, ErrorKind, Result};
