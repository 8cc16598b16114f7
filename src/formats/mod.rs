//! Load Hogs of War character asset files.
//!
//! None of these formats has a magic number or a version field. A file's
//! kind is known only from its extension, and record counts mostly come from
//! the file size divided by a fixed record size. All multi-byte values are
//! little-endian and records are packed with no padding between fields.
//!
//! | ext      | contents                                   |
//! |----------|--------------------------------------------|
//! | `.hir`   | bone hierarchy                             |
//! | `.mad`   | animation capture (index block + keyframes)|
//! | `.vtx`   | vertex positions                           |
//! | `.fac`   | triangles and quads                        |
//! | `.no2`   | vertex normals (optional companion)        |
//! | `.index` | texture manifest                           |

pub mod fac;
pub mod hir;
pub mod index;
pub mod mad;
pub mod no2;
pub mod vtx;

pub use self::fac::Face;
pub use self::hir::Bone;
pub use self::index::{TextureIndex, TextureIndexKind};
pub use self::mad::{Animation, EmptySlotPolicy, Keyframe};
pub use self::no2::Normal;
pub use self::vtx::Vertex;
