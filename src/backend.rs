//! The seam between the asset cache and whatever renders the models.
//!
//! The cache never decodes or uploads images itself; it asks a `Backend` for
//! a handle by file path and keeps clones of the handles it gets back. The
//! backend owns the actual texture objects.

use errors::{ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait Backend {
    /// A cheap, shareable reference to a loaded texture.
    type Texture: Clone;

    /// Load (or look up) the texture stored at `path`.
    fn load_texture(&mut self, path: &Path) -> Result<Self::Texture>;
}

/// Backend that only checks texture files exist, without decoding them. The
/// handle is the resolved path.
#[derive(Default)]
pub struct FileProbe {
    pub num_loaded: usize,
}

impl Backend for FileProbe {
    type Texture = Rc<PathBuf>;

    fn load_texture(&mut self, path: &Path) -> Result<Rc<PathBuf>> {
        if !path.is_file() {
            bail!(ErrorKind::MissingFile(path.to_owned()));
        }
        self.num_loaded += 1;
        Ok(Rc::new(path.to_owned()))
    }
}
