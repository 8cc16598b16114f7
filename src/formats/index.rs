//! Texture indices (`.index`).
//!
//! A plain text manifest, one texture base name per line with no extension.
//! The textures themselves are `.tim` files in the same directory. The order
//! of the lines is what a face's texture index refers to.

use backend::Backend;
use errors::{ErrorKind, Result};
use std::fmt;
use std::path::Path;
use util::cur::read_file;

pub const TEXTURE_EXTENSION: &str = "tim";

/// What a texture index is used for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureIndexKind {
    /// Character skins for the British roster.
    British,
    Weapons,
    Map,
}

impl TextureIndexKind {
    pub const ALL: [TextureIndexKind; 3] = [
        TextureIndexKind::British,
        TextureIndexKind::Weapons,
        TextureIndexKind::Map,
    ];
}

impl fmt::Display for TextureIndexKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            TextureIndexKind::British => "british",
            TextureIndexKind::Weapons => "weapons",
            TextureIndexKind::Map => "map",
        })
    }
}

pub struct TextureIndex<T> {
    pub kind: TextureIndexKind,
    pub names: Vec<String>,
    pub textures: Vec<T>,
}

impl<T> TextureIndex<T> {
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.textures.get(idx)
    }
}

/// The texture names listed in a manifest, skipping blank lines.
pub fn parse_manifest(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Load the manifest `dir/manifest_name` and every texture it names.
///
/// Fails as a whole if any texture fails to load; no partial index is
/// returned.
pub fn load_texture_index<B: Backend>(
    dir: &Path,
    manifest_name: &str,
    kind: TextureIndexKind,
    backend: &mut B,
    capacity: usize,
) -> Result<TextureIndex<B::Texture>> {
    let manifest_path = dir.join(manifest_name);
    info!("parsing {}", manifest_path.display());

    let bytes = read_file(&manifest_path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => bail!(ErrorKind::CorruptFormat(
            manifest_path.clone(),
            format!("not a text file (bad UTF-8 at byte {})", e.utf8_error().valid_up_to()),
        )),
    };
    let names = parse_manifest(&text);

    if names.len() > capacity {
        bail!(ErrorKind::CapacityExceeded(
            manifest_path.clone(), "textures in index", capacity, names.len(),
        ));
    }

    let mut textures = Vec::with_capacity(names.len());
    for name in &names {
        debug!("  {}", name);
        let texture_path = dir.join(format!("{}.{}", name, TEXTURE_EXTENSION));
        textures.push(backend.load_texture(&texture_path)?);
    }

    Ok(TextureIndex {
        kind,
        names: names.into_iter().map(String::from).collect(),
        textures,
    })
}

#[test]
fn test_parse_manifest() {
    let text = "pig01\r\npig02\n\n  \nhat\n";
    assert_eq!(parse_manifest(text), vec!["pig01", "pig02", "hat"]);
    assert!(parse_manifest("").is_empty());
}

#[test]
fn test_load_texture_index() {
    use backend::FileProbe;
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    fs::write(dir.path().join("british.index"), "a\nb\n").unwrap();
    fs::write(dir.path().join("a.tim"), b"").unwrap();
    fs::write(dir.path().join("b.tim"), b"").unwrap();

    let mut backend = FileProbe::default();
    let index = load_texture_index(dir.path(), "british.index", TextureIndexKind::British, &mut backend, 256).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.names, vec!["a", "b"]);
    assert_eq!(**index.get(1).unwrap(), dir.path().join("b.tim"));

    match load_texture_index(dir.path(), "british.index", TextureIndexKind::British, &mut backend, 1) {
        Err(e) => {
            match *e.kind() {
                ErrorKind::CapacityExceeded(ref p, _, 1, 2) => {
                    assert_eq!(*p, dir.path().join("british.index"))
                }
                ref k => panic!("wrong error: {:?}", k),
            }
            assert!(e.to_string().contains("british.index"));
        }
        Ok(_) => panic!("capacity ignored"),
    }

    fs::write(dir.path().join("weapons.index"), "a\nmissing\n").unwrap();
    assert!(load_texture_index(dir.path(), "weapons.index", TextureIndexKind::Weapons, &mut backend, 256).is_err());

    match load_texture_index(dir.path(), "nope.index", TextureIndexKind::Map, &mut backend, 256) {
        Err(e) => match *e.kind() {
            ErrorKind::MissingFile(_) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("missing manifest accepted"),
    }
}

#[test]
fn test_manifest_must_be_text() {
    use backend::FileProbe;
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    fs::write(dir.path().join("british.index"), b"pig01\npig\xff02\n").unwrap();
    fs::write(dir.path().join("pig01.tim"), b"").unwrap();

    let mut backend = FileProbe::default();
    match load_texture_index(dir.path(), "british.index", TextureIndexKind::British, &mut backend, 256) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(ref p, _) => assert_eq!(*p, dir.path().join("british.index")),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("mangled manifest accepted"),
    }
    assert_eq!(backend.num_loaded, 0);
}
