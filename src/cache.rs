//! The model cache.
//!
//! Holds everything the game layer needs to put a pig on screen: the shared
//! skeleton, the animation catalog, one mesh per character class and the
//! character texture indices. It is built in one go by
//! [`rebuild`](struct.ModelCache.html#method.rebuild) and either ends up
//! complete or empty.

use backend::Backend;
use cgmath::Point3;
use class::PigClass;
use config::CacheConfig;
use errors::{ErrorKind, Result};
use formats::hir::{load_hir, Bone};
use formats::index::{load_texture_index, TextureIndex, TextureIndexKind};
use formats::mad::{load_mad, Animation};
use model::{load_model, Model};
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Building,
    Ready,
    /// The last rebuild failed. Nothing is loaded.
    Aborted,
}

/// Texture indices the cache loads, in load order.
pub const CACHED_TEXTURE_INDICES: [TextureIndexKind; 2] = [
    TextureIndexKind::British,
    TextureIndexKind::Weapons,
];

struct Contents<T> {
    bones: Vec<Bone>,
    animations: Vec<Animation>,
    texture_indices: BTreeMap<TextureIndexKind, TextureIndex<T>>,
    models: BTreeMap<PigClass, Model>,
}

pub struct ModelCache<B: Backend> {
    config: CacheConfig,
    state: CacheState,
    contents: Option<Contents<B::Texture>>,
}

impl<B: Backend> ModelCache<B> {
    pub fn new(config: CacheConfig) -> ModelCache<B> {
        ModelCache {
            config,
            state: CacheState::Empty,
            contents: None,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == CacheState::Ready
    }

    /// Drop everything and go back to `Empty`.
    pub fn clear(&mut self) {
        self.contents = None;
        self.state = CacheState::Empty;
    }

    /// Reload everything from disk.
    ///
    /// On failure the cache is left `Aborted` and holds nothing; the error is
    /// returned for the caller to decide whether it is fatal.
    pub fn rebuild(&mut self, backend: &mut B) -> Result<()> {
        self.clear();
        self.state = CacheState::Building;
        info!("building model cache from {}", self.config.data_dir.display());

        match build(&self.config, backend) {
            Ok(contents) => {
                info!("model cache ready: {} bones, {} animations, {} models",
                    contents.bones.len(), contents.animations.len(), contents.models.len());
                self.contents = Some(contents);
                self.state = CacheState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("model cache build aborted: {}", e);
                self.state = CacheState::Aborted;
                Err(e)
            }
        }
    }

    fn contents(&self) -> Result<&Contents<B::Texture>> {
        match self.contents {
            Some(ref c) if self.state == CacheState::Ready => Ok(c),
            _ => bail!(ErrorKind::NotReady),
        }
    }

    pub fn model(&self, class: PigClass) -> Option<&Model> {
        self.contents().ok()?.models.get(&class)
    }

    pub fn animation(&self, idx: usize) -> Option<&Animation> {
        self.contents().ok()?.animations.get(idx)
    }

    pub fn texture_index(&self, kind: TextureIndexKind) -> Option<&TextureIndex<B::Texture>> {
        self.contents().ok()?.texture_indices.get(&kind)
    }

    pub fn animations(&self) -> Result<&[Animation]> {
        Ok(&self.contents()?.animations)
    }

    pub fn bones(&self) -> Result<&[Bone]> {
        Ok(&self.contents()?.bones)
    }

    /// Zero unless the cache is ready.
    pub fn num_bones(&self) -> usize {
        self.contents().map(|c| c.bones.len()).unwrap_or(0)
    }

    /// One `(bone, parent)` segment per bone in rest pose, for drawing the
    /// skeleton. A root is paired with itself.
    pub fn skeleton_lines(&self) -> Result<Vec<(Point3<f32>, Point3<f32>)>> {
        let bones = self.bones()?;
        Ok(bones.iter()
            .map(|bone| {
                let parent = bone.parent.map(|p| &bones[p]).unwrap_or(bone);
                (bone.position(), parent.position())
            })
            .collect())
    }
}

fn build<B: Backend>(config: &CacheConfig, backend: &mut B) -> Result<Contents<B::Texture>> {
    let bones = load_hir(&config.skeleton_path(), &config.bone_names, config.max_bones)?;

    let animations = load_mad(
        &config.capture_path(),
        &config.animation_names,
        config.empty_slot_policy,
    )?;

    let mut texture_indices = BTreeMap::new();
    for &kind in &CACHED_TEXTURE_INDICES {
        let (dir, manifest) = match config.texture_index_location(kind) {
            Some(loc) => loc,
            None => continue,
        };
        let index = load_texture_index(&dir, manifest, kind, backend, config.texture_index_capacity)?;
        texture_indices.insert(kind, index);
    }

    let mut models = BTreeMap::new();
    for &class in &PigClass::ALL {
        let model = load_model(&config.model_path(class), &bones)?;
        debug!("{}: {} vertices, {} triangles, {} quads{}",
            class, model.vertices.len(), model.num_triangles(), model.num_quads(),
            if model.normals_synthesized { ", generated normals" } else { "" });
        models.insert(class, model);
    }

    let num_british = texture_indices.get(&TextureIndexKind::British)
        .map(|index| index.len())
        .unwrap_or(0);
    for model in models.values() {
        model.validate_texture_indices(num_british)?;
    }

    Ok(Contents { bones, animations, texture_indices, models })
}

#[cfg(test)]
mod test_data {
    use class::PigClass;
    use config::{CacheConfig, BRITISH_DIR, WEAPONS_DIR};
    use formats::hir::hir_bytes;
    use formats::mad::{mad_bytes, KEYFRAME_SIZE};
    use model::{write_normals, write_square};
    use names::NameTable;
    use std::fs;
    use std::path::Path;

    /// Lay out a minimal game data directory under `root`: three bones, two
    /// animations, two character textures, one weapon texture and a square
    /// mesh for every class using texture slot `texture`.
    pub fn write_data_dir(root: &Path, texture: u32) -> CacheConfig {
        let chars = root.join("chars");
        let british = root.join(BRITISH_DIR);
        let weapons = root.join(WEAPONS_DIR);
        fs::create_dir_all(&british).unwrap();
        fs::create_dir_all(&weapons).unwrap();

        let hir = hir_bytes(&[(0, [0, 0, 0]), (0, [0, 50, 0]), (1, [0, 90, 0])], 0);
        fs::write(chars.join("pig.hir"), hir).unwrap();
        let k = KEYFRAME_SIZE as u32;
        fs::write(chars.join("mcap.mad"), mad_bytes(&[(2 * k, vec![1, 2]), (k, vec![3])])).unwrap();

        fs::write(british.join("british.index"), "pig_skin\npig_face\n").unwrap();
        fs::write(british.join("pig_skin.tim"), b"").unwrap();
        fs::write(british.join("pig_face.tim"), b"").unwrap();
        fs::write(weapons.join("weapons.index"), "bazooka\n").unwrap();
        fs::write(weapons.join("bazooka.tim"), b"").unwrap();

        for (i, class) in PigClass::ALL.iter().enumerate() {
            write_square(&british, class.file_stem(), texture);
            // Leave some classes without normals.
            if i % 2 == 0 {
                write_normals(&british, class.file_stem(), 4);
            }
        }

        let mut config = CacheConfig::new(root.to_owned());
        config.animation_names = NameTable::new(vec!["Run", "Walk"]);
        config
    }
}

#[cfg(test)]
use backend::FileProbe;

#[test]
fn test_rebuild() {
    let dir = ::tempfile::tempdir().unwrap();
    let config = test_data::write_data_dir(dir.path(), 1);
    let mut backend = FileProbe::default();
    let mut cache = ModelCache::<FileProbe>::new(config);
    assert_eq!(cache.state(), CacheState::Empty);
    assert!(cache.model(PigClass::Grunt).is_none());

    cache.rebuild(&mut backend).unwrap();
    assert_eq!(cache.state(), CacheState::Ready);
    assert_eq!(cache.num_bones(), 3);
    assert_eq!(cache.bones().unwrap()[2].name, "Head");
    assert_eq!(cache.animations().unwrap().len(), 2);
    assert_eq!(cache.animation(0).unwrap().num_frames(), 2);
    assert_eq!(cache.animation(1).unwrap().name, "Walk");
    assert!(cache.animation(2).is_none());
    assert_eq!(cache.texture_index(TextureIndexKind::British).unwrap().len(), 2);
    assert_eq!(cache.texture_index(TextureIndexKind::Weapons).unwrap().len(), 1);
    assert!(cache.texture_index(TextureIndexKind::Map).is_none());
    assert_eq!(backend.num_loaded, 3);

    for &class in &PigClass::ALL {
        let model = cache.model(class).unwrap();
        assert_eq!(model.bones.len(), 3);
        assert_eq!(model.normals.len(), 4);
    }
    assert!(!cache.model(PigClass::Ace).unwrap().normals_synthesized);
    assert!(cache.model(PigClass::Commando).unwrap().normals_synthesized);

    let lines = cache.skeleton_lines().unwrap();
    assert_eq!(lines[0], (Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)));
    assert_eq!(lines[2], (Point3::new(0.0, 90.0, 0.0), Point3::new(0.0, 50.0, 0.0)));
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = ::tempfile::tempdir().unwrap();
    let config = test_data::write_data_dir(dir.path(), 0);
    let mut backend = FileProbe::default();
    let mut cache = ModelCache::<FileProbe>::new(config);

    cache.rebuild(&mut backend).unwrap();
    let first_bones = cache.bones().unwrap().to_vec();
    let first_anims = cache.animations().unwrap().to_vec();
    let first_faces = cache.model(PigClass::Heavy).unwrap().faces.clone();

    cache.rebuild(&mut backend).unwrap();
    assert_eq!(cache.state(), CacheState::Ready);
    assert_eq!(cache.bones().unwrap(), &first_bones[..]);
    assert_eq!(cache.animations().unwrap(), &first_anims[..]);
    assert_eq!(cache.model(PigClass::Heavy).unwrap().faces, first_faces);
}

#[test]
fn test_failed_rebuild_leaves_nothing() {
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let config = test_data::write_data_dir(dir.path(), 0);
    let mut backend = FileProbe::default();
    let mut cache = ModelCache::<FileProbe>::new(config);
    cache.rebuild(&mut backend).unwrap();

    // The last class's faces go missing.
    fs::remove_file(dir.path().join("chars/british/sp_hi.fac")).unwrap();
    match cache.rebuild(&mut backend) {
        Err(e) => match *e.kind() {
            ErrorKind::MissingFile(_) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(()) => panic!("rebuild succeeded without faces"),
    }
    assert_eq!(cache.state(), CacheState::Aborted);
    assert!(cache.model(PigClass::Ace).is_none());
    assert!(cache.animation(0).is_none());
    assert_eq!(cache.num_bones(), 0);
    match cache.bones() {
        Err(e) => match *e.kind() {
            ErrorKind::NotReady => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("bones available after failed rebuild"),
    }

    cache.clear();
    assert_eq!(cache.state(), CacheState::Empty);
}

#[test]
fn test_texture_index_out_of_range() {
    let dir = ::tempfile::tempdir().unwrap();
    // The British index only has two textures.
    let config = test_data::write_data_dir(dir.path(), 2);
    let mut cache = ModelCache::<FileProbe>::new(config);
    match cache.rebuild(&mut FileProbe::default()) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(..) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(()) => panic!("bad texture index accepted"),
    }
    assert_eq!(cache.state(), CacheState::Aborted);
}

#[test]
fn test_missing_texture_aborts() {
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let config = test_data::write_data_dir(dir.path(), 0);
    fs::remove_file(dir.path().join("chars/weapons/bazooka.tim")).unwrap();
    let mut cache = ModelCache::<FileProbe>::new(config);
    assert!(cache.rebuild(&mut FileProbe::default()).is_err());
    assert_eq!(cache.state(), CacheState::Aborted);
    assert!(cache.texture_index(TextureIndexKind::British).is_none());
}

#[test]
fn test_empty_slot_policy_from_config() {
    use formats::mad::{mad_bytes, EmptySlotPolicy, KEYFRAME_SIZE};
    use names::NameTable;
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let mut config = test_data::write_data_dir(dir.path(), 0);
    let k = KEYFRAME_SIZE as u32;
    fs::write(dir.path().join("chars/mcap.mad"), mad_bytes(&[(k, vec![1]), (0, vec![])])).unwrap();
    config.animation_names = NameTable::new(vec!["Run", ""]);

    let mut strict = ModelCache::<FileProbe>::new(config.clone());
    assert!(strict.rebuild(&mut FileProbe::default()).is_err());

    config.empty_slot_policy = EmptySlotPolicy::SkipBlank;
    let mut lenient = ModelCache::<FileProbe>::new(config);
    lenient.rebuild(&mut FileProbe::default()).unwrap();
    assert_eq!(lenient.animation(1).unwrap().num_frames(), 0);
}

#[test]
fn test_capacity_error_names_file() {
    let dir = ::tempfile::tempdir().unwrap();
    let mut config = test_data::write_data_dir(dir.path(), 0);
    config.max_bones = 2;
    let mut cache = ModelCache::<FileProbe>::new(config);
    match cache.rebuild(&mut FileProbe::default()) {
        Err(e) => {
            match *e.kind() {
                ErrorKind::CapacityExceeded(_, "bones", 2, 3) => (),
                ref k => panic!("wrong error: {:?}", k),
            }
            assert!(e.to_string().contains("pig.hir"));
        }
        Ok(()) => panic!("bone ceiling ignored"),
    }
    assert_eq!(cache.state(), CacheState::Aborted);
}
