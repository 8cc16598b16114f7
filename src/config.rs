//! Cache configuration.
//!
//! The defaults match the game's own data layout. A JSON file can override
//! any of them:
//!
//! ```text
//! {
//!     "data_dir": "/games/hogs",
//!     "max_bones": 128,
//!     "texture_index_capacity": 256,
//!     "empty_slot_policy": "skip-blank",
//!     "bone_names": ["Hip", "Spine", ...],
//!     "animation_names": ["Run cycle (normal)", ...]
//! }
//! ```

use class::PigClass;
use errors::{ErrorKind, Result};
use formats::index::TextureIndexKind;
use formats::mad::EmptySlotPolicy;
use json::{self, JsonValue};
use names::NameTable;
use std::path::{Path, PathBuf};
use util::cur::read_file;

pub const DEFAULT_MAX_BONES: usize = 128;
pub const DEFAULT_TEXTURE_INDEX_CAPACITY: usize = 256;

pub const SKELETON_PATH: &str = "chars/pig.hir";
pub const CAPTURE_PATH: &str = "chars/mcap.mad";
pub const BRITISH_DIR: &str = "chars/british";
pub const WEAPONS_DIR: &str = "chars/weapons";

#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Root of the game's data directory (the one containing `chars/`).
    pub data_dir: PathBuf,
    pub max_bones: usize,
    pub texture_index_capacity: usize,
    pub empty_slot_policy: EmptySlotPolicy,
    pub bone_names: NameTable,
    pub animation_names: NameTable,
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig::new(PathBuf::from("."))
    }
}

impl CacheConfig {
    pub fn new(data_dir: PathBuf) -> CacheConfig {
        CacheConfig {
            data_dir,
            max_bones: DEFAULT_MAX_BONES,
            texture_index_capacity: DEFAULT_TEXTURE_INDEX_CAPACITY,
            empty_slot_policy: EmptySlotPolicy::default(),
            bone_names: NameTable::bones(),
            animation_names: NameTable::animations(),
        }
    }

    pub fn skeleton_path(&self) -> PathBuf {
        self.data_dir.join(SKELETON_PATH)
    }

    pub fn capture_path(&self) -> PathBuf {
        self.data_dir.join(CAPTURE_PATH)
    }

    pub fn model_path(&self, class: PigClass) -> PathBuf {
        self.data_dir.join(BRITISH_DIR).join(format!("{}.vtx", class.file_stem()))
    }

    /// Directory and manifest file name of a texture index. The map index
    /// lives with the map, not under `chars/`, so it has none here.
    pub fn texture_index_location(&self, kind: TextureIndexKind) -> Option<(PathBuf, &'static str)> {
        match kind {
            TextureIndexKind::British => Some((self.data_dir.join(BRITISH_DIR), "british.index")),
            TextureIndexKind::Weapons => Some((self.data_dir.join(WEAPONS_DIR), "weapons.index")),
            TextureIndexKind::Map => None,
        }
    }

    /// Read overrides from a JSON file on top of the defaults.
    pub fn load(path: &Path) -> Result<CacheConfig> {
        let bytes = read_file(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ErrorKind::Config(format!("{} is not UTF-8", path.display())))?;
        let mut config = CacheConfig::default();
        config.apply_json_str(&text)?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<CacheConfig> {
        let mut config = CacheConfig::default();
        config.apply_json_str(text)?;
        Ok(config)
    }

    /// Override whatever fields the JSON object sets.
    pub fn apply_json_str(&mut self, text: &str) -> Result<()> {
        let value = json::parse(text)?;
        self.apply_json(&value)
    }

    pub fn apply_json(&mut self, value: &JsonValue) -> Result<()> {
        if !value.is_object() {
            bail!(ErrorKind::Config("config must be a JSON object".to_string()));
        }
        for (key, v) in value.entries() {
            match key {
                "data_dir" => {
                    let s = v.as_str()
                        .ok_or_else(|| config_error("data_dir must be a string"))?;
                    self.data_dir = PathBuf::from(s);
                }
                "max_bones" => {
                    self.max_bones = v.as_usize()
                        .ok_or_else(|| config_error("max_bones must be a non-negative integer"))?;
                }
                "texture_index_capacity" => {
                    self.texture_index_capacity = v.as_usize()
                        .ok_or_else(|| config_error("texture_index_capacity must be a non-negative integer"))?;
                }
                "empty_slot_policy" => {
                    self.empty_slot_policy = match v.as_str() {
                        Some("strict") => EmptySlotPolicy::Strict,
                        Some("skip-blank") => EmptySlotPolicy::SkipBlank,
                        _ => bail!(config_error(
                            "empty_slot_policy must be \"strict\" or \"skip-blank\""
                        )),
                    };
                }
                "bone_names" => self.bone_names = NameTable::from_json(key, v)?,
                "animation_names" => self.animation_names = NameTable::from_json(key, v)?,
                _ => warn!("unknown config key {:?}, ignoring", key),
            }
        }
        Ok(())
    }
}

fn config_error(msg: &str) -> ErrorKind {
    ErrorKind::Config(msg.to_string())
}

#[test]
fn test_defaults() {
    let config = CacheConfig::new(PathBuf::from("/hogs"));
    assert_eq!(config.max_bones, 128);
    assert_eq!(config.texture_index_capacity, 256);
    assert_eq!(config.empty_slot_policy, EmptySlotPolicy::Strict);
    assert_eq!(config.bone_names.len(), 15);
    assert_eq!(config.animation_names.len(), 93);
    assert_eq!(config.skeleton_path(), Path::new("/hogs/chars/pig.hir"));
    assert_eq!(config.model_path(PigClass::Spy), Path::new("/hogs/chars/british/sp_hi.vtx"));
    assert!(config.texture_index_location(TextureIndexKind::Map).is_none());
}

#[test]
fn test_json_overrides() {
    let config = CacheConfig::from_json_str(r#"{
        "data_dir": "/data",
        "max_bones": 20,
        "empty_slot_policy": "skip-blank",
        "animation_names": ["Walk", ""]
    }"#).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/data"));
    assert_eq!(config.max_bones, 20);
    assert_eq!(config.texture_index_capacity, 256);
    assert_eq!(config.empty_slot_policy, EmptySlotPolicy::SkipBlank);
    assert_eq!(config.animation_names, NameTable::new(vec!["Walk", ""]));
    assert_eq!(config.bone_names, NameTable::bones());
}

#[test]
fn test_bad_json() {
    for text in &[
        "[]",
        r#"{"max_bones": "lots"}"#,
        r#"{"empty_slot_policy": "lenient"}"#,
        r#"{"bone_names": ["Hip", 3]}"#,
    ] {
        match CacheConfig::from_json_str(text) {
            Err(e) => match *e.kind() {
                ErrorKind::Config(_) => (),
                ref k => panic!("wrong error for {}: {:?}", text, k),
            },
            Ok(_) => panic!("accepted {}", text),
        }
    }
    assert!(CacheConfig::from_json_str("{").is_err());
}
