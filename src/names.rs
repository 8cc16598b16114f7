//! Display names for bones and animations.
//!
//! Neither the skeleton file nor the animation capture carries any names.
//! The game assigns them by position, so a record's meaning depends solely on
//! its index. The tables here are those positional names; loaders check them
//! against the number of decoded records so a mismatch is an error rather
//! than a silent shift.

use errors::{ErrorKind, Result};
use json::JsonValue;
use std::path::Path;

/// Bone names for `pig.hir`, in file order.
pub static BONE_NAMES: &[&str] = &[
    "Hip",
    "Spine",
    "Head",
    "UpperArm.L",
    "LowerArm.L",
    "Hand.L",
    "UpperArm.R",
    "LowerArm.R",
    "Hand.R",
    "UpperLeg.L",
    "LowerLeg.L",
    "Foot.L",
    "UpperLeg.R",
    "LowerLeg.R",
    "Foot.R",
];

/// Animation names for `mcap.mad`, in index-block order. The blank tail is
/// reserved slots with no known animation.
pub static ANIMATION_NAMES: &[&str] = &[
    "Run cycle (normal)",
    "Run cycle (wounded)",
    "Run cycle (more wounded)",
    "Walk cycle (backwards)",
    "Turning on Spot",
    "Swimming",
    "Swimming like Rick",
    "Getting into Vehicles",
    "Jumping - Start",
    "Jumping - Middle",
    "Jumping - End",
    "Scramble",
    "Getting out Handgun",
    "Getting out Rifle",
    "Getting out Machine gun",
    "Getting out Heavy weapon",
    "Getting out Punch",
    "Getting out Grenade",
    "Getting out Sword / Knife",
    "Using Grenade",
    "Using Punch",
    "Sword / Knife",
    "Bayonet",
    "Aiming Handgun",
    "Aiming Rifle",
    "Aiming Machine gun",
    "Aiming Heavy weapon",
    "Standing around cycle 1",
    "Standing around cycle 2",
    "Very Wounded",
    "Lord Flash-Heart Pose",
    "Looking around",
    "Looking gormless",
    "Cowering",
    "Brushoff 1",
    "Brushoff 2",
    "Brushoff 3",
    "Sneeze",
    "Flying through air/falling",
    "Bouncing on B-Hind",
    "Getting to feet",
    "Celebration #1",
    "Celebration #2",
    "Celebration #3",
    "Salute",
    "Look back",
    "Thinking",
    "Dying #1",
    "Dying #2",
    "Dying #3",
    "Drowning",
    "Idle Cold",
    "Idle Hot",
    "Lay Mine",
    "Heal",
    "Pick pocket",
    "Air strike",
    "Hari Kiri",
    "Parachuting",
    "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "",
    "", "", "", "",
];

/// An ordered list of positional names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    pub fn new<I, S>(names: I) -> NameTable
    where I: IntoIterator<Item=S>, S: Into<String> {
        NameTable { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn bones() -> NameTable {
        NameTable::new(BONE_NAMES.iter().cloned())
    }

    pub fn animations() -> NameTable {
        NameTable::new(ANIMATION_NAMES.iter().cloned())
    }

    /// Read a table from a JSON array of strings.
    pub fn from_json(what: &str, value: &JsonValue) -> Result<NameTable> {
        if !value.is_array() {
            bail!(ErrorKind::Config(format!("{} must be an array of strings", what)));
        }
        let mut names = Vec::with_capacity(value.len());
        for (i, member) in value.members().enumerate() {
            match member.as_str() {
                Some(s) => names.push(s.to_string()),
                None => bail!(ErrorKind::Config(format!(
                    "{}[{}] is not a string", what, i,
                ))),
            }
        }
        Ok(NameTable { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(|s| s.as_str())
    }

    /// True for slots with no name, ie. reserved ones.
    pub fn is_blank(&self, idx: usize) -> bool {
        self.get(idx).map(|s| s.trim().is_empty()).unwrap_or(true)
    }

    /// Fails unless there is a name for each of `count` records decoded from
    /// `path`.
    pub fn require(&self, path: &Path, what: &str, count: usize) -> Result<()> {
        if count > self.len() {
            bail!(ErrorKind::Config(format!(
                "{} {} were decoded from \"{}\" but the name table only has {} entries",
                count, what, path.display(), self.len(),
            )));
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item=&str> {
        self.names.iter().map(|s| s.as_str())
    }
}

#[test]
fn test_default_tables() {
    assert_eq!(BONE_NAMES.len(), 15);
    assert_eq!(ANIMATION_NAMES.len(), 93);
    let anims = NameTable::animations();
    assert_eq!(anims.get(0), Some("Run cycle (normal)"));
    assert!(!anims.is_blank(58));
    assert!(anims.is_blank(59));
    assert!(anims.is_blank(1000));
}

#[test]
fn test_require() {
    let bones = NameTable::bones();
    let path = Path::new("chars/pig.hir");
    assert!(bones.require(path, "bones", 15).is_ok());
    match bones.require(path, "bones", 16) {
        Err(e) => {
            match *e.kind() {
                ErrorKind::Config(_) => (),
                ref k => panic!("wrong error: {:?}", k),
            }
            assert!(e.to_string().contains("chars/pig.hir"));
        }
        Ok(()) => panic!("16 bones accepted"),
    }
}

#[test]
fn test_from_json() {
    let v = ::json::parse(r#"["a", "", "c"]"#).unwrap();
    let t = NameTable::from_json("names", &v).unwrap();
    assert_eq!(t.len(), 3);
    assert!(t.is_blank(1));
    let bad = ::json::parse(r#"["a", 2]"#).unwrap();
    assert!(NameTable::from_json("names", &bad).is_err());
}
