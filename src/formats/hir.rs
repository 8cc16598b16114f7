//! Bone hierarchy (`.hir`).
//!
//! A headerless array of 20-byte records, one per bone:
//!
//! ```text
//! parent    u32       index of the parent bone
//! coord     i16 x 3   rest-pose position
//! reserved  u8 x 10   unused
//! ```
//!
//! The root is its own parent (or has parent `0xFFFFFFFF`).

use cgmath::{Point3, Vector3};
use errors::{ErrorKind, Result};
use names::NameTable;
use std::path::Path;
use util::cur::{read_file, Cur};
use util::view::Viewable;

pub const RECORD_SIZE: usize = 20;

/// Parent value meaning "no parent".
pub const NO_PARENT: u32 = 0xFFFF_FFFF;

#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    /// `None` for the root.
    pub parent: Option<usize>,
    pub coord: Vector3<i16>,
}

impl Bone {
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.coord.x as f32, self.coord.y as f32, self.coord.z as f32)
    }
}

#[derive(Copy, Clone, Debug)]
struct HirRecord {
    parent: u32,
    coord: [i16; 3],
}

impl Viewable for HirRecord {
    fn size() -> usize { RECORD_SIZE }
    fn view(buf: &[u8]) -> HirRecord {
        let (parent, coord, _reserved) =
            <(u32, [i16; 3], [u8; 10]) as Viewable>::view(buf);
        HirRecord { parent, coord }
    }
}

pub fn load_hir(path: &Path, names: &NameTable, max_bones: usize) -> Result<Vec<Bone>> {
    let buf = read_file(path)?;
    read_hir(Cur::new(&buf, path), names, max_bones)
}

pub fn read_hir(cur: Cur, names: &NameTable, max_bones: usize) -> Result<Vec<Bone>> {
    let num_bones = cur.record_count::<HirRecord>();
    check!(cur, num_bones != 0)?;
    if num_bones > max_bones {
        bail!(ErrorKind::CapacityExceeded(cur.path().to_owned(), "bones", max_bones, num_bones));
    }
    names.require(cur.path(), "bones", num_bones)?;
    debug!("{}: {} bones", cur.path().display(), num_bones);

    fields!(cur, hir {
        records: [HirRecord; num_bones],
    });

    records.enumerate()
        .map(|(i, rec)| -> Result<Bone> {
            let parent = match rec.parent {
                NO_PARENT => None,
                p if p as usize == i => None,
                p if (p as usize) < num_bones => Some(p as usize),
                p => bail!(ErrorKind::CorruptFormat(
                    cur.path().to_owned(),
                    format!("bone {} has parent {} but there are only {} bones",
                        i, p, num_bones),
                )),
            };
            let name = names.get(i).unwrap_or("").to_string();
            let coord = Vector3::new(rec.coord[0], rec.coord[1], rec.coord[2]);
            Ok(Bone { name, parent, coord })
        })
        .collect()
}

#[cfg(test)]
pub fn hir_bytes(bones: &[(u32, [i16; 3])], pad: u8) -> Vec<u8> {
    let mut v = vec![];
    for &(parent, coord) in bones {
        v.extend_from_slice(&parent.to_le_bytes());
        for c in &coord {
            v.extend_from_slice(&c.to_le_bytes());
        }
        v.extend_from_slice(&[pad; 10]);
    }
    v
}

#[test]
fn test_round_trip_ignores_padding() {
    let input = [
        (0, [1, -2, 3]),
        (0, [-400, 500, 600]),
        (1, [7, 8, -32768]),
    ];
    let names = NameTable::bones();
    for &pad in &[0u8, 0xAB] {
        let buf = hir_bytes(&input, pad);
        let path = Path::new("pig.hir");
        let bones = read_hir(Cur::new(&buf, path), &names, 128).unwrap();
        assert_eq!(bones.len(), buf.len() / RECORD_SIZE);
        for (bone, &(_, coord)) in bones.iter().zip(input.iter()) {
            assert_eq!(bone.coord, Vector3::new(coord[0], coord[1], coord[2]));
        }
        assert_eq!(bones[0].parent, None);
        assert_eq!(bones[1].parent, Some(0));
        assert_eq!(bones[2].parent, Some(1));
        assert_eq!(bones[2].name, "Head");
    }
}

#[test]
fn test_trailing_partial_record_ignored() {
    let mut buf = hir_bytes(&[(NO_PARENT, [0, 0, 0]), (0, [1, 1, 1])], 0);
    buf.extend_from_slice(&[1, 2, 3]);
    let bones = read_hir(Cur::new(&buf, Path::new("pig.hir")), &NameTable::bones(), 128).unwrap();
    assert_eq!(bones.len(), 2);
    assert_eq!(bones[0].parent, None);
}

#[test]
fn test_bad_parent() {
    let buf = hir_bytes(&[(0, [0, 0, 0]), (5, [0, 0, 0])], 0);
    match read_hir(Cur::new(&buf, Path::new("pig.hir")), &NameTable::bones(), 128) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(..) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("accepted out-of-range parent"),
    }
}

#[test]
fn test_limits() {
    let buf = hir_bytes(&[(0, [0, 0, 0]); 4], 0);
    let path = Path::new("pig.hir");
    match read_hir(Cur::new(&buf, path), &NameTable::bones(), 3) {
        Err(e) => {
            match *e.kind() {
                ErrorKind::CapacityExceeded(ref p, "bones", 3, 4) => assert_eq!(p, path),
                ref k => panic!("wrong error: {:?}", k),
            }
            assert!(e.to_string().contains("pig.hir"));
        }
        Ok(_) => panic!("bone ceiling ignored"),
    }
    let short_names = NameTable::new(vec!["Hip", "Spine"]);
    match read_hir(Cur::new(&buf, path), &short_names, 128) {
        Err(e) => {
            match *e.kind() {
                ErrorKind::Config(_) => (),
                ref k => panic!("wrong error: {:?}", k),
            }
            assert!(e.to_string().contains("pig.hir"));
        }
        Ok(_) => panic!("name table overrun accepted"),
    }
    assert!(read_hir(Cur::new(&[], path), &NameTable::bones(), 128).is_err());
}
