//! Vertex normals (`.no2`).
//!
//! Headerless array of 16-byte records, all `f32`: `x, y, z` and the owning
//! bone index. The bone index is stored as a float but must be a whole
//! number that fits a `u16`. Optional; when it is unusable the mesh loader
//! synthesizes normals instead.

use cgmath::Vector3;
use errors::{ErrorKind, Result};
use std::path::Path;
use util::cur::{read_file, Cur};
use util::view::Viewable;

pub const RECORD_SIZE: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normal {
    pub normal: Vector3<f32>,
    pub bone_index: u16,
}

#[derive(Copy, Clone, Debug)]
struct No2Record {
    normal: [f32; 3],
    bone: f32,
}

impl Viewable for No2Record {
    fn size() -> usize { RECORD_SIZE }
    fn view(buf: &[u8]) -> No2Record {
        let (normal, bone) = <([f32; 3], f32) as Viewable>::view(buf);
        No2Record { normal, bone }
    }
}

fn whole_bone_index(bone: f32) -> Option<u16> {
    if bone.fract() == 0.0 && bone >= 0.0 && bone <= u16::max_value() as f32 {
        Some(bone as u16)
    } else {
        None
    }
}

/// Load a companion normal file. A missing or cut short file is reported as
/// `MissingCompanion`; a bad bone index as `CorruptFormat`.
pub fn load_no2(path: &Path) -> Result<Vec<Normal>> {
    let buf = match read_file(path) {
        Ok(buf) => buf,
        Err(_) => bail!(ErrorKind::MissingCompanion(path.to_owned())),
    };
    read_no2(Cur::new(&buf, path))
}

pub fn read_no2(cur: Cur) -> Result<Vec<Normal>> {
    // A ragged tail means the file was cut short.
    if cur.len() == 0 || cur.len() % RECORD_SIZE != 0 {
        bail!(ErrorKind::MissingCompanion(cur.path().to_owned()));
    }
    let num_normals = cur.record_count::<No2Record>();
    debug!("{}: {} normals", cur.path().display(), num_normals);
    let mut records = cur;
    records.next_n::<No2Record>(num_normals)?
        .enumerate()
        .map(|(i, rec)| -> Result<Normal> {
            let bone_index = match whole_bone_index(rec.bone) {
                Some(b) => b,
                None => bail!(ErrorKind::CorruptFormat(
                    cur.path().to_owned(),
                    format!("normal {} has bone index {}, expected a whole number", i, rec.bone),
                )),
            };
            let [x, y, z] = rec.normal;
            Ok(Normal { normal: Vector3::new(x, y, z), bone_index })
        })
        .collect()
}

#[cfg(test)]
pub fn no2_bytes(normals: &[[f32; 4]]) -> Vec<u8> {
    let mut v = vec![];
    for n in normals {
        for c in n {
            v.extend_from_slice(&c.to_bits().to_le_bytes());
        }
    }
    v
}

#[test]
fn test_read_no2() {
    let path = Path::new("x.no2");
    let buf = no2_bytes(&[[0.0, 1.0, 0.0, 3.0]]);
    let normals = read_no2(Cur::new(&buf, path)).unwrap();
    assert_eq!(normals, vec![Normal { normal: Vector3::new(0.0, 1.0, 0.0), bone_index: 3 }]);

    match read_no2(Cur::new(&buf[..10], path)) {
        Err(e) => match *e.kind() {
            ErrorKind::MissingCompanion(_) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("short normal file accepted"),
    }
    assert!(load_no2(Path::new("/nonexistent/x.no2")).is_err());
}

#[test]
fn test_bad_bone_index() {
    let path = Path::new("x.no2");
    for &bone in &[1.5, -1.0, 70000.0, ::std::f32::NAN] {
        let buf = no2_bytes(&[[0.0, 0.0, 1.0, 0.0], [1.0, 0.0, 0.0, bone]]);
        match read_no2(Cur::new(&buf, path)) {
            Err(e) => match *e.kind() {
                ErrorKind::CorruptFormat(..) => (),
                ref k => panic!("wrong error: {:?}", k),
            },
            Ok(_) => panic!("bone index {} accepted", bone),
        }
    }
    let buf = no2_bytes(&[[0.0, 0.0, 1.0, 65535.0]]);
    assert_eq!(read_no2(Cur::new(&buf, path)).unwrap()[0].bone_index, 65535);
}
