//! Vertex positions (`.vtx`).
//!
//! Headerless array of 8-byte records: `x, y, z: i16` and the index of the
//! bone the vertex is skinned to (`u16`).

use cgmath::{Point3, Vector3};
use errors::Result;
use util::cur::Cur;
use util::view::Viewable;

pub const RECORD_SIZE: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vector3<i16>,
    pub bone_index: u16,
}

impl Vertex {
    pub fn point(&self) -> Point3<f32> {
        let p = self.position;
        Point3::new(p.x as f32, p.y as f32, p.z as f32)
    }
}

impl Viewable for Vertex {
    fn size() -> usize { RECORD_SIZE }
    fn view(buf: &[u8]) -> Vertex {
        let (x, y, z, bone_index) = <(i16, i16, i16, u16) as Viewable>::view(buf);
        Vertex { position: Vector3::new(x, y, z), bone_index }
    }
}

pub fn read_vtx(cur: Cur) -> Result<Vec<Vertex>> {
    let num_vertices = cur.record_count::<Vertex>();
    debug!("{}: {} vertices", cur.path().display(), num_vertices);
    let mut cur = cur;
    Ok(cur.next_n::<Vertex>(num_vertices)?.collect())
}

#[cfg(test)]
pub fn vtx_bytes(verts: &[([i16; 3], u16)]) -> Vec<u8> {
    let mut v = vec![];
    for &(pos, bone) in verts {
        for c in &pos {
            v.extend_from_slice(&c.to_le_bytes());
        }
        v.extend_from_slice(&bone.to_le_bytes());
    }
    v
}

#[test]
fn test_read_vtx() {
    let mut buf = vtx_bytes(&[([1, 2, 3], 0), ([-1, -2, -3], 14)]);
    buf.push(0xff);
    let verts = read_vtx(Cur::new(&buf, ::std::path::Path::new("x.vtx"))).unwrap();
    assert_eq!(verts.len(), 2);
    assert_eq!(verts[1].position, Vector3::new(-1, -2, -3));
    assert_eq!(verts[1].bone_index, 14);
}
