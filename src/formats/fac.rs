//! Faces (`.fac`).
//!
//! ```text
//! padding        u8 x 16     always zero
//! num_triangles  u32
//! triangles      32 bytes each
//! num_quads      u32
//! quads          36 bytes each
//! ```
//!
//! A triangle is `uv: i8 x 6, vertex indices: u16 x 3, normal indices:
//! u16 x 3, unknown: u16, texture index: u32, unknown: u16 x 4`. A quad is
//! the same with four corners and without the lone `u16`.
//!
//! The zero padding is the only thing resembling a signature the format has,
//! so it is checked strictly.

use errors::{ErrorKind, Result};
use smallvec::SmallVec;
use util::cur::Cur;
use util::view::Viewable;

pub const HEADER_SIZE: usize = 16;
pub const TRIANGLE_SIZE: usize = 32;
pub const QUAD_SIZE: usize = 36;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Corner {
    pub uv: [i8; 2],
    pub vertex: u16,
    pub normal: u16,
}

/// A triangle or a quad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub corners: SmallVec<[Corner; 4]>,
    pub texture_index: u32,
}

impl Face {
    pub fn is_quad(&self) -> bool {
        self.corners.len() == 4
    }

    /// Corner indices of the triangles covering this face. Quads are split
    /// along the a-c diagonal.
    pub fn triangles(&self) -> SmallVec<[[usize; 3]; 2]> {
        let mut tris = SmallVec::new();
        for i in 1..self.corners.len().saturating_sub(1) {
            tris.push([0, i, i + 1]);
        }
        tris
    }
}

fn make_face(uvs: &[(i8, i8)], verts: &[u16], norms: &[u16], texture_index: u32) -> Face {
    let corners = uvs.iter().zip(verts).zip(norms)
        .map(|((&(u, v), &vertex), &normal)| Corner { uv: [u, v], vertex, normal })
        .collect();
    Face { corners, texture_index }
}

#[derive(Clone, Debug)]
struct Triangle(Face);

impl Viewable for Triangle {
    fn size() -> usize { TRIANGLE_SIZE }
    fn view(buf: &[u8]) -> Triangle {
        let ((uvs, verts, norms), (_unknown, tex, _unknown2)) = <(
            ([(i8, i8); 3], [u16; 3], [u16; 3]),
            (u16, u32, [u16; 4]),
        ) as Viewable>::view(buf);
        Triangle(make_face(&uvs, &verts, &norms, tex))
    }
}

#[derive(Clone, Debug)]
struct Quad(Face);

impl Viewable for Quad {
    fn size() -> usize { QUAD_SIZE }
    fn view(buf: &[u8]) -> Quad {
        let ((uvs, verts, norms), (tex, _unknown)) = <(
            ([(i8, i8); 4], [u16; 4], [u16; 4]),
            (u32, [u16; 4]),
        ) as Viewable>::view(buf);
        Quad(make_face(&uvs, &verts, &norms, tex))
    }
}

/// Read all faces, triangles first and then quads.
pub fn read_fac(cur: Cur) -> Result<Vec<Face>> {
    fields!(cur, fac_header {
        padding: [u8; HEADER_SIZE],
        body: Cur,
    });
    if let Some(pos) = padding.iter().position(|&b| b != 0) {
        bail!(ErrorKind::CorruptFormat(
            cur.path().to_owned(),
            format!("header byte {} is {:#x}, expected zero", pos, padding[pos]),
        ));
    }

    fields!(body, fac_body {
        num_triangles: u32,
        triangles: [Triangle; num_triangles],
        num_quads: u32,
        quads: [Quad; num_quads],
    });
    debug!("{}: {} triangles, {} quads", cur.path().display(), num_triangles, num_quads);

    let mut faces = Vec::with_capacity(triangles.len() + quads.len());
    faces.extend(triangles.map(|t| t.0));
    faces.extend(quads.map(|q| q.0));
    Ok(faces)
}

/// `(uvs, vertex indices, normal indices, texture index)` per face; three
/// or four corners each.
#[cfg(test)]
pub type FaceSpec<'a> = (&'a [(i8, i8)], &'a [u16], &'a [u16], u32);

#[cfg(test)]
pub fn fac_bytes(tris: &[FaceSpec], quads: &[FaceSpec]) -> Vec<u8> {
    fn push_face(v: &mut Vec<u8>, &(uvs, verts, norms, tex): &FaceSpec, is_tri: bool) {
        for &(u, w) in uvs {
            v.push(u as u8);
            v.push(w as u8);
        }
        for i in verts.iter().chain(norms) {
            v.extend_from_slice(&i.to_le_bytes());
        }
        if is_tri {
            v.extend_from_slice(&[0xAA, 0xAA]);
        }
        v.extend_from_slice(&tex.to_le_bytes());
        v.extend_from_slice(&[0x55; 8]);
    }

    let mut v = vec![0; HEADER_SIZE];
    v.extend_from_slice(&(tris.len() as u32).to_le_bytes());
    for t in tris {
        push_face(&mut v, t, true);
    }
    v.extend_from_slice(&(quads.len() as u32).to_le_bytes());
    for q in quads {
        push_face(&mut v, q, false);
    }
    v
}

#[cfg(test)]
use std::path::Path;

#[test]
fn test_read_fac() {
    let tri: FaceSpec = (&[(1, 2), (3, 4), (-5, -6)], &[0, 1, 2], &[3, 4, 5], 7);
    let quad: FaceSpec = (&[(0, 0), (1, 1), (2, 2), (3, 3)], &[0, 1, 2, 3], &[0, 0, 0, 0], 1);
    let buf = fac_bytes(&[tri], &[quad, quad]);
    assert_eq!(buf.len(), HEADER_SIZE + 4 + TRIANGLE_SIZE + 4 + 2 * QUAD_SIZE);

    let faces = read_fac(Cur::new(&buf, Path::new("x.fac"))).unwrap();
    assert_eq!(faces.len(), 3);
    assert!(!faces[0].is_quad());
    assert_eq!(faces[0].corners[2], Corner { uv: [-5, -6], vertex: 2, normal: 5 });
    assert_eq!(faces[0].texture_index, 7);
    assert!(faces[2].is_quad());
    assert_eq!(faces[2].texture_index, 1);
    assert_eq!(faces[2].triangles().to_vec(), vec![[0, 1, 2], [0, 2, 3]]);
}

#[test]
fn test_nonzero_header() {
    let mut buf = fac_bytes(&[], &[]);
    buf[15] = 1;
    match read_fac(Cur::new(&buf, Path::new("x.fac"))) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(..) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("nonzero header accepted"),
    }
}

#[test]
fn test_truncated_faces() {
    let tri: FaceSpec = (&[(0, 0); 3], &[0, 1, 2], &[0, 1, 2], 0);
    let buf = fac_bytes(&[tri, tri], &[]);
    let path = Path::new("x.fac");
    // Cut into the second triangle.
    match read_fac(Cur::new(&buf[..HEADER_SIZE + 4 + TRIANGLE_SIZE + 5], path)) {
        Err(e) => match *e.kind() {
            ErrorKind::TruncatedData(_, 2, 1) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("truncated triangles accepted"),
    }
    // Missing the quad count.
    assert!(read_fac(Cur::new(&buf[..buf.len() - 4], path)).is_err());
    // Missing the triangle count.
    assert!(read_fac(Cur::new(&buf[..HEADER_SIZE + 2], path)).is_err());
}
