//! Vertex normal synthesis, for meshes without a usable `.no2` companion.
//!
//! Each face contributes its (area-weighted) face normal to every vertex it
//! touches; the sums are then normalized. Winding is taken as stored, so a
//! counter-clockwise triangle `a, b, c` faces along `(b - a) x (c - a)`.

use cgmath::{InnerSpace, Vector3, Zero};
use formats::fac::Face;
use formats::no2::Normal;
use formats::vtx::Vertex;

/// One normal per vertex. Vertices no face references (or only degenerate
/// faces reference) get a zero normal. Faces with out-of-range vertex
/// indices are skipped.
pub fn generate(vertices: &[Vertex], faces: &[Face]) -> Vec<Normal> {
    let mut sums = vec![Vector3::<f32>::zero(); vertices.len()];

    for face in faces {
        for tri in face.triangles() {
            let idx = [
                face.corners[tri[0]].vertex as usize,
                face.corners[tri[1]].vertex as usize,
                face.corners[tri[2]].vertex as usize,
            ];
            if idx.iter().any(|&i| i >= vertices.len()) {
                continue;
            }
            let a = vertices[idx[0]].point();
            let b = vertices[idx[1]].point();
            let c = vertices[idx[2]].point();
            let n = (b - a).cross(c - a);
            for &i in &idx {
                sums[i] += n;
            }
        }
    }

    sums.into_iter()
        .zip(vertices)
        .map(|(sum, vert)| {
            let normal = if sum.magnitude2() > 0.0 { sum.normalize() } else { sum };
            Normal { normal, bone_index: vert.bone_index }
        })
        .collect()
}

#[test]
fn test_generate() {
    use smallvec::SmallVec;
    use formats::fac::Corner;

    let vert = |x, y, z| Vertex { position: Vector3::new(x, y, z), bone_index: 2 };
    let vertices = vec![
        vert(0, 0, 0), vert(10, 0, 0), vert(10, 10, 0), vert(0, 10, 0), vert(5, 5, 5),
    ];
    let corner = |vertex| Corner { uv: [0, 0], vertex, normal: 0 };
    let quad = Face {
        corners: [0, 1, 2, 3].iter().map(|&v| corner(v)).collect::<SmallVec<_>>(),
        texture_index: 0,
    };
    let normals = generate(&vertices, &[quad]);
    assert_eq!(normals.len(), vertices.len());
    for n in &normals[..4] {
        assert_eq!(n.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(n.bone_index, 2);
    }
    assert_eq!(normals[4].normal, Vector3::zero());
}
