//! Assemble a character mesh from its `.vtx` file and companions.
//!
//! Given `chars/british/ac_hi.vtx`, the faces are read from
//! `chars/british/ac_hi.fac` and the normals from `chars/british/ac_hi.no2`.
//! Vertices and faces are required; normals are optional and synthesized
//! when missing or unusable.

use errors::{ErrorKind, Result};
use formats::fac::{read_fac, Face};
use formats::hir::Bone;
use formats::no2::{load_no2, Normal};
use formats::vtx::{read_vtx, Vertex};
use normals;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use util::cur::{read_file, Cur};

pub const FACES_EXTENSION: &str = "fac";
pub const NORMALS_EXTENSION: &str = "no2";

pub struct Model {
    /// The `.vtx` file this was loaded from.
    pub path: PathBuf,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub normals: Vec<Normal>,
    /// True if `normals` were generated rather than read from a `.no2`.
    pub normals_synthesized: bool,
    /// This model's own copy of the skeleton. Rebuilding the cache the
    /// skeleton came from doesn't affect it.
    pub bones: Vec<Bone>,
    pub num_lods: u32,
}

/// The path of a file next to `path` with the same stem.
pub fn companion_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

pub fn load_model(vtx_path: &Path, skeleton: &[Bone]) -> Result<Model> {
    info!("loading model {}", vtx_path.display());

    let vtx_buf = read_file(vtx_path)?;
    let vertices = read_vtx(Cur::new(&vtx_buf, vtx_path))?;

    let fac_path = companion_path(vtx_path, FACES_EXTENSION);
    let fac_buf = read_file(&fac_path)?;
    let mut faces = read_fac(Cur::new(&fac_buf, &fac_path))?;

    validate_vertex_indices(&fac_path, &vertices, &faces)?;

    let no2_path = companion_path(vtx_path, NORMALS_EXTENSION);
    let loaded = load_no2(&no2_path).and_then(|normals| {
        if max_normal_index(&faces).map_or(false, |max| max >= normals.len()) {
            bail!(ErrorKind::MissingCompanion(no2_path.clone()));
        }
        Ok(normals)
    });
    let (normals, normals_synthesized) = match loaded {
        Ok(normals) => (normals, false),
        Err(e) => {
            warn!("{}, generating normals instead", e);
            // Synthesized normals are per-vertex.
            for face in &mut faces {
                for corner in &mut face.corners {
                    corner.normal = corner.vertex;
                }
            }
            (normals::generate(&vertices, &faces), true)
        }
    };

    Ok(Model {
        path: vtx_path.to_owned(),
        vertices,
        faces,
        normals,
        normals_synthesized,
        bones: skeleton.to_vec(),
        num_lods: 1,
    })
}

fn max_normal_index(faces: &[Face]) -> Option<usize> {
    faces.iter()
        .flat_map(|face| face.corners.iter())
        .map(|corner| corner.normal as usize)
        .max()
}

fn validate_vertex_indices(fac_path: &Path, vertices: &[Vertex], faces: &[Face]) -> Result<()> {
    for (i, face) in faces.iter().enumerate() {
        for corner in &face.corners {
            if corner.vertex as usize >= vertices.len() {
                bail!(ErrorKind::CorruptFormat(
                    fac_path.to_owned(),
                    format!("face {} references vertex {} but there are only {}",
                        i, corner.vertex, vertices.len()),
                ));
            }
        }
    }
    Ok(())
}

impl Model {
    pub fn num_triangles(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_quad()).count()
    }

    pub fn num_quads(&self) -> usize {
        self.faces.iter().filter(|f| f.is_quad()).count()
    }

    /// Vertex indices for drawing every face as triangles.
    pub fn triangulated(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.faces.len() * 6);
        for face in &self.faces {
            for tri in face.triangles() {
                for &c in &tri {
                    indices.push(face.corners[c].vertex as u32);
                }
            }
        }
        indices
    }

    /// Every texture slot some face uses.
    pub fn texture_indices(&self) -> BTreeSet<u32> {
        self.faces.iter().map(|f| f.texture_index).collect()
    }

    /// Check every face's texture index against a texture index of
    /// `num_textures` entries.
    pub fn validate_texture_indices(&self, num_textures: usize) -> Result<()> {
        if let Some(&max) = self.texture_indices().iter().next_back() {
            if max as usize >= num_textures {
                bail!(ErrorKind::CorruptFormat(
                    companion_path(&self.path, FACES_EXTENSION),
                    format!("uses texture {} but the texture index has only {}",
                        max, num_textures),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_files {
    use formats::fac::{fac_bytes, FaceSpec};
    use formats::no2::no2_bytes;
    use formats::vtx::vtx_bytes;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Write `<stem>.vtx` and `<stem>.fac` for a unit square (two triangles
    /// over vertices 0-3) plus a quad over 0-3, textured with slot
    /// `texture`. Returns the `.vtx` path.
    pub fn write_square(dir: &Path, stem: &str, texture: u32) -> PathBuf {
        let vtx = vtx_bytes(&[
            ([0, 0, 0], 0), ([10, 0, 0], 0), ([10, 10, 0], 1), ([0, 10, 0], 1),
        ]);
        let tri_a: FaceSpec = (&[(0, 0); 3], &[0, 1, 2], &[0, 1, 2], texture);
        let tri_b: FaceSpec = (&[(0, 0); 3], &[0, 2, 3], &[0, 2, 3], texture);
        let quad: FaceSpec = (&[(0, 0); 4], &[0, 1, 2, 3], &[0, 1, 2, 3], texture);
        let fac = fac_bytes(&[tri_a, tri_b], &[quad]);

        let vtx_path = dir.join(format!("{}.vtx", stem));
        fs::write(&vtx_path, vtx).unwrap();
        fs::write(dir.join(format!("{}.fac", stem)), fac).unwrap();
        vtx_path
    }

    pub fn write_normals(dir: &Path, stem: &str, count: usize) {
        let normals = vec![[0.0, 0.0, 1.0, 0.0]; count];
        fs::write(dir.join(format!("{}.no2", stem)), no2_bytes(&normals)).unwrap();
    }
}

#[cfg(test)]
pub use self::test_files::{write_normals, write_square};

#[test]
fn test_load_with_normals() {
    use formats::hir::Bone;
    use cgmath::Vector3;

    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = write_square(dir.path(), "gr_hi", 0);
    write_normals(dir.path(), "gr_hi", 4);
    let skeleton = vec![Bone { name: "Hip".into(), parent: None, coord: Vector3::new(1, 2, 3) }];

    let model = load_model(&vtx_path, &skeleton).unwrap();
    assert_eq!(model.vertices.len(), 4);
    assert_eq!(model.num_triangles(), 2);
    assert_eq!(model.num_quads(), 1);
    assert_eq!(model.normals.len(), 4);
    assert!(!model.normals_synthesized);
    assert_eq!(model.bones, skeleton);
    assert_eq!(model.num_lods, 1);
    assert_eq!(model.triangulated(), vec![0, 1, 2, 0, 2, 3, 0, 1, 2, 0, 2, 3]);
    assert!(model.validate_texture_indices(1).is_ok());
    assert!(model.validate_texture_indices(0).is_err());
}

#[test]
fn test_missing_normals_are_synthesized() {
    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = write_square(dir.path(), "sp_hi", 0);
    let model = load_model(&vtx_path, &[]).unwrap();
    assert!(model.normals_synthesized);
    assert_eq!(model.normals.len(), model.vertices.len());
    for face in &model.faces {
        for corner in &face.corners {
            assert_eq!(corner.normal, corner.vertex);
        }
    }
}

#[test]
fn test_short_normals_are_synthesized() {
    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = write_square(dir.path(), "me_hi", 0);
    // Faces reference normal 3 but only two exist.
    write_normals(dir.path(), "me_hi", 2);
    let model = load_model(&vtx_path, &[]).unwrap();
    assert!(model.normals_synthesized);
    assert_eq!(model.normals.len(), 4);
}

#[test]
fn test_bad_fac_produces_no_model() {
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = write_square(dir.path(), "hv_hi", 0);
    let fac_path = dir.path().join("hv_hi.fac");
    let mut fac = fs::read(&fac_path).unwrap();
    fac[3] = 0x7f;
    fs::write(&fac_path, &fac).unwrap();
    match load_model(&vtx_path, &[]) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(ref p, _) => assert_eq!(*p, fac_path),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("model built from corrupt faces"),
    }

    fs::remove_file(&fac_path).unwrap();
    match load_model(&vtx_path, &[]) {
        Err(e) => match *e.kind() {
            ErrorKind::MissingFile(ref p) => assert_eq!(*p, fac_path),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("model built without faces"),
    }
}

#[test]
fn test_out_of_range_vertex() {
    use formats::fac::{fac_bytes, FaceSpec};
    use formats::vtx::vtx_bytes;
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = dir.path().join("le_hi.vtx");
    fs::write(&vtx_path, vtx_bytes(&[([0, 0, 0], 0); 3])).unwrap();
    let tri: FaceSpec = (&[(0, 0); 3], &[0, 1, 3], &[0, 0, 0], 0);
    fs::write(dir.path().join("le_hi.fac"), fac_bytes(&[tri], &[])).unwrap();
    assert!(load_model(&vtx_path, &[]).is_err());
}

#[test]
fn test_bad_normal_bone_is_synthesized() {
    use formats::no2::no2_bytes;
    use std::fs;

    let dir = ::tempfile::tempdir().unwrap();
    let vtx_path = write_square(dir.path(), "sa_hi", 0);
    let normals = [[0.0, 0.0, 1.0, 0.5]; 4];
    fs::write(dir.path().join("sa_hi.no2"), no2_bytes(&normals)).unwrap();
    let model = load_model(&vtx_path, &[]).unwrap();
    assert!(model.normals_synthesized);
    assert_eq!(model.normals.len(), 4);
}
