//! Animation capture (`mcap.mad`).
//!
//! The file starts with an index block: one `{ offset: u32, length: u32 }`
//! entry per catalog slot, back to back. Each entry points at a run of
//! keyframes somewhere later in the file (not necessarily in slot order).
//!
//! A keyframe is 272 packed bytes:
//!
//! ```text
//! unused        i16
//! translations  (i8, i8, i8) x 10     for the first 10 bones
//! rotations     (f32 x 4) x 15        quaternion x,y,z,w for the first 15 bones
//! ```
//!
//! The number of keyframes in a slot is `length / 272`, rounding down.

use cgmath::{Quaternion, Vector3, Zero};
use errors::{ErrorKind, Result};
use names::NameTable;
use std::path::Path;
use util::cur::{read_file, Cur};
use util::view::Viewable;

pub const NUM_TRANSLATED_BONES: usize = 10;
pub const NUM_ROTATED_BONES: usize = 15;
pub const INDEX_ENTRY_SIZE: usize = 8;
pub const KEYFRAME_SIZE: usize = 2 + NUM_TRANSLATED_BONES * 3 + NUM_ROTATED_BONES * 16;

/// What to do with a catalog slot that holds no keyframes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmptySlotPolicy {
    /// Every slot must have at least one keyframe.
    Strict,
    /// Slots with a blank name may be empty; named slots must not be.
    SkipBlank,
}

impl Default for EmptySlotPolicy {
    fn default() -> EmptySlotPolicy { EmptySlotPolicy::Strict }
}

/// One sampled pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub translations: [Vector3<f32>; NUM_TRANSLATED_BONES],
    pub rotations: [Quaternion<f32>; NUM_ROTATED_BONES],
}

impl Viewable for Keyframe {
    fn size() -> usize { KEYFRAME_SIZE }
    fn view(buf: &[u8]) -> Keyframe {
        let (_unused, trans, rots) = <(
            i16,
            [(i8, i8, i8); NUM_TRANSLATED_BONES],
            [(f32, f32, f32, f32); NUM_ROTATED_BONES],
        ) as Viewable>::view(buf);

        let mut translations = [Vector3::zero(); NUM_TRANSLATED_BONES];
        for (t, &(x, y, z)) in translations.iter_mut().zip(trans.iter()) {
            *t = Vector3::new(x as f32, y as f32, z as f32);
        }
        let mut rotations = [Quaternion::new(1.0, 0.0, 0.0, 0.0); NUM_ROTATED_BONES];
        for (r, &(x, y, z, w)) in rotations.iter_mut().zip(rots.iter()) {
            *r = Quaternion::new(w, x, y, z);
        }
        Keyframe { translations, rotations }
    }
}

#[derive(Copy, Clone, Debug)]
struct IndexEntry {
    offset: u32,
    length: u32,
}

impl Viewable for IndexEntry {
    fn size() -> usize { INDEX_ENTRY_SIZE }
    fn view(buf: &[u8]) -> IndexEntry {
        let (offset, length) = <(u32, u32) as Viewable>::view(buf);
        IndexEntry { offset, length }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
}

impl Animation {
    pub fn num_frames(&self) -> usize {
        self.keyframes.len()
    }

    pub fn frame(&self, idx: usize) -> Option<&Keyframe> {
        self.keyframes.get(idx)
    }

    /// The keyframe for a free-running frame counter; wraps around at the
    /// end of the animation.
    pub fn frame_looped(&self, tick: usize) -> Option<&Keyframe> {
        if self.keyframes.is_empty() {
            return None;
        }
        self.keyframes.get(tick % self.keyframes.len())
    }
}

pub fn load_mad(path: &Path, names: &NameTable, policy: EmptySlotPolicy) -> Result<Vec<Animation>> {
    let buf = read_file(path)?;
    read_mad(Cur::new(&buf, path), names, policy)
}

/// Read one animation per entry of `names`.
pub fn read_mad(cur: Cur, names: &NameTable, policy: EmptySlotPolicy) -> Result<Vec<Animation>> {
    if cur.len() < KEYFRAME_SIZE {
        bail!(ErrorKind::CorruptFormat(
            cur.path().to_owned(),
            format!("{} bytes is too small to hold any keyframes", cur.len()),
        ));
    }

    let mut index_cur = cur;
    let mut animations = Vec::with_capacity(names.len());

    for slot in 0..names.len() {
        let entry = index_cur.next::<IndexEntry>()?;
        let name = names.get(slot).unwrap_or("");

        let num_keyframes = entry.length as usize / KEYFRAME_SIZE;
        if num_keyframes == 0 {
            if policy == EmptySlotPolicy::SkipBlank && names.is_blank(slot) {
                debug!("animation slot {} is empty and unnamed, keeping it with no frames", slot);
                animations.push(Animation { name: name.to_string(), keyframes: vec![] });
                continue;
            }
            bail!(ErrorKind::CorruptFormat(
                cur.path().to_owned(),
                format!("animation slot {} ({:?}) has no keyframes (length {})",
                    slot, name, entry.length),
            ));
        }
        if entry.length as usize % KEYFRAME_SIZE != 0 {
            debug!("animation slot {} has {} trailing bytes, ignoring them",
                slot, entry.length as usize % KEYFRAME_SIZE);
        }

        let keyframes = cur.at(entry.offset as usize)
            .next_n::<Keyframe>(num_keyframes)?
            .collect::<Vec<Keyframe>>();

        debug!("animation {} {:?}: {} keyframes @{:#x}",
            slot, name, keyframes.len(), entry.offset);

        animations.push(Animation { name: name.to_string(), keyframes });
    }

    Ok(animations)
}

#[cfg(test)]
pub fn keyframe_bytes(seed: i8) -> Vec<u8> {
    let mut v = vec![0xEE, 0xEE];
    for i in 0..NUM_TRANSLATED_BONES as i8 {
        v.extend_from_slice(&[seed as u8, i as u8, seed.wrapping_neg() as u8]);
    }
    for i in 0..NUM_ROTATED_BONES {
        for c in &[i as f32, 0.5, -0.5, seed as f32] {
            v.extend_from_slice(&c.to_bits().to_le_bytes());
        }
    }
    v
}

/// Build a capture file. Each slot is `(length field, keyframe seeds)`; the
/// keyframes are appended after the index block in slot order.
#[cfg(test)]
pub fn mad_bytes(slots: &[(u32, Vec<i8>)]) -> Vec<u8> {
    let mut index = vec![];
    let mut data = vec![];
    let data_start = slots.len() * INDEX_ENTRY_SIZE;
    for &(length, ref seeds) in slots {
        let offset = (data_start + data.len()) as u32;
        index.extend_from_slice(&offset.to_le_bytes());
        index.extend_from_slice(&length.to_le_bytes());
        for &seed in seeds {
            data.extend(keyframe_bytes(seed));
        }
    }
    index.extend(data);
    index
}

#[test]
fn test_keyframe_layout() {
    assert_eq!(KEYFRAME_SIZE, 272);
    let kf = Keyframe::view(&keyframe_bytes(3));
    assert_eq!(kf.translations[0], Vector3::new(3.0, 0.0, -3.0));
    assert_eq!(kf.translations[9], Vector3::new(3.0, 9.0, -3.0));
    assert_eq!(kf.rotations[14], Quaternion::new(3.0, 14.0, 0.5, -0.5));
}

#[test]
fn test_exact_and_misaligned_lengths() {
    let k = KEYFRAME_SIZE as u32;
    let buf = mad_bytes(&[
        (2 * k, vec![1, 2]),
        (2 * k + 100, vec![3, 4, 5]),
    ]);
    let names = NameTable::new(vec!["a", "b"]);
    let anims = read_mad(Cur::new(&buf, Path::new("mcap.mad")), &names, EmptySlotPolicy::Strict).unwrap();
    assert_eq!(anims.len(), 2);
    assert_eq!(anims[0].num_frames(), 2);
    assert_eq!(anims[1].num_frames(), 2);
    assert_eq!(anims[1].name, "b");
    assert_eq!(anims[1].keyframes[0].translations[0].x, 3.0);
    assert_eq!(anims[1].frame_looped(3).unwrap().translations[0].x, 4.0);
}

#[test]
fn test_offsets_need_not_follow_index_order() {
    let k = KEYFRAME_SIZE;
    let mut buf = vec![];
    let data_start = 2 * INDEX_ENTRY_SIZE;
    // Slot 0 points at the second block, slot 1 at the first.
    buf.extend_from_slice(&((data_start + k) as u32).to_le_bytes());
    buf.extend_from_slice(&(k as u32).to_le_bytes());
    buf.extend_from_slice(&(data_start as u32).to_le_bytes());
    buf.extend_from_slice(&(k as u32).to_le_bytes());
    buf.extend(keyframe_bytes(10));
    buf.extend(keyframe_bytes(20));
    let names = NameTable::new(vec!["a", "b"]);
    let anims = read_mad(Cur::new(&buf, Path::new("mcap.mad")), &names, EmptySlotPolicy::Strict).unwrap();
    assert_eq!(anims[0].keyframes[0].translations[0].x, 20.0);
    assert_eq!(anims[1].keyframes[0].translations[0].x, 10.0);
}

#[test]
fn test_empty_slot_policies() {
    let k = KEYFRAME_SIZE as u32;
    let buf = mad_bytes(&[(k, vec![1]), (0, vec![])]);
    let path = Path::new("mcap.mad");

    let blank_tail = NameTable::new(vec!["a", ""]);
    match read_mad(Cur::new(&buf, path), &blank_tail, EmptySlotPolicy::Strict) {
        Err(e) => match *e.kind() {
            ErrorKind::CorruptFormat(..) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("empty slot accepted"),
    }

    let anims = read_mad(Cur::new(&buf, path), &blank_tail, EmptySlotPolicy::SkipBlank).unwrap();
    assert_eq!(anims.len(), 2);
    assert_eq!(anims[1].num_frames(), 0);
    assert!(anims[1].frame_looped(0).is_none());

    let named = NameTable::new(vec!["a", "b"]);
    assert!(read_mad(Cur::new(&buf, path), &named, EmptySlotPolicy::SkipBlank).is_err());
}

#[test]
fn test_truncated_keyframes() {
    let k = KEYFRAME_SIZE as u32;
    // Claims three keyframes but only has one.
    let buf = mad_bytes(&[(3 * k, vec![1])]);
    let names = NameTable::new(vec!["a"]);
    match read_mad(Cur::new(&buf, Path::new("mcap.mad")), &names, EmptySlotPolicy::Strict) {
        Err(e) => match *e.kind() {
            ErrorKind::TruncatedData(_, 3, 1) => (),
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("read past end of file"),
    }
}
