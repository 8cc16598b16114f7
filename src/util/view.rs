use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Write;
use std::iter::Iterator;
use std::marker::PhantomData;

/// Types that can be viewed as a fixed-length, packed, little-endian byte
/// sequence.
///
/// `view` is only ever called with a slice of exactly `size()` bytes. There
/// is no alignment or padding between fields; every on-disk record is
/// described by composing these.
pub trait Viewable: Sized {
    fn size() -> usize;
    fn view(buf: &[u8]) -> Self;
}

impl Viewable for u8 {
    fn size() -> usize { 1 }
    fn view(buf: &[u8]) -> u8 { buf[0] }
}

impl Viewable for i8 {
    fn size() -> usize { 1 }
    fn view(buf: &[u8]) -> i8 { buf[0] as i8 }
}

impl Viewable for u16 {
    fn size() -> usize { 2 }
    fn view(buf: &[u8]) -> u16 {
        buf[0] as u16 | (buf[1] as u16) << 8
    }
}

impl Viewable for i16 {
    fn size() -> usize { 2 }
    fn view(buf: &[u8]) -> i16 { <u16 as Viewable>::view(buf) as i16 }
}

impl Viewable for u32 {
    fn size() -> usize { 4 }
    fn view(buf: &[u8]) -> u32 {
        buf[0] as u32 | (buf[1] as u32) << 8 | (buf[2] as u32) << 16 | (buf[3] as u32) << 24
    }
}

impl Viewable for f32 {
    fn size() -> usize { 4 }
    fn view(buf: &[u8]) -> f32 { f32::from_bits(<u32 as Viewable>::view(buf)) }
}

impl<T,S> Viewable for (T,S) where
    T: Viewable,
    S: Viewable
{
    fn size() -> usize { <T as Viewable>::size() + <S as Viewable>::size() }
    fn view(buf: &[u8]) -> (T,S) {
        let split = <T as Viewable>::size();
        let t = <T as Viewable>::view(&buf[..split]);
        let s = <S as Viewable>::view(&buf[split..]);
        (t,s)
    }
}

impl<T,S,P> Viewable for (T,S,P) where
    T: Viewable,
    S: Viewable,
    P: Viewable,
{
    fn size() -> usize { <(T,(S,P)) as Viewable>::size() }
    fn view(buf: &[u8]) -> (T,S,P) {
        let (t,(s,p)) = <(T,(S,P)) as Viewable>::view(buf);
        (t,s,p)
    }
}

impl<T,S,P,Q> Viewable for (T,S,P,Q) where
    T: Viewable,
    S: Viewable,
    P: Viewable,
    Q: Viewable,
{
    fn size() -> usize { <((T,S),(P,Q)) as Viewable>::size() }
    fn view(buf: &[u8]) -> (T,S,P,Q) {
        let ((t,s),(p,q)) = <((T,S),(P,Q)) as Viewable>::view(buf);
        (t,s,p,q)
    }
}

/// Fixed-length arrays, elements packed back to back.
impl<T, const N: usize> Viewable for [T; N] where
    T: Viewable + Copy + Default,
{
    fn size() -> usize { N * <T as Viewable>::size() }
    fn view(buf: &[u8]) -> [T; N] {
        let size = <T as Viewable>::size();
        let mut arr = [T::default(); N];
        for (i, x) in arr.iter_mut().enumerate() {
            *x = <T as Viewable>::view(&buf[i * size .. (i + 1) * size]);
        }
        arr
    }
}

/// A byte buffer interpreted as an array of Viewable elements.
pub struct View<'a, T> {
    buf: &'a [u8],
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> Copy for View<'a, T> {}

impl<'a, T> Clone for View<'a, T> {
    fn clone(&self) -> View<'a, T> { *self }
}

impl<'a, T: Viewable> View<'a, T> {
    pub fn from_buf(buf: &'a [u8]) -> View<'a, T> {
        let size = <T as Viewable>::size();
        assert!(size == 0 || buf.len() % size == 0);
        View { buf: buf, _marker: PhantomData }
    }

    pub fn len(&self) -> usize {
        let size = <T as Viewable>::size();
        self.buf.len() / size
    }

    pub fn get(&self, pos: usize) -> Option<T> {
        let size = <T as Viewable>::size();
        let begin = size * pos;
        let end = begin + size;
        if end > self.buf.len() {
            return None;
        }
        Some(<T as Viewable>::view(&self.buf[begin..end]))
    }
}

impl<'a, T: Viewable + Debug> Debug for View<'a, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "View({}) [", self.len())?;
        for (i, x) in self.clone().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", x)?;
        }
        f.write_char(']')
    }
}

impl<'a, T: Viewable> Iterator for View<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let size = <T as Viewable>::size();
        if self.buf.is_empty() || self.buf.len() < size {
            None
        } else {
            let item = <T as Viewable>::view(&self.buf[0..size]);
            self.buf = &self.buf[size..];
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, T: Viewable> ExactSizeIterator for View<'a, T> {}

#[test]
fn test_packed_views() {
    let buf = [0xff, 0x02, 0x80, 0x00, 0x00, 0x80, 0x3f, 9, 8, 7];
    let (a, b, c): (i8, i16, f32) = Viewable::view(&buf[..7]);
    assert_eq!(a, -1);
    assert_eq!(b, -32766);
    assert_eq!(c, 1.0);
    assert_eq!(<(i8, i16, f32) as Viewable>::size(), 7);
    let arr: [u8; 3] = Viewable::view(&buf[7..]);
    assert_eq!(arr, [9, 8, 7]);
    assert_eq!(<[(u16, u32); 5] as Viewable>::size(), 30);
}
