use errors::{ErrorKind, Result};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use util::view::{View, Viewable};

/// A pointer into the bytes of a file. Used for binary file parsing.
///
/// Every read is all-or-nothing: either the whole request fits in what is
/// left of the buffer, or it fails with `TruncatedData` naming the file and
/// nothing is consumed.
#[derive(Copy, Clone)]
pub struct Cur<'a> {
    buf_: &'a [u8],
    pos_: usize,
    path_: &'a Path,
}

impl<'a> Cur<'a> {
    pub fn new(buf: &'a [u8], path: &'a Path) -> Cur<'a> {
        Cur { buf_: buf, pos_: 0, path_: path }
    }

    /// The file this buffer was read from.
    pub fn path(&self) -> &'a Path {
        self.path_
    }

    pub fn pos(&self) -> usize {
        self.pos_
    }

    /// Size of the whole underlying buffer (ie. the file size).
    pub fn len(&self) -> usize {
        self.buf_.len()
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buf_.len().saturating_sub(self.pos_)
    }

    /// How many whole `T` records fit in the buffer. Trailing bytes that
    /// don't make a full record are not counted.
    pub fn record_count<T: Viewable>(&self) -> usize {
        self.buf_.len() / <T as Viewable>::size()
    }

    pub fn next<T: Viewable>(&mut self) -> Result<T> {
        let size = <T as Viewable>::size();
        if size > self.bytes_remaining() {
            bail!(ErrorKind::TruncatedData(self.path_.to_owned(), 1, 0));
        }
        let buf = self.next_n_u8s(size)?;
        Ok(<T as Viewable>::view(buf))
    }

    pub fn next_n<T: Viewable>(&mut self, n: usize) -> Result<View<'a, T>> {
        let size = <T as Viewable>::size();
        let fits = match size.checked_mul(n) {
            Some(num_bytes) => num_bytes <= self.bytes_remaining(),
            None => false,
        };
        if !fits {
            let actual = self.bytes_remaining() / size;
            bail!(ErrorKind::TruncatedData(self.path_.to_owned(), n, actual));
        }
        let buf = self.next_n_u8s(size * n)?;
        Ok(View::from_buf(buf))
    }

    pub fn next_n_u8s(&mut self, n: usize) -> Result<&'a [u8]> {
        // A cursor moved past the end can't even read nothing.
        if self.pos_ > self.buf_.len() || n > self.bytes_remaining() {
            let actual = self.bytes_remaining();
            bail!(ErrorKind::TruncatedData(self.path_.to_owned(), n, actual));
        }
        let res = &self.buf_[self.pos_ .. self.pos_ + n];
        self.pos_ += n;
        Ok(res)
    }

    /// A copy of this cursor sitting at the absolute offset `pos`. The
    /// receiver keeps its own position.
    pub fn at(&self, pos: usize) -> Cur<'a> {
        let mut cur = *self;
        cur.jump_to(pos);
        cur
    }

    pub fn jump_to(&mut self, pos: usize) {
        self.pos_ = pos;
    }
}

impl<'a> fmt::Debug for Cur<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cur {{ path: {:?}, pos: {:#x} }}", self.path_, self.pos())
    }
}

/// Read the whole file at `path`. A file that can't be opened is reported as
/// `MissingFile`.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut f = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("open {}: {}", path.display(), e);
            bail!(ErrorKind::MissingFile(path.to_owned()));
        }
    };
    let mut bytes = vec![];
    f.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[test]
fn test_short_read_reports_counts() {
    let path = Path::new("test.bin");
    let buf = [1u8, 0, 2, 0, 3];
    let mut cur = Cur::new(&buf, path);
    match cur.next_n::<u16>(3) {
        Err(e) => match *e.kind() {
            ErrorKind::TruncatedData(ref p, expected, actual) => {
                assert_eq!(p, path);
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            ref k => panic!("wrong error: {:?}", k),
        },
        Ok(_) => panic!("read past the end"),
    }
    // Nothing was consumed by the failed read.
    assert_eq!(cur.pos(), 0);
    let v: Vec<u16> = cur.next_n::<u16>(2).unwrap().collect();
    assert_eq!(v, vec![1, 2]);
    assert!(cur.next::<u16>().is_err());
    assert_eq!(cur.next::<u8>().unwrap(), 3);
}

#[test]
fn test_at_leaves_cursor_in_place() {
    let path = Path::new("test.bin");
    let buf = [0u8, 0, 0, 0, 7, 0, 0, 0];
    let mut cur = Cur::new(&buf, path);
    assert_eq!(cur.at(4).next::<u32>().unwrap(), 7);
    assert_eq!(cur.pos(), 0);
    assert_eq!(cur.next::<u32>().unwrap(), 0);
    assert!(cur.at(6).next::<u32>().is_err());
    assert!(cur.at(100).next::<u8>().is_err());
    assert!(cur.at(100).next_n::<u32>(0).is_err());
    assert!(cur.at(100).next_n_u8s(0).is_err());
    assert_eq!(cur.at(8).next_n::<u32>(0).unwrap().len(), 0);
    assert_eq!(cur.record_count::<(u16, u8)>(), 2);
}
