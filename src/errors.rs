use std::path::PathBuf;

error_chain! {
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        Json(::json::Error);
    }

    errors {
        MissingFile(path: PathBuf) {
            description("missing file")
            display("failed to open \"{}\"", path.display())
        }
        /// A read wanted `expected` records but only `actual` were left.
        TruncatedData(path: PathBuf, expected: usize, actual: usize) {
            description("truncated data")
            display("\"{}\" is truncated: expected {} records, only {} available",
                path.display(), expected, actual)
        }
        CorruptFormat(path: PathBuf, what: String) {
            description("corrupt or incompatible file")
            display("\"{}\" is corrupt: {}", path.display(), what)
        }
        CapacityExceeded(path: PathBuf, what: &'static str, limit: usize, actual: usize) {
            description("capacity exceeded")
            display("\"{}\": number of {} ({}) exceeds the limit of {}",
                path.display(), what, actual, limit)
        }
        /// Only raised for optional companion files; callers recover from it.
        MissingCompanion(path: PathBuf) {
            description("missing companion file")
            display("companion \"{}\" is missing or incomplete", path.display())
        }
        Config(msg: String) {
            description("bad configuration")
            display("configuration error: {}", msg)
        }
        NotReady {
            description("model cache is not ready")
            display("model cache has not been built")
        }
    }
}

/// `check!(cur, cond)` fails with `CorruptFormat` for the cursor's file when
/// `cond` does not hold.
macro_rules! check {
    ($cur:expr, $b:expr) => {
        if !$b {
            use $crate::errors::Error;
            use $crate::errors::ErrorKind;
            Err(Error::from_kind(ErrorKind::CorruptFormat(
                $cur.path().to_owned(),
                format!("expected: {}", stringify!($b)),
            )))
        } else {
            Ok(())
        }
    };
}
