//! The `fields!` macro, for reading a run of packed fields off a `Cur`.
//!
//! ```ignore
//! fields!(cur, fac_body {
//!     num_triangles: u32,
//!     triangles: [Triangle; num_triangles],
//!     end: Cur,
//! });
//! ```
//!
//! Each field becomes a local binding. `[T; n]` reads `n` records into a
//! `View` (`n` may name an earlier field), `Cur` binds a copy of the cursor
//! at that point without consuming anything. Every field read is traced
//! along with the file and offset it came from.

macro_rules! field_helper2 {
    ($cur:ident, [u8; $n:expr]) => { $cur.next_n_u8s($n as usize)? };
    ($cur:ident, [$t:ty; $n:expr]) => { $cur.next_n::<$t>($n as usize)? };
    ($cur:ident, Cur) => { $cur.clone() };
    ($cur:ident, $t:ty) => { $cur.next::<$t>()? };
}

macro_rules! field_helper {
    ($c:ident, $name:ident, $field:ident, Cur) => {
        let $field = field_helper2!($c, Cur);
    };
    ($c:ident, $name:ident, $field:ident, $ty:tt) => {
        let pos = $c.pos();
        let $field = field_helper2!($c, $ty);
        trace!("{}: {}.{}@{:#x}: {:?}",
            $c.path().display(),
            stringify!($name),
            stringify!($field),
            pos,
            $field,
        );
    }
}

macro_rules! fields {
    ($cur:expr, $name:ident { $($field:ident : $ty:tt,)* }) => {
        let mut c = $cur;
        $(field_helper!(c, $name, $field, $ty);)*
    };
    ($cur:ident, $name:ident { $($field:ident : $ty:tt),* }) => {
        fields!($cur, $name { $($field : $ty,)* });
    };
}
