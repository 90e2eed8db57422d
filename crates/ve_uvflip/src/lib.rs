//! Flips the V axis of texture coordinates in Wavefront `.obj` models, in place.
//!
//! Models authored with the texture origin in the bottom left corner end up upside down in
//! renderers which put it in the top left corner (and vice versa). Every `vt` line gets its V
//! component replaced by `1.0 - v`; all other lines are left untouched.

pub mod mesh;
pub mod utils;

pub use mesh::obj::{
    flip, flip_text, parse_meta, process, FlipError, FlipReport, Layout, MetaOverrides, ObjMeta,
    RecordError,
};
