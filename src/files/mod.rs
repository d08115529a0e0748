//! Backend file representation → canonical flat file map.

mod normalize;

pub use normalize::{
    canonical_path, is_reserved_path, normalize_files, DEFAULT_RESERVED_SEGMENTS,
};
