//! Well-known configuration paths.

pub mod xdg_root;
