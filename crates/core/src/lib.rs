//! Domain types shared by the quiz store crates.

pub mod domain;
