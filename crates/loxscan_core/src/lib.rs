//! loxscan_core: Source position types shared by the loxscan crates.
//!
//! Provides byte spans for tokens and diagnostics, and a line map for
//! turning byte offsets back into line/column positions.

pub mod text;

pub use text::{LineAndColumn, LineMap, TextPos, TextSpan};
