//! Membership commands and their canonical binary encoding.

pub mod encoding;
pub mod types;

pub use encoding::{CanonicalEncode, CanonicalWriter, ENCODING_VERSION};
pub use types::*;
