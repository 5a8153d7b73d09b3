//! Small shared helpers

mod date;
mod url;

pub use date::*;
pub use url::*;
