mod core;
mod document;
mod host;
pub mod markup;

pub use self::core::{LayoutMetrics, Size};
pub use document::*;
pub use host::*;
