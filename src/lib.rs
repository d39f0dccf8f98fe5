//! Realizes externally computed grid layouts on a retained element tree.
//!
//! A layout engine assigns a target [`ItemRect`] to every [`GridItem`]; the
//! [`DomRenderer`] materializes the item elements, measures them, writes the
//! rectangles as pixel or viewport-relative lengths and animates moves. The
//! tree itself sits behind [`DomHost`], with [`Document`] as the in-memory
//! host.

pub mod renderer;
pub mod style;
pub mod transition;
pub mod view;

pub use renderer::*;
pub use style::*;
pub use transition::*;
pub use view::*;
