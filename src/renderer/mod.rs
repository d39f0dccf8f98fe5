mod config;
mod container;
mod dom_renderer;
mod error;
mod item;
pub mod layout_utils;
mod rect_style;
mod size_cache;

pub use config::*;
pub use container::{CONTAINER_CLASS_NAME, GROUP_KEY_ATTRIBUTE, MountTarget, OriginalStyle};
pub use dom_renderer::*;
pub use error::*;
pub use item::*;
pub use layout_utils::{create_elements, remove_element, remove_items};
pub use rect_style::*;
pub use size_cache::*;
