use slotmap::new_key_type;

use super::Size;
use crate::style::{ParsedValue, Position, PropertyId};

new_key_type! {
    pub struct ElementId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomEvent {
    TransitionEnd,
}

/// Surface whose client size bounds what is visible: either an element or the
/// outer window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewTarget {
    Window,
    Element(ElementId),
}

pub type OnceHandler = Box<dyn FnOnce(&mut dyn DomHost)>;

/// The element tree a renderer draws into.
///
/// Every mutation goes through this trait so the renderer stays independent of
/// the platform that owns the tree. [`crate::Document`] is the in-memory
/// implementation.
pub trait DomHost {
    fn contains(&self, element: ElementId) -> bool;

    fn create_element(&mut self, tag: &str) -> ElementId;

    fn create_fragment(&mut self) -> ElementId;

    /// Builds detached elements from `markup` and returns its top-level
    /// elements in document order.
    fn materialize(&mut self, markup: &str) -> Vec<ElementId>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn children(&self, element: ElementId) -> Vec<ElementId>;

    fn first_child(&self, element: ElementId) -> Option<ElementId> {
        self.children(element).first().copied()
    }

    /// Appends `child`, detaching it from its current parent first. Appending a
    /// fragment moves the fragment's children instead.
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: Option<ElementId>);

    fn remove_child(&mut self, parent: ElementId, child: ElementId);

    fn clear_children(&mut self, element: ElementId);

    /// Detaches `element` and releases it together with its subtree and any
    /// pending listeners. The handle is dead afterwards.
    fn destroy(&mut self, element: ElementId);

    /// Finds the first descendant of `scope` (or of the whole tree) matching a
    /// `#id`, `.class` or tag selector.
    fn query_selector(&self, scope: Option<ElementId>, selector: &str) -> Option<ElementId>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn style(&self, element: ElementId, property: &PropertyId) -> Option<ParsedValue>;

    fn set_style(&mut self, element: ElementId, property: PropertyId, value: Option<ParsedValue>);

    fn css_text(&self, element: ElementId) -> String;

    fn set_css_text(&mut self, element: ElementId, css_text: &str);

    fn computed_position(&self, element: ElementId) -> Position;

    fn client_size(&self, target: ViewTarget) -> Size;

    fn offset_size(&self, element: ElementId) -> Size;

    fn bounding_size(&self, element: ElementId) -> Size;

    fn supports_transition(&self) -> bool {
        true
    }

    /// Registers `handler` to run the next time `event` reaches `element`; it is
    /// dropped after that single call.
    fn add_once_listener(&mut self, element: ElementId, event: DomEvent, handler: OnceHandler);

    fn has_listener(&self, element: ElementId, event: DomEvent) -> bool;

    /// Drops pending handlers without running them.
    fn remove_listeners(&mut self, element: ElementId, event: DomEvent);
}
