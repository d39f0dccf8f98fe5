use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::fmt;

use super::core::{ElementCore, NodeKind};
use super::markup::{MarkupNode, parse_fragment};
use super::{DomEvent, DomHost, ElementId, LayoutMetrics, OnceHandler, Size, ViewTarget};
use crate::style::{InlineStyle, ParsedValue, Position, PropertyId};

/// Retained, in-memory element tree.
///
/// Layout is not computed here: the embedding host reports sizes through
/// [`Document::set_metrics`] and [`Document::set_window_size`], and delivers
/// platform events through [`Document::dispatch_event`].
pub struct Document {
    nodes: SlotMap<ElementId, ElementCore>,
    body: ElementId,
    window: Size,
    listeners: FxHashMap<(ElementId, DomEvent), Vec<OnceHandler>>,
    insertions: usize,
    transitions_supported: bool,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("window", &self.window)
            .field("listeners", &self.listeners.len())
            .field("insertions", &self.insertions)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(ElementCore::element("body"));
        Self {
            nodes,
            body,
            window: Size::default(),
            listeners: FxHashMap::default(),
            insertions: 0,
            transitions_supported: true,
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn set_window_size(&mut self, size: Size) {
        self.window = size;
    }

    pub fn set_metrics(&mut self, element: ElementId, metrics: LayoutMetrics) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.metrics = metrics;
        }
    }

    pub fn set_layout_size(&mut self, element: ElementId, size: Size) {
        self.set_metrics(element, LayoutMetrics::uniform(size));
    }

    /// Position an element gets from stylesheets when its inline style does
    /// not override it.
    pub fn set_sheet_position(&mut self, element: ElementId, position: Position) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.sheet_position = position;
        }
    }

    pub fn set_transitions_supported(&mut self, supported: bool) {
        self.transitions_supported = supported;
    }

    /// Number of insertions made into the attached tree so far. A fragment
    /// insertion counts once no matter how many children it carries.
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    pub fn is_connected(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        false
    }

    pub fn text_content(&self, element: ElementId) -> String {
        let Some(node) = self.nodes.get(element) else {
            return String::new();
        };
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    /// Serialized value of one inline style property, e.g. `"25%"`.
    pub fn style_value(&self, element: ElementId, property: &str) -> Option<String> {
        self.style(element, &PropertyId::parse(property))
            .map(|value| value.to_string())
    }

    /// Live nodes, the body included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Delivers `event` to `element`, running and dropping every once-handler
    /// registered for it. Detached elements never receive events, so their
    /// handlers stay inert. Returns the number of handlers run.
    pub fn dispatch_event(&mut self, element: ElementId, event: DomEvent) -> usize {
        if !self.is_connected(element) {
            return 0;
        }
        let Some(handlers) = self.listeners.remove(&(element, event)) else {
            return 0;
        };
        let count = handlers.len();
        let host: &mut dyn DomHost = self;
        for handler in handlers {
            handler(&mut *host);
        }
        count
    }

    fn import(&mut self, markup: &MarkupNode) -> ElementId {
        let id = self.nodes.insert(ElementCore::element(&markup.tag));
        for (name, value) in &markup.attributes {
            self.set_attribute(id, name, value);
        }
        self.nodes[id].text.push_str(&markup.text);
        for child in &markup.children {
            let child_id = self.import(child);
            self.attach(id, child_id, None);
        }
        id
    }

    fn detach(&mut self, child: ElementId) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|id| *id != child);
        }
    }

    fn attach(&mut self, parent: ElementId, child: ElementId, reference: Option<ElementId>) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) || parent == child {
            return;
        }
        let moved = match self.nodes[child].kind {
            NodeKind::Fragment => std::mem::take(&mut self.nodes[child].children),
            NodeKind::Element => {
                self.detach(child);
                vec![child]
            }
        };
        if moved.is_empty() {
            return;
        }
        for id in &moved {
            self.nodes[*id].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent].children;
        let at = reference
            .and_then(|reference| siblings.iter().position(|id| *id == reference))
            .unwrap_or(siblings.len());
        siblings.splice(at..at, moved);
        if self.is_connected(parent) {
            self.insertions += 1;
        }
    }

    fn matches(&self, element: ElementId, selector: &str) -> bool {
        let Some(node) = self.nodes.get(element) else {
            return false;
        };
        if let Some(id) = selector.strip_prefix('#') {
            node.attribute("id") == Some(id)
        } else if let Some(class_name) = selector.strip_prefix('.') {
            node.has_class(class_name)
        } else {
            node.tag.eq_ignore_ascii_case(selector)
        }
    }

    fn find_descendant(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        for child in &self.nodes.get(scope)?.children {
            if self.matches(*child, selector) {
                return Some(*child);
            }
            if let Some(found) = self.find_descendant(*child, selector) {
                return Some(found);
            }
        }
        None
    }
}

impl DomHost for Document {
    fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(element)
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(ElementCore::element(tag))
    }

    fn create_fragment(&mut self) -> ElementId {
        self.nodes.insert(ElementCore::fragment())
    }

    fn materialize(&mut self, markup: &str) -> Vec<ElementId> {
        parse_fragment(markup)
            .iter()
            .map(|node| self.import(node))
            .collect()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element).and_then(|node| node.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.attach(parent, child, None);
    }

    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: Option<ElementId>) {
        self.attach(parent, child, reference);
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn clear_children(&mut self, element: ElementId) {
        for child in self.children(element) {
            self.detach(child);
        }
    }

    fn destroy(&mut self, element: ElementId) {
        if element == self.body || !self.nodes.contains_key(element) {
            return;
        }
        self.detach(element);
        let mut pending = vec![element];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id) {
                pending.extend(node.children);
            }
        }
        let nodes = &self.nodes;
        self.listeners.retain(|(id, _), _| nodes.contains_key(*id));
    }

    fn query_selector(&self, scope: Option<ElementId>, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        self.find_descendant(scope.unwrap_or(self.body), selector)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.nodes.get(element)?;
        if name == "style" {
            return (!node.style.is_empty()).then(|| node.style.css_text());
        }
        node.attribute(name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(element) else {
            return;
        };
        if name == "style" {
            node.style = InlineStyle::parse_css_text(value);
        } else {
            node.set_attribute(name, value);
        }
    }

    fn style(&self, element: ElementId, property: &PropertyId) -> Option<ParsedValue> {
        self.nodes.get(element)?.style.get(property).cloned()
    }

    fn set_style(&mut self, element: ElementId, property: PropertyId, value: Option<ParsedValue>) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.style.set(property, value);
        }
    }

    fn css_text(&self, element: ElementId) -> String {
        self.nodes
            .get(element)
            .map(|node| node.style.css_text())
            .unwrap_or_default()
    }

    fn set_css_text(&mut self, element: ElementId, css_text: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.style = InlineStyle::parse_css_text(css_text);
        }
    }

    fn computed_position(&self, element: ElementId) -> Position {
        let Some(node) = self.nodes.get(element) else {
            return Position::Static;
        };
        match node.style.get(&PropertyId::Position) {
            Some(ParsedValue::Position(position)) => *position,
            _ => node.sheet_position,
        }
    }

    fn client_size(&self, target: ViewTarget) -> Size {
        match target {
            ViewTarget::Window => self.window,
            ViewTarget::Element(element) => self
                .nodes
                .get(element)
                .map(|node| node.metrics.client)
                .unwrap_or_default(),
        }
    }

    fn offset_size(&self, element: ElementId) -> Size {
        self.nodes
            .get(element)
            .map(|node| node.metrics.offset)
            .unwrap_or_default()
    }

    fn bounding_size(&self, element: ElementId) -> Size {
        self.nodes
            .get(element)
            .map(|node| node.metrics.bounding)
            .unwrap_or_default()
    }

    fn supports_transition(&self) -> bool {
        self.transitions_supported
    }

    fn add_once_listener(&mut self, element: ElementId, event: DomEvent, handler: OnceHandler) {
        self.listeners
            .entry((element, event))
            .or_default()
            .push(handler);
    }

    fn has_listener(&self, element: ElementId, event: DomEvent) -> bool {
        self.listeners
            .get(&(element, event))
            .is_some_and(|handlers| !handlers.is_empty())
    }

    fn remove_listeners(&mut self, element: ElementId, event: DomEvent) {
        self.listeners.remove(&(element, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn attached(doc: &mut Document, tag: &str) -> ElementId {
        let element = doc.create_element(tag);
        let body = doc.body();
        doc.append_child(body, element);
        element
    }

    #[test]
    fn materialize_builds_detached_top_level_elements() {
        let mut doc = Document::new();
        let elements = doc.materialize(
            r#"<div class="card" style="width: 20px">a</div><div id="b"><p>b</p></div>"#,
        );

        assert_eq!(elements.len(), 2);
        assert_eq!(doc.parent(elements[0]), None);
        assert_eq!(doc.style_value(elements[0], "width").as_deref(), Some("20px"));
        assert_eq!(doc.text_content(elements[1]), "b");
        assert_eq!(doc.query_selector(None, "#b"), None);
    }

    #[test]
    fn fragment_insertion_counts_once() {
        let mut doc = Document::new();
        let list = attached(&mut doc, "ul");
        let before = doc.insertions();

        let fragment = doc.create_fragment();
        let items: Vec<_> = (0..3).map(|_| doc.create_element("li")).collect();
        for item in &items {
            doc.append_child(fragment, *item);
        }
        doc.append_child(list, fragment);

        assert_eq!(doc.insertions(), before + 1);
        assert_eq!(doc.children(list), items);
        assert!(doc.children(fragment).is_empty());
    }

    #[test]
    fn insert_before_moves_an_attached_child() {
        let mut doc = Document::new();
        let list = attached(&mut doc, "ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        doc.append_child(list, a);
        doc.append_child(list, b);

        doc.insert_before(list, b, Some(a));

        assert_eq!(doc.children(list), vec![b, a]);
    }

    #[test]
    fn once_listener_fires_a_single_time() {
        let mut doc = Document::new();
        let element = attached(&mut doc, "div");
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        doc.add_once_listener(
            element,
            DomEvent::TransitionEnd,
            Box::new(move |_: &mut dyn DomHost| counter.set(counter.get() + 1)),
        );

        assert_eq!(doc.dispatch_event(element, DomEvent::TransitionEnd), 1);
        assert_eq!(doc.dispatch_event(element, DomEvent::TransitionEnd), 0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn detached_elements_do_not_receive_events() {
        let mut doc = Document::new();
        let element = attached(&mut doc, "div");
        doc.add_once_listener(element, DomEvent::TransitionEnd, Box::new(|_: &mut dyn DomHost| {}));
        let body = doc.body();
        doc.remove_child(body, element);

        assert_eq!(doc.dispatch_event(element, DomEvent::TransitionEnd), 0);
        assert!(doc.has_listener(element, DomEvent::TransitionEnd));
    }

    #[test]
    fn destroy_frees_the_subtree_and_its_listeners() {
        let mut doc = Document::new();
        let list = attached(&mut doc, "ul");
        let item = doc.create_element("li");
        let label = doc.create_element("span");
        doc.append_child(item, label);
        doc.append_child(list, item);
        doc.add_once_listener(label, DomEvent::TransitionEnd, Box::new(|_: &mut dyn DomHost| {}));

        doc.destroy(item);

        assert!(doc.children(list).is_empty());
        assert!(!doc.contains(item));
        assert!(!doc.contains(label));
        assert!(!doc.has_listener(label, DomEvent::TransitionEnd));
        assert_eq!(doc.node_count(), 2);

        let body = doc.body();
        doc.destroy(body);
        assert!(doc.contains(body));
    }

    #[test]
    fn removed_listeners_never_run() {
        let mut doc = Document::new();
        let element = attached(&mut doc, "div");
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        doc.add_once_listener(
            element,
            DomEvent::TransitionEnd,
            Box::new(move |_: &mut dyn DomHost| flag.set(true)),
        );

        doc.remove_listeners(element, DomEvent::TransitionEnd);

        assert_eq!(doc.dispatch_event(element, DomEvent::TransitionEnd), 0);
        assert!(!fired.get());
    }

    #[test]
    fn computed_position_prefers_inline_style() {
        let mut doc = Document::new();
        let element = attached(&mut doc, "div");
        assert_eq!(doc.computed_position(element), Position::Static);

        doc.set_sheet_position(element, Position::Fixed);
        assert_eq!(doc.computed_position(element), Position::Fixed);

        doc.set_css_text(element, "position: relative;");
        assert_eq!(doc.computed_position(element), Position::Relative);
    }
}
