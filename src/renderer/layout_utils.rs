//! Element helpers that need no renderer state.

use tracing::{trace, warn};

use super::SharedItem;
use crate::transition::TransitionState;
use crate::view::{DomHost, ElementId};

/// Strips surrounding whitespace and byte order marks from item markup.
pub fn trim_content(content: &str) -> &str {
    content.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

pub fn remove_element(host: &mut dyn DomHost, element: ElementId) {
    let Some(parent) = host.parent(element) else {
        return;
    };
    host.remove_child(parent, element);
}

/// Detaches and releases the elements of `items`. An animation still running
/// on a released element can never complete, so the items go back to idle.
pub fn remove_items(host: &mut dyn DomHost, items: &[SharedItem]) {
    for item in items {
        let mut item = item.borrow_mut();
        item.transition = TransitionState::Idle;
        if let Some(element) = item.element.take() {
            remove_element(host, element);
            host.destroy(element);
        }
    }
}

/// Materializes elements for every item that has none, in one pass over the
/// joined markup. The n-th produced element goes to the n-th element-less
/// item.
pub fn create_elements(host: &mut dyn DomHost, items: &[SharedItem]) {
    let pending: Vec<&SharedItem> = items
        .iter()
        .filter(|item| item.borrow().element.is_none())
        .collect();
    if pending.is_empty() {
        return;
    }
    let markup: String = pending
        .iter()
        .map(|item| trim_content(&item.borrow().content).to_string())
        .collect();
    let elements = host.materialize(&markup);
    if elements.len() < pending.len() {
        warn!(
            items = pending.len(),
            elements = elements.len(),
            "markup produced fewer elements than items"
        );
    }
    trace!(count = elements.len(), "created elements");
    for (item, element) in pending.into_iter().zip(elements) {
        item.borrow_mut().element = Some(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::GridItem;
    use crate::view::Document;

    fn items(contents: &[&str]) -> Vec<SharedItem> {
        contents
            .iter()
            .map(|content| GridItem::new(*content).into_shared())
            .collect()
    }

    #[test]
    fn trim_strips_whitespace_and_bom() {
        assert_eq!(trim_content("\u{feff}  <li>a</li>\n\t"), "<li>a</li>");
    }

    #[test]
    fn creates_one_element_per_item_in_order() {
        let mut doc = Document::new();
        let items = items(&[
            "\u{feff}<li>first</li>",
            "  <li>second</li>  ",
            "\n<li>third</li>\n",
        ]);

        create_elements(&mut doc, &items);

        let texts: Vec<String> = items
            .iter()
            .map(|item| doc.text_content(item.borrow().element.unwrap()))
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn only_items_without_elements_are_filled() {
        let mut doc = Document::new();
        let items = items(&["<li>a</li>", "<li>b</li>", "<li>c</li>"]);
        let existing = doc.create_element("li");
        items[1].borrow_mut().element = Some(existing);

        create_elements(&mut doc, &items);

        assert_eq!(items[1].borrow().element, Some(existing));
        assert_eq!(doc.text_content(items[0].borrow().element.unwrap()), "a");
        assert_eq!(doc.text_content(items[2].borrow().element.unwrap()), "c");
    }

    #[test]
    fn nothing_to_create_is_a_no_op() {
        let mut doc = Document::new();
        create_elements(&mut doc, &[]);

        let items = items(&["<li>a</li>"]);
        let existing = doc.create_element("li");
        items[0].borrow_mut().element = Some(existing);
        create_elements(&mut doc, &items);
        assert_eq!(items[0].borrow().element, Some(existing));
    }

    #[test]
    fn remove_element_without_parent_is_a_no_op() {
        let mut doc = Document::new();
        let orphan = doc.create_element("div");
        remove_element(&mut doc, orphan);
        assert!(doc.contains(orphan));
        assert_eq!(doc.parent(orphan), None);
    }

    #[test]
    fn remove_items_releases_elements_and_resets_animation() {
        let mut doc = Document::new();
        let items = items(&["<li>a</li>", "<li>b</li>"]);
        create_elements(&mut doc, &items);
        let body = doc.body();
        let first = items[0].borrow().element.unwrap();
        doc.append_child(body, first);

        items[0].borrow_mut().transition = TransitionState::Animating;

        remove_items(&mut doc, &items);

        assert!(!doc.contains(first));
        assert!(doc.children(body).is_empty());
        assert!(items.iter().all(|item| item.borrow().element.is_none()));
        assert_eq!(items[0].borrow().transition, TransitionState::Idle);
    }
}
