use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

use super::TransitionState;
use crate::renderer::{ItemRect, RectSide, RectStyler, SharedItem};
use crate::style::{ParsedValue, PropertyId};
use crate::view::{DomEvent, DomHost, ElementId};

pub fn transitioned_properties() -> Vec<PropertyId> {
    vec![PropertyId::Transform, PropertyId::Width, PropertyId::Height]
}

pub fn remove_transition(host: &mut dyn DomHost, element: ElementId) {
    host.set_style(element, PropertyId::TransitionProperty, None);
    host.set_style(element, PropertyId::TransitionDuration, None);
    host.set_style(element, PropertyId::Transform, None);
}

/// Writes transition styling that carries the element from `prev_rect` to
/// `rect`. The element still sits at `prev_rect`, so the translation is the
/// distance left to travel.
///
/// A missing or zero duration clears any previous transition styling. Returns
/// `false` when nothing will animate.
pub fn set_transition(
    host: &mut dyn DomHost,
    element: ElementId,
    duration: Option<Duration>,
    rect: &ItemRect,
    prev_rect: &ItemRect,
) -> bool {
    let Some(duration) = duration.filter(|duration| !duration.is_zero()) else {
        remove_transition(host, element);
        return false;
    };
    if rect.same_position(prev_rect) {
        return false;
    }
    let dx = rect.left.unwrap_or(0.0) - prev_rect.left.unwrap_or(0.0);
    let dy = rect.top.unwrap_or(0.0) - prev_rect.top.unwrap_or(0.0);
    host.set_style(
        element,
        PropertyId::TransitionProperty,
        Some(ParsedValue::Properties(transitioned_properties())),
    );
    host.set_style(
        element,
        PropertyId::TransitionDuration,
        Some(ParsedValue::Seconds(duration.as_secs_f64())),
    );
    host.set_style(element, PropertyId::Transform, Some(ParsedValue::Translate(dx, dy)));
    true
}

/// Moves the item's element from `prev_rect` toward `rect` and arms a one-shot
/// completion handler. While the item is animating further calls are dropped;
/// the completion commits whatever `item.rect` holds when it runs.
pub fn start_item_transition(
    host: &mut dyn DomHost,
    item: &SharedItem,
    element: ElementId,
    rect: &ItemRect,
    prev_rect: &ItemRect,
    duration: Duration,
    styler: &RectStyler,
) -> bool {
    if item.borrow().transition.is_animating() {
        trace!(?element, "transition in flight, render coalesced");
        return false;
    }
    if !set_transition(host, element, Some(duration), rect, prev_rect) {
        return false;
    }
    item.borrow_mut().transition = TransitionState::Animating;
    trace!(?element, ?duration, "transition armed");

    let item = Rc::clone(item);
    let styler = styler.clone();
    host.add_once_listener(
        element,
        DomEvent::TransitionEnd,
        Box::new(move |host: &mut dyn DomHost| finish_item_transition(host, &item, element, &styler)),
    );
    true
}

/// Returns an item to idle when its element lost the pending completion
/// handler, e.g. because the element was cleared out of the container. Any
/// transition styling left behind is removed.
pub fn settle_stale_transition(host: &mut dyn DomHost, item: &SharedItem, element: ElementId) {
    if !item.borrow().transition.is_animating()
        || host.has_listener(element, DomEvent::TransitionEnd)
    {
        return;
    }
    remove_transition(host, element);
    item.borrow_mut().transition = TransitionState::Idle;
    trace!(?element, "stale transition dropped");
}

fn finish_item_transition(
    host: &mut dyn DomHost,
    item: &SharedItem,
    element: ElementId,
    styler: &RectStyler,
) {
    let mut item = item.borrow_mut();
    let rect = item.rect;
    remove_transition(host, element);
    styler.apply(host, element, &RectSide::POSITION, &rect);
    item.prev_rect = Some(rect);
    item.transition = TransitionState::Idle;
    trace!(?element, "transition finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{GridItem, PercentageFlags, SizeCache};
    use crate::view::Document;
    use std::cell::Cell;

    fn attached(doc: &mut Document) -> ElementId {
        let element = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, element);
        element
    }

    fn pixel_styler() -> RectStyler {
        RectStyler::new(
            false,
            PercentageFlags::empty(),
            Rc::new(Cell::new(SizeCache::for_viewport(300.0))),
        )
    }

    #[test]
    fn identical_positions_never_transition() {
        let mut doc = Document::new();
        let element = attached(&mut doc);

        let started = set_transition(
            &mut doc,
            element,
            Some(Duration::from_secs(1)),
            &ItemRect::new(10.0, 20.0, 50.0, 50.0),
            &ItemRect::new(10.0, 20.0, 80.0, 80.0),
        );

        assert!(!started);
        assert_eq!(doc.css_text(element), "");
    }

    #[test]
    fn zero_duration_clears_previous_transition_styling() {
        let mut doc = Document::new();
        let element = attached(&mut doc);
        let rect = ItemRect::position(100.0, 0.0);
        let prev = ItemRect::position(0.0, 0.0);

        assert!(set_transition(&mut doc, element, Some(Duration::from_millis(300)), &rect, &prev));
        assert_eq!(
            doc.style_value(element, "transition-property").as_deref(),
            Some("transform,width,height")
        );
        assert_eq!(doc.style_value(element, "transition-duration").as_deref(), Some("0.3s"));
        assert_eq!(
            doc.style_value(element, "transform").as_deref(),
            Some("translate(100px,0px)")
        );

        assert!(!set_transition(&mut doc, element, Some(Duration::ZERO), &rect, &prev));
        assert_eq!(doc.css_text(element), "");
    }

    #[test]
    fn completion_commits_the_rect_current_at_completion() {
        let mut doc = Document::new();
        let element = attached(&mut doc);
        let item = GridItem::new("<div></div>")
            .with_rect(ItemRect::position(40.0, 40.0))
            .into_shared();
        item.borrow_mut().element = Some(element);
        let styler = pixel_styler();
        let prev = ItemRect::position(0.0, 0.0);

        assert!(start_item_transition(
            &mut doc,
            &item,
            element,
            &ItemRect::position(40.0, 40.0),
            &prev,
            Duration::from_millis(200),
            &styler,
        ));
        // A second request while animating is coalesced.
        item.borrow_mut().rect = ItemRect::position(90.0, 10.0);
        assert!(!start_item_transition(
            &mut doc,
            &item,
            element,
            &ItemRect::position(90.0, 10.0),
            &prev,
            Duration::from_millis(200),
            &styler,
        ));

        assert_eq!(doc.dispatch_event(element, DomEvent::TransitionEnd), 1);

        let item = item.borrow();
        assert_eq!(item.prev_rect, Some(ItemRect::position(90.0, 10.0)));
        assert_eq!(item.transition, TransitionState::Idle);
        assert_eq!(doc.style_value(element, "left").as_deref(), Some("90px"));
        assert_eq!(doc.style_value(element, "transform"), None);
    }

    #[test]
    fn dropped_completion_releases_the_item() {
        let mut doc = Document::new();
        let element = attached(&mut doc);
        let item = GridItem::new("<div></div>").into_shared();
        item.borrow_mut().element = Some(element);
        let styler = pixel_styler();

        assert!(start_item_transition(
            &mut doc,
            &item,
            element,
            &ItemRect::position(0.0, 50.0),
            &ItemRect::position(0.0, 0.0),
            Duration::from_millis(200),
            &styler,
        ));
        settle_stale_transition(&mut doc, &item, element);
        assert!(item.borrow().transition.is_animating());

        doc.remove_listeners(element, DomEvent::TransitionEnd);
        settle_stale_transition(&mut doc, &item, element);

        assert_eq!(item.borrow().transition, TransitionState::Idle);
        assert_eq!(doc.css_text(element), "");
    }
}
