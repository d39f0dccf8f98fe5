use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace};

use super::container::{GROUP_KEY_ATTRIBUTE, MountTarget, OriginalStyle, mount};
use super::layout_utils::create_elements;
use super::{
    ContainerMode, ItemRect, RectSide, RectStyler, RendererOptions, RendererResult, SharedItem,
    SizeCache,
};
use crate::style::{Length, ParsedValue, Position, PropertyId};
use crate::transition::{settle_stale_transition, start_item_transition};
use crate::view::{DomEvent, DomHost, ElementId, Size, ViewTarget};

/// Snapshot a caller can persist and hand back through
/// [`DomRenderer::set_status`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererStatus {
    /// Inline style text of the container.
    pub css_text: String,
    pub size: SizeCache,
}

/// Applies externally computed rectangles to item elements and tracks the sizes
/// the layout depends on.
#[derive(Debug)]
pub struct DomRenderer {
    options: RendererOptions,
    target: ElementId,
    view: ViewTarget,
    container: ElementId,
    original_style: OriginalStyle,
    size: Rc<Cell<SizeCache>>,
    styler: RectStyler,
}

impl DomRenderer {
    pub fn new(
        host: &mut dyn DomHost,
        target: impl Into<MountTarget>,
        options: RendererOptions,
    ) -> RendererResult<Self> {
        let mount = mount(host, &target.into(), &options)?;
        let size = Rc::new(Cell::new(SizeCache::default()));
        let styler = RectStyler::new(options.horizontal, options.percentage, Rc::clone(&size));
        debug!(
            mount_target = ?mount.target,
            container = ?mount.container,
            mode = ?options.container,
            "renderer mounted"
        );
        let mut renderer = Self {
            options,
            target: mount.target,
            view: mount.view,
            container: mount.container,
            original_style: mount.original_style,
            size,
            styler,
        };
        renderer.resize(host);
        Ok(renderer)
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn view(&self) -> ViewTarget {
        self.view
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn original_style(&self) -> &OriginalStyle {
        &self.original_style
    }

    pub fn size_cache(&self) -> SizeCache {
        self.size.get()
    }

    pub fn view_size(&self) -> f64 {
        self.size.get().view
    }

    pub fn viewport_size(&self) -> f64 {
        self.size.get().viewport
    }

    pub fn container_size(&self) -> f64 {
        self.size.get().container
    }

    pub fn status(&self, host: &dyn DomHost) -> RendererStatus {
        RendererStatus {
            css_text: host.css_text(self.container),
            size: self.size.get(),
        }
    }

    pub fn set_status(&mut self, host: &mut dyn DomHost, status: &RendererStatus) {
        host.set_css_text(self.container, &status.css_text);
        self.size.set(status.size);
    }

    pub fn status_json(&self, host: &dyn DomHost) -> RendererResult<String> {
        Ok(serde_json::to_string(&self.status(host))?)
    }

    pub fn set_status_json(&mut self, host: &mut dyn DomHost, json: &str) -> RendererResult<()> {
        let status: RendererStatus = serde_json::from_str(json)?;
        self.set_status(host, &status);
        Ok(())
    }

    /// Re-measures the viewport. `None` means the container has no size yet and
    /// nothing was updated; otherwise reports whether the viewport changed.
    pub fn resize(&mut self, host: &dyn DomHost) -> Option<bool> {
        let measured = self.measure_viewport(host);
        if measured == 0.0 {
            debug!("viewport not measurable yet");
            return None;
        }
        let mut size = self.size.get();
        let changed = measured != size.viewport;
        if changed {
            size = SizeCache::for_viewport(measured);
        }
        let view = host.client_size(self.view);
        size.view = if self.options.horizontal {
            view.width
        } else {
            view.height
        };
        self.size.set(size);
        debug!(viewport = measured, view = size.view, changed, "resize");
        Some(changed)
    }

    pub fn is_needed_resize(&self, host: &dyn DomHost) -> bool {
        self.measure_viewport(host) != self.size.get().viewport
    }

    pub fn set_container_size(&mut self, host: &mut dyn DomHost, size: f64) {
        let mut cache = self.size.get();
        cache.container = size;
        self.size.set(cache);
        host.set_style(
            self.container,
            self.main_extent(),
            Some(ParsedValue::Length(Length::px(size))),
        );
    }

    /// Writes the authoritative size of every item that has an element.
    pub fn update_size<'a>(&mut self, host: &dyn DomHost, items: &'a [SharedItem]) -> &'a [SharedItem] {
        let RendererOptions {
            is_equal_size,
            is_constant_size,
            ..
        } = self.options;
        let mut cache = self.size.get();

        for item in items {
            let mut item = item.borrow_mut();
            let Some(element) = item.element else {
                continue;
            };
            if is_equal_size && cache.item.is_none() {
                cache.item = Some(self.measure_item(host, element));
            }
            let size = match cache.item.filter(|_| is_equal_size) {
                Some(shared) => shared,
                None => match item.org_size.filter(|org| is_constant_size && org.width != 0.0) {
                    Some(org_size) => org_size,
                    None => self.measure_item(host, element),
                },
            };
            item.size = Some(size);
            if item.org_size.is_none_or(Size::is_degenerate) {
                item.org_size = Some(size);
            }
        }

        self.size.set(cache);
        items
    }

    pub fn create_and_insert(&mut self, host: &mut dyn DomHost, items: &[SharedItem], append: bool) {
        create_elements(host, items);
        self.render_items(host, items, None);
        self.insert(host, items, append);
    }

    pub fn render_items(
        &self,
        host: &mut dyn DomHost,
        items: &[SharedItem],
        transition_duration: Option<Duration>,
    ) {
        for item in items {
            let rect = item.borrow().rect;
            self.render_item(host, item, rect, transition_duration);
        }
    }

    pub fn render_item(
        &self,
        host: &mut dyn DomHost,
        item: &SharedItem,
        rect: ItemRect,
        transition_duration: Option<Duration>,
    ) {
        let (element, prev_rect, group_key) = {
            let item = item.borrow();
            let Some(element) = item.element else {
                return;
            };
            (element, item.prev_rect, item.group_key.clone())
        };
        trace!(?element, ?rect, "render item");

        host.set_attribute(element, GROUP_KEY_ATTRIBUTE, &group_key);
        host.set_style(
            element,
            PropertyId::Position,
            Some(ParsedValue::Position(Position::Absolute)),
        );
        self.styler.apply(host, element, &RectSide::SIZE, &rect);
        settle_stale_transition(host, item, element);

        let duration = transition_duration.filter(|duration| !duration.is_zero());
        match (duration, prev_rect) {
            (Some(duration), Some(prev_rect)) if host.supports_transition() => {
                start_item_transition(host, item, element, &rect, &prev_rect, duration, &self.styler);
            }
            _ => {
                self.styler.apply(host, element, &RectSide::POSITION, &rect);
                item.borrow_mut().prev_rect = Some(rect);
            }
        }
    }

    /// Removes every child of the container and forgets all measurements.
    /// Children stay alive for their items; pending transition completions on
    /// them are dropped.
    pub fn clear(&mut self, host: &mut dyn DomHost) {
        for child in host.children(self.container) {
            host.remove_listeners(child, DomEvent::TransitionEnd);
        }
        host.clear_children(self.container);
        host.set_style(self.container, self.main_extent(), None);
        self.size.set(SizeCache::default());
        debug!(container = ?self.container, "cleared");
    }

    /// Clears, restores the mount target's original inline styles and releases
    /// an injected container.
    pub fn destroy(mut self, host: &mut dyn DomHost) {
        self.clear(host);
        self.original_style.restore(host, self.target);
        if self.options.container == ContainerMode::Scroll {
            host.destroy(self.container);
        }
        debug!(mount_target = ?self.target, "destroyed");
    }

    /// Moves the elements of `items` into the container with a single
    /// insertion.
    fn insert(&self, host: &mut dyn DomHost, items: &[SharedItem], append: bool) {
        let fragment = host.create_fragment();
        for item in items {
            let Some(element) = item.borrow().element else {
                continue;
            };
            if append {
                host.append_child(fragment, element);
            } else {
                let first = host.first_child(fragment);
                host.insert_before(fragment, element, first);
            }
        }
        if append {
            host.append_child(self.container, fragment);
        } else {
            let first = host.first_child(self.container);
            host.insert_before(self.container, fragment, first);
        }
        host.destroy(fragment);
    }

    fn measure_viewport(&self, host: &dyn DomHost) -> f64 {
        let client = host.client_size(ViewTarget::Element(self.container));
        if self.options.horizontal {
            client.height
        } else {
            client.width
        }
    }

    fn measure_item(&self, host: &dyn DomHost, element: ElementId) -> Size {
        if self.options.use_offset {
            host.offset_size(element)
        } else {
            host.bounding_size(element)
        }
    }

    /// Container extent along the scroll direction.
    fn main_extent(&self) -> PropertyId {
        if self.options.horizontal {
            PropertyId::Width
        } else {
            PropertyId::Height
        }
    }
}
