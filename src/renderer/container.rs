use tracing::debug;

use super::{ContainerMode, RendererError, RendererOptions, RendererResult};
use crate::style::{Length, Overflow, ParsedValue, Position, PropertyId};
use crate::view::{DomHost, ElementId, ViewTarget};

pub const CONTAINER_CLASS_NAME: &str = "infinitegrid-container";
pub const GROUP_KEY_ATTRIBUTE: &str = "data-groupkey";

/// Where a renderer mounts: an element handle or a `#id` / `.class` / tag
/// selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MountTarget {
    Element(ElementId),
    Selector(String),
}

impl From<ElementId> for MountTarget {
    fn from(value: ElementId) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for MountTarget {
    fn from(value: &str) -> Self {
        Self::Selector(value.to_string())
    }
}

impl From<String> for MountTarget {
    fn from(value: String) -> Self {
        Self::Selector(value)
    }
}

impl MountTarget {
    pub fn resolve(&self, host: &dyn DomHost) -> RendererResult<ElementId> {
        match self {
            Self::Element(element) if host.contains(*element) => Ok(*element),
            Self::Element(_) => Err(RendererError::UnknownElement),
            Self::Selector(selector) => host
                .query_selector(None, selector)
                .ok_or_else(|| RendererError::TargetNotFound(selector.clone())),
        }
    }
}

/// Inline values the renderer overwrote on the mount target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OriginalStyle {
    entries: Vec<(PropertyId, Option<ParsedValue>)>,
}

impl OriginalStyle {
    fn remember(&mut self, host: &dyn DomHost, element: ElementId, property: PropertyId) {
        let value = host.style(element, &property);
        self.entries.push((property, value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn restore(&self, host: &mut dyn DomHost, element: ElementId) {
        for (property, value) in &self.entries {
            host.set_style(element, property.clone(), value.clone());
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Mount {
    pub target: ElementId,
    pub view: ViewTarget,
    pub container: ElementId,
    pub original_style: OriginalStyle,
}

pub(crate) fn mount(
    host: &mut dyn DomHost,
    target: &MountTarget,
    options: &RendererOptions,
) -> RendererResult<Mount> {
    let element = target.resolve(host)?;
    let mut original_style = OriginalStyle::default();

    if host.computed_position(element) == Position::Static {
        original_style.remember(host, element, PropertyId::Position);
        host.set_style(
            element,
            PropertyId::Position,
            Some(ParsedValue::Position(Position::Relative)),
        );
    }

    let (view, container) = match options.container {
        ContainerMode::None => (ViewTarget::Window, element),
        mode => {
            let (scroll, hidden) = if options.horizontal {
                (PropertyId::OverflowX, PropertyId::OverflowY)
            } else {
                (PropertyId::OverflowY, PropertyId::OverflowX)
            };
            original_style.remember(host, element, PropertyId::OverflowX);
            original_style.remember(host, element, PropertyId::OverflowY);
            host.set_style(element, scroll, Some(ParsedValue::Overflow(Overflow::Scroll)));
            host.set_style(element, hidden, Some(ParsedValue::Overflow(Overflow::Hidden)));

            let container = match mode {
                ContainerMode::External(container) => container,
                _ => create_container(host, element),
            };
            (ViewTarget::Element(element), container)
        }
    };

    Ok(Mount {
        target: element,
        view,
        container,
        original_style,
    })
}

/// Reuses a pre-rendered container under `element` or wraps the current
/// children of `element` into a new one.
fn create_container(host: &mut dyn DomHost, element: ElementId) -> ElementId {
    if let Some(container) = host.query_selector(Some(element), &format!(".{CONTAINER_CLASS_NAME}")) {
        debug!(?container, "reusing pre-rendered container");
        reset_container_style(host, container);
        return container;
    }

    let container = host.create_element("div");
    host.set_attribute(container, "class", CONTAINER_CLASS_NAME);
    reset_container_style(host, container);
    for child in host.children(element) {
        host.append_child(container, child);
    }
    host.append_child(element, container);
    debug!(?container, "created container");
    container
}

fn reset_container_style(host: &mut dyn DomHost, container: ElementId) {
    host.set_style(
        container,
        PropertyId::Position,
        Some(ParsedValue::Position(Position::Relative)),
    );
    host.set_style(
        container,
        PropertyId::Height,
        Some(ParsedValue::Length(Length::percent(100.0))),
    );
}
