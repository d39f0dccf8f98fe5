use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ElementId;
use crate::style::{InlineStyle, Position};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size with a zero side cannot be trusted as a measurement.
    pub fn is_degenerate(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Layout results the host reports for one element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    pub client: Size,
    pub offset: Size,
    pub bounding: Size,
}

impl LayoutMetrics {
    /// Metrics of a borderless, unscrolled box laid out at `size`.
    pub fn uniform(size: Size) -> Self {
        Self {
            client: size,
            offset: Size::new(size.width.round(), size.height.round()),
            bounding: size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Element,
    Fragment,
}

#[derive(Clone, Debug)]
pub(crate) struct ElementCore {
    pub kind: NodeKind,
    pub tag: SmolStr,
    pub attributes: Vec<(SmolStr, String)>,
    pub text: String,
    pub style: InlineStyle,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub metrics: LayoutMetrics,
    pub sheet_position: Position,
}

impl ElementCore {
    pub fn element(tag: &str) -> Self {
        Self::with_kind(NodeKind::Element, tag)
    }

    pub fn fragment() -> Self {
        Self::with_kind(NodeKind::Fragment, "#document-fragment")
    }

    fn with_kind(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            attributes: Vec::new(),
            text: String::new(),
            style: InlineStyle::new(),
            parent: None,
            children: Vec::new(),
            metrics: LayoutMetrics::default(),
            sheet_position: Position::Static,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => {
                slot.clear();
                slot.push_str(value);
            }
            None => self.attributes.push((SmolStr::new(name), value.to_string())),
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }
}
