use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::style::PropertyId;
use crate::transition::TransitionState;
use crate::view::{ElementId, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RectSide {
    Left,
    Top,
    Width,
    Height,
}

impl RectSide {
    pub const SIZE: [RectSide; 2] = [RectSide::Width, RectSide::Height];
    pub const POSITION: [RectSide; 2] = [RectSide::Left, RectSide::Top];

    pub fn property_id(self) -> PropertyId {
        match self {
            Self::Left => PropertyId::Left,
            Self::Top => PropertyId::Top,
            Self::Width => PropertyId::Width,
            Self::Height => PropertyId::Height,
        }
    }
}

/// Target rectangle in pixels. Sides left as `None` are never written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ItemRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }

    pub const fn position(left: f64, top: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: None,
            height: None,
        }
    }

    pub const fn size(width: f64, height: f64) -> Self {
        Self {
            left: None,
            top: None,
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn side(&self, side: RectSide) -> Option<f64> {
        match side {
            RectSide::Left => self.left,
            RectSide::Top => self.top,
            RectSide::Width => self.width,
            RectSide::Height => self.height,
        }
    }

    pub fn same_position(&self, other: &ItemRect) -> bool {
        self.left == other.left && self.top == other.top
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridItem {
    /// Markup the element is built from. Only read while the item has no
    /// element.
    pub content: String,
    pub element: Option<ElementId>,
    pub group_key: String,
    pub rect: ItemRect,
    /// Last rectangle committed to the element.
    pub prev_rect: Option<ItemRect>,
    pub size: Option<Size>,
    pub org_size: Option<Size>,
    pub transition: TransitionState,
}

pub type SharedItem = Rc<RefCell<GridItem>>;

impl GridItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_group_key(mut self, group_key: impl Into<String>) -> Self {
        self.group_key = group_key.into();
        self
    }

    pub fn with_rect(mut self, rect: ItemRect) -> Self {
        self.rect = rect;
        self
    }

    pub fn into_shared(self) -> SharedItem {
        Rc::new(RefCell::new(self))
    }
}
