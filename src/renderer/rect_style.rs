use std::cell::Cell;
use std::rc::Rc;

use super::{ItemRect, PercentageFlags, RectSide, SizeCache};
use crate::style::{Length, ParsedValue};
use crate::view::{DomHost, ElementId};

/// Turns rectangle sides into inline style lengths.
///
/// Shares the renderer's size cache so a deferred write (transition
/// completion) divides by the viewport current at that moment.
#[derive(Clone, Debug)]
pub struct RectStyler {
    horizontal: bool,
    percentage: PercentageFlags,
    size: Rc<Cell<SizeCache>>,
}

impl RectStyler {
    pub fn new(horizontal: bool, percentage: PercentageFlags, size: Rc<Cell<SizeCache>>) -> Self {
        Self {
            horizontal,
            percentage,
            size,
        }
    }

    /// Only the sides along the viewport axis can be relative to it.
    pub fn is_percentage(&self, side: RectSide) -> bool {
        let flag = match (self.horizontal, side) {
            (true, RectSide::Height) | (false, RectSide::Width) => PercentageFlags::SIZE,
            (true, RectSide::Top) | (false, RectSide::Left) => PercentageFlags::POSITION,
            _ => return false,
        };
        self.percentage.contains(flag)
    }

    pub fn length(&self, side: RectSide, value: f64) -> Length {
        if self.is_percentage(side) {
            Length::Percent(value / self.size.get().viewport * 100.0)
        } else {
            Length::Px(value)
        }
    }

    pub fn apply(&self, host: &mut dyn DomHost, element: ElementId, sides: &[RectSide], rect: &ItemRect) {
        for side in sides {
            let Some(value) = rect.side(*side) else {
                continue;
            };
            host.set_style(
                element,
                side.property_id(),
                Some(ParsedValue::Length(self.length(*side, value))),
            );
        }
    }
}
