mod item_transition;

pub use item_transition::*;

/// Per-item animation record. `Animating` holds while the completion handler
/// armed on the item's element is pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionState {
    #[default]
    Idle,
    Animating,
}

impl TransitionState {
    pub const fn is_animating(self) -> bool {
        matches!(self, Self::Animating)
    }
}
