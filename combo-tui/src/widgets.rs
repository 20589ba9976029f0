//! Small, reusable UI helpers used by multiple screens.

/// Selection marker for a list row. Single-choice slots (plan, TV, mesh,
/// backup) render as radio buttons, the multi-select app list as checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMark {
    Radio(bool),
    Check(bool),
    /// Row with no selection state, e.g. "start from scratch".
    Bare,
}

impl SlotMark {
    pub fn symbol(&self) -> &'static str {
        match self {
            SlotMark::Radio(true) => "(•)",
            SlotMark::Radio(false) => "( )",
            SlotMark::Check(true) => "[x]",
            SlotMark::Check(false) => "[ ]",
            SlotMark::Bare => "   ",
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SlotMark::Radio(true) | SlotMark::Check(true))
    }
}
