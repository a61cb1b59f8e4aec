//! Drag-to-reorder: translates a hover over another slot into at most one move.

/// Horizontal extent of the hovered slot, in the pointer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotBounds {
    pub left: f64,
    pub right: f64,
}

impl SlotBounds {
    pub fn midpoint_offset(&self) -> f64 {
        (self.right - self.left) / 2.0
    }
}

/// `Some((from, to))` once the pointer has crossed the hovered slot's midpoint
/// in the direction of travel. Prevents two slots from swapping back and forth
/// while the pointer sits on their border.
pub fn hover_move(
    drag_index: usize,
    hover_index: usize,
    pointer_x: f64,
    slot: SlotBounds,
) -> Option<(usize, usize)> {
    if drag_index == hover_index {
        return None;
    }

    let offset = pointer_x - slot.left;
    let middle = slot.midpoint_offset();

    if drag_index < hover_index && offset < middle {
        return None;
    }
    if drag_index > hover_index && offset > middle {
        return None;
    }

    Some((drag_index, hover_index))
}
