use core::ops::Range;

use super::{DrawCmd, ShapeKind, SortKey, ZIndex};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Maximal run of same-kind commands in paint order.
///
/// `range` indexes the paint-order sequence, not `DrawList::items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub kind: ShapeKind,
    pub range: Range<usize>,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command with the given z-index.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Iterates items in paint order (back-to-front) without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    /// Splits the paint order into runs of the same [`ShapeKind`].
    ///
    /// Renderers must play batches back in sequence for cross-kind occlusion
    /// to match the recorded order.
    pub fn batches(&mut self) -> Vec<Batch> {
        let mut out: Vec<Batch> = Vec::new();

        for (pos, item) in self.iter_in_paint_order().enumerate() {
            let kind = item.cmd.kind();
            match out.last_mut() {
                Some(last) if last.kind == kind => last.range.end = pos + 1,
                _ => out.push(Batch { kind, range: pos..pos + 1 }),
            }
        }

        out
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::{CircleStyle, LineCap};

    fn circle(list: &mut DrawList, z: i32) {
        let paint = Color::WHITE.into();
        list.push_circle(ZIndex::new(z), Vec2::zero(), 1.0, paint, CircleStyle::Fill);
    }

    fn line(list: &mut DrawList, z: i32) {
        list.push_solid_line(
            ZIndex::new(z),
            Vec2::zero(),
            Vec2::new(1.0, 0.0),
            1.0,
            Color::WHITE,
            LineCap::Butt,
        );
    }

    fn kinds(list: &mut DrawList) -> Vec<ShapeKind> {
        list.iter_in_paint_order().map(|i| i.cmd.kind()).collect()
    }

    #[test]
    fn equal_z_keeps_insertion_order() {
        let mut list = DrawList::new();
        circle(&mut list, 0);
        line(&mut list, 0);
        circle(&mut list, 0);
        assert_eq!(kinds(&mut list), vec![ShapeKind::Circle, ShapeKind::Line, ShapeKind::Circle]);
    }

    #[test]
    fn lower_z_paints_first() {
        let mut list = DrawList::new();
        line(&mut list, 5);
        circle(&mut list, 1);
        assert_eq!(kinds(&mut list), vec![ShapeKind::Circle, ShapeKind::Line]);
    }

    #[test]
    fn batches_group_consecutive_kinds() {
        let mut list = DrawList::new();
        circle(&mut list, 0);
        circle(&mut list, 1);
        line(&mut list, 2);
        line(&mut list, 3);
        line(&mut list, 4);
        circle(&mut list, 5);

        let batches = list.batches();
        assert_eq!(
            batches,
            vec![
                Batch { kind: ShapeKind::Circle, range: 0..2 },
                Batch { kind: ShapeKind::Line, range: 2..5 },
                Batch { kind: ShapeKind::Circle, range: 5..6 },
            ]
        );
    }

    #[test]
    fn batches_follow_sorted_order_not_insertion_order() {
        let mut list = DrawList::new();
        circle(&mut list, 2);
        line(&mut list, 1);
        circle(&mut list, 0);

        let batches = list.batches();
        let kinds: Vec<ShapeKind> = batches.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![ShapeKind::Circle, ShapeKind::Line, ShapeKind::Circle]);
    }

    #[test]
    fn clear_resets_items_and_batches() {
        let mut list = DrawList::new();
        circle(&mut list, 0);
        list.clear();
        assert!(list.is_empty());
        assert!(list.batches().is_empty());
    }
}
