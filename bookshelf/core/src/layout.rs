//! Shelf Layout
//!
//! Partitions the catalog into fixed-size shelves and packs each shelf's
//! books left to right. A book's offset is the running sum of the widths
//! (plus gap) of the books before it, so a book can only be placed once
//! every earlier book on its shelf has a measured size.
//!
//! Geometry arrives asynchronously and in no particular order. Each shelf
//! keeps a small reorder buffer and places books strictly in catalog order
//! as the contiguous prefix completes. For identical catalogs and
//! geometry, offsets are bit-for-bit identical whatever the load order.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::book::{BookId, BookInstance};
use crate::catalog::BookConfig;
use crate::color::Color;
use crate::math::Vec3;

/// Errors raised while building the layout
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A shelf must hold at least one book
    #[error("Books per shelf must be at least 1")]
    ZeroBooksPerShelf,

    /// Geometry arrived for a slot that does not exist
    #[error("No book slot {0} in the layout")]
    UnknownSlot(BookId),

    /// Geometry arrived twice for the same slot
    #[error("Geometry for book {0} was already received")]
    DuplicateGeometry(BookId),
}

/// Partitions catalog records into shelves
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShelfLayoutBuilder {
    per_shelf: usize,
    gap: f32,
}

impl ShelfLayoutBuilder {
    /// Create a builder
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroBooksPerShelf`] if `per_shelf` is zero.
    pub fn new(per_shelf: usize, gap: f32) -> Result<Self, LayoutError> {
        if per_shelf == 0 {
            return Err(LayoutError::ZeroBooksPerShelf);
        }
        Ok(Self { per_shelf, gap })
    }

    /// Maximum books per shelf
    #[must_use]
    pub fn per_shelf(&self) -> usize {
        self.per_shelf
    }

    /// Gap between neighbouring books
    #[must_use]
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Handle of the book at `catalog_index`
    #[must_use]
    pub fn slot_of(&self, catalog_index: usize) -> BookId {
        BookId::new(catalog_index / self.per_shelf, catalog_index % self.per_shelf)
    }

    /// Number of shelves `record_count` books occupy
    #[must_use]
    pub fn shelf_count(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.per_shelf)
    }

    /// Empty shelves, one per chunk, waiting for geometry
    #[must_use]
    pub fn plan(&self, records: &[BookConfig]) -> Vec<Shelf> {
        records
            .chunks(self.per_shelf)
            .enumerate()
            .map(|(index, chunk)| Shelf::new(index, chunk.to_vec(), self.gap))
            .collect()
    }

    /// Lay out every shelf at once, measuring each book with `measure`
    #[must_use]
    pub fn build(
        &self,
        records: &[BookConfig],
        mut measure: impl FnMut(&BookConfig) -> Vec3,
        color: Color,
    ) -> Vec<Shelf> {
        let mut shelves = self.plan(records);
        for shelf in &mut shelves {
            for slot in 0..shelf.capacity() {
                let size = measure(&shelf.records[slot]);
                shelf.place(size, color);
            }
        }
        shelves
    }
}

/// Ordered group of books sharing one navigation index
#[derive(Clone, Debug)]
pub struct Shelf {
    index: usize,
    records: Vec<BookConfig>,
    books: Vec<BookInstance>,
    cursor: f32,
    gap: f32,
    waiting: BTreeMap<usize, Vec3>,
}

impl Shelf {
    fn new(index: usize, records: Vec<BookConfig>, gap: f32) -> Self {
        Self {
            index,
            records,
            books: Vec::new(),
            cursor: 0.0,
            gap,
            waiting: BTreeMap::new(),
        }
    }

    /// Navigation index of this shelf
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of catalog records assigned to this shelf
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Catalog records assigned to this shelf, in slot order
    #[must_use]
    pub fn records(&self) -> &[BookConfig] {
        &self.records
    }

    /// Books placed so far, in catalog order
    #[must_use]
    pub fn books(&self) -> &[BookInstance] {
        &self.books
    }

    /// Placed book at `slot`
    #[must_use]
    pub fn book(&self, slot: usize) -> Option<&BookInstance> {
        self.books.get(slot)
    }

    pub(crate) fn book_mut(&mut self, slot: usize) -> Option<&mut BookInstance> {
        self.books.get_mut(slot)
    }

    /// Whether every book on this shelf has been placed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.books.len() == self.records.len()
    }

    /// Where the next book's left edge will go
    #[must_use]
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Accept a measured size for `slot` and place every book that has
    /// become placeable. Returns the handles placed by this call, in order.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-range slot or a repeated measurement.
    pub fn accept(
        &mut self,
        slot: usize,
        size: Vec3,
        color: Color,
    ) -> Result<Vec<BookId>, LayoutError> {
        let id = BookId::new(self.index, slot);
        if slot >= self.records.len() {
            return Err(LayoutError::UnknownSlot(id));
        }
        if slot < self.books.len() || self.waiting.contains_key(&slot) {
            return Err(LayoutError::DuplicateGeometry(id));
        }

        self.waiting.insert(slot, size);

        let mut placed = Vec::new();
        while let Some(size) = self.waiting.remove(&self.books.len()) {
            placed.push(self.place(size, color));
        }
        Ok(placed)
    }

    fn place(&mut self, size: Vec3, color: Color) -> BookId {
        let slot = self.books.len();
        let id = BookId::new(self.index, slot);
        let book = BookInstance::new(id, self.records[slot].clone(), self.cursor, size, color);
        self.books.push(book);
        self.cursor += size.x + self.gap;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookScale, Catalog};
    use pretty_assertions::assert_eq;

    fn width_of(config: &BookConfig) -> Vec3 {
        config.bounding_size(Vec3::new(0.3, 1.0, 0.25))
    }

    #[test]
    fn test_zero_per_shelf_rejected() {
        assert_eq!(
            ShelfLayoutBuilder::new(0, 0.02),
            Err(LayoutError::ZeroBooksPerShelf)
        );
    }

    #[test]
    fn test_empty_catalog_has_no_shelves() {
        let builder = ShelfLayoutBuilder::new(80, 0.02).unwrap();
        assert!(builder.plan(&[]).is_empty());
        assert_eq!(builder.shelf_count(0), 0);
    }

    #[test]
    fn test_partition_85_into_80_and_5() {
        let catalog = Catalog::mock(85, 1);
        let builder = ShelfLayoutBuilder::new(80, 0.02).unwrap();
        let shelves = builder.build(catalog.records(), width_of, Color::default());

        let sizes: Vec<_> = shelves.iter().map(|s| s.books().len()).collect();
        assert_eq!(sizes, vec![80, 5]);
        assert_eq!(builder.shelf_count(85), 2);
        assert_eq!(shelves[1].books()[0].config().position, 80);
        assert!(shelves[1].books().iter().all(|b| b.shelf_index() == 1));
    }

    #[test]
    fn test_offsets_are_running_sum_of_width_and_gap() {
        let catalog = Catalog::mock(23, 9);
        let gap = 0.02;
        let builder = ShelfLayoutBuilder::new(10, gap).unwrap();
        let shelves = builder.build(catalog.records(), width_of, Color::default());

        for shelf in &shelves {
            let mut expected = 0.0_f32;
            for book in shelf.books() {
                assert_eq!(book.offset_x().to_bits(), expected.to_bits());
                expected += book.size().x + gap;
            }
            assert_eq!(shelf.cursor().to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_out_of_order_geometry_places_in_catalog_order() {
        let records: Vec<_> = (0..4)
            .map(|i| BookConfig::new(i, BookScale { y: 1.0, z: 1.0 }))
            .collect();
        let builder = ShelfLayoutBuilder::new(4, 0.5).unwrap();
        let mut shelf = builder.plan(&records).remove(0);
        let color = Color::default();

        assert!(shelf.accept(2, Vec3::new(3.0, 1.0, 1.0), color).unwrap().is_empty());
        assert!(shelf.accept(1, Vec3::new(2.0, 1.0, 1.0), color).unwrap().is_empty());
        let placed = shelf.accept(0, Vec3::new(1.0, 1.0, 1.0), color).unwrap();
        assert_eq!(
            placed,
            vec![BookId::new(0, 0), BookId::new(0, 1), BookId::new(0, 2)]
        );
        assert!(!shelf.is_complete());

        let placed = shelf.accept(3, Vec3::new(4.0, 1.0, 1.0), color).unwrap();
        assert_eq!(placed, vec![BookId::new(0, 3)]);
        assert!(shelf.is_complete());

        let offsets: Vec<_> = shelf.books().iter().map(BookInstance::offset_x).collect();
        assert_eq!(offsets, vec![0.0, 1.5, 4.0, 7.5]);
    }

    #[test]
    fn test_load_order_does_not_change_offsets() {
        let catalog = Catalog::mock(12, 3);
        let builder = ShelfLayoutBuilder::new(12, 0.02).unwrap();
        let in_order = builder.build(catalog.records(), width_of, Color::default());

        let mut shelf = builder.plan(catalog.records()).remove(0);
        for slot in (0..12).rev() {
            let size = width_of(&catalog.records()[slot]);
            shelf.accept(slot, size, Color::default()).unwrap();
        }

        let a: Vec<_> = in_order[0].books().iter().map(|b| b.offset_x().to_bits()).collect();
        let b: Vec<_> = shelf.books().iter().map(|b| b.offset_x().to_bits()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_accept_rejects_unknown_and_duplicate() {
        let records = vec![BookConfig::new(0, BookScale::default())];
        let builder = ShelfLayoutBuilder::new(5, 0.0).unwrap();
        let mut shelf = builder.plan(&records).remove(0);
        let size = Vec3::ONE;

        assert_eq!(
            shelf.accept(1, size, Color::default()),
            Err(LayoutError::UnknownSlot(BookId::new(0, 1)))
        );
        shelf.accept(0, size, Color::default()).unwrap();
        assert_eq!(
            shelf.accept(0, size, Color::default()),
            Err(LayoutError::DuplicateGeometry(BookId::new(0, 0)))
        );
    }

    #[test]
    fn test_slot_of_maps_catalog_index() {
        let builder = ShelfLayoutBuilder::new(80, 0.02).unwrap();
        assert_eq!(builder.slot_of(0), BookId::new(0, 0));
        assert_eq!(builder.slot_of(79), BookId::new(0, 79));
        assert_eq!(builder.slot_of(84), BookId::new(1, 4));
    }
}
