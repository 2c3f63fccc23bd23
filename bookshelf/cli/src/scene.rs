//! Headless scene graph
//!
//! Stands in for a renderer: every mutation is traced and counted.

use tracing::trace;

use bookshelf_core::{BookInstance, Camera, SceneGraph, Vec3};

/// Scene graph that only logs what a renderer would draw
#[derive(Debug, Default)]
pub struct TraceScene {
    shelves: usize,
    books: usize,
    updates: u64,
}

impl TraceScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Shelf groups added so far
    pub fn shelves(&self) -> usize {
        self.shelves
    }

    /// Books added so far
    pub fn books(&self) -> usize {
        self.books
    }

    /// Book transform/material updates received
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl SceneGraph for TraceScene {
    fn add_shelf(&mut self, index: usize, origin: Vec3) {
        trace!(index, x = origin.x, z = origin.z, "add shelf");
        self.shelves += 1;
    }

    fn add_book(&mut self, book: &BookInstance) {
        trace!(book = %book.id(), offset = book.offset_x(), "add book");
        self.books += 1;
    }

    fn update_book(&mut self, book: &BookInstance) {
        let p = book.transform().position;
        trace!(
            book = %book.id(),
            y = p.y,
            z = p.z,
            opacity = book.opacity(),
            "update book"
        );
        self.updates += 1;
    }

    fn update_camera(&mut self, camera: &Camera) {
        let p = camera.position;
        trace!(x = p.x, y = p.y, z = p.z, "update camera");
    }

    fn update_spotlight(&mut self, position: Vec3) {
        trace!(x = position.x, "update spotlight");
    }
}
