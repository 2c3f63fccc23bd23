//! Stage - Scene State Owned by the Core
//!
//! The stage holds everything tweens animate: every shelf (and through it
//! every placed book), the camera pose and the hover spotlight. It is the
//! [`PropertyStore`] the tween engine writes into.
//!
//! The external scene graph never reads the stage directly. The host calls
//! [`Stage::flush`] once per frame and only entities that changed since the
//! last flush are pushed to it.

use std::collections::BTreeSet;

use crate::book::{BookId, BookInstance};
use crate::color::Color;
use crate::layout::{LayoutError, Shelf};
use crate::math::Vec3;
use crate::tween::{AnimationTarget, Property, PropertyStore, TweenValue};

/// Scene camera pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Pitch (x), yaw (y) and roll (z) in radians
    pub rotation: Vec3,
}

impl Camera {
    /// Camera at `position` aimed at `target`
    #[must_use]
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dx = target.x - position.x;
        let dy = target.y - position.y;
        let dz = target.z - position.z;
        let yaw = (-dx).atan2(-dz);
        let pitch = dy.atan2(dx.hypot(dz));
        Self {
            position,
            rotation: Vec3::new(pitch, yaw, 0.0),
        }
    }
}

/// Placement of shelf groups in the world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShelfOrigin {
    /// X offset of every shelf group
    pub group_offset_x: f32,
    /// Z distance between consecutive shelves
    pub shelf_spacing: f32,
}

impl ShelfOrigin {
    /// World origin of shelf `index`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(&self, index: usize) -> Vec3 {
        Vec3::new(self.group_offset_x, 0.0, index as f32 * self.shelf_spacing)
    }
}

/// Rendering boundary: the external scene graph engine
pub trait SceneGraph {
    /// A shelf group exists at `origin`
    fn add_shelf(&mut self, index: usize, origin: Vec3);

    /// A book finished loading and was placed
    fn add_book(&mut self, book: &BookInstance);

    /// A placed book's transform or material changed
    fn update_book(&mut self, book: &BookInstance);

    /// The camera moved
    fn update_camera(&mut self, camera: &Camera);

    /// The spotlight moved
    fn update_spotlight(&mut self, position: Vec3);
}

/// Entities changed since the last flush
#[derive(Debug, Default)]
struct DirtyTracker {
    shelves: bool,
    added: Vec<BookId>,
    books: BTreeSet<BookId>,
    camera: bool,
    spotlight: bool,
}

impl DirtyTracker {
    fn all() -> Self {
        Self {
            shelves: true,
            camera: true,
            spotlight: true,
            ..Self::default()
        }
    }

    fn is_clean(&self) -> bool {
        !self.shelves
            && self.added.is_empty()
            && self.books.is_empty()
            && !self.camera
            && !self.spotlight
    }
}

/// Scene state animated by the core
#[derive(Debug)]
pub struct Stage {
    shelves: Vec<Shelf>,
    origin: ShelfOrigin,
    camera: Camera,
    spotlight: Vec3,
    dirty: DirtyTracker,
}

impl Stage {
    /// Create a stage from planned shelves
    #[must_use]
    pub fn new(shelves: Vec<Shelf>, origin: ShelfOrigin, camera: Camera, spotlight: Vec3) -> Self {
        Self {
            shelves,
            origin,
            camera,
            spotlight,
            dirty: DirtyTracker::all(),
        }
    }

    /// All shelves
    #[must_use]
    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    /// Shelf at `index`
    #[must_use]
    pub fn shelf(&self, index: usize) -> Option<&Shelf> {
        self.shelves.get(index)
    }

    /// Number of shelves
    #[must_use]
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// Shelf placement in the world
    #[must_use]
    pub fn origin(&self) -> ShelfOrigin {
        self.origin
    }

    /// Placed book
    #[must_use]
    pub fn book(&self, id: BookId) -> Option<&BookInstance> {
        self.shelves.get(id.shelf)?.book(id.slot)
    }

    fn book_mut(&mut self, id: BookId) -> Option<&mut BookInstance> {
        self.shelves.get_mut(id.shelf)?.book_mut(id.slot)
    }

    /// Every placed book, shelf by shelf
    pub fn books(&self) -> impl Iterator<Item = &BookInstance> {
        self.shelves.iter().flat_map(Shelf::books)
    }

    /// Books placed so far
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.shelves.iter().map(|s| s.books().len()).sum()
    }

    /// Books the catalog holds
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shelves.iter().map(Shelf::capacity).sum()
    }

    /// Whether every book has been placed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shelves.iter().all(Shelf::is_complete)
    }

    /// Camera pose
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Spotlight position
    #[must_use]
    pub fn spotlight(&self) -> Vec3 {
        self.spotlight
    }

    /// Hand a measured size to the owning shelf
    ///
    /// # Errors
    ///
    /// Returns an error for unknown slots or repeated measurements.
    pub fn accept_geometry(
        &mut self,
        id: BookId,
        size: Vec3,
        color: Color,
    ) -> Result<Vec<BookId>, LayoutError> {
        let shelf = self
            .shelves
            .get_mut(id.shelf)
            .ok_or(LayoutError::UnknownSlot(id))?;
        let placed = shelf.accept(id.slot, size, color)?;
        self.dirty.added.extend(placed.iter().copied());
        Ok(placed)
    }

    /// Whether anything changed since the last flush
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_clean()
    }

    /// Push everything changed since the last flush to `scene`
    pub fn flush<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        let dirty = std::mem::take(&mut self.dirty);

        if dirty.shelves {
            for shelf in &self.shelves {
                scene.add_shelf(shelf.index(), self.origin.of(shelf.index()));
            }
        }
        for id in &dirty.added {
            if let Some(book) = self.book(*id) {
                scene.add_book(book);
            }
        }
        for id in dirty.books.iter().filter(|id| !dirty.added.contains(id)) {
            if let Some(book) = self.book(*id) {
                scene.update_book(book);
            }
        }
        if dirty.camera {
            scene.update_camera(&self.camera);
        }
        if dirty.spotlight {
            scene.update_spotlight(self.spotlight);
        }
    }
}

fn pose_value(position: &Vec3, rotation: &Vec3, property: Property) -> Option<f32> {
    match property {
        Property::PositionX => Some(position.x),
        Property::PositionY => Some(position.y),
        Property::PositionZ => Some(position.z),
        Property::RotationX => Some(rotation.x),
        Property::RotationY => Some(rotation.y),
        Property::RotationZ => Some(rotation.z),
        Property::Opacity | Property::Color => None,
    }
}

fn pose_slot<'a>(
    position: &'a mut Vec3,
    rotation: &'a mut Vec3,
    property: Property,
) -> Option<&'a mut f32> {
    match property {
        Property::PositionX => Some(&mut position.x),
        Property::PositionY => Some(&mut position.y),
        Property::PositionZ => Some(&mut position.z),
        Property::RotationX => Some(&mut rotation.x),
        Property::RotationY => Some(&mut rotation.y),
        Property::RotationZ => Some(&mut rotation.z),
        Property::Opacity | Property::Color => None,
    }
}

impl PropertyStore for Stage {
    fn read(&self, target: AnimationTarget, property: Property) -> Option<TweenValue> {
        match target {
            AnimationTarget::Book(id) => {
                let book = self.book(id)?;
                match property {
                    Property::Color => Some(TweenValue::Color(book.color)),
                    Property::Opacity => Some(TweenValue::Scalar(book.opacity)),
                    _ => pose_value(
                        &book.transform.position,
                        &book.transform.rotation,
                        property,
                    )
                    .map(TweenValue::Scalar),
                }
            }
            AnimationTarget::Camera => {
                pose_value(&self.camera.position, &self.camera.rotation, property)
                    .map(TweenValue::Scalar)
            }
            AnimationTarget::Spotlight => match property {
                Property::PositionX => Some(TweenValue::Scalar(self.spotlight.x)),
                Property::PositionY => Some(TweenValue::Scalar(self.spotlight.y)),
                Property::PositionZ => Some(TweenValue::Scalar(self.spotlight.z)),
                _ => None,
            },
        }
    }

    fn write(&mut self, target: AnimationTarget, property: Property, value: TweenValue) {
        match (target, value) {
            (AnimationTarget::Book(id), TweenValue::Color(color)) => {
                if property != Property::Color {
                    return;
                }
                if let Some(book) = self.book_mut(id) {
                    book.color = color;
                    self.dirty.books.insert(id);
                }
            }
            (AnimationTarget::Book(id), TweenValue::Scalar(v)) => {
                let Some(book) = self.book_mut(id) else { return };
                let slot = if property == Property::Opacity {
                    Some(&mut book.opacity)
                } else {
                    pose_slot(
                        &mut book.transform.position,
                        &mut book.transform.rotation,
                        property,
                    )
                };
                if let Some(slot) = slot {
                    *slot = v;
                    self.dirty.books.insert(id);
                }
            }
            (AnimationTarget::Camera, TweenValue::Scalar(v)) => {
                if let Some(slot) =
                    pose_slot(&mut self.camera.position, &mut self.camera.rotation, property)
                {
                    *slot = v;
                    self.dirty.camera = true;
                }
            }
            (AnimationTarget::Spotlight, TweenValue::Scalar(v)) => {
                let slot = match property {
                    Property::PositionX => &mut self.spotlight.x,
                    Property::PositionY => &mut self.spotlight.y,
                    Property::PositionZ => &mut self.spotlight.z,
                    _ => return,
                };
                *slot = v;
                self.dirty.spotlight = true;
            }
            (AnimationTarget::Camera | AnimationTarget::Spotlight, TweenValue::Color(_)) => {}
        }
    }
}

/// Fully loaded stage with `count` mock books, default world placement
#[cfg(test)]
pub(crate) fn fixture(count: usize, per_shelf: usize) -> Stage {
    use crate::catalog::Catalog;
    use crate::layout::ShelfLayoutBuilder;

    let catalog = Catalog::mock(count, 5);
    let builder = ShelfLayoutBuilder::new(per_shelf, 0.02).expect("per_shelf > 0");
    let shelves = builder.build(
        catalog.records(),
        |_| Vec3::new(0.2, 1.0, 0.3),
        Color::default(),
    );
    Stage::new(
        shelves,
        ShelfOrigin {
            group_offset_x: -15.0,
            shelf_spacing: -8.0,
        },
        Camera::looking_at(Vec3::new(3.0, 4.0, 6.0), Vec3::new(0.0, 1.0, 0.0)),
        Vec3::new(0.0, 2.0, 6.0),
    )
}
