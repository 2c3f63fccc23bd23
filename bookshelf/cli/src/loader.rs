//! Simulated model loader
//!
//! Every request resolves on its own tokio task after a random delay, so
//! geometry arrives out of catalog order just like a real network loader.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;

use bookshelf_core::{AssetLoader, AssetRequest, BookId, Geometry, Vec3};

/// Unscaled extents of the stock book model
const MODEL_EXTENTS: Vec3 = Vec3::new(0.25, 1.0, 0.7);

/// A loaded model handed back to the frame loop
pub type Loaded = (BookId, Geometry);

/// Loader that answers requests from spawned tasks
pub struct SimulatedLoader {
    tx: mpsc::UnboundedSender<Loaded>,
    rng: StdRng,
    max_delay: Duration,
}

impl SimulatedLoader {
    /// Create a loader and the receiving end for its results
    pub fn new(seed: u64, max_delay: Duration) -> (Self, mpsc::UnboundedReceiver<Loaded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            tx,
            rng: StdRng::seed_from_u64(seed),
            max_delay,
        };
        (loader, rx)
    }
}

impl AssetLoader for SimulatedLoader {
    fn load(&mut self, request: AssetRequest) {
        let millis = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(self.rng.gen_range(0..=millis));
        let tx = self.tx.clone();

        tracing::trace!(book = %request.book, path = %request.model_path, ?delay, "Loading model");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let geometry = Geometry {
                extents: MODEL_EXTENTS,
            };
            // Receiver gone means the CLI is shutting down
            let _ = tx.send((request.book, geometry));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::BookScale;

    fn request(slot: usize) -> AssetRequest {
        AssetRequest {
            book: BookId::new(0, slot),
            model_path: "models/books/book_1.obj".to_string(),
            scale: BookScale::default(),
        }
    }

    #[tokio::test]
    async fn test_every_request_resolves() {
        let (mut loader, mut rx) = SimulatedLoader::new(9, Duration::from_millis(20));
        for slot in 0..8 {
            loader.load(request(slot));
        }
        drop(loader);

        let mut slots = Vec::new();
        while let Some((book, geometry)) = rx.recv().await {
            assert_eq!(geometry.extents, MODEL_EXTENTS);
            slots.push(book.slot);
        }
        slots.sort_unstable();
        assert_eq!(slots, (0..8).collect::<Vec<_>>());
    }
}
