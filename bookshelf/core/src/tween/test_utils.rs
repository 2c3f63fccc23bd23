//! Tween Test Utilities
//!
//! Mock infrastructure for exercising controllers without a real tween
//! engine: a [`ManualEngine`] that records every request and completes
//! tweens only when told to, and a [`MemoryStore`] property store.
//!
//! # Usage
//!
//! ```ignore
//! use bookshelf_core::tween::test_utils::ManualEngine;
//!
//! let mut engine = ManualEngine::new();
//! // ... drive a controller ...
//! assert_eq!(engine.requests_for(AnimationTarget::Camera).len(), 1);
//!
//! // Simulate a stalled tween by never settling it,
//! // or release it explicitly:
//! engine.settle_all();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use super::{
    AnimationTarget, Completion, Property, PropertyStore, TweenEngine, TweenId, TweenRequest,
    TweenValue,
};

/// Tween engine that only completes tweens on request
#[derive(Debug, Default)]
pub struct ManualEngine {
    next_id: u64,
    history: Vec<(TweenId, TweenRequest)>,
    pending: Vec<(TweenId, TweenRequest)>,
    settled: Vec<TweenId>,
}

impl ManualEngine {
    /// Create an engine with no history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request scheduled since the last [`ManualEngine::clear_history`]
    pub fn requests(&self) -> impl Iterator<Item = &TweenRequest> {
        self.history.iter().map(|(_, r)| r)
    }

    /// Recorded requests on `target`
    #[must_use]
    pub fn requests_for(&self, target: AnimationTarget) -> Vec<&TweenRequest> {
        self.requests().filter(|r| r.target == target).collect()
    }

    /// Number of recorded requests
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.history.len()
    }

    /// Forget recorded requests; pending tweens stay pending
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Pending tween carrying `completion`
    #[must_use]
    pub fn pending_with(&self, completion: Completion) -> Option<TweenId> {
        self.pending
            .iter()
            .find(|(_, r)| r.on_complete == Some(completion))
            .map(|(id, _)| *id)
    }

    /// Complete `id` on the next advance
    pub fn settle(&mut self, id: TweenId) {
        self.settled.push(id);
    }

    /// Complete every pending tween on the next advance, in schedule order
    pub fn settle_all(&mut self) {
        let ids: Vec<TweenId> = self.pending.iter().map(|(id, _)| *id).collect();
        self.settled.extend(ids);
    }
}

impl TweenEngine for ManualEngine {
    fn schedule(&mut self, request: TweenRequest) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.history.push((id, request.clone()));
        self.pending.push((id, request));
        id
    }

    fn advance(&mut self, _delta: Duration, store: &mut dyn PropertyStore) -> Vec<Completion> {
        let mut completions = Vec::new();
        for id in std::mem::take(&mut self.settled) {
            let Some(pos) = self.pending.iter().position(|(p, _)| *p == id) else {
                continue;
            };
            let (_, request) = self.pending.remove(pos);
            for (property, value) in &request.properties {
                store.write(request.target, *property, *value);
            }
            if let Some(completion) = request.on_complete {
                completions.push(completion);
            }
        }
        completions
    }

    fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

/// Hash-map property store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<(AnimationTarget, Property), TweenValue>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set any value
    pub fn set(&mut self, target: AnimationTarget, property: Property, value: TweenValue) {
        self.values.insert((target, property), value);
    }

    /// Set a numeric value
    pub fn set_scalar(&mut self, target: AnimationTarget, property: Property, value: f32) {
        self.set(target, property, TweenValue::Scalar(value));
    }

    /// Read any value
    #[must_use]
    pub fn get(&self, target: AnimationTarget, property: Property) -> Option<TweenValue> {
        self.values.get(&(target, property)).copied()
    }

    /// Read a numeric value, `NaN` when absent
    #[must_use]
    pub fn scalar(&self, target: AnimationTarget, property: Property) -> f32 {
        self.get(target, property)
            .and_then(TweenValue::as_scalar)
            .unwrap_or(f32::NAN)
    }
}

impl PropertyStore for MemoryStore {
    fn read(&self, target: AnimationTarget, property: Property) -> Option<TweenValue> {
        self.get(target, property)
    }

    fn write(&mut self, target: AnimationTarget, property: Property, value: TweenValue) {
        // Unknown keys stay unknown, like a scene without that object
        if let Some(slot) = self.values.get_mut(&(target, property)) {
            *slot = value;
        }
    }
}
