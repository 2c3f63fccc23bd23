//! Simulated-Time Tween Engine
//!
//! A frame-driven reference [`TweenEngine`]. Time only moves when the host
//! calls [`TweenEngine::advance`], which makes every transition in the
//! bookshelf reproducible in tests.
//!
//! Start values are captured when a tween starts (after its delay), not
//! when it is scheduled, so a delayed tween picks up wherever earlier
//! tweens left the property.
//!
//! A tween whose properties were all taken over by later tweens keeps
//! running silently until its end time and then completes as scheduled.

use std::time::Duration;

use super::{
    AnimationTarget, Completion, EasingFunction, Property, PropertyStore, TweenEngine, TweenId,
    TweenRequest, TweenValue,
};

#[derive(Clone, Debug)]
struct Track {
    property: Property,
    from: Option<TweenValue>,
    to: TweenValue,
}

#[derive(Clone, Debug)]
struct ScheduledTween {
    id: TweenId,
    target: AnimationTarget,
    tracks: Vec<Track>,
    starts_at: Duration,
    duration: Duration,
    easing: EasingFunction,
    on_complete: Option<Completion>,
    started: bool,
}

impl ScheduledTween {
    fn ends_at(&self) -> Duration {
        self.starts_at + self.duration
    }

    fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.starts_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Reference tween engine driven by simulated time
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    clock: Duration,
    next_id: u64,
    tweens: Vec<ScheduledTween>,
}

impl Timeline {
    /// Create an empty timeline at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time elapsed so far
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Whether a scheduled or running tween still animates `property` of `target`
    #[must_use]
    pub fn is_animating(&self, target: AnimationTarget, property: Property) -> bool {
        self.tweens
            .iter()
            .any(|t| t.target == target && t.tracks.iter().any(|tr| tr.property == property))
    }

    fn start(&mut self, index: usize, store: &dyn PropertyStore) {
        let target = self.tweens[index].target;
        let claimed: Vec<Property> = self.tweens[index]
            .tracks
            .iter()
            .map(|t| t.property)
            .collect();

        let id = self.tweens[index].id;
        for (i, other) in self.tweens.iter_mut().enumerate() {
            if i == index || !other.started || other.target != target {
                continue;
            }
            let before = other.tracks.len();
            other.tracks.retain(|t| !claimed.contains(&t.property));
            if other.tracks.len() < before {
                tracing::trace!(tween = %other.id, by = %id, "Tween properties taken over");
            }
        }

        let tween = &mut self.tweens[index];
        for track in &mut tween.tracks {
            track.from = store.read(target, track.property);
        }
        tween.started = true;
    }
}

impl TweenEngine for Timeline {
    fn schedule(&mut self, request: TweenRequest) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;

        let mut tracks: Vec<Track> = Vec::with_capacity(request.properties.len());
        for (property, to) in request.properties {
            // Repeating a property within one request keeps the last value
            tracks.retain(|t| t.property != property);
            tracks.push(Track {
                property,
                from: None,
                to,
            });
        }

        self.tweens.push(ScheduledTween {
            id,
            target: request.target,
            tracks,
            starts_at: self.clock + request.delay,
            duration: request.duration,
            easing: request.easing,
            on_complete: request.on_complete,
            started: false,
        });
        id
    }

    fn advance(&mut self, delta: Duration, store: &mut dyn PropertyStore) -> Vec<Completion> {
        self.clock += delta;
        let now = self.clock;

        let mut due: Vec<usize> = self
            .tweens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.started && t.starts_at <= now)
            .map(|(i, _)| i)
            .collect();
        due.sort_by_key(|&i| (self.tweens[i].starts_at, self.tweens[i].id));
        for index in due {
            self.start(index, store);
        }

        let mut finished: Vec<(Duration, TweenId)> = Vec::new();
        for tween in self.tweens.iter().filter(|t| t.started) {
            let progress = tween.progress(now);
            let done = progress >= 1.0;
            let eased = tween.easing.apply(progress);

            for track in &tween.tracks {
                let Some(from) = track.from else { continue };
                let value = if done {
                    track.to
                } else {
                    TweenValue::interpolate(from, track.to, eased)
                };
                store.write(tween.target, track.property, value);
            }

            if done {
                finished.push((tween.ends_at(), tween.id));
            }
        }

        finished.sort();
        let mut completions = Vec::new();
        for (_, id) in finished {
            if let Some(pos) = self.tweens.iter().position(|t| t.id == id) {
                let tween = self.tweens.remove(pos);
                if let Some(completion) = tween.on_complete {
                    completions.push(completion);
                }
            }
        }
        completions
    }

    fn in_flight(&self) -> usize {
        self.tweens.len()
    }
}
