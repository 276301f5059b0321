//! Per-frame animation scheduling.
//!
//! The scheduler owns the scene's [`Clock`] and the list of animated entities
//! in registration order. The host calls [`AnimationScheduler::tick`] once per
//! frame with the current time; the scheduler advances the clock, writes every
//! entity's new pose, and reports whether a frame is ready to render.
//!
//! ```text
//! Idle --start()--> Running --stop()--> Stopped
//!   ^                                      |
//!   +-------------- reset() ---------------+
//! ```
//!
//! There is no pause state. A running scheduler never stops on its own.

use hecs::{Entity, World};

use crate::animation::{Animated, AnimationRule};
use crate::clock::Clock;
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Result of one scheduling tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameSignal {
    /// All animated entities are at their pose for `elapsed`; render now.
    Ready { elapsed: f32 },
    /// The scheduler is not running; nothing was updated.
    Skipped,
}

impl FrameSignal {
    pub fn is_ready(&self) -> bool {
        matches!(self, FrameSignal::Ready { .. })
    }
}

#[derive(Debug)]
pub struct AnimationScheduler {
    state: SchedulerState,
    clock: Clock,
    order: Vec<Entity>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            clock: Clock::new(),
            order: Vec::new(),
        }
    }

    /// Spawns an animated entity and appends it to the update order.
    ///
    /// `rest` becomes both the initial transform and the static parameters the
    /// rule is evaluated against. Extra components (a [`Visual`](crate::Visual),
    /// a [`Light`](crate::Light)...) can be added with `world.insert` afterwards.
    pub fn register(&mut self, world: &mut World, rest: Transform, rule: AnimationRule) -> Entity {
        let entity = world.spawn((rest, Animated::new(rest, rule)));
        self.order.push(entity);
        entity
    }

    /// Adopts an entity that already carries `Transform` and `Animated`.
    pub fn track(&mut self, entity: Entity) {
        if !self.order.contains(&entity) {
            self.order.push(entity);
        }
    }

    /// Animated entities in update order.
    pub fn registered(&self) -> &[Entity] {
        &self.order
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Enters `Running`. Only valid once, from `Idle`.
    pub fn start(&mut self) {
        match self.state {
            SchedulerState::Idle => {
                log::debug!("scheduler running with {} animated entities", self.order.len());
                self.state = SchedulerState::Running;
            }
            SchedulerState::Running => {}
            SchedulerState::Stopped => {
                log::warn!("scheduler already stopped; reset() before starting again");
            }
        }
    }

    /// Stops the frame loop. Subsequent ticks are skipped.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            log::debug!("scheduler stopped at {:.3}s", self.clock.elapsed());
        }
        self.state = SchedulerState::Stopped;
    }

    /// Forgets all registrations and rewinds the clock, for a full scene rebuild.
    pub fn reset(&mut self) {
        self.order.clear();
        self.clock.reset();
        self.state = SchedulerState::Idle;
    }

    /// Runs one frame: advance the clock to `now`, then update every entity in
    /// registration order.
    pub fn tick(&mut self, world: &mut World, now: f32) -> FrameSignal {
        if self.state != SchedulerState::Running {
            return FrameSignal::Skipped;
        }

        let elapsed = self.clock.advance_to(now);

        for &entity in &self.order {
            match world.query_one_mut::<(&mut Transform, &Animated)>(entity) {
                Ok((transform, animated)) => *transform = animated.pose(elapsed),
                Err(_) => log::warn!("animated entity {entity:?} is gone, skipping"),
            }
        }

        log::trace!(
            "frame {} at {elapsed:.3}s, {} entities updated",
            self.clock.ticks(),
            self.order.len()
        );
        FrameSignal::Ready { elapsed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Orbit;
    use glam::Vec3;

    fn spin(rate: f32) -> AnimationRule {
        AnimationRule::Spin {
            rate: Vec3::new(0.0, rate, 0.0),
        }
    }

    #[test]
    fn idle_and_stopped_ticks_are_skipped() {
        let mut world = World::new();
        let mut scheduler = AnimationScheduler::new();
        let e = scheduler.register(&mut world, Transform::new(), spin(1.0));

        assert_eq!(scheduler.tick(&mut world, 1.0), FrameSignal::Skipped);
        assert_eq!(scheduler.clock().elapsed(), 0.0);

        scheduler.start();
        scheduler.stop();
        assert_eq!(scheduler.tick(&mut world, 2.0), FrameSignal::Skipped);
        assert_eq!(world.get::<&Transform>(e).unwrap().rotation, Vec3::ZERO);
    }

    #[test]
    fn running_tick_updates_every_entity() {
        let mut world = World::new();
        let mut scheduler = AnimationScheduler::new();
        let spinner = scheduler.register(&mut world, Transform::new(), spin(0.5));
        let ghost = scheduler.register(
            &mut world,
            Transform::new(),
            AnimationRule::Orbit(Orbit::new(0.5, 4.0)),
        );
        scheduler.start();

        let signal = scheduler.tick(&mut world, 2.0);
        assert_eq!(signal, FrameSignal::Ready { elapsed: 2.0 });
        assert_eq!(world.get::<&Transform>(spinner).unwrap().rotation.y, 1.0);

        let position = world.get::<&Transform>(ghost).unwrap().position;
        assert!(position.abs_diff_eq(Vec3::new(1.0f32.cos() * 4.0, 0.0, 1.0f32.sin() * 4.0), 1e-6));
    }

    #[test]
    fn updates_are_independent_of_frame_rate() {
        let mut coarse_world = World::new();
        let mut coarse = AnimationScheduler::new();
        let a = coarse.register(&mut coarse_world, Transform::new(), spin(0.18));
        coarse.start();
        coarse.tick(&mut coarse_world, 3.0);

        let mut fine_world = World::new();
        let mut fine = AnimationScheduler::new();
        let b = fine.register(&mut fine_world, Transform::new(), spin(0.18));
        fine.start();
        for i in 1..=180 {
            fine.tick(&mut fine_world, i as f32 / 60.0);
        }

        let ra = coarse_world.get::<&Transform>(a).unwrap().rotation;
        let rb = fine_world.get::<&Transform>(b).unwrap().rotation;
        assert!(ra.abs_diff_eq(rb, 1e-5));
    }

    #[test]
    fn keeps_registration_order_and_ignores_duplicates() {
        let mut world = World::new();
        let mut scheduler = AnimationScheduler::new();
        let a = scheduler.register(&mut world, Transform::new(), spin(1.0));
        let b = scheduler.register(&mut world, Transform::new(), spin(2.0));
        scheduler.track(a);
        assert_eq!(scheduler.registered(), &[a, b]);
    }

    #[test]
    fn despawned_entities_do_not_stop_the_frame() {
        let mut world = World::new();
        let mut scheduler = AnimationScheduler::new();
        let gone = scheduler.register(&mut world, Transform::new(), spin(1.0));
        let kept = scheduler.register(&mut world, Transform::new(), spin(1.0));
        world.despawn(gone).unwrap();
        scheduler.start();

        assert!(scheduler.tick(&mut world, 1.0).is_ready());
        assert_eq!(world.get::<&Transform>(kept).unwrap().rotation.y, 1.0);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut world = World::new();
        let mut scheduler = AnimationScheduler::new();
        scheduler.register(&mut world, Transform::new(), spin(1.0));
        scheduler.start();
        scheduler.tick(&mut world, 4.0);
        scheduler.stop();

        scheduler.start();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        scheduler.reset();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.registered().is_empty());
        assert_eq!(scheduler.clock().elapsed(), 0.0);
    }
}
