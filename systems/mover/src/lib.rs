#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pixel-step actor mover with sub-pixel remainder accumulation.
//!
//! Each axis is resolved independently, X before Y. The requested
//! displacement is added to the entity's remainder, rounded to whole pixels,
//! and applied one pixel at a time against a snapshot of collision
//! candidates. Every overlapping step records the candidate in
//! `last_collided` and notifies the [`CollisionObserver`]; trigger candidates
//! are passed through, anything else stops the axis.

use colony_world::Entity;
use glam::Vec2;

/// Receives every collision encountered during a single move call.
pub trait CollisionObserver {
    /// Called after `mover.last_collided` was set to `other`'s handle and
    /// before the mover decides whether to pass through.
    fn on_collision(&mut self, mover: &mut Entity, other: &Entity);
}

impl<F> CollisionObserver for F
where
    F: FnMut(&mut Entity, &Entity),
{
    fn on_collision(&mut self, mover: &mut Entity, other: &Entity) {
        self(mover, other);
    }
}

/// Observer that ignores collisions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl CollisionObserver for NoObserver {
    fn on_collision(&mut self, _mover: &mut Entity, _other: &Entity) {}
}

/// Result of resolving one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisMove {
    /// Whole-pixel steps requested after rounding the remainder.
    pub requested: i32,
    /// Signed pixels actually committed.
    pub moved: i32,
    /// Whether a non-trigger candidate stopped the move early.
    pub blocked: bool,
    /// Number of overlapping steps reported to the observer.
    pub collisions: u32,
}

/// Result of [`step`], one entry per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Horizontal resolution.
    pub x: AxisMove,
    /// Vertical resolution.
    pub y: AxisMove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn unit(self) -> Vec2 {
        match self {
            Self::X => Vec2::X,
            Self::Y => Vec2::Y,
        }
    }

    fn remainder(self, entity: &mut Entity) -> &mut f32 {
        match self {
            Self::X => &mut entity.remainder.x,
            Self::Y => &mut entity.remainder.y,
        }
    }
}

/// Moves `mover` horizontally by `amount` pixels against `candidates`.
pub fn move_x<O>(
    mover: &mut Entity,
    amount: f32,
    candidates: &[Entity],
    observer: &mut O,
) -> AxisMove
where
    O: CollisionObserver + ?Sized,
{
    move_axis(Axis::X, mover, amount, candidates, observer)
}

/// Moves `mover` vertically by `amount` pixels against `candidates`.
///
/// A blocked move zeroes the vertical velocity; a blocked downward move also
/// marks the mover grounded.
pub fn move_y<O>(
    mover: &mut Entity,
    amount: f32,
    candidates: &[Entity],
    observer: &mut O,
) -> AxisMove
where
    O: CollisionObserver + ?Sized,
{
    move_axis(Axis::Y, mover, amount, candidates, observer)
}

/// Integrates `mover.velocity * dt`, resolving X fully before Y.
pub fn step<O>(mover: &mut Entity, dt: f32, candidates: &[Entity], observer: &mut O) -> StepOutcome
where
    O: CollisionObserver + ?Sized,
{
    let dx = mover.velocity.x * dt;
    let x = move_x(mover, dx, candidates, observer);
    // Blocking on X may not touch velocity.y, but an observer can.
    let dy = mover.velocity.y * dt;
    let y = move_y(mover, dy, candidates, observer);
    StepOutcome { x, y }
}

fn move_axis<O>(
    axis: Axis,
    mover: &mut Entity,
    amount: f32,
    candidates: &[Entity],
    observer: &mut O,
) -> AxisMove
where
    O: CollisionObserver + ?Sized,
{
    let mut outcome = AxisMove::default();

    let remainder = axis.remainder(mover);
    *remainder += amount;
    let rounded = remainder.round();
    if rounded == 0.0 {
        return outcome;
    }
    *remainder -= rounded;

    let mut remaining = rounded as i32;
    outcome.requested = remaining;
    let sign = remaining.signum();
    let offset = axis.unit() * sign as f32;

    while remaining != 0 {
        let next = mover.bounds_at(mover.position + offset);
        let hit = candidates
            .iter()
            .filter(|candidate| candidate.handle != mover.handle)
            .find(|candidate| next.overlaps(&candidate.bounds()));

        if let Some(other) = hit {
            mover.last_collided = Some(other.handle);
            outcome.collisions += 1;
            observer.on_collision(mover, other);

            if !other.trigger {
                outcome.blocked = true;
                if axis == Axis::Y {
                    mover.velocity.y = 0.0;
                    if sign > 0 {
                        mover.grounded = true;
                    }
                }
                log::trace!(
                    "{:?} blocked on {:?} by slot {} with {remaining} steps left",
                    mover.kind,
                    axis,
                    other.handle.index()
                );
                break;
            }
        }

        mover.position += offset;
        remaining -= sign;
        outcome.moved += sign;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_world::EntityPool;

    fn actor(position: Vec2) -> Entity {
        Entity::new(position, Vec2::splat(16.0))
    }

    #[test]
    fn rounding_to_zero_skips_collision_tests() {
        let mut pool = EntityPool::with_capacity(2);
        let wall = pool.spawn(Vec2::new(4.0, 0.0), Vec2::splat(16.0));
        let candidates = vec![pool.get(wall).expect("wall").clone()];
        let mut mover = actor(Vec2::ZERO);
        let mut calls = 0;

        let outcome = move_x(&mut mover, 0.4, &candidates, &mut |_: &mut Entity, _: &Entity| {
            calls += 1
        });

        assert_eq!(outcome, AxisMove::default());
        assert_eq!(calls, 0);
        assert_eq!(mover.last_collided, None);
        assert!((mover.remainder.x - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_moves_step_left() {
        let mut mover = actor(Vec2::new(10.0, 0.0));
        let outcome = move_x(&mut mover, -3.0, &[], &mut NoObserver);

        assert_eq!(outcome.moved, -3);
        assert_eq!(mover.position.x, 7.0);
    }

    #[test]
    fn upward_block_does_not_ground() {
        let mut pool = EntityPool::with_capacity(2);
        let ceiling = pool.spawn(Vec2::new(0.0, -20.0), Vec2::splat(16.0));
        let candidates = vec![pool.get(ceiling).expect("ceiling").clone()];
        let mut mover = actor(Vec2::ZERO);
        mover.velocity.y = -6.0;

        let outcome = step(&mut mover, 1.0, &candidates, &mut NoObserver);

        assert!(outcome.y.blocked);
        assert_eq!(mover.position.y, -4.0);
        assert_eq!(mover.velocity.y, 0.0);
        assert!(!mover.grounded);
    }

    #[test]
    fn mover_skips_its_own_snapshot() {
        let mut pool = EntityPool::with_capacity(2);
        let handle = pool.spawn(Vec2::ZERO, Vec2::splat(16.0));
        let candidates = vec![pool.get(handle).expect("self").clone()];
        let mover = pool.get_mut(handle).expect("self");

        let outcome = move_x(mover, 5.0, &candidates, &mut NoObserver);

        assert_eq!(outcome.moved, 5);
        assert!(!outcome.blocked);
    }
}
