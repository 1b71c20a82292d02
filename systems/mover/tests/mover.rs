use colony_core::{EntityHandle, Property};
use colony_system_mover::{move_x, move_y, step, CollisionObserver, NoObserver};
use colony_world::{Entity, EntityPool};
use glam::Vec2;

struct Level {
    pool: EntityPool,
    mover: EntityHandle,
}

impl Level {
    fn new(mover_at: Vec2) -> Self {
        let mut pool = EntityPool::with_capacity(16);
        let mover = pool.spawn(mover_at, Vec2::splat(16.0));
        Self { pool, mover }
    }

    fn block(&mut self, position: Vec2, size: Vec2, trigger: bool) -> EntityHandle {
        let handle = self.pool.spawn(position, size);
        let entity = self.pool.get_mut(handle).expect("fresh block");
        entity.trigger = trigger;
        entity.add_properties(&[Property::Collidable]);
        handle
    }

    fn candidates(&self) -> Vec<Entity> {
        let mut out = Vec::new();
        self.pool.with_property_into(Property::Collidable, &mut out);
        out
    }

    fn mover(&mut self) -> &mut Entity {
        self.pool.get_mut(self.mover).expect("mover is alive")
    }
}

#[derive(Default)]
struct CountingObserver {
    hits: Vec<EntityHandle>,
}

impl CollisionObserver for CountingObserver {
    fn on_collision(&mut self, mover: &mut Entity, other: &Entity) {
        assert_eq!(mover.last_collided, Some(other.handle));
        self.hits.push(other.handle);
    }
}

#[test]
fn sub_pixel_moves_accumulate_until_a_step_commits() {
    let mut level = Level::new(Vec2::ZERO);
    let mover = level.mover();
    let per_frame = 0.3;
    let mut total = 0.0_f32;
    let mut first_step_frame = None;

    for frame in 1..=50 {
        let outcome = move_x(mover, per_frame, &[], &mut NoObserver);
        total += per_frame;
        if outcome.moved != 0 && first_step_frame.is_none() {
            first_step_frame = Some(frame);
        }
        assert!(
            (mover.position.x - total).abs() <= 1.0,
            "frame {frame}: position {} drifted from {total}",
            mover.position.x
        );
        assert!(mover.remainder.x.abs() <= 0.5 + 1e-4);
    }

    assert_eq!(first_step_frame, Some(2));
    assert!((mover.position.x + mover.remainder.x - total).abs() < 1e-3);
}

#[test]
fn blocked_move_stops_flush_against_the_candidate() {
    let mut level = Level::new(Vec2::ZERO);
    let wall = level.block(Vec2::new(20.0, 0.0), Vec2::splat(16.0), false);
    let candidates = level.candidates();
    let mover = level.mover();
    mover.velocity = Vec2::new(2.0, 0.0);

    for _ in 0..10 {
        let _ = step(mover, 1.0, &candidates, &mut NoObserver);
    }

    assert_eq!(mover.position.x, 4.0);
    assert_eq!(mover.position.x + mover.size.x, 20.0);
    assert_eq!(mover.last_collided, Some(wall));
}

#[test]
fn falling_onto_a_floor_zeroes_velocity_and_grounds() {
    let mut level = Level::new(Vec2::ZERO);
    let floor = level.block(Vec2::new(-32.0, 40.0), Vec2::new(96.0, 16.0), false);
    let candidates = level.candidates();
    let mover = level.mover();
    mover.velocity.y = 5.0;

    let mut landed = false;
    for _ in 0..20 {
        let amount = mover.velocity.y;
        let outcome = move_y(mover, amount, &candidates, &mut NoObserver);
        if outcome.blocked {
            landed = true;
            break;
        }
    }

    assert!(landed);
    assert_eq!(mover.position.y + mover.size.y, 40.0);
    assert_eq!(mover.velocity.y, 0.0);
    assert!(mover.grounded);
    assert_eq!(mover.last_collided, Some(floor));
}

#[test]
fn triggers_are_passed_through_and_reported_every_step() {
    let mut level = Level::new(Vec2::ZERO);
    let trigger = level.block(Vec2::new(20.0, 0.0), Vec2::splat(16.0), true);
    let candidates = level.candidates();
    let mover = level.mover();
    let mut observer = CountingObserver::default();

    let outcome = move_x(mover, 10.0, &candidates, &mut observer);

    assert_eq!(mover.position.x, 10.0);
    assert!(!outcome.blocked);
    assert_eq!(outcome.moved, 10);
    // Probes at x = 5..=10 overlap the trigger spanning 20..36.
    assert_eq!(observer.hits, vec![trigger; 6]);
    assert_eq!(outcome.collisions, 6);
    assert_eq!(mover.last_collided, Some(trigger));
}

#[test]
fn first_candidate_in_snapshot_order_wins() {
    let mut level = Level::new(Vec2::ZERO);
    let trigger = level.block(Vec2::new(17.0, 0.0), Vec2::splat(16.0), true);
    let wall = level.block(Vec2::new(17.0, 0.0), Vec2::splat(16.0), false);
    let candidates = level.candidates();
    let mover = level.mover();
    let mut observer = CountingObserver::default();

    let outcome = move_x(mover, 4.0, &candidates, &mut observer);

    // The trigger shadows the wall, so every overlapping step passes through.
    assert_eq!(outcome.moved, 4);
    assert_eq!(observer.hits, vec![trigger; 3]);
    assert_ne!(mover.last_collided, Some(wall));
}

#[test]
fn observer_can_react_to_collisions_with_the_mover() {
    let mut level = Level::new(Vec2::new(0.0, 0.0));
    let _floor = level.block(Vec2::new(0.0, 16.0), Vec2::new(64.0, 16.0), false);
    let wall = level.block(Vec2::new(17.0, -32.0), Vec2::new(16.0, 48.0), false);
    let candidates = level.candidates();
    let mover = level.mover();
    mover.velocity = Vec2::new(3.0, 2.0);

    let mut touched_wall = false;
    let outcome = step(mover, 1.0, &candidates, &mut |mover: &mut Entity, other: &Entity| {
        if other.position.x == mover.position.x + mover.size.x {
            touched_wall = true;
        }
    });

    assert!(outcome.x.blocked);
    assert_eq!(outcome.x.moved, 1);
    assert!(outcome.y.blocked);
    assert_eq!(outcome.y.moved, 0);
    assert!(touched_wall);
    assert!(mover.grounded);
    assert_ne!(mover.last_collided, Some(wall));
}
