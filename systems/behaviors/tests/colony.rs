use colony_core::{EntityKind, Rect};
use colony_rendering::{DrawCommand, FrameInput, Layer, RecordingBackend, RenderQueue};
use colony_system_behaviors::{Behaviors, Config};
use colony_system_bootstrap::{flowers_remaining, Bootstrap, Scenario};
use colony_world::{query, spawn, HubState, Payload, Task, World};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 1.0 / 60.0;

fn idle() -> FrameInput {
    FrameInput {
        dt: DT,
        ..FrameInput::default()
    }
}

fn peaceful() -> Config {
    Config {
        predator_interval: 0.0,
        ..Config::default()
    }
}

fn run(behaviors: &mut Behaviors, world: &mut World, frames: usize, input: &FrameInput) {
    for _ in 0..frames {
        behaviors.update(world, input);
    }
}

fn seeded(scenario: Scenario) -> (World, colony_system_bootstrap::Landmarks) {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x1d56);
    let landmarks = Bootstrap.populate(
        &mut world,
        scenario,
        &colony_system_bootstrap::Config::default(),
        &mut rng,
    );
    (world, landmarks)
}

#[test]
fn workers_harvest_flowers_once_the_hub_is_selected() {
    let (mut world, landmarks) = seeded(Scenario::Colony);
    let hub = landmarks.hub.expect("colony has a hub");
    let flowers_at_start = flowers_remaining(&world);
    let mut behaviors = Behaviors::new(peaceful());

    behaviors.update(
        &mut world,
        &FrameInput {
            select: true,
            cursor_world: Some(Vec2::ZERO),
            ..idle()
        },
    );
    run(&mut behaviors, &mut world, 60 * 20, &idle());

    assert!(flowers_remaining(&world) < flowers_at_start);
    let state = match query::entity(&world, hub).map(|hub| &hub.payload) {
        Some(Payload::Hub(state)) => *state,
        other => panic!("unexpected hub payload {other:?}"),
    };
    assert_eq!(state.current_task, Task::Collect);
    let harvested = (flowers_at_start - flowers_remaining(&world)) as u32;
    assert_eq!(state.food, 100 + harvested);

    let walking = query::count_of_kind(&world, EntityKind::Worker) as u32;
    assert_eq!(state.workers + walking, 20);

    let claimed = query::of_kind(&world, EntityKind::Flower)
        .into_iter()
        .filter(|flower| flower.was_selected)
        .count() as u32;
    assert_eq!(claimed, walking, "every walking worker holds exactly one flower");
}

#[test]
fn pollinators_visit_flowers_without_consuming_them() {
    let (mut world, landmarks) = seeded(Scenario::Colony);
    let hub = landmarks.hub.expect("colony has a hub");
    let flowers_at_start = flowers_remaining(&world);
    let mut behaviors = Behaviors::new(peaceful());
    let click = FrameInput {
        select: true,
        cursor_world: Some(Vec2::ZERO),
        ..idle()
    };

    behaviors.update(&mut world, &click);
    behaviors.update(&mut world, &click);
    let mut most_walking = 0;
    for _ in 0..60 * 20 {
        behaviors.update(&mut world, &idle());
        most_walking = most_walking.max(query::count_of_kind(&world, EntityKind::Worker));
    }

    let state = match query::entity(&world, hub).map(|hub| &hub.payload) {
        Some(Payload::Hub(state)) => *state,
        other => panic!("unexpected hub payload {other:?}"),
    };
    assert_eq!(state.current_task, Task::Pollinate);
    assert_eq!(state.food, 100);
    assert_eq!(flowers_remaining(&world), flowers_at_start);

    let walking = query::count_of_kind(&world, EntityKind::Worker) as u32;
    assert_eq!(state.workers + walking, 20);
    assert!(most_walking > 0, "the hub dispatched pollinators");
    let claimed = query::of_kind(&world, EntityKind::Flower)
        .into_iter()
        .filter(|flower| flower.was_selected)
        .count() as u32;
    assert_eq!(claimed, walking, "returned pollinators free their flowers");
}

#[test]
fn hub_clicks_cycle_through_the_tasks() {
    let (mut world, landmarks) = seeded(Scenario::Colony);
    let hub = landmarks.hub.expect("colony has a hub");
    let mut behaviors = Behaviors::new(peaceful());
    let click = FrameInput {
        select: true,
        cursor_world: Some(Vec2::ZERO),
        ..idle()
    };

    let mut labels = Vec::new();
    for _ in 0..3 {
        behaviors.update(&mut world, &click);
        let mut queue = RenderQueue::new();
        behaviors.render_hud(&world, &landmarks, &mut queue);
        labels.push(queue.commands(Layer::Hud).iter().find_map(|command| match command {
            DrawCommand::Text { text, .. } if text.ends_with("ing") => Some(text.clone()),
            _ => None,
        }));
    }

    assert_eq!(
        labels,
        vec![
            Some(String::from("collecting")),
            Some(String::from("pollinating")),
            None
        ]
    );
    match query::entity(&world, hub).map(|hub| &hub.payload) {
        Some(Payload::Hub(state)) => assert_eq!(state.current_task, Task::None),
        other => panic!("unexpected hub payload {other:?}"),
    }
}

#[test]
fn an_unselected_hub_sends_nobody() {
    let (mut world, _) = seeded(Scenario::Colony);
    let mut behaviors = Behaviors::new(peaceful());

    run(&mut behaviors, &mut world, 300, &idle());

    assert_eq!(query::count_of_kind(&world, EntityKind::Worker), 0);
}

#[test]
fn stale_flower_handles_are_dropped() {
    let mut world = World::with_capacity(8);
    let pool = world.pool_mut();
    let hub = spawn::hub(
        pool,
        Vec2::new(-24.0, -32.0),
        Vec2::new(48.0, 64.0),
        HubState {
            food: 100,
            workers: 19,
            ..HubState::default()
        },
    );
    let flower = spawn::flower(pool, Vec2::new(200.0, 0.0));
    let worker = spawn::worker(pool, Vec2::ZERO, Task::Collect, hub, 3);
    if let Some(Payload::Worker(state)) = pool.get_mut(worker).map(|worker| &mut worker.payload) {
        state.flower = Some(flower);
    }
    assert!(world.release(flower));

    let mut behaviors = Behaviors::new(peaceful());
    behaviors.update(&mut world, &idle());

    match query::entity(&world, worker).map(|worker| &worker.payload) {
        Some(Payload::Worker(state)) => assert_eq!(state.flower, None),
        other => panic!("unexpected worker payload {other:?}"),
    }
}

#[test]
fn predators_hunt_down_workers() {
    let mut world = World::with_capacity(8);
    let pool = world.pool_mut();
    let hub = spawn::hub(pool, Vec2::new(-200.0, 0.0), Vec2::new(48.0, 64.0), HubState::default());
    let _ = spawn::worker(pool, Vec2::new(100.0, 0.0), Task::Collect, hub, 3);
    let predator = spawn::predator(pool, Vec2::new(100.0, 40.0), 2);

    let mut behaviors = Behaviors::new(peaceful());
    run(&mut behaviors, &mut world, 60 * 5, &idle());

    assert_eq!(query::count_of_kind(&world, EntityKind::Worker), 0);
    assert!(query::entity(&world, predator).is_some());
}

#[test]
fn defense_buildings_shoot_predators_in_range() {
    let mut world = World::with_capacity(16);
    let pool = world.pool_mut();
    let _ = spawn::defense_building(pool, Vec2::ZERO);
    let predator = spawn::predator(pool, Vec2::new(60.0, 0.0), 2);

    let mut behaviors = Behaviors::new(peaceful());
    behaviors.update(&mut world, &idle());
    assert_eq!(query::count_of_kind(&world, EntityKind::Projectile), 1);

    run(&mut behaviors, &mut world, 60 * 3, &idle());

    assert!(query::entity(&world, predator).is_none());
    assert_eq!(query::count_of_kind(&world, EntityKind::Projectile), 0);
}

#[test]
fn player_falls_onto_the_floor_and_jumps() {
    let (mut world, landmarks) = seeded(Scenario::Platformer);
    let player = landmarks.player.expect("platformer has a player");
    let floor_top = 148.0;
    let mut behaviors = Behaviors::new(peaceful());

    run(&mut behaviors, &mut world, 120, &idle());

    let landed = query::entity(&world, player).expect("player").clone();
    assert!(landed.grounded);
    assert_eq!(landed.bounds().bottom(), floor_top);

    behaviors.update(
        &mut world,
        &FrameInput {
            jump: true,
            ..idle()
        },
    );

    let airborne = query::entity(&world, player).expect("player");
    assert!(!airborne.grounded);
    assert!(airborne.bounds().bottom() < floor_top);
}

#[test]
fn player_runs_in_the_held_direction() {
    let (mut world, landmarks) = seeded(Scenario::Platformer);
    let player = landmarks.player.expect("player");
    let mut behaviors = Behaviors::new(peaceful());
    run(&mut behaviors, &mut world, 120, &idle());
    let start = query::entity(&world, player).expect("player").position.x;

    run(
        &mut behaviors,
        &mut world,
        30,
        &FrameInput {
            move_right: true,
            ..idle()
        },
    );

    let runner = query::entity(&world, player).expect("player");
    assert!(runner.position.x > start + 20.0);
    assert_eq!(runner.facing, 1.0);
}

#[test]
fn speed_controls_scale_the_clock() {
    let mut world = World::with_capacity(4);
    let mut behaviors = Behaviors::new(peaceful());

    behaviors.update(
        &mut world,
        &FrameInput {
            speed_up: true,
            ..idle()
        },
    );
    assert_eq!(behaviors.time_scale(), 2.0);
    assert!((world.clock().dt - 2.0 * DT).abs() < 1e-6);

    for _ in 0..2 {
        behaviors.update(
            &mut world,
            &FrameInput {
                speed_up: true,
                ..idle()
            },
        );
    }
    assert_eq!(behaviors.time_scale(), 4.0, "each press adds one step");

    for _ in 0..5 {
        behaviors.update(
            &mut world,
            &FrameInput {
                slow_down: true,
                ..idle()
            },
        );
    }
    assert_eq!(behaviors.time_scale(), 0.0);
    assert_eq!(world.clock().dt, 0.0);
}

#[test]
fn render_routes_entities_to_their_layers() {
    let (world, landmarks) = seeded(Scenario::Colony);
    let behaviors = Behaviors::new(peaceful());
    let flowers = flowers_remaining(&world);
    let mut queue = RenderQueue::new();

    behaviors.render(&world, &mut queue);
    behaviors.render_hud(&world, &landmarks, &mut queue);

    assert_eq!(queue.commands(Layer::Flora).len(), flowers);
    assert_eq!(queue.commands(Layer::Background).len(), flowers + 1);
    assert_eq!(queue.commands(Layer::Structures).len(), 3);
    assert!(queue.commands(Layer::Debug).is_empty());
    assert!(matches!(
        queue.commands(Layer::Hud).first(),
        Some(DrawCommand::SpriteStretched { dest, .. }) if *dest == Rect::new(10.0, 10.0, 32.0, 32.0)
    ));
    assert_eq!(queue.commands(Layer::Hud).len(), 4);

    let total = queue.len();
    let mut backend = RecordingBackend::new();
    queue.flush(&mut backend);
    assert_eq!(backend.calls.len(), total);
    assert!(queue.is_empty());
}

#[test]
fn collider_outlines_are_opt_in() {
    let (world, _) = seeded(Scenario::Platformer);
    let behaviors = Behaviors::new(Config {
        show_colliders: true,
        ..peaceful()
    });
    let mut queue = RenderQueue::new();

    behaviors.render(&world, &mut queue);

    let collidable = query::with_property(&world, colony_core::Property::Collidable).len();
    assert_eq!(queue.commands(Layer::Debug).len(), collidable);
}
