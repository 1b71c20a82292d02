use std::collections::HashSet;

use colony_core::{EntityHandle, EntityKind, Property};
use colony_world::{Entity, EntityPool, Payload, WorkerState};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CAPACITY: usize = 32;

#[test]
fn random_acquire_release_sequences_never_share_handles() {
    for seed in [0x51a7_u64, 0xbeef, 0x0dd5_eed5] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool = EntityPool::with_capacity(CAPACITY);
        let mut live: Vec<EntityHandle> = Vec::new();
        let mut retired: Vec<EntityHandle> = Vec::new();

        for _ in 0..2_000 {
            let acquire = live.is_empty() || (live.len() < CAPACITY && rng.gen_bool(0.55));
            if acquire {
                let handle = pool.spawn(Vec2::new(rng.gen_range(-64.0..64.0), 0.0), Vec2::ONE);
                let entity = pool.get_mut(handle).expect("fresh handle resolves");
                entity.kind = EntityKind::Worker;
                entity.payload = Payload::Worker(WorkerState::default());
                entity.add_properties(&[Property::Movable]);
                live.push(handle);
            } else {
                let victim = live.swap_remove(rng.gen_range(0..live.len()));
                assert!(pool.release(victim));
                assert_eq!(pool.slot(victim.slot()), Some(&Entity::default()));
                retired.push(victim);
            }

            let indices: HashSet<u32> = live.iter().map(EntityHandle::index).collect();
            assert_eq!(indices.len(), live.len(), "two live entities share a slot");
            assert_eq!(pool.len(), live.len());
            for handle in &live {
                assert_eq!(pool.get(*handle).map(|entity| entity.handle), Some(*handle));
            }
        }

        for handle in retired {
            if !live.contains(&handle) {
                assert!(pool.get(handle).is_none(), "retired handle resolved");
            }
        }
    }
}

#[test]
fn handles_are_listed_in_slot_order() {
    let mut pool = EntityPool::with_capacity(8);
    let handles: Vec<_> = (0..5)
        .map(|index| pool.spawn(Vec2::new(index as f32, 0.0), Vec2::ONE))
        .collect();
    assert!(pool.release(handles[1]));
    assert!(pool.release(handles[3]));

    assert_eq!(pool.handles(), vec![handles[0], handles[2], handles[4]]);
    assert_eq!(pool.handle_at(1), None);
    assert_eq!(pool.handle_at(2), Some(handles[2]));

    let refill = pool.spawn(Vec2::ZERO, Vec2::ONE);
    assert_eq!(refill.index(), 1);
    assert_eq!(pool.capacity(), 8);
}
