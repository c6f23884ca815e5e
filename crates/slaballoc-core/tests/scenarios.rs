//! End-to-end scenarios against the public `Allocator`/`Arena`/`ArenaHashMap`
//! API, exercising the invariants a client actually depends on.

use slaballoc_core::{Allocator, AllocatorConfig, Arena, ArenaHashMap};

#[test]
fn s1_ladder_growth_from_defaults() {
    let mut allocator = Allocator::default();
    for size in [1, 2, 4, 8, 16, 32, 64, 128, 256] {
        allocator.alloc(size, 1).unwrap();
    }
    let stats = allocator.stats();
    assert_eq!(stats.lines().count(), 10); // 9 class lines + totals footer
    for size in [1, 2, 4, 8, 16, 32, 64, 128, 256] {
        assert!(stats.contains(&format!("chunkSize:{size}")));
    }
}

#[test]
fn s2_reuse_within_class() {
    let mut allocator = Allocator::default();
    let p1 = allocator.alloc(64, 1).unwrap();
    allocator.free(p1, 64).unwrap();
    let p2 = allocator.alloc(64, 1).unwrap();
    assert_eq!(p1, p2);
}

#[test]
#[should_panic(expected = "refcount went negative")]
fn s3_double_free_halts() {
    let mut allocator = Allocator::default();
    let p = allocator.alloc(64, 1).unwrap();
    allocator.free(p, 64).unwrap();
    allocator.free(p, 64).unwrap();
}

#[test]
fn s4_foreign_pointer_free_is_rejected() {
    let mut allocator = Allocator::default();
    let foreign_heap = vec![0u8; 64];
    let result = allocator.free(foreign_heap.as_ptr() as usize, 64);
    assert!(result.is_err());
    // allocator state is unaffected; a subsequent alloc still succeeds
    assert!(allocator.alloc(64, 1).is_ok());
}

#[test]
fn s5_hash_map_round_trip_under_resize() {
    let mut arena = Arena::new_default();
    let mut map: ArenaHashMap<i64, String> = ArenaHashMap::new(&mut arena).unwrap();

    for i in 0..=24i64 {
        let letter = char::from_u32('a' as u32 + i as u32).unwrap();
        map.put(&mut arena, i, letter.to_string()).unwrap();
    }

    for i in 0..=24i64 {
        let letter = char::from_u32('a' as u32 + i as u32).unwrap();
        assert_eq!(map.get(&i).unwrap(), &letter.to_string());
    }

    assert!(map.buckets_capacity() > 16);

    assert!(map.delete(&mut arena, &12).unwrap());
    assert!(map.get(&12).is_none());
    assert_eq!(map.get(&11).unwrap(), "l");

    map.free(&mut arena).unwrap();
}

#[test]
fn s6_slab_sizing_edge_case() {
    let mut allocator =
        Allocator::new(AllocatorConfig::default().with_slab_size(1024).with_growth_factor(2.0));
    allocator.alloc(2048, 1).unwrap();
    let stats = allocator.stats();
    // a 2048-byte (or larger) class exists whose slabSize equals its chunkSize,
    // i.e. exactly one chunk per slab
    assert!(stats
        .lines()
        .any(|line| line.contains("chunkSize:2048") && line.contains("slabSize:2048")));
}

#[test]
fn address_uniqueness_across_live_allocations() {
    let mut allocator = Allocator::default();
    let mut addrs = std::collections::HashSet::new();
    for _ in 0..64 {
        let p = allocator.alloc(64, 1).unwrap();
        assert!(addrs.insert(p), "address {p:#x} handed out twice while still live");
    }
}
