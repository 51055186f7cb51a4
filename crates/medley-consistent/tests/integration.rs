//! End-to-end tests: rings and hashes published through the medley locators.
//!
//! Covers the full lifecycle a service-discovery client goes through: build
//! a ring, publish it behind an updatable locator, swap in updated rings
//! while readers keep going, and aggregate several locators.

use medley::{find_string, Locator, MedleyError, MultiLocator, Node, UpdatableLocator};
use medley_consistent::{strings, Config, ConsistentHash, Ring};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_publish_ring_through_updatable_locator() {
    let locator: UpdatableLocator<String> = UpdatableLocator::new();
    assert!(find_string(&locator, "test value").unwrap_err().is_no_services());

    let ring = strings(names(&["service1", "service2", "service3"]))
        .build()
        .unwrap();
    assert_eq!(locator.set(ring.clone()), 1);
    assert_eq!(find_string(&locator, "test value").unwrap(), "service2");

    let (updated, changed) =
        Ring::update(&ring, &names(&["service1", "service2", "service3", "new1"])).unwrap();
    assert!(changed);
    assert_eq!(locator.set(updated), 2);
    assert_eq!(find_string(&locator, "test value").unwrap(), "new1");

    assert_eq!(locator.clear(), 3);
    assert!(find_string(&locator, "test value").unwrap_err().is_no_services());
}

#[test]
fn test_no_op_update_is_not_republished() {
    let locator: UpdatableLocator<String> = UpdatableLocator::new();
    let mut current = strings(names(&["a.net", "b.net"])).build().unwrap();
    locator.set(current.clone());

    for round in 0..4 {
        let targets = if round % 2 == 0 {
            names(&["b.net", "a.net"])
        } else {
            names(&["a.net", "b.net", "c.net"])
        };

        let (next, changed) = Ring::update(&current, &targets).unwrap();
        if changed {
            locator.set(next.clone());
        }
        current = next;
    }

    // only round 0 left the membership alone
    assert_eq!(locator.version(), 4);
    assert_eq!(current.len(), 3);
}

#[test]
fn test_readers_during_swaps() {
    let locator: Arc<UpdatableLocator<String>> = Arc::new(UpdatableLocator::new());
    let small = strings(names(&["a.net", "b.net"])).vnodes(20).build().unwrap();
    let (large, _) = Ring::update(&small, &names(&["a.net", "b.net", "c.net"])).unwrap();
    locator.set(small.clone());

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut i = 0u64;
                while !done.load(Ordering::Relaxed) {
                    let service = find_string(&*locator, &format!("object-{}", i)).unwrap();
                    assert!(["a.net", "b.net", "c.net"].contains(&service.as_str()));
                    i += 1;
                }
            });
        }

        s.spawn(|| {
            for round in 0..100 {
                if round % 2 == 0 {
                    locator.set(large.clone());
                } else {
                    locator.set(small.clone());
                }
            }
            done.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(locator.version(), 101);
}

#[test]
fn test_multi_locator_over_rings() {
    let east = strings(names(&["east1", "east2"])).build().unwrap();
    let west = strings(names(&["west1", "west2", "west3"])).build().unwrap();
    let empty = strings(Vec::<String>::new()).build().unwrap();

    let multi: MultiLocator<String> = MultiLocator::new();
    assert!(multi.find_string("key").unwrap_err().is_no_services());

    multi.add(empty.clone());
    assert!(multi.find_string("key").unwrap_err().is_no_services());

    let east: Arc<dyn Locator<String>> = east;
    multi.add(east.clone());
    multi.add(west);

    let found = multi.find_string("key").unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|s| s.starts_with("east")));
    assert!(found.iter().any(|s| s.starts_with("west")));

    assert!(multi.remove(&east));
    assert!(!multi.remove(&east));
    let found = multi.find_string("key").unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].starts_with("west"));
}

#[test]
fn test_consistent_hash_as_locator() {
    let hash = Arc::new(ConsistentHash::new(Config::default()).unwrap());
    let locator: UpdatableLocator<Node> = UpdatableLocator::with_locator(hash.clone());
    assert!(matches!(
        locator.find(b"key"),
        Err(MedleyError::NoServices)
    ));

    hash.add(&mut vec![
        Node::from("hostname-first.com"),
        Node::from("hostname-second.com"),
    ]);
    assert_eq!(locator.find(b"key").unwrap(), "hostname-first.com");
    assert_eq!(locator.version(), 1);
}

#[test]
fn test_ring_and_hash_agree_through_membership_changes() {
    let hash = ConsistentHash::new(Config::new().with_vnodes(64)).unwrap();
    let mut ring = strings(Vec::<String>::new()).vnodes(64).build().unwrap();

    let steps: [&[&str]; 4] = [
        &["alpha.net", "beta.net"],
        &["alpha.net", "beta.net", "gamma.net", "delta.net"],
        &["beta.net", "delta.net"],
        &["epsilon.net", "beta.net"],
    ];

    for step in steps {
        let nodes: Vec<Node> = step.iter().map(|&n| Node::from(n)).collect();
        hash.rehash(&nodes);
        ring = Ring::update(&ring, &names(step)).unwrap().0;

        for i in 0..200 {
            let key = format!("object-{}", i);
            assert_eq!(hash.get(key.as_str()).unwrap(), ring.find_str(&key).unwrap().as_str());
        }
    }
}
