//! Property tests for ring invariants.

use medley::Node;
use medley_consistent::{strings, Config, ConsistentHash, Ring};
use proptest::prelude::*;
use std::collections::BTreeSet;

prop_compose! {
    fn arb_services()(
        names in prop::collection::btree_set("[a-z]{1,8}\\.net", 0..8),
    ) -> Vec<String> {
        names.into_iter().collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_build_is_sorted_and_complete(
        services in arb_services(),
        vnodes in 1usize..40,
        keys in prop::collection::vec(any::<Vec<u8>>(), 1..20),
    ) {
        let ring = strings(services.clone()).vnodes(vnodes).build().unwrap();
        prop_assert!(ring.store().is_sorted());
        prop_assert_eq!(ring.token_count(), services.len() * vnodes);

        for key in &keys {
            match ring.find(key) {
                Ok(service) => prop_assert!(services.contains(&service)),
                Err(err) => {
                    prop_assert!(err.is_no_services());
                    prop_assert!(services.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_update_equals_rebuild(
        before in arb_services(),
        after in arb_services(),
    ) {
        let ring = strings(before.clone()).vnodes(16).build().unwrap();
        let (updated, changed) = Ring::update(&ring, &after).unwrap();

        let old: BTreeSet<&String> = before.iter().collect();
        let new: BTreeSet<&String> = after.iter().collect();
        prop_assert_eq!(changed, old != new);

        let rebuilt = strings(after.clone()).vnodes(16).build().unwrap();
        prop_assert_eq!(updated.store().entries(), rebuilt.store().entries());
    }

    #[test]
    fn test_add_and_remove_are_idempotent(
        services in arb_services(),
        key in "[a-z0-9]{1,16}",
    ) {
        let hash = ConsistentHash::new(Config::new().with_vnodes(8)).unwrap();
        let mut nodes: Vec<Node> = services.iter().map(|s| Node::from(s.as_str())).collect();

        prop_assert_eq!(hash.add(&mut nodes), services.len());
        let found = hash.get(key.as_str());
        prop_assert_eq!(hash.add(&mut nodes), 0);
        prop_assert_eq!(hash.get(key.as_str()).ok(), found.ok());
        prop_assert_eq!(hash.token_count(), services.len() * 8);

        prop_assert_eq!(hash.remove(&mut nodes), services.len());
        prop_assert_eq!(hash.remove(&mut nodes), 0);
        prop_assert!(hash.get(key.as_str()).unwrap_err().is_no_services());
    }

    #[test]
    fn test_removal_only_moves_keys_of_removed_service(
        services in arb_services(),
        keys in prop::collection::vec("[a-z0-9]{1,12}", 1..30),
    ) {
        prop_assume!(services.len() >= 2);
        let ring = strings(services.clone()).vnodes(32).build().unwrap();
        let gone = &services[0];
        let (smaller, _) = Ring::update(&ring, &services[1..]).unwrap();

        for key in &keys {
            let owner = ring.find_str(key).unwrap();
            if &owner != gone {
                prop_assert_eq!(smaller.find_str(key).unwrap(), owner);
            }
        }
    }
}
