use proptest::prelude::*;

use canonid::{CanonicalId, EntityResolver, IndexMaintenance, LookupIndex, ResolverConfig};

// Small alphabet so words and prefixes collide often.
fn name() -> impl Strategy<Value = String> {
    prop::collection::vec("[abcAB]{1,3}", 0..3).prop_map(|words| words.join(" "))
}

fn batches() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(name(), 0..6), 1..6)
}

proptest! {
    #[test]
    fn incremental_index_equals_full_rebuild(batches in batches()) {
        let mut full = EntityResolver::default();
        let mut incremental = EntityResolver::new(
            ResolverConfig::new().with_index_maintenance(IndexMaintenance::Incremental),
        ).unwrap();

        for batch in batches {
            let a = full.resolve_batch(batch.iter().cloned()).unwrap();
            let b = incremental.resolve_batch(batch.iter().cloned()).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(incremental.index(), &LookupIndex::build(incremental.registry()));
        }
    }

    #[test]
    fn minted_ids_are_fresh_and_consecutive(batches in batches()) {
        let mut resolver = EntityResolver::default();
        let mut seen = std::collections::HashSet::new();
        for batch in batches {
            let start = resolver.next_id().get();
            let out = resolver.resolve_batch(batch).unwrap();
            let minted: Vec<i64> = out.minted().map(|r| r.id.get()).collect();
            let expected: Vec<i64> = (start..).take(minted.len()).collect();
            prop_assert_eq!(&minted, &expected);
            for id in minted {
                prop_assert!(seen.insert(id));
            }
            prop_assert_eq!(resolver.next_id().get(), start + i64::try_from(out.minted().count()).unwrap());
        }
    }

    #[test]
    fn matches_only_point_at_pre_batch_ids(batches in batches()) {
        let mut resolver = EntityResolver::default();
        for batch in batches {
            let known: std::collections::HashSet<CanonicalId> = resolver.registry().ids().into_iter().collect();
            let out = resolver.resolve_batch(batch).unwrap();
            for r in out.matched() {
                prop_assert!(known.contains(&r.id));
            }
        }
    }
}
