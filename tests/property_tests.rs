//! Property tests for queue ordering.

use proptest::prelude::*;
use proptest::sample::subsequence;

use backoffice_api::services::order_queue::{renumber, resolve_page, splice_page};

/// Distinct active order ids, in queue order.
fn active_queue() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::hash_set(1..500i32, 0..40)
        .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn splice_keeps_every_active_order_once(
        (active, submitted) in active_queue().prop_flat_map(|active| {
            let len = active.len();
            (Just(active.clone()), subsequence(active, 0..=len).prop_shuffle())
        }),
        page in 1u64..6,
        per_page in 1u64..12,
    ) {
        let ordered = splice_page(&active, &submitted, page, per_page).unwrap();

        let mut expected = active.clone();
        expected.sort_unstable();
        let mut actual = ordered.clone();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);

        // Untouched orders keep their relative order.
        let untouched = |ids: &[i32]| -> Vec<i32> {
            ids.iter().copied().filter(|id| !submitted.contains(id)).collect()
        };
        let rest = untouched(ordered.as_slice());
        let before = untouched(active.as_slice());
        prop_assert_eq!(rest, before);

        // The submitted block sits contiguously at the page offset.
        let offset = (((page - 1) * per_page) as usize).min(active.len() - submitted.len());
        prop_assert_eq!(&ordered[offset..offset + submitted.len()], submitted.as_slice());
    }

    #[test]
    fn renumbered_positions_are_dense(ids in active_queue()) {
        let positions = renumber(&ids);
        prop_assert_eq!(positions.len(), ids.len());
        for (index, (order_id, position)) in positions.iter().enumerate() {
            prop_assert_eq!(*order_id, ids[index]);
            prop_assert_eq!(*position as usize, index + 1);
        }
    }

    #[test]
    fn resolved_page_is_always_in_range(raw in ".{0,6}", total in 0u64..50) {
        let page = resolve_page(Some(&raw), total);
        prop_assert!(page >= 1);
        prop_assert!(page <= total.max(1));
    }
}

#[test]
fn foreign_ids_are_rejected() {
    assert!(splice_page(&[1, 2, 3], &[4], 1, 10).is_err());
    assert!(splice_page(&[1, 2, 3], &[2, 2], 1, 10).is_err());
}
