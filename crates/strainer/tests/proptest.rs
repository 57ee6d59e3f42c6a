//! Property-based tests for strainer using proptest.

use proptest::prelude::*;
use strainer::{
    filter, sort, Defaults, Dir, Filter, FilterType, MemoryExecutor, Number, Op, Pagination,
    Request, Resolve, Sort, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct TestItem {
    id: usize,
    value: i64,
    name: String,
    score: Option<f64>,
}

impl Resolve for TestItem {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        match field {
            "id" => Some(Value::Number(Number::from(self.id))),
            "value" => Some(Value::Number(Number::I64(self.value))),
            "name" => Some(Value::String(&self.name)),
            "score" => Some(self.score.map(Number::F64).into()),
            _ => None,
        }
    }
}

fn items_strategy(max: usize) -> impl Strategy<Value = Vec<TestItem>> {
    prop::collection::vec(
        (
            -50i64..50,
            "[a-cA-C]{1,4}",
            prop::option::of(-10.0f64..10.0),
        ),
        0..max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (value, name, score))| TestItem {
                id,
                value,
                name,
                score,
            })
            .collect()
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop::sample::select(vec![
        Op::Eq,
        Op::Neq,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
    ])
}

fn string_op_strategy() -> impl Strategy<Value = Op> {
    prop::sample::select(vec![
        Op::Eq,
        Op::Eqic,
        Op::Neq,
        Op::Neqic,
        Op::Like,
        Op::Likeic,
        Op::Gt,
        Op::Lte,
        Op::IsNull,
        Op::IsNotNull,
    ])
}

fn filter_strategy() -> impl Strategy<Value = Filter> {
    (op_strategy(), -50i64..50, string_op_strategy(), "[a-cA-C]{1,2}").prop_map(
        |(value_op, threshold, name_op, name)| {
            Filter::new()
                .and_typed("value", value_op, &threshold.to_string(), FilterType::Integer)
                .and("name", name_op, &name)
        },
    )
}

fn dir_strategy() -> impl Strategy<Value = Dir> {
    prop::sample::select(vec![Dir::Asc, Dir::Desc])
}

fn ids(items: &[&TestItem]) -> Vec<usize> {
    items.iter().map(|item| item.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Filtering a filtered collection again changes nothing.
    #[test]
    fn filter_is_idempotent(items in items_strategy(60), f in filter_strategy()) {
        let once: Vec<TestItem> = filter(&items, Some(&f)).unwrap().into_iter().cloned().collect();
        let twice = filter(&once, Some(&f)).unwrap();
        prop_assert_eq!(ids(&twice), once.iter().map(|i| i.id).collect::<Vec<_>>());
    }

    /// Filtering keeps a subsequence of the input.
    #[test]
    fn filter_preserves_order(items in items_strategy(60), f in filter_strategy()) {
        let kept = ids(&filter(&items, Some(&f)).unwrap());
        prop_assert!(kept.len() <= items.len());
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }

    /// Sorting is a permutation of the input.
    #[test]
    fn sort_is_a_permutation(
        items in items_strategy(60),
        value_dir in dir_strategy(),
        score_dir in dir_strategy(),
    ) {
        let s = Sort::new().by("score", score_dir).by("value", value_dir);
        let mut sorted = ids(&sort(&items, Some(&s)).unwrap());
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..items.len()).collect::<Vec<_>>());
    }

    /// Adjacent results are ordered by the key, and ties keep input order.
    #[test]
    fn sort_is_ordered_and_stable(items in items_strategy(60), dir in dir_strategy()) {
        let sorted = sort(&items, Some(&Sort::new().by("value", dir))).unwrap();
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match dir {
                Dir::Asc => prop_assert!(a.value <= b.value),
                Dir::Desc => prop_assert!(a.value >= b.value),
            }
            if a.value == b.value {
                prop_assert!(a.id < b.id);
            }
        }
    }

    /// The page length follows from the window and the total.
    #[test]
    fn page_length_matches_window(
        items in items_strategy(80),
        limit in 0usize..40,
        offset in 0usize..100,
    ) {
        let page = Request::new()
            .pagination(Pagination::new(limit, offset))
            .process(&items, &Defaults::default())
            .unwrap();
        let total = page.pagination.total;
        prop_assert_eq!(total, items.len());
        prop_assert_eq!(page.len(), limit.min(total.saturating_sub(offset)));
        prop_assert!(page.len() <= page.pagination.limit);
    }

    /// The total counts filtered items, before windowing.
    #[test]
    fn total_is_filtered_size(items in items_strategy(60), f in filter_strategy()) {
        let expected = filter(&items, Some(&f)).unwrap().len();
        let page = Request::new()
            .filter(f)
            .pagination(Pagination::new(3, 0))
            .process(&items, &Defaults::default())
            .unwrap();
        prop_assert_eq!(page.pagination.total, expected);
    }

    /// An empty collection yields an empty page whatever the request.
    #[test]
    fn empty_input_yields_empty_page(
        f in filter_strategy(),
        dir in dir_strategy(),
        limit in prop::option::of(0usize..50),
        offset in prop::option::of(0usize..50),
    ) {
        let items: Vec<TestItem> = Vec::new();
        let page = Request::new()
            .filter(f)
            .sort(Sort::new().by("name", dir))
            .pagination(Pagination { limit, offset })
            .process(&items, &Defaults::default())
            .unwrap();
        prop_assert_eq!(page.pagination.total, 0);
        prop_assert!(page.is_empty());
    }

    /// Delegated execution through the memory executor matches in-memory
    /// processing.
    #[test]
    fn delegated_matches_in_memory(
        items in items_strategy(60),
        f in filter_strategy(),
        dir in dir_strategy(),
        limit in 0usize..20,
        offset in 0usize..30,
    ) {
        let request = Request::new()
            .filter(f)
            .sort(Sort::new().by("value", dir).asc("name"))
            .pagination(Pagination::new(limit, offset));

        let local = request.process(&items, &Defaults::default()).unwrap();
        let executor = MemoryExecutor::new(items.clone());
        let remote = request.execute(&executor, &[], &Defaults::default()).unwrap();

        prop_assert_eq!(local.pagination, remote.pagination);
        prop_assert_eq!(local.cloned().result, remote.result);
    }

    /// Case-insensitive equality agrees with lowercasing both sides.
    #[test]
    fn eqic_matches_lowercase_equality(items in items_strategy(40), needle in "[a-cA-C]{1,3}") {
        let kept = filter(&items, Some(&Filter::new().and("name", Op::Eqic, &needle))).unwrap();
        let expected: Vec<usize> = items
            .iter()
            .filter(|item| item.name.to_lowercase() == needle.to_lowercase())
            .map(|item| item.id)
            .collect();
        prop_assert_eq!(ids(&kept), expected);
    }
}
