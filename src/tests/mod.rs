
use proptest::prelude::*;

/// Sequences built from runs over a small alphabet, so that equal neighbouring
/// runs (which must merge) show up often.
pub(crate) fn run_heavy_input() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((0u8..4, 1usize..24), 0..60).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(value, len)| std::iter::repeat(value).take(len))
            .collect()
    })
}

/// Number of maximal blocks of equal values.
pub(crate) fn count_runs<T: PartialEq>(input: &[T]) -> usize {
    input.len().min(1) + input.windows(2).filter(|w| w[0] != w[1]).count()
}
