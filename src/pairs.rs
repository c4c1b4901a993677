/// Yields `(center, context)` for every position within `window_size` of `index`,
/// in increasing offset order. Nothing wraps around the ends of the sequence.
pub fn context_pairs(token_ids: &[usize], index: usize, window_size: usize) -> impl Iterator<Item = (usize, usize)> + '_ {

    let (start, end) = if index < token_ids.len() {
        let start = index.saturating_sub(window_size);
        let end = index.saturating_add(window_size).min(token_ids.len() - 1);
        (start, end + 1)
    } else {
        (0, 0)
    };

    (start..end)
        .filter(move |j| *j != index)
        .map(move |j| (token_ids[index], token_ids[j]))
}
