/// Spreads `n_phone` phones over `n_word` subword pieces, always topping up the
/// piece with the fewest phones (lowest index on ties).
pub fn distribute_phone(n_phone: usize, n_word: usize) -> Vec<usize> {
    let mut result = vec![0usize; n_word];
    if n_word == 0 {
        return result;
    }
    for _ in 0..n_phone {
        let idx = result
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| **v)
            .map(|(i, _)| i)
            .unwrap_or(0);
        result[idx] += 1;
    }
    result
}
