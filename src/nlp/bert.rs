use ndarray::{Array2, ArrayView2, Axis};

use crate::errors::{G2pError, Result};

/// Repeats each subword feature row `word2ph[i]` times, producing a
/// `(hidden, sum(word2ph))` phone-level feature matrix.
///
/// `features` is `(tokens, hidden)` and must have one row per `word2ph` entry
/// (including the two boundary tokens).
pub fn expand_features(features: ArrayView2<'_, f32>, word2ph: &[usize]) -> Result<Array2<f32>> {
    if features.nrows() != word2ph.len() {
        return Err(G2pError::Word2PhMismatch {
            expected: features.nrows(),
            actual: word2ph.len(),
        });
    }
    let hidden = features.ncols();
    let total_frames: usize = word2ph.iter().sum();
    let mut result = Array2::<f32>::zeros((hidden, total_frames));
    let mut frame_index = 0usize;

    for (row, &repeat) in features.axis_iter(Axis(0)).zip(word2ph) {
        for _ in 0..repeat {
            result.column_mut(frame_index).assign(&row);
            frame_index += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use ndarray::arr2;

    use super::*;

    #[test]
    fn rows_are_repeated_per_word2ph() {
        let features = arr2(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
        let expanded = expand_features(features.view(), &[1, 2, 1]).expect("expand");
        assert_eq!(expanded.shape(), &[2, 4]);
        assert_eq!(
            expanded,
            arr2(&[[1.0, 2.0, 2.0, 3.0], [10.0, 20.0, 20.0, 30.0]])
        );
    }

    #[test]
    fn zero_entries_contribute_no_frames() {
        let features = arr2(&[[1.0], [2.0], [3.0], [4.0]]);
        let expanded = expand_features(features.view(), &[1, 0, 2, 1]).expect("expand");
        assert_eq!(expanded, arr2(&[[1.0, 3.0, 3.0, 4.0]]));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let features = arr2(&[[1.0], [2.0]]);
        let err = expand_features(features.view(), &[1, 1, 1]).unwrap_err();
        assert!(matches!(
            err,
            G2pError::Word2PhMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }
}
