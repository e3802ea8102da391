//! # Sequence shaping
//!
//! Truncation and padding of index sequences to the fixed length expected by the
//! classifier. Inputs are only borrowed; every call returns freshly allocated
//! sequences, so callers never observe a buffer shared with a previous call.

use std::str::FromStr;

/// Which end of a short sequence receives the fill block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    Pre,
    Post,
}

/// Which end of a long sequence loses elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncating {
    #[default]
    Pre,
    Post,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected \"pre\" or \"post\", got \"{0}\"")]
pub struct ParseEdgeError(String);

impl FromStr for Padding {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" => Ok(Padding::Pre),
            "post" => Ok(Padding::Post),
            other => Err(ParseEdgeError(other.to_string())),
        }
    }
}

impl FromStr for Truncating {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" => Ok(Truncating::Pre),
            "post" => Ok(Truncating::Post),
            other => Err(ParseEdgeError(other.to_string())),
        }
    }
}

/// Shapes a single sequence to exactly `max_len` elements.
pub fn pad_sequence(
    seq: &[i64],
    max_len: usize,
    padding: Padding,
    truncating: Truncating,
    value: i64,
) -> Vec<i64> {
    let kept = if seq.len() > max_len {
        match truncating {
            Truncating::Pre => &seq[seq.len() - max_len..],
            Truncating::Post => &seq[..max_len],
        }
    } else {
        seq
    };

    let fill = max_len - kept.len();
    let mut shaped = Vec::with_capacity(max_len);
    match padding {
        Padding::Pre => {
            shaped.extend(std::iter::repeat(value).take(fill));
            shaped.extend_from_slice(kept);
        }
        Padding::Post => {
            shaped.extend_from_slice(kept);
            shaped.extend(std::iter::repeat(value).take(fill));
        }
    }
    shaped
}

/// Shapes every sequence of a batch to exactly `max_len` elements.
///
/// Sequences longer than `max_len` lose elements at the `truncating` edge,
/// shorter ones receive `max_len - len` copies of `value` at the `padding` edge,
/// and sequences already of length `max_len` come back unchanged.
pub fn pad_sequences<S: AsRef<[i64]>>(
    sequences: &[S],
    max_len: usize,
    padding: Padding,
    truncating: Truncating,
    value: i64,
) -> Vec<Vec<i64>> {
    sequences
        .iter()
        .map(|seq| pad_sequence(seq.as_ref(), max_len, padding, truncating, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pre_padding() {
        let out = pad_sequences(&[vec![7, 8, 9]], 5, Padding::Pre, Truncating::Pre, 0);
        assert_eq!(out, vec![vec![0, 0, 7, 8, 9]]);
    }

    #[test]
    fn test_pre_truncation() {
        let out = pad_sequences(&[vec![1, 2, 3, 4, 5, 6]], 4, Padding::Pre, Truncating::Pre, 0);
        assert_eq!(out, vec![vec![3, 4, 5, 6]]);
    }

    #[test]
    fn test_post_padding_and_post_truncation() {
        let out = pad_sequences(
            &[vec![7, 8, 9], vec![1, 2, 3, 4, 5, 6]],
            4,
            Padding::Post,
            Truncating::Post,
            -1,
        );
        assert_eq!(out, vec![vec![7, 8, 9, -1], vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_exact_length_is_unchanged() {
        let seq = vec![4, 5, 6];
        let out = pad_sequences(&[seq.clone()], 3, Padding::Post, Truncating::Post, 0);
        assert_eq!(out, vec![seq]);
    }

    #[test]
    fn test_empty_sequence_is_fully_padded() {
        let out = pad_sequences(&[Vec::<i64>::new()], 3, Padding::Pre, Truncating::Pre, 0);
        assert_eq!(out, vec![vec![0, 0, 0]]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let batch = vec![vec![1, 2, 3, 4, 5, 6]];
        let _ = pad_sequences(&batch, 2, Padding::Pre, Truncating::Pre, 0);
        let again = pad_sequences(&batch, 2, Padding::Pre, Truncating::Post, 0);
        assert_eq!(batch, vec![vec![1, 2, 3, 4, 5, 6]]);
        assert_eq!(again, vec![vec![1, 2]]);
    }

    #[test]
    fn test_parse_edges() {
        assert_eq!("pre".parse::<Padding>(), Ok(Padding::Pre));
        assert_eq!("post".parse::<Truncating>(), Ok(Truncating::Post));
        let err = "middle".parse::<Padding>().unwrap_err();
        assert!(err.to_string().contains("middle"));
    }

    fn edge() -> impl Strategy<Value = (Padding, Truncating)> {
        (any::<bool>(), any::<bool>()).prop_map(|(p, t)| {
            (
                if p { Padding::Pre } else { Padding::Post },
                if t { Truncating::Pre } else { Truncating::Post },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_output_length_is_max_len(
            seq in proptest::collection::vec(any::<i64>(), 0..64),
            max_len in 1usize..32,
            (padding, truncating) in edge()
        ) {
            let out = pad_sequence(&seq, max_len, padding, truncating, 0);
            prop_assert_eq!(out.len(), max_len);
        }

        #[test]
        fn prop_shaping_is_idempotent(
            seq in proptest::collection::vec(any::<i64>(), 0..64),
            max_len in 1usize..32,
            (padding, truncating) in edge()
        ) {
            let once = pad_sequence(&seq, max_len, padding, truncating, 0);
            let twice = pad_sequence(&once, max_len, padding, truncating, 0);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_pre_truncation_keeps_tail_in_order(
            seq in proptest::collection::vec(any::<i64>(), 0..64),
            max_len in 1usize..32
        ) {
            let out = pad_sequence(&seq, max_len, Padding::Pre, Truncating::Pre, 0);
            let kept = seq.len().min(max_len);
            prop_assert_eq!(&out[max_len - kept..], &seq[seq.len() - kept..]);
        }
    }
}
