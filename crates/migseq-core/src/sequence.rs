use crate::error::{Error, SeqResult};

/// A sequence of new majors that continues from its start without gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCheck {
    /// The new majors, ascending.
    pub validated: Vec<u64>,
    /// The last version of the sequence, which is `start` when there was
    /// nothing new.
    pub last: u64,
}

/// Check that `new_majors` is exactly `start + 1, start + 2, ...`.
///
/// The input is walked as given, so it must already be ascending and
/// deduplicated: a permutation or a repeated version fails like a gap does.
/// Stops at the first mismatch.
pub fn validate_sequence(start: u64, new_majors: &[u64]) -> SeqResult<SequenceCheck> {
    let mut expected = start;
    for &found in new_majors {
        expected = next_version(expected)?;
        log::trace!(target: "migseq", "sequence: expect V{expected}, found V{found}");
        if found != expected {
            return Err(Error::SequenceGap { expected, found });
        }
    }

    Ok(SequenceCheck {
        validated: new_majors.to_vec(),
        last: expected,
    })
}

/// The version after `version`, or an error when it does not fit in a `u64`.
pub fn next_version(version: u64) -> SeqResult<u64> {
    version
        .checked_add(1)
        .ok_or_else(|| Error::Invalid(format!("no version follows {version}")))
}

#[cfg(test)]
mod tests {
    use super::{next_version, validate_sequence};
    use crate::error::Error;

    #[test]
    fn empty_is_trivially_valid() {
        for start in [0, 1, 42, u32::MAX as u64] {
            let check = validate_sequence(start, &[]).unwrap();
            assert!(check.validated.is_empty());
            assert_eq!(check.last, start);
        }
    }

    #[test]
    fn continues_from_latest() {
        let check = validate_sequence(3, &[4, 5]).unwrap();
        assert_eq!(check.validated, vec![4, 5]);
        assert_eq!(check.last, 5);
    }

    #[test]
    fn bootstrap_starts_at_one() {
        let check = validate_sequence(0, &[1, 2]).unwrap();
        assert_eq!(check.last, 2);
    }

    #[test]
    fn gap_fails() {
        let res = validate_sequence(3, &[5]);
        assert!(matches!(res, Err(Error::SequenceGap { expected: 4, found: 5 })));
    }

    #[test]
    fn fails_at_first_break() {
        let res = validate_sequence(0, &[1, 2, 4, 9]);
        assert!(matches!(res, Err(Error::SequenceGap { expected: 3, found: 4 })));
    }

    #[test]
    fn permutation_fails() {
        let res = validate_sequence(3, &[5, 4]);
        assert!(matches!(res, Err(Error::SequenceGap { expected: 4, found: 5 })));
    }

    #[test]
    fn duplicate_fails() {
        let res = validate_sequence(3, &[4, 4]);
        assert!(matches!(res, Err(Error::SequenceGap { expected: 5, found: 4 })));
    }

    #[test]
    fn reusing_an_existing_version_fails() {
        let res = validate_sequence(3, &[3]);
        assert!(matches!(res, Err(Error::SequenceGap { expected: 4, found: 3 })));
    }

    #[test]
    fn succeeds_iff_consecutive() {
        for start in 0..4u64 {
            for k in 0..5u64 {
                let run: Vec<u64> = (start + 1..=start + k).collect();
                assert!(validate_sequence(start, &run).is_ok());
                if k > 0 {
                    let mut shifted = run.clone();
                    shifted[0] += 1;
                    assert!(validate_sequence(start, &shifted).is_err());
                }
            }
        }
    }

    #[test]
    fn nothing_after_the_largest_version() {
        assert_eq!(next_version(41).unwrap(), 42);
        assert!(matches!(next_version(u64::MAX), Err(Error::Invalid(_))));

        assert!(validate_sequence(u64::MAX - 1, &[u64::MAX]).is_ok());
        let res = validate_sequence(u64::MAX, &[u64::MAX]);
        assert!(matches!(res, Err(Error::Invalid(_))));
    }
}
