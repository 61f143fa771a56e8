//! Slot lag comparison

/// Reference slot minus target slot
///
/// Positive means the target is behind; negative (target ahead) is kept as is.
pub fn slot_lag(reference_slot: u64, target_slot: u64) -> i64 {
    let diff = i128::from(reference_slot) - i128::from(target_slot);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Whether `lag` is strictly above `threshold`
pub fn exceeds_threshold(lag: i64, threshold: i64) -> bool {
    lag > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lag_positive_and_negative() {
        assert_eq!(slot_lag(100, 94), 6);
        assert_eq!(slot_lag(100, 97), 3);
        assert_eq!(slot_lag(100, 100), 0);
        assert_eq!(slot_lag(97, 100), -3);
        assert_eq!(slot_lag(0, 5), -5);
    }

    #[test]
    fn test_slot_lag_extremes_do_not_overflow() {
        assert_eq!(slot_lag(u64::MAX, 0), i64::MAX);
        assert_eq!(slot_lag(0, u64::MAX), i64::MIN);
    }

    #[test]
    fn test_exceeds_threshold_boundary() {
        assert!(!exceeds_threshold(4, 4));
        assert!(exceeds_threshold(5, 4));
        assert!(!exceeds_threshold(-10, 4));
    }
}
