//! Numeric validation functions

/// Validates minimum value for numeric types
///
/// Values that do not compare (NaN) pass; they are not numbers to bound.
pub fn meets_min<T: PartialOrd>(value: T, min: T) -> bool {
    !(value < min)
}

/// Validates maximum value for numeric types
pub fn meets_max<T: PartialOrd>(value: T, max: T) -> bool {
    !(value > max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_validation() {
        assert!(meets_min(10, 5));
        assert!(meets_min(5, 5));
        assert!(!meets_min(3, 5));

        assert!(meets_min(18.5, 18.0));
        assert!(!meets_min(17.9, 18.0));
        assert!(meets_min(f64::NAN, 18.0));
    }

    #[test]
    fn test_max_validation() {
        assert!(meets_max(5, 10));
        assert!(meets_max(10, 10));
        assert!(!meets_max(15, 10));

        assert!(meets_max(99.9, 100.0));
        assert!(!meets_max(100.1, 100.0));
    }
}
