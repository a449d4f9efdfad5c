//! Loose structural equality for dirty-checking.

use weft_core::value::{Value, ValueKind};

/// Compares two values the way the dirty-checker does.
///
/// Sequences compare element-wise, recursively. Any two object-like values
/// — records and opaques, in any combination — compare equal *without their
/// contents being looked at*: the dirty-checker only needs to know that a
/// binding still refers to some object, and deep content comparison is
/// deliberately out of scope here. Scalars compare by identity, with
/// bit-level semantics for numbers: any NaN equals any NaN, while positive
/// and negative zero differ. Values of different kinds are never equal.
#[must_use]
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    if let (Value::Sequence(a), Value::Sequence(b)) = (a, b) {
        return a.len() == b.len() && a.iter().zip(b).all(|(a, b)| structurally_equal(a, b));
    }
    if a.kind() == ValueKind::Object && b.kind() == ValueKind::Object {
        return true;
    }
    match (a, b) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Num(a), Value::Num(b)) => {
            a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
        }
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use weft_core::value::Value;

    use super::structurally_equal;

    fn num_seq(items: &[f64]) -> Value {
        Value::Sequence(items.iter().map(|n| Value::Num(*n)).collect())
    }

    #[test]
    fn test_sequences_compare_element_wise() {
        assert!(structurally_equal(
            &num_seq(&[1.0, 2.0, 3.0]),
            &num_seq(&[1.0, 2.0, 3.0])
        ));
        assert!(!structurally_equal(
            &num_seq(&[1.0, 2.0, 3.0]),
            &num_seq(&[1.0, 2.0])
        ));
        assert!(!structurally_equal(
            &num_seq(&[1.0, 2.0, 3.0]),
            &num_seq(&[1.0, 2.0, 4.0])
        ));
    }

    #[test]
    fn test_nested_sequences_recurse() {
        let a = Value::Sequence(vec![num_seq(&[1.0]), num_seq(&[2.0])]);
        let b = Value::Sequence(vec![num_seq(&[1.0]), num_seq(&[2.0])]);
        assert!(structurally_equal(&a, &b));
    }

    #[test]
    fn test_objects_with_different_contents_are_equal() {
        // Intentional: object contents are never compared, only "still an
        // object" is observed. This is the documented dirty-check
        // looseness, not a bug.
        let a = Value::Record(vec![("x".into(), Value::Num(1.0))]);
        let b = Value::Record(vec![("x".into(), Value::Num(2.0))]);
        assert!(structurally_equal(&a, &b));

        assert!(structurally_equal(&a, &Value::Opaque("callable")));
        assert!(structurally_equal(
            &Value::Opaque("a"),
            &Value::Opaque("b")
        ));
    }

    #[test]
    fn test_nan_is_reflexively_equal() {
        assert!(structurally_equal(&Value::Num(f64::NAN), &Value::Num(f64::NAN)));
        assert!(!structurally_equal(&Value::Num(f64::NAN), &Value::Num(1.0)));
    }

    #[test]
    fn test_signed_zeros_differ() {
        assert!(!structurally_equal(&Value::Num(0.0), &Value::Num(-0.0)));
        assert!(structurally_equal(&Value::Num(0.0), &Value::Num(0.0)));
    }

    #[test]
    fn test_different_kinds_are_never_equal() {
        assert!(!structurally_equal(&Value::Num(1.0), &Value::str("1")));
        assert!(!structurally_equal(&num_seq(&[1.0]), &Value::Opaque("o")));
        assert!(!structurally_equal(&Value::Null, &Value::Bool(false)));
    }

    #[test]
    fn test_scalar_identity() {
        assert!(structurally_equal(&Value::str("a"), &Value::str("a")));
        assert!(!structurally_equal(&Value::str("a"), &Value::str("b")));
        assert!(structurally_equal(&Value::Null, &Value::Null));
        assert!(structurally_equal(&Value::Bool(true), &Value::Bool(true)));
    }
}
