pub use nogran_utils_derive::trace_instrument;

#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat) => {
        match ($expr) {
            $pat => (),
            val => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    };
    ($expr:expr, $pat:pat if $pred:expr) => {{
        let val = $expr;
        match (&val) {
            $pat if $pred => (),
            #[allow(unused_variables)]
            $pat => ::core::panic!(
                "Assertion failed: Value {val:?} does not match predicate {}",
                ::core::stringify!($pred)
            ),
            _ => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Outcome {
        Stored(i64),
        Rejected,
    }

    #[trace_instrument(skip_all)]
    fn double(x: i64) -> i64 {
        x * 2
    }

    #[test]
    fn assert_matches_pattern() {
        assert_matches!(Outcome::Stored(1), Outcome::Stored(_));
        assert_matches!(Outcome::Rejected, Outcome::Rejected);
    }

    #[test]
    fn assert_matches_predicate() {
        assert_matches!(Outcome::Stored(7), Outcome::Stored(id) if *id == 7);
    }

    #[test]
    #[should_panic(expected = "did not match pattern")]
    fn assert_matches_mismatch() {
        assert_matches!(Outcome::Rejected, Outcome::Stored(_));
    }

    #[test]
    fn trace_instrument_keeps_behavior() {
        assert_eq!(double(21), 42);
    }
}
