/// One way of pulling a value out of a bulletin.
///
/// Parsers hold an ordered list of these and keep the first value produced.
pub(crate) trait Strategy<I: ?Sized, T> {
    fn name(&self) -> &'static str;

    fn try_extract(&self, input: &I) -> Option<T>;
}

pub(crate) fn first_success<I: ?Sized, T>(
    input: &I,
    strategies: &[&dyn Strategy<I, T>],
) -> Option<T> {
    strategies.iter().find_map(|strategy| {
        let value = strategy.try_extract(input);
        if value.is_some() {
            tracing::debug!(strategy = strategy.name(), "extraction succeeded");
        }
        value
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed(Option<u32>, &'static str);

    impl Strategy<str, u32> for Fixed {
        fn name(&self) -> &'static str {
            self.1
        }

        fn try_extract(&self, _input: &str) -> Option<u32> {
            self.0
        }
    }

    struct Counting<'a>(&'a Cell<u32>);

    impl Strategy<str, u32> for Counting<'_> {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn try_extract(&self, _input: &str) -> Option<u32> {
            self.0.set(self.0.get() + 1);
            None
        }
    }

    #[test]
    fn takes_first_success_in_order() {
        let a = Fixed(None, "a");
        let b = Fixed(Some(2), "b");
        let c = Fixed(Some(3), "c");
        assert_eq!(first_success::<str, u32>("", &[&a, &b, &c]), Some(2));
    }

    #[test]
    fn stops_after_success() {
        let calls = Cell::new(0);
        let hit = Fixed(Some(1), "hit");
        let counting = Counting(&calls);
        assert_eq!(first_success::<str, u32>("", &[&hit, &counting]), Some(1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn none_when_all_fail() {
        let a = Fixed(None, "a");
        assert_eq!(first_success::<str, u32>("", &[&a]), None);
        assert_eq!(first_success::<str, u32>("", &[]), None);
    }
}
