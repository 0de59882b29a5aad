//! Sequence helpers shared by the listener registries.

/// Call `f` on every item, in order.
pub fn for_each<T>(items: &[T], mut f: impl FnMut(&T)) {
    for item in items {
        f(item);
    }
}

/// Remove the first item matching `pred`. Returns it, or `None` if nothing matched.
pub fn remove_first<T>(items: &mut Vec<T>, pred: impl FnMut(&T) -> bool) -> Option<T> {
    let pos = items.iter().position(pred)?;
    Some(items.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_each_preserves_order() {
        let mut seen = Vec::new();
        for_each(&[3, 1, 2], |n| seen.push(*n));
        assert_eq!(seen, vec![3, 1, 2]);
    }

    #[test]
    fn remove_first_only_removes_one() {
        let mut items = vec!["a", "b", "a"];
        assert_eq!(remove_first(&mut items, |s| *s == "a"), Some("a"));
        assert_eq!(items, vec!["b", "a"]);
    }

    #[test]
    fn remove_first_missing_is_noop() {
        let mut items = vec![1, 2];
        assert_eq!(remove_first(&mut items, |n| *n == 9), None);
        assert_eq!(items, vec![1, 2]);
    }
}
