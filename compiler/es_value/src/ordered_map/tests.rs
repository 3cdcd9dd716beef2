use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_insertion_order_is_kept() {
    let mut map = OrderedMap::new();
    map.insert("b", 1);
    map.insert("a", 2);
    map.insert("c", 3);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
}

#[test]
fn test_replace_keeps_position() {
    let mut map = OrderedMap::new();
    map.insert("x", 1);
    map.insert("y", 2);
    assert_eq!(map.insert("x", 10), Some(1));
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![("x", &10), ("y", &2)]);
}

#[test]
fn test_remove_reindexes_later_entries() {
    let mut map: OrderedMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    assert_eq!(map.remove("a"), Some(1));
    assert_eq!(map.get("c"), Some(&3));
    assert_eq!(map.get("b"), Some(&2));
    assert_eq!(map.len(), 2);
    assert_eq!(map.remove("missing"), None);
}

#[test]
fn test_get_mut_and_clear() {
    let mut map = OrderedMap::new();
    map.insert("k", 1);
    if let Some(v) = map.get_mut("k") {
        *v = 5;
    }
    assert_eq!(map.get("k"), Some(&5));
    map.clear();
    assert!(map.is_empty());
    assert!(!map.contains_key("k"));
}
