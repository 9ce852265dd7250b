use rankset::{Node, ScoreRange, SortedSet};

type Board = SortedSet<&'static str, i32, &'static str>;

fn check_order(nodes: &[&Node<&'static str, i32, &'static str>], expected: &[&str]) {
    let keys: Vec<&str> = nodes.iter().map(|n| *n.key()).collect();
    assert_eq!(keys, expected);
}

fn scenario() -> Board {
    let mut set = SortedSet::new();
    set.add_or_update("a", 89, "Kelly");
    set.add_or_update("b", 100, "Staley");
    set.add_or_update("c", 100, "Jordon");
    set.add_or_update("d", -321, "Park");
    set.add_or_update("e", 101, "Albert");
    set.add_or_update("f", 99, "Lyman");
    set.add_or_update("g", 99, "Singleton");
    set.add_or_update("h", 70, "Audrey");
    set.add_or_update("e", 99, "ntrnrt");
    set.remove("b");
    set
}

#[test]
fn test_rank_queries_with_collisions() {
    let mut set = scenario();

    assert_eq!(*set.get_by_rank(3).unwrap().key(), "a");
    assert_eq!(*set.get_by_rank(-3).unwrap().key(), "f");

    check_order(&set.get_by_rank_range(1, -1), &["d", "h", "a", "e", "f", "g", "c"]);

    let removed = set.remove_by_rank_range(-2, -3);
    let removed: Vec<_> = removed.iter().map(|n| *n.key()).collect();
    assert_eq!(removed, ["g", "f"]);

    check_order(&set.get_by_rank_range(-1, 1), &["c", "e", "a", "h", "d"]);
    assert_eq!(set.len(), 5);
}

#[test]
fn test_score_range_queries() {
    let set = scenario();
    let all = ScoreRange::new();

    check_order(&set.get_by_score_range(&-500, &500, all), &["d", "h", "a", "e", "f", "g", "c"]);
    check_order(&set.get_by_score_range(&500, &-500, all), &["c", "g", "f", "e", "a", "h", "d"]);
    check_order(&set.get_by_score_range(&600, &500, all), &[]);
    check_order(&set.get_by_score_range(&500, &600, all), &[]);
    check_order(&set.get_by_score_range(&99, &100, all), &["e", "f", "g", "c"]);
    check_order(&set.get_by_score_range(&90, &50, all), &["a", "h"]);

    check_order(&set.get_by_score_range(&99, &100, ScoreRange::new().exclude_start()), &["c"]);
    check_order(&set.get_by_score_range(&100, &99, ScoreRange::new().exclude_start()), &["g", "f", "e"]);
    check_order(&set.get_by_score_range(&99, &100, ScoreRange::new().exclude_end()), &["e", "f", "g"]);
    check_order(&set.get_by_score_range(&100, &99, ScoreRange::new().exclude_end()), &["c"]);

    check_order(&set.get_by_score_range(&50, &100, ScoreRange::new().limit(2)), &["h", "a"]);
    check_order(&set.get_by_score_range(&100, &50, ScoreRange::new().limit(2)), &["c", "g"]);
}

#[test]
fn test_pop_extremes() {
    let mut set = scenario();

    assert_eq!(*set.peek_min().unwrap().key(), "d");
    let min = set.pop_min().unwrap();
    assert_eq!((*min.key(), *min.score(), *min.value()), ("d", -321, "Park"));
    assert_eq!(set.len(), 6);
    check_order(&set.get_by_score_range(&-500, &500, ScoreRange::new()), &["h", "a", "e", "f", "g", "c"]);

    assert_eq!(*set.peek_max().unwrap().key(), "c");
    assert_eq!(*set.pop_max().unwrap().key(), "c");
    assert_eq!(set.len(), 5);
    check_order(&set.get_by_score_range(&500, &-500, ScoreRange::new()), &["g", "f", "e", "a", "h"]);

    assert_eq!(*set.peek_min().unwrap().key(), "h");
    assert_eq!(*set.peek_max().unwrap().key(), "g");
}

#[test]
fn test_find_rank_matches_enumeration() {
    let set = scenario();
    for (pos, node) in set.iter().enumerate() {
        let rank = set.find_rank(node.key());
        assert_eq!(rank, pos + 1);
        assert_eq!(set.get_by_rank(rank as isize).unwrap().key(), node.key());
    }
    assert_eq!(set.find_rank("b"), 0);
    assert_eq!(set.find_rank("missing"), 0);
}

#[test]
fn test_same_score_update_is_value_only() {
    let mut set = scenario();
    let rank = set.find_rank("f");
    assert!(!set.add_or_update("f", 99, "first"));
    assert!(!set.add_or_update("f", 99, "second"));
    assert_eq!(set.find_rank("f"), rank);
    assert_eq!(*set.get_by_key("f").unwrap().value(), "second");
    check_order(&set.get_by_rank_range(1, -1), &["d", "h", "a", "e", "f", "g", "c"]);
}

#[test]
fn test_rescore_moves_entry() {
    let mut set = scenario();
    assert!(!set.add_or_update("d", 1_000, "Park"));
    assert_eq!(set.find_rank("d"), 7);
    assert_eq!(*set.peek_max().unwrap().key(), "d");
    assert_eq!(*set.peek_min().unwrap().key(), "h");
}

#[test]
fn test_iter_by_rank_range() {
    let set = scenario();

    let mut seen = Vec::new();
    set.iter_by_rank_range(2, -2, |k, v| {
        seen.push((*k, *v));
        true
    });
    assert_eq!(
        seen,
        [("h", "Audrey"), ("a", "Kelly"), ("e", "ntrnrt"), ("f", "Lyman"), ("g", "Singleton")]
    );

    let mut seen = Vec::new();
    set.iter_by_rank_range(-2, 2, |k, _| {
        seen.push(*k);
        true
    });
    assert_eq!(seen, ["g", "f", "e", "a", "h"]);

    let mut calls = 0;
    set.iter_by_rank_range(1, -1, |_, _| {
        calls += 1;
        false
    });
    assert_eq!(calls, 1);
}

#[test]
fn test_out_of_range_ranks() {
    let set = scenario();
    assert!(set.get_by_rank(8).is_none());
    assert!(set.get_by_rank_range(8, 20).is_empty());
    // Ranks at or below zero clamp to the first entry.
    assert_eq!(*set.get_by_rank(0).unwrap().key(), "d");
    assert_eq!(*set.get_by_rank(-100).unwrap().key(), "d");
    check_order(&set.get_by_rank_range(5, 100), &["f", "g", "c"]);
}

#[test]
fn test_serde_json_round_trip() {
    let set = scenario();
    let json = serde_json::to_string(&set).unwrap();
    assert!(json.starts_with(r#"[["d",-321,"Park"],["h",70,"Audrey"]"#));

    let back: SortedSet<String, i32, String> = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = back.keys().map(String::as_str).collect();
    assert_eq!(keys, ["d", "h", "a", "e", "f", "g", "c"]);
    assert_eq!(back.find_rank("e"), 4);
}

#[test]
fn test_large_set_ranks() {
    let mut set = SortedSet::with_seed(2024);
    for i in 0..10_000u32 {
        set.add_or_update(i, i % 100, ());
    }
    assert_eq!(set.len(), 10_000);
    // Scores 0..100, 100 keys each, ordered by key inside a score.
    assert_eq!(*set.get_by_rank(1).unwrap().key(), 0);
    assert_eq!(*set.get_by_rank(2).unwrap().key(), 100);
    assert_eq!(*set.get_by_rank(101).unwrap().key(), 1);
    assert_eq!(*set.get_by_rank(-1).unwrap().key(), 9_999);
    assert_eq!(set.find_rank(&250), 5_003);

    let removed = set.remove_by_rank_range(1, 5_000);
    assert_eq!(removed.len(), 5_000);
    assert_eq!(set.len(), 5_000);
    assert_eq!(*set.peek_min().unwrap().score(), 50);
    for node in &removed {
        assert!(!set.contains_key(node.key()));
    }
}
