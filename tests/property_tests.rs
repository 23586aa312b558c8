//! Property-based tests for ged
//!
//! This module uses proptest to verify core invariants of the rule engine.
//! Property-based testing generates hundreds of random inputs to verify
//! that certain properties always hold true.

use std::io::Cursor;

use ged::{LineRange, Processor, parse_args, weave};

// Import proptest macro
use proptest::prelude::*;

fn to_input(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

fn run_with(args: &[&str], lines: &[String], streaming: bool) -> Vec<String> {
    let processor = Processor::with_streaming(parse_args(args).unwrap(), streaming);
    let mut output = Vec::new();
    processor
        .process(Cursor::new(to_input(lines)), &mut output)
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn run(args: &[&str], lines: &[String]) -> Vec<String> {
    run_with(args, lines, true)
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e ]{0,8}", 0..20)
}

/// Line-only rule snippets, including blocks and print controls
fn line_program() -> impl Strategy<Value = Vec<&'static str>> {
    let snippet = prop::sample::select(vec![
        vec!["s/a/b/"],
        vec!["s/[aeiou]/X/g"],
        vec!["p/b/"],
        vec!["d/c/"],
        vec!["d:2:"],
        vec!["p:1-3,5-:"],
        vec!["s:2:two"],
        vec![r"s/ /\n/g"],
        vec!["on/a/"],
        vec!["off/e/"],
        vec!["after/b/"],
        vec!["toggle/c/"],
        vec!["if/a/", "{", "s/^/>/", "}"],
        vec!["!if/d/", "{", "d:3-:", "}"],
        vec!["between/b/d/", "{", "d/e/", "}"],
        vec!["!between/a/c/", "{", "s/$/!/", "}"],
    ]);
    prop::collection::vec(snippet, 0..5).prop_map(|snippets| snippets.concat())
}

// ============================================================================
// Property 1: Substitution
// ============================================================================

proptest! {
    /// A substitution whose pattern cannot occur leaves every line unchanged
    #[test]
    fn prop_substitution_no_match_is_identity(
        lines in lines_strategy(),
        pattern in "[x-z]{1,5}"
    ) {
        let rule = format!("s/{}/REPLACED/g", pattern);
        prop_assert_eq!(run(&[&rule], &lines), lines);
    }

    /// Global substitution leaves no occurrence of the pattern behind
    #[test]
    fn prop_global_substitution_replaces_all(
        prefix in "[a-z]{0,10}",
        suffix in "[a-z]{0,10}",
        count in 1usize..10
    ) {
        let line = format!("{}{}{}", prefix, "foo".repeat(count), suffix);
        let output = run(&["s/foo/#/g"], &[line]);
        prop_assert_eq!(output.len(), 1);
        prop_assert!(!output[0].contains("foo"));
    }

    /// Delete never adds lines and removes exactly the matching ones
    #[test]
    fn prop_delete_removes_matching_lines(lines in lines_strategy()) {
        let output = run(&["d/a/"], &lines);
        let expected: Vec<String> = lines.iter().filter(|l| !l.contains('a')).cloned().collect();
        prop_assert_eq!(output, expected);
    }

    /// Print and delete with the same pattern partition the input
    #[test]
    fn prop_print_and_delete_partition(lines in lines_strategy()) {
        let kept = run(&["p/b/"], &lines);
        let dropped = run(&["d/b/"], &lines);
        prop_assert_eq!(kept.len() + dropped.len(), lines.len());
    }
}

// ============================================================================
// Property 2: Document rules
// ============================================================================

proptest! {
    /// Sorting sorted output changes nothing
    #[test]
    fn prop_sort_is_idempotent(lines in lines_strategy()) {
        let once = run(&["sort"], &lines);
        let twice = run(&["sort", "sort"], &lines);
        prop_assert_eq!(once, twice);
    }

    /// Reversing twice restores the input
    #[test]
    fn prop_reverse_is_an_involution(lines in lines_strategy()) {
        prop_assert_eq!(run(&["reverse", "reverse"], &lines), lines);
    }

    /// Sorting inside a block keeps the same multiset of lines
    #[test]
    fn prop_block_sort_preserves_lines(lines in lines_strategy()) {
        let mut output = run(&["if/a/", "{", "sort", "}"], &lines);
        let mut expected = lines.clone();
        output.sort();
        expected.sort();
        prop_assert_eq!(output, expected);
    }

    /// Lines outside a between range are never touched by its block
    #[test]
    fn prop_between_leaves_lines_before_start(lines in lines_strategy()) {
        let output = run(&["between/b/d/", "{", "s/.*/X/", "}"], &lines);
        let untouched = lines.iter().take_while(|l| !l.contains('b')).count();
        prop_assert_eq!(&output[..untouched], &lines[..untouched]);
    }
}

// ============================================================================
// Property 3: Weaving
// ============================================================================

proptest! {
    /// Feeding the selected lines back unchanged reproduces the input
    #[test]
    fn prop_weave_identity(
        pairs in prop::collection::vec(("[a-z]{0,5}", any::<bool>()), 0..30)
    ) {
        let lines: Vec<String> = pairs.iter().map(|(line, _)| line.clone()).collect();
        let selected: Vec<bool> = pairs.iter().map(|(_, selected)| *selected).collect();
        let subset: Vec<String> = pairs
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(line, _)| line.clone())
            .collect();

        prop_assert_eq!(weave(lines.clone(), &selected, subset), lines);
    }

    /// Every unselected line survives and every processed line is emitted
    #[test]
    fn prop_weave_keeps_all_lines(
        selected in prop::collection::vec(any::<bool>(), 0..30),
        processed_len in 0usize..40
    ) {
        let lines: Vec<String> = (0..selected.len()).map(|i| format!("line{}", i)).collect();
        let processed: Vec<String> = (0..processed_len).map(|i| format!("new{}", i)).collect();
        let unselected = selected.iter().filter(|s| !**s).count();

        let result = weave(lines, &selected, processed.clone());
        prop_assert_eq!(result.len(), unselected + processed_len);

        let emitted: Vec<&String> = result.iter().filter(|l| l.starts_with("new")).collect();
        prop_assert_eq!(emitted, processed.iter().collect::<Vec<_>>());
    }
}

// ============================================================================
// Property 4: Line ranges
// ============================================================================

proptest! {
    /// A closed range contains exactly the numbers between its bounds
    #[test]
    fn prop_range_membership(start in 1usize..50, len in 0usize..50, n in 0usize..120) {
        let end = start + len;
        let range = LineRange::parse(&format!("{}-{}", start, end)).unwrap();
        prop_assert_eq!(range.contains(n), start <= n && n <= end);
    }

    /// A list matches if any member matches
    #[test]
    fn prop_list_membership(a in 1usize..30, b in 1usize..30, n in 0usize..40) {
        let range = LineRange::parse(&format!("{}, {}-", a, b)).unwrap();
        prop_assert_eq!(range.contains(n), n == a || n >= b);
    }

    /// Open ranges agree with the single-line rules built from them
    #[test]
    fn prop_line_num_rules_match_range(lines in lines_strategy(), k in 1usize..10) {
        let head = run(&[&format!("p:-{}:", k)], &lines);
        let tail = run(&[&format!("d:-{}:", k)], &lines);
        let split = k.min(lines.len());
        prop_assert_eq!(&head[..], &lines[..split]);
        prop_assert_eq!(&tail[..], &lines[split..]);
    }
}

// ============================================================================
// Property 5: Streaming and buffered execution agree
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Line-only programs produce the same output whether or not the input
    /// is buffered first
    #[test]
    fn prop_streaming_matches_buffered(program in line_program(), lines in lines_strategy()) {
        let streamed = run_with(&program, &lines, true);
        let buffered = run_with(&program, &lines, false);
        prop_assert_eq!(streamed, buffered);
    }

    /// An empty input produces no output, whatever the program
    #[test]
    fn prop_empty_input_stays_empty(program in line_program(), document in any::<bool>()) {
        let mut program = program;
        if document {
            program.push("sort");
        }
        prop_assert!(run(&program, &[]).is_empty());
    }
}

// ============================================================================
// Regression tests
// ============================================================================

#[test]
fn test_filtered_lines_keep_control_state() {
    // the `after` marker is deleted by the next rule but still latches
    let lines: Vec<String> = ["a", "marker", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(run(&["after/marker/", "d/marker/"], &lines), vec!["b", "c"]);
}

#[test]
fn test_streaming_matches_buffered_complex() {
    let lines: Vec<String> = ["ab", "cd", "b d", "eee", "a c"].iter().map(|s| s.to_string()).collect();
    let program = ["toggle/c/", "between/b/d/", "{", r"s/ /\n/g", "}", "p:1-4:"];
    assert_eq!(run_with(&program, &lines, true), run_with(&program, &lines, false));
}
