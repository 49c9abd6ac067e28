//! Integration tests for the parsing module.
//!
//! Fixture documents (.md) live in `fixtures/`; their rendered outlines are
//! kept as inline `insta` snapshots next to each test.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{
    BlockKind, BlockRange, FRONTMATTER_KEY, IncompleteTasks, Outline, ParseOptions, ROOT_KEY,
    parse_outline,
};

fn parse(md: &str) -> Outline {
    parse_with(md, &ParseOptions::default())
}

fn parse_with(md: &str, options: &ParseOptions) -> Outline {
    let outline = parse_outline(md, options);
    invariants::check(&outline);
    outline
}

fn range(outline: &Outline, key: &str) -> Option<(usize, usize)> {
    outline.blocks.range(key).map(|r| (r.start, r.end))
}

fn keys(outline: &Outline) -> Vec<&str> {
    outline.blocks.keys().collect()
}

/// Parses a fixture and renders it for snapshotting.
///
/// Fixture files end with a newline that the scan would count as an extra
/// blank line, so it is dropped first.
fn fixture(name: &str, options: &ParseOptions) -> String {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();
    let md = md.strip_suffix('\n').unwrap_or(&md);
    normalize::normalize(&parse_with(md, options))
        .trim_end()
        .to_string()
}

// Fixture-based snapshot tests

#[test]
fn fixture_headings_and_content() {
    insta::assert_snapshot!(fixture("headings_and_content", &ParseOptions::default()), @r"
    h1 #Introduction 1..=3
    content #Introduction#{1} 2..=3
    h1 #Getting Started 4..=6
    content #Getting Started#{1} 5..=6
    h1 #Conclusion 7..=8
    content #Conclusion#{1} 8..=8
    ");
}

#[test]
fn fixture_frontmatter_and_tasks() {
    insta::assert_snapshot!(fixture("frontmatter_and_tasks", &ParseOptions::default()), @r"
    frontmatter #---frontmatter--- 1..=4
    content # 5..=7
    list #{1} 6..=7
    h1 #Plan 8..=17
    list #Plan#{1} 9..=11
    list #Plan#{2} 12..=12
    content #Plan#{3} 13..=14
    h2 #Plan#Details 15..=17
    list #Plan#Details#{1} 16..=16
    list #Plan#Details#{2} 17..=17
    task_lines [6, 9, 10, 11, 12]
    incomplete all=[6, 9, 10] top=[6, 9]
    ");
}

#[test]
fn fixture_duplicates_and_skips() {
    insta::assert_snapshot!(fixture("duplicates_and_skips", &ParseOptions::default()), @r"
    h1 #Overview 1..=2
    content #Overview#{1} 2..=2
    h1 #Overview[2] 3..=7
    h2 #Overview[2]#Notes 4..=5
    content #Overview[2]#Notes#{1} 5..=5
    h2 #Overview[2]#Notes#{2} 6..=7
    h4 #Overview[2]#Notes#{2}##Deep dive 7..=7
    h1 #Details 8..=8
    h1 #Overview[3] 9..=10
    h3 #Overview[3]##Skipped 10..=10
    ");
}

#[test]
fn fixture_fenced_code() {
    insta::assert_snapshot!(fixture("fenced_code", &ParseOptions::default()), @r"
    content # 1..=4
    h1 #Usage 5..=12
    content #Usage#{1} 6..=9
    list #Usage#{2} 10..=12
    codeblock 1..=3
    codeblock 6..=8
    ");
}

#[test]
fn fixture_line_keys() {
    let options = ParseOptions::new()
        .with_line_keys(true)
        .with_list_key_word_len(3);
    insta::assert_snapshot!(fixture("line_keys", &options), @r"
    h1 #Shopping 1..=5
    list #Shopping#longest list item 2..=2
    list #Shopping#buy milk 3..=3
    list #Shopping#buy milk#{2} 4..=4
    content #Shopping#{1} 5..=5
    task_lines [2]
    incomplete all=[2] top=[2]
    ");
}

// End-to-end examples

#[test]
fn sibling_headings_with_content() {
    let md = "# Introduction\nWelcome to the documentation.\n\n# Getting Started\nFollow these steps to begin.\n\n# Conclusion\nThank you for reading.";
    let outline = parse(md);
    let expected: Vec<(&str, BlockRange)> = vec![
        ("#Introduction", (1, 3).into()),
        ("#Introduction#{1}", (2, 3).into()),
        ("#Getting Started", (4, 6).into()),
        ("#Getting Started#{1}", (5, 6).into()),
        ("#Conclusion", (7, 8).into()),
        ("#Conclusion#{1}", (8, 8).into()),
    ];
    let actual: Vec<(&str, BlockRange)> = outline
        .blocks
        .iter()
        .map(|b| (b.key.as_str(), b.range))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn top_level_duplicate_titles_are_bracketed() {
    let outline = parse("# Overview\n# Overview\n# Details\n# Overview");
    assert_eq!(
        keys(&outline),
        vec!["#Overview", "#Overview[2]", "#Details", "#Overview[3]"]
    );
}

#[test]
fn heading_inside_fence_is_not_a_heading() {
    let outline = parse("```\n # Heading \n```");
    assert_eq!(keys(&outline), vec![ROOT_KEY]);
    assert_eq!(range(&outline, ROOT_KEY), Some((1, 3)));
    assert_eq!(outline.codeblock_ranges, vec![BlockRange::new(1, 3)]);
}

#[test]
fn task_lines_under_heading() {
    let outline = parse("# Heading\n- [ ] todo\ntext\n- [x] done");
    assert_eq!(outline.task_lines, vec![2, 4]);
    assert_eq!(
        outline.tasks.incomplete,
        Some(IncompleteTasks {
            all: vec![2],
            top: vec![2],
        })
    );
}

#[test]
fn line_derived_list_key() {
    let options = ParseOptions::new()
        .with_line_keys(true)
        .with_list_key_word_len(3);
    let outline = parse_with("# Heading\n- [ ] the longest list item one", &options);
    assert_eq!(range(&outline, "#Heading#longest list item"), Some((2, 2)));
}

// Structure

#[rstest]
#[case("# A\n### C\n## B", &["#A", "#A##C", "#A#B"])]
#[case("### Deep\n# Top", &["###Deep", "#Top"])]
#[case("## A\n# A", &["##A", "#A[2]"])]
#[case("# A\n## X\n### X\n## X", &["#A", "#A#X", "#A#X#X", "#A#X#{2}"])]
fn heading_keys(#[case] md: &str, #[case] expected: &[&str]) {
    assert_eq!(keys(&parse(md)), expected);
}

#[test]
fn level_skip_ranges() {
    let outline = parse("# A\n### C\n## B\ntext");
    assert_eq!(range(&outline, "#A"), Some((1, 4)));
    assert_eq!(range(&outline, "#A##C"), Some((2, 2)));
    assert_eq!(range(&outline, "#A#B"), Some((3, 4)));
    assert_eq!(range(&outline, "#A#B#{1}"), Some((4, 4)));
}

#[test]
fn root_content_stays_open_across_list_items() {
    let outline = parse("text\n- item\nmore text\n# H");
    assert_eq!(keys(&outline), vec![ROOT_KEY, "#{1}", "#H"]);
    assert_eq!(range(&outline, ROOT_KEY), Some((1, 3)));
    assert_eq!(range(&outline, "#{1}"), Some((2, 2)));
    assert_eq!(range(&outline, "#H"), Some((4, 4)));
}

#[test]
fn root_content_opened_after_list_item() {
    let outline = parse("- a\ntext");
    assert_eq!(keys(&outline), vec!["#{1}", ROOT_KEY]);
    assert_eq!(range(&outline, "#{1}"), Some((1, 1)));
    assert_eq!(range(&outline, ROOT_KEY), Some((2, 2)));
}

#[test]
fn nested_content_run_gets_new_counter_after_list() {
    let outline = parse("# H\nintro\n- one\n  continued\nafter");
    assert_eq!(
        keys(&outline),
        vec!["#H", "#H#{1}", "#H#{2}", "#H#{3}"]
    );
    assert_eq!(range(&outline, "#H#{1}"), Some((2, 2)));
    assert_eq!(range(&outline, "#H#{2}"), Some((3, 4)));
    assert_eq!(range(&outline, "#H#{3}"), Some((5, 5)));
    assert_eq!(outline.blocks.get("#H#{2}").map(|b| b.kind), Some(BlockKind::ListItem));
}

#[test]
fn indented_line_without_list_item_is_content() {
    let outline = parse("# H\n    indented text");
    assert_eq!(range(&outline, "#H#{1}"), Some((2, 2)));
    assert_eq!(
        outline.blocks.get("#H#{1}").map(|b| b.kind),
        Some(BlockKind::ContentRun)
    );
}

#[test]
fn blank_lines_stay_in_open_block() {
    let outline = parse("# H\n- item\n\n\n# Next");
    assert_eq!(range(&outline, "#H#{1}"), Some((2, 4)));
    assert_eq!(range(&outline, "#H"), Some((1, 4)));
}

#[test]
fn sub_block_counter_is_shared_by_lists_and_runs() {
    let outline = parse("# H\na\n- b\n- c\nd\n- e");
    assert_eq!(
        keys(&outline),
        vec!["#H", "#H#{1}", "#H#{2}", "#H#{3}", "#H#{4}", "#H#{5}"]
    );
}

// Frontmatter

#[test]
fn frontmatter_only_on_first_line() {
    let outline = parse("# T\n---\nx\n---");
    assert!(!outline.blocks.contains_key(FRONTMATTER_KEY));
    assert_eq!(range(&outline, "#T#{1}"), Some((2, 4)));
}

#[test]
fn unterminated_frontmatter_runs_to_end() {
    let outline = parse("---\ntitle: x\n# not a heading");
    assert_eq!(keys(&outline), vec![FRONTMATTER_KEY]);
    assert_eq!(range(&outline, FRONTMATTER_KEY), Some((1, 3)));
}

#[test]
fn frontmatter_hides_tasks() {
    let outline = parse("---\n- [ ] hidden\n---\n- [ ] shown");
    assert_eq!(outline.task_lines, vec![4]);
    assert_eq!(range(&outline, FRONTMATTER_KEY), Some((1, 3)));
    assert_eq!(range(&outline, "#{1}"), Some((4, 4)));
}

// Fences and tasks

#[test]
fn tasks_inside_fences_are_ignored() {
    let outline = parse("```\n- [ ] example\n```\n- [ ] real");
    assert_eq!(outline.task_lines, vec![4]);
}

#[test]
fn nested_incomplete_task_is_not_top() {
    let outline = parse("- parent\n  - [ ] child");
    assert_eq!(outline.task_lines, vec![2]);
    assert_eq!(
        outline.tasks.incomplete,
        Some(IncompleteTasks {
            all: vec![2],
            top: vec![],
        })
    );
}

#[test]
fn fence_under_heading_opens_sub_block() {
    let outline = parse("# H\n```\ncode\n```\n# Next");
    assert_eq!(range(&outline, "#H#{1}"), Some((2, 4)));
    assert_eq!(outline.codeblock_ranges, vec![BlockRange::new(2, 4)]);
}

#[test]
fn unterminated_fence_has_no_range() {
    let outline = parse("# H\n```\n# still code");
    assert!(outline.codeblock_ranges.is_empty());
    assert_eq!(keys(&outline), vec!["#H", "#H#{1}"]);
    assert_eq!(range(&outline, "#H#{1}"), Some((2, 3)));
}

// Options and edge cases

#[test]
fn start_index_renumbers_everything() {
    let md = "# A\n- [ ] t\n```\nx\n```";
    let outline = parse_with(md, &ParseOptions::new().with_start_index(0));
    assert_eq!(range(&outline, "#A"), Some((0, 4)));
    assert_eq!(range(&outline, "#A#{1}"), Some((1, 4)));
    assert_eq!(outline.task_lines, vec![1]);
    assert_eq!(outline.codeblock_ranges, vec![BlockRange::new(2, 4)]);

    let shifted = parse_with(md, &ParseOptions::new().with_start_index(100));
    assert_eq!(range(&shifted, "#A"), Some((100, 104)));
}

#[test]
fn crlf_line_endings() {
    let outline = parse("# A\r\n- [ ] task\r\ntext\r\n");
    assert_eq!(range(&outline, "#A"), Some((1, 4)));
    assert_eq!(range(&outline, "#A#{1}"), Some((2, 2)));
    assert_eq!(range(&outline, "#A#{2}"), Some((3, 4)));
    assert_eq!(outline.task_lines, vec![2]);
}

#[test]
fn trailing_newline_counts_as_a_line() {
    let outline = parse("# A\ntext\n");
    assert_eq!(range(&outline, "#A"), Some((1, 3)));
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("   \n\t")]
fn empty_documents_have_no_blocks(#[case] md: &str) {
    let outline = parse(md);
    assert!(outline.blocks.is_empty());
    assert!(outline.task_lines.is_empty());
    assert!(outline.tasks.incomplete.is_none());
    assert!(outline.codeblock_ranges.is_empty());
}

#[test]
fn heading_titled_like_a_suffix_does_not_collide() {
    let outline = parse("# A[2]\n# A\n# A");
    assert_eq!(keys(&outline), vec!["#A[2]", "#A", "#A[3]"]);
}

#[test]
fn many_duplicate_headings_degrade_gracefully() {
    let md = "# Same\n".repeat(1000);
    let outline = parse(&md);
    assert_eq!(outline.blocks.len(), 1000);
    assert!(outline.blocks.contains_key("#Same[1000]"));
}

#[test]
fn parsing_is_deterministic() {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/frontmatter_and_tasks.md")).unwrap();
    let options = ParseOptions::new().with_line_keys(true);
    let first = serde_json::to_string(&parse_with(&md, &options)).unwrap();
    let second = serde_json::to_string(&parse_with(&md, &options)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_output_shape() {
    let outline = parse("# Heading\n- [ ] todo\ntext\n- [x] done");
    let json = serde_json::to_value(&outline).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "blocks": {
                "#Heading": [1, 4],
                "#Heading#{1}": [2, 2],
                "#Heading#{2}": [3, 3],
                "#Heading#{3}": [4, 4]
            },
            "task_lines": [2, 4],
            "tasks": { "incomplete": { "all": [2], "top": [2] } },
            "codeblock_ranges": []
        })
    );
}

#[test]
fn block_text_extracts_source_lines() {
    let md = "# A\nfirst\nsecond\n# B";
    let outline = parse(md);
    assert_eq!(
        outline.block_text(md, 1, "#A#{1}").as_deref(),
        Some("first\nsecond")
    );
    let children: Vec<_> = outline.children("#A").map(|b| b.key.as_str()).collect();
    assert_eq!(children, vec!["#A#{1}"]);
}
