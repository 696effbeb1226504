/// Integration tests for the patch engine through the public API
///
/// Covers the document-level guarantees: normalization, index mapping,
/// breadcrumb tolerance, append safety and batch reporting.
use lorepatch::contexts::{
    apply, find_insertion_line, find_range, normalize, split_lines, validate_content,
    BreadcrumbMode, MemoryDocumentStore, PatchEngine,
};
use lorepatch::data::{EditDirective, EngineConfig, FailReason, FileStatus};

const LENIENT: BreadcrumbMode = BreadcrumbMode::Lenient;

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "",
        "# Heading ##",
        "名字：林（十七岁），来自北方。",
        "tabs\tand  spaces\nand lines",
        "mixed — dash！？",
    ];
    for s in samples {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
    }
}

#[test]
fn matched_range_normalizes_to_target() {
    let content = "# Cast\n## Lin\nage :  17 ，height：170\n";
    for target in ["age: 17", "17,height:170", "height ： 170"] {
        let range = find_range(content, target, None, LENIENT).unwrap();
        assert_eq!(
            normalize(&content[range.clone()]),
            normalize(target),
            "range {:?} for {:?}",
            range,
            target
        );
    }
}

#[test]
fn full_width_punctuation_matches_both_ways() {
    let ascii_doc = "name: Lin (17)\n";
    let wide_doc = "name：Lin（17）\n";

    let range = find_range(ascii_doc, "name：Lin（17）", None, LENIENT).unwrap();
    assert_eq!(&ascii_doc[range], "name: Lin (17)");

    let range = find_range(wide_doc, "name: Lin (17)", None, LENIENT).unwrap();
    assert_eq!(&wide_doc[range], "name：Lin（17）");
}

#[test]
fn unmatched_context_never_appends_at_end() {
    let (lines, _) = split_lines("# A\nfoo\n# B\nbar\n");
    assert_eq!(find_insertion_line(&lines, Some("# Nowhere"), LENIENT), None);
    assert_eq!(find_insertion_line(&lines, Some("# Nowhere>## Else"), LENIENT), None);

    let directive = EditDirective::append("a.md", Some("# Nowhere"), "baz");
    assert_eq!(apply("# A\nfoo\n", &directive, LENIENT), "# A\nfoo\n");
}

#[test]
fn dropping_an_interior_crumb_resolves_to_the_same_line() {
    let doc = "# Act 1\n## Scene 2\n### Beat\nx\n## Scene 3\ny\n# Act 2\n";
    let (lines, _) = split_lines(doc);

    let full = find_insertion_line(&lines, Some("# Act 1>## Scene 2>### Beat"), LENIENT);
    let partial = find_insertion_line(&lines, Some("# Act 1>### Beat"), LENIENT);
    assert_eq!(full, Some(4));
    assert_eq!(partial, full);
}

#[test]
fn second_validation_reports_duplicate() {
    let doc = "# A\nfoo\n# B\nbar\n";
    let directive = EditDirective::append("a.md", Some("# A"), "baz");

    let first = validate_content(doc, &directive, LENIENT, 5, true);
    assert!(first.matched);
    assert!(!first.already_exists);

    let mutated = apply(doc, &directive, LENIENT);
    let second = validate_content(&mutated, &directive, LENIENT, 5, true);
    assert!(second.already_exists);
}

#[test]
fn append_lands_at_end_of_section() {
    let doc = "# A\nfoo\n# B\nbar\n";
    let directive = EditDirective::append("a.md", Some("# A"), "baz");
    assert_eq!(apply(doc, &directive, LENIENT), "# A\nfoo\nbaz\n# B\nbar\n");
}

#[test]
fn contextual_delete_removes_only_the_target() {
    let doc = "# A\n## A1\nx\n# B\n";
    let directive = EditDirective::replace("a.md", "x", None, Some("# A>## A1"));

    let range = find_range(doc, "x", Some("# A>## A1"), LENIENT).unwrap();
    assert_eq!(&doc[range], "x");
    assert_eq!(apply(doc, &directive, LENIENT), "# A\n## A1\n\n# B\n");
}

#[test]
fn strict_mode_needs_every_crumb() {
    let doc = "# A\nfoo\n# B\nbar\n";
    let (lines, _) = split_lines(doc);
    assert_eq!(find_insertion_line(&lines, Some("# A>## Missing"), LENIENT), Some(2));
    assert_eq!(
        find_insertion_line(&lines, Some("# A>## Missing"), BreadcrumbMode::Strict),
        None
    );
}

#[tokio::test]
async fn missing_target_writes_nothing() {
    let store = MemoryDocumentStore::with_documents([("a.md", "# A\nfoo\n")]);
    let engine = PatchEngine::new(store, EngineConfig::default());

    let report = engine
        .apply_all(&[EditDirective::replace("a.md", "missing", Some("x"), None)])
        .await;

    assert_eq!(report.files_written(), 0);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.files[0].status, FileStatus::Unchanged);
    assert_eq!(report.files[0].failures[0].reason, FailReason::TargetNotFound);
    assert_eq!(engine.store().get("a.md").as_deref(), Some("# A\nfoo\n"));
}

#[tokio::test]
async fn parsed_output_applies_across_files() {
    let store = MemoryDocumentStore::with_documents([
        ("characters.md", "# Cast\n## Lin\nage: 17\n## Mei\nage: 20\n"),
        ("world.md", "# Places\n"),
    ]);
    let engine = PatchEngine::new(store, EngineConfig::default());

    let raw = r##"The night passes quietly.
<save file="characters.md" context="# Cast>## Lin">
  <update><target>age: 17</target><replacement>age: 18</replacement></update>
  <update><replacement>scar: left hand</replacement></update>
</save>
<save file="world.md"><replacement>## Old Mill</replacement></save>
<save file="characters.md"><update><target>nobody</target><replacement>x</replacement></update></save>"##;

    let directives = engine.parse(raw);
    assert_eq!(directives.len(), 4);

    let report = engine.apply_all(&directives).await;
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files_written(), 2);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(
        engine.store().get("characters.md").as_deref(),
        Some("# Cast\n## Lin\nage: 18\nscar: left hand\n## Mei\nage: 20\n")
    );
    assert_eq!(
        engine.store().get("world.md").as_deref(),
        Some("# Places\n## Old Mill\n")
    );
}
