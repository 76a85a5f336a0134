use ogem_codegen::recipes::{VCLAUDE, VERTEX};
use ogem_codegen::{CodegenError, process_files};

const STUDIO_SOURCE: &str = include_str!("fixtures/studio.go");
const VERTEX_GOLDEN: &str = include_str!("fixtures/vertex.go.golden");
const CLAUDE_SOURCE: &str = include_str!("fixtures/claude.go");
const VCLAUDE_GOLDEN: &str = include_str!("fixtures/vclaude.go.golden");

#[test]
fn studio_to_vertex_matches_golden() {
    assert_eq!(VERTEX.apply(STUDIO_SOURCE), VERTEX_GOLDEN);
}

#[test]
fn claude_to_vclaude_matches_golden() {
    assert_eq!(VCLAUDE.apply(CLAUDE_SOURCE), VCLAUDE_GOLDEN);
}

#[test]
fn crlf_sources_produce_the_same_output() {
    let studio = STUDIO_SOURCE.replace('\n', "\r\n");
    let claude = CLAUDE_SOURCE.replace('\n', "\r\n");

    assert_eq!(VERTEX.apply(&studio), VERTEX_GOLDEN);
    assert_eq!(VCLAUDE.apply(&claude), VCLAUDE_GOLDEN);
}

#[test]
fn crlf_file_is_generated_like_lf() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("studio.go");
    let output = dir.path().join("vertex.go");
    std::fs::write(&source, STUDIO_SOURCE.replace('\n', "\r\n")).unwrap();

    process_files(&VERTEX, &[&source], &[&output]).unwrap();

    let generated = std::fs::read_to_string(&output).unwrap();
    assert_eq!(generated, VERTEX_GOLDEN);
    assert!(!generated.contains("apiKey"));
    assert!(!generated.contains("REGION"));
}

#[test]
fn vertex_output_has_no_api_key_leftovers() {
    let output = VERTEX.apply(STUDIO_SOURCE);

    assert!(!output.contains("apiKey"));
    assert!(!output.contains("REGION"));
    assert!(!output.contains("google.golang.org/api/option"));
}

#[test]
fn vclaude_leaves_unrelated_option_usage_alone() {
    // Only the import path is rewritten; call sites stay as they were
    let output = VCLAUDE.apply(CLAUDE_SOURCE);

    assert!(output.contains("option.WithHeader(\"x\", \"y\")"));
    assert!(!output.contains("option.WithAPIKey"));
}

#[test]
fn batch_writes_golden_files() {
    let dir = tempfile::tempdir().unwrap();
    let studio = dir.path().join("studio.go");
    let claude = dir.path().join("claude.go");
    std::fs::write(&studio, STUDIO_SOURCE).unwrap();
    std::fs::write(&claude, CLAUDE_SOURCE).unwrap();

    let vertex_out = dir.path().join("vertex.go");
    let vclaude_out = dir.path().join("vclaude.go");

    process_files(&VERTEX, &[&studio], &[&vertex_out]).unwrap();
    process_files(&VCLAUDE, &[&claude], &[&vclaude_out]).unwrap();

    assert_eq!(std::fs::read_to_string(&vertex_out).unwrap(), VERTEX_GOLDEN);
    assert_eq!(std::fs::read_to_string(&vclaude_out).unwrap(), VCLAUDE_GOLDEN);
}

#[test]
fn regenerating_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("studio.go");
    let output = dir.path().join("vertex.go");
    std::fs::write(&source, STUDIO_SOURCE).unwrap();
    std::fs::write(&output, "stale").unwrap();

    process_files(&VERTEX, &[&source], &[&output]).unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), VERTEX_GOLDEN);
}

#[test]
fn empty_batch_is_a_no_op() {
    let sources: [&str; 0] = [];
    let written = process_files(&VERTEX, &sources, &sources).unwrap();
    assert!(written.is_empty());
}

#[test]
fn length_mismatch_message_mentions_both_counts() {
    let err = process_files(&VCLAUDE, &["a.go", "b.go", "c.go"], &["x.go"]).unwrap_err();

    assert!(matches!(err, CodegenError::LengthMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "number of source files (3) must match number of output files (1)"
    );
}
