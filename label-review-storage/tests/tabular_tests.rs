use label_review_core::{CoreError, NewItem};
use label_review_storage::TabularImporter;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_read_full_rows() {
    let input = "text,category,label,tags\n\
                 great movie,review,pos,\"fun, short\"\n\
                 awful plot,review,neg,\n";
    let records = TabularImporter::new().read(input.as_bytes()).unwrap();

    assert_eq!(
        records,
        vec![
            NewItem::new("great movie")
                .with_category("review")
                .with_label("pos")
                .with_tags(["fun", "short"]),
            NewItem::new("awful plot").with_category("review").with_label("neg"),
        ]
    );
}

#[rstest]
#[case("a, b ,c", vec!["a", "b", "c"])]
#[case("a,,b", vec!["a", "b"])]
#[case("dup,dup", vec!["dup", "dup"])]
#[case("  ", vec![])]
fn test_tag_splitting(#[case] tags: &str, #[case] expected: Vec<&str>) {
    let input = format!("text,tags\nx,\"{tags}\"\n");
    let records = TabularImporter::new().read(input.as_bytes()).unwrap();

    assert_eq!(records[0].tags, expected);
}

#[test]
fn test_custom_delimiters() {
    let input = "text;tags\nhello;a|b\n";
    let records = TabularImporter::new()
        .with_delimiter(b';')
        .with_tag_delimiter('|')
        .read(input.as_bytes())
        .unwrap();

    assert_eq!(records[0].tags, vec!["a", "b"]);
}

#[rstest]
#[case::short_row("text,label\nfirst,pos\nsecond\nthird,neg\n", "line 3", "expected 2 fields, found 1")]
#[case::long_row("text,label\na,pos,extra\n", "line 2", "expected 2 fields, found 3")]
fn test_mismatched_row_rejects_whole_batch(
    #[case] input: &str,
    #[case] line: &str,
    #[case] reason: &str,
) {
    let err = TabularImporter::new().read(input.as_bytes()).unwrap_err();

    match err {
        CoreError::MalformedInput(message) => {
            assert!(message.contains(line), "unexpected message: {message}");
            assert!(message.contains(reason), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_header_only_yields_nothing() {
    let records = TabularImporter::new().read("text,label\n".as_bytes()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_missing_columns_default_to_empty() {
    let records = TabularImporter::new().read("label\npos\n".as_bytes()).unwrap();
    assert_eq!(records, vec![NewItem::new("").with_label("pos")]);
}

#[test]
fn test_read_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "text,label").unwrap();
    writeln!(file, "from disk,pos").unwrap();

    let records = TabularImporter::new().read_path(file.path()).unwrap();
    assert_eq!(records, vec![NewItem::new("from disk").with_label("pos")]);
}

#[test]
fn test_read_missing_path_is_io() {
    let err = TabularImporter::new()
        .read_path(std::path::Path::new("/nonexistent/input.csv"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}
