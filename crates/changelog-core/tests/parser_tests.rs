//! Integration tests for the change log parser over XML fixtures.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use changelog_core::{parse, parse_since, parse_str, ChangeLogError, ReleaseItem, NO_VERSION};

fn fixture(name: &str) -> BufReader<File> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    BufReader::new(File::open(path).unwrap())
}

fn release(code: i32, name: &str, date: Option<&str>, changes: &[&str]) -> ReleaseItem {
    ReleaseItem::new(
        code,
        name,
        date.map(str::to_string),
        changes.iter().map(|c| c.to_string()).collect(),
    )
    .unwrap()
}

fn parse_error(name: &str) -> String {
    parse(fixture(name)).unwrap_err().to_string()
}

// =============================================================================
// Valid documents
// =============================================================================

#[test]
fn test_empty_changelog() {
    let releases = parse(fixture("valid_empty_changelog.xml")).unwrap();
    assert!(releases.is_empty());
}

#[test]
fn test_changelog_with_dates() {
    let releases = parse(fixture("valid_changelog_with_version_dates.xml")).unwrap();

    assert_eq!(
        releases,
        vec![
            release(3, "3.0.0", Some("2018-03-01"), &["Third release"]),
            release(2, "2.0.0", Some("2018-02-01"), &["Second release"]),
            release(1, "1.0.0", Some("2018-01-01"), &["First release"]),
        ]
    );
}

#[test]
fn test_changelog_without_dates() {
    let releases = parse(fixture("valid_changelog_without_version_dates.xml")).unwrap();

    assert_eq!(
        releases,
        vec![
            release(11, "2.1", None, &["Totally new and shiny version"]),
            release(
                10,
                "2.0",
                None,
                &["Fixed: A bug fix", "Some other changes I can't quite remember"]
            ),
            release(1, "1.0", None, &["First release"]),
        ]
    );
}

#[test]
fn test_parse_is_idempotent() {
    let first = parse(fixture("valid_changelog_with_version_dates.xml")).unwrap();
    let second = parse(fixture("valid_changelog_with_version_dates.xml")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_order_is_preserved() {
    let xml = r#"<changelog>
        <release version="a" versioncode="5"><change>x</change></release>
        <release version="b" versioncode="9"><change>x</change></release>
        <release version="c" versioncode="2"><change>x</change></release>
    </changelog>"#;

    let codes: Vec<i32> = parse_str(xml)
        .unwrap()
        .iter()
        .map(ReleaseItem::version_code)
        .collect();
    assert_eq!(codes, vec![5, 9, 2]);
}

#[test]
fn test_whitespace_normalization() {
    let xml = "<changelog><release version=\"1.0\" versioncode=\"1\">\
               <change>  First   release \n</change></release></changelog>";

    let releases = parse_str(xml).unwrap();
    assert_eq!(releases[0].changes(), ["First release".to_string()]);
}

#[test]
fn test_entities_are_unescaped() {
    let xml = r#"<changelog><release version="1.0" versioncode="1">
        <change>Fixed &lt;b&gt; &amp; &quot;quotes&quot;</change>
    </release></changelog>"#;

    let releases = parse_str(xml).unwrap();
    assert_eq!(releases[0].changes()[0], r#"Fixed <b> & "quotes""#);
}

#[test]
fn test_padded_version_code_uses_sentinel() {
    let xml = r#"<changelog>
        <release version="1.0" versioncode=" 7 "><change>x</change></release>
    </changelog>"#;

    assert_eq!(parse_str(xml).unwrap()[0].version_code(), NO_VERSION);
}

#[test]
fn test_unparseable_version_code_uses_sentinel() {
    let xml = r#"<changelog>
        <release version="1.0" versioncode="one"><change>x</change></release>
    </changelog>"#;

    let releases = parse_str(xml).unwrap();
    assert_eq!(releases[0].version_code(), NO_VERSION);
    assert!(!releases[0].has_version_code());
}

// =============================================================================
// Since-filter
// =============================================================================

#[test]
fn test_since_returns_prefix() {
    let all = parse(fixture("valid_changelog_without_version_dates.xml")).unwrap();

    for threshold in [0, 1, 5, 10, 11, 12] {
        let recent = parse_since(fixture("valid_changelog_without_version_dates.xml"), threshold)
            .unwrap();
        let expected: Vec<ReleaseItem> = all
            .iter()
            .take_while(|r| r.version_code() > threshold)
            .cloned()
            .collect();
        assert_eq!(recent, expected, "threshold {}", threshold);
    }
}

#[test]
fn test_since_sentinel_is_unbounded() {
    let all = parse(fixture("valid_changelog_with_version_dates.xml")).unwrap();
    let since = parse_since(fixture("valid_changelog_with_version_dates.xml"), NO_VERSION).unwrap();
    assert_eq!(all, since);
}

#[test]
fn test_since_stops_before_malformed_tail() {
    let xml = r#"<changelog>
        <release version="2.0" versioncode="2"><change>New</change></release>
        <release version="1.0" versioncode="1"></release>
    </changelog>"#;

    let recent = parse_since(xml.as_bytes(), 1).unwrap();
    assert_eq!(recent.len(), 1);
    assert!(parse_str(xml).is_err());
}

#[test]
fn test_since_does_not_stop_at_sentinel_release() {
    let xml = r#"<changelog>
        <release version="3.0" versioncode="3"><change>c</change></release>
        <release version="?" versioncode="broken"><change>b</change></release>
        <release version="1.0" versioncode="1"><change>a</change></release>
    </changelog>"#;

    let names: Vec<String> = parse_since(xml.as_bytes(), 1)
        .unwrap()
        .iter()
        .map(|r| r.version_name().to_string())
        .collect();
    assert_eq!(names, vec!["3.0", "?"]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_wrong_root_element() {
    assert_eq!(
        parse_error("invalid_wrong_root_element.xml"),
        "Unexpected tag: random (wanted: changelog)"
    );
}

#[test]
fn test_wrong_release_element() {
    assert_eq!(
        parse_error("invalid_wrong_release_element.xml"),
        "Unexpected tag: random (wanted: release)"
    );
}

#[test]
fn test_missing_version_attribute() {
    assert_eq!(
        parse_error("invalid_release_element_with_missing_version_attribute.xml"),
        "Missing attribute: version"
    );
}

#[test]
fn test_missing_versioncode_attribute() {
    assert_eq!(
        parse_error("invalid_release_element_with_missing_versioncode_attribute.xml"),
        "Missing attribute: version"
    );
}

#[test]
fn test_empty_release_element() {
    assert_eq!(
        parse_error("invalid_empty_release_element.xml"),
        "<release> tag must contain at least one <change> element"
    );
}

#[test]
fn test_self_closing_release_element() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"/></changelog>"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::EmptyRelease));
}

#[test]
fn test_empty_change_element() {
    assert_eq!(parse_error("invalid_empty_change_element.xml"), "Expected text");
}

#[test]
fn test_self_closing_change_element() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"><change/></release></changelog>"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::ExpectedText));
    assert_eq!(err.to_string(), "Expected text");
}

#[test]
fn test_blank_change_element() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"><change>   </change></release></changelog>"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::ExpectedText));
}

#[test]
fn test_wrong_change_element() {
    assert_eq!(
        parse_error("invalid_wrong_change_element.xml"),
        "Unexpected tag: random (wanted: change)"
    );
}

#[test]
fn test_change_element_containing_element() {
    assert_eq!(
        parse_error("invalid_change_element_contains_element.xml"),
        "Expected </change>"
    );
}

#[test]
fn test_stray_text_in_release() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1">oops<change>x</change></release></changelog>"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "Unexpected text: oops");
}

#[test]
fn test_document_without_elements() {
    let err = parse_str("<?xml version=\"1.0\"?>\n<!-- nothing here -->").unwrap_err();
    assert!(matches!(err, ChangeLogError::MissingRoot));
}

#[test]
fn test_truncated_release() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"><change>x</change>"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::UnexpectedEof));
    assert_eq!(err.to_string(), "Unexpected end of document");
}

#[test]
fn test_truncated_change() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"><change>x"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::UnexpectedEof));
}

#[test]
fn test_truncated_after_change_start() {
    let err = parse_str(r#"<changelog><release version="1" versioncode="1"><change>"#)
        .unwrap_err();
    assert!(matches!(err, ChangeLogError::UnexpectedEof));
}
