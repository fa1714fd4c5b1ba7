use std::time::Duration;

use serde_json::Value;
use test_model::{
    Backtrace, CapturedError, Comment, Event, EventContext, EventKind, Issue, KnownIssueContext,
    Severity, SourceLocation, Test, TestCase, TestId, TestInstant,
};
use wire_events::{EncodeContext, EncodedEvent, EncodedIssue, WireVersion};

fn ctx(version: WireVersion) -> EncodeContext {
    EncodeContext::new(version)
}

fn location() -> SourceLocation {
    SourceLocation::new("pkg/checks.rs", "/src/pkg/checks.rs", 12, 5)
}

fn rich_issue(severity: Severity) -> Issue {
    let mut issue = Issue::new(severity);
    issue.comments.push(Comment::from("observed a mismatch"));
    issue.source_location = Some(location());
    issue.backtrace = Some(Backtrace::from_addresses(vec![0x1000, 0x1040]));
    issue.error = Some(CapturedError {
        description: "bad state".to_string(),
        domain: "pkg.checks".to_string(),
        code: 7,
    });
    issue
}

fn issue_json(severity: Severity, version: WireVersion) -> Value {
    let encoded = EncodedIssue::encode(&rich_issue(severity), &ctx(version));
    serde_json::to_value(encoded).unwrap()
}

#[test]
fn severity_keys_are_physically_absent_before_their_version() {
    let old = issue_json(Severity::Warning, WireVersion::V0);
    let object = old.as_object().unwrap();
    assert!(!object.contains_key("severity"));
    assert!(!object.contains_key("isFailure"));
    assert!(!object.contains_key("_severity"));

    let new = issue_json(Severity::Warning, WireVersion::V6_3);
    assert_eq!(new["severity"], "warning");
    assert_eq!(new["isFailure"], false);
    assert_eq!(new["_severity"], "warning");
}

#[test]
fn is_failure_reflects_known_issue_and_severity() {
    let mut known = rich_issue(Severity::Error);
    known.known_issue = Some(KnownIssueContext::default());
    let encoded = EncodedIssue::encode(&known, &ctx(WireVersion::V6_3));
    assert_eq!(encoded.is_failure, Some(false));
    assert!(encoded.is_known);

    let encoded = EncodedIssue::encode(&rich_issue(Severity::Error), &ctx(WireVersion::V6_3));
    assert_eq!(encoded.is_failure, Some(true));
}

#[test]
fn backtrace_and_error_are_experimental_only() {
    let stable = issue_json(Severity::Error, WireVersion::V0);
    let object = stable.as_object().unwrap();
    assert!(!object.contains_key("_backtrace"));
    assert!(!object.contains_key("_error"));

    let experimental = issue_json(Severity::Error, WireVersion::V6_3);
    assert_eq!(experimental["_backtrace"]["addresses"][0], 0x1000);
    assert_eq!(experimental["_error"]["domain"], "pkg.checks");
}

#[test]
fn backtraces_can_be_suppressed_by_ambient_context() {
    let mut context = ctx(WireVersion::V6_3);
    context.include_backtraces = false;
    let encoded = EncodedIssue::encode(&rich_issue(Severity::Error), &context);
    assert!(encoded.backtrace.is_none());
    assert!(encoded.error.is_some());
}

#[test]
fn file_path_key_overlaps_for_exactly_one_version() {
    let keys = |version: WireVersion| {
        let json = issue_json(Severity::Error, version);
        let location = json["sourceLocation"].as_object().unwrap().clone();
        (
            location.contains_key("_filePath"),
            location.contains_key("filePath"),
        )
    };
    assert_eq!(keys(WireVersion::XCODE16), (true, false));
    assert_eq!(keys(WireVersion::V0), (true, true));
    assert_eq!(keys(WireVersion::V6_3), (false, true));
}

#[test]
fn event_experimental_extras_are_gated() {
    let mut test = Test::function(
        "check_math",
        location(),
        TestId::new("pkg.check_math"),
    );
    test.is_parameterized = true;
    let context = EventContext {
        test: Some(test),
        test_case: Some(TestCase {
            id: "case-1".to_string(),
            display_name: Some("(1, 2)".to_string()),
        }),
    };
    let event = Event {
        kind: EventKind::IssueRecorded {
            issue: rich_issue(Severity::Error),
        },
        instant: TestInstant::from_parts(Duration::from_secs(1), Duration::from_secs(1)),
        test_id: Some(TestId::new("pkg.check_math")),
    };

    let stable = EncodedEvent::encode(&event, &context, &ctx(WireVersion::V0))
        .unwrap()
        .unwrap();
    let stable = serde_json::to_value(stable).unwrap();
    let object = stable.as_object().unwrap();
    assert!(!object.contains_key("_testCase"));
    assert!(!object.contains_key("_comments"));
    assert!(!object.contains_key("_sourceLocation"));

    let experimental = EncodedEvent::encode(&event, &context, &ctx(WireVersion::V6_3))
        .unwrap()
        .unwrap();
    let experimental = serde_json::to_value(experimental).unwrap();
    assert_eq!(experimental["_testCase"]["id"], "case-1");
    assert_eq!(experimental["_comments"][0], "observed a mismatch");
    assert_eq!(experimental["_sourceLocation"]["fileID"], "pkg/checks.rs");
}

#[test]
fn field_growth_across_versions_is_monotonic() {
    // Every stable key emitted at V0 must still be emitted at 6.3; the only
    // retirement is the deprecated `_filePath` alias, which had its
    // documented one-version overlap at V0.
    fn keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
        if let Value::Object(map) = value {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                out.push(path.clone());
                keys(nested, &path, out);
            }
        }
    }

    let mut old_keys = Vec::new();
    keys(&issue_json(Severity::Error, WireVersion::V0), "", &mut old_keys);
    let mut new_keys = Vec::new();
    keys(
        &issue_json(Severity::Error, WireVersion::V6_3),
        "",
        &mut new_keys,
    );

    for key in old_keys {
        if key.ends_with("_filePath") {
            continue;
        }
        assert!(new_keys.contains(&key), "key {key} disappeared at 6.3");
    }
}
