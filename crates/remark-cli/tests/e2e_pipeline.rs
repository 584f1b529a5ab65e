//! End-to-end pipeline tests over the HTML fixtures.
//!
//! These run load → parse → extract → score → write through the library
//! crates, and once through the binary against a mock HTTP server.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use remark_core::config::{MarkupConfig, PolicyKind, ScoringConfig};
use remark_core::report::RunReport;
use remark_core::{NoopReporter, RemarkError, Remarker};
use remark_report::csv::{summary_csv, write_student_csv};
use remark_sources::{load_all, DocumentLoader, FetchConfig, HtmlDocument, Source};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

fn remarker(policy: PolicyKind) -> Remarker {
    let scoring = ScoringConfig {
        policy,
        ..ScoringConfig::default()
    };
    Remarker::from_config(&MarkupConfig::default(), &scoring).unwrap()
}

#[test]
fn e2e_fixture_batch() {
    let docs = [
        HtmlDocument::parse(&read_fixture("ada.html")),
        HtmlDocument::parse(&read_fixture("grace.html")),
    ];
    let outcome = remarker(PolicyKind::Penalty)
        .process_all(docs.iter().map(HtmlDocument::root), &NoopReporter)
        .unwrap();

    let ada = &outcome.reports[0];
    assert_eq!(ada.name, "Ada Lovelace");
    assert_eq!(ada.rows.len(), 2);
    assert_eq!(ada.rows[1].mark, 1.75);
    assert_eq!(ada.totals.percentage, 68.75);

    let grace = &outcome.reports[1];
    assert_eq!(grace.rows[0].mark, 0.0);
    assert_eq!(grace.totals.actual_mark, 3.0);

    assert_eq!(
        summary_csv(&outcome.summary),
        "Name,Max mark,Mark,Percentage\r\n\
         Ada Lovelace,4,2.75,68.75\r\n\
         Grace Hopper,4,3.0,75.0\r\n"
    );
}

#[test]
fn e2e_remarking_is_idempotent() {
    let doc = HtmlDocument::parse(&read_fixture("ada.html"));
    let r = remarker(PolicyKind::Penalty);
    let first = r.mark_student(&doc.root()).unwrap();
    let second = r.mark_student(&doc.root()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn e2e_broken_fixtures() {
    let r = remarker(PolicyKind::Penalty);

    let doc = HtmlDocument::parse(&read_fixture("no_identifier.html"));
    assert!(matches!(
        r.mark_student(&doc.root()),
        Err(RemarkError::IdentifierNotFound)
    ));

    let doc = HtmlDocument::parse(&read_fixture("no_credit.html"));
    match r.mark_student(&doc.root()) {
        Err(RemarkError::DegenerateExam { name }) => assert_eq!(name, "Charles Babbage"),
        other => panic!("expected DegenerateExam, got {other:?}"),
    }
}

#[test]
fn e2e_run_report_round_trip() {
    let doc = HtmlDocument::parse(&read_fixture("ada.html"));
    let r = remarker(PolicyKind::AllOrNothing);
    let outcome = r.process_all([doc.root()], &NoopReporter).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let student_path = write_student_csv(&outcome.reports[0], dir.path()).unwrap();
    assert!(student_path.ends_with("Ada_Lovelace.csv"));

    let run = outcome.into_run_report(r.policy().name());
    let json_path = dir.path().join("report.json");
    run.save_json(&json_path).unwrap();

    let loaded = RunReport::load_json(&json_path).unwrap();
    assert_eq!(loaded.policy, "all-or-nothing");
    assert_eq!(loaded.summary.rows[0].actual_mark, 1.0);
    assert_eq!(loaded.students, run.students);
}

#[tokio::test]
async fn e2e_remote_and_local_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/grace"))
        .and(header("cookie", "session=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(read_fixture("grace.html")))
        .mount(&server)
        .await;

    let fetch = FetchConfig {
        cookie: Some("session=xyz".into()),
        ..FetchConfig::default()
    };
    let sources = vec![
        Source::Local(fixture("ada.html")),
        Source::parse(&format!("{}/reports/grace", server.uri())),
    ];
    let loader = DocumentLoader::new(&fetch).unwrap();
    let pages = load_all(&loader, &sources, fetch.parallelism).await.unwrap();

    let docs: Vec<HtmlDocument> = pages.iter().map(|p| HtmlDocument::parse(p)).collect();
    let outcome = remarker(PolicyKind::Penalty)
        .process_all(docs.iter().map(HtmlDocument::root), &NoopReporter)
        .unwrap();
    let names: Vec<&str> = outcome
        .summary
        .rows
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_binary_fetches_with_env_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/ada"))
        .and(header("cookie", "session=from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_string(read_fixture("ada.html")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/reports/ada", server.uri());
    let summary = dir.path().join("summary.csv");

    #[allow(deprecated)]
    Command::cargo_bin("remark")
        .unwrap()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("REMARK_COOKIE", "session=from-env")
        .arg(&summary)
        .arg(&url)
        .assert()
        .success();

    let content = std::fs::read_to_string(&summary).unwrap();
    assert!(content.contains("Ada Lovelace,4,2.75,68.75"));
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_binary_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    #[allow(deprecated)]
    Command::cargo_bin("remark")
        .unwrap()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("REMARK_COOKIE")
        .arg("summary.csv")
        .arg(format!("{}/reports/ada", server.uri()))
        .assert()
        .failure()
        .stderr(predicates::str::contains("401"));
}
