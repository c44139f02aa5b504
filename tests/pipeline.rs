// Thu Oct 15 2026 - Alex

use invocable_scanner::config::Config;
use invocable_scanner::output::TierLevel;
use invocable_scanner::pipeline::{AnalysisRun, DiscoveryPipeline, PipelineInputs};
use invocable_scanner::scoring::ConfidenceTier;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn dump(rows: &[&str]) -> String {
    let mut text = String::from("Dump of file sample.dll\n\n    ordinal hint RVA      name\n\n");
    for row in rows {
        text.push_str("    ");
        text.push_str(row);
        text.push('\n');
    }
    text.push_str("\n  Summary\n\n        1000 .data\n");
    text
}

fn run_with(dir: &TempDir, rows: &[&str], headers: Option<&Path>, docs: Option<&Path>) -> AnalysisRun {
    let dump_path = dir.path().join("sample.txt");
    fs::write(&dump_path, dump(rows)).unwrap();

    let config = Config::default().with_output_dir(dir.path().join("out"));
    let pipeline = DiscoveryPipeline::new(config).unwrap();
    let inputs = PipelineInputs::for_dump(&dump_path)
        .with_headers(headers.map(Path::to_path_buf))
        .with_docs(docs.map(Path::to_path_buf));
    pipeline.run(&inputs).unwrap()
}

#[test]
fn test_bare_export_is_low_confidence() {
    let dir = TempDir::new().unwrap();
    let run = run_with(&dir, &["1    0 00001000 Foo"], None, None);

    let foo = &run.catalog()[0];
    assert_eq!(foo.name, "Foo");
    assert_eq!(foo.confidence, ConfidenceTier::Low);
    assert_eq!(foo.confidence_reasons, vec!["exported from binary".to_string()]);
    assert!(run.summary.is_consistent_with(run.catalog()));
}

#[test]
fn test_header_match_is_guaranteed() {
    let dir = TempDir::new().unwrap();
    let include = dir.path().join("include");
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("foo.h"), "/** Computes something */\nint Foo(int x, int y);\n").unwrap();

    let run = run_with(&dir, &["1    0 00001000 Foo"], Some(&include), None);
    let foo = &run.catalog()[0];
    assert_eq!(foo.confidence, ConfidenceTier::Guaranteed);
    assert_eq!(foo.signature.return_type.as_deref(), Some("int"));
    assert_eq!(foo.signature.parameters.as_deref(), Some("int x, int y"));
    assert_eq!(foo.documentation.summary.as_deref(), Some("Computes something"));
    assert!(foo.evidence.header_file.as_deref().unwrap().ends_with("foo.h"));
}

#[test]
fn test_forwarder_chain_resolves_to_final_target() {
    let dir = TempDir::new().unwrap();
    let run = run_with(
        &dir,
        &["1    0 -------- Foo = Baz", "2    1 -------- Bar = Foo"],
        None,
        None,
    );

    let bar = run.catalog().iter().find(|inv| inv.name == "Bar").unwrap();
    assert_eq!(bar.evidence.forwarded_to.as_deref(), Some("Foo"));
    assert_eq!(bar.evidence.resolved_target.as_deref(), Some("Baz"));
    assert!(bar.rva.is_none());
    assert!(bar
        .confidence_reasons
        .iter()
        .any(|r| r == "forwarded reference resolved"));
}

#[test]
fn test_duplicate_rows_collapse() {
    let dir = TempDir::new().unwrap();
    let run = run_with(&dir, &["1    0 00001000 Foo", "1    0 00001000 Foo"], None, None);

    assert_eq!(run.export_count(), 1);
    assert_eq!(run.extraction.duplicates, 1);
    assert_eq!(run.catalog().len(), 1);
}

#[test]
fn test_fields_survive_in_dump_order() {
    let dir = TempDir::new().unwrap();
    let run = run_with(
        &dir,
        &["3    0 00003000 Zeta", "1    1 00001000 Alpha", "4    3 00004000 GetSummaryInfo", "2    2 00002000 Mid"],
        None,
        None,
    );

    let names: Vec<&str> = run.catalog().iter().map(|inv| inv.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "GetSummaryInfo", "Mid"]);

    let alpha = &run.catalog()[1];
    assert_eq!(alpha.ordinal, Some(1));
    assert_eq!(alpha.hint.as_deref(), Some("1"));
    assert_eq!(alpha.rva.as_deref(), Some("00001000"));
}

#[test]
fn test_headers_without_docs_emit_tier2_and_tier4() {
    let dir = TempDir::new().unwrap();
    let include = dir.path().join("include");
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("api.h"), "void Foo(void);\n").unwrap();

    let run = run_with(&dir, &["1    0 00001000 Foo", "2    1 00002000 Bar"], Some(&include), None);
    let out = dir.path().join("out");

    assert!(run.bundle(TierLevel::Tier1).is_none());
    assert!(run.bundle(TierLevel::Tier3).is_none());
    assert!(out.join("sample_tier2_invocables.json").exists());
    assert!(out.join("sample_tier4_api.csv").exists());
    assert!(out.join("sample_tier5_metadata.json").exists());
    assert!(out.join("sample_tiers.md").exists());
    assert!(!out.join("sample_tier1_invocables.json").exists());

    let tier4 = run.bundle(TierLevel::Tier4).unwrap();
    assert!(tier4.invocables.iter().all(|inv| inv.evidence.header_file.is_none()));

    let summary = fs::read_to_string(out.join("sample_confidence_summary.txt")).unwrap();
    assert!(summary.contains("complete signature from header file"));
}

#[test]
fn test_tier1_needs_documentation_corpus() {
    let dir = TempDir::new().unwrap();
    let include = dir.path().join("include");
    let docs = dir.path().join("docs");
    fs::create_dir_all(&include).unwrap();
    fs::create_dir_all(&docs).unwrap();
    fs::write(include.join("api.h"), "int Foo(int x);\n").unwrap();
    fs::write(docs.join("guide.md"), "Call Foo before anything else.\n").unwrap();

    let run = run_with(&dir, &["1    0 00001000 Foo"], Some(&include), Some(&docs));
    let tier1 = run.bundle(TierLevel::Tier1).unwrap();
    assert_eq!(tier1.invocables[0].documentation.references, vec!["guide.md".to_string()]);

    let tier2 = run.bundle(TierLevel::Tier2).unwrap();
    assert!(tier2.invocables[0].documentation.references.is_empty());
}

#[test]
fn test_empty_dump_still_writes_metadata() {
    let dir = TempDir::new().unwrap();
    let run = run_with(&dir, &[], None, None);

    assert_eq!(run.export_count(), 0);
    assert_eq!(run.emission.tiers, vec![TierLevel::Tier5]);
    assert!(dir.path().join("out").join("sample_tier5_metadata.md").exists());
}

#[test]
fn test_external_entries_only_join_the_unified_catalog() {
    let dir = TempDir::new().unwrap();
    let include = dir.path().join("include");
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("api.h"), "int Foo(int x);\n").unwrap();

    let com = dir.path().join("com.json");
    fs::write(
        &com,
        r#"[{"name": "Open", "kind": "com-object", "confidence": "guaranteed",
             "signature": {"full_prototype": "HRESULT Open(BSTR path)"},
             "metadata": {"clsid": "{00000000-0000-0000-0000-000000000001}"}}]"#,
    )
    .unwrap();

    let dump_path = dir.path().join("sample.txt");
    fs::write(&dump_path, dump(&["1    0 00001000 Foo"])).unwrap();
    let config = Config::default().with_output_dir(dir.path().join("out"));
    let inputs = PipelineInputs::for_dump(&dump_path)
        .with_headers(Some(include))
        .with_external(vec![com]);
    let run = DiscoveryPipeline::new(config).unwrap().run(&inputs).unwrap();

    assert!(run.catalog().iter().any(|inv| inv.name == "Open"));
    let tier4 = run.bundle(TierLevel::Tier4).unwrap();
    assert!(tier4.invocables.iter().all(|inv| inv.name != "Open"));
}
