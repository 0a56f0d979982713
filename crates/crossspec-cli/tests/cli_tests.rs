//! End-to-end tests: extract, import, then query the claim files

use clap::Parser;
use crossspec_cli::commands::code_extract::{run_code_extract, ExtractOutcome};
use crossspec_cli::commands::import::run_import;
use crossspec_cli::commands::search::run_search;
use crossspec_cli::config::OutputFormat;
use crossspec_cli::{commands, Cli, CliError, Command, Config, Formatter, Workspace};
use crossspec_domain::ClaimId;
use crossspec_trace::{coverage_report, Coverage, FeatureStatus};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FEED: &str = r#"{"text_raw":"The brake shall engage within 100 ms.","source":{"type":"pdf","path":"docs/brake.pdf","locator":{"kind":"page","page":3}},"method":"pdf:text_layer","facets":{"feature":["brake","timing"]}}

{"text_raw":"Diagnostic trouble codes are stored.","source":{"type":"pdf","path":"docs/brake.pdf","locator":{"kind":"page","page":7}},"method":"pdf:text_layer","facets":{"feature":["diag"]}}
{"text_raw":"   ","source":{"type":"pdf","path":"docs/brake.pdf"},"method":"pdf:text_layer"}
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Project with a two-file repository, a document feed and a config file
fn project() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "repo/src/brake/brake.c",
        "void brake_apply(int level)\n{\n    pwm_set(level);\n}\n",
    );
    write(
        root,
        "repo/src/timing/timer.c",
        "void timer_tick_1ms(void)\n{\n    ticks++;\n}\n",
    );
    write(root, "feeds/brake_pdf.jsonl", FEED);
    write(
        root,
        "crossspec.toml",
        "[project]\nname = \"brake-ecu\"\nrepo_root = \"repo\"\n\n[extract]\nparallel = false\n",
    );
    let config = Config::load(Some(&root.join("crossspec.toml"))).unwrap();
    (dir, config)
}

fn command(args: &[&str]) -> Command {
    let mut argv = vec!["crossspec"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn extract(config: &Config, args: &[&str]) -> ExtractOutcome {
    let mut argv = vec!["code-extract"];
    argv.extend_from_slice(args);
    let Command::CodeExtract(args) = command(&argv) else {
        panic!("expected code-extract");
    };
    run_code_extract(&args, config).unwrap()
}

fn import(config: &Config, root: &Path) {
    let feed = root.join("feeds/brake_pdf.jsonl");
    let Command::Import(args) = command(&["import", feed.to_str().unwrap(), "--type", "pdf"])
    else {
        panic!("expected import");
    };
    let outcome = run_import(&args, config).unwrap();
    assert_eq!(outcome.out, config.spec_claims_path());
    assert_eq!(outcome.diagnostics.len(), 1);
}

fn id(s: &str) -> ClaimId {
    ClaimId::parse(s).unwrap()
}

#[test]
fn test_code_extract_writes_language_prefixed_claims() {
    let (dir, config) = project();
    let ExtractOutcome::Extracted { out, report } = extract(&config, &[]) else {
        panic!("expected an extraction");
    };

    assert_eq!(out, dir.path().join("outputs/code_claims.jsonl"));
    let ids: Vec<_> = report.claims.iter().map(|c| c.claim_id().as_str()).collect();
    assert_eq!(ids, vec!["CLM-C-000001", "CLM-C-000002"]);
    assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 2);
}

#[test]
fn test_code_extract_dry_run_and_save() {
    let (_dir, config) = project();

    let ExtractOutcome::DryRun(files) = extract(&config, &["--dry-run"]) else {
        panic!("expected a dry run");
    };
    assert_eq!(files, vec!["src/brake/brake.c", "src/timing/timer.c"]);
    assert!(!config.code_claims_path().exists());

    assert!(matches!(extract(&config, &[]), ExtractOutcome::Extracted { .. }));
    assert!(matches!(extract(&config, &["--save"]), ExtractOutcome::Reused(_)));
}

#[test]
fn test_code_extract_overrides() {
    let (_dir, config) = project();
    let ExtractOutcome::Extracted { report, .. } =
        extract(&config, &["--namespace", "ecu", "--top", "1", "--unit", "file"])
    else {
        panic!("expected an extraction");
    };
    assert_eq!(report.claims.len(), 1);
    assert_eq!(report.claims[0].claim_id().as_str(), "CLM-ECU-000001");
}

#[test]
fn test_code_extract_missing_repo() {
    let (dir, config) = project();
    let missing = dir.path().join("nowhere");
    let Command::CodeExtract(args) =
        command(&["code-extract", "--repo", missing.to_str().unwrap()])
    else {
        panic!("expected code-extract");
    };
    assert!(matches!(
        run_code_extract(&args, &config),
        Err(CliError::InvalidInput(_))
    ));
}

#[test]
fn test_import_rejects_wrong_type() {
    let (dir, config) = project();
    let feed = dir.path().join("feeds/brake_pdf.jsonl");
    let Command::Import(args) = command(&["import", feed.to_str().unwrap(), "--type", "xlsx"])
    else {
        panic!("expected import");
    };
    assert!(matches!(run_import(&args, &config), Err(CliError::Extractor(_))));
}

#[test]
fn test_workspace_requires_claim_files() {
    let (_dir, config) = project();
    assert!(matches!(Workspace::open(&[], &config), Err(CliError::NoClaims)));
}

#[test]
fn test_search_trace_plan_and_coverage() {
    let (dir, config) = project();
    extract(&config, &[]);
    import(&config, dir.path());

    let workspace = Workspace::open(&[], &config).unwrap();
    assert_eq!(workspace.paths().len(), 2);
    let index = workspace.index();
    assert_eq!(index.len(), 4);

    let Command::Search(args) = command(&["search", "--feature", "BRAKE", "--type", "code"]) else {
        panic!("expected search");
    };
    let found: Vec<_> = run_search(&args, &index)
        .unwrap()
        .iter()
        .map(|c| c.claim_id().clone())
        .collect();
    assert_eq!(found, vec![id("CLM-C-000001")]);

    let Command::Search(args) = command(&["search", "--query", "engage"]) else {
        panic!("expected search");
    };
    let found = run_search(&args, &index).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].claim_id(), &id("CLM-BRAKE-000001"));

    let tracer = workspace.tracer(&config).unwrap();
    let trace = tracer.trace(&id("CLM-BRAKE-000001"), 10).unwrap();
    let ranked: Vec<_> = trace.matches.iter().map(|m| m.candidate.clone()).collect();
    assert_eq!(ranked, vec![id("CLM-C-000001"), id("CLM-C-000002")]);
    assert_eq!(trace.coverage, Coverage::Partial);

    let plan = tracer.plan("The brake shall engage within 100 ms.").unwrap();
    assert_eq!(plan.breakdown(), vec!["The brake", "engage", "100 ms"]);
    assert_eq!(plan.fragments[0].matches[0].candidate, id("CLM-C-000001"));

    let rows: Vec<_> = coverage_report(&index, None)
        .into_iter()
        .map(|r| (r.feature, r.status))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("brake".to_string(), FeatureStatus::Covered),
            ("diag".to_string(), FeatureStatus::Unimplemented),
            ("timing".to_string(), FeatureStatus::Covered),
        ]
    );
}

#[test]
fn test_execute_commands_against_explicit_files() {
    let (dir, config) = project();
    extract(&config, &[]);
    import(&config, dir.path());
    let formatter = Formatter::new(OutputFormat::Quiet, false);
    let spec = config.spec_claims_path();
    let spec = spec.to_str().unwrap();
    let code = config.code_claims_path();
    let code = code.to_str().unwrap();

    let Command::Coverage(args) = command(&["coverage", "--claims", spec, "--claims", code]) else {
        panic!("expected coverage");
    };
    commands::execute_coverage(args, &config, &formatter).unwrap();

    let Command::Show(args) = command(&["show", "CLM-DIAG-000002", "--claims", spec]) else {
        panic!("expected show");
    };
    commands::execute_show(args, &config, &formatter).unwrap();

    let Command::Trace(args) = command(&["trace", "CLM-GEN-999999", "--claims", spec]) else {
        panic!("expected trace");
    };
    assert!(matches!(
        commands::execute_trace(args, &config, &formatter),
        Err(CliError::Trace(_))
    ));

    let Command::Plan(args) = command(&["plan", "--claims", code, ";"]) else {
        panic!("expected plan");
    };
    assert!(matches!(
        commands::execute_plan(args, &config, &formatter),
        Err(CliError::Trace(_))
    ));
}
