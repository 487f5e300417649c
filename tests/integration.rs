//! End-to-end tests for rule set generation.

use dnr_rulegen::{
    find_stale_rule_sets, generate_all_rule_sets, write_rule_sets, DirectorySink, Error,
    GenerationReport, GeneratorConfig, Manifest, RuleAction, RuleList, RuleSetName,
};
use regex::Regex;
use std::fs;
use std::path::Path;

const MANIFEST: &str = r#"{
  "manifest_version": 3,
  "name": "Privacy Badger",
  "content_scripts": [
    {
      "matches": ["<all_urls>"],
      "js": ["js/contentscripts/dnt.js"],
      "run_at": "document_start",
      "all_frames": true
    },
    {
      "matches": [
        "https://www.google.com/*",
        "https://www.google.ad/*",
        "https://www.google.co.uk/*",
        "https://encrypted.google.com/*"
      ],
      "js": ["js/firstparties/lib/utils.js", "js/firstparties/google.js"],
      "run_at": "document_end"
    }
  ]
}"#;

fn write_manifest(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("manifest.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_generate_and_write_all_rule_sets() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::load(write_manifest(dir.path(), MANIFEST)).unwrap();

    let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default()).unwrap();
    let out = dir.path().join("data").join("dnr");
    let mut sink = DirectorySink::new(&out);
    let report = write_rule_sets(&sets, &mut sink).unwrap();

    assert_eq!(report.count(RuleSetName::DntPolicy), 1);
    assert_eq!(report.count(RuleSetName::DntSignal), 2);
    assert_eq!(report.count(RuleSetName::Gen204), 3);
    assert_eq!(report.count(RuleSetName::BypassRedirects), 15);

    for name in RuleSetName::ALL {
        let path = out.join(name.file_name());
        let stored = RuleList::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&stored, sets.get(name).unwrap(), "{:?}", path);
    }

    let gen204 = fs::read_to_string(out.join("gen204.json")).unwrap();
    assert!(gen204.contains(r#""urlFilter": "|https://www.google.co.uk/gen_204^""#));
    assert!(!gen204.contains("encrypted.google.com"));
}

/// Same load, generate, write path the CLI runs.
fn run(manifest_path: &Path, out: &Path) -> dnr_rulegen::Result<GenerationReport> {
    let manifest = Manifest::load(manifest_path)?;
    let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default())?;
    write_rule_sets(&sets, &mut DirectorySink::new(out))
}

#[test]
fn test_missing_first_party_script_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = write_manifest(
        dir.path(),
        r#"{"content_scripts": [{"js": ["js/other.js"], "matches": ["https://www.google.com/*"]}]}"#,
    );
    let out = dir.path().join("dnr");

    let err = run(&manifest_path, &out).unwrap_err();
    assert!(matches!(err, Error::Configuration { found: 0, .. }));
    assert!(!out.exists());

    // Existing files are left alone, including the DNT sets built before the failure
    fs::create_dir_all(&out).unwrap();
    let stale_policy = out.join("dnt_policy.json");
    fs::write(&stale_policy, "[\"stale\"]").unwrap();

    let err = run(&manifest_path, &out).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(fs::read_to_string(&stale_policy).unwrap(), "[\"stale\"]");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let config = GeneratorConfig::default();

    let first = generate_all_rule_sets(&manifest, &config).unwrap().serialize().unwrap();
    let second = generate_all_rule_sets(&manifest, &config).unwrap().serialize().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_redirect_scenario() {
    let manifest = Manifest::from_json(
        r#"{"content_scripts": [{"js": ["js/firstparties/google.js"],
            "matches": ["https://www.google.com/*"]}]}"#,
    )
    .unwrap();
    let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default()).unwrap();
    let rules = sets.get(RuleSetName::BypassRedirects).unwrap();
    assert_eq!(rules.len(), 5);

    let first = &rules.rules()[0];
    let substitution = match &first.action {
        RuleAction::Redirect { redirect } => redirect.regex_substitution.as_str(),
        other => panic!("unexpected action {}", other),
    };
    assert_eq!(substitution, "\\1");

    let re = Regex::new(first.condition.regex_filter.as_deref().unwrap()).unwrap();
    let url = "https://www.google.com/url?.+&q=https://example.com";
    let caps = re.captures(url).unwrap();
    assert_eq!(&caps[1], "https://example.com");
}

#[test]
fn test_dnt_policy_outranks_every_block_rule() {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default()).unwrap();

    let allow_priority = sets.get(RuleSetName::DntPolicy).unwrap().rules()[0].priority;
    for (_, list) in sets.iter() {
        for rule in list {
            if rule.action == RuleAction::Block {
                assert!(allow_priority > rule.priority);
            }
        }
    }
}

#[test]
fn test_check_detects_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default()).unwrap();
    write_rule_sets(&sets, &mut DirectorySink::new(dir.path())).unwrap();

    // Drop a host: gen204 and redirect sets go stale, DNT sets do not
    let fewer = Manifest::from_json(
        r#"{"content_scripts": [{"js": ["js/firstparties/google.js"],
            "matches": ["https://www.google.com/*"]}]}"#,
    )
    .unwrap();
    let fresh = generate_all_rule_sets(&fewer, &GeneratorConfig::default()).unwrap();

    assert_eq!(
        find_stale_rule_sets(&fresh, dir.path()).unwrap(),
        vec![RuleSetName::Gen204, RuleSetName::BypassRedirects]
    );
}
