use std::fs;
use std::path::Path;

use tempfile::tempdir;

use sponsor_splice_core::config::ActionConfig;
use sponsor_splice_core::contract::{PrivacyLevel, Sponsor, SponsorEntity, Status, Tier};
use sponsor_splice_core::patch::{marker_regex, patch_file};

fn sponsors() -> Vec<Sponsor> {
    ["JamesIves", "MontezumaIves"]
        .iter()
        .map(|login| Sponsor {
            created_at: "123".to_string(),
            privacy_level: PrivacyLevel::Public,
            tier: Tier {
                monthly_price_in_cents: 8000,
            },
            entity: SponsorEntity {
                name: None,
                login: login.to_string(),
                url: format!("https://github.com/{login}"),
                website_url: None,
            },
        })
        .collect()
}

fn config_for(file: &Path) -> ActionConfig {
    ActionConfig {
        token: "123".to_string(),
        file: file.to_path_buf(),
        template: "[{{{ login }}}]".to_string(),
        minimum: 6000,
        maximum: 10000,
        marker: "sponsors".to_string(),
        fallback: "There are no sponsors in this tier".to_string(),
        ..ActionConfig::default()
    }
}

#[test]
fn test_patch_file_replaces_only_marker_region() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("README.test.md");
    fs::write(
        &file,
        "Generated README file for testing <!-- sponsors --><!-- sponsors --> - do not commit",
    )
    .unwrap();

    let status = patch_file(&sponsors(), &config_for(&file)).expect("patch should succeed");

    assert_eq!(status, Status::Success);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "Generated README file for testing <!-- sponsors -->[JamesIves][MontezumaIves]<!-- sponsors --> - do not commit"
    );
}

#[test]
fn test_patch_file_is_idempotent() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("README.md");
    fs::write(
        &file,
        "# Title\n\n<!-- sponsors -->\nold\ncontent\n<!-- sponsors -->\n\nFooter\n",
    )
    .unwrap();
    let config = config_for(&file);

    patch_file(&sponsors(), &config).unwrap();
    let first = fs::read_to_string(&file).unwrap();
    patch_file(&sponsors(), &config).unwrap();
    let second = fs::read_to_string(&file).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        "# Title\n\n<!-- sponsors -->[JamesIves][MontezumaIves]<!-- sponsors -->\n\nFooter\n"
    );
}

#[test]
fn test_patch_file_skips_when_marker_missing() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("README.test.md");
    let original =
        "Generated README file for testing <!-- sponsorrrr --><!-- sponsors --> - do not commit";
    fs::write(&file, original).unwrap();

    let status = patch_file(&sponsors(), &config_for(&file)).expect("skip is not an error");

    assert_eq!(status, Status::Skipped);
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_patch_file_writes_fallback_when_filtered_empty() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("README.md");
    fs::write(&file, "<!-- sponsors -->x<!-- sponsors -->").unwrap();
    let mut config = config_for(&file);
    config.minimum = 50_000;

    patch_file(&sponsors(), &config).unwrap();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "<!-- sponsors -->There are no sponsors in this tier<!-- sponsors -->"
    );
}

#[test]
fn test_patch_file_does_not_expand_dollar_signs_in_output() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("README.md");
    fs::write(&file, "<!-- sponsors --><!-- sponsors -->").unwrap();
    let mut config = config_for(&file);
    config.template = "$1 {{{ login }}} $2".to_string();
    config.minimum = 0;
    config.maximum = 0;

    patch_file(&sponsors()[..1], &config).unwrap();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "<!-- sponsors -->$1 JamesIves $2<!-- sponsors -->"
    );
}

#[test]
fn test_patch_file_missing_file_is_file_error_without_token() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("secret-token-123").join("README.md");
    let mut config = config_for(&file);
    config.token = "secret-token-123".to_string();

    let err = patch_file(&sponsors(), &config).unwrap_err();
    let msg = err.to_string();

    assert!(msg.starts_with("There was an error generating the updated file: "), "{msg}");
    assert!(msg.ends_with(" ❌"), "{msg}");
    assert!(!msg.contains("secret-token-123"), "token leaked: {msg}");
}

#[test]
fn test_marker_regex_escapes_marker_text() {
    let regex = marker_regex("sponsors (gold)").unwrap();

    assert!(regex.is_match("<!-- sponsors (gold) -->a<!-- sponsors (gold) -->"));
    assert!(!regex.is_match("<!-- sponsors gold -->a<!-- sponsors gold -->"));
}
