use changelint::utils::testing::scenarios::{keep_a_changelog, nested_categories};
use changelint::utils::testing::{
    TestChangelogBuilder, TestScenario, TestTreeBuilder, TestVersion,
};
use changelint::{
    ChangeCategory, ChangelintConfig, ChangelogChecker, Error, IssueType, ReleaseDate,
    SeverityConfig, VersionLabel, add_entry, parse_changelog, parse_changelog_str,
    promote_unreleased, render_changelog, render_version, validate_changelog, write_changelog,
};
use chrono::NaiveDate;
use semver::Version;

#[test]
fn test_integration_keep_a_changelog_is_clean() {
    let tree = TestScenario::KeepAChangelog.build().unwrap();
    let status =
        ChangelogChecker::check_file(tree.join("CHANGELOG.md"), &ChangelintConfig::default());

    assert!(status.issues.is_empty(), "unexpected issues: {:?}", status.issues);
    assert_eq!(status.version_count, 3);
    assert_eq!(status.entry_count, 4);
    assert_eq!(status.latest_release.as_deref(), Some("0.2.0"));
}

#[test]
fn test_integration_nested_categories() {
    let changelog = parse_changelog_str(&nested_categories(), "CHANGELOG.md");
    let issues = validate_changelog(
        &changelog,
        &ChangelintConfig::default().changelog,
        &SeverityConfig::default(),
    );
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);

    // 0.1.0.dev1 is pending (tbd) and sorts above 0.0.14
    let pending = changelog.unreleased().unwrap();
    assert_eq!(pending.raw_label, "0.1.0.dev1");
    assert_eq!(pending.date, ReleaseDate::Tbd);

    let release = changelog.find_label("0.0.14").unwrap();
    let minor: Vec<_> = release
        .groups
        .iter()
        .filter(|g| g.category == ChangeCategory::Minor)
        .collect();
    assert_eq!(minor.len(), 1);
    assert_eq!(minor[0].parent, Some(ChangeCategory::Added));
    assert_eq!(
        minor[0].entries[0].text,
        "Added `SpatialData.subset()` API"
    );
}

#[test]
fn test_integration_nested_categories_tree_is_clean() {
    let tree = TestScenario::NestedCategories.build().unwrap();
    let status =
        ChangelogChecker::check_file(tree.join("CHANGELOG.md"), &ChangelintConfig::default());

    assert!(status.issues.is_empty(), "unexpected issues: {:?}", status.issues);
    assert_eq!(status.version_count, 3);
    assert_eq!(status.entry_count, 5);
    assert_eq!(status.latest_release.as_deref(), Some("0.0.14"));
}

#[test]
fn test_integration_missing_title() {
    let source = TestChangelogBuilder::new()
        .no_title()
        .version(
            TestVersion::new("0.1.0")
                .date("2024-01-01")
                .group("Added", &["a"]),
        )
        .build();
    let changelog = parse_changelog_str(&source, "CHANGELOG.md");
    let issues = validate_changelog(
        &changelog,
        &ChangelintConfig::default().changelog,
        &SeverityConfig::default(),
    );

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::MissingHeader);
    assert!(issues[0].is_error());
}

#[test]
fn test_integration_every_entry_has_one_category_and_version() {
    let changelog = parse_changelog_str(&keep_a_changelog(), "CHANGELOG.md");
    let listed: usize = changelog
        .versions
        .iter()
        .flat_map(|v| v.groups.iter())
        .map(|g| g.entries.len())
        .sum();
    let bullet_lines = keep_a_changelog()
        .lines()
        .filter(|l| l.starts_with("- "))
        .count();
    assert_eq!(listed, bullet_lines);
}

#[test]
fn test_integration_release_workflow() {
    let tree = TestScenario::KeepAChangelog.build().unwrap();
    let path = tree.join("CHANGELOG.md");

    let mut changelog = parse_changelog(&path).unwrap();
    add_entry(&mut changelog, ChangeCategory::Fixed, "reader handles empty tables").unwrap();
    promote_unreleased(
        &mut changelog,
        Version::new(0, 3, 0),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    )
    .unwrap();
    write_changelog(&path, &changelog).unwrap();

    let reloaded = parse_changelog(&path).unwrap();
    assert_eq!(reloaded.versions[0].label, VersionLabel::Unreleased);

    let released = reloaded.latest_release().unwrap();
    assert_eq!(released.version(), Some(&Version::new(0, 3, 0)));
    assert_eq!(released.entry_count(), 2);

    let status = ChangelogChecker::check_file(&path, &ChangelintConfig::default());
    assert!(status.format_valid, "issues: {:?}", status.issues);
}

#[test]
fn test_integration_show_latest_and_unreleased() {
    let changelog = parse_changelog_str(&keep_a_changelog(), "CHANGELOG.md");

    let latest = changelog.find_label("latest").unwrap();
    assert_eq!(
        render_version(latest),
        "## [0.2.0] - 2024-03-01\n\
         \n\
         ### Added\n\
         \n\
         - subset api\n\
         \n\
         ### Fixed\n\
         \n\
         - extent of empty elements\n"
    );

    let unreleased = changelog.find_label("unreleased").unwrap();
    assert_eq!(unreleased.label, VersionLabel::Unreleased);
    assert!(changelog.find_label("9.9.9").is_none());
}

#[test]
fn test_integration_render_preserves_content() {
    let source = TestChangelogBuilder::new()
        .preamble("Notable changes.")
        .version(
            TestVersion::new("0.0.2")
                .date("2023-02-01")
                .group("Added/Minor", &["one"])
                .group("Fixed", &["two", "three"]),
        )
        .version(
            TestVersion::new("0.0.1")
                .date("2023-01-01")
                .group("Added", &["initial"]),
        )
        .link("0.0.2", "https://example.org/0.0.2")
        .build();

    let changelog = parse_changelog_str(&source, "CHANGELOG.md");
    let rendered = render_changelog(&changelog);
    let reparsed = parse_changelog_str(&rendered, "CHANGELOG.md");

    assert_eq!(reparsed.entry_count(), 4);
    assert_eq!(reparsed.preamble, vec!["Notable changes.".to_string()]);
    assert_eq!(reparsed.links, changelog.links);
    assert_eq!(render_changelog(&reparsed), rendered);
}

#[test]
fn test_integration_strict_links() {
    let source = TestChangelogBuilder::new()
        .version(
            TestVersion::new("0.1.0")
                .date("2024-01-01")
                .group("Added", &["a"]),
        )
        .build();
    let changelog = parse_changelog_str(&source, "CHANGELOG.md");

    let mut config = ChangelintConfig::default();
    config.changelog = config.changelog.require_links(true);
    let issues = validate_changelog(&changelog, &config.changelog, &config.severity);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::MissingLink);
    assert!(issues[0].is_warning());
}

#[test]
fn test_integration_add_entry_keeps_unparsed_text() {
    let source = "# Changelog\n\
                  \n\
                  ## [0.1.0.post1] - 2024-02-01\n\
                  \n\
                  ### Fixed\n\
                  \n\
                  - hotfix for the reader\n\
                  - hotfix for the writer\n\
                  \n\
                  ## [0.1.0] - 2024-01-01\n\
                  \n\
                  Thanks to everyone who tested the beta.\n\
                  \n\
                  ### Added\n\
                  \n\
                  - first release\n";
    let tree = TestTreeBuilder::new()
        .file("CHANGELOG.md", source)
        .build()
        .unwrap();
    let path = tree.join("CHANGELOG.md");

    let mut changelog = parse_changelog(&path).unwrap();
    add_entry(&mut changelog, ChangeCategory::Fixed, "new fix").unwrap();
    let result = write_changelog(&path, &changelog);

    assert!(matches!(result, Err(Error::ChangelogError { .. })));
    assert_eq!(tree.read("CHANGELOG.md").unwrap(), source);
}
