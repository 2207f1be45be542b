// pre-defined test scenarios

use super::changelog_builder::{TestChangelogBuilder, TestVersion};
use super::tree_builder::{TestTree, TestTreeBuilder};

/// pre-defined test scenarios
pub enum TestScenario {
    /// one well-formed Keep a Changelog file at the root
    KeepAChangelog,
    /// nested `### Added` / `#### Minor` headings, `tbd` and `.devN` releases
    NestedCategories,
    /// a valid root changelog plus a package changelog with ordering errors
    MixedTree,
}

impl TestScenario {
    /// build a tree from a predefined scenario
    pub fn build(self) -> Result<TestTree, Box<dyn std::error::Error>> {
        match self {
            TestScenario::KeepAChangelog => TestTreeBuilder::new()
                .file("CHANGELOG.md", keep_a_changelog())
                .build(),
            TestScenario::NestedCategories => TestTreeBuilder::new()
                .file("CHANGELOG.md", nested_categories())
                .build(),
            TestScenario::MixedTree => TestTreeBuilder::new()
                .file("CHANGELOG.md", keep_a_changelog())
                .file("packages/io/CHANGELOG.md", out_of_order())
                .file("packages/io/README.md", "# io\n")
                .build(),
        }
    }
}

/// a well-formed changelog with an unreleased section and two releases
pub fn keep_a_changelog() -> String {
    TestChangelogBuilder::new()
        .preamble("All notable changes to this project will be documented in this file.")
        .version(TestVersion::new("Unreleased").group("Added", &["new reader"]))
        .version(
            TestVersion::new("0.2.0")
                .date("2024-03-01")
                .group("Added", &["subset api"])
                .group("Fixed", &["extent of empty elements"]),
        )
        .version(
            TestVersion::new("0.1.0")
                .date("2024-01-15")
                .group("Added", &["first release"]),
        )
        .link("Unreleased", "https://example.org/compare/v0.2.0...HEAD")
        .link("0.2.0", "https://example.org/compare/v0.1.0...v0.2.0")
        .link("0.1.0", "https://example.org/releases/v0.1.0")
        .build()
}

/// release history with nested category headings
pub fn nested_categories() -> String {
    TestChangelogBuilder::new()
        .version(
            TestVersion::new("0.1.0.dev1")
                .date("tbd")
                .group("Minor", &["dev release"]),
        )
        .version(
            TestVersion::new("0.0.14")
                .date("2023-10-11")
                .group("Added/Minor", &["Added `SpatialData.subset()` API"])
                .group("Added/Technical", &["Decoupled transformations from io"])
                .group("Fixed/Major", &["Fixed `get_extent()` for points"]),
        )
        .version(
            TestVersion::new("0.0.13")
                .date("2023-09-02")
                .group("Merged", &["Merged io refactor"]),
        )
        .build()
}

/// versions listed oldest first
pub fn out_of_order() -> String {
    TestChangelogBuilder::new()
        .version(
            TestVersion::new("0.0.1")
                .date("2023-01-01")
                .group("Added", &["initial"]),
        )
        .version(
            TestVersion::new("0.0.2")
                .date("2023-02-01")
                .group("Fixed", &["second"]),
        )
        .build()
}
