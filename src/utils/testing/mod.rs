// testing utilities for generating changelogs and directory trees

pub mod changelog_builder;
pub mod scenarios;
pub mod tree_builder;

pub use changelog_builder::{TestChangelogBuilder, TestVersion};
pub use scenarios::TestScenario;
pub use tree_builder::{TestTree, TestTreeBuilder};
