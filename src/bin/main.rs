use anyhow::{Context, Result};
use changelint::{
    ChangeCategory, ChangelintConfig, ChangelogAnalysis, ChangelogChecker, VersionLabel,
    add_entry, is_canonical, parse_changelog, parse_changelog_str, parse_release_date,
    promote_unreleased, render_changelog, render_version, write_changelog,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "changelint")]
#[command(version, about = "linter and release tool for Keep a Changelog files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// output format (json or human)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// configuration file (defaults to changelint.toml next to the changelog)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// validate one or more changelog files
    Check {
        /// changelog files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// show detailed issue tables (errors and warnings)
        #[arg(short, long)]
        verbose: bool,
    },

    /// find and validate every changelog below a directory
    Scan {
        /// directory to scan (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// show detailed issue tables (errors and warnings)
        #[arg(short, long)]
        verbose: bool,
    },

    /// list the versions of a changelog
    Versions {
        file: PathBuf,
    },

    /// print one version section
    Show {
        file: PathBuf,

        /// version, 'latest' or 'unreleased'
        version: String,
    },

    /// print the changelog in canonical form
    Fmt {
        file: PathBuf,

        /// rewrite the file in place
        #[arg(short, long, conflicts_with = "check")]
        write: bool,

        /// fail if the file is not in canonical form
        #[arg(long)]
        check: bool,
    },

    /// turn the unreleased section into a dated release
    Release {
        file: PathBuf,

        /// version of the new release
        version: String,

        /// release date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// add an entry to the unreleased section
    Add {
        file: PathBuf,

        /// category heading, e.g. Added, Fixed, Minor
        category: ChangeCategory,

        /// entry text
        text: String,
    },
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Check { files, verbose } => {
            let root = files
                .first()
                .and_then(|f| f.parent())
                .unwrap_or(Path::new("."));
            let config = load_config(cli.config.as_deref(), root)?;
            let analysis = ChangelogChecker::check_files(&files, &config);
            report_analysis(&analysis, &cli.format, verbose)?;
        }
        Commands::Scan { path, verbose } => {
            let config = load_config(cli.config.as_deref(), &path)?;
            let analysis = ChangelogChecker::scan(&path, &config)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            report_analysis(&analysis, &cli.format, verbose)?;
        }
        Commands::Versions { file } => {
            handle_versions(&file, &cli.format)?;
        }
        Commands::Show { file, version } => {
            handle_show(&file, &version, &cli.format)?;
        }
        Commands::Fmt { file, write, check } => {
            handle_fmt(&file, write, check)?;
        }
        Commands::Release {
            file,
            version,
            date,
        } => {
            handle_release(&file, &version, date.as_deref())?;
        }
        Commands::Add {
            file,
            category,
            text,
        } => {
            let mut changelog = parse_changelog(&file).context("failed to read changelog")?;
            add_entry(&mut changelog, category.clone(), &text)
                .context("failed to add changelog entry")?;
            write_changelog(&file, &changelog).context("failed to write changelog")?;
            println!("added {} entry to {}", category, file.display());
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>, root: &Path) -> Result<ChangelintConfig> {
    ChangelintConfig::load(explicit, root).context("failed to load configuration")
}

fn report_analysis(
    analysis: &ChangelogAnalysis,
    format: &OutputFormat,
    verbose: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "analyzed_changelogs": analysis.statuses.len(),
                "valid_changelogs": analysis.valid_changelogs.len(),
                "invalid_changelogs": analysis.invalid_changelogs.len(),
                "total_issues": analysis.total_issues,
                "total_errors": analysis.total_errors,
                "total_warnings": analysis.total_warnings,
                "compliance_percentage": analysis.compliance_percentage(),
                "all_valid": analysis.all_valid(),
                "changelogs": analysis.statuses.values().collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            analysis.display_table();

            if verbose && analysis.total_issues > 0 {
                analysis.display_issues();
            }

            analysis.display_summary();
        }
    }

    if analysis.has_errors() {
        // return error to cause non-zero exit code
        anyhow::bail!("validation failed with {} error(s)", analysis.total_errors);
    }

    Ok(())
}

fn handle_versions(file: &Path, format: &OutputFormat) -> Result<()> {
    let changelog = parse_changelog(file).context("failed to read changelog")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = changelog
                .versions
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "label": v.raw_label,
                        "version": v.version().map(|version| version.to_string()),
                        "date": v.date.date(),
                        "pending": v.is_pending(),
                        "yanked": v.yanked,
                        "entries": v.entry_count(),
                        "categories": v.categories(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            let label_width = changelog
                .versions
                .iter()
                .map(|v| v.raw_label.len())
                .max()
                .unwrap_or(7)
                .max(7);

            println!(
                "  {:<label_width$}  {:<10}  {:>7}  Categories",
                "Version",
                "Date",
                "Entries",
                label_width = label_width
            );
            println!(
                "  {}  ----------  -------  ----------",
                "-".repeat(label_width)
            );

            for v in &changelog.versions {
                let date = v.date.to_string();
                let categories: Vec<String> =
                    v.categories().iter().map(|c| c.to_string()).collect();
                println!(
                    "  {:<label_width$}  {:<10}  {:>7}  {}{}",
                    v.raw_label,
                    if date.is_empty() { "-" } else { date.as_str() },
                    v.entry_count(),
                    categories.join(", "),
                    if v.yanked { " (yanked)" } else { "" },
                    label_width = label_width
                );
            }
        }
    }

    Ok(())
}

fn handle_show(file: &Path, query: &str, format: &OutputFormat) -> Result<()> {
    let changelog = parse_changelog(file).context("failed to read changelog")?;
    let section = changelog
        .find_label(query)
        .ok_or_else(|| changelint::Error::VersionNotFound {
            label: query.to_string(),
        })?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(section)?);
        }
        OutputFormat::Human => {
            print!("{}", render_version(section));
        }
    }

    Ok(())
}

fn handle_fmt(file: &Path, write: bool, check: bool) -> Result<()> {
    let original = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let changelog = parse_changelog_str(&original, file);

    if check {
        if !is_canonical(&original, &changelog) {
            anyhow::bail!("{} is not in canonical form", file.display());
        }
        println!("{} is in canonical form", file.display());
    } else if write {
        if is_canonical(&original, &changelog) {
            println!("{} already in canonical form", file.display());
        } else {
            write_changelog(file, &changelog).context("failed to write changelog")?;
            println!("formatted {}", file.display());
        }
    } else {
        if !changelog.is_lossless() {
            log::warn!(
                "{}: lines {:?} are not part of any entry and are left out",
                file.display(),
                changelog.dropped_lines
            );
        }
        print!("{}", render_changelog(&changelog));
    }

    Ok(())
}

fn handle_release(file: &Path, version: &str, date: Option<&str>) -> Result<()> {
    let version = match VersionLabel::parse(version).map_err(anyhow::Error::msg)? {
        VersionLabel::Release(version) => version,
        other => anyhow::bail!("'{}' is not a release version", other),
    };

    let date = match date {
        Some(date) => parse_release_date(date)?,
        None => chrono::Local::now().date_naive(),
    };

    let mut changelog = parse_changelog(file).context("failed to read changelog")?;
    promote_unreleased(&mut changelog, version.clone(), date)
        .context("failed to promote unreleased section")?;
    write_changelog(file, &changelog).context("failed to write changelog")?;

    println!("released {} ({}) in {}", version, date, file.display());
    Ok(())
}
