//! CLI entry point for canopy

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use canopy::output::{
    ComparisonInfo, OutputConfig, TerminalRenderer, export_all, export_comparison,
    print_comparison,
};
use canopy::{BuildOptions, MetricFlags, PatternKind, TreeBuilder, collect_git_status};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(about = "Filtered directory trees with ignore rules, metrics, exports and comparisons")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filtered tree
    Visualize {
        /// Directory to display
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Mark files with their git status (U, M, A, D)
        #[arg(short = 'G', long = "git-status")]
        git_status: bool,
    },

    /// Write the filtered tree to one or more files
    Export {
        /// Directory to export
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Formats to write: txt, json, html, md, jsx
        #[arg(short = 'f', long = "format", required = true)]
        formats: Vec<String>,

        /// Directory the files are written to
        #[arg(short = 'o', long = "output-dir", default_value = ".")]
        output_dir: PathBuf,

        /// File name prefix
        #[arg(short = 'n', long = "name", default_value = "structure")]
        name: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Mark files with their git status (U, M, A, D)
        #[arg(short = 'G', long = "git-status")]
        git_status: bool,
    },

    /// Show two filtered trees with their differences highlighted
    Compare {
        dir1: PathBuf,
        dir2: PathBuf,

        /// Also write an HTML comparison
        #[arg(long)]
        save: bool,

        /// Directory the comparison is written to
        #[arg(short = 'o', long = "output-dir", default_value = ".")]
        output_dir: PathBuf,

        /// File name prefix
        #[arg(short = 'n', long = "name", default_value = "comparison")]
        name: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

/// Options deciding which entries are shown.
/// Every list accepts repeated flags and space-separated values.
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Directory names to exclude
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// File extensions to exclude (e.g. ".log tmp")
    #[arg(short = 'x', long = "exclude-ext")]
    exclude_ext: Vec<String>,

    /// Patterns of paths to exclude
    #[arg(short = 'p', long = "exclude-pattern")]
    exclude_pattern: Vec<String>,

    /// Patterns of paths to keep; excluded entries matching one are shown again
    #[arg(short = 'i', long = "include-pattern")]
    include_pattern: Vec<String>,

    /// Treat patterns as regular expressions instead of globs
    #[arg(short = 'r', long = "regex")]
    regex: bool,

    /// Ignore file read in every directory (e.g. .gitignore)
    #[arg(short = 'g', long = "ignore-file", value_name = "NAME")]
    ignore_file: Option<String>,

    /// Descend only N levels deep (0 = unlimited)
    #[arg(short = 'd', long = "depth", default_value = "0")]
    depth: usize,
}

/// Options deciding how entries are shown.
#[derive(Args, Debug, Clone, Default)]
struct DisplayArgs {
    /// Show full file paths
    #[arg(short = 'l', long = "full-path")]
    full_path: bool,

    /// Show line counts and sort by them
    #[arg(short = 's', long = "sort-by-loc")]
    sort_by_loc: bool,

    /// Show sizes and sort by them
    #[arg(short = 'z', long = "sort-by-size")]
    sort_by_size: bool,

    /// Show modification times and sort by them
    #[arg(short = 'm', long = "sort-by-mtime")]
    sort_by_mtime: bool,
}

impl DisplayArgs {
    fn metrics(&self) -> MetricFlags {
        MetricFlags {
            lines: self.sort_by_loc,
            size: self.sort_by_size,
            mtime: self.sort_by_mtime,
        }
    }
}

/// Flatten repeated flags whose values may hold several space-separated items.
fn split_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split_whitespace())
        .map(str::to_string)
        .collect()
}

fn build_options(filters: &FilterArgs, display: &DisplayArgs) -> BuildOptions {
    BuildOptions {
        exclude_dirs: split_values(&filters.exclude),
        ignore_file: filters.ignore_file.clone().filter(|f| !f.trim().is_empty()),
        exclude_extensions: split_values(&filters.exclude_ext),
        exclude_patterns: split_values(&filters.exclude_pattern),
        include_patterns: split_values(&filters.include_pattern),
        pattern_kind: if filters.regex {
            PatternKind::Regex
        } else {
            PatternKind::Glob
        },
        max_depth: filters.depth,
        show_full_path: display.full_path,
        metrics: display.metrics(),
    }
}

fn output_config(display: &DisplayArgs, use_color: bool, base: &Path) -> OutputConfig {
    OutputConfig {
        use_color,
        show_full_path: display.full_path,
        metrics: display.metrics(),
        base_path: Some(base.to_path_buf()),
    }
}

/// Absolute form of a user-supplied directory, checked to exist.
fn resolve_root(path: &Path) -> Result<PathBuf, canopy::Error> {
    if !path.is_dir() {
        return Err(canopy::Error::InvalidRoot(path.to_path_buf()));
    }
    Ok(path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf()))
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

fn builder_for(options: BuildOptions, root: &Path, git_status: bool) -> TreeBuilder {
    if options.max_depth > 0 {
        info!("Limiting depth to {} levels", options.max_depth);
    }
    let builder = TreeBuilder::new(options);
    if !git_status {
        return builder;
    }
    match collect_git_status(root) {
        Some(status) => builder.with_git_status(status),
        None => {
            debug!("{} is not inside a git repository", root.display());
            builder
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let use_color = should_use_color(cli.color);

    match cli.command {
        Command::Visualize {
            path,
            filters,
            display,
            git_status,
        } => {
            let root = resolve_root(&path)?;
            let builder = builder_for(build_options(&filters, &display), &root, git_status);
            let tree = builder.build(&root)?;
            let renderer = TerminalRenderer::new(output_config(&display, use_color, &root));
            renderer.print(&tree.root, &root_name(&root))?;
        }

        Command::Export {
            path,
            formats,
            output_dir,
            name,
            filters,
            display,
            git_status,
        } => {
            let root = resolve_root(&path)?;
            let builder = builder_for(build_options(&filters, &display), &root, git_status);
            let tree = builder.build(&root)?;
            let formats = split_values(&formats);
            info!("Exporting to {} format(s)", formats.len());

            let config = output_config(&display, false, &root);
            let results = export_all(
                &formats,
                &tree.root,
                &root_name(&root),
                &config,
                &output_dir,
                &name,
            );

            let mut failed = false;
            for (format, result) in results {
                match result {
                    Ok(written) => println!("Exported {} to {}", format, written.display()),
                    Err(e) => {
                        eprintln!("canopy: {}", e);
                        failed = true;
                    }
                }
            }
            if failed {
                process::exit(1);
            }
        }

        Command::Compare {
            dir1,
            dir2,
            save,
            output_dir,
            name,
            filters,
            display,
        } => {
            let left = resolve_root(&dir1)?;
            let right = resolve_root(&dir2)?;
            let options = build_options(&filters, &display);
            let builder = builder_for(options.clone(), &left, false);
            let comparison = canopy::tree::compare_with(&builder, &left, &right)?;

            let info = ComparisonInfo {
                left_name: root_name(&left),
                right_name: root_name(&right),
                left_path: left.clone(),
                right_path: right.clone(),
                exclude_patterns: options.exclude_patterns,
                include_patterns: options.include_patterns,
                pattern_kind: options.pattern_kind,
                max_depth: options.max_depth,
            };
            let config = output_config(&display, use_color, &left);
            print_comparison(&comparison, &info, &config)?;

            if save {
                let html_config = OutputConfig {
                    use_color: false,
                    ..config
                };
                let written =
                    export_comparison(&comparison, &info, &html_config, &output_dir, &name)?;
                println!("Comparison saved to {}", written.display());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("canopy: {}", e);
        process::exit(1);
    }
}
