//! SiteGuard CLI - site layout spacing compliance and electrical topology
//! from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use siteguard::topology::TopologyPlausibility;
use siteguard::{
    AnalysisOptions, ElectricalTopology, Issue, LayoutAnalysis, LinkType, Severity,
    SiteGuardCore, SiteGuardError, SpacingRulesEngine,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Default object-count guard for the pairwise stages
const DEFAULT_MAX_OBJECTS: usize = 500;

#[derive(Parser)]
#[command(name = "siteguard")]
#[command(about = "Site layout spacing compliance and electrical topology tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check spacing compliance and wiring of a layout snapshot
    Check {
        /// Path to a JSON snapshot of placed objects
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// JSON file with analysis options and spacing thresholds
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Refuse snapshots with more objects than this
        #[arg(long)]
        max_objects: Option<usize>,

        /// Log analysis progress to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the inferred electrical topology
    Topology {
        /// Path to a JSON snapshot of placed objects
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: TopologyFormat,
    },

    /// List spacing and wiring rules
    Rules {
        /// Show thresholds for each rule
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD or a renderer
    Json,
    /// GitHub Actions format
    Github,
    /// GitLab CI format
    Gitlab,
}

#[derive(Clone, ValueEnum)]
enum TopologyFormat {
    Human,
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Critical,
    High,
    Medium,
    Low,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
            config,
            max_objects,
            verbose,
        } => {
            init_tracing(verbose);
            handle_check(&file, format, fail_on, config.as_deref(), max_objects)
        }
        Commands::Topology { file, format } => {
            init_tracing(false);
            handle_topology(&file, format)
        }
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("siteguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(
    config: Option<&Path>,
    max_objects: Option<usize>,
) -> Result<AnalysisOptions, SiteGuardError> {
    let mut options = match config {
        Some(path) => AnalysisOptions::load(path)?,
        None => AnalysisOptions::default(),
    };
    options.max_objects = max_objects
        .or(options.max_objects)
        .or(Some(DEFAULT_MAX_OBJECTS));
    Ok(options)
}

fn handle_check(
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    config: Option<&Path>,
    max_objects: Option<usize>,
) -> i32 {
    let result = load_options(config, max_objects)
        .and_then(|options| SiteGuardCore::analyze_file(file, &options));

    match result {
        Ok(analysis) => {
            let issues = analysis.issues();
            output_results(file, &analysis, &issues, &format);
            if let Some(severity) = fail_on {
                if should_fail(&issues, &severity) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_topology(file: &Path, format: TopologyFormat) -> i32 {
    let options = AnalysisOptions {
        alignment: false,
        fallback: false,
        max_objects: Some(DEFAULT_MAX_OBJECTS),
        ..AnalysisOptions::default()
    };

    match SiteGuardCore::analyze_file(file, &options) {
        Ok(analysis) => {
            match format {
                TopologyFormat::Human => {
                    output_topology_human(&analysis.topology, &analysis.plausibility)
                }
                TopologyFormat::Json => print_json(&serde_json::json!({
                    "connections": analysis.topology.connections,
                    "plausibility": analysis.plausibility,
                })),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(issues: &[Issue], severity: &FailOnSeverity) -> bool {
    let stats = siteguard::issues_to_stats(issues);
    match severity {
        FailOnSeverity::Critical => stats.critical > 0,
        FailOnSeverity::High => stats.critical > 0 || stats.high > 0,
        FailOnSeverity::Medium => stats.critical > 0 || stats.high > 0 || stats.medium > 0,
        FailOnSeverity::Low => !issues.is_empty(),
    }
}

fn output_results(file: &Path, analysis: &LayoutAnalysis, issues: &[Issue], format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(file, analysis, issues),
        OutputFormat::Json => output_json(file, analysis, issues),
        OutputFormat::Github => output_github(file, issues),
        OutputFormat::Gitlab => output_gitlab(file, issues),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn output_human(file: &Path, analysis: &LayoutAnalysis, issues: &[Issue]) {
    let stats = siteguard::issues_to_stats(issues);

    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));
    println!(
        "  {} objects, {} facing gaps, {} nearest-neighbour pairs, {} connections",
        analysis.object_count,
        analysis.spacing.adjacency.len(),
        analysis.spacing.fallback.len(),
        analysis.topology.connections.len()
    );

    if issues.is_empty() {
        println!("  No issues found");
        return;
    }

    let sections = [
        ("CRITICAL", Severity::Error),
        ("HIGH", Severity::Warning),
        ("MEDIUM", Severity::Suggestion),
        ("LOW", Severity::Info),
    ];
    for (title, severity) in sections {
        let matching: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if matching.is_empty() {
            continue;
        }
        println!("\n  {}:", title);
        for issue in matching {
            println!("    - {}", issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("      Suggestion: {}", suggestion);
            }
        }
    }

    println!("\n  Summary:");
    println!("    Critical: {}", stats.critical);
    println!("    High:     {}", stats.high);
    println!("    Medium:   {}", stats.medium);
    println!("    Low:      {}", stats.low);
}

fn output_json(file: &Path, analysis: &LayoutAnalysis, issues: &[Issue]) {
    let stats = siteguard::issues_to_stats(issues);
    print_json(&serde_json::json!({
        "file": file.display().to_string(),
        "issues": issues,
        "stats": stats,
        "analysis": analysis,
    }));
}

fn severity_to_github(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error | Severity::Warning => "error",
        Severity::Suggestion => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(file: &Path, issues: &[Issue]) {
    for issue in issues {
        println!(
            "::{} file={}::{}",
            severity_to_github(issue),
            file.display(),
            issue.message.replace('\n', " ")
        );
    }
}

fn severity_to_gitlab(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error => "blocker",
        Severity::Warning => "major",
        Severity::Suggestion => "minor",
        Severity::Info => "info",
    }
}

fn output_gitlab(file: &Path, issues: &[Issue]) {
    let reports: Vec<_> = issues
        .iter()
        .map(|issue| {
            serde_json::json!({
                "description": issue.message,
                "check_name": issue.rule_id,
                "fingerprint": issue.id,
                "severity": severity_to_gitlab(issue),
                "location": {
                    "path": file.display().to_string(),
                }
            })
        })
        .collect();
    print_json(&serde_json::Value::Array(reports));
}

fn output_topology_human(topology: &ElectricalTopology, plausibility: &TopologyPlausibility) {
    if topology.is_empty() {
        println!("No electrical connections inferred");
        return;
    }

    for link_type in [
        LinkType::SourceToDistribution,
        LinkType::DistributionToLoad,
        LinkType::SourceToLoad,
    ] {
        let links: Vec<_> = topology.of_type(link_type).collect();
        if links.is_empty() {
            continue;
        }
        println!("\n{}:", link_type.label());
        for conn in links {
            println!(
                "  {} -> {}  {:.2}m ({:?}, optimal <= {}m, max {}m)",
                conn.from,
                conn.to,
                conn.distance,
                conn.status,
                conn.compliance_rule.optimal_distance,
                conn.compliance_rule.max_distance
            );
        }
    }

    if !plausibility.is_plausible() {
        println!("\nPlausibility warnings:");
        for warning in &plausibility.warnings {
            println!("  - {}", warning.message());
        }
    }
}

fn handle_rules(verbose: bool) {
    println!("Spacing rules (first match wins):\n");

    let engine = SpacingRulesEngine::default();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.summary());
        }
        println!();
    }

    println!("Wiring rules:\n");
    for link_type in [
        LinkType::SourceToDistribution,
        LinkType::DistributionToLoad,
        LinkType::SourceToLoad,
    ] {
        let rule = link_type.rule();
        println!("  {}", link_type.label());
        if verbose {
            println!(
                "    optimal <= {}m, acceptable <= {}m",
                rule.optimal_distance, rule.max_distance
            );
        }
        println!();
    }
}
