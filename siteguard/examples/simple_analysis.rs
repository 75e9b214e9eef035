//! Example: analyze a layout snapshot and print spacing and wiring.
//! Run with: cargo run --example simple_analysis [path/to/snapshot.json]

use siteguard::{AnalysisOptions, ComplianceStatus, SiteGuardCore};
use std::path::Path;

fn main() -> Result<(), siteguard::SiteGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/substation.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_analysis [path/to/snapshot.json]");
        std::process::exit(1);
    }

    let analysis = SiteGuardCore::analyze_file(path, &AnalysisOptions::default())?;

    println!("{} objects in {}", analysis.object_count, path.display());
    for gap in &analysis.spacing.adjacency {
        let m = &gap.measurement;
        println!(
            "  {:>6.2}m {:?} {} <-> {} [{:?}] {}",
            m.gap_distance, m.axis, m.object_a, m.object_b, gap.verdict.status, gap.verdict.description
        );
    }
    for pair in &analysis.spacing.fallback {
        println!("  {:>6.2}m nearest {} <-> {}", pair.distance, pair.object_a, pair.object_b);
    }
    for conn in &analysis.topology.connections {
        println!(
            "  {} -> {} ({}, {:.2}m, {:?})",
            conn.from,
            conn.to,
            conn.link_type.label(),
            conn.distance,
            conn.status
        );
    }

    let errors = analysis
        .spacing
        .adjacency
        .iter()
        .filter(|g| g.verdict.status == ComplianceStatus::Error)
        .count();
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
