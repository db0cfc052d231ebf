//! End-of-run text summary.

use srcsetmaker::RunReport;

/// Print the closing summary for a run.
pub fn print(report: &RunReport) {
    if report.dry_run {
        print_plan(report);
        return;
    }

    let written: u64 = report
        .images
        .iter()
        .flat_map(|o| &o.entries)
        .filter_map(|e| e.bytes)
        .sum();
    let errors = report.images.iter().filter(|o| o.error.is_some()).count();

    println!("\nProcessing complete!");
    println!(
        "Successfully converted {} out of {} images",
        report.succeeded, report.found
    );
    println!("Total WebP output: {}", format_size(written));
    println!("Output saved to: {}", report.output_root.display());
    if let Some(manifest) = &report.manifest_path {
        println!("Details saved to: {}", manifest.display());
    }

    if errors > 0 {
        eprintln!("{} of {} files had errors", errors, report.found);
    }
}

fn print_plan(report: &RunReport) {
    for outcome in &report.images {
        if let Some(err) = &outcome.error {
            eprintln!("error: {err}");
            continue;
        }
        for entry in &outcome.entries {
            println!(
                "dry-run: {} -> {} ({}x{})",
                outcome.source.display(),
                entry.path.display(),
                entry.width,
                entry.height,
            );
        }
    }
    println!(
        "\nDry run: {} image(s) would be written to {}",
        report.succeeded,
        report.output_root.display()
    );
}

/// Human-readable byte count in B, KB or MB.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 2] = ["KB", "MB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    if value >= 1024.0 {
        value /= 1024.0;
        unit = UNITS[1];
    }
    format!("{value:.1} {unit}")
}
