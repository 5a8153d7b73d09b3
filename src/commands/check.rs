//! Validate configuration and content

use anyhow::Result;

use crate::build::BuildFilter;
use crate::validate::Report;
use crate::Site;

/// Run every check and print the findings.
///
/// Returns the report; callers decide the exit status from
/// [`Report::has_errors`].
pub fn run(site: &Site, json: bool) -> Result<Report> {
    let (loaded, report) = site.check();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }

    let filter = BuildFilter::now(&site.config);
    let built = filter.select(&loaded.posts).len();
    println!(
        "Checked {} posts ({} in a production build): {} errors, {} warnings",
        loaded.posts.len() + loaded.failures.len(),
        built,
        report.errors().count(),
        report.warnings().count()
    );

    Ok(report)
}
