use libgraphql_compiler::runner::RunReport;

pub(crate) const GREEN_CHECK: &str = "\u{2705}";
pub(crate) const RED_X: &str = "\u{274c}";

/// Every error in `report`, one per line, prefixed with where it came from.
pub(crate) fn format_errors(report: &RunReport) -> String {
    report.errors.iter()
        .flat_map(|(origin, errors)| {
            errors.iter().map(move |err| format!("  * {origin}: {err}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn format_summary(report: &RunReport) -> String {
    format!(
        concat!(
            "  * Compiled {} definitions.\n",
            "  * Created {} artifacts.\n",
            "  * Updated {} artifacts.\n",
            "  * Deleted {} artifacts.\n",
            "  * Left {} artifacts unchanged.",
        ),
        report.compiled.len(),
        report.created.len(),
        report.updated.len(),
        report.deleted.len(),
        report.unchanged.len(),
    )
}
