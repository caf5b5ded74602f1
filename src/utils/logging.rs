use took::Took;

use crate::routing::report::AllocationReport;

pub fn format_log_report_timed(method: &str, report: &AllocationReport, vehicles_used: usize, took: Took) -> String {
    format!("{method} - {}, took: {took}", format_log_report(report, vehicles_used))
}

/// `allocated/rejected/vehicles used`, plus the number of late commits if any
pub fn format_log_report(report: &AllocationReport, vehicles_used: usize) -> String {
    let late = report.num_late();
    if late > 0 {
        format!(
            "{}/{}/{} (late: {})",
            report.num_allocated(),
            report.num_rejected(),
            vehicles_used,
            late
        )
    } else {
        format!(
            "{}/{}/{}",
            report.num_allocated(),
            report.num_rejected(),
            vehicles_used
        )
    }
}
