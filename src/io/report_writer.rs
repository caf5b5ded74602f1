use std::fs::File;
use std::io::{BufWriter, Write};

use itertools::Itertools;

use crate::routing::report::{AllocationOutcome, AllocationReport};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One block per delivery:
///
/// ```text
/// [OK] E01 - Salvador
///      Center: Recife
///      Vehicle: Re-1
///      Route: Recife → Salvador
///      Estimated time: 6h
///
/// [ERROR] E02: all 10 vehicles lacked capacity
/// ```
pub fn write_text(out: &mut impl Write, report: &AllocationReport) -> anyhow::Result<()> {
    for record in &report.records {
        let delivery = &record.delivery;
        match &record.outcome {
            AllocationOutcome::Allocated {
                vehicle_id,
                center,
                route,
                total_time,
                deadline_met,
            } => {
                writeln!(out, "[OK] {} - {}", delivery.id(), delivery.destination())?;
                writeln!(out, "     Center: {center}")?;
                writeln!(out, "     Vehicle: {vehicle_id}")?;
                writeln!(out, "     Route: {}", route.iter().join(" → "))?;
                if *deadline_met {
                    writeln!(out, "     Estimated time: {total_time}h")?;
                } else {
                    writeln!(
                        out,
                        "     Estimated time: {total_time}h (late, deadline {}h)",
                        delivery.deadline()
                    )?;
                }
                writeln!(out)?;
            }
            AllocationOutcome::Rejected { reasons } => {
                writeln!(out, "[ERROR] {}: {}", delivery.id(), reasons.iter().join("; "))?;
            }
        }
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, report: &AllocationReport) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_report(
    path: impl Into<String>,
    report: &AllocationReport,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let f = File::create(path.into())?;
    let mut file = BufWriter::new(&f);
    match format {
        ReportFormat::Text => write_text(&mut file, report)?,
        ReportFormat::Json => write_json(&mut file, report)?,
    }
    file.flush()?;
    Ok(())
}
