//! Text and CSV output for contact reports.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::contacts::LigandReport;
use crate::error::Result;

/// Human-readable summary, one block per ligand instance.
pub fn render_text(reports: &[LigandReport], cutoff: f64) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "\nResidues within {:?} Å of {}:", cutoff, report.ligand);
        if report.contacts.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        for c in &report.contacts {
            let _ = writeln!(
                out,
                "  {:>3}  Chain {}  {}{:1}   min d = {:.3} Å",
                c.resname, c.chain, c.resnum, c.icode, c.min_distance
            );
        }
        let _ = writeln!(out, "Total: {}", report.contacts.len());
    }
    out
}

const CSV_HEADER: [&str; 6] = ["ligand", "resname", "chain", "resnum", "icode", "min_distance"];

#[derive(Serialize)]
struct CsvRow<'a> {
    ligand: &'a str,
    resname: &'a str,
    chain: &'a str,
    resnum: i32,
    icode: &'a str,
    min_distance: f64,
}

/// Header plus one row per contact; distances rounded to three decimals.
/// The header is written even when no ligand instance has contacts.
pub fn write_csv<W: std::io::Write>(writer: W, reports: &[LigandReport]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for report in reports {
        for c in &report.contacts {
            csv.serialize(CsvRow {
                ligand: &report.ligand,
                resname: &c.resname,
                chain: &c.chain,
                resnum: c.resnum,
                icode: &c.icode,
                min_distance: round3(c.min_distance),
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, reports: &[LigandReport]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, reports)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
