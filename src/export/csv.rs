//! CSV export of analysis tables for spreadsheets and the balancer UI's import.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analysis::{AnalysisReport, MarginalUtilityResult, SynergyResult};
use crate::archetype::ArchetypeKind;
use crate::catalog::StatCatalog;

pub const MARGINAL_UTILITIES_FILE: &str = "marginal_utilities.csv";
pub const SYNERGIES_FILE: &str = "synergies.csv";

/// Columns: `archetype_id,name,kind,card,average_score,standard_deviation,marginal_utility_pct`.
/// `card` is the card of a single's stat (empty for baseline and pairs).
pub fn write_marginal_utilities_csv<W: Write>(
    writer: W,
    results: &[MarginalUtilityResult],
    catalog: &StatCatalog,
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "archetype_id",
        "name",
        "kind",
        "card",
        "average_score",
        "standard_deviation",
        "marginal_utility_pct",
    ])?;
    for result in results {
        let card = match &result.archetype.kind {
            ArchetypeKind::Single { stat_id, .. } => catalog
                .card_for(stat_id)
                .map(|card| card.label.as_str())
                .unwrap_or(""),
            _ => "",
        };
        let average = format!("{:.6}", result.average_score);
        let deviation = format!("{:.6}", result.standard_deviation);
        let utility = format!("{:.4}", result.marginal_utility);
        out.write_record([
            result.archetype.id.as_str(),
            result.archetype.name.as_str(),
            result.archetype.kind.as_str(),
            card,
            average.as_str(),
            deviation.as_str(),
            utility.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Columns: `stat_a,stat_b,pair_id,expected_delta,actual_delta,synergy_multiplier,classification`.
pub fn write_synergies_csv<W: Write>(writer: W, synergies: &[SynergyResult]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "stat_a",
        "stat_b",
        "pair_id",
        "expected_delta",
        "actual_delta",
        "synergy_multiplier",
        "classification",
    ])?;
    for synergy in synergies {
        let [stat_a, stat_b] = &synergy.stat_ids;
        let expected = format!("{:.6}", synergy.expected_delta);
        let actual = format!("{:.6}", synergy.actual_delta);
        let multiplier = format!("{:.4}", synergy.synergy_multiplier);
        out.write_record([
            stat_a.as_str(),
            stat_b.as_str(),
            synergy.pair_archetype.id.as_str(),
            expected.as_str(),
            actual.as_str(),
            multiplier.as_str(),
            synergy.classification().as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Write both tables into `dir` (created if missing). Returns the two file paths.
pub fn write_report_csv(
    dir: impl AsRef<Path>,
    report: &AnalysisReport,
    catalog: &StatCatalog,
) -> Result<(PathBuf, PathBuf), csv::Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let utilities_path = dir.join(MARGINAL_UTILITIES_FILE);
    let synergies_path = dir.join(SYNERGIES_FILE);
    write_marginal_utilities_csv(File::create(&utilities_path)?, &report.marginal_utilities, catalog)?;
    write_synergies_csv(File::create(&synergies_path)?, &report.synergies)?;
    Ok((utilities_path, synergies_path))
}
