// Data processing pipeline: ingestion, processing, and output

pub mod ingestion;
pub mod output;
pub mod processing;

use csv::StringRecord;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::types::RegionRecord;
use ingestion::{CodeMap, CsvFormat, RegionResolver};
use processing::{apply_corrections, Correction, RowOutcome, RowTransformer, Schema, CORRECTIONS};

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub records_computed: usize,
    pub rows_unmapped: usize,
    pub rows_ignored: usize,
    pub corrections_applied: usize,
    pub records_written: usize,
    pub output_file: PathBuf,
}

/// Records built from the source rows, before corrections.
#[derive(Debug, Default)]
pub struct TransformResult {
    pub records: Vec<RegionRecord>,
    pub unmapped: usize,
    pub ignored: usize,
}

/// Sorted output records plus the counts behind them.
#[derive(Debug)]
pub struct BuiltRecords {
    pub records: Vec<RegionRecord>,
    pub computed: usize,
    pub unmapped: usize,
    pub ignored: usize,
    pub corrections_applied: usize,
}

pub struct Pipeline;

impl Pipeline {
    /// Runs every row through the transformer. Stops at the first parse error.
    pub fn transform_rows(
        rows: &[StringRecord],
        schema: &Schema,
        resolver: &RegionResolver,
    ) -> Result<TransformResult> {
        let transformer = RowTransformer::new(schema, resolver);
        let mut result = TransformResult::default();

        for row in rows {
            match transformer.transform(row)? {
                RowOutcome::Record(record) => result.records.push(record),
                RowOutcome::Ignored => result.ignored += 1,
                RowOutcome::Unmapped { code } => {
                    debug!("Skipping unmapped row {:?}", code);
                    result.unmapped += 1;
                }
            }
        }
        Ok(result)
    }

    /// Transforms, corrects and sorts; everything short of touching the disk.
    pub fn build_records(
        rows: &[StringRecord],
        schema: &Schema,
        resolver: &RegionResolver,
        corrections: &[Correction],
    ) -> Result<BuiltRecords> {
        let transformed = Self::transform_rows(rows, schema, resolver)?;
        let computed = transformed.records.len();
        let mut records = transformed.records;

        let corrections_applied = apply_corrections(&mut records, corrections);
        output::sort_records(&mut records);

        Ok(BuiltRecords {
            records,
            computed,
            unmapped: transformed.unmapped,
            ignored: transformed.ignored,
            corrections_applied,
        })
    }

    /// Run the complete pipeline: read every input, transform, correct, write JSON.
    #[instrument(skip(config), fields(output = %config.output.display()))]
    pub fn run(config: &Config) -> Result<RunSummary> {
        info!("Loading codebooks from {}", config.data_dir.display());
        let orp = CodeMap::load(&config.orp_codebook_path(), CsvFormat::ORP_CODEBOOK)?;
        let districts =
            CodeMap::load(&config.district_codebook_path(), CsvFormat::DISTRICT_CODEBOOK)?;
        let resolver = RegionResolver::new(orp, districts);

        let capacities_path = config.capacities_path();
        let rows = ingestion::load_capacity_rows(&capacities_path)?;
        info!("Read {} rows from {}", rows.len(), capacities_path.display());

        let schema = Schema::capacities()?;
        let built = Self::build_records(&rows, &schema, &resolver, CORRECTIONS)?;

        output::write_json(&config.output, &built.records)?;
        let output_file = std::path::absolute(&config.output)?;

        let summary = RunSummary {
            rows_read: rows.len(),
            records_computed: built.computed,
            rows_unmapped: built.unmapped,
            rows_ignored: built.ignored,
            corrections_applied: built.corrections_applied,
            records_written: built.records.len(),
            output_file,
        };
        info!(
            "Wrote {} records ({} computed, {} unmapped rows, {} ignored, {} corrections)",
            summary.records_written,
            summary.records_computed,
            summary.rows_unmapped,
            summary.rows_ignored,
            summary.corrections_applied
        );
        Ok(summary)
    }
}
