//! Hand-maintained fixes for known gaps in the published data.
//!
//! Applied once, after every source row has been transformed.

use tracing::{info, warn};

use crate::types::{RegionId, RegionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Overwrites the listed fields of the record built from `source_code`.
    OverrideFields {
        label: &'static str,
        source_code: &'static str,
        fields: &'static [(&'static str, i64)],
    },
    /// Adds a whole record for a region the export does not cover.
    InjectRecord {
        label: &'static str,
        id: RegionId,
        fields: &'static [(&'static str, i64)],
    },
}

impl Correction {
    pub fn label(&self) -> &'static str {
        match self {
            Correction::OverrideFields { label, .. } | Correction::InjectRecord { label, .. } => label,
        }
    }
}

pub const CORRECTIONS: &[Correction] = &[
    // Praha 4 has no reported September capacities.
    Correction::OverrideFields {
        label: "Praha 4 September capacities",
        source_code: "1040",
        fields: &[("ms_kapacity_zari", 0), ("zs_kapacity_zari", 0)],
    },
    // The export has no city-wide row for Prague.
    Correction::InjectRecord {
        label: "Prague aggregate",
        id: 19,
        fields: &[
            ("ms_zapsani", 579),
            ("ms_kapacity_duben", 0),
            ("ms_kapacity_zari", 0),
            ("ms_uprchliku", 0),
            ("ms_zapsani_z_nahlasenych", 14),
            ("ms_previs", -2370),
            ("zs_zapsani", 4174),
            ("zs_kapacity_duben", 0),
            ("zs_kapacity_zari", 0),
            ("zs_uprchliku", 0),
            ("zs_zapsani_z_nahlasenych", 30),
            ("zs_previs_1_stupen", -1440),
            ("zs_previs_2_stupen", -1347),
            ("zs_previs", -2787),
        ],
    },
];

/// Applies `corrections` in order and returns how many took effect.
pub fn apply_corrections(records: &mut Vec<RegionRecord>, corrections: &[Correction]) -> usize {
    let mut applied = 0;
    for correction in corrections {
        match *correction {
            Correction::OverrideFields {
                label,
                source_code,
                fields,
            } => {
                let Some(record) = records
                    .iter_mut()
                    .find(|r| r.source_code.as_deref() == Some(source_code))
                else {
                    warn!("Correction '{}': no row with code {:?}", label, source_code);
                    continue;
                };
                for (name, value) in fields {
                    record.set(name, *value);
                }
                info!("Applied correction '{}' to region {}", label, record.id);
                applied += 1;
            }
            Correction::InjectRecord { label, id, fields } => {
                if records.iter().any(|r| r.id == id) {
                    warn!(
                        "Correction '{}': region {} already present in source data, keeping it",
                        label, id
                    );
                    continue;
                }
                let mut record = RegionRecord::new(id, None);
                for (name, value) in fields {
                    record.set(name, *value);
                }
                records.push(record);
                info!("Applied correction '{}' (injected region {})", label, id);
                applied += 1;
            }
        }
    }
    applied
}
