//! Column layout of the capacity export and the numeric policy of every field.
//!
//! The export has no usable header, so cells are bound by position. A `None`
//! in the layout is a column we never read. Names without an entry in
//! [`FIELD_RULES`] (such as `orp_nazev`) are dropped as well.

use crate::error::{CapacityError, Result};

/// Column holding the source region code.
pub const REGION_CODE_COLUMN: &str = "orp_kod";

/// Sum of the April capacities of every class year.
pub const ZS_APRIL_CAPACITY: &str = "zs_kapacity_duben";

pub const CAPACITY_LAYOUT: &[Option<&str>] = &[
    Some(REGION_CODE_COLUMN),
    Some("orp_nazev"),
    // kindergartens
    Some("ms_zapsani"),
    None,
    Some("ms_kapacity_duben"),
    Some("ms_kapacity_zari"),
    Some("ms_uprchliku"),
    Some("ms_zapsani_z_nahlasenych"),
    Some("ms_previs"),
    // primary schools
    Some("zs_zapsani"),
    Some("zs_kapacity_duben_malotridky"),
    Some("zs_kapacity_duben_1"),
    Some("zs_kapacity_duben_2"),
    Some("zs_kapacity_duben_3"),
    Some("zs_kapacity_duben_4"),
    Some("zs_kapacity_duben_5"),
    Some("zs_kapacity_duben_6"),
    Some("zs_kapacity_duben_7"),
    Some("zs_kapacity_duben_8"),
    Some("zs_kapacity_duben_9"),
    Some("zs_kapacity_duben_sp1"),
    Some("zs_kapacity_duben_sp2"),
    Some("zs_kapacity_zari"),
    Some("zs_uprchliku"),
    // per-year refugee breakdown
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("zs_previs_1_stupen"),
    Some("zs_previs_2_stupen"),
    None,
    Some("zs_zapsani_z_nahlasenych"),
    Some("zs_previs"),
];

/// How a raw cell turns into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericPolicy {
    /// `"1 234"` → 1234
    Integer,
    /// `"30%"` → 30
    Percentage,
    /// Parsed like [`NumericPolicy::Integer`], then added to the target field.
    Summed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub policy: NumericPolicy,
    pub target: &'static str,
}

const fn integer(name: &'static str) -> (&'static str, FieldRule) {
    (
        name,
        FieldRule {
            policy: NumericPolicy::Integer,
            target: name,
        },
    )
}

const fn percentage(name: &'static str) -> (&'static str, FieldRule) {
    (
        name,
        FieldRule {
            policy: NumericPolicy::Percentage,
            target: name,
        },
    )
}

const fn summed(name: &'static str, into: &'static str) -> (&'static str, FieldRule) {
    (
        name,
        FieldRule {
            policy: NumericPolicy::Summed,
            target: into,
        },
    )
}

pub const FIELD_RULES: &[(&str, FieldRule)] = &[
    integer("ms_zapsani"),
    integer("ms_kapacity_duben"),
    integer("ms_kapacity_zari"),
    integer("ms_uprchliku"),
    integer("ms_previs"),
    percentage("ms_zapsani_z_nahlasenych"),
    integer("zs_zapsani"),
    summed("zs_kapacity_duben_malotridky", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_1", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_2", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_3", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_4", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_5", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_6", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_7", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_8", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_9", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_sp1", ZS_APRIL_CAPACITY),
    summed("zs_kapacity_duben_sp2", ZS_APRIL_CAPACITY),
    integer("zs_kapacity_zari"),
    integer("zs_uprchliku"),
    integer("zs_previs"),
    integer("zs_previs_1_stupen"),
    integer("zs_previs_2_stupen"),
    percentage("zs_zapsani_z_nahlasenych"),
];

/// A layout column bound to its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    pub column: usize,
    pub name: &'static str,
    pub policy: NumericPolicy,
}

/// Sub-fields that are added together into one output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumGroup {
    pub target: &'static str,
    pub parts: Vec<BoundField>,
}

/// Layout and rules resolved into column indices.
#[derive(Debug, Clone)]
pub struct Schema {
    pub code_column: usize,
    /// Sum targets in rule order; emitted right after `id`.
    pub sums: Vec<SumGroup>,
    /// Directly mapped fields, sorted by name.
    pub fields: Vec<BoundField>,
}

impl Schema {
    /// The canonical (full) capacity export schema.
    pub fn capacities() -> Result<Self> {
        Self::bind(CAPACITY_LAYOUT, FIELD_RULES)
    }

    pub fn bind(
        layout: &[Option<&'static str>],
        rules: &[(&'static str, FieldRule)],
    ) -> Result<Self> {
        let code_column = layout
            .iter()
            .position(|name| *name == Some(REGION_CODE_COLUMN))
            .ok_or_else(|| {
                CapacityError::Config(format!(
                    "column layout has no '{}' column",
                    REGION_CODE_COLUMN
                ))
            })?;

        let mut sums: Vec<SumGroup> = Vec::new();
        for (_, rule) in rules {
            if rule.policy == NumericPolicy::Summed && !sums.iter().any(|g| g.target == rule.target) {
                sums.push(SumGroup {
                    target: rule.target,
                    parts: Vec::new(),
                });
            }
        }

        let mut fields = Vec::new();
        for (column, name) in layout.iter().enumerate() {
            let Some(name) = *name else { continue };
            let Some((_, rule)) = rules.iter().find(|(rule_name, _)| *rule_name == name) else {
                continue;
            };
            let bound = BoundField {
                column,
                name,
                policy: rule.policy,
            };
            match rule.policy {
                NumericPolicy::Summed => {
                    if let Some(group) = sums.iter_mut().find(|g| g.target == rule.target) {
                        group.parts.push(bound);
                    }
                }
                NumericPolicy::Integer | NumericPolicy::Percentage => fields.push(bound),
            }
        }
        fields.sort_by_key(|f| f.name);

        Ok(Self {
            code_column,
            sums,
            fields,
        })
    }

    /// Number of columns a row needs to carry every bound field.
    pub fn min_columns(&self) -> usize {
        self.fields
            .iter()
            .chain(self.sums.iter().flat_map(|g| g.parts.iter()))
            .map(|f| f.column + 1)
            .max()
            .unwrap_or(0)
            .max(self.code_column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_layout_has_forty_columns() {
        assert_eq!(CAPACITY_LAYOUT.len(), 40);
        assert_eq!(CAPACITY_LAYOUT[38], Some("zs_zapsani_z_nahlasenych"));
        assert_eq!(CAPACITY_LAYOUT[39], Some("zs_previs"));
    }

    #[test]
    fn test_every_rule_is_bound_to_a_column() {
        let schema = Schema::capacities().unwrap();
        let bound = schema.fields.len()
            + schema.sums.iter().map(|g| g.parts.len()).sum::<usize>();

        assert_eq!(bound, FIELD_RULES.len());
        assert_eq!(schema.min_columns(), 40);
    }

    #[test]
    fn test_april_capacity_sums_twelve_columns() {
        let schema = Schema::capacities().unwrap();

        assert_eq!(schema.sums.len(), 1);
        assert_eq!(schema.sums[0].target, ZS_APRIL_CAPACITY);
        let columns: Vec<usize> = schema.sums[0].parts.iter().map(|p| p.column).collect();
        assert_eq!(columns, (10..=21).collect::<Vec<_>>());
    }

    #[test]
    fn test_direct_fields_are_sorted_and_skip_name() {
        let schema = Schema::capacities().unwrap();
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();

        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(!names.contains(&"orp_nazev"));
        assert!(!names.contains(&REGION_CODE_COLUMN));
        assert_eq!(names.first(), Some(&"ms_kapacity_duben"));
    }

    #[test]
    fn test_percentage_fields() {
        let schema = Schema::capacities().unwrap();
        let percent: Vec<&str> = schema
            .fields
            .iter()
            .filter(|f| f.policy == NumericPolicy::Percentage)
            .map(|f| f.name)
            .collect();

        assert_eq!(percent, vec!["ms_zapsani_z_nahlasenych", "zs_zapsani_z_nahlasenych"]);
    }

    #[test]
    fn test_layout_without_code_column_is_rejected() {
        let layout = [Some("ms_zapsani"), None];
        assert!(matches!(
            Schema::bind(&layout, FIELD_RULES),
            Err(CapacityError::Config(_))
        ));
    }

    #[test]
    fn test_minimal_layout_binds_subset() {
        let layout = [Some(REGION_CODE_COLUMN), Some("orp_nazev"), Some("zs_zapsani")];
        let schema = Schema::bind(&layout, FIELD_RULES).unwrap();

        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.fields[0].column, 2);
        assert!(schema.sums[0].parts.is_empty());
    }
}
