/// File names of the inputs and output, relative to the data directory / crate root.
pub const ORP_CODEBOOK_FILE: &str = "CIS0065_CS.csv";
pub const DISTRICT_CODEBOOK_FILE: &str = "obvody_praha.csv";
pub const CAPACITIES_FILE: &str = "Kapacity_s_tridami.csv";

pub const DATA_DIR: &str = "data";
pub const OUTPUT_FILE: &str = "public/capacities.json";

// Codebook header columns (CZSO export format)
pub const CODEBOOK_KEY_COLUMN: &str = "CHODNOTA";
pub const CODEBOOK_VALUE_COLUMN: &str = "KOD_RUIAN";

/// Source row code of the city-wide Prague row; the aggregate is injected by hand instead.
pub const IGNORED_REGION_CODE: &str = "0";

/// Prepended to a district's RUIAN code so it cannot collide with an ORP code.
pub const DISTRICT_ID_PREFIX: &str = "99";

/// Crate directory captured at build time; default paths hang off it.
pub fn program_dir() -> &'static str {
    env!("CARGO_MANIFEST_DIR")
}
