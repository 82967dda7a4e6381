// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EHCAL tower mapping generator
//!
//! Tiles the front face of the backward hadronic calorimeter with identical
//! rectangular towers and writes the towers that fit entirely inside the
//! annular envelope to a text mapping file:
//! 1. Resolve the setup name to a parameter set ([`MappingSetup`])
//! 2. Size a regular grid that covers the outer radius ([`TowerGrid`])
//! 3. Keep cells whose four corners all lie within [rmin, rmax]
//! 4. Write the global header and one record per kept tower
//!
//! # Usage
//!
//! ```rust,ignore
//! use towermap_core::generate_mapping;
//!
//! let summary = generate_mapping("default", std::path::Path::new("."))?;
//! println!("{} towers in {}", summary.placed, summary.path.display());
//! ```

pub mod error;
pub mod grid;
pub mod mapping;
pub mod setup;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use grid::{corner_radii, CellVerdict, TowerGrid, TowerInstance, DEPTH_LAYER, TOWER_TYPE};
pub use mapping::{
    mapping_file_name, parse_mapping, read_mapping_file, write_mapping, write_mapping_file,
    MappingHeader, MappingSummary, TowerMap, TowerRecord,
};
pub use setup::{Envelope, MappingSetup, TowerTemplate, DEFAULT_SETUP};

use std::path::Path;

/// Generate the mapping file for a named setup inside `dir`.
///
/// The file is `towerMap_EHCAL_<setup>.txt` and is overwritten if present.
pub fn generate_mapping(setup_name: &str, dir: &Path) -> Result<MappingSummary> {
    let setup = MappingSetup::for_name(setup_name);
    generate_mapping_for(&setup, dir)
}

/// Same as [`generate_mapping`] for an explicit parameter set
pub fn generate_mapping_for(setup: &MappingSetup, dir: &Path) -> Result<MappingSummary> {
    let grid = TowerGrid::for_setup(setup);
    let summary = write_mapping_file(dir, setup, &grid)?;

    tracing::info!(
        placed = summary.placed,
        path = %summary.path.display(),
        "Placed {} towers in mapping file.",
        summary.placed
    );

    Ok(summary)
}
