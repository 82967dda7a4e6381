// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detector parameter sets, selected by setup name
//!
//! All lengths are in cm. Parameters are compiled in; the setup name only
//! picks which set is used and ends up in the output file name.

use nalgebra::{Point3, Vector3};

/// Name of the only parameter set currently defined
pub const DEFAULT_SETUP: &str = "default";

/// Detector envelope: a cone-shaped annulus plus its global placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Inner radius at the first z-plane
    pub rmin1: f64,
    /// Outer radius at the first z-plane
    pub rmax1: f64,
    /// Inner radius at the second z-plane
    pub rmin2: f64,
    /// Outer radius at the second z-plane
    pub rmax2: f64,
    /// Half-length in z
    pub dz: f64,
    /// Translation of the detector center
    pub origin: Point3<f64>,
    /// Rotation angles about x, y, z (carried through to the header only)
    pub rotation: Vector3<f64>,
}

impl Envelope {
    /// Geometry type code written as `Gtype` (cone)
    pub const GEOMETRY_TYPE: u32 = 1;

    /// Flat annulus (no taper) with unrotated placement
    pub fn annulus(rmin: f64, rmax: f64, dz: f64, origin: Point3<f64>) -> Self {
        Self {
            rmin1: rmin,
            rmax1: rmax,
            rmin2: rmin,
            rmax2: rmax,
            dz,
            origin,
            rotation: Vector3::zeros(),
        }
    }
}

/// Rectangular tower footprint and depth shared by every tower
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerTemplate {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl TowerTemplate {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(self.dx, self.dy, self.dz)
    }

    /// Grid layout only supports square footprints
    pub fn is_square(&self) -> bool {
        self.dx == self.dy
    }
}

/// Named parameter set for one mapping run
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSetup {
    pub name: String,
    pub envelope: Envelope,
    pub tower: TowerTemplate,
}

impl MappingSetup {
    pub fn new(name: impl Into<String>, envelope: Envelope, tower: TowerTemplate) -> Self {
        Self {
            name: name.into(),
            envelope,
            tower,
        }
    }

    /// Resolve a setup name to its parameters.
    ///
    /// Unknown names are not an error: they get the default parameters and
    /// only differ in the name carried into logs and the output file name.
    pub fn for_name(name: &str) -> Self {
        tracing::info!(setup = name, "Setup selected: {}", name);

        match name {
            DEFAULT_SETUP => {
                tracing::info!("loading default settings");
                Self::new(name, default_envelope(), default_tower())
            }
            _ => {
                tracing::debug!(setup = name, "unrecognized setup, using default parameters");
                Self::new(name, default_envelope(), default_tower())
            }
        }
    }
}

fn default_envelope() -> Envelope {
    Envelope::annulus(15.0, 260.0, 100.0, Point3::new(0.0, 0.0, -360.0))
}

fn default_tower() -> TowerTemplate {
    TowerTemplate::new(10.0, 10.0, 90.0)
}
