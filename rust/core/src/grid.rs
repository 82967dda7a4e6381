// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Regular tower grid over the envelope and the corner inclusion test

use crate::setup::{Envelope, MappingSetup, TowerTemplate};
use nalgebra::{Point2, Point3, Vector2};

/// Tower type code; only one tower type exists
pub const TOWER_TYPE: u32 = 0;

/// Longitudinal layer index; towers are a single depth layer
pub const DEPTH_LAYER: u32 = 0;

/// Outcome of the corner inclusion test for one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVerdict {
    /// All four corners lie within [rmin1, rmax1]
    Accepted,
    /// At least one corner lies beyond rmax1
    OutsideOuterRadius,
    /// At least one corner lies inside the central hole
    InsideInnerRadius,
}

impl CellVerdict {
    pub fn is_accepted(self) -> bool {
        self == CellVerdict::Accepted
    }
}

impl Envelope {
    /// Apply the inclusion test to a tower's four corner radii.
    ///
    /// Both bounds are inclusive. The outer bound is checked first, so a
    /// tower violating both is reported as outside.
    pub fn classify(&self, corner_radii: &[f64; 4]) -> CellVerdict {
        if corner_radii.iter().any(|&r| r > self.rmax1) {
            CellVerdict::OutsideOuterRadius
        } else if corner_radii.iter().any(|&r| r < self.rmin1) {
            CellVerdict::InsideInnerRadius
        } else {
            CellVerdict::Accepted
        }
    }
}

/// Distance from the beam axis of each footprint corner.
///
/// Order: (+x,+y), (-x,+y), (+x,-y), (-x,-y).
pub fn corner_radii(center: Point2<f64>, tower: &TowerTemplate) -> [f64; 4] {
    let half = Vector2::new(tower.dx / 2.0, tower.dy / 2.0);
    [
        (center + half).coords.norm(),
        (center + Vector2::new(-half.x, half.y)).coords.norm(),
        (center + Vector2::new(half.x, -half.y)).coords.norm(),
        (center - half).coords.norm(),
    ]
}

/// A tower that passed the inclusion test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerInstance {
    pub tower_type: u32,
    pub idx_j: u32,
    pub idx_k: u32,
    pub idx_l: u32,
    /// Tower center; z is always 0
    pub center: Point3<f64>,
}

/// Grid dimensions and the center of cell (0, 0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerGrid {
    pub n_towers_j: u32,
    pub n_towers_k: u32,
    /// Center of cell (0, 0), i.e. (xpos_j0_k0, ypos_j0_k0)
    pub origin: Point2<f64>,
    pitch: Vector2<f64>,
}

impl TowerGrid {
    /// Size the grid to cover the outer radius plus half a tower.
    ///
    /// Assumes a square footprint: the k axis reuses the j count and the
    /// y origin reuses the x origin.
    pub fn new(envelope: &Envelope, tower: &TowerTemplate) -> Self {
        if !tower.is_square() {
            tracing::warn!(
                dx = tower.dx,
                dy = tower.dy,
                "Tower footprint is not square, grid layout assumes dx == dy"
            );
        }

        let half_span = ((envelope.rmax1 + 0.5 * tower.dx) / tower.dx).floor() as u32;
        let n_towers_j = 2 * half_span + 1;
        let n_towers_k = n_towers_j;

        // One full tower width further out than a centered grid would start.
        let xpos_j0_k0 = -(f64::from(n_towers_j - 1) / 2.0) * tower.dx - tower.dx;
        let ypos_j0_k0 = xpos_j0_k0;

        Self {
            n_towers_j,
            n_towers_k,
            origin: Point2::new(xpos_j0_k0, ypos_j0_k0),
            pitch: Vector2::new(tower.dx, tower.dy),
        }
    }

    /// Build the grid for a setup and log its dimensions
    pub fn for_setup(setup: &MappingSetup) -> Self {
        let grid = Self::new(&setup.envelope, &setup.tower);
        tracing::info!(
            n_towers_j = grid.n_towers_j,
            n_towers_k = grid.n_towers_k,
            xpos_j0_k0 = grid.origin.x,
            ypos_j0_k0 = grid.origin.y,
            "Tower grid computed"
        );
        grid
    }

    /// Total number of candidate cells
    pub fn cell_count(&self) -> usize {
        self.n_towers_j as usize * self.n_towers_k as usize
    }

    pub fn cell_center(&self, idx_j: u32, idx_k: u32) -> Point3<f64> {
        Point3::new(
            self.origin.x + f64::from(idx_j) * self.pitch.x,
            self.origin.y + f64::from(idx_k) * self.pitch.y,
            0.0,
        )
    }

    /// All (j, k) index pairs, j outer and k inner
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let n_towers_k = self.n_towers_k;
        (0..self.n_towers_j).flat_map(move |j| (0..n_towers_k).map(move |k| (j, k)))
    }

    pub fn classify_cell(
        &self,
        idx_j: u32,
        idx_k: u32,
        envelope: &Envelope,
        tower: &TowerTemplate,
    ) -> CellVerdict {
        let center = self.cell_center(idx_j, idx_k).xy();
        envelope.classify(&corner_radii(center, tower))
    }

    /// Accepted towers in row-major order
    pub fn towers<'a>(
        &'a self,
        setup: &'a MappingSetup,
    ) -> impl Iterator<Item = TowerInstance> + 'a {
        self.cells().filter_map(move |(idx_j, idx_k)| {
            self.classify_cell(idx_j, idx_k, &setup.envelope, &setup.tower)
                .is_accepted()
                .then(|| TowerInstance {
                    tower_type: TOWER_TYPE,
                    idx_j,
                    idx_k,
                    idx_l: DEPTH_LAYER,
                    center: self.cell_center(idx_j, idx_k),
                })
        })
    }
}
