// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tower mapping file format
//!
//! Text, line oriented: a block of `G*` header lines with the global
//! detector geometry, then one `Tower` line per accepted tower. Lines
//! starting with `#` are comments. The writer output is consumed by an
//! external simulation framework, so the layout (including the header
//! comment text) is kept byte for byte.

use crate::error::{Error, Result};
use crate::grid::{TowerGrid, TowerInstance};
use crate::setup::{Envelope, MappingSetup, TowerTemplate};
use nalgebra::{Point3, Vector3};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const HEADER_COMMENT: &str = "#Global detector geometry and transforamtion; lengths given in cm";
const TOWER_COMMENT: &str =
    "#Tower type,idx_j,idx_k,idx_l,x[cm],y[cm],z[cm],dx[cm],dy[cm],dz[cm],rot_x,rot_y,rot_z";

/// Output file name for a setup
pub fn mapping_file_name(setup_name: &str) -> String {
    format!("towerMap_EHCAL_{}.txt", setup_name)
}

/// Result of writing a mapping file
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSummary {
    pub path: PathBuf,
    pub grid: TowerGrid,
    /// Number of `Tower` records written
    pub placed: usize,
}

/// Write the header and tower records, returning the number of towers written
pub fn write_mapping<W, I>(
    writer: &mut W,
    setup: &MappingSetup,
    towers: I,
) -> std::io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = TowerInstance>,
{
    let env = &setup.envelope;
    let tower = &setup.tower;

    writeln!(writer, "{}", HEADER_COMMENT)?;
    writeln!(writer, "Gtype {}", Envelope::GEOMETRY_TYPE)?;
    writeln!(writer, "Gr1_inner {}", env.rmin1)?;
    writeln!(writer, "Gr1_outer {}", env.rmax1)?;
    writeln!(writer, "Gr2_inner {}", env.rmin2)?;
    writeln!(writer, "Gr2_outer {}", env.rmax2)?;
    writeln!(writer, "Gdz {}", env.dz)?;
    writeln!(writer, "Gx0 {}", env.origin.x)?;
    writeln!(writer, "Gy0 {}", env.origin.y)?;
    writeln!(writer, "Gz0 {}", env.origin.z)?;
    writeln!(writer, "Grot_x {}", env.rotation.x)?;
    writeln!(writer, "Grot_y {}", env.rotation.y)?;
    writeln!(writer, "Grot_z {}", env.rotation.z)?;
    writeln!(writer, "Gtower_dx {}", tower.dx)?;
    writeln!(writer, "Gtower_dy {}", tower.dy)?;
    writeln!(writer, "Gtower_dz {}", tower.dz)?;

    writeln!(writer, "{}", TOWER_COMMENT)?;

    let mut count = 0;
    for t in towers {
        writeln!(
            writer,
            "Tower {}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t0\t0\t0",
            t.tower_type,
            t.idx_j,
            t.idx_k,
            t.idx_l,
            t.center.x,
            t.center.y,
            t.center.z,
            tower.dx,
            tower.dy,
            tower.dz
        )?;
        count += 1;
    }

    Ok(count)
}

/// Create (or truncate) `towerMap_EHCAL_<setup>.txt` in `dir` and write the mapping
pub fn write_mapping_file(
    dir: &Path,
    setup: &MappingSetup,
    grid: &TowerGrid,
) -> Result<MappingSummary> {
    let path = dir.join(mapping_file_name(&setup.name));

    let placed = {
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        let placed = write_mapping(&mut writer, setup, grid.towers(setup))
            .map_err(|e| Error::io(&path, e))?;
        writer.flush().map_err(|e| Error::io(&path, e))?;
        placed
    };

    tracing::debug!(path = %path.display(), placed, "Mapping file written");

    Ok(MappingSummary {
        path,
        grid: *grid,
        placed,
    })
}

/// One `Tower` line read back from a mapping file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerRecord {
    pub tower_type: u32,
    pub idx_j: u32,
    pub idx_k: u32,
    pub idx_l: u32,
    pub position: Point3<f64>,
    pub size: Vector3<f64>,
    pub rotation: Vector3<f64>,
}

/// Global geometry from the `G*` header lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingHeader {
    pub geometry_type: u32,
    pub envelope: Envelope,
    pub tower: TowerTemplate,
}

/// Parsed mapping file
#[derive(Debug, Clone, PartialEq)]
pub struct TowerMap {
    pub header: MappingHeader,
    pub towers: Vec<TowerRecord>,
}

#[derive(Default)]
struct HeaderFields {
    geometry_type: Option<u32>,
    r1_inner: Option<f64>,
    r1_outer: Option<f64>,
    r2_inner: Option<f64>,
    r2_outer: Option<f64>,
    dz: Option<f64>,
    x0: Option<f64>,
    y0: Option<f64>,
    z0: Option<f64>,
    rot_x: Option<f64>,
    rot_y: Option<f64>,
    rot_z: Option<f64>,
    tower_dx: Option<f64>,
    tower_dy: Option<f64>,
    tower_dz: Option<f64>,
}

impl HeaderFields {
    fn finish(self) -> Result<MappingHeader> {
        fn req<T>(value: Option<T>, name: &'static str) -> Result<T> {
            value.ok_or(Error::MissingHeaderField(name))
        }

        Ok(MappingHeader {
            geometry_type: req(self.geometry_type, "Gtype")?,
            envelope: Envelope {
                rmin1: req(self.r1_inner, "Gr1_inner")?,
                rmax1: req(self.r1_outer, "Gr1_outer")?,
                rmin2: req(self.r2_inner, "Gr2_inner")?,
                rmax2: req(self.r2_outer, "Gr2_outer")?,
                dz: req(self.dz, "Gdz")?,
                origin: Point3::new(
                    req(self.x0, "Gx0")?,
                    req(self.y0, "Gy0")?,
                    req(self.z0, "Gz0")?,
                ),
                rotation: Vector3::new(
                    req(self.rot_x, "Grot_x")?,
                    req(self.rot_y, "Grot_y")?,
                    req(self.rot_z, "Grot_z")?,
                ),
            },
            tower: TowerTemplate::new(
                req(self.tower_dx, "Gtower_dx")?,
                req(self.tower_dy, "Gtower_dy")?,
                req(self.tower_dz, "Gtower_dz")?,
            ),
        })
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token.parse().map_err(|_| Error::MalformedRecord {
        line,
        reason: format!("invalid {} '{}'", what, token),
    })
}

fn parse_tower(fields: &[&str], line: usize) -> Result<TowerRecord> {
    if fields.len() != 13 {
        return Err(Error::MalformedRecord {
            line,
            reason: format!("expected 13 tower fields, found {}", fields.len()),
        });
    }

    let num = |i: usize, what: &str| parse_field::<f64>(fields[i], line, what);

    Ok(TowerRecord {
        tower_type: parse_field(fields[0], line, "tower type")?,
        idx_j: parse_field(fields[1], line, "idx_j")?,
        idx_k: parse_field(fields[2], line, "idx_k")?,
        idx_l: parse_field(fields[3], line, "idx_l")?,
        position: Point3::new(num(4, "x")?, num(5, "y")?, num(6, "z")?),
        size: Vector3::new(num(7, "dx")?, num(8, "dy")?, num(9, "dz")?),
        rotation: Vector3::new(num(10, "rot_x")?, num(11, "rot_y")?, num(12, "rot_z")?),
    })
}

/// Parse mapping file text.
///
/// Unknown keys are skipped so files carrying extra header lines still load.
pub fn parse_mapping(text: &str) -> Result<TowerMap> {
    let mut header = HeaderFields::default();
    let mut towers = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();

        if key == "Tower" {
            towers.push(parse_tower(&rest, line)?);
            continue;
        }

        let Some(value) = rest.first() else {
            return Err(Error::MalformedRecord {
                line,
                reason: format!("header field '{}' has no value", key),
            });
        };

        let slot = match key {
            "Gtype" => {
                header.geometry_type = Some(parse_field(value, line, key)?);
                continue;
            }
            "Gr1_inner" => &mut header.r1_inner,
            "Gr1_outer" => &mut header.r1_outer,
            "Gr2_inner" => &mut header.r2_inner,
            "Gr2_outer" => &mut header.r2_outer,
            "Gdz" => &mut header.dz,
            "Gx0" => &mut header.x0,
            "Gy0" => &mut header.y0,
            "Gz0" => &mut header.z0,
            "Grot_x" => &mut header.rot_x,
            "Grot_y" => &mut header.rot_y,
            "Grot_z" => &mut header.rot_z,
            "Gtower_dx" => &mut header.tower_dx,
            "Gtower_dy" => &mut header.tower_dy,
            "Gtower_dz" => &mut header.tower_dz,
            other => {
                tracing::debug!(line, key = other, "Skipping unknown mapping key");
                continue;
            }
        };
        *slot = Some(parse_field(value, line, key)?);
    }

    Ok(TowerMap {
        header: header.finish()?,
        towers,
    })
}

/// Read and parse a mapping file from disk
pub fn read_mapping_file(path: &Path) -> Result<TowerMap> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_mapping(&text)
}
