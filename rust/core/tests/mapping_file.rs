// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end checks on the generated mapping file.

use std::fs;
use towermap_core::{
    corner_radii, generate_mapping, generate_mapping_for, read_mapping_file, Envelope, Error,
    MappingSetup, Point3, TowerTemplate, DEFAULT_SETUP,
};

#[test]
fn test_default_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let summary = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();

    assert_eq!(summary.path, dir.path().join("towerMap_EHCAL_default.txt"));
    assert_eq!(summary.grid.n_towers_j, 53);
    assert_eq!(summary.grid.n_towers_k, 53);
    assert_eq!(summary.placed, 2016);

    let text = fs::read_to_string(&summary.path).unwrap();
    let tower_lines = text.lines().filter(|l| l.starts_with("Tower")).count();
    assert_eq!(tower_lines, summary.placed);

    for (key, value) in [
        ("Gtype", "1"),
        ("Gr1_inner", "15"),
        ("Gr1_outer", "260"),
        ("Gr2_inner", "15"),
        ("Gr2_outer", "260"),
        ("Gdz", "100"),
        ("Gz0", "-360"),
        ("Gtower_dx", "10"),
        ("Gtower_dy", "10"),
        ("Gtower_dz", "90"),
    ] {
        let expected = format!("{} {}", key, value);
        assert!(
            text.lines().any(|l| l == expected),
            "missing header line '{}'",
            expected
        );
    }
}

#[test]
fn test_every_written_tower_is_inside_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let summary = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();
    let map = read_mapping_file(&summary.path).unwrap();

    let env = map.header.envelope;
    let tower = map.header.tower;
    for record in &map.towers {
        let radii = corner_radii(record.position.xy(), &tower);
        assert!(
            radii.iter().all(|&r| r >= env.rmin1 && r <= env.rmax1),
            "tower ({}, {}) has a corner outside [{}, {}]",
            record.idx_j,
            record.idx_k,
            env.rmin1,
            env.rmax1
        );
        assert_eq!(record.idx_l, 0);
        assert_eq!(record.tower_type, 0);
    }

    assert!(!map
        .towers
        .iter()
        .any(|t| (t.idx_j, t.idx_k) == (26, 26)));
}

#[test]
fn test_rerun_overwrites_with_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();

    let first = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();
    let first_bytes = fs::read(&first.path).unwrap();

    let second = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();
    let second_bytes = fs::read(&second.path).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_existing_file_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("towerMap_EHCAL_default.txt");
    fs::write(&path, "stale\n".repeat(5000)).unwrap();

    let summary = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count(), 17 + summary.placed);
}

#[test]
fn test_unknown_setup_name_only_changes_file_name() {
    let dir = tempfile::tempdir().unwrap();

    let default = generate_mapping(DEFAULT_SETUP, dir.path()).unwrap();
    let other = generate_mapping("test_run", dir.path()).unwrap();

    assert_eq!(other.path, dir.path().join("towerMap_EHCAL_test_run.txt"));
    assert_eq!(
        fs::read(&default.path).unwrap(),
        fs::read(&other.path).unwrap()
    );
}

#[test]
fn test_custom_setup() {
    let dir = tempfile::tempdir().unwrap();
    let setup = MappingSetup::new(
        "small",
        Envelope::annulus(0.0, 50.0, 100.0, Point3::new(0.0, 0.0, -360.0)),
        TowerTemplate::new(10.0, 10.0, 90.0),
    );

    let summary = generate_mapping_for(&setup, dir.path()).unwrap();
    let map = read_mapping_file(&summary.path).unwrap();

    assert_eq!(summary.grid.n_towers_j, 11);
    assert_eq!(map.header.envelope, setup.envelope);
    assert_eq!(map.towers.len(), summary.placed);
    assert!(summary.placed > 0);
}

#[test]
fn test_unwritable_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");

    match generate_mapping(DEFAULT_SETUP, &missing) {
        Err(Error::Io { path, .. }) => {
            assert_eq!(path, missing.join("towerMap_EHCAL_default.txt"));
        }
        other => panic!("expected I/O error, got {:?}", other),
    }
}
