#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use smallvar::error_analysis::BasecallErrorContextInputObservation;

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("SMALLVAR_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    let (expected, actual) = (normalize(&expected), normalize(actual));
    if expected != actual {
        let line = first_difference(&expected, &actual);
        panic!(
            "{:?} differs from line {}; rerun with SMALLVAR_UPDATE_SNAPSHOTS=1 to accept.\n\
             expected: {:?}\nactual:   {:?}",
            path,
            line + 1,
            expected.lines().nth(line).unwrap_or("<end of file>"),
            actual.lines().nth(line).unwrap_or("<end of file>"),
        );
    }
}

/// Index of the first line on which the two dumps disagree.
pub fn first_difference(expected: &str, actual: &str) -> usize {
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut index = 0;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => index += 1,
            _ => return index,
        }
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

/// Site with the given `(is_fwd_strand, quality)` reference and alt reads.
pub fn site_observation(
    ref_reads: &[(bool, u16)],
    alt_reads: &[(bool, u16)],
) -> BasecallErrorContextInputObservation {
    let mut obs = BasecallErrorContextInputObservation::new();
    for &(is_fwd, quality) in ref_reads {
        obs.add_ref_count(is_fwd, quality);
    }
    for &(is_fwd, quality) in alt_reads {
        obs.add_alt_count(is_fwd, quality);
    }
    obs
}
