// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn tiny_render() -> Command {
    let mut cmd = Command::cargo_bin("mandelzoom").unwrap();
    cmd.args(&[
        "--height",
        "18",
        "--iterations",
        "30",
        "--frames",
        "3",
        "--band-rows",
        "4",
        "--frame-workers",
        "2",
        "--compute-workers",
        "2",
    ]);
    cmd
}

#[test]
fn writes_numbered_frames() {
    let dir = tempdir().unwrap();
    tiny_render().arg("-o").arg(dir.path()).assert().success();
    for index in 0..3 {
        let path = dir.path().join(format!("{:04}.png", index));
        assert!(path.is_file(), "{} is missing", path.display());
        let image = image::open(&path).unwrap().to_rgba();
        assert_eq!(image.dimensions(), (32, 18));
    }
    assert!(!dir.path().join("0003.png").exists());
}

#[test]
fn start_frame_skips_earlier_frames() {
    let dir = tempdir().unwrap();
    tiny_render()
        .args(&["--start-frame", "2", "-o"])
        .arg(dir.path())
        .assert()
        .success();
    assert!(!dir.path().join("0000.png").exists());
    assert!(!dir.path().join("0001.png").exists());
    assert!(dir.path().join("0002.png").is_file());
}

#[test]
fn missing_output_directory_fails() {
    let dir = tempdir().unwrap();
    tiny_render()
        .arg("-o")
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn bad_zoom_speed_is_rejected() {
    Command::cargo_bin("mandelzoom")
        .unwrap()
        .args(&["--zoom-speed", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Zoom speed"));
}
