// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.
//!
//! Frames can finish in any order, so a sink must place each one by its
//! index rather than by arrival.  The PNG sink does that through the
//! file name: frame 7 is always `0007.png`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use failure::{Error, ResultExt};
use image::png::PNGEncoder;
use image::ColorType;
use log::debug;

use crate::error::RenderError;
use crate::frame::RenderedFrame;

/// Accepts finished frames.  Shared by every frame worker at once.
pub trait FrameSink: Sync {
    /// Persist one frame.  Any error is fatal to the run.
    fn persist(&self, frame: &RenderedFrame) -> Result<(), Error>;
}

/// Writes each frame as `NNNN.png` into an existing directory.
#[derive(Debug)]
pub struct PngSink {
    directory: PathBuf,
}

impl PngSink {
    /// The directory has to exist already; we don't create it.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<PngSink, Error> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(RenderError::MissingOutputDirectory(directory.display().to_string()).into());
        }
        Ok(PngSink {
            directory: directory.to_path_buf(),
        })
    }

    /// The file a frame is written to.
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.directory.join(format!("{:04}.png", index))
    }
}

fn write_image(path: &Path, frame: &RenderedFrame) -> Result<(), Error> {
    let output =
        File::create(path).with_context(|_| format!("could not create {}", path.display()))?;
    let mut output = BufWriter::new(output);
    PNGEncoder::new(&mut output)
        .encode(&frame.pixels, frame.width, frame.height, ColorType::RGBA(8))
        .with_context(|_| format!("could not encode {}", path.display()))?;
    output
        .flush()
        .with_context(|_| format!("could not write {}", path.display()))?;
    Ok(())
}

impl FrameSink for PngSink {
    fn persist(&self, frame: &RenderedFrame) -> Result<(), Error> {
        let path = self.path_for(frame.index);
        write_image(&path, frame)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Keeps frames in memory, keyed by index.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Mutex<BTreeMap<u32, RenderedFrame>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    /// Everything persisted so far, in index order.
    pub fn into_frames(self) -> BTreeMap<u32, RenderedFrame> {
        self.frames
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FrameSink for MemorySink {
    fn persist(&self, frame: &RenderedFrame) -> Result<(), Error> {
        let mut frames = self
            .frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        frames.insert(frame.index, frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u32) -> RenderedFrame {
        RenderedFrame {
            index,
            width: 2,
            height: 1,
            pixels: vec![255, 0, 0, 255, 0, 0, 0, 255],
        }
    }

    #[test]
    fn png_sink_needs_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = PngSink::new(&missing).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(PngSink::new(dir.path()).is_ok());
    }

    #[test]
    fn file_names_are_zero_padded_indices() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path()).unwrap();
        assert_eq!(sink.path_for(0), dir.path().join("0000.png"));
        assert_eq!(sink.path_for(42), dir.path().join("0042.png"));
        assert_eq!(sink.path_for(12345), dir.path().join("12345.png"));
    }

    #[test]
    fn png_sink_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path()).unwrap();
        sink.persist(&frame(3)).unwrap();
        assert!(dir.path().join("0003.png").is_file());
    }

    #[test]
    fn png_sink_fails_when_the_directory_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("frames");
        std::fs::create_dir(&inner).unwrap();
        let sink = PngSink::new(&inner).unwrap();
        std::fs::remove_dir(&inner).unwrap();
        let err = sink.persist(&frame(1)).unwrap_err();
        assert!(err.to_string().starts_with("could not create"));
    }

    #[test]
    fn memory_sink_keys_by_index() {
        let sink = MemorySink::new();
        sink.persist(&frame(2)).unwrap();
        sink.persist(&frame(0)).unwrap();
        let frames = sink.into_frames();
        assert_eq!(frames.keys().cloned().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(frames[&2], frame(2));
    }
}
