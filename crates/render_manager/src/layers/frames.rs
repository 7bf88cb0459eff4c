//! Frame sequence detection inside AOV folders

use crate::layers::emptiness::has_extension;
use crate::layers::types::FrameRange;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// What the payload files of one AOV folder reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    /// Sequence name without the frame number, e.g. `RND_BG_TECH_N`.
    pub base_name: String,
    /// Number of payload files.
    pub frames: usize,
    pub first: i64,
    pub last: i64,
    pub extension: String,
}

impl FrameInfo {
    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.first, self.last)
    }
}

/// Split a payload file stem into its base name and frame number.
///
/// The frame is the trailing digit run, separated by `_` or `.`:
/// `N_1001` and `N.1001` both give `("N", 1001)`.
pub fn split_frame_number(stem: &str) -> Option<(&str, i64)> {
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (head, digits) = stem.split_at(digits_start);
    let base = head.strip_suffix('_').or_else(|| head.strip_suffix('.'))?;
    let frame = digits.parse().ok()?;
    Some((base, frame))
}

/// Scan the payload files directly inside `aov_dir`.
///
/// The range spans the lowest and highest parsed frame numbers, so unpadded
/// sequences crossing a digit boundary (`998` to `1001`) come out right.
/// Base name and extension are those of the first file by name. `None` when
/// the folder cannot be read or holds no numbered payload file.
pub fn scan_frames(aov_dir: &Path, extension: &str) -> Option<FrameInfo> {
    let mut files: Vec<String> = fs::read_dir(aov_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| has_extension(&e.path(), extension))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    files.sort();

    let mut info: Option<FrameInfo> = None;
    for name in &files {
        let (stem, ext) = name.rsplit_once('.').unwrap_or((name.as_str(), ""));
        let Some((base, frame)) = split_frame_number(stem) else {
            continue;
        };
        match info.as_mut() {
            Some(info) => {
                info.first = info.first.min(frame);
                info.last = info.last.max(frame);
            }
            None => {
                info = Some(FrameInfo {
                    base_name: base.to_string(),
                    frames: files.len(),
                    first: frame,
                    last: frame,
                    extension: ext.to_string(),
                })
            }
        }
    }
    info
}
