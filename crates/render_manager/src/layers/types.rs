//! Core types for render layer tracking

use crate::layers::classifier::LayerTokens;
use crate::layers::tokens::DELIMITER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a render layer was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSource {
    Disk,
    Farm,
}

/// Inclusive frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub first: i64,
    pub last: i64,
}

impl FrameRange {
    pub fn new(first: i64, last: i64) -> Self {
        Self { first, last }
    }

    /// Parse farm frame lists: `1001-1020`, `1001,1020`, `1001-1100x2` or a
    /// single frame `1001`. Anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace(',', "-");
        let mut parts = normalized
            .split('-')
            .map(str::trim)
            .filter(|part| !part.is_empty());

        let first = parse_frame(parts.next()?)?;
        let last = match parts.next() {
            Some(part) => parse_frame(part)?,
            None => first,
        };
        Some(Self { first, last })
    }

    /// Number of frames, `0` for inverted ranges.
    pub fn count(&self) -> u64 {
        if self.last < self.first {
            0
        } else {
            (self.last - self.first) as u64 + 1
        }
    }
}

fn parse_frame(part: &str) -> Option<i64> {
    // drop a step suffix such as `x2`
    let number = part.split('x').next().unwrap_or(part);
    number.trim().parse().ok()
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// A version token such as `LGT_KAF_010_v0026` and its integer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionToken {
    pub token: String,
    pub number: u32,
}

impl VersionToken {
    /// Derive the integer from the digits of the last segment
    /// (`LGT_KAF_010_v0026` -> 26). `None` when that segment has no digits.
    pub fn parse(token: &str) -> Option<Self> {
        let last = token.rsplit(DELIMITER).next().unwrap_or(token);
        let number = parse_digits(last)?;
        Some(Self {
            token: token.to_string(),
            number,
        })
    }

    /// A token whose integer version comes from elsewhere (farm job records).
    pub fn with_number(token: impl Into<String>, number: u32) -> Self {
        Self {
            token: token.into(),
            number,
        }
    }
}

/// Integer made of the ASCII digits in `value`, ignoring everything else.
pub fn parse_digits(value: &str) -> Option<u32> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Replace backslashes so paths compare and display the same on every OS.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// A render layer at one specific version.
///
/// Values are never modified once built: picking another version of a layer
/// means holding another `RenderLayer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLayer {
    name: String,
    full_name: String,
    prefix: String,
    role: String,
    pass: String,
    version: String,
    int_version: u32,
    path: String,
    aovs: Vec<String>,
    frames: Option<FrameRange>,
    user: Option<String>,
    progress: Option<String>,
    source: LayerSource,
}

impl RenderLayer {
    /// Build a layer from a classified name. `name` must be the name that
    /// produced `tokens`.
    pub fn new(
        name: impl Into<String>,
        tokens: LayerTokens,
        version: VersionToken,
        path: &str,
        source: LayerSource,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            prefix: tokens.prefix,
            role: tokens.role,
            pass: tokens.pass,
            version: version.token,
            int_version: version.number,
            path: normalize_path(path),
            aovs: Vec::new(),
            frames: None,
            user: None,
            progress: None,
            source,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_aovs(mut self, aovs: Vec<String>) -> Self {
        self.aovs = aovs;
        self
    }

    pub fn with_frames(mut self, frames: Option<FrameRange>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn with_progress(mut self, progress: Option<String>) -> Self {
        self.progress = progress;
        self
    }

    /// Layer name, e.g. `RND_BG_TECH`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Job name for farm layers, the layer name otherwise.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Pass token, e.g. `TECH`.
    pub fn suffix(&self) -> &str {
        &self.pass
    }

    /// Role token, e.g. `BG`.
    pub fn rol_main(&self) -> &str {
        &self.role
    }

    /// Segments between prefix and pass, e.g. `BG_MAIN` for `RND_BG_MAIN_BTY`.
    pub fn rol_layer(&self) -> String {
        let segments: Vec<&str> = self.name.split(DELIMITER).collect();
        if segments.len() < 3 {
            return self.role.clone();
        }
        segments[1..segments.len() - 1].join("_")
    }

    /// Name without the pass, e.g. `RND_BG`.
    pub fn prefix_rol_layer(&self) -> &str {
        self.name
            .rsplit_once(DELIMITER)
            .map(|(head, _)| head)
            .unwrap_or(&self.name)
    }

    /// Version token, e.g. `LGT_KAF_010_v0026`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn int_version(&self) -> u32 {
        self.int_version
    }

    /// Version token without its last segment, e.g. `LGT_KAF_010`.
    pub fn name_version(&self) -> &str {
        self.version
            .rsplit_once(DELIMITER)
            .map(|(head, _)| head)
            .unwrap_or(&self.version)
    }

    /// Forward-slash path of this version.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn aovs(&self) -> &[String] {
        &self.aovs
    }

    pub fn frames(&self) -> Option<FrameRange> {
        self.frames
    }

    /// `first-last`, or `0-0` when unknown.
    pub fn frame_range(&self) -> String {
        self.frames
            .map(|range| range.to_string())
            .unwrap_or_else(|| "0-0".to_string())
    }

    pub fn frame_count(&self) -> u64 {
        self.frames.map(|range| range.count()).unwrap_or(0)
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn source(&self) -> LayerSource {
        self.source
    }
}

impl fmt::Display for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} ({}) aovs: {}",
            self.name,
            self.int_version,
            self.path,
            self.aovs.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::classifier::classify;
    use crate::layers::tokens::TokenConfig;

    fn layer(name: &str, version: &str) -> RenderLayer {
        let tokens = classify(name, &TokenConfig::default()).unwrap();
        RenderLayer::new(
            name,
            tokens,
            VersionToken::parse(version).unwrap(),
            &format!("I:\\FRAMES\\030\\CG\\{}\\{}", name, version),
            LayerSource::Disk,
        )
    }

    #[test]
    fn test_version_token_parse() {
        let version = VersionToken::parse("LGT_KAF_010_v0026").unwrap();
        assert_eq!(version.number, 26);
        assert_eq!(VersionToken::parse("v0025").unwrap().number, 25);
        assert!(VersionToken::parse("LGT_KAF_010_latest").is_none());
    }

    #[test]
    fn test_layer_accessors() {
        let layer = layer("RND_BG_MAIN_BTY", "LGT_KAF_010_v0026");
        assert_eq!(layer.name(), "RND_BG_MAIN_BTY");
        assert_eq!(layer.full_name(), "RND_BG_MAIN_BTY");
        assert_eq!(layer.suffix(), "BTY");
        assert_eq!(layer.rol_main(), "BG");
        assert_eq!(layer.rol_layer(), "BG_MAIN");
        assert_eq!(layer.prefix_rol_layer(), "RND_BG_MAIN");
        assert_eq!(layer.version(), "LGT_KAF_010_v0026");
        assert_eq!(layer.name_version(), "LGT_KAF_010");
        assert_eq!(layer.int_version(), 26);
        assert_eq!(
            layer.path(),
            "I:/FRAMES/030/CG/RND_BG_MAIN_BTY/LGT_KAF_010_v0026"
        );
    }

    #[test]
    fn test_frame_defaults() {
        let layer = layer("RND_FG_TECH", "LGT_KAF_010_v0003");
        assert_eq!(layer.frame_range(), "0-0");
        assert_eq!(layer.frame_count(), 0);

        let layer = layer.with_frames(Some(FrameRange::new(1001, 1020)));
        assert_eq!(layer.frame_range(), "1001-1020");
        assert_eq!(layer.frame_count(), 20);
    }

    #[test]
    fn test_frame_range_parse() {
        assert_eq!(FrameRange::parse("1001-1020"), Some(FrameRange::new(1001, 1020)));
        assert_eq!(FrameRange::parse("1001,1020"), Some(FrameRange::new(1001, 1020)));
        assert_eq!(FrameRange::parse("1001-1100x2"), Some(FrameRange::new(1001, 1100)));
        assert_eq!(FrameRange::parse("1001"), Some(FrameRange::new(1001, 1001)));
        assert_eq!(FrameRange::parse(""), None);
        assert_eq!(FrameRange::parse("abc"), None);
        assert_eq!(FrameRange::new(10, 5).count(), 0);
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("v0026"), Some(26));
        assert_eq!(parse_digits("0019"), Some(19));
        assert_eq!(parse_digits("v"), None);
    }
}
