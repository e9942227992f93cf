use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ValidationError;

/// The resolution tiers a download can be requested at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    P144,
    P360,
    P720
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::P144, Quality::P360, Quality::P720];

    pub fn label(self) -> &'static str {
        match self {
            Self::P144 => "144p",
            Self::P360 => "360p",
            Self::P720 => "720p"
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|q| q.label().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::NoQuality)
    }
}

/// A playlist entry waiting in the download queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedItem {
    pub title: String,
    pub url: String
}

/// One encoded rendition of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub quality_label: String,
    pub total_bytes: u64,
    /// Backend identifier used to request exactly this rendition.
    pub format_id: String,
    /// Page the variant was resolved from.
    pub url: String
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: String,
    pub variants: Vec<Variant>
}

impl MediaInfo {
    /// First variant whose label is exactly the requested tier.
    pub fn find_variant(&self, quality: Quality) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.quality_label == quality.label())
    }
}

/// An existing directory downloads are written into. Stored absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget(PathBuf);

impl DownloadTarget {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        match path.canonicalize() {
            Ok(abs) if abs.is_dir() => Ok(Self(abs)),
            _ => Err(ValidationError::NotADirectory(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(label: &str, size: u64) -> Variant {
        Variant {
            quality_label: label.to_string(),
            total_bytes: size,
            format_id: format!("{label}-{size}"),
            url: "https://example.com/v".to_string()
        }
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("720p".parse::<Quality>(), Ok(Quality::P720));
        assert_eq!(" 144P ".parse::<Quality>(), Ok(Quality::P144));
        assert_eq!("1080p".parse::<Quality>(), Err(ValidationError::NoQuality));
        assert_eq!("".parse::<Quality>(), Err(ValidationError::NoQuality));
    }

    #[test]
    fn test_find_variant_is_exact_and_first() {
        let info = MediaInfo {
            title: "clip".to_string(),
            variants: vec![variant("144p", 10), variant("360p", 30), variant("360p", 40)]
        };
        assert_eq!(info.find_variant(Quality::P360).map(|v| v.total_bytes), Some(30));
        assert!(info.find_variant(Quality::P720).is_none());
    }

    #[test]
    fn test_download_target_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = DownloadTarget::new(dir.path()).unwrap();
        assert!(target.path().is_absolute());

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(
            DownloadTarget::new(&file),
            Err(ValidationError::NotADirectory(file.clone()))
        );
        assert!(DownloadTarget::new(dir.path().join("missing")).is_err());
    }
}
