use serde::{Deserialize, Serialize};

/// Subset of `--dump-json` output used for format selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub formats: Vec<Format>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>
}

impl Format {
    pub fn has_video(&self) -> bool {
        self.vcodec.as_ref().is_some_and(|v| v != "none")
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_ref().is_some_and(|a| a != "none")
    }

    /// Progressive formats carry both tracks in one file.
    pub fn is_progressive(&self) -> bool {
        self.has_video() && self.has_audio()
    }

    pub fn estimated_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// One line of `--flat-playlist --dump-json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>
}

impl PlaylistEntry {
    /// URL that can be handed back to yt-dlp for this entry.
    pub fn watch_url(&self) -> String {
        self.webpage_url
            .clone()
            .or_else(|| self.url.clone().filter(|u| u.starts_with("http")))
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_json() {
        let json = r#"{
            "format_id": "18",
            "format_note": "360p",
            "ext": "mp4",
            "height": 360,
            "vcodec": "avc1.42001E",
            "acodec": "mp4a.40.2",
            "filesize_approx": 5242880
        }"#;
        let format: Format = serde_json::from_str(json).unwrap();
        assert!(format.is_progressive());
        assert_eq!(format.estimated_size(), Some(5_242_880));
    }

    #[test]
    fn test_format_video_only() {
        let format = Format {
            format_id: "136".to_string(),
            height: Some(720),
            vcodec: Some("avc1".to_string()),
            acodec: Some("none".to_string()),
            filesize: Some(10),
            filesize_approx: Some(20)
        };
        assert!(format.has_video());
        assert!(!format.has_audio());
        assert_eq!(format.estimated_size(), Some(10));
    }

    #[test]
    fn test_playlist_entry_watch_url() {
        let entry: PlaylistEntry =
            serde_json::from_str(r#"{"id": "abc", "url": "https://www.youtube.com/watch?v=abc"}"#)
                .unwrap();
        assert_eq!(entry.watch_url(), "https://www.youtube.com/watch?v=abc");

        let bare: PlaylistEntry = serde_json::from_str(r#"{"id": "xyz", "url": "xyz"}"#).unwrap();
        assert_eq!(bare.watch_url(), "https://www.youtube.com/watch?v=xyz");
    }
}
