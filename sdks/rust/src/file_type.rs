//! Name-based file classification.
//!
//! Uploads are tagged by extension only; file contents are never sniffed, so
//! a file with a wrong or missing extension is tagged accordingly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Content category of an uploaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Image,
    Audio,
    Video,
    /// Catch-all for unknown or missing extensions.
    #[default]
    Document,
}

impl FileType {
    /// All categories, in classification order.
    pub const ALL: [FileType; 6] = [
        Self::Pdf,
        Self::Docx,
        Self::Image,
        Self::Audio,
        Self::Video,
        Self::Document,
    ];

    /// Classify a filename by its extension.
    ///
    /// ```
    /// use insight_hub_sdk::FileType;
    ///
    /// assert_eq!(FileType::from_filename("Q3.Report.PDF"), FileType::Pdf);
    /// assert_eq!(FileType::from_filename("holiday.jpeg"), FileType::Image);
    /// assert_eq!(FileType::from_filename("Makefile"), FileType::Document);
    /// ```
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return Self::Document;
        };
        let ext = ext.to_ascii_lowercase();

        match ext.as_str() {
            "" => Self::Document,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            e if IMAGE_EXTENSIONS.contains(&e) => Self::Image,
            e if AUDIO_EXTENSIONS.contains(&e) => Self::Audio,
            e if VIDEO_EXTENSIONS.contains(&e) => Self::Video,
            _ => Self::Document,
        }
    }

    /// Wire name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
        }
    }

    /// Extensions that map to this category. Empty for `Document`.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Docx => &["docx"],
            Self::Image => IMAGE_EXTENSIONS,
            Self::Audio => AUDIO_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
            Self::Document => &[],
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown file type '{0}' (expected one of pdf, docx, image, audio, video, document)")]
pub struct ParseFileTypeError(pub String);

impl FromStr for FileType {
    type Err = ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ParseFileTypeError(s.to_string()))
    }
}
