//! Media kind classification.
//!
//! Each review record is exactly one of video, document, or unknown; the
//! kind decides which sub-workflow applies (segment validation exists only
//! for video). Unknown is a first-class outcome that forces manual
//! disambiguation in the approval gate rather than silently defaulting.

use serde::{Deserialize, Serialize};

/// File extensions recognized as video sources.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov", ".mkv", ".webm"];

/// File extensions recognized as document sources.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf"];

/// The media kind of a review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Document,
    Unknown,
}

impl MediaKind {
    /// Convert from a wire string value. Unrecognized values map to
    /// `Unknown` rather than failing: an unclassifiable record is still a
    /// reviewable record.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "document" | "pdf" => Self::Document,
            _ => Self::Unknown,
        }
    }

    /// String representation for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Document => "document",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the media kind of a record from an ordered signal set.
///
/// An explicit kind field takes precedence; otherwise the kind is inferred
/// from the first source filename with a recognized extension. Anything
/// else is `Unknown`.
pub fn detect_media_kind(explicit: Option<&str>, filenames: &[&str]) -> MediaKind {
    if let Some(value) = explicit {
        let kind = MediaKind::from_str_value(value);
        if kind.is_known() {
            return kind;
        }
    }

    for name in filenames {
        if let Some(kind) = kind_from_extension(name) {
            return kind;
        }
    }
    MediaKind::Unknown
}

fn kind_from_extension(filename: &str) -> Option<MediaKind> {
    let lowered = filename.to_ascii_lowercase();
    let ext = match lowered.rsplit_once('.') {
        Some((_, ext)) => format!(".{ext}"),
        None => return None,
    };
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        return Some(MediaKind::Video);
    }
    if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        return Some(MediaKind::Document);
    }
    None
}
