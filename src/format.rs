//! Recording format selection
//!
//! The container/codec combinations the recorder offers form a closed set
//! with a total mapping to save-dialog filter metadata, so a selected format
//! can never reach the save flow without a filter.

use serde::{Deserialize, Serialize};

/// A container/codec combination the encoder host accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    ThreeGpp,
    ThreeGp2,
    WebmVp8,
    WebmVp9,
    Avi,
}

/// Save-dialog filter metadata for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveFilter {
    /// Display name shown in the dialog's filter list
    pub label: &'static str,

    /// File extension without the leading dot
    pub extension: &'static str,
}

impl RecordFormat {
    /// Every offered format, in picker order.
    pub const ALL: [RecordFormat; 5] = [
        RecordFormat::ThreeGpp,
        RecordFormat::ThreeGp2,
        RecordFormat::WebmVp8,
        RecordFormat::WebmVp9,
        RecordFormat::Avi,
    ];

    /// The MIME string handed to the encoder host and shown as the
    /// selection label.
    pub fn mime_type(&self) -> &'static str {
        match self {
            RecordFormat::ThreeGpp => "video/3gpp",
            RecordFormat::ThreeGp2 => "video/3gp2",
            RecordFormat::WebmVp8 => "video/webm; codecs=vp8",
            RecordFormat::WebmVp9 => "video/webm; codecs=vp9",
            RecordFormat::Avi => "video/x-msvideo",
        }
    }

    /// Parse the MIME string form. Anything outside the offered set is
    /// rejected; the format set is closed.
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.mime_type() == mime)
    }

    /// Save-dialog filter for this format. Total over the enum.
    pub fn save_filter(&self) -> SaveFilter {
        match self {
            RecordFormat::ThreeGpp => SaveFilter {
                label: "3GPP video",
                extension: "3gpp",
            },
            RecordFormat::ThreeGp2 => SaveFilter {
                label: "3GP2 video",
                extension: "3gp2",
            },
            RecordFormat::WebmVp8 => SaveFilter {
                label: "WebM VP8",
                extension: "webm",
            },
            RecordFormat::WebmVp9 => SaveFilter {
                label: "WebM VP9",
                extension: "webm",
            },
            RecordFormat::Avi => SaveFilter {
                label: "AVI",
                extension: "avi",
            },
        }
    }
}

impl Default for RecordFormat {
    fn default() -> Self {
        RecordFormat::WebmVp8
    }
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}
