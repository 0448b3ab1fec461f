//! File classification by extension.
//!
//! Maps a file's extension to one of a fixed set of category labels.
//! The extension table here is the single source of truth: the scanner,
//! the planner, and any preview output all classify through it, so a
//! file can never be shown in one category and moved into another.
//!
//! # Examples
//!
//! ```
//! use tidydesk::category::Category;
//!
//! assert_eq!(Category::from_extension("pdf"), Category::Documents);
//! assert_eq!(Category::from_extension("JPG"), Category::Images);
//! assert_eq!(Category::from_extension(""), Category::Other);
//! ```

use serde::{Deserialize, Serialize};

/// A classification bucket for a file, assigned from its extension.
///
/// Every file gets exactly one category; [`Category::Other`] is the
/// catch-all for unrecognized or missing extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Text and office documents (PDF, DOCX, TXT, etc.)
    Documents,
    /// Image files (PNG, JPG, SVG, etc.)
    Images,
    /// Video files (MP4, MKV, WEBM, etc.)
    Videos,
    /// Audio files (MP3, FLAC, OGG, etc.)
    Audio,
    /// Compressed archives (ZIP, 7Z, TAR, etc.)
    Archives,
    /// Source code files (Rust, Python, JavaScript, etc.)
    Code,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories, in the order they are planned and displayed.
    pub const ALL: [Category; 7] = [
        Category::Documents,
        Category::Images,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Code,
        Category::Other,
    ];

    /// Returns the subdirectory name used for this category.
    ///
    /// The label is used verbatim as the folder name under the target
    /// root.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydesk::category::Category;
    ///
    /// assert_eq!(Category::Documents.dir_name(), "Documents");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Documents => "Documents",
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::Other => "Other",
        }
    }

    /// Classifies a file extension into a category.
    ///
    /// Total and deterministic: matching is case-insensitive, never
    /// fails, and an unknown or empty extension yields
    /// [`Category::Other`]. The extension is expected without a leading
    /// dot.
    pub fn from_extension(extension: &str) -> Category {
        match extension.to_lowercase().as_str() {
            "pdf" | "doc" | "docx" | "txt" | "rtf" | "odt" => Category::Documents,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" => Category::Images,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => Category::Videos,
            "mp3" | "wav" | "flac" | "aac" | "ogg" => Category::Audio,
            "zip" | "rar" | "7z" | "tar" | "gz" => Category::Archives,
            "js" | "ts" | "py" | "rs" | "go" | "c" | "cpp" | "java" | "html" | "css" => {
                Category::Code
            }
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
