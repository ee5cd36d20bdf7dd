//! Book object graph: the value types produced by assembly.
//!
//! A [`Book`] owns its [`Metadata`], spine-ordered [`Chapter`]s, and
//! optional [`CoverImage`] by value. Everything here is immutable after
//! construction, so a host application may freely share a `Book` across
//! threads for reading.

use chrono::NaiveDate;
use serde::Serialize;

/// Display title used when a book declares no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Raw content slot of a chapter.
///
/// Content is loaded eagerly during assembly, but a chapter whose resource
/// could not be read stays `NotLoaded` rather than aborting the book.
/// Extraction on such a chapter fails with
/// [`FoliaError::ContentNotLoaded`](crate::FoliaError::ContentNotLoaded).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChapterContent {
    /// The resource bytes, exactly as stored in the container.
    Loaded(Vec<u8>),
    /// The resource was unreadable or has not been fetched yet.
    #[default]
    NotLoaded,
}

impl ChapterContent {
    /// Whether content bytes are present.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The content bytes, if present.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Loaded(bytes) => Some(bytes),
            Self::NotLoaded => None,
        }
    }
}

/// A single spine entry of the book.
///
/// `sequence` is the zero-based spine position; assembly guarantees that
/// `book.chapters[k].sequence == k` for every k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    /// Resource identifier from the container manifest.
    pub id: String,

    /// Resolved chapter title, if any could be determined.
    pub title: Option<String>,

    /// Spine-relative resource path inside the container.
    pub href: String,

    /// Zero-based spine position.
    pub sequence: usize,

    /// Raw markup bytes of the chapter resource.
    #[serde(skip)]
    pub content: ChapterContent,
}

impl Chapter {
    /// Display title: the resolved title or a positional fallback.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Chapter {}", self.sequence + 1),
        }
    }
}

/// Declared metadata of a book.
///
/// All fields are optional or may be empty; assembly never fails because a
/// field is missing or malformed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub subjects: Vec<String>,
}

/// Cover image bytes plus media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    /// MIME type of the image; `image/jpeg` when the container did not say.
    pub media_type: String,
}

/// The complete result of decoding an EPUB archive.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub metadata: Metadata,
    /// Chapters in spine order.
    pub chapters: Vec<Chapter>,
    pub cover: Option<CoverImage>,
}

impl Book {
    /// Resolved display title.
    ///
    /// Returns the first declared non-blank title, or the fixed
    /// [`UNKNOWN_TITLE`] placeholder.
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    /// Chapter lookup by spine position.
    pub fn chapter(&self, sequence: usize) -> Option<&Chapter> {
        self.chapters.get(sequence)
    }
}
