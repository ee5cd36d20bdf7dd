//! Error types for Folia operations.
//!
//! This module defines the main error type [`FoliaError`] which represents
//! all possible errors that can occur while decoding an EPUB container,
//! assembling a book, or extracting chapter text.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for EPUB extraction operations.
///
/// Only a handful of failures are fatal: a malformed container, a missing
/// input file, and requesting text extraction on a chapter whose content
/// was never loaded. Everything else (a bad date string, an unreadable
/// spine resource, a missing cover) degrades to absence plus a logged
/// diagnostic and never surfaces here.
///
/// # Example
///
/// ```rust
/// use folia_core::{FoliaError, read_book};
///
/// match read_book("missing.epub") {
///     Ok(book) => println!("Title: {}", book.title()),
///     Err(FoliaError::FileNotFound(path)) => {
///         println!("No such file: {}", path.display());
///     }
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum FoliaError {
    /// The EPUB container itself could not be decoded.
    ///
    /// This is the only failure that aborts a whole `read_book` call. The
    /// message carries the underlying decoder cause.
    #[error("Failed to decode EPUB container: {0}")]
    Decode(String),

    /// HTML parsing errors.
    ///
    /// Internal plumbing errors from the HTML layer (e.g. an invalid CSS
    /// selector). Text extraction absorbs these behind its strip-all-tags
    /// fallback, so they do not normally cross the library boundary.
    #[error("Failed to parse HTML: {0}")]
    HtmlParse(String),

    /// Text extraction was requested before chapter content was loaded.
    ///
    /// Fatal to that call only; the book itself remains usable.
    #[error("Chapter content has not been loaded: {0}")]
    ContentNotLoaded(String),

    /// File not found.
    ///
    /// Returned when attempting to read an EPUB file that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O errors.
    ///
    /// Wraps standard I/O errors for file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FoliaError.
///
/// This is a convenience alias for `std::result::Result<T, FoliaError>`.
pub type Result<T> = std::result::Result<T, FoliaError>;
