pub mod assemble;
pub mod book;
pub mod date;
pub mod error;
pub mod extract;

pub use assemble::{read_book, read_book_from_bytes};
pub use book::{Book, Chapter, ChapterContent, CoverImage, Metadata, UNKNOWN_TITLE};
pub use date::parse_publication_date;
pub use error::{FoliaError, Result};
pub use extract::{TextConfig, extract_chapter_text, extract_chapter_text_with_config, html_to_text};
