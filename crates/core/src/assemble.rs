//! Book assembly: mapping a decoded EPUB container onto the [`Book`] graph.
//!
//! Container decoding is delegated entirely to the `epub` crate; this
//! module only walks the decoded metadata, spine, and cover resource and
//! applies the field defaults and fallbacks. The single fatal failure is a
//! malformed archive. Every per-field failure (bad date string, unreadable
//! spine resource, missing cover) degrades to absence plus a warning and
//! assembly carries on.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use epub::doc::{EpubDoc, NavPoint};
use tracing::{debug, warn};

use crate::book::{Book, Chapter, ChapterContent, CoverImage, Metadata};
use crate::date::parse_publication_date;
use crate::{FoliaError, Result};

/// Media type recorded for a cover whose type the container did not declare.
const DEFAULT_COVER_MEDIA_TYPE: &str = "image/jpeg";

/// Read and assemble a book from an EPUB file on disk.
///
/// # Errors
///
/// [`FoliaError::FileNotFound`] if the path does not exist, or
/// [`FoliaError::Decode`] if the container is malformed.
pub fn read_book<P: AsRef<Path>>(path: P) -> Result<Book> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FoliaError::FileNotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "Decoding EPUB container");
    let mut doc = EpubDoc::new(path).map_err(|e| FoliaError::Decode(e.to_string()))?;
    Ok(assemble(&mut doc))
}

/// Read and assemble a book from in-memory EPUB bytes.
pub fn read_book_from_bytes(bytes: Vec<u8>) -> Result<Book> {
    let mut doc =
        EpubDoc::from_reader(Cursor::new(bytes)).map_err(|e| FoliaError::Decode(e.to_string()))?;
    Ok(assemble(&mut doc))
}

fn assemble<R: Read + Seek>(doc: &mut EpubDoc<R>) -> Book {
    let metadata = assemble_metadata(doc);
    let chapters = assemble_chapters(doc);
    let cover = assemble_cover(doc);

    debug!(
        chapters = chapters.len(),
        has_cover = cover.is_some(),
        "Assembled book"
    );
    Book { metadata, chapters, cover }
}

fn assemble_metadata<R: Read + Seek>(doc: &EpubDoc<R>) -> Metadata {
    Metadata {
        title: first_non_blank(&meta_values(doc, "title")),
        authors: meta_values(doc, "creator")
            .iter()
            .filter_map(|name| join_name_parts(name))
            .collect(),
        publishers: meta_values(doc, "publisher")
            .iter()
            .filter_map(|name| join_name_parts(name))
            .collect(),
        language: first_non_blank(&meta_values(doc, "language")),
        isbn: extract_isbn(&meta_values(doc, "identifier")),
        description: first_non_blank(&meta_values(doc, "description")),
        publication_date: meta_values(doc, "date")
            .first()
            .and_then(|raw| parse_publication_date(raw)),
        subjects: meta_values(doc, "subject")
            .iter()
            .filter_map(|subject| join_name_parts(subject))
            .collect(),
    }
}

fn assemble_chapters<R: Read + Seek>(doc: &mut EpubDoc<R>) -> Vec<Chapter> {
    let mut toc_labels = Vec::new();
    flatten_toc(&doc.toc, &mut toc_labels);

    let count = doc.get_num_chapters();
    let mut chapters = Vec::with_capacity(count);

    for sequence in 0..count {
        if !doc.set_current_chapter(sequence) {
            warn!(sequence, "Spine entry could not be selected, content left unloaded");
            chapters.push(Chapter {
                id: format!("spine-{}", sequence),
                title: None,
                href: String::new(),
                sequence,
                content: ChapterContent::NotLoaded,
            });
            continue;
        }

        let id = doc
            .get_current_id()
            .unwrap_or_else(|| format!("spine-{}", sequence));
        let href = doc
            .get_current_path()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        let content = match doc.get_current_str() {
            Some((markup, _mime)) => ChapterContent::Loaded(markup.into_bytes()),
            None => {
                warn!(chapter = %id, "Chapter resource could not be read, content left unloaded");
                ChapterContent::NotLoaded
            }
        };

        let title = resolve_chapter_title(&toc_labels, &href);
        chapters.push(Chapter { id, title, href, sequence, content });
    }

    chapters
}

fn assemble_cover<R: Read + Seek>(doc: &mut EpubDoc<R>) -> Option<CoverImage> {
    match doc.get_cover() {
        Some((data, media_type)) => {
            let media_type = if media_type.trim().is_empty() {
                DEFAULT_COVER_MEDIA_TYPE.to_string()
            } else {
                media_type
            };
            Some(CoverImage { data, media_type })
        }
        None => {
            debug!("No cover resource declared");
            None
        }
    }
}

/// All metadata values declared under the given property, in declared order.
fn meta_values<R: Read + Seek>(doc: &EpubDoc<R>, property: &str) -> Vec<String> {
    doc.metadata
        .iter()
        .filter(|item| item.property == property)
        .map(|item| item.value.clone())
        .collect()
}

fn first_non_blank(values: &[String]) -> Option<String> {
    values
        .iter()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Join the whitespace-separated parts of a declared name with single
/// spaces, trimming; blank declarations yield `None` and are dropped.
fn join_name_parts(name: &str) -> Option<String> {
    let joined = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// First declared identifier carrying the ISBN scheme.
///
/// The decoder does not surface the `opf:scheme` attribute, so the scheme
/// test accepts a case-insensitive `urn:isbn:`/`isbn:` prefix (stripped
/// from the stored value) or a bare ISBN-10/13 digit shape.
fn extract_isbn(identifiers: &[String]) -> Option<String> {
    for raw in identifiers {
        let value = raw.trim();
        let lower = value.to_ascii_lowercase();

        if lower.starts_with("urn:isbn:") {
            return join_name_parts(&value["urn:isbn:".len()..]);
        }
        if lower.starts_with("isbn:") {
            return join_name_parts(&value["isbn:".len()..]);
        }
        if looks_like_isbn(value) {
            return Some(value.to_string());
        }
    }
    None
}

fn looks_like_isbn(value: &str) -> bool {
    let compact: Vec<char> = value.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if compact.len() != 10 && compact.len() != 13 {
        return false;
    }
    compact
        .iter()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || (i == compact.len() - 1 && (*c == 'X' || *c == 'x')))
}

/// Declared TOC label for the chapter's resource path, else the filename
/// stem of the href. `None` means the positional "Chapter N" fallback
/// applies at display time.
fn resolve_chapter_title(toc_labels: &[(String, String)], href: &str) -> Option<String> {
    if !href.is_empty() {
        let declared = toc_labels
            .iter()
            .find(|(path, _)| path == href)
            .and_then(|(_, label)| join_name_parts(label));
        if declared.is_some() {
            return declared;
        }
    }

    Path::new(href)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .and_then(|stem| join_name_parts(&stem))
}

/// Depth-first flatten of the navigation tree into (path, label) pairs,
/// with any fragment suffix stripped from the path.
fn flatten_toc(points: &[NavPoint], out: &mut Vec<(String, String)>) {
    for point in points {
        let path = point.content.to_string_lossy().replace('\\', "/");
        let path = path.split('#').next().unwrap_or_default().to_string();
        out.push((path, point.label.clone()));
        flatten_toc(&point.children, out);
    }
}
