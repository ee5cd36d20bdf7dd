//! CLI integration tests
use std::io::{Cursor, Write};

use predicates::prelude::*;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("folia").unwrap()
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const CONTENT_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="bookid" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>The Voyage</dc:title>
    <dc:creator>Jane Doe</dc:creator>
    <dc:identifier id="bookid">urn:isbn:9780140449334</dc:identifier>
    <meta name="cover" content="cover-image"/>
  </metadata>
  <manifest>
    <item id="cover-image" href="cover.jpg" media-type="image/jpeg"/>
    <item id="chapter-1" href="text/chap01.xhtml" media-type="application/xhtml+xml"/>
    <item id="chapter-2" href="text/chap02.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="chapter-1"/>
    <itemref idref="chapter-2"/>
  </spine>
</package>
"#;

const COVER_JPG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46];

fn chapter_markup(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>chapter</title></head><body>{}</body></html>"#,
        body
    )
}

/// Write a minimal EPUB into the given directory and return its path.
fn fixture_epub(dir: &TempDir) -> std::path::PathBuf {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(CONTAINER_XML.as_bytes()).unwrap();
    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(CONTENT_OPF.as_bytes()).unwrap();
    zip.start_file("OEBPS/text/chap01.xhtml", deflated).unwrap();
    zip.write_all(chapter_markup("<p>Hello</p><p>World</p>").as_bytes()).unwrap();
    zip.start_file("OEBPS/text/chap02.xhtml", deflated).unwrap();
    zip.write_all(chapter_markup("Line1<br/>Line2").as_bytes()).unwrap();
    zip.start_file("OEBPS/cover.jpg", deflated).unwrap();
    zip.write_all(COVER_JPG).unwrap();

    let bytes = zip.finish().unwrap().into_inner();
    let path = dir.path().join("voyage.epub");
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_cli_no_argument_is_a_silent_noop() {
    cmd().assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_missing_file_fails_with_diagnostic() {
    cmd()
        .arg("/definitely/not/here.epub")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("Failed to read")));
}

#[test]
fn test_cli_prints_title() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);

    cmd()
        .arg(epub)
        .assert()
        .success()
        .stdout(predicate::str::contains("The Voyage"));
}

#[test]
fn test_cli_chapter_text() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);

    cmd()
        .args(["--chapter", "0"])
        .arg(epub)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello\n\nWorld"));
}

#[test]
fn test_cli_chapter_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);

    cmd()
        .args(["--chapter", "99"])
        .arg(epub)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_cli_json_format() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);

    cmd()
        .args(["-f", "json"])
        .arg(epub)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "The Voyage""#))
        .stdout(predicate::str::contains(r#""isbn""#));
}

#[test]
fn test_cli_writes_cover() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);
    let cover_path = dir.path().join("cover.jpg");

    cmd()
        .arg("--cover")
        .arg(&cover_path)
        .arg(epub)
        .assert()
        .success();

    assert_eq!(std::fs::read(cover_path).unwrap(), COVER_JPG);
}

#[test]
fn test_cli_output_file() {
    let dir = TempDir::new().unwrap();
    let epub = fixture_epub(&dir);
    let out = dir.path().join("title.txt");

    cmd().arg("-o").arg(&out).arg(epub).assert().success();

    assert_eq!(std::fs::read_to_string(out).unwrap(), "The Voyage");
}
