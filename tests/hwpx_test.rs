//! Integration tests for HWPX package parsing.

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use hwp2md::{
    parse_bytes, parse_file, parse_file_with_options, Block, Error, Hwp2md, HwpxContainer,
    HwpxParser, ParseOptions, TableFallback,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a zip package with the given entries into `dir`.
fn write_package(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for (entry, data) in entries {
        zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn section(body: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph">{body}</hs:sec>"#
    )
    .into_bytes()
}

fn para(text: &str) -> String {
    format!("<hp:p><hp:run><hp:t>{text}</hp:t></hp:run></hp:p>")
}

fn manifest(items: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<opf:package xmlns:opf="http://www.idpf.org/2007/opf/">
  <opf:metadata>
    <opf:title>사업 계획서</opf:title>
    <opf:language>ko</opf:language>
    <opf:meta name="creator" content="text">김철수</opf:meta>
    <opf:meta name="CreatedDate" content="text">2024-03-01T10:00:00Z</opf:meta>
  </opf:metadata>
  <opf:manifest>{items}</opf:manifest>
</opf:package>"#
    )
    .into_bytes()
}

const MIMETYPE: (&str, &[u8]) = ("mimetype", b"application/hwp+zip");

#[test]
fn test_single_paragraph() {
    let dir = TempDir::new().unwrap();
    let body = section(&para("Hello"));
    let path = write_package(
        dir.path(),
        "hello.hwpx",
        &[MIMETYPE, ("Contents/section0.xml", &body[..])],
    );

    let doc = parse_file(&path).unwrap();
    assert_eq!(doc.len(), 1);
    match &doc.content[0] {
        Block::Paragraph(p) => {
            assert_eq!(p.text, "Hello");
            assert_eq!(p.style.heading_level, 0);
        }
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn test_package_without_sections_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "empty.hwpx", &[MIMETYPE]);

    let doc = parse_file(&path).unwrap();
    assert!(doc.is_empty());
    assert_eq!(doc.metadata.section_count, 0);
}

#[test]
fn test_manifest_without_sections_is_empty() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest("");
    let path = write_package(
        dir.path(),
        "empty.hwpx",
        &[MIMETYPE, ("Contents/content.hpf", &hpf[..])],
    );

    let doc = parse_file(&path).unwrap();
    assert!(doc.is_empty());
    assert_eq!(doc.metadata.title.as_deref(), Some("사업 계획서"));
}

#[test]
fn test_whitespace_paragraphs_dropped() {
    let dir = TempDir::new().unwrap();
    let body = section(&format!(
        "{}{}<hp:p></hp:p>{}",
        para("  "),
        para("본문"),
        para("\t")
    ));
    let path = write_package(dir.path(), "ws.hwpx", &[("Contents/section0.xml", &body[..])]);

    let doc = parse_file(&path).unwrap();
    assert_eq!(doc.len(), 1);
    assert!(doc.paragraphs().all(|p| !p.text.trim().is_empty()));
}

#[test]
fn test_simple_table() {
    let dir = TempDir::new().unwrap();
    let body = section(
        "<hp:p><hp:run><hp:tbl>\
         <hp:tr><hp:tc><hp:subList><hp:p><hp:run><hp:t>A1</hp:t></hp:run></hp:p></hp:subList></hp:tc>\
         <hp:tc><hp:subList><hp:p><hp:run><hp:t>B1</hp:t></hp:run></hp:p></hp:subList></hp:tc></hp:tr>\
         <hp:tr><hp:tc><hp:subList><hp:p><hp:run><hp:t>A2</hp:t></hp:run></hp:p></hp:subList></hp:tc>\
         <hp:tc><hp:subList><hp:p><hp:run><hp:t>B2</hp:t></hp:run></hp:p></hp:subList></hp:tc></hp:tr>\
         </hp:tbl></hp:run></hp:p>",
    );
    let path = write_package(dir.path(), "table.hwpx", &[("Contents/section0.xml", &body[..])]);

    let doc = parse_file(&path).unwrap();
    let tables: Vec<_> = doc.tables().collect();
    assert_eq!(tables.len(), 1);
    let table = tables[0];
    assert_eq!((table.rows, table.cols), (2, 2));
    assert!(table.has_header);
    assert_eq!(table.cells[0][0].text, "A1");
    assert_eq!(table.cells[1][1].text, "B2");
}

#[test]
fn test_cell_line_break() {
    let dir = TempDir::new().unwrap();
    let body = section(
        "<hp:p><hp:run><hp:tbl><hp:tr><hp:tc><hp:subList><hp:p><hp:run>\
         <hp:t>X</hp:t><hp:br type=\"line\"/><hp:t>Y</hp:t>\
         </hp:run></hp:p></hp:subList></hp:tc></hp:tr></hp:tbl></hp:run></hp:p>",
    );
    let path = write_package(dir.path(), "br.hwpx", &[("Contents/section0.xml", &body[..])]);

    let doc = parse_file(&path).unwrap();
    let table = doc.tables().next().unwrap();
    assert_eq!(table.cells[0][0].text, "X\nY");
    assert!(!table.has_header);
}

#[test]
fn test_spans_shift_following_cells() {
    let dir = TempDir::new().unwrap();
    let body = section(
        "<hp:tbl>\
         <hp:tr><hp:tc><hp:cellSpan colSpan=\"2\" rowSpan=\"1\"/><hp:p><hp:t>wide</hp:t></hp:p></hp:tc>\
         <hp:tc><hp:p><hp:t>next</hp:t></hp:p></hp:tc></hp:tr>\
         <hp:tr><hp:tc><hp:p><hp:t>a</hp:t></hp:p></hp:tc><hp:tc><hp:p><hp:t>b</hp:t></hp:p></hp:tc>\
         <hp:tc><hp:p><hp:t>c</hp:t></hp:p></hp:tc></hp:tr>\
         </hp:tbl>",
    );
    let path = write_package(dir.path(), "span.hwpx", &[("Contents/section0.xml", &body[..])]);

    let doc = parse_file(&path).unwrap();
    let table = doc.tables().next().unwrap();
    assert_eq!(table.cols, 3);
    assert_eq!(table.cells[0][0].col_span, 2);
    assert!(table.cells[0][1].covered);
    assert_eq!(table.cells[0][2].text, "next");
    assert!(table.has_merged_cells());
}

#[test]
fn test_nested_table_is_flattened_into_cell() {
    let dir = TempDir::new().unwrap();
    let body = section(
        "<hp:tbl><hp:tr><hp:tc>\
         <hp:p><hp:t>outer</hp:t></hp:p>\
         <hp:p><hp:run><hp:tbl>\
         <hp:tr><hp:tc><hp:p><hp:t>n1</hp:t></hp:p></hp:tc><hp:tc><hp:p><hp:t>n2</hp:t></hp:p></hp:tc></hp:tr>\
         <hp:tr><hp:tc><hp:p><hp:t>n3</hp:t></hp:p></hp:tc><hp:tc><hp:p><hp:t>n4</hp:t></hp:p></hp:tc></hp:tr>\
         </hp:tbl></hp:run></hp:p>\
         </hp:tc></hp:tr></hp:tbl>",
    );
    let path = write_package(dir.path(), "nested.hwpx", &[("Contents/section0.xml", &body[..])]);

    let doc = parse_file(&path).unwrap();
    assert_eq!(doc.tables().count(), 1);
    let table = doc.tables().next().unwrap();
    assert_eq!((table.rows, table.cols), (1, 1));
    let text = &table.cells[0][0].text;
    assert!(text.starts_with("outer\n"));
    assert!(text.contains("n1 | n2\nn3 | n4"));
}

#[test]
fn test_manifest_sections_sorted_and_normalized() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest(
        r#"<opf:item id="section1" href="section1.xml" media-type="application/xml"/>
           <opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
    );
    let first = section(&para("첫째"));
    let second = section(&para("둘째"));
    let path = write_package(
        dir.path(),
        "order.hwpx",
        &[
            MIMETYPE,
            ("Contents/content.hpf", &hpf[..]),
            ("Contents/section1.xml", &second[..]),
            ("Contents/section0.xml", &first[..]),
        ],
    );

    let container = HwpxContainer::open(&path).unwrap();
    assert_eq!(
        container.sections(),
        ["Contents/section0.xml", "Contents/section1.xml"]
    );

    let doc = parse_file(&path).unwrap();
    let texts: Vec<_> = doc.paragraphs().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, ["첫째", "둘째"]);
    assert_eq!(doc.metadata.section_count, 2);
    assert_eq!(doc.metadata.author.as_deref(), Some("김철수"));
    assert_eq!(doc.metadata.format, "HWPX");
}

#[test]
fn test_root_level_manifest_is_found() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest(
        r#"<opf:item id="Section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
    );
    let body = section(&para("root"));
    let path = write_package(
        dir.path(),
        "root.hwpx",
        &[("CONTENT.HPF", &hpf[..]), ("Contents/section0.xml", &body[..])],
    );

    let container = HwpxContainer::open(&path).unwrap();
    assert!(container.manifest().is_some());
    assert_eq!(parse_file(&path).unwrap().plain_text(), "root");
}

#[test]
fn test_missing_section_entry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest(
        r#"<opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
    );
    let path = write_package(
        dir.path(),
        "missing.hwpx",
        &[MIMETYPE, ("Contents/content.hpf", &hpf[..])],
    );

    match parse_file(&path) {
        Err(Error::Section { path, source }) => {
            assert_eq!(path, "Contents/section0.xml");
            assert!(matches!(*source, Error::EntryNotFound(_)));
        }
        other => panic!("expected section error, got {other:?}"),
    }
}

#[test]
fn test_malformed_manifest_is_fatal() {
    let dir = TempDir::new().unwrap();
    let body = section(&para("text"));
    let path = write_package(
        dir.path(),
        "bad.hwpx",
        &[
            (
                "Contents/content.hpf",
                b"<opf:package><opf:manifest></opf:package>".as_slice(),
            ),
            ("Contents/section0.xml", &body[..]),
        ],
    );

    assert!(matches!(parse_file(&path), Err(Error::Manifest(_))));
}

#[test]
fn test_malformed_section_is_fatal() {
    let dir = TempDir::new().unwrap();
    let good = section(&para("ok"));
    let path = write_package(
        dir.path(),
        "broken.hwpx",
        &[
            ("Contents/section0.xml", &good[..]),
            ("Contents/section1.xml", b"<hs:sec><hp:p><hp:t>cut".as_slice()),
        ],
    );

    let err = parse_file(&path).unwrap_err();
    assert!(matches!(err, Error::Section { .. }));
    assert!(err.to_string().contains("Contents/section1.xml"));
}

#[test]
fn test_corrupt_archive_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.hwpx");
    fs::write(&path, b"PK\x03\x04 definitely not a zip archive").unwrap();

    assert!(matches!(
        parse_file(&path),
        Err(Error::Archive(_) | Error::Io(_))
    ));
}

#[test]
fn test_forged_entry_size_does_not_preallocate() {
    let body = section(&para("Hello"));
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("Contents/section0.xml", stored).unwrap();
    zip.write_all(&body).unwrap();
    let mut data = zip.finish().unwrap().into_inner();

    // Declare a ~4 GiB uncompressed size in both the local and central headers.
    let forged = 0xFFFF_FFF0u32.to_le_bytes();
    data[22..26].copy_from_slice(&forged);
    let central = data
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .unwrap();
    data[central + 24..central + 28].copy_from_slice(&forged);

    match parse_bytes(&data) {
        Ok(doc) => assert_eq!(doc.plain_text(), "Hello"),
        Err(e) => assert!(matches!(
            e,
            Error::Archive(_) | Error::Io(_) | Error::Section { .. }
        )),
    }
}

#[test]
fn test_truncated_section_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_package(
        dir.path(),
        "truncated.hwpx",
        &[(
            "Contents/section0.xml",
            b"<hs:sec><hp:p><hp:t>ok</hp:t></hp:p><hp:tbl><hp:tr>".as_slice(),
        )],
    );

    match parse_file(&path) {
        Err(Error::Section { path, source }) => {
            assert_eq!(path, "Contents/section0.xml");
            assert!(matches!(*source, Error::Xml(_)));
        }
        other => panic!("expected section error, got {other:?}"),
    }
}

#[test]
fn test_truncated_manifest_is_fatal() {
    let dir = TempDir::new().unwrap();
    let body = section(&para("text"));
    let path = write_package(
        dir.path(),
        "truncated.hwpx",
        &[
            (
                "Contents/content.hpf",
                br#"<opf:package><opf:manifest><opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#.as_slice(),
            ),
            ("Contents/section0.xml", &body[..]),
        ],
    );

    assert!(matches!(parse_file(&path), Err(Error::Manifest(_))));
}

#[test]
fn test_hwp5_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.hwp");
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.extend_from_slice(&[0u8; 504]);
    fs::write(&path, data).unwrap();

    assert!(matches!(
        parse_file(&path),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_image_resolved_through_manifest() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest(
        r#"<opf:item id="img1" href="BinData/image1.png" media-type="image/png"/>
           <opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
    );
    let body = section(
        "<hp:p><hp:run><hp:pic binItemIDRef=\"img1\" alt=\"로고\" width=\"120\" height=\"abc\"/></hp:run></hp:p>\
         <hp:p><hp:run><hp:pic binItemIDRef=\"img9\"/></hp:run></hp:p>",
    );
    let path = write_package(
        dir.path(),
        "image.hwpx",
        &[
            ("Contents/content.hpf", &hpf[..]),
            ("Contents/section0.xml", &body[..]),
            ("BinData/image1.png", b"\x89PNG\r\n\x1a\n".as_slice()),
        ],
    );

    let doc = parse_file_with_options(&path, ParseOptions::new().with_images(true)).unwrap();
    let images: Vec<_> = doc.images().collect();
    assert_eq!(images.len(), 1);
    let image = images[0];
    assert_eq!(image.id, "img1");
    assert_eq!(image.path, "BinData/image1.png");
    assert_eq!(image.alt.as_deref(), Some("로고"));
    assert_eq!((image.width, image.height), (120, 0));
    assert_eq!(image.format.as_deref(), Some("png"));
    assert_eq!(image.data.as_deref(), Some(&b"\x89PNG\r\n\x1a\n"[..]));

    let plain = parse_file(&path).unwrap();
    assert_eq!(plain.images().count(), 0);
}

#[test]
fn test_discovery_keys_assets_by_stem() {
    let dir = TempDir::new().unwrap();
    let body = section("<hp:p><hp:run><hp:pic><hp:img binaryItemIDRef=\"image1\"/></hp:pic></hp:run></hp:p>");
    let path = write_package(
        dir.path(),
        "discover.hwpx",
        &[
            ("Contents/section0.xml", &body[..]),
            ("BinData/image1.jpg", b"jpeg".as_slice()),
        ],
    );

    let container = HwpxContainer::open(&path).unwrap();
    assert!(container.manifest().is_none());
    assert_eq!(
        container.assets().get("image1").map(String::as_str),
        Some("BinData/image1.jpg")
    );

    let doc = parse_file_with_options(&path, ParseOptions::new().with_images(true)).unwrap();
    let image = doc.images().next().unwrap();
    assert_eq!(image.path, "BinData/image1.jpg");
    assert_eq!(image.format.as_deref(), Some("jpg"));
}

#[test]
fn test_resolve_asset_and_extract_all() {
    let dir = TempDir::new().unwrap();
    let hpf = manifest(
        r#"<opf:item id="img1" href="BinData/image1.png" media-type="image/png"/>
           <opf:item id="img2" href="BinData/missing.bmp" media-type="image/bmp"/>"#,
    );
    let path = write_package(
        dir.path(),
        "assets.hwpx",
        &[
            ("Contents/content.hpf", &hpf[..]),
            ("bindata/IMAGE1.PNG", b"png-bytes".as_slice()),
        ],
    );

    let mut parser = HwpxParser::open(&path).unwrap();
    assert_eq!(parser.resolve_asset("img1").unwrap(), b"png-bytes");
    assert!(matches!(
        parser.resolve_asset("nope"),
        Err(Error::EntryNotFound(_))
    ));

    let out = dir.path().join("images");
    let images = parser.extract_images(&out).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id, "img1");
    assert_eq!(fs::read(out.join("image1.png")).unwrap(), b"png-bytes");
    assert!(!out.join("missing.bmp").exists());
}

#[test]
fn test_header_styles_become_headings_and_quotes() {
    let dir = TempDir::new().unwrap();
    let header = r#"<hh:head xmlns:hh="h"><hh:refList><hh:styles>
        <hh:style id="0" type="PARA" name="바탕글" engName="Normal"/>
        <hh:style id="2" type="PARA" name="개요 1" engName="Outline 1"/>
        <hh:style id="9" type="PARA" name="인용" engName="Quotation"/>
        </hh:styles></hh:refList></hh:head>"#
        .as_bytes();
    let body = section(
        "<hp:p styleIDRef=\"2\"><hp:run><hp:t>서론</hp:t></hp:run></hp:p>\
         <hp:p styleIDRef=\"9\"><hp:run><hp:t>명언</hp:t></hp:run></hp:p>\
         <hp:p styleIDRef=\"0\"><hp:run><hp:t>본문</hp:t></hp:run></hp:p>",
    );
    let path = write_package(
        dir.path(),
        "styled.hwpx",
        &[
            ("Contents/header.xml", header),
            ("Contents/section0.xml", &body[..]),
        ],
    );

    let markdown = Hwp2md::new().parse(&path).unwrap().to_markdown().unwrap();
    assert_eq!(markdown, "# 서론\n\n> 명언\n\n본문");

    let flat = Hwp2md::new()
        .without_styles()
        .parse(&path)
        .unwrap()
        .to_markdown()
        .unwrap();
    assert_eq!(flat, "서론\n\n명언\n\n본문");
}

#[test]
fn test_builder_writes_images() {
    let dir = TempDir::new().unwrap();
    let body = section("<hp:p><hp:run><hp:pic binItemIDRef=\"logo\"/></hp:run></hp:p>");
    let path = write_package(
        dir.path(),
        "logo.hwpx",
        &[
            ("Contents/section0.xml", &body[..]),
            ("BinData/logo.png", b"png".as_slice()),
        ],
    );

    let images_dir = dir.path().join("out/images");
    let result = Hwp2md::new()
        .with_images(true)
        .with_image_dir(&images_dir)
        .with_image_prefix("images/")
        .with_table_fallback(TableFallback::Html)
        .parse(&path)
        .unwrap();

    assert_eq!(result.images.len(), 1);
    assert!(images_dir.join("logo.png").exists());
    assert_eq!(result.to_markdown().unwrap(), "![logo](images/logo.png)");
}
