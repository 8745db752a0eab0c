use std::collections::HashSet;
use std::io::{Cursor, Write};

use proptest::prelude::*;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::builtin;
use crate::READ_LIMIT;
use crate::tree::{EMPTY, OCTET_STREAM};

fn detect(data: &[u8]) -> &'static str {
    builtin().detect(data).name()
}

/// Archive written by a real ZIP writer. The first entry is stored, the
/// rest deflated, which is how ODF and EPUB packages are laid out.
fn write_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (index, (name, data)) in entries.iter().enumerate() {
        let method = if index == 0 {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        writer
            .start_file(*name, SimpleFileOptions::default().compression_method(method))
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn elf(class: u8, data: u8, e_type: u16) -> Vec<u8> {
    let mut out = vec![0u8; 64];
    out[..4].copy_from_slice(b"\x7FELF");
    out[4] = class;
    out[5] = data;
    out[6] = 1;
    let e_type = if data == 1 {
        e_type.to_le_bytes()
    } else {
        e_type.to_be_bytes()
    };
    out[16..18].copy_from_slice(&e_type);
    out
}

fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&24u32.to_be_bytes());
    out.extend_from_slice(b"ftyp");
    out.extend_from_slice(brand);
    out.extend_from_slice(&[0, 0, 2, 0]);
    out.extend_from_slice(b"isomiso2");
    out
}

#[test]
fn test_empty_and_unknown() {
    assert_eq!(detect(b""), EMPTY);
    assert_eq!(detect(b"\x00\x01\x02\x03\x04"), OCTET_STREAM);
}

#[test]
fn test_images() {
    let png = b"\x89PNG\r\n\x1A\n\x00\x00\x00\x0DIHDR";
    assert_eq!(detect(png), "image/png");

    let mut apng = b"\x89PNG\r\n\x1A\n".to_vec();
    apng.resize(37, 0);
    apng.extend_from_slice(b"acTL");
    let mime = builtin().detect(&apng);
    assert_eq!(mime.name(), "image/vnd.mozilla.apng");
    assert_eq!(mime.parent().unwrap().name(), "image/png");

    assert_eq!(detect(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "image/jpeg");
    assert_eq!(detect(b"GIF89a\x01\x00\x01\x00"), "image/gif");
    assert_eq!(detect(b"RIFF\x24\x10\x00\x00WEBPVP8 "), "image/webp");
    assert_eq!(detect(b"II*\x00\x08\x00\x00\x00"), "image/tiff");
    assert_eq!(detect(b"MM\x00*\x00\x00\x00\x08"), "image/tiff");
    assert_eq!(detect(b"\x00\x00\x01\x00\x01\x00\x10\x10"), "image/x-icon");
    assert_eq!(detect(b"8BPS\x00\x01"), "image/vnd.adobe.photoshop");
    assert_eq!(detect(b"BM\x36\x00\x0C\x00\x00\x00"), "image/bmp");
}

#[test]
fn test_audio_video() {
    assert_eq!(detect(b"RIFF\x24\x08\x00\x00WAVEfmt "), "audio/wav");
    assert_eq!(detect(b"RIFF\x24\x08\x00\x00AVI LIST"), "video/x-msvideo");
    assert_eq!(detect(b"fLaC\x00\x00\x00\x22"), "audio/flac");
    assert_eq!(detect(b"MThd\x00\x00\x00\x06"), "audio/midi");
    assert_eq!(detect(b"ID3\x04\x00\x00\x00\x00\x00\x00"), "audio/mpeg");
    assert_eq!(detect(&[0xFF, 0xFB, 0x90, 0x64, 0x00]), "audio/mpeg");

    let mut vorbis = b"OggS\x00\x02".to_vec();
    vorbis.resize(28, 0);
    vorbis.extend_from_slice(b"\x01vorbis");
    assert_eq!(detect(&vorbis), "audio/ogg");
    let mut theora = b"OggS\x00\x02".to_vec();
    theora.resize(28, 0);
    theora.extend_from_slice(b"\x80theora");
    assert_eq!(detect(&theora), "video/ogg");
    assert_eq!(detect(b"OggS\x00\x02\x00\x00"), "application/ogg");

    assert_eq!(detect(&ftyp(b"isom")), "video/mp4");
    assert_eq!(detect(&ftyp(b"qt  ")), "video/quicktime");
    assert_eq!(detect(&ftyp(b"3gp5")), "video/3gpp");
    assert_eq!(detect(&ftyp(b"M4A ")), "audio/mp4");
    assert_eq!(detect(&ftyp(b"heic")), "image/heic");
    assert_eq!(detect(&ftyp(b"avif")), "image/avif");

    let webm = b"\x1A\x45\xDF\xA3\x9F\x42\x86\x81\x01\x42\x82\x84webm\x42\x87\x81\x04";
    assert_eq!(detect(webm), "video/webm");
    let mkv = b"\x1A\x45\xDF\xA3\x9F\x42\x82\x88matroska";
    assert_eq!(detect(mkv), "video/x-matroska");
}

#[test]
fn test_archives() {
    assert_eq!(detect(b"\x37\x7A\xBC\xAF\x27\x1C\x00\x04"), "application/x-7z-compressed");
    assert_eq!(detect(b"\x1F\x8B\x08\x00"), "application/gzip");
    assert_eq!(detect(b"BZh91AY&SY"), "application/x-bzip2");
    assert_eq!(detect(b"\xFD7zXZ\x00\x00\x04"), "application/x-xz");
    assert_eq!(detect(b"\x28\xB5\x2F\xFD\x24\x00"), "application/zstd");
    assert_eq!(detect(b"Rar!\x1A\x07\x01\x00"), "application/vnd.rar");
    assert_eq!(detect(b"PK\x05\x06\x00\x00\x00\x00"), "application/zip");

    let mut tar = vec![0u8; 512];
    tar[..9].copy_from_slice(b"hello.txt");
    tar[257..265].copy_from_slice(b"ustar\x0000");
    assert_eq!(detect(&tar), "application/x-tar");
}

#[test]
fn test_plain_zip_stays_generic() {
    let data = write_zip(&[("readme.txt", b"hello"), ("src/main.rs", b"fn main() {}")]);
    assert_eq!(detect(&data), "application/zip");
}

#[test]
fn test_java_and_android_archives() {
    let jar = write_zip(&[
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
        ("Main.class", b"\xCA\xFE\xBA\xBE"),
    ]);
    assert_eq!(detect(&jar), "application/java-archive");

    let apk = write_zip(&[
        ("AndroidManifest.xml", b"\x03\x00\x08\x00"),
        ("classes.dex", b"dex\n035\x00"),
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
    ]);
    assert_eq!(detect(&apk), "application/vnd.android.package-archive");
}

#[cfg(feature = "ooxml")]
#[test]
fn test_office_open_xml() {
    let docx = write_zip(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("_rels/.rels", b"<Relationships/>"),
        ("word/document.xml", b"<w:document/>"),
    ]);
    let mime = builtin().detect(&docx);
    assert_eq!(
        mime.name(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(mime.extension(), Some("docx"));
    assert!(mime.parent().unwrap().is("application/zip"));

    let xlsx = write_zip(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("xl/workbook.xml", b"<workbook/>"),
    ]);
    assert_eq!(
        detect(&xlsx),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let xlsb = write_zip(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("xl/workbook.bin", b"\x83\x01\x00"),
    ]);
    assert_eq!(detect(&xlsb), "application/vnd.ms-excel.sheet.binary.macroenabled.12");

    let pptx = write_zip(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("ppt/presentation.xml", b"<p:presentation/>"),
    ]);
    assert_eq!(
        detect(&pptx),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );

    // Office parts without the package bookkeeping in front are just a zip.
    let loose = write_zip(&[("word/document.xml", b"<w:document/>")]);
    assert_eq!(detect(&loose), "application/zip");
}

#[cfg(feature = "odf")]
#[test]
fn test_open_document() {
    let cases: &[(&[u8], &str)] = &[
        (
            b"application/vnd.oasis.opendocument.text",
            "application/vnd.oasis.opendocument.text",
        ),
        (
            b"application/vnd.oasis.opendocument.spreadsheet",
            "application/vnd.oasis.opendocument.spreadsheet",
        ),
        (
            b"application/vnd.oasis.opendocument.presentation",
            "application/vnd.oasis.opendocument.presentation",
        ),
        (b"application/epub+zip", "application/epub+zip"),
    ];
    for (mimetype, expected) in cases {
        let data = write_zip(&[
            ("mimetype", *mimetype),
            ("content.xml", b"<office:document-content/>"),
        ]);
        assert_eq!(detect(&data), *expected);
    }

    // Hand-built header with no extra field, as most ODF writers produce.
    let odt = crate::magic::zip::tests::archive(&[
        ("mimetype", b"application/vnd.oasis.opendocument.text-template"),
        ("content.xml", b"<x/>"),
    ]);
    assert_eq!(detect(&odt), "application/vnd.oasis.opendocument.text-template");
}

#[cfg(feature = "iwork")]
#[test]
fn test_iwork() {
    let keynote = write_zip(&[("Index/Document.iwa", b"\x00"), ("Index/Slide-1.iwa", b"\x00")]);
    assert_eq!(detect(&keynote), "application/vnd.apple.keynote");

    let numbers = write_zip(&[
        ("Index/Document.iwa", b"\x00"),
        ("Index/CalculationEngine.iwa", b"\x00"),
    ]);
    assert_eq!(detect(&numbers), "application/vnd.apple.numbers");

    let pages = write_zip(&[
        ("Index/Document.iwa", b"\x00"),
        ("Metadata/Properties.plist", b"bplist"),
    ]);
    assert_eq!(detect(&pages), "application/vnd.apple.pages");
}

#[test]
fn test_compound_files() {
    use crate::magic::ole2::tests::compound_file;

    assert_eq!(detect(&compound_file(None, &[])), "application/x-ole-storage");

    #[cfg(feature = "ole")]
    {
        use crate::magic::ole2::tests::{msi_clsid, word_clsid};

        assert_eq!(detect(&compound_file(Some(word_clsid()), &[])), "application/msword");
        assert_eq!(detect(&compound_file(None, &["Workbook"])), "application/vnd.ms-excel");
        assert_eq!(
            detect(&compound_file(None, &["Current User", "PowerPoint Document"])),
            "application/vnd.ms-powerpoint"
        );
        assert_eq!(detect(&compound_file(Some(msi_clsid()), &[])), "application/x-ms-installer");
        assert!(builtin().detect(&compound_file(Some(msi_clsid()), &[])).is("application/x-msi"));
    }
}

#[test]
fn test_documents_and_executables() {
    assert_eq!(detect(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3"), "application/pdf");
    assert_eq!(detect(b"%!PS-Adobe-3.0\n"), "application/postscript");

    assert_eq!(detect(&elf(2, 1, 1)), "application/x-object");
    assert_eq!(detect(&elf(2, 1, 2)), "application/x-executable");
    assert_eq!(detect(&elf(1, 2, 3)), "application/x-sharedlib");
    assert_eq!(detect(&elf(2, 1, 4)), "application/x-coredump");
    assert_eq!(detect(&elf(2, 1, 0xFE00)), "application/x-elf");

    assert_eq!(detect(b"MZ\x90\x00\x03\x00"), "application/vnd.microsoft.portable-executable");
    assert_eq!(detect(&[0xCF, 0xFA, 0xED, 0xFE, 0x07, 0x00]), "application/x-mach-binary");
    assert_eq!(detect(b"\x00asm\x01\x00\x00\x00"), "application/wasm");
    assert_eq!(detect(b"wOF2\x00\x01\x00\x00"), "font/woff2");
    assert_eq!(detect(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x0F]), "font/ttf");
    assert_eq!(detect(b"SQLite format 3\x00\x10\x00"), "application/vnd.sqlite3");
}

#[test]
fn test_text_family() {
    assert_eq!(detect(b"just some words\n"), "text/plain");
    assert_eq!(detect(b"\xFE\xFF\x00h\x00i"), "text/plain");
    assert_eq!(detect(b"{\\rtf1\\ansi\\deff0"), "text/rtf");

    let html = builtin().detect(b"<!DOCTYPE html>\n<html><body></body></html>");
    assert_eq!(html.name(), "text/html");
    assert_eq!(html.parent().unwrap().name(), "text/plain");

    let svg = builtin()
        .detect(b"<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>");
    let chain: Vec<&str> = svg.ancestors().map(|m| m.name()).collect();
    assert_eq!(chain, vec!["image/svg+xml", "text/xml", "text/plain", OCTET_STREAM]);

    assert_eq!(detect(b"<?xml version=\"1.0\"?><rss version=\"2.0\">"), "application/rss+xml");
    assert_eq!(detect(b"<?xml version=\"1.0\"?><feed xmlns=\"a\">"), "application/atom+xml");
    assert_eq!(detect(b"<?xml version=\"1.0\"?><note/>"), "text/xml");
}

#[test]
fn test_first_accepting_sibling_wins() {
    // Text that happens to open with a short binary signature is claimed by
    // that signature; text/plain is never consulted.
    assert_eq!(detect(b"BM is also a text file"), "image/bmp");
    assert_eq!(detect(b"MZ is also a text file"), "application/vnd.microsoft.portable-executable");

    // A bare local header with nothing recognisable inside stays at zip,
    // and does not fall through to later siblings.
    assert_eq!(detect(b"PK\x03\x04 plain text after the magic"), "application/zip");
}

#[test]
fn test_names_and_aliases_unique() {
    let mut seen = HashSet::new();
    for mime in builtin().iter() {
        assert!(seen.insert(mime.name().to_string()), "duplicate name {}", mime.name());
        for alias in mime.aliases() {
            assert!(seen.insert(alias.to_ascii_lowercase()), "duplicate alias {alias}");
        }
    }
    assert!(!seen.contains(EMPTY));
}

#[test]
fn test_lookup_resolves_every_alias() {
    for mime in builtin().iter() {
        assert_eq!(builtin().lookup(mime.name()), Some(mime));
        for alias in mime.aliases() {
            let decorated = format!(" {}; charset=binary", alias.to_ascii_uppercase());
            assert!(mime.is(&decorated), "{} should accept {decorated:?}", mime.name());
            assert_eq!(builtin().lookup(&decorated), Some(mime));
        }
        if let Some(extension) = mime.extension() {
            assert!(!extension.starts_with('.'));
        }
    }
}

#[test]
fn test_root_shape() {
    let root = builtin().root();
    assert_eq!(root.name(), OCTET_STREAM);
    assert!(root.parent().is_none());
    assert_eq!(root.children().last().unwrap().name(), "text/plain");
    assert!(builtin().iter().all(|mime| mime.depth() < builtin().len()));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_shared_across_threads() {
    assert_send_sync::<crate::MimeTree>();
    assert_send_sync::<crate::MimeType<'static>>();
    assert_send_sync::<crate::Detector<'static>>();

    let samples: Vec<Vec<u8>> = vec![
        b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec(),
        b"GIF89a\x01\x00\x01\x00".to_vec(),
        b"%PDF-1.7\n".to_vec(),
        b"<!DOCTYPE html>\n<html></html>".to_vec(),
        b"<?xml version=\"1.0\"?><rss version=\"2.0\">".to_vec(),
        b"just some words\n".to_vec(),
        write_zip(&[("readme.txt", b"hello")]),
        write_zip(&[("Index/Document.iwa", b"\x00"), ("Index/Slide-1.iwa", b"\x00")]),
        elf(2, 1, 2),
        ftyp(b"heic"),
        Vec::new(),
        vec![0x00, 0x01, 0x02, 0x03],
    ];
    let expected: Vec<&str> = samples.iter().map(|data| detect(data)).collect();

    let detector = crate::Detector::new();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|offset| {
                let samples = &samples;
                scope.spawn(move || {
                    let mut names = vec![""; samples.len()];
                    for step in 0..samples.len() * 16 {
                        let index = (offset + step) % samples.len();
                        names[index] = detector.detect(&samples[index]).name();
                        assert_eq!(builtin().detect(&samples[index]).name(), names[index]);
                    }
                    names
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

fn detectable_prefix() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..256),
        "[ -~\n\t]{1,256}".prop_map(String::into_bytes),
        prop::collection::vec(any::<u8>(), 0..256)
            .prop_map(|tail| [&b"PK\x03\x04"[..], tail.as_slice()].concat()),
        prop::collection::vec(any::<u8>(), 0..256)
            .prop_map(|tail| [&b"\x7FELF"[..], tail.as_slice()].concat()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_detection_is_deterministic(data in detectable_prefix()) {
        let first = builtin().detect(&data);
        let second = builtin().detect(&data);
        prop_assert_eq!(first, second);
        prop_assert!(!first.is_empty_input());
    }

    #[test]
    fn prop_bytes_past_limit_are_ignored(
        head in prop::collection::vec(any::<u8>(), READ_LIMIT),
        tail in prop::collection::vec(any::<u8>(), 1..512),
    ) {
        let full = [head.as_slice(), tail.as_slice()].concat();
        prop_assert_eq!(builtin().detect(&full), builtin().detect(&head));
    }

    #[test]
    fn prop_result_chains_to_root(data in detectable_prefix()) {
        let mime = builtin().detect(&data);
        let last = mime.ancestors().last().unwrap();
        prop_assert!(last.is_root());
        prop_assert!(mime.depth() < builtin().len());
    }

    #[test]
    fn prop_is_ignores_case_and_parameters(data in detectable_prefix(), upper in any::<bool>()) {
        let mime = builtin().detect(&data);
        let name = if upper { mime.name().to_ascii_uppercase() } else { mime.name().to_string() };
        let decorated = format!("{name} ; q=0.5");
        prop_assert!(mime.is(&decorated));
    }
}
