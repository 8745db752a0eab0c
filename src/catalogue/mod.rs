//! Built-in MIME type catalogue.
//!
//! The catalogue is registered group by group under the root. Registration
//! order is precedence order, so two rules hold throughout:
//!
//! - a node is registered before any sibling whose matcher it would be
//!   shadowed by, and
//! - `text/plain` comes last, because almost any prefix without control
//!   bytes passes as text.
//!
//! Container families (`ole`, `ooxml`, `odf`, `iwork`) sit behind Cargo
//! features. Without them the generic container type is still detected.

use once_cell::sync::Lazy;

use crate::magic::{Matcher, exec, media, ole2, text, zip};
use crate::tree::{MimeDef, MimeTree, MimeTreeBuilder, NodeId};

#[cfg(test)]
mod tests;

const ZIP: Matcher = Matcher::Any(&[
    Matcher::prefix(zip::ZIP_SIGNATURE),
    Matcher::prefix(zip::EMPTY_ARCHIVE_SIGNATURE),
    Matcher::prefix(zip::SPANNED_ARCHIVE_SIGNATURE),
]);
const GIF: Matcher = Matcher::Any(&[Matcher::prefix(b"GIF87a"), Matcher::prefix(b"GIF89a")]);
const TIFF: Matcher = Matcher::Any(&[Matcher::prefix(b"II*\x00"), Matcher::prefix(b"MM\x00*")]);
const MACHO: Matcher = Matcher::Any(&[
    Matcher::prefix(&[0xFE, 0xED, 0xFA, 0xCE]),
    Matcher::prefix(&[0xFE, 0xED, 0xFA, 0xCF]),
    Matcher::prefix(&[0xCE, 0xFA, 0xED, 0xFE]),
    Matcher::prefix(&[0xCF, 0xFA, 0xED, 0xFE]),
]);

// RIFF chunk size (bytes 4..8) varies.
const RIFF_MASK: &[u8] = b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF";
const WEBP: Matcher = Matcher::masked(0, b"RIFF\x00\x00\x00\x00WEBP", RIFF_MASK);
const WAV: Matcher = Matcher::masked(0, b"RIFF\x00\x00\x00\x00WAVE", RIFF_MASK);
const AVI: Matcher = Matcher::masked(0, b"RIFF\x00\x00\x00\x00AVI ", RIFF_MASK);

// Codec identification packet of the first Ogg page.
const OGG_AUDIO: Matcher = Matcher::Any(&[
    Matcher::at(28, b"\x01vorbis"),
    Matcher::at(28, b"OpusHead"),
    Matcher::at(28, b"\x7FFLAC"),
    Matcher::at(28, b"Speex   "),
]);
const OGG_VIDEO: Matcher =
    Matcher::Any(&[Matcher::at(28, b"\x80theora"), Matcher::at(28, b"\x80daala")]);

/// Process-wide built-in tree, constructed on first use.
static BUILTIN: Lazy<MimeTree> = Lazy::new(|| {
    builder()
        .build()
        .expect("Built-in MIME catalogue is well formed")
});

/// The built-in tree.
#[inline]
pub fn builtin() -> &'static MimeTree {
    &BUILTIN
}

/// Builder holding the whole built-in catalogue.
pub(crate) fn builder() -> MimeTreeBuilder {
    let mut builder = MimeTreeBuilder::new();
    let root = builder.root();

    register_archives(&mut builder, root);
    register_documents(&mut builder, root);
    register_images(&mut builder, root);
    register_audio_video(&mut builder, root);
    register_executables(&mut builder, root);
    register_fonts_and_data(&mut builder, root);
    register_text(&mut builder, root);

    builder
}

/// Archives and compressed streams, including ZIP-based documents.
fn register_archives(builder: &mut MimeTreeBuilder, root: NodeId) {
    builder.add(
        root,
        MimeDef::new(
            "application/x-7z-compressed",
            Matcher::prefix(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]),
        )
        .extension("7z"),
    );

    let archive = builder.add(
        root,
        MimeDef::new("application/zip", ZIP)
            .alias("application/x-zip")
            .alias("application/x-zip-compressed")
            .extension("zip"),
    );
    register_zip_family(builder, archive);

    builder.add(
        root,
        MimeDef::new("application/gzip", Matcher::prefix(&[0x1F, 0x8B]))
            .alias("application/x-gzip")
            .alias("application/gzip-compressed")
            .extension("gz"),
    );
    builder.add(
        root,
        MimeDef::new("application/x-bzip2", Matcher::prefix(b"BZh")).extension("bz2"),
    );
    builder.add(
        root,
        MimeDef::new("application/x-xz", Matcher::prefix(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]))
            .extension("xz"),
    );
    builder.add(
        root,
        MimeDef::new("application/zstd", Matcher::prefix(&[0x28, 0xB5, 0x2F, 0xFD]))
            .alias("application/x-zstd")
            .extension("zst"),
    );
    builder.add(
        root,
        MimeDef::new("application/vnd.rar", Matcher::prefix(b"Rar!\x1A\x07"))
            .alias("application/x-rar-compressed")
            .alias("application/x-rar")
            .extension("rar"),
    );
    builder.add(
        root,
        MimeDef::new("application/x-tar", Matcher::at(257, b"ustar")).extension("tar"),
    );
}

/// Formats carried inside ZIP. Those marked by a leading `mimetype` entry
/// go first, since that entry is the most specific evidence available.
fn register_zip_family(builder: &mut MimeTreeBuilder, archive: NodeId) {
    #[cfg(feature = "odf")]
    {
        builder.add(
            archive,
            MimeDef::new("application/vnd.oasis.opendocument.text", Matcher::container(zip::is_odt))
                .alias("application/x-vnd.oasis.opendocument.text")
                .extension("odt"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.oasis.opendocument.text-template",
                Matcher::container(zip::is_ott),
            )
            .alias("application/x-vnd.oasis.opendocument.text-template")
            .extension("ott"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.oasis.opendocument.spreadsheet",
                Matcher::container(zip::is_ods),
            )
            .alias("application/x-vnd.oasis.opendocument.spreadsheet")
            .extension("ods"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.oasis.opendocument.presentation",
                Matcher::container(zip::is_odp),
            )
            .alias("application/x-vnd.oasis.opendocument.presentation")
            .extension("odp"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.oasis.opendocument.graphics",
                Matcher::container(zip::is_odg),
            )
            .alias("application/x-vnd.oasis.opendocument.graphics")
            .extension("odg"),
        );
        builder.add(
            archive,
            MimeDef::new("application/epub+zip", Matcher::container(zip::is_epub))
                .extension("epub"),
        );
    }

    #[cfg(feature = "ooxml")]
    {
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                Matcher::container(zip::is_docx),
            )
            .extension("docx"),
        );
        // Binary workbooks also pass the XML workbook check, so they go first.
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.ms-excel.sheet.binary.macroenabled.12",
                Matcher::container(zip::is_xlsb),
            )
            .extension("xlsb"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                Matcher::container(zip::is_xlsx),
            )
            .extension("xlsx"),
        );
        builder.add(
            archive,
            MimeDef::new(
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                Matcher::container(zip::is_pptx),
            )
            .extension("pptx"),
        );
    }

    #[cfg(feature = "iwork")]
    {
        builder.add(
            archive,
            MimeDef::new("application/vnd.apple.keynote", Matcher::container(zip::is_keynote))
                .alias("application/x-iwork-keynote-sffkey")
                .extension("key"),
        );
        builder.add(
            archive,
            MimeDef::new("application/vnd.apple.numbers", Matcher::container(zip::is_numbers))
                .alias("application/x-iwork-numbers-sffnumbers")
                .extension("numbers"),
        );
        builder.add(
            archive,
            MimeDef::new("application/vnd.apple.pages", Matcher::container(zip::is_pages))
                .alias("application/x-iwork-pages-sffpages")
                .extension("pages"),
        );
    }

    // APKs are signed JARs too, but their manifest is the telling entry.
    builder.add(
        archive,
        MimeDef::new("application/vnd.android.package-archive", Matcher::container(zip::is_apk))
            .extension("apk"),
    );
    builder.add(
        archive,
        MimeDef::new("application/java-archive", Matcher::container(zip::is_jar))
            .alias("application/jar")
            .alias("application/x-java-archive")
            .extension("jar"),
    );
}

fn register_documents(builder: &mut MimeTreeBuilder, root: NodeId) {
    builder.add(
        root,
        MimeDef::new("application/pdf", Matcher::prefix(b"%PDF-"))
            .alias("application/x-pdf")
            .extension("pdf"),
    );

    let ole = builder.add(
        root,
        MimeDef::new("application/x-ole-storage", Matcher::prefix(ole2::OLE2_SIGNATURE)),
    );
    register_ole_family(builder, ole);

    builder.add(
        root,
        MimeDef::new("application/postscript", Matcher::prefix(b"%!PS-Adobe-")).extension("ps"),
    );
}

#[cfg(feature = "ole")]
fn register_ole_family(builder: &mut MimeTreeBuilder, ole: NodeId) {
    builder.add(
        ole,
        MimeDef::new("application/x-ms-installer", Matcher::container(ole2::is_msi))
            .alias("application/x-windows-installer")
            .alias("application/x-msi")
            .extension("msi"),
    );
    builder.add(
        ole,
        MimeDef::new("application/msword", Matcher::container(ole2::is_doc))
            .alias("application/vnd.ms-word")
            .extension("doc"),
    );
    builder.add(
        ole,
        MimeDef::new("application/vnd.ms-excel", Matcher::container(ole2::is_xls))
            .alias("application/msexcel")
            .extension("xls"),
    );
    builder.add(
        ole,
        MimeDef::new("application/vnd.ms-powerpoint", Matcher::container(ole2::is_ppt))
            .alias("application/mspowerpoint")
            .extension("ppt"),
    );
    builder.add(
        ole,
        MimeDef::new("application/vnd.ms-outlook", Matcher::container(ole2::is_msg))
            .extension("msg"),
    );
}

#[cfg(not(feature = "ole"))]
fn register_ole_family(_builder: &mut MimeTreeBuilder, _ole: NodeId) {}

fn register_images(builder: &mut MimeTreeBuilder, root: NodeId) {
    let png = builder.add(
        root,
        MimeDef::new("image/png", Matcher::prefix(b"\x89PNG\r\n\x1A\n")).extension("png"),
    );
    // Animated PNG: acTL chunk directly after IHDR.
    builder.add(
        png,
        MimeDef::new("image/vnd.mozilla.apng", Matcher::at(37, b"acTL")).extension("png"),
    );

    builder.add(
        root,
        MimeDef::new("image/jpeg", Matcher::prefix(&[0xFF, 0xD8, 0xFF]))
            .alias("image/pjpeg")
            .extension("jpg"),
    );
    builder.add(root, MimeDef::new("image/gif", GIF).extension("gif"));
    builder.add(root, MimeDef::new("image/webp", WEBP).extension("webp"));
    builder.add(root, MimeDef::new("image/tiff", TIFF).extension("tiff"));
    builder.add(
        root,
        MimeDef::new("image/x-icon", Matcher::prefix(&[0x00, 0x00, 0x01, 0x00]))
            .alias("image/vnd.microsoft.icon")
            .extension("ico"),
    );
    builder.add(
        root,
        MimeDef::new("image/vnd.adobe.photoshop", Matcher::prefix(b"8BPS"))
            .alias("image/x-psd")
            .alias("application/photoshop")
            .extension("psd"),
    );
    // Two bytes only; kept after every other image signature.
    builder.add(
        root,
        MimeDef::new("image/bmp", Matcher::prefix(b"BM"))
            .alias("image/x-bmp")
            .alias("image/x-ms-bmp")
            .extension("bmp"),
    );
}

fn register_audio_video(builder: &mut MimeTreeBuilder, root: NodeId) {
    builder.add(
        root,
        MimeDef::new("audio/wav", WAV)
            .alias("audio/x-wav")
            .alias("audio/vnd.wave")
            .alias("audio/wave")
            .extension("wav"),
    );
    builder.add(
        root,
        MimeDef::new("video/x-msvideo", AVI)
            .alias("video/avi")
            .alias("video/msvideo")
            .extension("avi"),
    );
    builder.add(root, MimeDef::new("audio/flac", Matcher::prefix(b"fLaC")).extension("flac"));

    let ogg = builder.add(
        root,
        MimeDef::new("application/ogg", Matcher::prefix(b"OggS"))
            .alias("application/x-ogg")
            .extension("ogx"),
    );
    builder.add(ogg, MimeDef::new("audio/ogg", OGG_AUDIO).extension("oga"));
    builder.add(ogg, MimeDef::new("video/ogg", OGG_VIDEO).extension("ogv"));

    builder.add(
        root,
        MimeDef::new("audio/midi", Matcher::prefix(b"MThd"))
            .alias("audio/mid")
            .alias("audio/x-midi")
            .extension("mid"),
    );

    let mp4 = builder.add(
        root,
        MimeDef::new("video/mp4", Matcher::container(media::is_iso_bmff)).extension("mp4"),
    );
    builder.add(
        mp4,
        MimeDef::new("video/quicktime", Matcher::container(media::is_quicktime)).extension("mov"),
    );
    builder.add(
        mp4,
        MimeDef::new("video/3gpp", Matcher::container(media::is_3gpp))
            .alias("audio/3gpp")
            .extension("3gp"),
    );
    builder.add(
        mp4,
        MimeDef::new("audio/mp4", Matcher::container(media::is_m4a))
            .alias("audio/x-m4a")
            .alias("audio/x-mp4a")
            .extension("m4a"),
    );
    builder.add(
        mp4,
        MimeDef::new("image/heic", Matcher::container(media::is_heic)).extension("heic"),
    );
    builder.add(
        mp4,
        MimeDef::new("image/avif", Matcher::container(media::is_avif)).extension("avif"),
    );

    let matroska = builder.add(
        root,
        MimeDef::new("video/x-matroska", Matcher::prefix(media::EBML_SIGNATURE)).extension("mkv"),
    );
    builder.add(
        matroska,
        MimeDef::new("video/webm", Matcher::container(media::is_webm))
            .alias("audio/webm")
            .extension("webm"),
    );

    // Frame sync is only 11 bits; keep MP3 behind the longer signatures.
    builder.add(
        root,
        MimeDef::new("audio/mpeg", Matcher::container(media::is_mp3))
            .alias("audio/x-mpeg")
            .alias("audio/mp3")
            .extension("mp3"),
    );
}

fn register_executables(builder: &mut MimeTreeBuilder, root: NodeId) {
    let elf = builder.add(
        root,
        MimeDef::new("application/x-elf", Matcher::prefix(exec::ELF_SIGNATURE)),
    );
    builder.add(
        elf,
        MimeDef::new("application/x-object", Matcher::container(exec::is_elf_object))
            .extension("o"),
    );
    builder.add(
        elf,
        MimeDef::new("application/x-executable", Matcher::container(exec::is_elf_executable)),
    );
    builder.add(
        elf,
        MimeDef::new("application/x-sharedlib", Matcher::container(exec::is_elf_shared))
            .extension("so"),
    );
    builder.add(
        elf,
        MimeDef::new("application/x-coredump", Matcher::container(exec::is_elf_core)),
    );

    builder.add(
        root,
        MimeDef::new("application/vnd.microsoft.portable-executable", Matcher::prefix(b"MZ"))
            .alias("application/x-msdownload")
            .alias("application/x-dosexec")
            .extension("exe"),
    );
    builder.add(root, MimeDef::new("application/x-mach-binary", MACHO).extension("macho"));
    builder.add(
        root,
        MimeDef::new("application/wasm", Matcher::prefix(b"\x00asm")).extension("wasm"),
    );
}

fn register_fonts_and_data(builder: &mut MimeTreeBuilder, root: NodeId) {
    builder.add(root, MimeDef::new("font/woff", Matcher::prefix(b"wOFF")).extension("woff"));
    builder.add(root, MimeDef::new("font/woff2", Matcher::prefix(b"wOF2")).extension("woff2"));
    builder.add(root, MimeDef::new("font/otf", Matcher::prefix(b"OTTO")).extension("otf"));
    builder.add(
        root,
        MimeDef::new("font/ttf", Matcher::prefix(&[0x00, 0x01, 0x00, 0x00, 0x00]))
            .alias("font/sfnt")
            .alias("application/x-font-ttf")
            .extension("ttf"),
    );
    builder.add(
        root,
        MimeDef::new("application/vnd.sqlite3", Matcher::prefix(b"SQLite format 3\x00"))
            .alias("application/x-sqlite3")
            .extension("sqlite"),
    );
}

fn register_text(builder: &mut MimeTreeBuilder, root: NodeId) {
    let plain = builder.add(
        root,
        MimeDef::new("text/plain", Matcher::container(text::is_text)).extension("txt"),
    );
    builder.add(
        plain,
        MimeDef::new("text/html", Matcher::container(text::is_html)).extension("html"),
    );

    let xml = builder.add(
        plain,
        MimeDef::new("text/xml", Matcher::container(text::is_xml))
            .alias("application/xml")
            .extension("xml"),
    );
    builder.add(
        xml,
        MimeDef::new("image/svg+xml", Matcher::container(text::is_svg)).extension("svg"),
    );
    builder.add(
        xml,
        MimeDef::new("application/rss+xml", Matcher::container(text::is_rss))
            .alias("text/rss")
            .extension("rss"),
    );
    builder.add(
        xml,
        MimeDef::new("application/atom+xml", Matcher::container(text::is_atom))
            .extension("atom"),
    );

    builder.add(
        plain,
        MimeDef::new("text/rtf", Matcher::prefix(b"{\\rtf"))
            .alias("application/rtf")
            .extension("rtf"),
    );
}
