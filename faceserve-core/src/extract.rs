//! Font descriptor extraction: container sniffing and name-table reads

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use read_fonts::tables::name::NameId;
use read_fonts::{FontRef, TableProvider};
use serde::{Deserialize, Serialize};

/// Failure modes for one candidate file. None of these may escape the change
/// pipeline; every failure is isolated to the file that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The path failed the candidate pre-filter. Skipped silently.
    #[error("not a font file: {0}")]
    NotAFontFile(PathBuf),

    /// The file could not be read.
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a parseable font.
    #[error("parsing {path}: {detail}")]
    ParseFailure { path: PathBuf, detail: String },
}

/// Binary font container formats faceserve knows how to serve.
///
/// Derived from the sniffed container magic, never from the file extension;
/// a mislabeled extension still yields the real format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Otf,
    Ttf,
    Woff,
    Woff2,
    Unknown,
}

impl FontFormat {
    /// Map a request/file extension onto a servable format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "otf" => Some(Self::Otf),
            "ttf" => Some(Self::Ttf),
            "woff" => Some(Self::Woff),
            "woff2" => Some(Self::Woff2),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Otf => "otf",
            Self::Ttf => "ttf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Unknown => "unknown",
        }
    }

    /// MIME type used when serving the binary over HTTP.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Otf => "font/opentype",
            Self::Ttf => "font/truetype",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Normalized metadata parsed out of one font file. Name fields are taken
/// verbatim from the name table; absent entries are empty, never null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDescriptor {
    pub format: FontFormat,
    pub full_name: String,
    pub family_name: String,
    pub subfamily_name: String,
    pub copyright: String,
}

impl Default for FontFormat {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Container kind, sniffed from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    TrueType,
    OpenType,
    Woff,
    Woff2,
    Collection,
}

/// Cheap pre-filter: known extension, not a dotfile. Runs before any I/O.
pub fn is_candidate(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(true);
    if hidden {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(FontFormat::from_extension)
        .is_some()
}

/// Parse the font file at `path` into a descriptor.
pub fn extract(path: &Path) -> Result<FontDescriptor, ExtractError> {
    if !is_candidate(path) {
        return Err(ExtractError::NotAFontFile(path.to_path_buf()));
    }

    let data = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    descriptor_from_bytes(path, &data)
}

/// Sniff and parse already-loaded bytes. `path` is only used for error
/// reporting and never touched.
pub fn descriptor_from_bytes(path: &Path, data: &[u8]) -> Result<FontDescriptor, ExtractError> {
    let container =
        sniff(data).ok_or_else(|| parse_failure(path, "unrecognized font container"))?;

    let decoded;
    let (format, sfnt): (FontFormat, &[u8]) = match container {
        Container::TrueType => (FontFormat::Ttf, data),
        Container::OpenType => (FontFormat::Otf, data),
        Container::Woff => {
            decoded = decode_woff(data).map_err(|detail| parse_failure(path, &detail))?;
            (FontFormat::Woff, &decoded)
        }
        // Brotli-compressed payload; classified but not decodable here.
        Container::Woff2 => return Err(parse_failure(path, "WOFF2 payload is not decodable")),
        // A collection has no single-file download format; index its first
        // face so lookups and CSS still work.
        Container::Collection => (FontFormat::Unknown, data),
    };

    let font = match container {
        Container::Collection => FontRef::from_index(sfnt, 0),
        _ => FontRef::new(sfnt),
    }
    .map_err(|err| parse_failure(path, &err.to_string()))?;

    let mut descriptor = read_names(&font);
    descriptor.format = format;
    Ok(descriptor)
}

fn parse_failure(path: &Path, detail: &str) -> ExtractError {
    ExtractError::ParseFailure {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

fn sniff(data: &[u8]) -> Option<Container> {
    let magic: &[u8; 4] = data.get(..4)?.try_into().ok()?;
    match magic {
        &[0x00, 0x01, 0x00, 0x00] | b"true" => Some(Container::TrueType),
        b"OTTO" => Some(Container::OpenType),
        b"wOFF" => Some(Container::Woff),
        b"wOF2" => Some(Container::Woff2),
        b"ttcf" => Some(Container::Collection),
        _ => None,
    }
}

/// First Unicode string seen for each name ID we care about. Typographic
/// family/subfamily (IDs 16/17) only fill in when the legacy IDs are absent.
#[derive(Default)]
struct NameAccumulator {
    copyright: Option<String>,
    family: Option<String>,
    subfamily: Option<String>,
    typographic_family: Option<String>,
    typographic_subfamily: Option<String>,
    full: Option<String>,
}

fn read_names(font: &FontRef) -> FontDescriptor {
    let mut acc = NameAccumulator::default();

    if let Ok(name_table) = font.name() {
        let data = name_table.string_data();
        for record in name_table.name_record() {
            if !record.is_unicode() {
                continue;
            }
            let Ok(entry) = record.string(data) else {
                continue;
            };
            let value = entry.to_string();
            if value.trim().is_empty() {
                continue;
            }

            let id = record.name_id();
            let slot = if id == NameId::COPYRIGHT_NOTICE {
                &mut acc.copyright
            } else if id == NameId::FAMILY_NAME {
                &mut acc.family
            } else if id == NameId::SUBFAMILY_NAME {
                &mut acc.subfamily
            } else if id == NameId::TYPOGRAPHIC_FAMILY_NAME {
                &mut acc.typographic_family
            } else if id == NameId::TYPOGRAPHIC_SUBFAMILY_NAME {
                &mut acc.typographic_subfamily
            } else if id == NameId::FULL_NAME {
                &mut acc.full
            } else {
                continue;
            };
            slot.get_or_insert(value);
        }
    }

    FontDescriptor {
        format: FontFormat::Unknown,
        full_name: acc.full.unwrap_or_default(),
        family_name: acc.family.or(acc.typographic_family).unwrap_or_default(),
        subfamily_name: acc
            .subfamily
            .or(acc.typographic_subfamily)
            .unwrap_or_default(),
        copyright: acc.copyright.unwrap_or_default(),
    }
}

const WOFF_HEADER_LEN: usize = 44;
const WOFF_DIR_ENTRY_LEN: usize = 20;

/// Rebuild the sfnt a WOFF file wraps: same table directory, tables inflated
/// (zlib) where the stored length is shorter than the original.
fn decode_woff(data: &[u8]) -> Result<Vec<u8>, String> {
    if data.len() < WOFF_HEADER_LEN {
        return Err("WOFF header truncated".to_string());
    }

    let flavor = be_u32(data, 4);
    let num_tables = be_u16(data, 12) as usize;
    if num_tables == 0 {
        return Err("WOFF file declares no tables".to_string());
    }

    let dir_end = WOFF_HEADER_LEN + num_tables * WOFF_DIR_ENTRY_LEN;
    if data.len() < dir_end {
        return Err("WOFF table directory truncated".to_string());
    }

    let mut tables: Vec<(u32, u32, Vec<u8>)> = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let base = WOFF_HEADER_LEN + i * WOFF_DIR_ENTRY_LEN;
        let tag = be_u32(data, base);
        let offset = be_u32(data, base + 4) as usize;
        let comp_len = be_u32(data, base + 8) as usize;
        let orig_len = be_u32(data, base + 12) as usize;
        let checksum = be_u32(data, base + 16);

        let end = offset
            .checked_add(comp_len)
            .ok_or_else(|| "WOFF table offset overflow".to_string())?;
        if end > data.len() {
            return Err("WOFF table data out of bounds".to_string());
        }
        let raw = &data[offset..end];

        let table = if comp_len == orig_len {
            raw.to_vec()
        } else {
            let mut inflated = Vec::with_capacity(orig_len);
            flate2::read::ZlibDecoder::new(raw)
                .read_to_end(&mut inflated)
                .map_err(|err| format!("inflating WOFF table: {err}"))?;
            if inflated.len() != orig_len {
                return Err("inflated WOFF table length mismatch".to_string());
            }
            inflated
        };

        tables.push((tag, checksum, table));
    }

    // sfnt offset-table bookkeeping.
    let mut entry_selector: u16 = 0;
    while (1usize << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1usize << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let mut sfnt = Vec::new();
    sfnt.extend_from_slice(&flavor.to_be_bytes());
    sfnt.extend_from_slice(&(num_tables as u16).to_be_bytes());
    sfnt.extend_from_slice(&(search_range as u16).to_be_bytes());
    sfnt.extend_from_slice(&entry_selector.to_be_bytes());
    sfnt.extend_from_slice(&(range_shift as u16).to_be_bytes());

    let mut offset = 12 + num_tables * 16;
    for (tag, checksum, table) in &tables {
        sfnt.extend_from_slice(&tag.to_be_bytes());
        sfnt.extend_from_slice(&checksum.to_be_bytes());
        sfnt.extend_from_slice(&(offset as u32).to_be_bytes());
        sfnt.extend_from_slice(&(table.len() as u32).to_be_bytes());
        offset += padded_len(table.len());
    }
    for (_, _, table) in &tables {
        sfnt.extend_from_slice(table);
        sfnt.resize(sfnt.len() + padded_len(table.len()) - table.len(), 0);
    }

    Ok(sfnt)
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

fn be_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
