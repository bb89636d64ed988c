//! Shared fixtures: minimal synthesized font binaries.
//!
//! Real font files are large and licensed; a name table wrapped in a valid
//! table directory is all the extractor reads, so the tests build exactly
//! that in memory.
#![allow(dead_code)]

use std::io::Write;

const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;
const LANGUAGE_EN_US: u16 = 0x409;

pub const TRUETYPE_FLAVOR: u32 = 0x0001_0000;

/// A TrueType-flavored sfnt with the standard name IDs filled in.
pub fn build_ttf(family: &str, subfamily: &str, full: &str) -> Vec<u8> {
    build_sfnt(
        TRUETYPE_FLAVOR,
        &[
            (0, "Copyright Acme Type Foundry"),
            (1, family),
            (2, subfamily),
            (4, full),
        ],
    )
}

/// A minimal sfnt containing only a name table with the given records.
pub fn build_sfnt(flavor: u32, names: &[(u16, &str)]) -> Vec<u8> {
    let mut records = Vec::new();
    let mut storage = Vec::new();
    for &(name_id, value) in names {
        let utf16: Vec<u8> = value
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect();
        records.extend_from_slice(&PLATFORM_WINDOWS.to_be_bytes());
        records.extend_from_slice(&ENCODING_UNICODE_BMP.to_be_bytes());
        records.extend_from_slice(&LANGUAGE_EN_US.to_be_bytes());
        records.extend_from_slice(&name_id.to_be_bytes());
        records.extend_from_slice(&(utf16.len() as u16).to_be_bytes());
        records.extend_from_slice(&(storage.len() as u16).to_be_bytes());
        storage.extend_from_slice(&utf16);
    }

    let mut name_table = Vec::new();
    name_table.extend_from_slice(&0u16.to_be_bytes()); // format 0
    name_table.extend_from_slice(&(names.len() as u16).to_be_bytes());
    name_table.extend_from_slice(&((6 + names.len() * 12) as u16).to_be_bytes());
    name_table.extend_from_slice(&records);
    name_table.extend_from_slice(&storage);

    // sfnt wrapper: header, one directory entry, the table itself.
    let mut font = Vec::new();
    font.extend_from_slice(&flavor.to_be_bytes());
    font.extend_from_slice(&1u16.to_be_bytes()); // numTables
    font.extend_from_slice(&16u16.to_be_bytes()); // searchRange
    font.extend_from_slice(&0u16.to_be_bytes()); // entrySelector
    font.extend_from_slice(&0u16.to_be_bytes()); // rangeShift
    font.extend_from_slice(b"name");
    font.extend_from_slice(&0u32.to_be_bytes()); // checksum, not validated
    font.extend_from_slice(&28u32.to_be_bytes()); // offset past header + directory
    font.extend_from_slice(&(name_table.len() as u32).to_be_bytes());
    font.extend_from_slice(&name_table);
    font
}

/// Wrap an sfnt into a WOFF container. `compress` zlib-deflates each table;
/// otherwise tables are stored verbatim (compLength == origLength).
pub fn build_woff(sfnt: &[u8], compress: bool) -> Vec<u8> {
    let num_tables = u16::from_be_bytes([sfnt[4], sfnt[5]]) as usize;

    let mut entries: Vec<(Vec<u8>, Vec<u8>, usize, Vec<u8>)> = Vec::new();
    for i in 0..num_tables {
        let base = 12 + i * 16;
        let tag = sfnt[base..base + 4].to_vec();
        let checksum = sfnt[base + 4..base + 8].to_vec();
        let offset =
            u32::from_be_bytes(sfnt[base + 8..base + 12].try_into().unwrap()) as usize;
        let len = u32::from_be_bytes(sfnt[base + 12..base + 16].try_into().unwrap()) as usize;
        let table = &sfnt[offset..offset + len];

        let payload = if compress {
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(table).unwrap();
            encoder.finish().unwrap()
        } else {
            table.to_vec()
        };
        entries.push((tag, checksum, len, payload));
    }

    let dir_len = 44 + num_tables * 20;
    let mut woff = Vec::new();
    woff.extend_from_slice(b"wOFF");
    woff.extend_from_slice(&sfnt[0..4]); // flavor
    woff.extend_from_slice(&0u32.to_be_bytes()); // total length, fixed up below
    woff.extend_from_slice(&(num_tables as u16).to_be_bytes());
    woff.extend_from_slice(&0u16.to_be_bytes()); // reserved
    woff.extend_from_slice(&(sfnt.len() as u32).to_be_bytes()); // totalSfntSize
    woff.extend_from_slice(&[0u8; 24]); // version + meta/private blocks, unused

    let mut data_offset = dir_len;
    for (tag, checksum, orig_len, payload) in &entries {
        woff.extend_from_slice(tag);
        woff.extend_from_slice(&(data_offset as u32).to_be_bytes());
        woff.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        woff.extend_from_slice(&(*orig_len as u32).to_be_bytes());
        woff.extend_from_slice(checksum);
        data_offset += payload.len();
    }
    for (_, _, _, payload) in &entries {
        woff.extend_from_slice(payload);
    }

    let total = woff.len() as u32;
    woff[8..12].copy_from_slice(&total.to_be_bytes());
    woff
}
