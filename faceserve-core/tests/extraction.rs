//! End-to-end extraction over synthesized font binaries

mod common;

use faceserve_core::extract::{descriptor_from_bytes, extract, ExtractError, FontFormat};

#[test]
fn ttf_names_come_from_the_name_table() {
    let data = common::build_ttf("Acme Sans", "SemiBold", "Acme Sans SemiBold");
    let descriptor = descriptor_from_bytes("/fonts/acme.ttf".as_ref(), &data).expect("extract");

    assert_eq!(descriptor.format, FontFormat::Ttf);
    assert_eq!(descriptor.family_name, "Acme Sans");
    assert_eq!(descriptor.subfamily_name, "SemiBold");
    assert_eq!(descriptor.full_name, "Acme Sans SemiBold");
    assert_eq!(descriptor.copyright, "Copyright Acme Type Foundry");
}

#[test]
fn otto_flavor_maps_to_otf() {
    let data = common::build_sfnt(
        u32::from_be_bytes(*b"OTTO"),
        &[(1, "Acme Serif"), (2, "Regular"), (4, "Acme Serif")],
    );
    let descriptor = descriptor_from_bytes("/fonts/acme.otf".as_ref(), &data).expect("extract");

    assert_eq!(descriptor.format, FontFormat::Otf);
    assert_eq!(descriptor.family_name, "Acme Serif");
    // Missing copyright is empty, never an error.
    assert_eq!(descriptor.copyright, "");
}

#[test]
fn format_comes_from_the_magic_not_the_extension() {
    // A TrueType binary dressed up with an .otf extension.
    let data = common::build_ttf("Acme Sans", "Regular", "Acme Sans");
    let descriptor =
        descriptor_from_bytes("/fonts/mislabeled.otf".as_ref(), &data).expect("extract");

    assert_eq!(descriptor.format, FontFormat::Ttf);
}

#[test]
fn woff_with_stored_tables_round_trips() {
    let sfnt = common::build_ttf("Acme Sans", "Bold", "Acme Sans Bold");
    let woff = common::build_woff(&sfnt, false);
    let descriptor = descriptor_from_bytes("/fonts/acme.woff".as_ref(), &woff).expect("extract");

    assert_eq!(descriptor.format, FontFormat::Woff);
    assert_eq!(descriptor.full_name, "Acme Sans Bold");
}

#[test]
fn woff_with_compressed_tables_round_trips() {
    let sfnt = common::build_ttf("Acme Sans", "Bold", "Acme Sans Bold");
    let woff = common::build_woff(&sfnt, true);
    let descriptor = descriptor_from_bytes("/fonts/acme.woff".as_ref(), &woff).expect("extract");

    assert_eq!(descriptor.format, FontFormat::Woff);
    assert_eq!(descriptor.family_name, "Acme Sans");
    assert_eq!(descriptor.subfamily_name, "Bold");
}

#[test]
fn extract_reads_from_disk() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("acme.ttf");
    std::fs::write(
        &path,
        common::build_ttf("Acme Sans", "SemiBold", "Acme Sans SemiBold"),
    )
    .expect("write fixture");

    let descriptor = extract(&path).expect("extract");
    assert_eq!(descriptor.full_name, "Acme Sans SemiBold");
}

#[test]
fn dotfiles_are_rejected_before_parsing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join(".acme.ttf");
    std::fs::write(&path, common::build_ttf("Acme Sans", "Regular", "Acme Sans"))
        .expect("write fixture");

    let err = extract(&path).unwrap_err();
    assert!(matches!(err, ExtractError::NotAFontFile(_)));
}

#[test]
fn garbage_bytes_are_a_parse_failure() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("broken.ttf");
    std::fs::write(&path, b"this is not a font at all").expect("write fixture");

    let err = extract(&path).unwrap_err();
    assert!(matches!(err, ExtractError::ParseFailure { .. }));
}
