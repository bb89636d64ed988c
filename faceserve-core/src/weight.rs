//! CSS font-weight inference from naming conventions

/// Canonical weight names, checked in declaration order.
pub const WEIGHT_NAMES: &[(&str, u16)] = &[
    ("thin", 100),
    ("extralight", 200),
    ("ultralight", 200),
    ("light", 300),
    ("book", 400),
    ("normal", 400),
    ("regular", 400),
    ("roman", 400),
    ("medium", 500),
    ("semibold", 600),
    ("demibold", 600),
    ("bold", 700),
    ("extrabold", 800),
    ("ultrabold", 800),
    ("black", 900),
    ("heavy", 900),
];

pub const REGULAR_WEIGHT: u16 = 400;

/// Determine or guess a font's CSS weight.
///
/// The subfamily name is usually authoritative, but some fonts encode their
/// weight only in the composed full name ("Acme Sans SemiBold" with a
/// subfamily of "Regular"), so the full name's trailing word is the
/// fallback. A trailing " italic" is ignored for the fallback check.
pub fn infer_weight(subfamily_name: &str, full_name: &str) -> u16 {
    let variant = subfamily_name.to_lowercase();
    if variant != "regular" {
        if let Some((_, weight)) = WEIGHT_NAMES.iter().find(|(name, _)| *name == variant) {
            return *weight;
        }
    }

    let full = full_name.to_lowercase();
    let full = full.strip_suffix(" italic").unwrap_or(&full);
    for (name, weight) in WEIGHT_NAMES {
        if let Some(head) = full.strip_suffix(name) {
            if head.ends_with(' ') {
                return *weight;
            }
        }
    }

    REGULAR_WEIGHT
}
