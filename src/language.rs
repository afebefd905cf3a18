//! Display metadata for language identifiers, embedded at build time.

use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::sync::OnceLock;

static ASSET_DIR: Dir = include_dir!("src/assets");

/// The accent color used for languages without catalog metadata.
pub const DEFAULT_COLOR: (u8, u8, u8) = (78, 201, 176);

#[derive(Deserialize, Clone, Debug)]
pub struct LanguageMeta {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Deserialize, Debug)]
struct Catalog {
    languages: Vec<LanguageMeta>,
}

fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let file = ASSET_DIR
            .get_file("languages.json")
            .expect("language catalog not embedded");
        let text = file
            .contents_utf8()
            .expect("language catalog is not utf-8");
        serde_json::from_str(text).expect("language catalog does not parse")
    })
}

fn lookup(id: &str) -> Option<&'static LanguageMeta> {
    catalog().languages.iter().find(|meta| meta.id == id)
}

/// Human-readable name for a language id. Unknown ids are shown with the
/// first letter capitalized, as editors report them.
pub fn display_name(id: &str) -> String {
    match lookup(id) {
        Some(meta) => meta.name.clone(),
        None => {
            let mut chars = id.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

/// Bar color for a language id.
pub fn bar_color(id: &str) -> (u8, u8, u8) {
    lookup(id)
        .and_then(|meta| parse_hex_color(&meta.color))
        .unwrap_or(DEFAULT_COLOR)
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
