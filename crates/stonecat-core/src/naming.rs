//! Name derivation shared by the media uploader and the product importer.
//!
//! Media records are joined to products through their alt text, so both sides
//! must derive it from the same rules.

use std::path::Path;

const ALT_TEXT_PREFIX: &str = "This is the picture of ";

/// Derives the display name of a stone from an image file name.
///
/// `Carrara_Marble.png` becomes `Carrara Marble`.
#[must_use]
pub fn stone_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    normalize_stone_name(stem)
}

/// Replaces `_` and `-` with spaces, collapses whitespace and capitalizes
/// each word. Applying it to its own output returns the same string.
#[must_use]
pub fn normalize_stone_name(raw: &str) -> String {
    let spaced = raw.replace(['_', '-'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// The alt text stored on a media record and searched for by product name.
#[must_use]
pub fn alt_text(stone_name: &str) -> String {
    format!("{ALT_TEXT_PREFIX}{stone_name}")
}

// First letter of every alphabetic run upper-case, the rest lower-case.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stone_name_strips_extension_and_separators() {
        assert_eq!(stone_name("Carrara_Marble.png"), "Carrara Marble");
        assert_eq!(stone_name("absolute-black-granite.PNG"), "Absolute Black Granite");
    }

    #[test]
    fn stone_name_capitalizes_each_word() {
        assert_eq!(stone_name("BLUE_PEARL.png"), "Blue Pearl");
        assert_eq!(stone_name("verde guatemala.png"), "Verde Guatemala");
    }

    #[test]
    fn stone_name_collapses_repeated_separators() {
        assert_eq!(stone_name("__Nero--Marquina_.png"), "Nero Marquina");
    }

    #[test]
    fn stone_name_keeps_inner_dots_of_multi_dot_names() {
        assert_eq!(stone_name("st.laurent_marble.png"), "St.Laurent Marble");
    }

    #[test]
    fn stone_name_without_extension() {
        assert_eq!(stone_name("Calacatta_Gold"), "Calacatta Gold");
    }

    #[test]
    fn title_case_restarts_after_non_letters() {
        assert_eq!(normalize_stone_name("o'neil 3d marble"), "O'Neil 3D Marble");
    }

    #[test]
    fn normalization_is_idempotent_and_separator_free() {
        let inputs = [
            "Carrara_Marble",
            "absolute-black-granite",
            "  __weird -- name__ ",
            "o'neil_3d",
            "ÉTOILE_bleue",
            "",
            "-",
            "already Clean",
        ];
        for input in inputs {
            let once = normalize_stone_name(input);
            let twice = normalize_stone_name(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
            assert!(!once.contains('_'), "underscore left in {once:?}");
            assert!(!once.contains('-'), "hyphen left in {once:?}");
        }
    }

    #[test]
    fn alt_text_embeds_stone_name() {
        assert_eq!(
            alt_text(&stone_name("Carrara_Marble.png")),
            "This is the picture of Carrara Marble"
        );
    }
}
