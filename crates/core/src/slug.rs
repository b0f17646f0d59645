//! Slug policy: turning note titles into URL-safe identifiers.
//!
//! Derivation transliterates Cyrillic (and folds common Latin diacritics) to
//! ASCII, lowercases, and collapses every run of whitespace or punctuation
//! into a single hyphen. Uniqueness is not checked here; the store enforces
//! it and the note service turns a collision into [`duplicate_slug_message`].

use std::sync::LazyLock;

use regex::Regex;

/// Maximum slug length in characters (matches the `notes.slug` column).
pub const MAX_SLUG_LENGTH: usize = 100;

/// Suffix appended to a colliding slug in the validation message.
pub const DEFAULT_WARNING_SUFFIX: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error(
        "Enter a valid slug consisting of lowercase Latin letters, numbers or hyphens \
         (at most {MAX_SLUG_LENGTH} characters)."
    )]
    Invalid,

    #[error("Could not build an address from the title; please enter a slug.")]
    Underivable,
}

/// Pick the slug for a note.
///
/// A non-empty `explicit` slug is validated and returned unchanged; otherwise
/// the slug is derived from `title`.
pub fn resolve_slug(title: &str, explicit: Option<&str>) -> Result<String, SlugError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            if is_valid_slug(slug) {
                Ok(slug.to_string())
            } else {
                Err(SlugError::Invalid)
            }
        }
        None => {
            let derived = slugify(title);
            if derived.is_empty() {
                Err(SlugError::Underivable)
            } else {
                Ok(derived)
            }
        }
    }
}

/// Whether `slug` is acceptable as an explicit, user-supplied slug.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.chars().count() <= MAX_SLUG_LENGTH && SLUG_PATTERN.is_match(slug)
}

/// Derive a slug from free text.
///
/// ```
/// use yanote_core::slug::slugify;
///
/// assert_eq!(slugify("Новый текст"), "novyj-tekst");
/// assert_eq!(slugify("  Hello, World!  "), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in transliterate(text).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.len() > MAX_SLUG_LENGTH {
        // Output is pure ASCII, so byte truncation is char-safe.
        out.truncate(MAX_SLUG_LENGTH);
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// Transliterate Cyrillic letters and fold Latin diacritics to ASCII.
///
/// Characters with no mapping are passed through unchanged, so callers
/// decide what to do with them. Hard and soft signs vanish.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match latin_for(lower) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

fn latin_for(c: char) -> Option<&'static str> {
    let latin = match c {
        // Russian
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian / Belarusian
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        'ў' => "u",
        // Latin diacritics
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'č' | 'ć' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ł' => "l",
        'ñ' | 'ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ß' => "ss",
        'š' | 'ś' => "s",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        _ => return None,
    };
    Some(latin)
}

/// Validation message for a slug that is already taken.
pub fn duplicate_slug_message(slug: &str, warning_suffix: &str) -> String {
    format!("{slug}{warning_suffix}")
}
