//! Deterministic repair of recurring OCR misreads.
//!
//! The recognizer output for scanned legal documents has a small and stable
//! set of misreads: symbol confusions (`|` for `1`, `No` for `№`), Latin
//! letters standing in for Cyrillic ones, and stray marks after section
//! numbers. They are repaired with a literal substitution table followed by
//! a few pattern rules. Both are order-sensitive: a later rule may touch text
//! produced by an earlier one.

use lazy_static::lazy_static;
use regex::Regex;

/// Literal substitutions, applied in order.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("|", "1"),
    ("No", "№"),
    ("СТ.", "ст."),
    ("Ne ", "№"),
    ("Nel,", "№ 1,"),
    ("5 »", "5»"),
    ("№ I", "№ 1"),
    ("5‘", "5.1"),
    ("BHOCATCA", "вносятся"),
    ("Российскои", "Российской"),
    ("OT ", "от "),
    ("oT ", "от "),
    ("а} ", "а) "),
    (" обюджетных ", " бюджетных "),
    ("aanHOH; с суб", "субсидий;\"."),
];

lazy_static! {
    /// Runs of two or more whitespace characters
    static ref RE_MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();

    /// Digit-adjacent stray marks rewritten into numbered suffixes, in order
    static ref NUMERAL_RULES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(\d+)'").unwrap(), "${1}.1"),
        (Regex::new(r"(\d+)!").unwrap(), "${1}.1"),
        (Regex::new(r"(\d+)°").unwrap(), "${1}.2"),
        (Regex::new(r"(№ \d+)\?").unwrap(), "${1}2"),
        (Regex::new(r"(\d+)\?").unwrap(), "${1}.2"),
    ];

    /// A single leading capital letter followed by `)` (mis-cased list marker)
    static ref RE_LEADING_MARKER: Regex = Regex::new(r"^([А-Я])\)").unwrap();
}

/// Correction passes allowed beyond one per character. Every pass that
/// changes the text removes at least one misread mark, so real inputs settle
/// after one or two.
const EXTRA_PASSES: usize = 16;

/// Repairs known OCR substitution errors in block text.
///
/// `normalize` is total and idempotent: corrections are repeated until the
/// text stops changing, so feeding the output back in is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize a block of recognized text.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::text::TextNormalizer;
    ///
    /// let normalizer = TextNormalizer::new();
    /// assert_eq!(normalizer.normalize("Статья |2'  текст"), "Статья 12.1 текст");
    /// ```
    pub fn normalize(&self, text: &str) -> String {
        let mut current = collapse_whitespace(text);
        let max_passes = current.chars().count() + EXTRA_PASSES;
        for _ in 0..max_passes {
            let next = collapse_whitespace(&Self::correct(&current));
            if next == current {
                return current;
            }
            current = next;
        }
        log::debug!("normalization did not settle after {} passes", max_passes);
        current
    }

    /// One pass of the substitution table and the pattern rules.
    fn correct(text: &str) -> String {
        let mut out = text.to_string();
        for (from, to) in REPLACEMENTS {
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
        for (pattern, replacement) in NUMERAL_RULES.iter() {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        RE_LEADING_MARKER
            .replace(&out, |caps: &regex::Captures| format!("{})", caps[1].to_lowercase()))
            .into_owned()
    }
}

/// Collapse every run of two or more whitespace characters into a single space.
///
/// # Examples
///
/// ```
/// use layout_oxide::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("a  b\n\nc d"), "a b c d");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    RE_MULTI_SPACE.replace_all(text, " ").into_owned()
}

/// Normalize text with the default normalizer.
pub fn normalize_text(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_confusions() {
        assert_eq!(normalize_text("пункт |"), "пункт 1");
        assert_eq!(normalize_text("No 5"), "№ 5");
        assert_eq!(normalize_text("Ne 7"), "№7");
    }

    #[test]
    fn test_later_rule_sees_earlier_output() {
        // "No" becomes "№" before the "№ I" rule runs.
        assert_eq!(normalize_text("No I"), "№ 1");
    }

    #[test]
    fn test_latin_lookalikes() {
        assert_eq!(normalize_text("BHOCATCA изменения"), "вносятся изменения");
        assert_eq!(normalize_text("OT 12 мая"), "от 12 мая");
        assert_eq!(normalize_text("Российскои Федерации"), "Российской Федерации");
    }

    #[test]
    fn test_numeral_suffixes() {
        assert_eq!(normalize_text("статья 5'"), "статья 5.1");
        assert_eq!(normalize_text("статья 5!"), "статья 5.1");
        assert_eq!(normalize_text("пункт 3°"), "пункт 3.2");
        assert_eq!(normalize_text("пункт 4?"), "пункт 4.2");
        assert_eq!(normalize_text("5‘ текст"), "5.1 текст");
    }

    #[test]
    fn test_numbered_sign_question_mark() {
        // The "№ N?" rule runs before the generic "N?" rule.
        assert_eq!(normalize_text("№ 4?"), "№ 42");
    }

    #[test]
    fn test_leading_list_marker() {
        assert_eq!(normalize_text("Б) второй пункт"), "б) второй пункт");
        // Only at the very start of the text.
        assert_eq!(normalize_text("см. Б) пункт"), "см. Б) пункт");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(collapse_whitespace("a   b"), "a b");
        assert_eq!(collapse_whitespace("a\n\tb"), "a b");
        assert_eq!(collapse_whitespace("a b"), "a b");
    }

    #[test]
    fn test_collapse_exposes_table_entry() {
        // "5  »" only matches the "5 »" entry once collapsed.
        let once = normalize_text("5  »");
        assert_eq!(once, "5»");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_chained_stray_marks_settle() {
        let once = normalize_text("5°'");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
    }
}
