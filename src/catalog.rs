//! Static language catalog offered for translation.

/// A selectable target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Display name (e.g. "French").
    pub name: &'static str,
    /// Language code (e.g. "fr").
    pub code: &'static str,
}

impl Language {
    /// Creates a catalog entry.
    const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }
}

/// Every supported language, ordered by display name.
static LANGUAGES: &[Language] = &[
    Language::new("Afrikaans", "af"),
    Language::new("Albanian", "sq"),
    Language::new("Amharic", "am"),
    Language::new("Arabic", "ar"),
    Language::new("Armenian", "hy"),
    Language::new("Azerbaijani", "az"),
    Language::new("Basque", "eu"),
    Language::new("Belarusian", "be"),
    Language::new("Bengali", "bn"),
    Language::new("Bosnian", "bs"),
    Language::new("Bulgarian", "bg"),
    Language::new("Catalan", "ca"),
    Language::new("Chinese", "zh"),
    Language::new("Croatian", "hr"),
    Language::new("Czech", "cs"),
    Language::new("Danish", "da"),
    Language::new("Dutch", "nl"),
    Language::new("English", "en"),
    Language::new("Estonian", "et"),
    Language::new("Filipino", "tl"),
    Language::new("Finnish", "fi"),
    Language::new("French", "fr"),
    Language::new("Galician", "gl"),
    Language::new("Georgian", "ka"),
    Language::new("German", "de"),
    Language::new("Greek", "el"),
    Language::new("Gujarati", "gu"),
    Language::new("Hebrew", "he"),
    Language::new("Hindi", "hi"),
    Language::new("Hungarian", "hu"),
    Language::new("Icelandic", "is"),
    Language::new("Indonesian", "id"),
    Language::new("Irish", "ga"),
    Language::new("Italian", "it"),
    Language::new("Japanese", "ja"),
    Language::new("Kannada", "kn"),
    Language::new("Kazakh", "kk"),
    Language::new("Khmer", "km"),
    Language::new("Korean", "ko"),
    Language::new("Lao", "lo"),
    Language::new("Latvian", "lv"),
    Language::new("Lithuanian", "lt"),
    Language::new("Macedonian", "mk"),
    Language::new("Malay", "ms"),
    Language::new("Malayalam", "ml"),
    Language::new("Maltese", "mt"),
    Language::new("Maori", "mi"),
    Language::new("Marathi", "mr"),
    Language::new("Mongolian", "mn"),
    Language::new("Nepali", "ne"),
    Language::new("Norwegian", "no"),
    Language::new("Persian", "fa"),
    Language::new("Polish", "pl"),
    Language::new("Portuguese", "pt"),
    Language::new("Punjabi", "pa"),
    Language::new("Romanian", "ro"),
    Language::new("Russian", "ru"),
    Language::new("Serbian", "sr"),
    Language::new("Sinhala", "si"),
    Language::new("Slovak", "sk"),
    Language::new("Slovenian", "sl"),
    Language::new("Spanish", "es"),
    Language::new("Swahili", "sw"),
    Language::new("Swedish", "sv"),
    Language::new("Tamil", "ta"),
    Language::new("Telugu", "te"),
    Language::new("Thai", "th"),
    Language::new("Turkish", "tr"),
    Language::new("Ukrainian", "uk"),
    Language::new("Urdu", "ur"),
    Language::new("Uzbek", "uz"),
    Language::new("Vietnamese", "vi"),
    Language::new("Welsh", "cy"),
    Language::new("Xhosa", "xh"),
    Language::new("Yiddish", "yi"),
    Language::new("Yoruba", "yo"),
    Language::new("Zulu", "zu"),
];

/// Returns the full language catalog.
#[must_use]
pub fn languages() -> &'static [Language] {
    LANGUAGES
}

/// Finds the language with the given code.
#[must_use]
pub fn find_by_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|language| language.code == code)
}

/// Returns the display name for a language code.
#[must_use]
pub fn name_for_code(code: &str) -> Option<&'static str> {
    find_by_code(code).map(|language| language.name)
}

/// Returns the code for a display name (case-insensitive).
#[must_use]
pub fn code_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    LANGUAGES
        .iter()
        .find(|language| language.name.eq_ignore_ascii_case(name))
        .map(|language| language.code)
}

/// Resolves user input that may be either a code or a display name.
#[must_use]
pub fn resolve(code_or_name: &str) -> Option<&'static Language> {
    find_by_code(code_or_name.trim()).or_else(|| code_for_name(code_or_name).and_then(find_by_code))
}
