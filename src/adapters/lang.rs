//! Language detection over the leading text of a document.

use crate::config::toml_config::DetectionSettings;
use whatlang::Lang;

/// ISO 639-1 code for the detector's language, where one exists.
pub fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Ita => "it",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Ell => "el",
        Lang::Pol => "pl",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Bel => "be",
        Lang::Bul => "bg",
        Lang::Mkd => "mk",
        Lang::Srp => "sr",
        Lang::Hrv => "hr",
        Lang::Slv => "sl",
        Lang::Slk => "sk",
        Lang::Ces => "cs",
        Lang::Hun => "hu",
        Lang::Fin => "fi",
        Lang::Est => "et",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "nb",
        Lang::Cat => "ca",
        Lang::Lat => "la",
        Lang::Epo => "eo",
        Lang::Afr => "af",
        Lang::Tur => "tr",
        Lang::Aze => "az",
        Lang::Kat => "ka",
        Lang::Hye => "hy",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Pes => "fa",
        Lang::Urd => "ur",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ind => "id",
        Lang::Tgl => "tl",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        _ => return None,
    };
    Some(code)
}

/// Detects the language of `text` from its first `sample_chars` characters.
///
/// Falls back to the configured default language when the trimmed sample is
/// shorter than `min_sample_chars`, when detection fails, or when the
/// detected language has no two-letter code.
pub fn detect_language(text: &str, settings: &DetectionSettings) -> String {
    let sample_end = text
        .char_indices()
        .nth(settings.sample_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let sample = text[..sample_end].trim();

    if sample.chars().count() < settings.min_sample_chars {
        tracing::debug!(
            "Sample too short for detection, using '{}'",
            settings.default_language
        );
        return settings.default_language.clone();
    }

    match whatlang::detect(sample) {
        Some(info) => match iso_639_1(info.lang()) {
            Some(code) => {
                tracing::debug!(
                    "Detected {} (confidence {:.2}, reliable: {})",
                    info.lang().eng_name(),
                    info.confidence(),
                    info.is_reliable()
                );
                code.to_string()
            }
            None => {
                tracing::debug!(
                    "No two-letter code for {}, using '{}'",
                    info.lang().eng_name(),
                    settings.default_language
                );
                settings.default_language.clone()
            }
        },
        None => {
            tracing::debug!(
                "Language detection failed, using '{}'",
                settings.default_language
            );
            settings.default_language.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITALIAN: &str = "La città di Firenze è famosa in tutto il mondo per i suoi musei, \
        le sue chiese e i suoi palazzi rinascimentali. Ogni anno milioni di turisti \
        visitano la Galleria degli Uffizi e il Duomo.";

    const ENGLISH: &str = "The city of Edinburgh is the capital of Scotland and is well known \
        for its castle, its festivals and the old town that stretches down the hill \
        towards the palace.";

    #[test]
    fn test_detects_italian_and_english() {
        let settings = DetectionSettings::default();
        assert_eq!(detect_language(ITALIAN, &settings), "it");
        assert_eq!(detect_language(ENGLISH, &settings), "en");
    }

    #[test]
    fn test_short_text_defaults() {
        let settings = DetectionSettings::default();
        assert_eq!(detect_language("   Roma e Milano   ", &settings), "en");
        assert_eq!(detect_language("", &settings), "en");
    }

    #[test]
    fn test_default_language_is_configurable() {
        let settings = DetectionSettings {
            default_language: "it".to_string(),
            ..DetectionSettings::default()
        };
        assert_eq!(detect_language("12345 67890", &settings), "it");
    }

    #[test]
    fn test_only_leading_sample_is_used() {
        let settings = DetectionSettings {
            sample_chars: ITALIAN.chars().count(),
            ..DetectionSettings::default()
        };
        // English after the sample window must not matter
        let text = format!("{} {} {}", ITALIAN, ENGLISH, ENGLISH);
        assert_eq!(detect_language(&text, &settings), "it");
    }

    #[test]
    fn test_non_text_sample_falls_back() {
        let settings = DetectionSettings::default();
        let digits = "0123456789 ".repeat(20);
        assert_eq!(detect_language(&digits, &settings), "en");
    }

    #[test]
    fn test_language_without_two_letter_code_falls_back() {
        // Tamil and Khmer scripts each belong to a single detector language,
        // neither of which has a mapping
        let tamil = "தமிழ் உலகின் மிகவும் பழமையான மொழிகளில் ஒன்றாகும், இது இந்தியா மற்றும் இலங்கையில் பேசப்படுகிறது.";
        let khmer = "ភាសាខ្មែរគឺជាភាសាផ្លូវការរបស់ប្រទេសកម្ពុជា ហើយត្រូវបាននិយាយដោយប្រជាជនរាប់លាននាក់នៅក្នុងតំបន់នេះ។";
        assert_eq!(whatlang::detect(tamil).map(|i| i.lang()), Some(Lang::Tam));
        assert_eq!(iso_639_1(Lang::Tam), None);
        assert_eq!(iso_639_1(Lang::Khm), None);

        let settings = DetectionSettings::default();
        assert_eq!(detect_language(tamil, &settings), "en");
        assert_eq!(detect_language(khmer, &settings), "en");

        let italian_default = DetectionSettings {
            default_language: "it".to_string(),
            ..DetectionSettings::default()
        };
        assert_eq!(detect_language(tamil, &italian_default), "it");
    }

    #[test]
    fn test_iso_mapping() {
        assert_eq!(iso_639_1(Lang::Ita), Some("it"));
        assert_eq!(iso_639_1(Lang::Ell), Some("el"));
        assert_eq!(iso_639_1(Lang::Jav), None);
    }
}
