use unicode_normalization::UnicodeNormalization;

/// Normalization applied to typed Georgian text before it is stored.
pub trait Preprocessor: Send + Sync {
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Canonical composition; compatibility folding would alter Georgian
        // punctuation
        let text: String = text.nfc().collect();

        text.replace(['\n', '\r'], " ").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
