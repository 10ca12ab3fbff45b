use unicode_normalization::UnicodeNormalization;
use zmna_core::preprocess::Preprocessor;

/// Georgian script normalization: NFC, Mtavruli capitals folded to
/// Mkhedruli, zero-width characters dropped.
pub struct GeorgianPreprocessor;

impl GeorgianPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeorgianPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_mtavruli(c: char) -> bool {
    matches!(c, '\u{1C90}'..='\u{1CBA}' | '\u{1CBD}'..='\u{1CBF}')
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

impl Preprocessor for GeorgianPreprocessor {
    fn process(&self, text: &str) -> String {
        let folded: String = text
            .nfc()
            .filter(|c| !is_zero_width(*c))
            .flat_map(|c| {
                if is_mtavruli(c) {
                    c.to_lowercase().collect::<Vec<_>>()
                } else {
                    vec![c]
                }
            })
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();

        folded.trim().to_string()
    }
}
