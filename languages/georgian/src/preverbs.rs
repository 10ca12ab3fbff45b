/// Georgian preverbs, simple and complex. Complex preverbs combine a simple
/// one with მო.
pub const PREVERBS: [&str; 16] = [
    "ა", "აღ", "გა", "გადა", "და", "მი", "შე", "წა", "ჩა", "ამო", "გამო", "გადმო", "მო", "შემო",
    "წამო", "ჩამო",
];

pub fn is_known_preverb(preverb: &str) -> bool {
    PREVERBS.contains(&preverb)
}

/// Preverbs in `available` that are not in the inventory
pub fn unknown_preverbs(available: &[String]) -> Vec<&str> {
    available
        .iter()
        .map(String::as_str)
        .filter(|p| !is_known_preverb(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_simple_and_complex_preverbs() {
        assert!(is_known_preverb("გა"));
        assert!(is_known_preverb("გადმო"));
        assert!(!is_known_preverb("xx"));
    }

    #[test]
    fn reports_unknown_preverbs() {
        let available = vec!["მი".to_string(), "xx".to_string()];
        assert_eq!(unknown_preverbs(&available), vec!["xx"]);
    }
}
