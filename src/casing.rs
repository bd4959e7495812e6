// Case transfer from a matched trigger to its canonical expansion.

/// Renders `expansion` with case transferred from `abbreviation` as typed.
///
/// Rules, in order: a fully lowercase trigger transfers nothing; a fully
/// uppercase trigger longer than one character uppercases the whole
/// expansion; a trigger whose first character is uppercase capitalizes only
/// the expansion's first character. A single uppercase letter is initial-cap,
/// not all-caps, which is why the all-caps rule requires length > 1.
pub fn render_expansion(expansion: &str, abbreviation: &str) -> String {
    if abbreviation == abbreviation.to_lowercase() {
        return expansion.to_string();
    }
    if abbreviation.chars().count() > 1 && abbreviation == abbreviation.to_uppercase() {
        return expansion.to_uppercase();
    }
    let first: String = abbreviation.chars().take(1).collect();
    if first == first.to_uppercase() {
        let mut chars = expansion.chars();
        return match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    expansion.to_string()
}
