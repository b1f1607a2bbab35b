//! Header canonicalization shared by the year sheets and the gender sheet.

/// Canonicalizes a raw header cell.
///
/// Trims surrounding whitespace, lowercases, folds the Spanish accented
/// vowels and `ñ` to plain Latin letters and turns each space into `_`.
/// `" Estación "` becomes `"estacion"`, `"Número de Robos"` becomes
/// `"numero_de_robos"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            ' ' => '_',
            other => other,
        })
        .collect()
}
