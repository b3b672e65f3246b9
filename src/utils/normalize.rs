//! Normalización de nombres de geocercas
//!
//! Los vehículos reportan el paso actual como texto libre, así que la única
//! forma de correlacionarlos con los pasos de la ruta es comparar nombres
//! normalizados. Toda comparación de nombres pasa por aquí.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]").expect("regex válida");
}

/// Pasa a minúsculas y elimina todo lo que no sea `[a-z0-9]`.
///
/// "Caseta La Joya", "caseta-la-joya" y "CASETA LA JOYA" producen lo mismo.
/// Los caracteres acentuados se eliminan, no se transliteran.
pub fn normalize_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lowered = name.to_lowercase();
    NON_ALPHANUMERIC.replace_all(&lowered, "").into_owned()
}

/// Igual que [`normalize_name`], pero un nombre ausente normaliza a cadena vacía
pub fn normalize_optional(name: Option<&str>) -> String {
    name.map(normalize_name).unwrap_or_default()
}

/// Compara dos nombres con la regla de normalización
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_punctuation() {
        let expected = "casetalajoya";
        assert_eq!(normalize_name("Caseta La Joya"), expected);
        assert_eq!(normalize_name("caseta-la-joya"), expected);
        assert_eq!(normalize_name("CASETA LA JOYA"), expected);
        assert_eq!(normalize_name("LaJoya"), normalize_name("La Joya"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Planta Norte #2", "  P1 ", "Llegó a destino", "", "ÑANDÚ-42"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_strips_accented_code_points() {
        assert_eq!(normalize_name("Llegó"), "lleg");
        // acento como carácter combinante
        assert_eq!(normalize_name("Jo\u{301}ya"), "joya");
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), "");
        assert_eq!(normalize_optional(Some("P-1")), "p1");
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Patio 1", "patio1"));
        assert!(!names_match("Patio 1", "Patio 2"));
    }
}
