//! Busca de produtos por nome ou código
//!
//! A comparação ignora acentos e maiúsculas: "cafe" encontra "Café Premium".

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::types::Product;

/// Remove acentos, converte para lowercase e colapsa espaços
/// usando NFKD (Normalization Form Compatibility Decomposition)
///
/// # Exemplos
/// ```
/// use pipeline_client::search::normalize_term;
///
/// assert_eq!(normalize_term("  Café   Premium "), "cafe premium");
/// assert_eq!(normalize_term("SKU-001"), "sku-001");
/// ```
pub fn normalize_term(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Verifica se o termo aparece no nome ou no código do produto
pub fn matches_product(name: &str, code: Option<&str>, query: &str) -> bool {
    let query = normalize_term(query);
    if query.is_empty() {
        return true;
    }

    normalize_term(name).contains(&query)
        || code.map_or(false, |c| normalize_term(c).contains(&query))
}

/// Filtra o catálogo mantendo a ordem original
pub fn filter_products<'a>(catalog: &'a [Product], query: &str) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| matches_product(&p.name, p.code.as_deref(), query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, code: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            code: code.map(str::to_string),
            price: 0.0,
        }
    }

    #[test]
    fn test_matches_name_case_and_accent_insensitive() {
        assert!(matches_product("Café Premium", None, "CAFE"));
        assert!(matches_product("Consultoria Básica", None, "basica"));
        assert!(!matches_product("Consultoria", None, "licença"));
    }

    #[test]
    fn test_matches_code() {
        assert!(matches_product("Plano Pro", Some("PRO-12"), "pro-1"));
        assert!(!matches_product("Plano Pro", None, "pro-1"));
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let catalog = vec![product("1", "A", None), product("2", "B", Some("X"))];
        assert_eq!(filter_products(&catalog, "   ").len(), 2);
    }

    #[test]
    fn test_filter_keeps_catalog_order() {
        let catalog = vec![
            product("1", "Licença Anual", Some("LIC-A")),
            product("2", "Suporte", Some("SUP")),
            product("3", "Licença Mensal", Some("LIC-M")),
        ];

        let found: Vec<_> = filter_products(&catalog, "licenca")
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(found, vec!["1", "3"]);
    }
}
