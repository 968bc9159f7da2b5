//! Diálogo de captura de venda
//!
//! Aberto quando um cliente é arrastado para a etapa de fechamento. Guarda
//! os campos exatamente como digitados e só libera a confirmação depois da
//! validação por campo. Erros ficam no próprio diálogo, que permanece aberto.

use crate::search::filter_products;
use crate::types::{Product, SaleData};

/// Erros de validação exibidos ao lado de cada campo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub product: Option<String>,
    pub quantity: Option<String>,
    pub sale_value: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.product.is_none() && self.quantity.is_none() && self.sale_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleDialog {
    catalog: Vec<Product>,
    query: String,
    selected: Option<Product>,
    quantity: String,
    sale_value: String,
    notes: String,
    errors: FieldErrors,
}

impl SaleDialog {
    /// Abre o diálogo vazio; quantidade começa em 1
    pub fn open(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            query: String::new(),
            selected: None,
            quantity: "1".to_string(),
            sale_value: String::new(),
            notes: String::new(),
            errors: FieldErrors::default(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Produtos visíveis para o termo de busca atual
    pub fn visible_products(&self) -> Vec<&Product> {
        filter_products(&self.catalog, &self.query)
    }

    /// Seleciona um produto do catálogo pelo id; retorna false se não existir
    pub fn select_product(&mut self, product_id: &str) -> bool {
        match self.catalog.iter().find(|p| p.id == product_id) {
            Some(product) => {
                self.selected = Some(product.clone());
                self.errors.product = None;
                true
            }
            None => false,
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn set_quantity(&mut self, quantity: impl Into<String>) {
        self.quantity = quantity.into();
    }

    pub fn set_sale_value(&mut self, value: impl Into<String>) {
        self.sale_value = value.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Valida todos os campos e monta o payload de venda
    pub fn confirm(&mut self) -> Result<SaleData, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.selected.is_none() {
            errors.product = Some("Selecione um produto".to_string());
        }

        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(q) if q >= 1 => Some(q),
            _ => {
                errors.quantity = Some("Quantidade deve ser um número inteiro maior ou igual a 1".to_string());
                None
            }
        };

        let sale_value = match parse_money(&self.sale_value) {
            Some(v) if v > 0.0 => Some(v),
            _ => {
                errors.sale_value = Some("Valor da venda deve ser maior que zero".to_string());
                None
            }
        };

        self.errors = errors.clone();

        match (&self.selected, quantity, sale_value) {
            (Some(product), Some(quantity), Some(sale_value)) => {
                let notes = self.notes.trim();
                Ok(SaleData {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity,
                    sale_value,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                })
            }
            _ => {
                tracing::debug!("Diálogo de venda com erros: {:?}", errors);
                Err(errors)
            }
        }
    }
}

/// Aceita "500", "500.5", "500,50" e "1.234,56"
pub fn parse_money(input: &str) -> Option<f64> {
    let raw = input.trim().trim_start_matches("R$").trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: "P1".to_string(),
                name: "Plano Pro".to_string(),
                code: Some("PRO".to_string()),
                price: 250.0,
            },
            Product {
                id: "P2".to_string(),
                name: "Consultoria Técnica".to_string(),
                code: None,
                price: 900.0,
            },
        ]
    }

    #[test]
    fn test_open_defaults() {
        let dialog = SaleDialog::open(catalog());
        assert!(dialog.selected_product().is_none());
        assert_eq!(dialog.quantity, "1");
        assert!(dialog.errors().is_empty());
        assert_eq!(dialog.visible_products().len(), 2);
    }

    #[test]
    fn test_search_filters_catalog() {
        let mut dialog = SaleDialog::open(catalog());
        dialog.set_query("tecnica");
        let visible: Vec<_> = dialog.visible_products().iter().map(|p| p.id.clone()).collect();
        assert_eq!(visible, vec!["P2"]);
    }

    #[test]
    fn test_confirm_valid_sale() {
        let mut dialog = SaleDialog::open(catalog());
        assert!(dialog.select_product("P1"));
        dialog.set_quantity("2");
        dialog.set_sale_value("500");
        dialog.set_notes("  pagamento à vista ");

        let sale = dialog.confirm().unwrap();
        assert_eq!(sale.product_id, "P1");
        assert_eq!(sale.product_name, "Plano Pro");
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.sale_value, 500.0);
        assert_eq!(sale.notes.as_deref(), Some("pagamento à vista"));
    }

    #[test]
    fn test_confirm_rejects_zero_quantity_and_value() {
        let mut dialog = SaleDialog::open(catalog());
        dialog.select_product("P1");
        dialog.set_quantity("0");
        dialog.set_sale_value("0");

        let errors = dialog.confirm().unwrap_err();
        assert!(errors.product.is_none());
        assert!(errors.quantity.is_some());
        assert!(errors.sale_value.is_some());
        assert_eq!(dialog.errors(), &errors);
    }

    #[test]
    fn test_confirm_requires_product() {
        let mut dialog = SaleDialog::open(catalog());
        dialog.set_sale_value("100");

        let errors = dialog.confirm().unwrap_err();
        assert!(errors.product.is_some());
        assert!(errors.quantity.is_none());
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let mut dialog = SaleDialog::open(catalog());
        dialog.select_product("P2");
        dialog.set_quantity("1.5");
        dialog.set_sale_value("10");

        assert!(dialog.confirm().unwrap_err().quantity.is_some());
    }

    #[test]
    fn test_unknown_product_not_selected() {
        let mut dialog = SaleDialog::open(catalog());
        assert!(!dialog.select_product("P9"));
        assert!(dialog.selected_product().is_none());
    }

    #[test]
    fn test_parse_money_formats() {
        assert_eq!(parse_money("500"), Some(500.0));
        assert_eq!(parse_money("500,50"), Some(500.5));
        assert_eq!(parse_money("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("-3"), Some(-3.0));
    }
}
