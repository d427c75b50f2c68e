//! Ledger configuration snapshot
//!
//! The settings screen owns this data; the engine only ever reads it through
//! a shared reference. Field names follow the stored JSON shape (camelCase).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// Base currency, currencies, exchange rates and category layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Currency every KPI and budget is expressed in
    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// Currencies offered for entry
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,

    /// Locale used for number formatting by the rendering layer
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Global fallback rate per currency (units of base per unit)
    #[serde(default = "default_rates_to_base")]
    pub rates_to_base: BTreeMap<String, f64>,

    /// Per-month rates keyed by `YYYY-MM`, overriding `rates_to_base`
    #[serde(default)]
    pub rates_by_month: BTreeMap<String, BTreeMap<String, f64>>,

    #[serde(default = "default_expense_categories")]
    pub expense_categories: Vec<String>,

    #[serde(default = "default_income_categories")]
    pub income_categories: Vec<String>,

    /// Payment-source labels marking income as money returned to the user
    #[serde(default = "default_reentry_categories")]
    pub reentry_categories: Vec<String>,

    #[serde(default = "default_expense_groups")]
    pub expense_groups: Vec<String>,

    /// Expense category name to group name
    #[serde(default)]
    pub expense_category_groups: BTreeMap<String, String>,
}

fn default_base_currency() -> String {
    "ARS".to_string()
}

fn default_currencies() -> Vec<String> {
    to_strings(&["ARS", "USD", "EUR"])
}

fn default_locale() -> String {
    "es-AR".to_string()
}

fn default_rates_to_base() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("ARS".to_string(), 1.0),
        ("USD".to_string(), 1050.0),
        ("EUR".to_string(), 1150.0),
    ])
}

fn default_expense_categories() -> Vec<String> {
    to_strings(&[
        "Comida",
        "Transporte",
        "Salud",
        "Hogar",
        "Servicios",
        "Educación",
        "Ocio",
        "Impuestos",
        "Ropa",
        "Trabajo",
        "Otros",
    ])
}

fn default_income_categories() -> Vec<String> {
    to_strings(&[
        "Salario",
        "Honorarios",
        "Reembolso",
        "Inversiones",
        "Ventas",
        "Otros ingresos",
    ])
}

fn default_reentry_categories() -> Vec<String> {
    to_strings(&["Reintegro"])
}

fn default_expense_groups() -> Vec<String> {
    to_strings(&["Esenciales", "Finanzas", "Estilo de vida", "Trabajo"])
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            currencies: default_currencies(),
            locale: default_locale(),
            rates_to_base: default_rates_to_base(),
            rates_by_month: BTreeMap::new(),
            expense_categories: default_expense_categories(),
            income_categories: default_income_categories(),
            reentry_categories: default_reentry_categories(),
            expense_groups: default_expense_groups(),
            expense_category_groups: BTreeMap::new(),
        }
    }
}

impl LedgerConfig {
    /// A config with the given base currency and no rates besides identity
    pub fn with_base_currency(base_currency: impl Into<String>) -> Self {
        let base_currency = base_currency.into();
        Self {
            currencies: vec![base_currency.clone()],
            rates_to_base: BTreeMap::from([(base_currency.clone(), 1.0)]),
            base_currency,
            ..Self::default()
        }
    }

    /// The group a category is assigned to, if any
    pub fn group_of(&self, category: &str) -> Option<&str> {
        self.expense_category_groups
            .get(category)
            .map(String::as_str)
            .filter(|group| !group.trim().is_empty())
    }

    /// Check whether a payment source is one of the reentry labels
    pub fn is_reentry_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        self.reentry_categories
            .iter()
            .any(|r| r.trim().to_lowercase() == label)
    }

    /// Fill in missing fallback rates and pin the base currency to 1
    ///
    /// Applied once when a snapshot is loaded; the engine never calls it.
    pub fn sanitized(mut self) -> Self {
        for currency in &self.currencies {
            let rate = self.rates_to_base.entry(currency.clone()).or_insert(1.0);
            if !rate.is_finite() || *rate <= 0.0 {
                *rate = 1.0;
            }
        }
        self.rates_to_base.insert(self.base_currency.clone(), 1.0);
        if !self.currencies.contains(&self.base_currency) {
            self.currencies.insert(0, self.base_currency.clone());
        }
        self
    }

    /// Load the config from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let config_path = paths.config_file();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read config file: {}", e)))?;

            let config: LedgerConfig = serde_json::from_str(&contents)
                .map_err(|e| LedgerError::Config(format!("Failed to parse config file: {}", e)))?;

            Ok(config.sanitized())
        } else {
            Ok(LedgerConfig::default())
        }
    }

    /// Save the config to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(paths.config_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.base_currency, "ARS");
        assert_eq!(config.rates_to_base.get("USD"), Some(&1050.0));
        assert!(config.expense_categories.contains(&"Comida".to_string()));
    }

    #[test]
    fn test_partial_json_gets_defaults() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"baseCurrency":"USD","ratesByMonth":{"2026-02":{"EUR":1.08}}}"#)
                .unwrap();
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.rates_by_month["2026-02"]["EUR"], 1.08);
        assert_eq!(config.locale, "es-AR");
    }

    #[test]
    fn test_sanitized_pins_base_and_fills_missing_rates() {
        let mut config = LedgerConfig::default();
        config.currencies.push("COP".into());
        config.rates_to_base.insert("ARS".into(), 7.0);
        config.rates_to_base.insert("EUR".into(), -3.0);

        let config = config.sanitized();
        assert_eq!(config.rates_to_base["ARS"], 1.0);
        assert_eq!(config.rates_to_base["COP"], 1.0);
        assert_eq!(config.rates_to_base["EUR"], 1.0);
    }

    #[test]
    fn test_group_lookup_ignores_blank_groups() {
        let mut config = LedgerConfig::default();
        config
            .expense_category_groups
            .insert("Comida".into(), "Esenciales".into());
        config.expense_category_groups.insert("Ocio".into(), " ".into());

        assert_eq!(config.group_of("Comida"), Some("Esenciales"));
        assert_eq!(config.group_of("Ocio"), None);
        assert_eq!(config.group_of("Ropa"), None);
    }

    #[test]
    fn test_reentry_label_is_case_insensitive() {
        let config = LedgerConfig::default();
        assert!(config.is_reentry_label("reintegro"));
        assert!(config.is_reentry_label(" REINTEGRO "));
        assert!(!config.is_reentry_label("Transferencia"));

        let mut config = LedgerConfig::default();
        config.reentry_categories = vec!["Devolución".into()];
        assert!(config.is_reentry_label("DEVOLUCIÓN"));
        assert!(config.is_reentry_label("devolución"));
        assert!(!config.is_reentry_label("devolucion"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut config = LedgerConfig::with_base_currency("USD");
        config.rates_to_base.insert("EUR".into(), 1.1);
        config.save(&paths).unwrap();

        let loaded = LedgerConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded.base_currency, "USD");
        assert_eq!(loaded.rates_to_base["EUR"], 1.1);
    }
}
