//! Static knowledge base: ITR forms and tax-saving sections
//!
//! Loaded once at startup and never mutated. The built-in tables can be
//! replaced by a YAML file with the same shape:
//!
//! ```yaml
//! forms:
//!   ITR1: { name: "ITR-1 (Sahaj)", description: "...", applicable_for: [Salary], max_income: 5000000 }
//!   ITR2: { name: "ITR-2", description: "...", applicable_for: [] }
//!   ITR3: { name: "ITR-3", description: "...", applicable_for: [] }
//! tax_saving:
//!   - section: "80C"
//!     options:
//!       - { name: "PPF (Public Provident Fund)", max_limit: 150000 }
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::ConfigError;

/// ITR form identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItrForm {
    #[serde(rename = "ITR1")]
    Itr1,
    #[serde(rename = "ITR2")]
    Itr2,
    #[serde(rename = "ITR3")]
    Itr3,
}

impl ItrForm {
    pub fn id(&self) -> &'static str {
        match self {
            ItrForm::Itr1 => "ITR1",
            ItrForm::Itr2 => "ITR2",
            ItrForm::Itr3 => "ITR3",
        }
    }
}

impl std::fmt::Display for ItrForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Descriptive metadata for one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInfo {
    /// Display name (e.g., "ITR-1 (Sahaj)")
    pub name: String,
    pub description: String,
    /// Income categories the form covers
    #[serde(default)]
    pub applicable_for: Vec<String>,
    /// Total income ceiling in INR, if the form has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,
}

/// Metadata for every ITR form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormCatalog {
    #[serde(rename = "ITR1")]
    pub itr1: FormInfo,
    #[serde(rename = "ITR2")]
    pub itr2: FormInfo,
    #[serde(rename = "ITR3")]
    pub itr3: FormInfo,
}

impl FormCatalog {
    pub fn get(&self, form: ItrForm) -> &FormInfo {
        match form {
            ItrForm::Itr1 => &self.itr1,
            ItrForm::Itr2 => &self.itr2,
            ItrForm::Itr3 => &self.itr3,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItrForm, &FormInfo)> {
        [ItrForm::Itr1, ItrForm::Itr2, ItrForm::Itr3]
            .into_iter()
            .map(move |form| (form, self.get(form)))
    }
}

impl Default for FormCatalog {
    fn default() -> Self {
        Self {
            itr1: FormInfo {
                name: "ITR-1 (Sahaj)".to_string(),
                description: "For individuals having income from salary, one house property, \
                              other sources (interest etc.)"
                    .to_string(),
                applicable_for: strings(&["Salary", "House Property", "Other Sources"]),
                max_income: Some(5_000_000),
            },
            itr2: FormInfo {
                name: "ITR-2".to_string(),
                description: "For individuals and HUFs having income from capital gains, \
                              more than one house property"
                    .to_string(),
                applicable_for: strings(&[
                    "Salary",
                    "House Property",
                    "Capital Gains",
                    "Other Sources",
                ]),
                max_income: None,
            },
            itr3: FormInfo {
                name: "ITR-3".to_string(),
                description: "For individuals and HUFs having income from business or profession"
                    .to_string(),
                applicable_for: strings(&[
                    "Business/Profession",
                    "Salary",
                    "House Property",
                    "Capital Gains",
                    "Other Sources",
                ]),
                max_income: None,
            },
        }
    }
}

/// One investment option within a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSavingOption {
    pub name: String,
    /// Deduction cap in INR
    pub max_limit: u64,
}

impl TaxSavingOption {
    fn new(name: &str, max_limit: u64) -> Self {
        Self {
            name: name.to_string(),
            max_limit,
        }
    }

    /// Cap rendered in thousands, rounded half away from zero ("₹150K")
    pub fn limit_label(&self) -> String {
        let thousands = (self.max_limit as f64 / 1000.0).round() as u64;
        format!("₹{}K", thousands)
    }
}

/// A deduction section (e.g., 80C) and its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSavingSection {
    pub section: String,
    pub options: Vec<TaxSavingOption>,
}

/// Ordered tax-saving sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxSavingCatalog {
    pub sections: Vec<TaxSavingSection>,
}

impl Default for TaxSavingCatalog {
    fn default() -> Self {
        Self {
            sections: vec![
                TaxSavingSection {
                    section: "80C".to_string(),
                    options: vec![
                        TaxSavingOption::new("PPF (Public Provident Fund)", 150_000),
                        TaxSavingOption::new("ELSS (Equity Linked Saving Scheme)", 150_000),
                        TaxSavingOption::new("Life Insurance Premium", 150_000),
                    ],
                },
                TaxSavingSection {
                    section: "80D".to_string(),
                    options: vec![
                        TaxSavingOption::new("Health Insurance Premium", 25_000),
                        TaxSavingOption::new("Parents Health Insurance Premium", 50_000),
                    ],
                },
            ],
        }
    }
}

/// Forms and tax-saving tables together
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub forms: FormCatalog,
    #[serde(default)]
    pub tax_saving: TaxSavingCatalog,
}

static BUILTIN: Lazy<Arc<KnowledgeBase>> = Lazy::new(|| Arc::new(KnowledgeBase::default()));

impl KnowledgeBase {
    /// Shared built-in tables
    pub fn builtin() -> Arc<KnowledgeBase> {
        Arc::clone(&BUILTIN)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let kb: KnowledgeBase = serde_yaml::from_str(yaml)?;
        kb.validate()?;
        Ok(kb)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let kb = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            sections = kb.tax_saving.sections.len(),
            "Loaded knowledge base"
        );
        Ok(kb)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (form, info) in self.forms.iter() {
            if info.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("forms.{}.name", form),
                    message: "Form name must not be empty".to_string(),
                });
            }
        }

        for (idx, section) in self.tax_saving.sections.iter().enumerate() {
            if section.section.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("tax_saving[{}].section", idx),
                    message: "Section label must not be empty".to_string(),
                });
            }
            if section.options.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("tax_saving[{}].options", idx),
                    message: format!("Section {} has no options", section.section),
                });
            }
        }

        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_forms() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.forms.get(ItrForm::Itr1).name, "ITR-1 (Sahaj)");
        assert_eq!(kb.forms.get(ItrForm::Itr1).max_income, Some(5_000_000));
        assert_eq!(kb.forms.get(ItrForm::Itr3).name, "ITR-3");
        assert!(kb.forms.get(ItrForm::Itr2).max_income.is_none());
        assert!(kb.validate().is_ok());
    }

    #[test]
    fn test_builtin_tax_saving_order() {
        let kb = KnowledgeBase::builtin();
        let labels: Vec<_> = kb
            .tax_saving
            .sections
            .iter()
            .map(|s| s.section.as_str())
            .collect();
        assert_eq!(labels, vec!["80C", "80D"]);
        assert_eq!(kb.tax_saving.sections[0].options.len(), 3);
        assert_eq!(kb.tax_saving.sections[1].options[1].max_limit, 50_000);
    }

    #[test]
    fn test_limit_label_rounding() {
        assert_eq!(TaxSavingOption::new("a", 150_000).limit_label(), "₹150K");
        assert_eq!(TaxSavingOption::new("b", 25_000).limit_label(), "₹25K");
        assert_eq!(TaxSavingOption::new("c", 2_500).limit_label(), "₹3K");
        assert_eq!(TaxSavingOption::new("d", 499).limit_label(), "₹0K");
    }

    #[test]
    fn test_form_ids() {
        assert_eq!(ItrForm::Itr2.to_string(), "ITR2");
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
forms:
  ITR1: { name: "Form One", description: "one" }
  ITR2: { name: "Form Two", description: "two" }
  ITR3: { name: "Form Three", description: "three", applicable_for: [Business] }
tax_saving:
  - section: "80CCD(1B)"
    options:
      - { name: "NPS", max_limit: 50000 }
"#;
        let kb = KnowledgeBase::from_yaml_str(yaml).unwrap();
        assert_eq!(kb.forms.get(ItrForm::Itr3).applicable_for, vec!["Business"]);
        assert_eq!(kb.tax_saving.sections[0].section, "80CCD(1B)");
        assert_eq!(kb.tax_saving.sections[0].options[0].limit_label(), "₹50K");
    }

    #[test]
    fn test_yaml_missing_form_is_rejected() {
        let yaml = r#"
forms:
  ITR1: { name: "Form One", description: "one" }
"#;
        assert!(matches!(
            KnowledgeBase::from_yaml_str(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_yaml_empty_section_is_rejected() {
        let yaml = r#"
tax_saving:
  - section: "80C"
    options: []
"#;
        assert!(matches!(
            KnowledgeBase::from_yaml_str(yaml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tax_saving:\n  - section: \"80E\"\n    options:\n      - {{ name: \"Education Loan Interest\", max_limit: 100000 }}"
        )
        .unwrap();

        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.tax_saving.sections.len(), 1);
        // Forms fall back to the built-in table
        assert_eq!(kb.forms, FormCatalog::default());
    }

    #[test]
    fn test_shipped_catalog_matches_builtin() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/catalog.yaml");
        let kb = KnowledgeBase::load(path).unwrap();
        assert_eq!(kb, KnowledgeBase::default());
    }

    #[test]
    fn test_load_missing_file() {
        let result = KnowledgeBase::load("/definitely/not/here/catalog.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
