//! ITR form recommendation
//!
//! Rules, first match wins:
//! 1. Business income -> ITR-3
//! 2. Capital gains, or rental together with salary -> ITR-2
//! 3. Anything else (including an empty record) -> ITR-1

use serde::Serialize;
use taxmate_config::{FormCatalog, ItrForm, TaxSavingCatalog};
use taxmate_core::{IncomeRecord, IncomeSource};

/// Chosen form with the rendered explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub form: ItrForm,
    pub explanation: String,
}

/// Pick the form for a record
pub fn recommend_form(record: &IncomeRecord) -> ItrForm {
    if record.contains(IncomeSource::Business) {
        ItrForm::Itr3
    } else if record.contains(IncomeSource::CapitalGains)
        || (record.contains(IncomeSource::Rental) && record.contains(IncomeSource::Salary))
    {
        ItrForm::Itr2
    } else {
        ItrForm::Itr1
    }
}

/// Pick the form and render the explanation shown to the user
pub fn recommend(record: &IncomeRecord, forms: &FormCatalog) -> Recommendation {
    let form = recommend_form(record);
    let info = forms.get(form);

    let breakdown = record
        .iter()
        .map(|(source, band)| format!("• {}: {}", source.capitalized_key(), band))
        .collect::<Vec<_>>()
        .join("\n");

    let explanation = format!(
        "Based on your income details:\n\n{}\n\nI recommend filing {}.\n\n{}\n\n\
         Would you like to explore tax-saving investment options?",
        breakdown, info.name, info.description
    );

    Recommendation { form, explanation }
}

/// Render the tax-saving catalog
pub fn render_tax_saving(catalog: &TaxSavingCatalog) -> String {
    let sections = catalog
        .sections
        .iter()
        .map(|section| {
            let options = section
                .options
                .iter()
                .map(|opt| format!("• {} (Up to {})", opt.name, opt.limit_label()))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}:\n{}", section.section, options)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Here are some tax-saving investment options you can consider:\n\n{}\n\n\
         Would you like to start over and explore more options?",
        sections
    )
}
