//! Templates command

use anyhow::Result;
use projwiz_core::config::WizardConfig;
use tabled::{settings::Style, Table, Tabled};

use crate::output;

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "REPOSITORY")]
    url: String,
}

pub fn run(config: &WizardConfig) -> Result<()> {
    if config.templates.is_empty() {
        output::info("No templates registered. Add one with 'projwiz config add-template'");
        return Ok(());
    }

    let rows: Vec<TemplateRow> = config
        .templates
        .iter()
        .map(|(name, url)| TemplateRow {
            name: name.clone(),
            url: url.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}
