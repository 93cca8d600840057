use crate::compiler::{validate_decision_table, CommandCompiler};
use crate::error::{RuleError, RuleResult};
use crate::sheet::{read_sheet, SheetFormat};
use crate::table::{extract_rules, write_rules, TableLayout};
use crate::types::Rule;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Execute the extract command: spreadsheet in, rule records out as JSON.
pub fn extract(file: PathBuf) -> RuleResult<()> {
    println!("{}", "🔥 Ruleforge - Extracting rules".bold().green());
    println!("   File: {}\n", file.display());

    let format = SheetFormat::from_path(&file)?;
    let bytes = fs::read(&file)?;
    let rows = read_sheet(&bytes, format)?;
    let rules = extract_rules(&rows);

    println!(
        "   Found {} rules across {} rows",
        rules.len().to_string().bold(),
        rows.len()
    );
    println!("{}", serde_json::to_string_pretty(&rules)?);

    Ok(())
}

/// Execute the inspect command: show the decision-table layout the writer
/// would use.
pub fn inspect(file: PathBuf) -> RuleResult<()> {
    println!("{}", "🔍 Ruleforge - Inspecting template".bold().green());
    println!("   File: {}\n", file.display());

    let format = SheetFormat::from_path(&file)?;
    let bytes = fs::read(&file)?;
    let rows = read_sheet(&bytes, format)?;
    let layout = TableLayout::detect(&rows)?;

    println!("{}", "📋 Detected layout:".bold().cyan());
    match layout.condition_row {
        Some(row) => println!("   CONDITION marker at row {}", row.to_string().bold()),
        None => println!("   {}", "No CONDITION marker".yellow()),
    }
    match layout.action_row {
        Some(row) => println!("   ACTION marker at row {}", row.to_string().bold()),
        None => println!("   {}", "No ACTION marker".yellow()),
    }
    println!("   Data starts at row {}", layout.data_start_row.to_string().bold());
    println!(
        "   Condition columns: {}",
        layout.condition_labels.join(", ").cyan()
    );
    println!(
        "   Action columns: {}",
        layout.action_labels.join(", ").cyan()
    );

    Ok(())
}

/// Execute the write command: regenerate a template's data region from a
/// JSON rule list.
pub fn write(template: PathBuf, rules_file: PathBuf, output: PathBuf) -> RuleResult<()> {
    println!("{}", "🔥 Ruleforge - Writing rules".bold().green());
    println!("   Template: {}", template.display());
    println!("   Rules: {}", rules_file.display());
    println!("   Output: {}\n", output.display());

    let format = SheetFormat::from_path(&template)?;
    let template_bytes = fs::read(&template)?;
    let json = fs::read_to_string(&rules_file)?;
    let rules: Vec<Rule> = serde_json::from_str(&json)?;

    let out = write_rules(&template_bytes, format, &rules)?;
    fs::write(&output, out)?;

    println!(
        "{}",
        format!("✅ Wrote {} rules to {}", rules.len(), output.display())
            .bold()
            .green()
    );
    Ok(())
}

/// Execute the validate command: run the external compiler over a
/// spreadsheet and report errors and warnings.
pub fn validate(file: PathBuf, compiler_command: String) -> RuleResult<()> {
    println!("{}", "✅ Ruleforge - Validating decision table".bold().green());
    println!("   File: {}", file.display());
    println!("   Compiler: {}\n", compiler_command);

    let format = SheetFormat::from_path(&file)?;
    let bytes = fs::read(&file)?;
    let compiler = CommandCompiler::new(&compiler_command)?;
    let report = validate_decision_table(&compiler, &bytes, format);

    for warning in &report.warnings {
        println!("{}", format!("⚠️  {}", warning).yellow());
    }
    for error in &report.errors {
        println!("{}", format!("❌ {}", error).bold().red());
    }

    if report.valid {
        println!("{}", "✅ Decision table is valid".bold().green());
        Ok(())
    } else {
        Err(RuleError::Validation(format!(
            "{} error(s) reported by the decision table compiler",
            report.errors.len()
        )))
    }
}
