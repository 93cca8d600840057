use clap::{Parser, Subcommand};
use ruleforge::cli;
use ruleforge::error::RuleResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ruleforge")]
#[command(about = "Decision-table rules: extract, edit, regenerate, validate.")]
#[command(long_about = "Ruleforge - Spreadsheet decision tables as typed rule records

COMMANDS:
  extract   - Parse a decision table and print its rules as JSON
  inspect   - Show the CONDITION/ACTION layout a template resolves to
  write     - Regenerate a template's data rows from a JSON rule list
  validate  - Compile a decision table and report errors/warnings

EXAMPLES:
  ruleforge extract tables/discount.xlsx
  ruleforge inspect tables/discount.xlsx
  ruleforge write tables/discount.xlsx rules.json -o updated.xlsx
  ruleforge validate updated.xlsx --compiler drools-compile

The API server lives in the ruleforge-server binary.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a decision-table spreadsheet and print its rules as JSON
    Extract {
        /// Spreadsheet to read (.xls or .xlsx)
        file: PathBuf,
    },

    /// Show the decision-table layout a template resolves to
    Inspect {
        /// Template spreadsheet to scan
        file: PathBuf,
    },

    /// Regenerate a template's data rows from a JSON rule list
    Write {
        /// Template spreadsheet carrying the header rows and role markers
        template: PathBuf,

        /// JSON file with the rule records to write
        rules: PathBuf,

        /// Where to save the regenerated spreadsheet
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compile a decision table and report errors and warnings
    Validate {
        /// Spreadsheet to validate
        file: PathBuf,

        /// External decision-table compiler command line
        #[arg(short, long, env = "RULEFORGE_COMPILER", default_value = "drools-compile")]
        compiler: String,
    },
}

fn main() -> RuleResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file } => cli::extract(file),

        Commands::Inspect { file } => cli::inspect(file),

        Commands::Write {
            template,
            rules,
            output,
        } => cli::write(template, rules, output),

        Commands::Validate { file, compiler } => cli::validate(file, compiler),
    }
}
