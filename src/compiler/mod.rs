//! Format validation through the decision-table compiler
//!
//! The compiler itself is a black box behind [`DecisionTableCompiler`]; the
//! production implementation shells out to a configured command, feeding the
//! spreadsheet over stdin and reading rule-language source from stdout.
//! Validation classifies the outcome into errors (block publishing) and
//! warnings (do not).

use crate::error::{RuleError, RuleResult};
use crate::sheet::SheetFormat;
use crate::types::ValidationReport;
use std::io::Write;
use std::process::{Command, Stdio};

/// Token that marks a rule definition in compiled output.
const RULE_KEYWORD: &str = "rule ";

/// Transforms a decision-table spreadsheet into rule-language source text.
pub trait DecisionTableCompiler: Send + Sync {
    fn compile(&self, sheet: &[u8], format: SheetFormat) -> RuleResult<String>;
}

/// External compiler invoked as a subprocess.
///
/// The spreadsheet goes in on stdin, the format tag is appended as the last
/// argument, compiled source comes back on stdout. Non-zero exit reports
/// stderr as the failure cause.
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    /// Build from a whitespace-separated command line, e.g.
    /// `"drools-compile --strict"`.
    pub fn new(command_line: &str) -> RuleResult<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| RuleError::Compiler("compiler command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl DecisionTableCompiler for CommandCompiler {
    fn compile(&self, sheet: &[u8], format: SheetFormat) -> RuleResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(format.extension())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RuleError::Compiler(format!("failed to start '{}': {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(sheet)
                .map_err(|e| RuleError::Compiler(format!("failed to send spreadsheet: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| RuleError::Compiler(format!("failed to read output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RuleError::Compiler(format!(
                "'{}' exited with {:?}: {}",
                self.program,
                output.status.code(),
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run the compiler over a regenerated spreadsheet and classify the result.
///
/// `valid` is true iff the error list is empty; suspicious-but-parseable
/// output (no rule definitions) only warns.
pub fn validate_decision_table(
    compiler: &dyn DecisionTableCompiler,
    sheet: &[u8],
    format: SheetFormat,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match compiler.compile(sheet, format) {
        Ok(source) => {
            if source.is_empty() {
                errors.push("compiler produced no output".to_string());
            } else if !source.contains(RULE_KEYWORD) {
                warnings.push("no rule definitions found in compiled output".to_string());
            }
        }
        Err(e) => errors.push(format!("decision table compilation failed: {}", e)),
    }

    ValidationReport::new(errors, warnings)
}
