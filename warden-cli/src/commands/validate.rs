//! `warden validate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::FileArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `validate` command.
///
/// Renders a report in both outcomes and returns `CliError::Parse`
/// when the control file is invalid.
pub async fn execute(
    args: FileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;
    let parser = super::parser_from(&config)?;
    let source = args.file.display().to_string();

    info!(path = %source, "validating control file");
    let text = super::read_control_file(&args.file).await?;

    let report = match parser.parse(&source, &text) {
        Ok(model) => ValidationReport {
            source,
            valid: true,
            process_checks: model.process_checks.len(),
            file_checks: model.file_checks.len(),
            errors: Vec::new(),
        },
        Err(e) => ValidationReport {
            source,
            valid: false,
            process_checks: 0,
            file_checks: 0,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Parse("control file is invalid".to_owned()));
    }

    Ok(())
}

/// Control file validation report.
#[derive(Serialize)]
pub struct ValidationReport {
    /// Control file path
    pub source: String,
    /// Whether the control file parsed
    pub valid: bool,
    /// Number of process checks (0 if invalid)
    pub process_checks: usize,
    /// Number of file checks (0 if invalid)
    pub file_checks: usize,
    /// Error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Control File Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            writeln!(
                w,
                "  Checks: {} process, {} file",
                self.process_checks, self.file_checks
            )?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(report: &ValidationReport) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_render_valid_report() {
        let output = render(&ValidationReport {
            source: "monitrc".to_owned(),
            valid: true,
            process_checks: 2,
            file_checks: 1,
            errors: Vec::new(),
        });
        assert!(output.contains("VALID"));
        assert!(output.contains("2 process, 1 file"));
    }

    #[test]
    fn test_render_invalid_report() {
        let output = render(&ValidationReport {
            source: "monitrc".to_owned(),
            valid: false,
            process_checks: 0,
            file_checks: 0,
            errors: vec!["lexical error: monitrc:1: check file <path> missing".to_owned()],
        });
        assert!(output.contains("INVALID"));
        assert!(output.contains("check file <path> missing"));
    }
}
