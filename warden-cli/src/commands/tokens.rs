//! `warden tokens` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use warden_monitrc::{Token, TokenKind};

use crate::cli::FileArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `tokens` command.
pub async fn execute(
    args: FileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;
    let parser = super::parser_from(&config)?;
    let source = args.file.display().to_string();

    info!(path = %source, "scanning control file");
    let text = super::read_control_file(&args.file).await?;
    let tokens = parser.tokens(&source, &text)?;

    writer.render(&TokenReport { source, tokens })?;
    Ok(())
}

/// Token stream report.
#[derive(Serialize)]
pub struct TokenReport {
    /// Control file path
    pub source: String,
    /// Scanned tokens, ending with `eof`
    pub tokens: Vec<Token>,
}

impl Render for TokenReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Tokens: {} ({})", self.source.bold(), self.tokens.len())?;
        for (index, token) in self.tokens.iter().enumerate() {
            let kind = format!("{:<16}", token.kind.as_str());
            let kind = if token.kind.is_value() {
                kind.green()
            } else if token.kind == TokenKind::Eof {
                kind.dimmed()
            } else {
                kind.normal()
            };
            if token.text.is_empty() {
                writeln!(w, "{index:>5}  {kind}")?;
            } else {
                writeln!(w, "{index:>5}  {kind} {:?}", token.text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_token_report() {
        colored::control::set_override(false);
        let report = TokenReport {
            source: "monitrc".to_owned(),
            tokens: warden_monitrc::scan("monitrc", "check file conf path /etc/x").collect(),
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("Tokens: monitrc (5)"));
        assert!(output.contains("file-path"));
        assert!(output.contains("\"/etc/x\""));
        assert!(output.trim_end().ends_with("eof"));
    }

    #[test]
    fn test_token_report_json_uses_snake_case_kinds() {
        let report = TokenReport {
            source: "monitrc".to_owned(),
            tokens: vec![Token::new(TokenKind::CheckStart, "check")],
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["tokens"][0]["kind"], "check_start");
        assert_eq!(json["tokens"][0]["text"], "check");
    }
}
