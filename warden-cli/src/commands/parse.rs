//! `warden parse` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use warden_core::types::{CheckProgram, ConfigurationModel, FailedHost, FailedSocket, MemUsage};

use crate::cli::FileArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
pub async fn execute(
    args: FileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;
    let parser = super::parser_from(&config)?;
    let source = args.file.display().to_string();

    info!(path = %source, "parsing control file");
    let text = super::read_control_file(&args.file).await?;
    let model = parser.parse(&source, &text)?;

    writer.render(&ModelReport { source, model })?;
    Ok(())
}

/// Parsed control file report.
#[derive(Serialize)]
pub struct ModelReport {
    /// Control file path
    pub source: String,
    /// Parsed checks
    pub model: ConfigurationModel,
}

impl Render for ModelReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Control file: {}", self.source.bold())?;
        writeln!(
            w,
            "  {} process checks, {} file checks",
            self.model.process_checks.len(),
            self.model.file_checks.len()
        )?;

        for check in &self.model.process_checks {
            writeln!(w)?;
            writeln!(w, "{}", check.to_string().cyan().bold())?;
            render_programs(w, &check.start_program, &check.stop_program)?;
            render_escalations(
                w,
                &check.failed_socket,
                &check.failed_host,
                &check.total_mem_checks,
            )?;
            render_relations(w, &check.group, &check.depends_on)?;
        }

        for check in &self.model.file_checks {
            writeln!(w)?;
            writeln!(w, "{}", check.to_string().cyan().bold())?;
            if !check.if_changed.is_empty() {
                field(
                    w,
                    "if changed",
                    &format!("{} then {}", check.if_changed, check.if_changed_action),
                )?;
            }
            render_programs(w, &check.start_program, &check.stop_program)?;
            render_escalations(
                w,
                &check.failed_socket,
                &check.failed_host,
                &check.total_mem_checks,
            )?;
            render_relations(w, &check.group, &check.depends_on)?;
        }

        Ok(())
    }
}

fn field(w: &mut dyn Write, label: &str, value: &str) -> std::io::Result<()> {
    writeln!(w, "  {:<14} {}", label, value)
}

fn render_programs(
    w: &mut dyn Write,
    start: &Option<CheckProgram>,
    stop: &Option<CheckProgram>,
) -> std::io::Result<()> {
    if let Some(program) = start {
        field(w, "start program", &program.to_string())?;
    }
    if let Some(program) = stop {
        field(w, "stop program", &program.to_string())?;
    }
    Ok(())
}

fn render_escalations(
    w: &mut dyn Write,
    socket: &Option<FailedSocket>,
    host: &Option<FailedHost>,
    memory: &[MemUsage],
) -> std::io::Result<()> {
    if let Some(socket) = socket {
        let target = format!("unixsocket {}", socket.socket_file);
        field(
            w,
            "if failed",
            &describe(&target, socket.timeout_seconds, socket.num_cycles, &socket.action),
        )?;
    }
    if let Some(host) = host {
        let mut target = Vec::new();
        for (keyword, value) in [
            ("host", &host.host),
            ("port", &host.port),
            ("protocol", &host.protocol),
        ] {
            if !value.is_empty() {
                target.push(format!("{keyword} {value}"));
            }
        }
        field(
            w,
            "if failed",
            &describe(&target.join(" "), host.timeout_seconds, host.num_cycles, &host.action),
        )?;
    }
    for usage in memory {
        field(w, "if", &usage.to_string())?;
    }
    Ok(())
}

fn render_relations(w: &mut dyn Write, group: &str, depends_on: &str) -> std::io::Result<()> {
    if !group.is_empty() {
        field(w, "group", group)?;
    }
    if !depends_on.is_empty() {
        field(w, "depends on", depends_on)?;
    }
    Ok(())
}

fn describe(target: &str, timeout: Option<u32>, cycles: Option<u32>, action: &str) -> String {
    let mut text = target.to_owned();
    if let Some(seconds) = timeout {
        text.push_str(&format!(" with timeout {seconds} seconds"));
    }
    if let Some(cycles) = cycles {
        text.push_str(&format!(" for {cycles} cycles"));
    }
    text.push_str(&format!(" then {action}"));
    text
}
