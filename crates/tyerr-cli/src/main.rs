//! Developer harness around the pipeline orchestrator. Not a transport: it
//! runs exactly one request per process invocation and prints the result.

mod args;

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use args::{CliArgs, Format};
use tyerr::{InventoryOptions, PipelineInput, PipelineOutput};

fn init_tracing(log_level: &str) {
    let filter = std::env::var("RUST_LOG").map(EnvFilter::new).unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_tree::HierarchicalLayer::new(2).with_indent_lines(true))
        .init();
}

fn read_input(args: &CliArgs) -> anyhow::Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading `{}`", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn render(output: &PipelineOutput, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string(output)?,
        Format::Pretty => serde_json::to_string_pretty(output)?,
    })
}

/// Exit code a resolved `PipelineOutput` maps to: `0` only for `well-typed`,
/// `1` for every non-fatal problem response (`parse`, `import`, `type-check`)
/// — the §7 "errors reported" bucket, which the four-code scheme doesn't
/// split further.
fn exit_code_for(output: &PipelineOutput) -> ExitCode {
    match output {
        PipelineOutput::WellTyped { .. } => ExitCode::SUCCESS,
        PipelineOutput::Parse { .. } | PipelineOutput::Import { .. } | PipelineOutput::TypeCheck { .. } => {
            ExitCode::from(1)
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let text = read_input(&args)?;
    let raw: PipelineInput = serde_json::from_str(&text).context("parsing input JSON")?;

    let options = InventoryOptions { max_loop: args.max_loop.unwrap_or(tyerr_common::limits::DEFAULT_MAX_LOOP), ..InventoryOptions::default() };

    match tyerr::run_pipeline(raw, tyerr::Interpreter::new(), options) {
        Ok(output) => {
            println!("{}", render(&output, args.format)?);
            Ok(exit_code_for(&output))
        }
        Err(fatal) => {
            eprintln!("tyerr: fatal: {fatal}");
            Ok(ExitCode::from(2))
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args.log_level);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tyerr: {err:#}");
            ExitCode::from(3)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn read_input_reads_the_given_file_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"declarations\":[]}}").unwrap();
        let args = CliArgs { input: Some(file.path().to_path_buf()), format: Format::Json, max_loop: None, log_level: "warn".into() };
        assert_eq!(read_input(&args).unwrap(), "{\"declarations\":[]}");
    }

    #[test]
    fn read_input_reports_context_for_a_missing_file() {
        let args = CliArgs { input: Some("/nonexistent/path.json".into()), format: Format::Json, max_loop: None, log_level: "warn".into() };
        let err = read_input(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/path.json"));
    }

    #[test]
    fn render_pretty_formats_with_newlines() {
        let output = PipelineOutput::WellTyped { inferred_types: Default::default() };
        let pretty = render(&output, Format::Pretty).unwrap();
        let compact = render(&output, Format::Json).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
    }
}
