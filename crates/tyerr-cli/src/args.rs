use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// CLI arguments for the `tyerr` binary.
#[derive(Parser, Debug)]
#[command(name = "tyerr", version, about = "Interactive type-error localization")]
pub struct CliArgs {
    /// Input JSON document to run. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Output rendering.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Upper bound on MARCO's seed/SAT-check loop before it is treated as a
    /// budget-exceeded fatal error.
    #[arg(long = "max-loop")]
    pub max_loop: Option<u32>,

    /// Tracing verbosity, overridden by `RUST_LOG` when set.
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_from_stdin_as_json() {
        let args = CliArgs::parse_from(["tyerr"]);
        assert!(args.input.is_none());
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.max_loop, None);
    }

    #[test]
    fn accepts_a_file_path_and_pretty_format() {
        let args = CliArgs::parse_from(["tyerr", "request.json", "--format", "pretty", "--max-loop", "64"]);
        assert_eq!(args.input, Some(PathBuf::from("request.json")));
        assert_eq!(args.format, Format::Pretty);
        assert_eq!(args.max_loop, Some(64));
    }
}
