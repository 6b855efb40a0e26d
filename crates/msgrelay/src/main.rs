mod broker;
mod exit;
mod logging;

use std::path::PathBuf;

use clap::Parser;

use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "msgrelay",
    version,
    about = "Relay multipart messages between two Unix socket endpoints"
)]
struct Cli {
    /// Socket path to bind for the front-facing peer.
    frontend: PathBuf,

    /// Socket path to bind for the back-facing peer.
    backend: PathBuf,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match broker::run(&cli.frontend, &cli.backend) {
        Ok(()) => std::process::exit(exit::SUCCESS),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_socket_paths() {
        let cli = Cli::try_parse_from(["msgrelay", "/tmp/front.sock", "/tmp/back.sock"])
            .expect("two positional paths should parse");

        assert_eq!(cli.frontend, PathBuf::from("/tmp/front.sock"));
        assert_eq!(cli.backend, PathBuf::from("/tmp/back.sock"));
    }

    #[test]
    fn rejects_missing_backend_path() {
        let err = Cli::try_parse_from(["msgrelay", "/tmp/front.sock"])
            .expect_err("one path should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_log_flags() {
        let cli = Cli::try_parse_from([
            "msgrelay",
            "/tmp/front.sock",
            "/tmp/back.sock",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("log flags should parse");

        assert!(matches!(cli.log_format, LogFormat::Json));
        assert!(matches!(cli.log_level, LogLevel::Debug));
    }
}
