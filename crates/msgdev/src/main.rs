mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use msgdev_buffer::ChannelConfig;
use msgdev_control::{DeviceConfig, MessageDevice, GET_MESSAGE_LIMIT};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "msgdev", version, about = "Shared message device CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "MSGDEV_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Warn when a write is cut short at the device capacity.
    #[arg(long, env = "MSGDEV_WARN_TRUNCATION", global = true)]
    warn_truncation: bool,

    /// Most content bytes a single get-message control call returns.
    #[arg(long, value_name = "BYTES", default_value_t = GET_MESSAGE_LIMIT, global = true)]
    get_message_limit: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            get_message_limit: self.get_message_limit,
            channel: ChannelConfig {
                warn_on_truncation: self.warn_truncation,
            },
            ..DeviceConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let device = MessageDevice::with_config(cli.device_config());
    let result = cmd::run(cli.command, &device, format);

    match result {
        Ok(code) => std::process::exit(code),
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
    fn parses_ioctl_subcommand() {
        let cli = Cli::try_parse_from(["msgdev", "ioctl", "--message", "hi"])
            .expect("ioctl args should parse");
        assert!(matches!(cli.command, Command::Ioctl(_)));
    }

    #[test]
    fn parses_global_device_flags() {
        let cli = Cli::try_parse_from([
            "msgdev",
            "roundtrip",
            "--data",
            "hello",
            "--warn-truncation",
            "--get-message-limit",
            "10",
        ])
        .expect("roundtrip args should parse");

        let config = cli.device_config();
        assert!(config.channel.warn_on_truncation);
        assert_eq!(config.get_message_limit, 10);
    }

    #[test]
    fn warn_truncation_falls_back_to_env() {
        std::env::set_var("MSGDEV_WARN_TRUNCATION", "true");
        let from_env = Cli::try_parse_from(["msgdev", "version"]);
        std::env::set_var("MSGDEV_WARN_TRUNCATION", "false");
        let disabled = Cli::try_parse_from(["msgdev", "version"]);
        std::env::remove_var("MSGDEV_WARN_TRUNCATION");

        let config = from_env.expect("env flag should parse").device_config();
        assert!(config.channel.warn_on_truncation);
        let config = disabled.expect("env flag should parse").device_config();
        assert!(!config.channel.warn_on_truncation);
    }

    #[test]
    fn rejects_zero_chunk() {
        let err = Cli::try_parse_from(["msgdev", "roundtrip", "--chunk", "0"])
            .expect_err("zero chunk should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_contend_subcommand() {
        let cli = Cli::try_parse_from(["msgdev", "contend", "--threads", "3"])
            .expect("contend args should parse");
        assert!(matches!(cli.command, Command::Contend(_)));
    }
}
