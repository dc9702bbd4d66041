use clap::builder::RangedU64ValueParser;
use clap::{Args, Subcommand};
use msgdev_control::MessageDevice;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod contend;
pub mod ioctl;
pub mod roundtrip;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set a message, walk it byte by byte, then read it whole (control path).
    Ioctl(IoctlArgs),
    /// Write a message and stream it back through a session (plain path).
    Roundtrip(RoundtripArgs),
    /// Run concurrent control callers and count busy rejections.
    Contend(ContendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, device: &MessageDevice, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ioctl(args) => ioctl::run(args, device, format),
        Command::Roundtrip(args) => roundtrip::run(args, device, format),
        Command::Contend(args) => contend::run(args, device, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct IoctlArgs {
    /// Message to set.
    #[arg(long, short = 'm', default_value = "Message passed by ioctl\n")]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// Message to write.
    #[arg(long, short = 'd', default_value = "Message passed by proc\n")]
    pub data: String,
    /// Bytes requested per read call.
    #[arg(
        long,
        default_value = "16",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub chunk: usize,
    /// Append a zero terminator to the written data.
    #[arg(long)]
    pub terminate: bool,
}

#[derive(Args, Debug)]
pub struct ContendArgs {
    /// Concurrent control callers.
    #[arg(
        long,
        default_value = "4",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub threads: usize,
    /// Control calls per caller.
    #[arg(long, default_value = "1000")]
    pub iterations: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
