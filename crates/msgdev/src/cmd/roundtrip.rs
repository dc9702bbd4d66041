use msgdev_buffer::TERMINATOR;
use msgdev_control::MessageDevice;
use serde::Serialize;

use crate::cmd::RoundtripArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{preview, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct RoundtripReport {
    requested: usize,
    written: usize,
    reads: usize,
    read: String,
    read_len: usize,
    matches: bool,
}

impl Report for RoundtripReport {
    fn command(&self) -> &'static str {
        "roundtrip"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("requested", self.requested.to_string()),
            ("written", self.written.to_string()),
            ("reads", self.reads.to_string()),
            ("read", self.read.clone()),
            ("read_len", self.read_len.to_string()),
            ("matches", self.matches.to_string()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        self.read.clone().into_bytes()
    }
}

pub fn run(args: RoundtripArgs, device: &MessageDevice, format: OutputFormat) -> CliResult<i32> {
    let mut data = args.data.into_bytes();
    if args.terminate {
        data.push(TERMINATOR);
    }

    let written = device.write(&data);
    let (read, reads) = drain(device, args.chunk);

    let expected = expected_content(&data[..written]);
    let report = RoundtripReport {
        requested: data.len(),
        written,
        reads,
        read: preview(&read),
        read_len: read.len(),
        matches: read == expected,
    };
    print_report(&report, format);

    Ok(if report.matches { SUCCESS } else { FAILURE })
}

/// Read through a fresh session until end of message. Returns the bytes and
/// the number of read calls that produced data.
fn drain(device: &MessageDevice, chunk: usize) -> (Vec<u8>, usize) {
    let mut session = device.open();
    let mut out = Vec::new();
    let mut reads = 0;
    loop {
        let bytes = session.read_chunk(chunk);
        if bytes.is_empty() {
            return (out, reads);
        }
        reads += 1;
        out.extend_from_slice(&bytes);
    }
}

/// What a reader should see after writing `accepted`: everything up to the
/// first terminator.
fn expected_content(accepted: &[u8]) -> &[u8] {
    match accepted.iter().position(|b| *b == TERMINATOR) {
        Some(end) => &accepted[..end],
        None => accepted,
    }
}
