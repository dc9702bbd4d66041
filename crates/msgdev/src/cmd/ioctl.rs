use msgdev_buffer::CAPACITY;
use msgdev_control::{ControlRequest, ControlResponse, MessageDevice};
use serde::Serialize;

use crate::cmd::IoctlArgs;
use crate::exit::{control_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{preview, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct IoctlReport {
    written: usize,
    nth_bytes: Vec<u8>,
    message: String,
    message_len: usize,
}

impl Report for IoctlReport {
    fn command(&self) -> &'static str {
        "ioctl"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("written", self.written.to_string()),
            ("nth_bytes", preview(&self.nth_bytes)),
            ("message", self.message.clone()),
            ("message_len", self.message_len.to_string()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        self.nth_bytes.clone()
    }
}

pub fn run(args: IoctlArgs, device: &MessageDevice, format: OutputFormat) -> CliResult<i32> {
    let written = match device
        .control(&ControlRequest::set_message(args.message.into_bytes()))
        .map_err(|err| control_error("set_msg failed", err))?
    {
        ControlResponse::Written(written) => written,
        other => return Err(unexpected("set_msg", &other)),
    };

    let nth_bytes = walk_bytes(device)?;

    let response = device
        .control(&ControlRequest::get_message())
        .map_err(|err| control_error("get_msg failed", err))?;
    let content = response
        .content()
        .ok_or_else(|| unexpected("get_msg", &response))?;

    let report = IoctlReport {
        written,
        nth_bytes,
        message: preview(content),
        message_len: content.len(),
    };
    print_report(&report, format);
    Ok(SUCCESS)
}

/// Fetch bytes one index at a time until the terminator.
fn walk_bytes(device: &MessageDevice) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();
    for index in 0..CAPACITY {
        match device.control(&ControlRequest::get_nth_byte(index)) {
            Ok(ControlResponse::Byte(0)) => return Ok(bytes),
            Ok(ControlResponse::Byte(byte)) => bytes.push(byte),
            Ok(other) => return Err(unexpected("get_nth_byte", &other)),
            Err(err) => {
                return Err(control_error(
                    &format!("get_nth_byte failed at byte {index}"),
                    err,
                ))
            }
        }
    }
    Ok(bytes)
}

fn unexpected(command: &str, response: &ControlResponse) -> CliError {
    CliError::new(
        INTERNAL,
        format!("{command} returned an unexpected response: {response:?}"),
    )
}
