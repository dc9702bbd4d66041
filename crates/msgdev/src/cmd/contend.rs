use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use msgdev_buffer::CAPACITY;
use msgdev_control::{ControlError, ControlRequest, ControlResponse, MessageDevice};
use serde::Serialize;
use tracing::{debug, info};

use crate::cmd::ContendArgs;
use crate::exit::{CliError, CliResult, FAILURE, INTERNAL, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct CallerStats {
    completed: usize,
    busy: usize,
    torn: usize,
}

impl CallerStats {
    fn merge(&mut self, other: CallerStats) {
        self.completed += other.completed;
        self.busy += other.busy;
        self.torn += other.torn;
    }
}

#[derive(Serialize)]
struct ContendReport {
    threads: usize,
    iterations: usize,
    attempted: usize,
    #[serde(flatten)]
    stats: CallerStats,
    elapsed_ms: f64,
}

impl Report for ContendReport {
    fn command(&self) -> &'static str {
        "contend"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("threads", self.threads.to_string()),
            ("iterations", self.iterations.to_string()),
            ("attempted", self.attempted.to_string()),
            ("completed", self.stats.completed.to_string()),
            ("busy", self.stats.busy.to_string()),
            ("torn", self.stats.torn.to_string()),
            ("elapsed_ms", format!("{:.2}", self.elapsed_ms)),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        format!("{} {}\n", self.stats.completed, self.stats.busy).into_bytes()
    }
}

pub fn run(args: ContendArgs, device: &MessageDevice, format: OutputFormat) -> CliResult<i32> {
    let start = Arc::new(Barrier::new(args.threads));
    let began = Instant::now();

    let handles: Vec<_> = (0..args.threads)
        .map(|caller| {
            let device = device.clone();
            let start = Arc::clone(&start);
            let iterations = args.iterations;
            thread::spawn(move || {
                start.wait();
                run_caller(&device, caller, iterations)
            })
        })
        .collect();

    let mut stats = CallerStats::default();
    for handle in handles {
        let caller = handle
            .join()
            .map_err(|_| CliError::new(INTERNAL, "control caller panicked"))??;
        stats.merge(caller);
    }

    let report = ContendReport {
        threads: args.threads,
        iterations: args.iterations,
        attempted: args.threads * args.iterations,
        stats,
        elapsed_ms: (began.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0,
    };
    info!(
        completed = stats.completed,
        busy = stats.busy,
        torn = stats.torn,
        "contention run finished"
    );
    print_report(&report, format);

    Ok(if stats.torn == 0 { SUCCESS } else { FAILURE })
}

/// One caller cycling through set, get and get-nth-byte.
///
/// Every message it sets is a single repeated letter, so any mix of letters
/// seen by a get means two control operations overlapped.
fn run_caller(device: &MessageDevice, caller: usize, iterations: usize) -> CliResult<CallerStats> {
    let letter = b'a' + (caller % 26) as u8;
    let set = ControlRequest::set_message(vec![letter; CAPACITY - 1]);
    let get = ControlRequest::get_message();
    let mut stats = CallerStats::default();

    for i in 0..iterations {
        let request = match (caller + i) % 3 {
            0 => set.clone(),
            1 => get.clone(),
            _ => ControlRequest::get_nth_byte(i % CAPACITY),
        };
        match device.control(&request) {
            Ok(response) => {
                stats.completed += 1;
                if let ControlResponse::Message(_) = response {
                    let content = response.content().unwrap_or_default();
                    if !content.windows(2).all(|pair| pair[0] == pair[1]) {
                        stats.torn += 1;
                    }
                }
            }
            Err(ControlError::Busy) => stats.busy += 1,
            Err(err) => {
                return Err(CliError::new(
                    INTERNAL,
                    format!("caller {caller} failed: {err}"),
                ))
            }
        }
    }
    debug!(caller, ?stats, "control caller done");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_caller_never_sees_busy() {
        let device = MessageDevice::new();
        let stats = run_caller(&device, 0, 30).unwrap();
        assert_eq!(
            stats,
            CallerStats {
                completed: 30,
                busy: 0,
                torn: 0
            }
        );
    }

    #[test]
    fn merge_adds_counts() {
        let mut total = CallerStats::default();
        total.merge(CallerStats {
            completed: 2,
            busy: 1,
            torn: 0,
        });
        total.merge(CallerStats {
            completed: 3,
            busy: 4,
            torn: 0,
        });
        assert_eq!(total.completed, 5);
        assert_eq!(total.busy, 5);
    }
}
