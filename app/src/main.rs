// Licensed under the Apache-2.0 license

use anyhow::Context;
use clap::{arg, value_parser};
use scale_uart::{run_session, HexWriter, OsRandom, TtyChannel};
use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

fn cli() -> clap::Command<'static> {
    clap::Command::new("scale-capture")
        .about("Collect plaintext/ciphertext pairs from a SCALE masked-AES target")
        .arg(
            arg!(--port [DEVICE] "Serial device connected to the target board")
                .value_parser(value_parser!(PathBuf))
                .default_value("/dev/ttyUSB0"),
        )
        .arg(
            arg!(--count [N] "Number of encryptions to run")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--baud [RATE] "Serial line rate in bits per second")
                .value_parser(value_parser!(u32))
                .default_value("115200"),
        )
        .arg(
            arg!(--out [FILE] "Write hex records to FILE instead of stdout")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn main() {
    match main_impl() {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn main_impl() -> anyhow::Result<()> {
    let args = cli().get_matches();
    let port = args.get_one::<PathBuf>("port").unwrap();
    let count = *args.get_one::<usize>("count").unwrap();
    let baud = *args.get_one::<u32>("baud").unwrap();
    let out = args.get_one::<PathBuf>("out");

    let channel = TtyChannel::open(port, baud)
        .with_context(|| format!("failed to open {}", port.display()))?;

    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };
    let mut reporter = HexWriter::new(writer);

    match run_session(channel, count, &mut OsRandom, &mut reporter) {
        Ok(session) => {
            println!(
                "collected {} plaintext/ciphertext pairs from {}",
                session.len(),
                port.display()
            );
            Ok(())
        }
        Err(e) => {
            Err(anyhow::Error::new(e)).with_context(|| format!("capture on {} failed", port.display()))
        }
    }
}
