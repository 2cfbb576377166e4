use std::{
    env,
    io::{self, Write},
    process,
};

use anyhow::{Context, Result};
use log::{LevelFilter, debug};
use pico8_cartextract::{Cartridge, emit};
use simple_logger::SimpleLogger;

fn usage(program: &str, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "Usage: {program} <input.p8.png>")
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the C source.
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cartextract");
    let [_, path] = args.as_slice() else {
        usage(program, io::stdout())?;
        process::exit(1);
    };

    let cart = Cartridge::load(path).with_context(|| format!("failed to load cartridge {path}"))?;
    debug!("loaded {path}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit::write_c_source(&mut out, &cart)?;
    out.flush()?;
    Ok(())
}
