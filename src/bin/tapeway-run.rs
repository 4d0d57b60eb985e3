// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run a tape program from a file, feeding it inputs from the command line
//! and printing its output one value per line.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use tapeway::loader::read_program;
use tapeway::prelude::*;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Tape machine runner", long_about = None)]
struct Args {
    #[arg(help = "The program to run (comma-separated integers)")]
    source: PathBuf,
    #[arg(short, long = "input", value_name = "INT")]
    #[arg(help = "Values for the machine's input channel, consumed in order")]
    #[arg(allow_negative_numbers = true)]
    input: Vec<i64>,
    #[arg(long)]
    #[arg(help = "Also print the final value of cell 0")]
    cell0: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let tape = read_program(&args.source)?;
    let mut machine = Machine::new(tape, args.input);

    let outcome = machine.run();
    // output produced before a failure is kept, so print it either way
    for value in machine.output() {
        println!("{value}");
    }
    outcome?;

    if args.cell0 {
        println!("cell 0: {}", machine.mem_get(0)?);
    }
    Ok(())
}
