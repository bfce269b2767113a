use std::io::{stdin, stdout, BufRead, Write};

use anyhow::Context;
use bpcobar::{boundary_in_v, parse, BPAlgebra, ValidPrime};

/// Reads one cobar expression per line, prints its boundary in the V basis,
/// and exits on an empty line or EOF. The prime may be given as the sole
/// argument and defaults to 2; note that the diagonal, and hence any input
/// with a bar entry of degree ≥ 2, is only available at 2.
fn main() -> anyhow::Result<()> {
    let p = match std::env::args().nth(1) {
        Some(arg) => {
            let p: u32 = arg.parse().with_context(|| format!("Invalid prime: {arg}"))?;
            ValidPrime::try_new(p).with_context(|| format!("{p} is not a prime"))?
        }
        None => ValidPrime::new(2),
    };
    let algebra = BPAlgebra::new(p);

    let stdin = stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("bpcobar> ");
        stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let input = match parse::cobar_expression(line) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        println!("Parsed as {input}");
        println!();
        match boundary_in_v(&algebra, &input) {
            Ok(bound) => println!("{bound}"),
            Err(err) => eprintln!("{err}"),
        }
    }

    for (name, size) in algebra.cache_sizes() {
        eprintln!("{name}: {size} cached images");
    }
    Ok(())
}
