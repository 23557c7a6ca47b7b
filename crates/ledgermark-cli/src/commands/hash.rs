//! Hash command implementation.

use ledgermark_contracts::{derive_hash, HashType};
use std::path::PathBuf;

use super::read_input;

pub fn run(algorithm: HashType, input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_input(input.as_deref())?;
    println!("{}", derive_hash(algorithm, &data));
    Ok(())
}
