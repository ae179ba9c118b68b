pub mod input;
pub mod output;

pub use input::{parse_comparables, parse_properties, read_input};
pub use output::{create_writer, OutputFormat, OutputWriter};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

/// Stdout, or a file when `output` is given.
pub fn open_output(output: Option<&Path>) -> Result<Box<dyn std::io::Write>> {
    match output {
        Some(path) => Ok(Box::new(std::io::BufWriter::new(fs::File::create(path)?))),
        None => Ok(Box::new(std::io::stdout())),
    }
}
