use std::fs;
use std::path::Path;
use std::process::exit;

use log::{error, info};

use rle_rust::compression::{deflate::deflate_file, inflate::inflate_file};
use rle_rust::error::RleError;
use rle_rust::tools::cli::{self, Command};

fn main() {
    let options = cli::init();

    let (input, output, result) = match &options.command {
        Command::Deflate { input } => {
            let output = cli::deflated_name(input);
            info!("Deflating {} into {}.", input, output);
            let result = deflate_file(Path::new(input), Path::new(&output));
            (input, output, result)
        }
        Command::Inflate { input } => {
            let output = cli::inflated_name(input);
            info!("Inflating {} into {}.", input, output);
            let result = inflate_file(Path::new(input), Path::new(&output));
            (input, output, result)
        }
    };

    if let Err(e) = result {
        // A failed call may have created a partial output; never leave it.
        let _ = fs::remove_file(&output);
        match e {
            RleError::Inefficient => {
                error!("{} cannot be deflated efficiently.", input)
            }
            other => error!("{}", other),
        }
        exit(1);
    }

    info!("Done.");
}
