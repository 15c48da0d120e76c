//! Apply one effect to a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_effect -- tint input.png output.png
//! ```

use std::env;
use std::process;

use sketch_effects::{process_file, Effect, ProcessOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <tint|blend|backdrop> <input> <output>", args[0]);
        process::exit(1);
    }

    let effect: Effect = match args[1].parse() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let opts = ProcessOptions {
        effect,
        ..ProcessOptions::default()
    };
    let result = process_file(args[2].as_ref(), args[3].as_ref(), &opts);

    if result.success {
        println!("Image processing complete. Saved as {}", result.output.display());
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
