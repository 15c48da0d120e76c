use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use sketch_effects::{
    default_output_path, process_directory, process_file, Effect, ProcessOptions, ProcessResult,
};

#[derive(Parser)]
#[command(
    name = "sketch-effects",
    about = "Tint, gradient-blend and glow effects for RGBA sketch images",
    version,
    after_help = "Effects:\n  \
                  tint      translucent blue linework on a transparent canvas\n  \
                  blend     paper blended into a blue-purple gradient, with glow\n  \
                  backdrop  sketch over a soft purple-blue backdrop, with glow\n\n\
                  Output is always RGBA; use .png, .webp, .bmp or .tiff."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Effect to apply
    #[arg(short, long, default_value_t = Effect::Blend)]
    effect: Effect,

    /// Output file or directory (default: {name}_{transparent|blended|processed}.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Composite the tint effect over its own glow
    #[arg(long)]
    glow: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose && cli.quiet {
        eprintln!("Error: Cannot specify both --verbose and --quiet");
        process::exit(1);
    }

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.glow && cli.effect != Effect::Tint {
        log::warn!("--glow only affects the tint effect; ignoring it for {}", cli.effect);
    }

    let opts = ProcessOptions {
        effect: cli.effect,
        tint_glow: cli.glow,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: sketch-effects <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path, opts.effect),
        };
        vec![process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if result.success {
        if !opts.quiet {
            println!(
                "Image processing complete. Saved as {}",
                result.output.display()
            );
        }
    } else {
        let filename = result.path.file_name().map_or_else(
            || result.path.display().to_string(),
            |f| f.to_string_lossy().to_string(),
        );
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
