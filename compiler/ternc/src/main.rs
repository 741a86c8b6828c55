//! Tern interpreter CLI.

use tern_diagnostic::ColorMode;
use ternc::commands;

fn main() {
    commands::init_tracing();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let color = extract_color_flag(&mut args);

    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    match args[0].as_str() {
        "run" => {
            if args.len() < 2 {
                eprintln!("Usage: tern run <file.tn>");
                std::process::exit(1);
            }
            commands::run_file(&args[1], color);
        }
        "check" => {
            if args.len() < 2 {
                eprintln!("Usage: tern check <file.tn>");
                std::process::exit(1);
            }
            commands::check_file(&args[1], color);
        }
        "parse" => {
            if args.len() < 2 {
                eprintln!("Usage: tern parse <file.tn>");
                std::process::exit(1);
            }
            commands::parse_file(&args[1]);
        }
        "lex" => {
            if args.len() < 2 {
                eprintln!("Usage: tern lex <file.tn>");
                std::process::exit(1);
            }
            commands::lex_file(&args[1]);
        }
        "--explain" | "explain" => {
            if args.len() < 2 {
                eprintln!("Usage: tern explain <code>");
                std::process::exit(1);
            }
            commands::explain_error(&args[1]);
        }
        "-h" | "--help" | "help" => {
            print_usage();
        }
        "-V" | "--version" | "version" => {
            println!("tern {}", env!("CARGO_PKG_VERSION"));
        }
        arg if arg.ends_with(".tn") => {
            // Shorthand: `tern file.tn` means `tern run file.tn`.
            commands::run_file(arg, color);
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Pull `--color=...` out of the argument list, wherever it appears.
fn extract_color_flag(args: &mut Vec<String>) -> ColorMode {
    let mut color = ColorMode::Auto;
    args.retain(|arg| match arg.as_str() {
        "--color=auto" => {
            color = ColorMode::Auto;
            false
        }
        "--color=always" => {
            color = ColorMode::Always;
            false
        }
        "--color=never" => {
            color = ColorMode::Never;
            false
        }
        _ => true,
    });
    color
}

fn print_usage() {
    eprintln!("tern {}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  tern run <file.tn>      Parse and run a file");
    eprintln!("  tern check <file.tn>    Parse and lint without running");
    eprintln!("  tern parse <file.tn>    Show a parse summary");
    eprintln!("  tern lex <file.tn>      Show the token stream");
    eprintln!("  tern explain <code>     Explain an error code (e.g. E1005)");
    eprintln!("  tern <file.tn>          Run a file (shorthand for run)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --color=<auto|always|never>    Control diagnostic colors");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TERN_LOG=<filter>    Enable tracing output (e.g. TERN_LOG=debug)");
}
