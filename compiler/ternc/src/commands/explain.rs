//! The `explain` command: print documentation for an error code.

use tern_diagnostic::{ErrorCode, ErrorDocs};

/// Display the long-form documentation for an error code string.
pub fn explain_error(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX (errors) or WXXXX (warnings) where X is a digit.");
        eprintln!("Examples: E0001, E1005, E6001, W1001");
        std::process::exit(1);
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
    } else {
        eprintln!("No extended documentation for {code}");
        eprintln!();
        eprintln!("The code exists; the error message itself is the best guidance for now.");
        std::process::exit(1);
    }
}
