use std::fmt;

/// Error codes for all Tern diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: lexer errors
/// - E1xxx: parser errors
/// - E6xxx: runtime errors
/// - W1xxx: warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer errors (E0xxx)
    /// Unrecognized character in source
    E0001,
    /// Unterminated string literal
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,

    // Parser errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Statement binding outside parentheses
    E1005,
    /// Invalid assignment target
    E1006,
    /// Function definition not at top level
    E1007,

    // Runtime errors (E6xxx)
    /// Undefined name
    E6001,
    /// Type mismatch
    E6002,
    /// Division by zero
    E6003,
    /// Value is not callable
    E6004,
    /// Wrong number of arguments
    E6005,
    /// Index out of bounds
    E6006,
    /// Control flow outside its construct (`break`/`continue` outside a
    /// loop, `return` outside a function)
    E6007,
    /// Recursion limit exceeded
    E6008,
    /// Invalid argument to a builtin
    E6009,
    /// Integer overflow
    E6010,

    // Warnings (W1xxx)
    /// Name bound more than once by `as` in one statement
    W1001,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            // Runtime
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            // Warnings
            ErrorCode::W1001 => "W1001",
        }
    }

    /// Parse a code string (e.g., "E1005") back into an `ErrorCode`.
    ///
    /// Used by `--explain` to accept codes from the command line.
    pub fn parse(s: &str) -> Option<ErrorCode> {
        const ALL: &[ErrorCode] = &[
            ErrorCode::E0001,
            ErrorCode::E0002,
            ErrorCode::E0003,
            ErrorCode::E0004,
            ErrorCode::E1001,
            ErrorCode::E1002,
            ErrorCode::E1003,
            ErrorCode::E1004,
            ErrorCode::E1005,
            ErrorCode::E1006,
            ErrorCode::E1007,
            ErrorCode::E6001,
            ErrorCode::E6002,
            ErrorCode::E6003,
            ErrorCode::E6004,
            ErrorCode::E6005,
            ErrorCode::E6006,
            ErrorCode::E6007,
            ErrorCode::E6008,
            ErrorCode::E6009,
            ErrorCode::E6010,
            ErrorCode::W1001,
        ];
        let upper = s.to_ascii_uppercase();
        ALL.iter().find(|code| code.as_str() == upper).copied()
    }

    /// Check if this is a parser/syntax error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a runtime error (E6xxx range).
    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
