//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, bad settings) |
//! | 3-4     | input     | File-level failures                      |
//! | 5-9     | column    | Column-level failures                    |
//! | 10-19   | ai        | AI provider/credential codes             |
//!
//! A failed remote call is never an exit condition: the run falls back to
//! the local average and exits 0.

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. stdout closed).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid settings file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-4)
// =============================================================================

/// Input path does not resolve to a readable file.
pub const EXIT_NOT_FOUND: u8 = 3;

/// Input file exists but could not be read as a table.
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Column (5-9)
// =============================================================================

/// Table has fewer columns than the selected index requires.
pub const EXIT_INSUFFICIENT_COLUMNS: u8 = 5;

/// Selected column exists but holds no numeric values.
pub const EXIT_NO_NUMERIC_DATA: u8 = 6;

/// Header selector matched no column.
pub const EXIT_UNKNOWN_COLUMN: u8 = 7;

// =============================================================================
// AI (10-19)
// =============================================================================

/// AI provider configured but API key missing.
pub const EXIT_AI_MISSING_KEY: u8 = 11;
