//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// File analysis constants
pub mod analysis {
    /// Files larger than this are skipped by the scanner (bytes)
    pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

    /// Leading bytes inspected for NUL when sniffing binary content
    pub const BINARY_SNIFF_BYTES: usize = 8000;

    /// Top-level variables kept per file by heuristic extraction
    pub const MAX_HEURISTIC_VARIABLES: usize = 10;

    /// Ratio above which a file is described as well-documented
    pub const WELL_DOCUMENTED_RATIO: f64 = 0.2;
}

/// Review pipeline constants
pub mod pipeline {
    /// Wall-clock budget for analyzing one file (milliseconds)
    pub const DEFAULT_FILE_TIMEOUT_MS: u64 = 5_000;

    /// Concurrency used when available parallelism cannot be queried
    pub const FALLBACK_CONCURRENCY: usize = 4;
}

/// Project summary constants
pub mod summary {
    /// Languages listed in the narrative
    pub const TOP_LANGUAGES: usize = 3;

    /// Imports reported as common
    pub const TOP_IMPORTS: usize = 10;

    /// Element totals separating the scale buckets (exclusive lower bounds)
    pub const LARGE_ELEMENTS: u64 = 1000;
    pub const MEDIUM_ELEMENTS: u64 = 500;
    pub const SMALL_ELEMENTS: u64 = 100;
}

/// Complexity enricher constants
pub mod complexity {
    /// Decision points at or above which a file rates medium
    pub const MEDIUM_THRESHOLD: usize = 5;

    /// Decision points at or above which a file rates high
    pub const HIGH_THRESHOLD: usize = 10;

    /// Indentation width used to derive nesting depth
    pub const INDENT_WIDTH: usize = 4;
}

/// Smell, security and quality enricher constants
pub mod findings {
    /// Characters of body text above which a callable is reported as long
    pub const LONG_CALLABLE_CHARS: usize = 500;

    /// Parameters a callable may take before it is reported
    pub const MAX_PARAMETERS: usize = 5;

    /// Lines searched after a callable header for its closing parenthesis
    pub const SIGNATURE_LINES: usize = 20;

    /// Score deducted per code smell
    pub const SMELL_PENALTY: i64 = 5;

    /// Score deducted per security issue
    pub const SECURITY_PENALTY: i64 = 10;

    /// (decision points above, penalty), checked in order
    pub const COMPLEXITY_PENALTIES: &[(usize, i64)] = &[(15, 20), (10, 10), (5, 5)];
}
