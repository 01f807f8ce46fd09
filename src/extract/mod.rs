pub mod classify;
pub mod extractor;
#[cfg(feature = "wasm")]
pub mod host;
pub mod symbols;

// Re-exports for convenience
pub use extractor::{extract_parameters, scan_symbols, RuntimeParameters, ScanResult};
pub use symbols::{Symbol, SymbolEntry, SymbolTable};
