//! Recovers the intel site's runtime parameters from its minified globals.
//!
//! Since the site is minified there are no stable names for its constants.
//! Every one or two character global is inspected instead:
//!
//! * constructors have their own prototype functions matched against the
//!   version assignment pattern, which yields `CURRENT_VERSION`;
//! * integer arrays of a plausible length are classified as `ZOOM_TO_LEVEL`
//!   or `TILES_PER_EDGE` by their monotonicity.
//!
//! Later matches overwrite earlier ones.

use super::{
    classify::{classify_table, find_version_token, is_minified_name},
    symbols::{Symbol, SymbolTable},
};
use crate::{
    core::config::{is_version_token, IntelConfig},
    notify::{Notification, Notifier},
    IntelError, Result,
};
use serde::{Deserialize, Serialize};

/// Parameters recovered from the host code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeParameters {
    pub current_version: String,
    pub zoom_to_level: Option<Vec<i64>>,
    pub tiles_per_edge: Option<Vec<i64>>,
}

impl RuntimeParameters {
    /// Parameters with only a version; the tiling tables fall back to defaults.
    pub fn with_version(current_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            zoom_to_level: None,
            tiles_per_edge: None,
        }
    }

    pub fn has_tables(&self) -> bool {
        self.zoom_to_level.is_some() && self.tiles_per_edge.is_some()
    }
}

/// Raw result of a scan, before the version is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub current_version: Option<String>,
    pub zoom_to_level: Option<Vec<i64>>,
    pub tiles_per_edge: Option<Vec<i64>>,
}

pub fn scan_symbols(symbols: &SymbolTable) -> ScanResult {
    let mut found = ScanResult::default();

    for entry in symbols.iter().filter(|e| is_minified_name(&e.name)) {
        if let Some(prototype) = entry.value.prototype() {
            for member in prototype.iter().filter(|m| is_minified_name(&m.name)) {
                let Some(source) = member.value.function_source() else {
                    continue;
                };
                if let Some(token) = find_version_token(source) {
                    log::debug!(
                        "found CURRENT_VERSION in {}.prototype.{}",
                        entry.name,
                        member.name
                    );
                    found.current_version = Some(token.to_string());
                }
            }
        }

        if let Symbol::Array(items) = &entry.value {
            if items.is_empty() {
                continue;
            }
            let Some(values) = entry.value.as_integer_array() else {
                continue;
            };

            let shape = classify_table(&values);
            if shape.zoom_to_level {
                log::debug!("found ZOOM_TO_LEVEL in {}: {:?}", entry.name, values);
                found.zoom_to_level = Some(values.clone());
            }
            if shape.tiles_per_edge {
                log::debug!("found TILES_PER_EDGE in {}: {:?}", entry.name, values);
                found.tiles_per_edge = Some(values);
            }
        }
    }

    found
}

/// Tells the user that startup stops because of `err`.
pub(crate) fn report_fatal(notifier: &dyn Notifier, err: &IntelError) {
    let message = match err {
        IntelError::InvalidVersionToken(token) => format!(
            "The configured version token {token:?} is not 40 lowercase hex digits. \
             Fix or remove it to continue."
        ),
        _ => "Failed to extract the required parameters from the intel site. \
              This can happen after an update of the intel site; a fix will be needed."
            .to_string(),
    };
    notifier.notify(&Notification::fatal("Intel map broken", message));
}

/// Scans `symbols` and requires a version token.
///
/// When no token is found the configured override is used. Without either,
/// the user is notified once and [`IntelError::MissingVersionToken`] is
/// returned; startup must stop there.
pub fn extract_parameters(
    symbols: &SymbolTable,
    config: &IntelConfig,
    notifier: &dyn Notifier,
) -> Result<RuntimeParameters> {
    let found = scan_symbols(symbols);

    let current_version = match (found.current_version, &config.version_override) {
        (Some(version), _) => version,
        (None, Some(token)) if is_version_token(token) => {
            log::info!("using configured CURRENT_VERSION");
            token.clone()
        }
        (None, Some(token)) => {
            let err = IntelError::InvalidVersionToken(token.clone());
            report_fatal(notifier, &err);
            return Err(err);
        }
        (None, None) => {
            log::error!("failed to extract CURRENT_VERSION from {} symbols", symbols.len());
            let err = IntelError::MissingVersionToken;
            report_fatal(notifier, &err);
            return Err(err);
        }
    };

    Ok(RuntimeParameters {
        current_version,
        zoom_to_level: found.zoom_to_level,
        tiles_per_edge: found.tiles_per_edge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{RecordingNotifier, Severity};

    const TOKEN: &str = "4f3c2a1b0e9d8c7b6a5f4e3d2c1b0a9f8e7d6c5b";
    const OTHER: &str = "00000000000000000000000000000000000000ff";

    fn request_fn(token: &str) -> Symbol {
        Symbol::function(format!(
            r#"function(a){{a.setRequestHeader("X-CSRFToken",Hb());this.v="{token}";}}"#
        ))
    }

    fn levels() -> Symbol {
        Symbol::numbers([8, 7, 6, 5, 4, 3, 2, 1, 1, 1, 1, 1, 1])
    }

    fn tiles() -> Symbol {
        Symbol::numbers([1, 1, 40, 40, 80, 320, 1000, 2000, 4000, 8000, 16000, 32000])
    }

    #[test]
    fn test_extracts_all_parameters() {
        let symbols: SymbolTable = [
            ("Xa", Symbol::constructor([("Kb", request_fn(TOKEN))])),
            ("Qc", levels()),
            ("r", tiles()),
        ]
        .into_iter()
        .collect();
        let notifier = RecordingNotifier::new();

        let params = extract_parameters(&symbols, &IntelConfig::default(), &notifier).unwrap();

        assert_eq!(params.current_version, TOKEN);
        assert_eq!(params.zoom_to_level, Some(vec![8, 7, 6, 5, 4, 3, 2, 1, 1, 1, 1, 1, 1]));
        assert_eq!(
            params.tiles_per_edge,
            Some(vec![1, 1, 40, 40, 80, 320, 1000, 2000, 4000, 8000, 16000, 32000])
        );
        assert!(params.has_tables());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_ignores_long_names() {
        let symbols: SymbolTable = [
            ("request", Symbol::constructor([("Kb", request_fn(TOKEN))])),
            ("Xa", Symbol::constructor([("send", request_fn(OTHER))])),
            ("levels", levels()),
            ("q", Symbol::constructor([("Kb", request_fn(TOKEN))])),
        ]
        .into_iter()
        .collect();

        let found = scan_symbols(&symbols);
        assert_eq!(found.current_version.as_deref(), Some(TOKEN));
        assert!(found.zoom_to_level.is_none());
    }

    #[test]
    fn test_last_match_wins() {
        let symbols: SymbolTable = [
            ("a", Symbol::constructor([("b", request_fn(TOKEN))])),
            ("c", Symbol::constructor([("d", request_fn(OTHER))])),
        ]
        .into_iter()
        .collect();

        assert_eq!(scan_symbols(&symbols).current_version.as_deref(), Some(OTHER));
    }

    #[test]
    fn test_non_function_prototype_members_skipped() {
        let symbols: SymbolTable = [(
            "a",
            Symbol::constructor([
                ("b", Symbol::Text(format!(r#""X-CSRFToken";a.v="{TOKEN}";"#))),
                ("c", Symbol::Null),
            ]),
        )]
        .into_iter()
        .collect();

        assert_eq!(scan_symbols(&symbols), ScanResult::default());
    }

    #[test]
    fn test_mixed_arrays_skipped() {
        let mut mixed = match levels() {
            Symbol::Array(items) => items,
            _ => unreachable!(),
        };
        mixed.push(Symbol::Text("x".into()));
        let symbols: SymbolTable = [
            ("a", Symbol::Array(mixed)),
            ("b", Symbol::numbers([8.0, 7.5, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 1.0, 1.0, 1.0])),
            ("c", Symbol::Array(vec![])),
        ]
        .into_iter()
        .collect();

        assert_eq!(scan_symbols(&symbols), ScanResult::default());
    }

    #[test]
    fn test_missing_version_is_fatal_once() {
        let symbols: SymbolTable = [("Qc", levels()), ("r", tiles())].into_iter().collect();
        let notifier = RecordingNotifier::new();

        let err = extract_parameters(&symbols, &IntelConfig::default(), &notifier).unwrap_err();

        assert!(matches!(err, IntelError::MissingVersionToken));
        assert!(err.is_fatal());
        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.count(Severity::Fatal), 1);
    }

    #[test]
    fn test_version_override() {
        let symbols: SymbolTable = [("Qc", levels())].into_iter().collect();
        let notifier = RecordingNotifier::new();
        let config = IntelConfig::default().with_version_override(OTHER);

        let params = extract_parameters(&symbols, &config, &notifier).unwrap();
        assert_eq!(params.current_version, OTHER);
        assert!(params.tiles_per_edge.is_none());
        assert!(notifier.notifications().is_empty());

        // a token found in the host code takes precedence
        let symbols: SymbolTable = [("a", Symbol::constructor([("b", request_fn(TOKEN))]))]
            .into_iter()
            .collect();
        let params = extract_parameters(&symbols, &config, &notifier).unwrap();
        assert_eq!(params.current_version, TOKEN);
    }

    #[test]
    fn test_bad_override_is_fatal_once() {
        let config = IntelConfig::default().with_version_override("nope");
        let notifier = RecordingNotifier::new();

        let err = extract_parameters(&SymbolTable::new(), &config, &notifier).unwrap_err();

        assert!(matches!(err, IntelError::InvalidVersionToken(_)));
        assert!(err.is_fatal());
        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.count(Severity::Fatal), 1);
        assert!(notifier.notifications()[0].message.contains("\"nope\""));
    }
}
