// ABOUTME: Log-extraction collaborator contract
// ABOUTME: The synchronizer's surroundings implement this; internals stay out of this crate

use anyhow::Result;
use std::path::Path;

/// One structured entry pulled out of raw access-log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub ip_address: String,
    pub timestamp: String,
}

/// Boundary to the web-log extraction pipeline.
///
/// Consumed as a black box: given a raw log file, an implementation yields
/// `(ip_address, timestamp)` pairs. The synchronizer does not depend on
/// how the extraction is done.
pub trait LogExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<LogEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExtractor(Vec<LogEntry>);

    impl LogExtractor for FixedExtractor {
        fn extract(&self, _path: &Path) -> Result<Vec<LogEntry>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_extractor_contract() {
        let extractor = FixedExtractor(vec![LogEntry {
            ip_address: "198.46.149.143".to_string(),
            timestamp: "2024-01-01 00:00:00".to_string(),
        }]);

        let entries = extractor.extract(Path::new("accesslog.txt")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip_address, "198.46.149.143");
    }
}
