use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{IndelErrorRateSetBuilder, ModelError};

/// One explicit context of a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotifRecord {
    /// Per-read indel error rate, used for both directions.
    pub indel_rate: f64,
    /// Noisy-locus rate of the context.
    pub noisy_locus_rate: f64,
    /// Repeat count of the context.
    pub repeat_count: u32,
    /// Repeat pattern size of the context.
    pub repeat_pattern_size: u32,
}

/// Logical schema of an indel error model document.
///
/// Fields other than `motifs` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndelModelFile {
    /// Enumerated contexts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motifs: Option<Vec<MotifRecord>>,
}

impl IndelModelFile {
    /// Read and parse the document at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents, path)
    }

    /// Parse a JSON document; `path` is only used to label errors.
    pub fn from_json(contents: &str, path: &Path) -> Result<Self, ModelError> {
        serde_json::from_str(contents).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Turn the motif list into an unfinalized rate set.
    pub fn into_rates(self, path: &Path) -> Result<IndelErrorRateSetBuilder, ModelError> {
        let motifs = self.motifs.ok_or_else(|| ModelError::MissingMotifs {
            path: path.to_path_buf(),
        })?;

        let mut rates = IndelErrorRateSetBuilder::new();
        for motif in &motifs {
            if motif.repeat_pattern_size == 0 || motif.repeat_count == 0 {
                return Err(ModelError::InvalidMotif {
                    pattern_size: motif.repeat_pattern_size,
                    repeat_count: motif.repeat_count,
                });
            }
            rates.add_rate(
                motif.repeat_pattern_size,
                motif.repeat_count,
                motif.indel_rate,
                motif.indel_rate,
                motif.noisy_locus_rate,
            );
        }
        info!(
            path = %path.display(),
            motifs = motifs.len(),
            "loaded indel error model file"
        );
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::IndelErrorRateType;

    const MODEL: &str = r#"{
        "sample": "NA12878",
        "motifs": [
            {"indelRate": 0.001, "noisyLocusRate": 0.05, "repeatCount": 1, "repeatPatternSize": 1},
            {"indelRate": 0.004, "noisyLocusRate": 0.07, "repeatCount": 6, "repeatPatternSize": 1}
        ]
    }"#;

    #[test]
    fn motifs_become_rates() {
        let path = Path::new("model.json");
        let rates = IndelModelFile::from_json(MODEL, path)
            .unwrap()
            .into_rates(path)
            .unwrap()
            .finalize()
            .unwrap();
        assert_eq!(rates.rate(1, 6, IndelErrorRateType::Insert), 0.004);
        assert_eq!(rates.rate(1, 6, IndelErrorRateType::Delete), 0.004);
        assert_eq!(rates.noisy_locus_rate(1, 6), 0.07);
    }

    #[test]
    fn missing_motifs_names_the_file() {
        let path = Path::new("empty.json");
        let err = IndelModelFile::from_json("{\"sample\": \"x\"}", path)
            .unwrap()
            .into_rates(path)
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingMotifs { .. }));
        assert!(err.to_string().contains("empty.json"));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let path = Path::new("broken.json");
        let err = IndelModelFile::from_json("{\"motifs\": [", path).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn zero_repeat_count_is_rejected() {
        let path = Path::new("zero.json");
        let doc = r#"{"motifs": [
            {"indelRate": 0.1, "noisyLocusRate": 0.0, "repeatCount": 0, "repeatPatternSize": 1}
        ]}"#;
        let err = IndelModelFile::from_json(doc, path)
            .unwrap()
            .into_rates(path)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidMotif { repeat_count: 0, .. }));
    }
}
