use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use smartcore::{
    ensemble::random_forest_classifier::RandomForestClassifier,
    linalg::basic::matrix::DenseMatrix,
};

use crate::{encoders::EncoderSet, schema::Attribute};

/// The trained classifier: an ensemble of decision trees over integer feature
/// codes, opaque to the rest of the crate
pub type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// The file holding the trained classifier, relative to the artifact directory
pub static MODEL_FILE: &str = "model.json";

/// The file holding the fitted encoders, relative to the artifact directory
pub static ENCODERS_FILE: &str = "encoders.json";

/// The persisted pair of trained classifier and fitted encoders
///
/// Written wholesale by the trainer, loaded once at predictor startup, and
/// never mutated afterwards.
pub struct ArtifactBundle {
    /// The trained classifier
    pub model: Forest,

    /// The fitted encoders, one per column
    pub encoders: EncoderSet,
}

impl ArtifactBundle {
    /// Persist the bundle under the given directory, replacing any previous
    /// training run
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let dir = dir.as_ref();

        fs::create_dir_all(dir)?;

        write_blob(&dir.join(MODEL_FILE), &self.model)?;
        write_blob(&dir.join(ENCODERS_FILE), &self.encoders)?;

        Ok(())
    }

    /// Load the bundle from the given directory, validating that the encoder
    /// set covers the fixed feature schema
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();

        let model: Forest = read_blob(&dir.join(MODEL_FILE))?;
        let encoders: EncoderSet = read_blob(&dir.join(ENCODERS_FILE))?;

        for attribute in Attribute::ALL {
            if encoders.feature(attribute).is_empty() {
                return Err(ArtifactError::EmptyEncoder(attribute.as_str()));
            }
        }

        if encoders.class.is_empty() {
            return Err(ArtifactError::EmptyEncoder(crate::schema::TARGET));
        }

        Ok(Self { model, encoders })
    }
}

fn write_blob<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path)?;

    serde_json::to_writer(BufWriter::new(file), value).map_err(|source| ArtifactError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

fn read_blob<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }

    let file = File::open(path)?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// A failure to persist or restore the artifact bundle, fatal at startup
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    /// An artifact file is absent
    #[error("artifact file not found: {0} (run the trainer first)")]
    Missing(PathBuf),

    /// An artifact file could not be decoded
    #[error("failed to decode artifact {path}: {source}")]
    Corrupt {
        /// The offending file
        path: PathBuf,

        /// The underlying decode failure
        source: serde_json::Error,
    },

    /// An artifact could not be encoded
    #[error("failed to encode artifact {path}: {source}")]
    Encode {
        /// The offending file
        path: PathBuf,

        /// The underlying encode failure
        source: serde_json::Error,
    },

    /// An encoder with no categories cannot serve predictions
    #[error("the encoder for {0} has no categories")]
    EmptyEncoder(&'static str),

    /// The artifact directory could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{datasets::car, training};

    use super::*;

    #[test]
    fn save_then_load_round_trips_the_bundle() {
        let dataset = car::Dataset::from_reader(training::tests::FIXTURE.as_bytes()).unwrap();
        let bundle = training::fit(&dataset, &training::tests::config()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        bundle.save(dir.path()).unwrap();

        let restored = ArtifactBundle::load(dir.path()).unwrap();

        assert_eq!(restored.encoders, bundle.encoders);
    }

    #[test]
    fn a_missing_artifact_fails_fast() {
        let dir = tempfile::tempdir().unwrap();

        let result = ArtifactBundle::load(dir.path());

        assert!(matches!(result, Err(ArtifactError::Missing(_))));
    }

    #[test]
    fn a_corrupt_artifact_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), "not json").unwrap();
        std::fs::write(dir.path().join(ENCODERS_FILE), "{}").unwrap();

        let result = ArtifactBundle::load(dir.path());

        assert!(matches!(result, Err(ArtifactError::Corrupt { .. })));
    }
}
