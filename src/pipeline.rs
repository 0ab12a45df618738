use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::{
    artifacts::ArtifactBundle,
    schema::{Attribute, RawSubmission},
};

lazy_static! {
    /// Human-readable display strings for the raw class labels
    static ref FRIENDLY_LABELS: HashMap<&'static str, &'static str> = [
        ("unacc", "Unacceptable Car"),
        ("acc", "Acceptable Car"),
        ("good", "Good Car"),
        ("vgood", "Very Good Car"),
    ]
    .iter()
    .copied()
    .collect();
}

/// Render a raw class label for display; unknown labels pass through
/// unchanged
pub fn friendly_label(raw: &str) -> String {
    FRIENDLY_LABELS
        .get(raw)
        .map(|label| (*label).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// A successful classification
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prediction {
    /// The predicted class code
    pub code: u32,

    /// The raw class label decoded from the code
    pub raw_label: String,

    /// The human-readable rendering of the label
    pub display: String,
}

/// The classification pipeline over a loaded artifact bundle
///
/// Read-only after construction, so it can be shared across concurrent
/// requests without locking.
pub struct Classifier {
    bundle: ArtifactBundle,
}

impl Classifier {
    /// Wrap a loaded artifact bundle
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self { bundle }
    }

    /// Classify one submission: trim and encode every attribute in schema
    /// order, predict, and decode the class
    ///
    /// The first attribute that is missing or carries an unknown value fails
    /// the whole request; there are no partial results.
    pub fn classify(&self, submission: &RawSubmission) -> Result<Prediction, PipelineError> {
        let mut codes = Vec::with_capacity(Attribute::ALL.len());

        for attribute in Attribute::ALL {
            let raw = submission
                .get(attribute)
                .ok_or(PipelineError::MissingField(attribute))?;

            let value = raw.trim();

            let code = self
                .bundle
                .encoders
                .feature(attribute)
                .encode(value)
                .ok_or_else(|| PipelineError::UnknownCategory {
                    attribute,
                    value: value.to_string(),
                })?;

            codes.push(f64::from(code));
        }

        debug!("Encoded input: {codes:?}");

        let features = DenseMatrix::from_2d_vec(&vec![codes]);

        let code = self
            .bundle
            .model
            .predict(&features)?
            .first()
            .copied()
            .ok_or(PipelineError::NoPrediction)?;

        let raw_label = self
            .bundle
            .encoders
            .class
            .decode(code)
            .ok_or(PipelineError::UnknownClassCode(code))?
            .to_string();

        debug!("Raw prediction: {code} ({raw_label})");

        let display = friendly_label(&raw_label);

        Ok(Prediction {
            code,
            raw_label,
            display,
        })
    }

    /// The complete set of valid category values for every attribute, in
    /// schema order, for presenting closed-choice inputs
    pub fn options(&self) -> Vec<(Attribute, &[String])> {
        Attribute::ALL
            .iter()
            .map(|&attribute| (attribute, self.bundle.encoders.feature(attribute).labels()))
            .collect()
    }
}

/// A request-scoped classification failure; the service stays healthy
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A required attribute was absent from the submission
    #[error("missing value for {0}")]
    MissingField(Attribute),

    /// A submitted value is not among the attribute's known labels
    #[error("invalid input for {attribute}: {value}")]
    UnknownCategory {
        /// The offending attribute
        attribute: Attribute,

        /// The submitted value
        value: String,
    },

    /// The underlying model failed to predict
    #[error("prediction failed: {0}")]
    Prediction(#[from] smartcore::error::Failed),

    /// The model returned no class code at all
    #[error("the model returned no prediction")]
    NoPrediction,

    /// The model produced a code the class encoder does not know
    #[error("the model produced an unknown class code: {0}")]
    UnknownClassCode(u32),
}
