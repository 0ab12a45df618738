use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{datasets::car, schema::Attribute};

/// A bidirectional mapping between the string labels of one categorical
/// attribute and dense integer codes `0..k-1`
///
/// Labels are sorted lexicographically at fit time, so codes are a pure
/// function of the observed label set. Immutable once fitted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    labels: Vec<String>,
}

impl CategoryEncoder {
    /// Fit an encoder over the distinct values observed in one column
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();

        Self {
            labels: distinct.into_iter().collect(),
        }
    }

    /// Encode a label to its integer code, or `None` if the label was never
    /// observed at fit time
    pub fn encode(&self, label: &str) -> Option<u32> {
        self.labels
            .iter()
            .position(|known| known == label)
            .map(|index| index as u32)
    }

    /// Decode an integer code back to its label
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.labels.get(code as usize).map(String::as_str)
    }

    /// The full set of known labels, in code order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The number of known labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the encoder knows no labels at all
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One fitted encoder per feature attribute, plus one for the target
///
/// Coverage of the schema is structural: a bundle that deserializes without
/// every field is rejected before the service starts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EncoderSet {
    /// Buying price
    pub buying: CategoryEncoder,

    /// Maintenance cost
    pub maint: CategoryEncoder,

    /// Number of doors
    pub doors: CategoryEncoder,

    /// Passenger capacity
    pub persons: CategoryEncoder,

    /// Luggage boot size
    pub lug_boot: CategoryEncoder,

    /// Safety rating
    pub safety: CategoryEncoder,

    /// The target class
    pub class: CategoryEncoder,
}

impl EncoderSet {
    /// Fit one encoder per column over a dataset
    pub fn fit(items: &[car::Item]) -> Self {
        Self {
            buying: CategoryEncoder::fit(items.iter().map(|item| &item.buying)),
            maint: CategoryEncoder::fit(items.iter().map(|item| &item.maint)),
            doors: CategoryEncoder::fit(items.iter().map(|item| &item.doors)),
            persons: CategoryEncoder::fit(items.iter().map(|item| &item.persons)),
            lug_boot: CategoryEncoder::fit(items.iter().map(|item| &item.lug_boot)),
            safety: CategoryEncoder::fit(items.iter().map(|item| &item.safety)),
            class: CategoryEncoder::fit(items.iter().map(|item| &item.class)),
        }
    }

    /// The encoder for a feature attribute
    pub fn feature(&self, attribute: Attribute) -> &CategoryEncoder {
        match attribute {
            Attribute::Buying => &self.buying,
            Attribute::Maint => &self.maint,
            Attribute::Doors => &self.doors,
            Attribute::Persons => &self.persons,
            Attribute::LugBoot => &self.lug_boot,
            Attribute::Safety => &self.safety,
        }
    }
}
