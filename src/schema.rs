use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The six categorical attributes the classifier consumes, in feature-vector
/// column order
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Attribute {
    /// Buying price
    Buying,

    /// Maintenance cost
    Maint,

    /// Number of doors
    Doors,

    /// Passenger capacity
    Persons,

    /// Luggage boot size
    LugBoot,

    /// Safety rating
    Safety,
}

impl Attribute {
    /// All attributes, in the fixed schema order used at both train and
    /// predict time
    pub const ALL: [Attribute; 6] = [
        Attribute::Buying,
        Attribute::Maint,
        Attribute::Doors,
        Attribute::Persons,
        Attribute::LugBoot,
        Attribute::Safety,
    ];

    /// The column name, as it appears in the dataset and the form fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Buying => "buying",
            Attribute::Maint => "maint",
            Attribute::Doors => "doors",
            Attribute::Persons => "persons",
            Attribute::LugBoot => "lug_boot",
            Attribute::Safety => "safety",
        }
    }

    /// A human-readable name for form labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Attribute::Buying => "Buying Price",
            Attribute::Maint => "Maintenance Cost",
            Attribute::Doors => "Number of Doors",
            Attribute::Persons => "Passenger Capacity",
            Attribute::LugBoot => "Luggage Boot Size",
            Attribute::Safety => "Safety Rating",
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The name of the target column
pub static TARGET: &str = "class";

/// A raw form submission, one optional value per attribute so that a missing
/// field is reported by the pipeline rather than rejected at the transport
/// layer
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RawSubmission {
    /// Buying price
    pub buying: Option<String>,

    /// Maintenance cost
    pub maint: Option<String>,

    /// Number of doors
    pub doors: Option<String>,

    /// Passenger capacity
    pub persons: Option<String>,

    /// Luggage boot size
    pub lug_boot: Option<String>,

    /// Safety rating
    pub safety: Option<String>,
}

impl RawSubmission {
    /// Return the submitted value for an attribute, if any
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Buying => self.buying.as_deref(),
            Attribute::Maint => self.maint.as_deref(),
            Attribute::Doors => self.doors.as_deref(),
            Attribute::Persons => self.persons.as_deref(),
            Attribute::LugBoot => self.lug_boot.as_deref(),
            Attribute::Safety => self.safety.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn attribute_order_matches_the_dataset_columns() {
        let names: Vec<_> = Attribute::ALL.iter().map(Attribute::as_str).collect();

        assert_eq!(
            names,
            vec!["buying", "maint", "doors", "persons", "lug_boot", "safety"]
        );
    }

    #[test]
    fn submission_lookup_covers_every_attribute() {
        let submission = RawSubmission {
            buying: Some("vhigh".to_string()),
            maint: Some("high".to_string()),
            doors: Some("2".to_string()),
            persons: Some("4".to_string()),
            lug_boot: Some("small".to_string()),
            safety: Some("low".to_string()),
        };

        for attribute in Attribute::ALL {
            assert!(submission.get(attribute).is_some(), "{attribute} missing");
        }

        assert_eq!(submission.get(Attribute::LugBoot), Some("small"));
        assert_eq!(RawSubmission::default().get(Attribute::Safety), None);
    }
}
