use std::{io, path::Path};

use derive_new::new;
use serde::{Deserialize, Serialize};

/// The name of the Car Evaluation dataset
pub static DATASET: &str = "car-evaluation";

/// The canonical source for the dataset
pub static DEFAULT_SOURCE: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/car/car.data";

/// The number of columns every record must carry: six features plus the class
pub const COLUMNS: usize = 7;

/// One record of the Car Evaluation dataset, all values categorical strings
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// Buying price
    pub buying: String,

    /// Maintenance cost
    pub maint: String,

    /// Number of doors
    pub doors: String,

    /// Passenger capacity
    pub persons: String,

    /// Luggage boot size
    pub lug_boot: String,

    /// Safety rating
    pub safety: String,

    /// The acceptability class
    pub class: String,
}

/// The Car Evaluation dataset held in memory
#[derive(Debug)]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    /// Load the dataset from a source, either a URL or a local file path
    pub async fn load(source: &str) -> Result<Self, DatasetError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::fetch(source).await
        } else {
            let text = tokio::fs::read_to_string(Path::new(source)).await?;

            Ok(Self::from_reader(text.as_bytes())?)
        }
    }

    /// Fetch the dataset over HTTP
    pub async fn fetch(url: &str) -> Result<Self, DatasetError> {
        let body = reqwest::get(url).await?.error_for_status()?.text().await?;

        Ok(Self::from_reader(body.as_bytes())?)
    }

    /// Parse the dataset from a headerless comma-separated reader
    pub fn from_reader(reader: impl io::Read) -> Result<Self, SchemaError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut items = Vec::new();

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;

            if record.len() != COLUMNS {
                return Err(SchemaError::ColumnCount {
                    record: index + 1,
                    found: record.len(),
                });
            }

            items.push(Item::new(
                record[0].to_string(),
                record[1].to_string(),
                record[2].to_string(),
                record[3].to_string(),
                record[4].to_string(),
                record[5].to_string(),
                record[6].to_string(),
            ));
        }

        if items.is_empty() {
            return Err(SchemaError::Empty);
        }

        Ok(Self { items })
    }

    /// The records of the dataset
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A violation of the fixed 7-column schema, fatal at training time
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    /// A record with the wrong number of columns
    #[error("record {record} has {found} columns, expected {COLUMNS}")]
    ColumnCount {
        /// The 1-based record number
        record: usize,

        /// The number of columns found
        found: usize,
    },

    /// The table could not be read at all
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    /// The table holds no records
    #[error("dataset is empty")]
    Empty,
}

/// A failure to retrieve the dataset from its source
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The source could not be fetched
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),

    /// The source file could not be read
    #[error("failed to read dataset file: {0}")]
    Io(#[from] io::Error),

    /// The retrieved table violates the schema
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_headerless_records() {
        let data = "\
vhigh,vhigh,2,2,small,low,unacc
low,med,4,more,big,high,vgood
";

        let dataset = Dataset::from_reader(data.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.items()[0].buying, "vhigh");
        assert_eq!(dataset.items()[1].class, "vgood");
    }

    #[test]
    fn rejects_records_with_the_wrong_column_count() {
        let data = "\
vhigh,vhigh,2,2,small,low,unacc
low,med,4,more,big
";

        let result = Dataset::from_reader(data.as_bytes());

        match result {
            Err(SchemaError::ColumnCount { record, found }) => {
                assert_eq!(record, 2);
                assert_eq!(found, 5);
            }
            other => panic!("expected a column count violation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_an_empty_table() {
        let result = Dataset::from_reader("".as_bytes());

        assert!(matches!(result, Err(SchemaError::Empty)));
    }
}
