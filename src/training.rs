use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use smartcore::{
    ensemble::random_forest_classifier::{
        RandomForestClassifier, RandomForestClassifierParameters,
    },
    linalg::basic::matrix::DenseMatrix,
};

use crate::{artifacts::ArtifactBundle, datasets::car, encoders::EncoderSet, schema::Attribute};

/// Configuration for a training run
#[derive(Clone, Debug)]
pub struct Config {
    /// Where to read the dataset from, a URL or a local file path
    pub source: String,

    /// The directory to persist the artifact bundle under
    pub artifact_dir: String,

    /// The number of trees in the forest
    pub n_trees: u16,

    /// The seed shared by the shuffle split and the forest
    pub seed: u64,

    /// The fraction of records held out of training
    pub test_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: car::DEFAULT_SOURCE.to_string(),
            artifact_dir: "artifacts".to_string(),
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
        }
    }
}

/// Run a full training pass: fetch the dataset, fit encoders and classifier,
/// and persist the artifact bundle
pub async fn train(config: &Config) -> anyhow::Result<()> {
    info!(
        "Loading the {} dataset from {}",
        car::DATASET,
        config.source
    );

    let dataset = car::Dataset::load(&config.source).await?;

    info!("Loaded {} records", dataset.len());

    let bundle = fit(&dataset, config)?;

    bundle.save(&config.artifact_dir)?;

    info!("Model and encoders saved to {}/", config.artifact_dir);

    Ok(())
}

/// Fit the encoders and the classifier over a dataset
pub fn fit(dataset: &car::Dataset, config: &Config) -> anyhow::Result<ArtifactBundle> {
    let encoders = EncoderSet::fit(dataset.items());
    let (features, targets) = encode_table(dataset.items(), &encoders)?;

    let (train_rows, test_rows) = split_rows(dataset.len(), config.test_fraction, config.seed);

    ensure!(!train_rows.is_empty(), "the training partition is empty");

    let train_x = matrix(&features, &train_rows);
    let train_y: Vec<u32> = train_rows.iter().map(|&row| targets[row]).collect();

    info!(
        "Fitting a {}-tree forest on {} records (seed {})",
        config.n_trees,
        train_rows.len(),
        config.seed
    );

    let model = RandomForestClassifier::fit(
        &train_x,
        &train_y,
        RandomForestClassifierParameters::default()
            .with_n_trees(config.n_trees)
            .with_seed(config.seed),
    )?;

    // The held-out partition only informs the log line; serving never sees it
    if !test_rows.is_empty() {
        let test_x = matrix(&features, &test_rows);
        let test_y: Vec<u32> = test_rows.iter().map(|&row| targets[row]).collect();

        let predictions = model.predict(&test_x)?;
        let correct = predictions
            .iter()
            .zip(test_y.iter())
            .filter(|(predicted, actual)| predicted == actual)
            .count();

        info!(
            "Held-out accuracy: {:.3} ({} records)",
            correct as f64 / test_y.len() as f64,
            test_y.len()
        );
    }

    Ok(ArtifactBundle { model, encoders })
}

/// Replace every cell with its integer code, yielding a fully numeric table
fn encode_table(
    items: &[car::Item],
    encoders: &EncoderSet,
) -> anyhow::Result<(Vec<Vec<f64>>, Vec<u32>)> {
    let mut features = Vec::with_capacity(items.len());
    let mut targets = Vec::with_capacity(items.len());

    for item in items {
        let mut row = Vec::with_capacity(Attribute::ALL.len());

        for attribute in Attribute::ALL {
            let value = value_of(item, attribute);

            let code = encoders
                .feature(attribute)
                .encode(value)
                .ok_or_else(|| anyhow!("unencodable value for {attribute}: {value}"))?;

            row.push(f64::from(code));
        }

        let target = encoders
            .class
            .encode(&item.class)
            .ok_or_else(|| anyhow!("unencodable class: {}", item.class))?;

        features.push(row);
        targets.push(target);
    }

    Ok((features, targets))
}

fn value_of(item: &car::Item, attribute: Attribute) -> &str {
    match attribute {
        Attribute::Buying => &item.buying,
        Attribute::Maint => &item.maint,
        Attribute::Doors => &item.doors,
        Attribute::Persons => &item.persons,
        Attribute::LugBoot => &item.lug_boot,
        Attribute::Safety => &item.safety,
    }
}

/// Shuffle the row indexes with a seeded generator and split them into train
/// and test partitions
fn split_rows(count: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rows: Vec<usize> = (0..count).collect();
    rows.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_len = (count as f64 * test_fraction).round() as usize;
    let (test, train) = rows.split_at(test_len.min(count));

    (train.to_vec(), test.to_vec())
}

fn matrix(features: &[Vec<f64>], rows: &[usize]) -> DenseMatrix<f64> {
    let selected: Vec<Vec<f64>> = rows.iter().map(|&row| features[row].clone()).collect();

    DenseMatrix::from_2d_vec(&selected)
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// A hand-built table covering the full category domain of every column
    pub(crate) static FIXTURE: &str = "\
vhigh,vhigh,2,2,small,low,unacc
vhigh,high,3,4,med,med,acc
high,med,4,more,big,high,vgood
med,low,5more,4,med,high,good
low,low,4,more,big,med,good
low,med,2,2,small,low,unacc
med,vhigh,3,more,big,high,acc
high,high,5more,4,small,med,acc
vhigh,low,4,2,med,low,unacc
low,high,2,4,big,high,vgood
med,med,3,more,small,med,acc
high,vhigh,5more,more,med,low,unacc
";

    /// A small-forest configuration to keep test fits cheap
    pub(crate) fn config() -> Config {
        Config {
            n_trees: 5,
            ..Config::default()
        }
    }

    fn dataset() -> car::Dataset {
        car::Dataset::from_reader(FIXTURE.as_bytes()).unwrap()
    }

    #[test]
    fn the_split_is_deterministic_and_partitions_the_rows() {
        let (train_a, test_a) = split_rows(12, 0.2, 42);
        let (train_b, test_b) = split_rows(12, 0.2, 42);

        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 2);
        assert_eq!(train_a.len(), 10);

        let mut all: Vec<usize> = train_a.iter().chain(test_a.iter()).copied().collect();
        all.sort_unstable();

        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn the_encoded_table_is_fully_numeric() {
        let dataset = dataset();
        let encoders = EncoderSet::fit(dataset.items());

        let (features, targets) = encode_table(dataset.items(), &encoders).unwrap();

        assert_eq!(features.len(), 12);
        assert_eq!(targets.len(), 12);

        for row in &features {
            assert_eq!(row.len(), Attribute::ALL.len());
        }

        // First record: vhigh,vhigh,2,2,small,low,unacc
        assert_eq!(
            features[0],
            vec![
                f64::from(encoders.buying.encode("vhigh").unwrap()),
                f64::from(encoders.maint.encode("vhigh").unwrap()),
                f64::from(encoders.doors.encode("2").unwrap()),
                f64::from(encoders.persons.encode("2").unwrap()),
                f64::from(encoders.lug_boot.encode("small").unwrap()),
                f64::from(encoders.safety.encode("low").unwrap()),
            ]
        );
        assert_eq!(targets[0], encoders.class.encode("unacc").unwrap());
    }

    #[test]
    fn two_runs_with_the_same_seed_predict_identically() {
        let dataset = dataset();
        let config = config();

        let bundle_a = fit(&dataset, &config).unwrap();
        let bundle_b = fit(&dataset, &config).unwrap();

        let encoders = EncoderSet::fit(dataset.items());
        let (features, _) = encode_table(dataset.items(), &encoders).unwrap();
        let all_rows: Vec<usize> = (0..dataset.len()).collect();
        let x = matrix(&features, &all_rows);

        assert_eq!(
            bundle_a.model.predict(&x).unwrap(),
            bundle_b.model.predict(&x).unwrap()
        );
    }

    #[test]
    fn the_fitted_model_predicts_known_class_codes() {
        let dataset = dataset();
        let bundle = fit(&dataset, &config()).unwrap();

        let (features, _) = encode_table(dataset.items(), &bundle.encoders).unwrap();
        let all_rows: Vec<usize> = (0..dataset.len()).collect();

        let predictions = bundle.model.predict(&matrix(&features, &all_rows)).unwrap();

        for code in predictions {
            assert!(bundle.encoders.class.decode(code).is_some());
        }
    }
}
