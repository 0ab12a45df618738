use std::path::Path;

use crate::{artifacts::ArtifactBundle, pipeline::Classifier};

use super::pages;

/// Everything a request handler needs, constructed once at startup and shared
/// read-only across requests
pub struct Context {
    /// The classification pipeline over the loaded artifact bundle
    pub classifier: Classifier,

    /// The parsed form page template
    pub template: liquid::Template,
}

impl Context {
    /// Load the artifact bundle and parse the page template, failing fast if
    /// either is unusable
    pub fn load(artifact_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let bundle = ArtifactBundle::load(artifact_dir)?;

        let template = liquid::ParserBuilder::with_stdlib()
            .build()?
            .parse(pages::TEMPLATE)?;

        Ok(Self {
            classifier: Classifier::new(bundle),
            template,
        })
    }
}
