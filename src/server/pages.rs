use serde::Serialize;

use crate::{
    pipeline::{Classifier, PipelineError, Prediction},
    schema::RawSubmission,
};

/// The form page, rendered for both GET and POST
pub static TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Car Acceptability</title>
  </head>
  <body>
    <h1>Car Acceptability</h1>
    <form method="post" action="/">
      {% for attribute in attributes %}
      <p>
        <label for="{{ attribute.name }}">{{ attribute.label }}</label>
        <select id="{{ attribute.name }}" name="{{ attribute.name }}">
          {% for choice in attribute.choices %}
          <option value="{{ choice }}"{% if choice == attribute.selected %} selected{% endif %}>{{ choice }}</option>
          {% endfor %}
        </select>
      </p>
      {% endfor %}
      <button type="submit">Classify</button>
    </form>
    {% if prediction %}
    <p class="prediction">Prediction: {{ prediction }}</p>
    {% endif %}
    {% if error %}
    <p class="error">Error: {{ error }}</p>
    {% endif %}
  </body>
</html>
"#;

/// The model behind the form page
#[derive(Debug, Serialize)]
pub struct Page {
    /// The friendly prediction, when classification succeeded
    pub prediction: Option<String>,

    /// The validation error message, when it did not
    pub error: Option<String>,

    /// One dropdown per attribute, in schema order
    pub attributes: Vec<AttributeView>,
}

/// One dropdown: the full set of valid choices plus the echoed selection
#[derive(Debug, Serialize)]
pub struct AttributeView {
    /// The form field name
    pub name: String,

    /// The human-readable label
    pub label: String,

    /// The value the requester submitted, empty on a fresh form
    pub selected: String,

    /// Every valid category value for the attribute
    pub choices: Vec<String>,
}

impl Page {
    /// An empty form with every dropdown populated
    pub fn form(classifier: &Classifier) -> Self {
        Self::build(classifier, &RawSubmission::default(), None, None)
    }

    /// The page for a successful classification, echoing the submission
    pub fn with_prediction(
        classifier: &Classifier,
        submission: &RawSubmission,
        prediction: &Prediction,
    ) -> Self {
        Self::build(
            classifier,
            submission,
            Some(prediction.display.clone()),
            None,
        )
    }

    /// The page for a rejected submission, echoing what was submitted
    pub fn with_error(
        classifier: &Classifier,
        submission: &RawSubmission,
        error: &PipelineError,
    ) -> Self {
        Self::build(classifier, submission, None, Some(error.to_string()))
    }

    fn build(
        classifier: &Classifier,
        submission: &RawSubmission,
        prediction: Option<String>,
        error: Option<String>,
    ) -> Self {
        let attributes = classifier
            .options()
            .into_iter()
            .map(|(attribute, choices)| AttributeView {
                name: attribute.as_str().to_string(),
                label: attribute.display_name().to_string(),
                selected: submission
                    .get(attribute)
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default(),
                choices: choices.to_vec(),
            })
            .collect();

        Self {
            prediction,
            error,
            attributes,
        }
    }
}

/// Render the page through the parsed template
pub fn render(template: &liquid::Template, page: &Page) -> Result<String, liquid::Error> {
    let globals = liquid::model::to_object(page)?;

    template.render(&globals)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{datasets::car, schema::Attribute, training};

    use super::*;

    fn classifier() -> Classifier {
        let dataset = car::Dataset::from_reader(training::tests::FIXTURE.as_bytes()).unwrap();

        Classifier::new(training::fit(&dataset, &training::tests::config()).unwrap())
    }

    fn template() -> liquid::Template {
        liquid::ParserBuilder::with_stdlib()
            .build()
            .unwrap()
            .parse(TEMPLATE)
            .unwrap()
    }

    fn submission() -> RawSubmission {
        RawSubmission {
            buying: Some("vhigh".to_string()),
            maint: Some("vhigh".to_string()),
            doors: Some("2".to_string()),
            persons: Some("2".to_string()),
            lug_boot: Some("small".to_string()),
            safety: Some("low".to_string()),
        }
    }

    #[test]
    fn the_empty_form_lists_every_dropdown() {
        let classifier = classifier();
        let html = render(&template(), &Page::form(&classifier)).unwrap();

        for attribute in Attribute::ALL {
            assert!(html.contains(&format!("name=\"{attribute}\"")));
            assert!(html.contains(attribute.display_name()));
        }

        assert!(html.contains("<option value=\"5more\""));
        assert!(!html.contains("Prediction:"));
        assert!(!html.contains("Error:"));
    }

    #[test]
    fn a_prediction_page_echoes_the_selection() {
        let classifier = classifier();
        let prediction = classifier.classify(&submission()).unwrap();

        let page = Page::with_prediction(&classifier, &submission(), &prediction);
        let html = render(&template(), &page).unwrap();

        assert!(html.contains(&format!("Prediction: {}", prediction.display)));
        assert!(html.contains("<option value=\"vhigh\" selected>"));
    }

    #[test]
    fn an_error_page_carries_the_message_and_the_submission() {
        let classifier = classifier();

        let mut invalid = submission();
        invalid.buying = Some("extreme".to_string());

        let error = classifier.classify(&invalid).unwrap_err();
        let html = render(&template(), &Page::with_error(&classifier, &invalid, &error)).unwrap();

        assert!(html.contains("Error: invalid input for buying: extreme"));
        assert!(html.contains("<option value=\"small\" selected>"));
    }

    #[test]
    fn the_echoed_selection_is_trimmed() {
        let classifier = classifier();

        let mut padded = submission();
        padded.doors = Some(" 2 ".to_string());

        let page = Page::build(&classifier, &padded, None, None);
        let doors = page
            .attributes
            .iter()
            .find(|view| view.name == "doors")
            .unwrap();

        assert_eq!(doors.selected, "2");
    }
}
