use std::fmt::Display;

use crate::{
    annotation::{Annotator, PreAnnotated, Rules},
    error,
};

/// The unique string token that identifies the rule-based annotator
pub static RULES: &str = "rules";

/// The unique string token that identifies the pre-annotated table replay
pub static PRE_ANNOTATED: &str = "pre-annotated";

/// Available Annotators
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Annotators {
    /// Heuristic tagging over the BERT pre-tokenizer
    Rules,

    /// Annotations exported by an external NLP toolkit
    PreAnnotated,
}

impl Annotators {
    /// Pick an annotator by name, defaulting to a replay when an annotations table is given and
    /// to the rules otherwise
    pub fn select(name: Option<&str>, annotations: Option<&str>) -> Result<Self, AnnotatorError> {
        match (name, annotations) {
            (Some(name), _) => Self::try_from(name),
            (None, Some(_)) => Ok(Annotators::PreAnnotated),
            (None, None) => Ok(Annotators::Rules),
        }
    }

    /// Build the annotator, loading the annotations table when one is needed
    pub fn init(&self, annotations: Option<&str>) -> Result<Box<dyn Annotator>, AnnotatorError> {
        match self {
            Annotators::Rules => Ok(Box::new(Rules)),
            Annotators::PreAnnotated => {
                let path = annotations.ok_or(AnnotatorError::MissingAnnotations)?;

                Ok(Box::new(PreAnnotated::from_csv(path)?))
            }
        }
    }
}

impl TryFrom<&str> for Annotators {
    type Error = AnnotatorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.to_lowercase();

        if value == RULES {
            Ok(Annotators::Rules)
        } else if value == PRE_ANNOTATED {
            Ok(Annotators::PreAnnotated)
        } else {
            Err(AnnotatorError::Unknown(value))
        }
    }
}

impl Display for Annotators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Annotators::Rules => RULES,
            Annotators::PreAnnotated => PRE_ANNOTATED,
        };

        write!(f, "{}", name)
    }
}

/// Annotator Error
#[derive(thiserror::Error, Debug)]
pub enum AnnotatorError {
    /// No annotator found for the given string
    #[error("no annotator found for {0}")]
    Unknown(String),

    /// The replay annotator was chosen without an annotations table
    #[error("the pre-annotated annotator needs an annotations table (--annotations FILE)")]
    MissingAnnotations,

    /// The annotations table could not be loaded
    #[error(transparent)]
    Load(#[from] error::Error),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn annotations_table_selects_the_replay() {
        assert_eq!(Annotators::select(None, None).unwrap(), Annotators::Rules);
        assert_eq!(
            Annotators::select(None, Some("annotations.csv")).unwrap(),
            Annotators::PreAnnotated
        );
        assert_eq!(
            Annotators::select(Some("Rules"), Some("annotations.csv")).unwrap(),
            Annotators::Rules
        );
    }

    #[test]
    fn names_round_trip() {
        for annotator in [Annotators::Rules, Annotators::PreAnnotated] {
            let name = annotator.to_string();
            assert_eq!(Annotators::try_from(name.as_str()).unwrap(), annotator);
        }

        assert!(matches!(
            Annotators::try_from("spacy"),
            Err(AnnotatorError::Unknown(_))
        ));
    }

    #[test]
    fn replay_requires_a_table() {
        assert!(matches!(
            Annotators::PreAnnotated.init(None),
            Err(AnnotatorError::MissingAnnotations)
        ));
    }
}
