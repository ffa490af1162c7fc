use std::path::Path;

use crate::{
    annotation::Annotator,
    error::{Error, Result},
    vocabulary::Vocabulary,
};

use super::record::{self, Popularity, TokenRecord};

/// Derives a feature record for every token of every text
pub struct Extractor<A: Annotator> {
    /// Popular words used for the membership flags
    vocabulary: Vocabulary,

    /// Tokenization and linguistic annotation
    annotator: A,
}

impl<A: Annotator> Extractor<A> {
    /// Creates an extractor over an in-memory vocabulary
    pub fn new(vocabulary: Vocabulary, annotator: A) -> Self {
        Self {
            vocabulary,
            annotator,
        }
    }

    /// Creates an extractor from a vocabulary artifact, failing before any text is processed
    /// if the artifact is missing or malformed
    pub fn from_artifact<P: AsRef<Path>>(vocabulary: P, annotator: A) -> Result<Self> {
        let vocabulary = Vocabulary::load(vocabulary)?;

        log::debug!("Vocabulary holds {} popular words", vocabulary.len());

        Ok(Self::new(vocabulary, annotator))
    }

    /// Records for the tokens of a single text
    pub fn process_text(&self, text: &str) -> Result<Vec<TokenRecord>> {
        let tokens = self.annotator.annotate(text)?;

        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| -> Result<TokenRecord> {
                let head = tokens.get(token.head).ok_or_else(|| {
                    Error::Annotation(format!(
                        "head {} of '{}' is outside the sequence",
                        token.head, token.text
                    ))
                })?;

                let prev = i.checked_sub(1).and_then(|p| tokens.get(p));
                let next = tokens.get(i + 1);

                let (prefixes, suffixes) = record::affixes(&token.text);

                Ok(TokenRecord {
                    token: token.text.clone(),
                    capitalized: record::capitalized(&token.text),
                    word_shape: record::word_shape(&token.text),
                    contains_digit: record::contains_digit(&token.text),
                    prefixes,
                    suffixes,
                    pos: token.pos.clone(),
                    dep_tag: token.dep.clone(),
                    head_text: head.text.clone(),
                    is_chunk: token.ent_iob.clone(),
                    prev_word: prev.map(|t| t.text.clone()),
                    prev_pos: prev.map(|t| t.pos.clone()),
                    next_word: next.map(|t| t.text.clone()),
                    next_pos: next.map(|t| t.pos.clone()),
                    popularity: Popularity::of(&self.vocabulary, &token.text),
                })
            })
            .collect()
    }

    /// Records for every token of every text, concatenated in input order
    pub fn extract<I, S>(&self, texts: I) -> Result<Vec<TokenRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        let mut n_texts = 0;

        for text in texts {
            records.extend(self.process_text(text.as_ref())?);
            n_texts += 1;
        }

        log::info!("Extracted {} token records from {} texts", records.len(), n_texts);

        Ok(records)
    }
}
