use std::collections::HashSet;

use lazy_static::lazy_static;
use tokenizers::{
    pre_tokenizers::bert::BertPreTokenizer, OffsetReferential, OffsetType, PreTokenizedString,
    PreTokenizer,
};

use crate::error::{Error, Result};

use super::{Annotator, Token, IOB_BEGIN, IOB_INSIDE, IOB_OUTSIDE};

lazy_static! {
    static ref DETERMINERS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any", "no",
        "another", "both", "all",
    ]
    .into_iter()
    .collect();
    static ref ADPOSITIONS: HashSet<&'static str> = [
        "in", "on", "at", "for", "of", "from", "to", "with", "by", "into", "over", "under",
        "against", "after", "before", "during", "about", "through", "between", "without",
        "across", "near", "since", "until", "like", "as",
    ]
    .into_iter()
    .collect();
    static ref PRONOUNS: HashSet<&'static str> = [
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "his",
        "its", "their", "our", "my", "your", "who", "whom", "what", "which", "himself",
        "herself", "themselves",
    ]
    .into_iter()
    .collect();
    static ref AUXILIARIES: HashSet<&'static str> = [
        "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do",
        "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
        "must",
    ]
    .into_iter()
    .collect();
    static ref COORDINATORS: HashSet<&'static str> = ["and", "or", "but", "nor", "yet"].into_iter().collect();
    static ref SUBORDINATORS: HashSet<&'static str> =
        ["because", "although", "though", "while", "if", "when", "whereas", "unless", "whether"]
            .into_iter()
            .collect();
    static ref PARTICLES: HashSet<&'static str> = ["not"].into_iter().collect();
}

/// Heuristic annotator: tokenizes with the BERT pre-tokenizer (whitespace and punctuation
/// splits), then tags with closed-class word lists, capitalization and suffix rules.
///
/// Entity spans are runs of proper nouns.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rules;

impl Rules {
    /// Split a text into word and punctuation tokens
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(text);

        BertPreTokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| Error::Annotation(e.to_string()))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(split, _, _)| split.to_string())
            .collect())
    }
}

impl Annotator for Rules {
    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        let words = self.tokenize(text)?;
        let tags = tag_sequence(&words);
        let arcs = parse(&tags);
        let chunks = chunk(&tags);

        Ok(words
            .into_iter()
            .zip(tags)
            .zip(arcs)
            .zip(chunks)
            .map(|(((text, pos), (dep, head)), iob)| {
                Token::new(text, pos.to_string(), dep.to_string(), head, iob.to_string())
            })
            .collect())
    }
}

fn is_noun(tag: &str) -> bool {
    matches!(tag, "NOUN" | "PROPN" | "PRON")
}

/// Assign a universal part-of-speech tag to every word
fn tag_sequence(words: &[String]) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = Vec::with_capacity(words.len());
    let mut verb_seen = false;

    for word in words {
        let prev = tags.last().copied();
        let tag = tag_word(word, prev, verb_seen);

        verb_seen |= tag == "VERB" || tag == "AUX";
        tags.push(tag);
    }

    tags
}

fn tag_word(word: &str, prev: Option<&str>, verb_seen: bool) -> &'static str {
    let lower = word.to_lowercase();

    if word.chars().all(|c| !c.is_alphanumeric()) {
        return "PUNCT";
    }

    if word.chars().any(|c| c.is_ascii_digit()) && !word.chars().any(char::is_alphabetic) {
        return "NUM";
    }

    let closed = [
        (&*AUXILIARIES, "AUX"),
        (&*DETERMINERS, "DET"),
        (&*ADPOSITIONS, "ADP"),
        (&*PRONOUNS, "PRON"),
        (&*COORDINATORS, "CCONJ"),
        (&*SUBORDINATORS, "SCONJ"),
        (&*PARTICLES, "PART"),
    ];

    if let Some((_, tag)) = closed.iter().find(|(set, _)| set.contains(lower.as_str())) {
        return *tag;
    }

    if word.chars().next().is_some_and(char::is_uppercase) {
        return "PROPN";
    }

    if lower.ends_with("ly") {
        return "ADV";
    }

    if lower.ends_with("ing") || lower.ends_with("ed") {
        return "VERB";
    }

    // A bare lowercase word right after the first subject is read as its verb
    if !verb_seen && prev.is_some_and(is_noun) {
        return "VERB";
    }

    if ["ful", "ous", "ive", "able", "ic", "al"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return "ADJ";
    }

    "NOUN"
}

/// Attach every token to a head with a shallow dependency relation
fn parse(tags: &[&str]) -> Vec<(&'static str, usize)> {
    if tags.is_empty() {
        return Vec::new();
    }

    let root = tags
        .iter()
        .position(|t| *t == "VERB")
        .or_else(|| tags.iter().position(|t| *t == "AUX"))
        .or_else(|| tags.iter().position(|t| is_noun(t)))
        .unwrap_or(0);

    let next_nominal = |from: usize| {
        tags.iter()
            .enumerate()
            .skip(from + 1)
            .find(|(_, t)| matches!(**t, "NOUN" | "PROPN"))
            .map(|(i, _)| i)
    };

    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            if i == root {
                return ("ROOT", i);
            }

            match *tag {
                "PUNCT" => ("punct", root),
                "DET" => ("det", next_nominal(i).unwrap_or(root)),
                "ADJ" => ("amod", next_nominal(i).unwrap_or(root)),
                "NUM" => ("nummod", next_nominal(i).unwrap_or(root)),
                "ADP" => ("prep", root),
                "AUX" => ("aux", root),
                "PART" => ("neg", root),
                "CCONJ" => ("cc", root),
                "SCONJ" => ("mark", root),
                "ADV" => ("advmod", root),
                "VERB" => ("conj", root),
                "NOUN" | "PROPN" | "PRON" => {
                    if tags.get(i + 1).is_some_and(|t| *t == *tag && *t != "PRON") {
                        return ("compound", i + 1);
                    }

                    let governor = tags[..i]
                        .iter()
                        .rposition(|t| !matches!(*t, "DET" | "ADJ" | "NUM"));

                    match governor {
                        Some(g) if tags[g] == "ADP" => ("pobj", g),
                        _ if i < root => ("nsubj", root),
                        _ => ("dobj", root),
                    }
                }
                _ => ("dep", root),
            }
        })
        .collect()
}

/// Entity IOB codes: every maximal run of proper nouns is one span
fn chunk(tags: &[&str]) -> Vec<&'static str> {
    let mut iob = Vec::with_capacity(tags.len());
    let mut inside = false;

    for tag in tags {
        if *tag == "PROPN" {
            iob.push(if inside { IOB_INSIDE } else { IOB_BEGIN });
            inside = true;
        } else {
            iob.push(IOB_OUTSIDE);
            inside = false;
        }
    }

    iob
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_words_and_punctuation() {
        let words = Rules.tokenize("Kane scored, again!").unwrap();

        assert_eq!(words, vec!["Kane", "scored", ",", "again", "!"]);
    }

    #[test]
    fn annotates_a_simple_sentence() {
        let tokens = Rules.annotate("Messi plays for Barcelona").unwrap();

        let pos: Vec<_> = tokens.iter().map(|t| t.pos.as_str()).collect();
        assert_eq!(pos, vec!["PROPN", "VERB", "ADP", "PROPN"]);

        let deps: Vec<_> = tokens.iter().map(|t| (t.dep.as_str(), t.head)).collect();
        assert_eq!(
            deps,
            vec![("nsubj", 1), ("ROOT", 1), ("prep", 1), ("pobj", 2)]
        );

        let iob: Vec<_> = tokens.iter().map(|t| t.ent_iob.as_str()).collect();
        assert_eq!(iob, vec!["B", "O", "O", "B"]);
    }

    #[test]
    fn proper_noun_runs_form_one_span() {
        let tokens = Rules.annotate("Real Madrid signed Jude Bellingham .").unwrap();

        let iob: Vec<_> = tokens.iter().map(|t| t.ent_iob.as_str()).collect();
        assert_eq!(iob, vec!["B", "I", "O", "B", "I", "O"]);

        assert_eq!(tokens[0].dep, "compound");
        assert_eq!(tokens[0].head, 1);
        assert_eq!(tokens[5].pos, "PUNCT");
    }

    #[test]
    fn closed_class_words_survive_tokenization() {
        let sets = [
            &*DETERMINERS,
            &*ADPOSITIONS,
            &*PRONOUNS,
            &*AUXILIARIES,
            &*COORDINATORS,
            &*SUBORDINATORS,
            &*PARTICLES,
        ];

        for word in sets.into_iter().flatten() {
            assert_eq!(Rules.tokenize(word).unwrap(), vec![word.to_string()]);
        }
    }

    #[test]
    fn negation_is_a_particle() {
        let tokens = Rules.annotate("Kane did not score").unwrap();

        assert_eq!(tokens[2].pos, "PART");
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(Rules.annotate("   ").unwrap().is_empty());
    }
}
