use std::borrow::Cow;

use crate::{features::TokenRecord, vocabulary::Category};

/// Category standing in for absent context (before the first or after the last token)
pub static NONE: &str = "<none>";

/// Feature columns one-hot encoded by the encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Categorical {
    /// Word shape
    WordShape,
    /// Part-of-speech tag
    Pos,
    /// Dependency tag
    DepTag,
    /// Text of the syntactic head
    HeadText,
    /// Previous token text
    PrevWord,
    /// Previous token part-of-speech
    PrevPos,
    /// Next token text
    NextWord,
    /// Next token part-of-speech
    NextPos,
    /// Space-joined prefixes
    Prefixes,
    /// Space-joined suffixes
    Suffixes,
    /// Entity IOB code
    IsChunk,
}

impl Categorical {
    /// Every categorical column, in encoding order
    pub const ALL: [Categorical; 11] = [
        Categorical::WordShape,
        Categorical::Pos,
        Categorical::DepTag,
        Categorical::HeadText,
        Categorical::PrevWord,
        Categorical::PrevPos,
        Categorical::NextWord,
        Categorical::NextPos,
        Categorical::Prefixes,
        Categorical::Suffixes,
        Categorical::IsChunk,
    ];

    /// The column name
    pub fn name(&self) -> &'static str {
        match self {
            Categorical::WordShape => "word_shape",
            Categorical::Pos => "POS",
            Categorical::DepTag => "dep_tag",
            Categorical::HeadText => "head_text",
            Categorical::PrevWord => "prev_word",
            Categorical::PrevPos => "prev_POS",
            Categorical::NextWord => "next_word",
            Categorical::NextPos => "next_POS",
            Categorical::Prefixes => "prefixes",
            Categorical::Suffixes => "suffixes",
            Categorical::IsChunk => "is_chunk",
        }
    }

    /// The record's value for this column, with list fields flattened to one string
    pub fn value<'a>(&self, record: &'a TokenRecord) -> Cow<'a, str> {
        let optional =
            |value: &'a Option<String>| -> Cow<'a, str> { value.as_deref().unwrap_or(NONE).into() };

        match self {
            Categorical::WordShape => record.word_shape.as_str().into(),
            Categorical::Pos => record.pos.as_str().into(),
            Categorical::DepTag => record.dep_tag.as_str().into(),
            Categorical::HeadText => record.head_text.as_str().into(),
            Categorical::PrevWord => optional(&record.prev_word),
            Categorical::PrevPos => optional(&record.prev_pos),
            Categorical::NextWord => optional(&record.next_word),
            Categorical::NextPos => optional(&record.next_pos),
            // Joining drops the position of each affix within its list
            Categorical::Prefixes => record.prefixes.join(" ").into(),
            Categorical::Suffixes => record.suffixes.join(" ").into(),
            Categorical::IsChunk => record.is_chunk.as_str().into(),
        }
    }
}

/// Feature columns passed through unchanged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Numeric {
    /// First character is uppercase
    Capitalized,
    /// Any character is a digit
    ContainsDigit,
    /// Membership in a vocabulary category
    Popular(Category),
}

impl Numeric {
    /// Every numeric column, in encoding order
    pub fn all() -> Vec<Numeric> {
        [Numeric::Capitalized, Numeric::ContainsDigit]
            .into_iter()
            .chain(Category::ALL.into_iter().map(Numeric::Popular))
            .collect()
    }

    /// The column name
    pub fn name(&self) -> &'static str {
        match self {
            Numeric::Capitalized => "capitalized",
            Numeric::ContainsDigit => "contains_digit",
            Numeric::Popular(category) => category.flag(),
        }
    }

    /// The record's value for this column
    pub fn value(&self, record: &TokenRecord) -> f32 {
        let value = match self {
            Numeric::Capitalized => record.capitalized,
            Numeric::ContainsDigit => record.contains_digit,
            Numeric::Popular(category) => record.popularity.get(*category),
        };

        f32::from(value)
    }
}
