use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Heuristic annotation built on the BERT pre-tokenizer
pub mod rules;

/// Replay of annotations exported by an external toolkit
pub mod preannotated;

pub use preannotated::PreAnnotated;
pub use rules::Rules;

/// Entity IOB code for a token that begins an entity span
pub static IOB_BEGIN: &str = "B";

/// Entity IOB code for a token inside an entity span
pub static IOB_INSIDE: &str = "I";

/// Entity IOB code for a token outside any entity span
pub static IOB_OUTSIDE: &str = "O";

/// A token with its linguistic annotations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Token {
    /// The token text
    pub text: String,

    /// Coarse part-of-speech tag (e.g., "PROPN")
    pub pos: String,

    /// Dependency relation to the head (e.g., "nsubj")
    pub dep: String,

    /// Index of the syntactic head within the same sequence; a root points at itself
    pub head: usize,

    /// Entity IOB code ("B", "I" or "O")
    pub ent_iob: String,
}

/// Turns a text into an ordered sequence of annotated tokens
pub trait Annotator {
    /// Annotate a single text
    fn annotate(&self, text: &str) -> Result<Vec<Token>>;
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        (**self).annotate(text)
    }
}

impl<A: Annotator + ?Sized> Annotator for &A {
    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        (**self).annotate(text)
    }
}
