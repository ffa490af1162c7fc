use std::{collections::HashMap, path::Path};

use crate::{
    datasets::Table,
    error::{Error, Result},
};

use super::{Annotator, Token};

/// Columns expected in a pre-annotated token table
pub static COLUMNS: [&str; 6] = ["text", "token", "pos", "dep", "head", "ent_iob"];

/// Replays token annotations produced offline by an external NLP toolkit.
///
/// The table holds one row per token; `text` repeats the source text on every row of its
/// tokens and `head` is the head's index within that text. A text annotated more than once
/// (a repeated row of the source table) starts a new run of rows whenever its next token cannot
/// be found after the previous one. Repeated runs must agree and are kept once.
#[derive(Clone, Debug, Default)]
pub struct PreAnnotated {
    documents: HashMap<String, Vec<Token>>,
}

/// The run of rows currently being collected for one text
struct Run {
    text: String,
    tokens: Vec<Token>,

    /// Byte offset in `text` just past the last matched token
    offset: usize,
}

impl Run {
    /// Start a run with its first token, which must occur in the text
    fn start(text: String, token: Token) -> Result<Self> {
        let offset = text
            .find(token.text.as_str())
            .map(|start| start + token.text.len())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "token '{}' does not occur in \"{}\"",
                    token.text, text
                ))
            })?;

        Ok(Self {
            text,
            tokens: vec![token],
            offset,
        })
    }

    /// Append a token when it continues this run, or hand it back
    fn extend(&mut self, text: &str, token: Token) -> Option<Token> {
        if text != self.text {
            return Some(token);
        }

        match self.text[self.offset..].find(token.text.as_str()) {
            Some(start) => {
                self.offset += start + token.text.len();
                self.tokens.push(token);

                None
            }
            None => Some(token),
        }
    }
}

/// Store a finished run, checking its heads and any earlier annotation of the same text
fn finish(documents: &mut HashMap<String, Vec<Token>>, run: Run) -> Result<()> {
    let Run { text, tokens, .. } = run;

    if let Some(token) = tokens.iter().find(|t| t.head >= tokens.len()) {
        return Err(Error::Configuration(format!(
            "head {} of '{}' is outside the {} tokens of \"{}\"",
            token.head,
            token.text,
            tokens.len(),
            text
        )));
    }

    match documents.get(&text) {
        Some(existing) if *existing == tokens => {
            log::debug!("Skipping a repeated annotation of \"{text}\"");

            Ok(())
        }
        Some(_) => Err(Error::Configuration(format!(
            "conflicting annotations for \"{text}\""
        ))),
        None => {
            documents.insert(text, tokens);

            Ok(())
        }
    }
}

impl PreAnnotated {
    /// Load annotations from a CSV table
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = Table::from_csv(path.as_ref())?;

        let columns = COLUMNS
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?;

        let mut documents: HashMap<String, Vec<Token>> = HashMap::new();
        let mut current: Option<Run> = None;

        for row in 0..table.len() {
            let value = |column: usize| columns[column][row].clone();

            let head = value(4).trim().parse::<usize>().map_err(|e| {
                Error::Configuration(format!(
                    "invalid head '{}' on row {} of {}: {}",
                    value(4),
                    row + 1,
                    path.as_ref().display(),
                    e
                ))
            })?;

            let text = value(0);
            let token = Token::new(value(1), value(2), value(3), head, value(5));

            let rest = match current.as_mut() {
                Some(run) => run.extend(&text, token),
                None => Some(token),
            };

            if let Some(token) = rest {
                if let Some(run) = current.take() {
                    finish(&mut documents, run)?;
                }

                current = Some(Run::start(text, token)?);
            }
        }

        if let Some(run) = current {
            finish(&mut documents, run)?;
        }

        log::info!(
            "Loaded annotations for {} texts from {}",
            documents.len(),
            path.as_ref().display()
        );

        Ok(Self { documents })
    }
}

impl Annotator for PreAnnotated {
    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        self.documents
            .get(text)
            .cloned()
            .ok_or_else(|| Error::Annotation(format!("no annotations for \"{text}\"")))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn groups_rows_by_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(
            &path,
            "text,token,pos,dep,head,ent_iob\n\
             Kane scored,Kane,PROPN,nsubj,1,B\n\
             Kane scored,scored,VERB,ROOT,1,O\n\
             Salah,Salah,PROPN,ROOT,0,B\n",
        )
        .unwrap();

        let annotator = PreAnnotated::from_csv(&path).unwrap();

        let tokens = annotator.annotate("Kane scored").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("Kane".into(), "PROPN".into(), "nsubj".into(), 1, "B".into()),
                Token::new("scored".into(), "VERB".into(), "ROOT".into(), 1, "O".into()),
            ]
        );
        assert_eq!(annotator.annotate("Salah").unwrap().len(), 1);
    }

    #[test]
    fn repeated_texts_keep_a_single_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(
            &path,
            "text,token,pos,dep,head,ent_iob\n\
             Kane scored,Kane,PROPN,nsubj,1,B\n\
             Kane scored,scored,VERB,ROOT,1,O\n\
             Kane scored,Kane,PROPN,nsubj,1,B\n\
             Kane scored,scored,VERB,ROOT,1,O\n",
        )
        .unwrap();

        let annotator = PreAnnotated::from_csv(&path).unwrap();

        let tokens: Vec<_> = annotator
            .annotate("Kane scored")
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(tokens, vec!["Kane", "scored"]);
    }

    #[test]
    fn repeated_words_stay_in_one_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(
            &path,
            "text,token,pos,dep,head,ent_iob\n\
             Kane to Kane,Kane,PROPN,ROOT,0,B\n\
             Kane to Kane,to,ADP,prep,0,O\n\
             Kane to Kane,Kane,PROPN,pobj,1,B\n",
        )
        .unwrap();

        let annotator = PreAnnotated::from_csv(&path).unwrap();

        assert_eq!(annotator.annotate("Kane to Kane").unwrap().len(), 3);
    }

    #[test]
    fn conflicting_repeats_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(
            &path,
            "text,token,pos,dep,head,ent_iob\n\
             Salah,Salah,PROPN,ROOT,0,B\n\
             Kane,Kane,PROPN,ROOT,0,B\n\
             Salah,Salah,NOUN,ROOT,0,O\n",
        )
        .unwrap();

        assert!(matches!(
            PreAnnotated::from_csv(&path),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn unknown_text_is_an_annotation_error() {
        let annotator = PreAnnotated::default();

        assert!(matches!(
            annotator.annotate("Haaland"),
            Err(Error::Annotation(_))
        ));
    }

    #[test]
    fn out_of_range_head_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(
            &path,
            "text,token,pos,dep,head,ent_iob\nSalah,Salah,PROPN,ROOT,3,B\n",
        )
        .unwrap();

        assert!(matches!(
            PreAnnotated::from_csv(&path),
            Err(Error::Configuration(_))
        ));
    }
}
