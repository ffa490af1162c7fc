use std::{fs, path::Path};

use crate::{
    datasets::Table,
    error::{Error, Result},
    vocabulary::Category,
};

use super::{record::Popularity, TokenRecord};

/// Leading columns of the extracted-features table; the category flags and `token` follow
const LEADING: [&str; 13] = [
    "capitalized",
    "word_shape",
    "contains_digit",
    "prefixes",
    "suffixes",
    "POS",
    "prev_word",
    "prev_POS",
    "next_word",
    "next_POS",
    "dep_tag",
    "head_text",
    "is_chunk",
];

/// Column header of the predicted label in the predictions table
pub static PREDICTED: &str = "predicted";

/// Header row of the extracted-features table
pub fn headers() -> Vec<&'static str> {
    LEADING
        .into_iter()
        .chain(Category::ALL.iter().map(Category::flag))
        .chain(["token"])
        .collect()
}

impl TokenRecord {
    /// The record as a flat row, aligned with [`headers`].
    ///
    /// Affix lists are space-joined and absent context is an empty cell.
    pub fn to_row(&self) -> Vec<String> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut row = vec![
            self.capitalized.to_string(),
            self.word_shape.clone(),
            self.contains_digit.to_string(),
            self.prefixes.join(" "),
            self.suffixes.join(" "),
            self.pos.clone(),
            optional(&self.prev_word),
            optional(&self.prev_pos),
            optional(&self.next_word),
            optional(&self.next_pos),
            self.dep_tag.clone(),
            self.head_text.clone(),
            self.is_chunk.clone(),
        ];

        row.extend(
            Category::ALL
                .iter()
                .map(|category| self.popularity.get(*category).to_string()),
        );
        row.push(self.token.clone());

        row
    }
}

fn create_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    Ok(csv::Writer::from_path(path)?)
}

/// Write token records as a flat CSV table, one row per token
pub fn write_records<P: AsRef<Path>>(path: P, records: &[TokenRecord]) -> Result<()> {
    let mut writer = create_writer(path.as_ref())?;

    writer.write_record(headers())?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;

    log::info!(
        "Extracted features are saved to '{}'",
        path.as_ref().display()
    );

    Ok(())
}

/// Write token records with their predicted labels appended as a final column
pub fn write_predictions<P: AsRef<Path>>(
    path: P,
    records: &[TokenRecord],
    labels: &[String],
) -> Result<()> {
    if records.len() != labels.len() {
        return Err(Error::Schema(format!(
            "{} records but {} predicted labels",
            records.len(),
            labels.len()
        )));
    }

    let mut writer = create_writer(path.as_ref())?;

    let mut header = headers();
    header.push(PREDICTED);
    writer.write_record(header)?;

    for (record, label) in records.iter().zip(labels) {
        let mut row = record.to_row();
        row.push(label.clone());
        writer.write_record(row)?;
    }
    writer.flush()?;

    log::info!("Predictions are saved to '{}'", path.as_ref().display());

    Ok(())
}

/// Read token records back from an extracted-features table
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<TokenRecord>> {
    let path = path.as_ref();
    let table = Table::from_csv(path)?;

    let columns = headers()
        .into_iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>>>()?;

    let flag = |value: &str, column: &str, row: usize| -> Result<u8> {
        match value.trim() {
            "0" => Ok(0),
            "1" => Ok(1),
            other => Err(Error::Schema(format!(
                "{column} must be 0 or 1 on row {} of {}, found '{other}'",
                row + 1,
                path.display()
            ))),
        }
    };

    let split = |value: &str| -> Vec<String> { value.split_whitespace().map(String::from).collect() };
    let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());

    (0..table.len())
        .map(|row| -> Result<TokenRecord> {
            let cell = |column: usize| columns[column][row].as_str();

            let mut popularity = Popularity::default();
            for (offset, category) in Category::ALL.into_iter().enumerate() {
                let column = LEADING.len() + offset;
                popularity.set(category, flag(cell(column), category.flag(), row)?);
            }

            Ok(TokenRecord {
                capitalized: flag(cell(0), LEADING[0], row)?,
                word_shape: cell(1).to_string(),
                contains_digit: flag(cell(2), LEADING[2], row)?,
                prefixes: split(cell(3)),
                suffixes: split(cell(4)),
                pos: cell(5).to_string(),
                prev_word: optional(cell(6)),
                prev_pos: optional(cell(7)),
                next_word: optional(cell(8)),
                next_pos: optional(cell(9)),
                dep_tag: cell(10).to_string(),
                head_text: cell(11).to_string(),
                is_chunk: cell(12).to_string(),
                popularity,
                token: cell(LEADING.len() + Category::COUNT).to_string(),
            })
        })
        .collect()
}
