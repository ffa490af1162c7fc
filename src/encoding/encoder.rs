use std::{collections::BTreeSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    features::TokenRecord,
};

use super::{
    columns::{Categorical, Numeric},
    FeatureMatrix,
};

/// The categories seen for one categorical column, sorted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Source column name
    pub column: String,

    /// Sorted, distinct categories
    pub categories: Vec<String>,
}

/// One-hot encoder over token records with a schema fixed at fit time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    /// Indicator groups, in declared column order
    groups: Vec<Group>,

    /// Passthrough numeric columns
    numeric: Vec<String>,
}

impl FeatureEncoder {
    /// Learn the categories of every categorical column
    pub fn fit(records: &[TokenRecord]) -> Self {
        let groups = Categorical::ALL
            .iter()
            .map(|column| {
                let categories: BTreeSet<String> = records
                    .iter()
                    .map(|record| column.value(record).into_owned())
                    .collect();

                Group {
                    column: column.name().to_string(),
                    categories: categories.into_iter().collect(),
                }
            })
            .collect();

        let numeric = Numeric::all()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let encoder = Self { groups, numeric };

        log::debug!(
            "Fitted encoder on {} records: {} output columns",
            records.len(),
            encoder.n_columns()
        );

        encoder
    }

    /// Encode records with the fitted schema; unseen categories leave their group all zero
    pub fn transform(&self, records: &[TokenRecord]) -> Result<FeatureMatrix> {
        let numeric = Numeric::all();
        let width = self.n_columns();

        let mut values = Vec::with_capacity(records.len() * width);
        let mut n_unknown = 0;

        for record in records {
            for (column, group) in Categorical::ALL.iter().zip(&self.groups) {
                let value = column.value(record);
                let hit = group
                    .categories
                    .binary_search_by(|c| c.as_str().cmp(value.as_ref()))
                    .ok();

                if hit.is_none() {
                    n_unknown += 1;
                }

                values.extend((0..group.categories.len()).map(|i| {
                    if Some(i) == hit {
                        1.0
                    } else {
                        0.0
                    }
                }));
            }

            values.extend(numeric.iter().map(|column| column.value(record)));
        }

        if n_unknown > 0 {
            log::debug!("{n_unknown} categorical values were not seen at fit time");
        }

        FeatureMatrix::new(self.column_names(), values)
    }

    /// Fit on the records, then encode them
    pub fn fit_transform(records: &[TokenRecord]) -> Result<(Self, FeatureMatrix)> {
        let encoder = Self::fit(records);
        let matrix = encoder.transform(records)?;

        Ok((encoder, matrix))
    }

    /// Output column names: `<column>_<category>` for each indicator, then the numeric columns
    pub fn column_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|group| {
                group
                    .categories
                    .iter()
                    .map(move |category| format!("{}_{}", group.column, category))
            })
            .chain(self.numeric.iter().cloned())
            .collect()
    }

    /// Number of output columns
    pub fn n_columns(&self) -> usize {
        self.groups.iter().map(|g| g.categories.len()).sum::<usize>() + self.numeric.len()
    }

    /// The indicator groups, in column order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Persist the fitted encoder as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;

        Ok(())
    }

    /// Load a persisted encoder, checking its columns against the current feature layout
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        let encoder: Self = serde_json::from_str(&fs::read_to_string(path)?)?;

        let groups: Vec<&str> = encoder.groups.iter().map(|g| g.column.as_str()).collect();
        let declared: Vec<&str> = Categorical::ALL.iter().map(Categorical::name).collect();

        if groups != declared {
            return Err(Error::Schema(format!(
                "encoder at {} has categorical columns {:?}, expected {:?}",
                path.display(),
                groups,
                declared
            )));
        }

        let declared: Vec<&str> = Numeric::all().iter().map(Numeric::name).collect();

        if encoder.numeric != declared {
            return Err(Error::Schema(format!(
                "encoder at {} has numeric columns {:?}, expected {:?}",
                path.display(),
                encoder.numeric,
                declared
            )));
        }

        Ok(encoder)
    }
}
