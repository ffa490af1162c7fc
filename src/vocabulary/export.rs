use std::{
    collections::{hash_map::Entry, HashMap},
    path::{Path, PathBuf},
};

use derive_new::new;

use crate::{config::Layout, datasets::Table, error::Result};

use super::{Category, Vocabulary};

/// Where one category's words come from
#[derive(Clone, Debug, new)]
pub struct Source {
    /// The category being populated
    pub category: Category,

    /// The CSV table holding the words
    pub path: PathBuf,

    /// The column holding the words
    pub column: String,
}

impl Source {
    /// One source table per category, as laid out under the data directory
    pub fn from_layout(layout: &Layout) -> Vec<Source> {
        Category::ALL
            .into_iter()
            .map(|category| {
                Source::new(
                    category,
                    layout.category_table(category),
                    category.source_column().to_string(),
                )
            })
            .collect()
    }
}

/// Collect the distinct words of every source and write them to a single artifact.
///
/// Sources may share a table; each table is read once. The output is overwritten.
pub fn export_popular_words<P: AsRef<Path>>(sources: &[Source], output: P) -> Result<Vocabulary> {
    let mut tables: HashMap<&Path, Table> = HashMap::new();
    let mut entries = Vec::with_capacity(sources.len());

    for source in sources {
        let table = match tables.entry(source.path.as_path()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Table::from_csv(&source.path)?),
        };

        let words = table.distinct(&source.column)?;
        log::debug!("{}: {} distinct words", source.category, words.len());

        entries.push((source.category, words));
    }

    let vocabulary = Vocabulary::new(entries);
    vocabulary.save(output.as_ref())?;

    log::info!(
        "Popular words successfully exported to {}",
        output.as_ref().display()
    );

    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use crate::error::Error;

    use super::*;

    #[test]
    fn shared_tables_feed_several_categories() {
        let dir = tempfile::tempdir().unwrap();
        let league = dir.path().join("league_club_home.csv");
        fs::write(
            &league,
            "League,Club,Home\nLa Liga,Barcelona,Barcelona\nLa Liga,Real Madrid,Madrid\n",
        )
        .unwrap();

        let sources = vec![
            Source::new(Category::Leagues, league.clone(), "League".to_string()),
            Source::new(Category::Clubs, league.clone(), "Club".to_string()),
            Source::new(Category::Homes, league, "Home".to_string()),
        ];
        let output = dir.path().join("popular_words.json");

        let vocabulary = export_popular_words(&sources, &output).unwrap();

        assert_eq!(vocabulary.words(Category::Leagues), ["La Liga"]);
        assert_eq!(vocabulary.words(Category::Clubs), ["Barcelona", "Real Madrid"]);
        assert_eq!(vocabulary.words(Category::Homes), ["Barcelona", "Madrid"]);

        let reloaded = Vocabulary::load(&output).unwrap();
        assert_eq!(reloaded.words(Category::Clubs), vocabulary.words(Category::Clubs));
    }

    #[test]
    fn export_overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let players = dir.path().join("player.csv");
        let output = dir.path().join("popular_words.json");

        fs::write(&players, "Player\nMessi\n").unwrap();
        let sources = vec![Source::new(Category::Players, players.clone(), "Player".into())];
        export_popular_words(&sources, &output).unwrap();

        fs::write(&players, "Player\nKane\n").unwrap();
        export_popular_words(&sources, &output).unwrap();

        let vocabulary = Vocabulary::load(&output).unwrap();
        assert_eq!(vocabulary.words(Category::Players), ["Kane"]);
    }

    #[test]
    fn missing_column_aborts_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let coaches = dir.path().join("coach.csv");
        fs::write(&coaches, "Manager\nAncelotti\n").unwrap();

        let output = dir.path().join("popular_words.json");
        let sources = vec![Source::new(Category::Coaches, coaches, "Coach".into())];

        let result = export_popular_words(&sources, &output);

        assert!(matches!(result, Err(Error::MissingColumn { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn layout_sources_cover_every_category() {
        let sources = Source::from_layout(&Layout::default());

        assert_eq!(sources.len(), Category::ALL.len());
        assert_eq!(sources[3].path, PathBuf::from("data/player.csv"));
        assert_eq!(sources[3].column, "Player");
    }
}
