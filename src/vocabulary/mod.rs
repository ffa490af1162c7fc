use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Display,
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Building the vocabulary from category tables
pub mod export;

pub use export::{export_popular_words, Source};

/// The categories of popular football words
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Leagues
    Leagues,
    /// Clubs
    Clubs,
    /// Home grounds and cities
    Homes,
    /// Players
    Players,
    /// Coaches
    Coaches,
    /// Nations
    Nations,
    /// Continents
    Continents,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 7;

    /// Every category, in artifact order
    pub const ALL: [Category; Self::COUNT] = [
        Category::Leagues,
        Category::Clubs,
        Category::Homes,
        Category::Players,
        Category::Coaches,
        Category::Nations,
        Category::Continents,
    ];

    /// The key used in the vocabulary artifact
    pub fn key(&self) -> &'static str {
        match self {
            Category::Leagues => "Leagues",
            Category::Clubs => "Clubs",
            Category::Homes => "Homes",
            Category::Players => "Players",
            Category::Coaches => "Coaches",
            Category::Nations => "Nations",
            Category::Continents => "Continents",
        }
    }

    /// The column holding this category's words in its source table
    pub fn source_column(&self) -> &'static str {
        match self {
            Category::Leagues => "League",
            Category::Clubs => "Club",
            Category::Homes => "Home",
            Category::Players => "Player",
            Category::Coaches => "Coach",
            Category::Nations => "Nation",
            Category::Continents => "Continent",
        }
    }

    /// The default file name of this category's source table
    pub fn default_table(&self) -> &'static str {
        match self {
            Category::Leagues => "league.csv",
            Category::Clubs => "club.csv",
            Category::Homes => "home.csv",
            Category::Players => "player.csv",
            Category::Coaches => "coach.csv",
            Category::Nations => "nation.csv",
            Category::Continents => "continent.csv",
        }
    }

    /// The name of the membership flag feature
    pub fn flag(&self) -> &'static str {
        match self {
            Category::Leagues => "in_league",
            Category::Clubs => "in_club",
            Category::Homes => "in_home",
            Category::Players => "in_player",
            Category::Coaches => "in_coach",
            Category::Nations => "in_nation",
            Category::Continents => "in_continent",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// On-disk shape of the vocabulary artifact
#[derive(Serialize, Deserialize)]
struct PopularWords {
    #[serde(rename = "Leagues")]
    leagues: Vec<String>,
    #[serde(rename = "Clubs")]
    clubs: Vec<String>,
    #[serde(rename = "Homes")]
    homes: Vec<String>,
    #[serde(rename = "Players")]
    players: Vec<String>,
    #[serde(rename = "Coaches")]
    coaches: Vec<String>,
    #[serde(rename = "Nations")]
    nations: Vec<String>,
    #[serde(rename = "Continents")]
    continents: Vec<String>,
}

/// Popular words per category, with exact-string membership lookups
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// Deduplicated words per category, in order of first appearance
    words: BTreeMap<Category, Vec<String>>,

    /// Hashed lookup sets mirroring `words`
    lookup: HashMap<Category, HashSet<String>>,
}

impl Vocabulary {
    /// Build a vocabulary, dropping duplicate words within each category
    pub fn new<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, W)>,
        W: IntoIterator<Item = String>,
    {
        let mut vocabulary = Self::default();

        for (category, words) in entries {
            let set = vocabulary.lookup.entry(category).or_default();
            let list = vocabulary.words.entry(category).or_default();

            for word in words {
                if set.insert(word.clone()) {
                    list.push(word);
                }
            }
        }

        vocabulary
    }

    /// Whether `word` is exactly one of the category's entries
    pub fn contains(&self, category: Category, word: &str) -> bool {
        self.lookup
            .get(&category)
            .map(|set| set.contains(word))
            .unwrap_or(false)
    }

    /// The category's entries, in order of first appearance
    pub fn words(&self, category: Category) -> &[String] {
        self.words
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of entries across categories
    pub fn len(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }

    /// Whether every category is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the vocabulary as pretty-printed JSON, replacing any previous artifact
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let words = |category| self.words(category).to_vec();
        let artifact = PopularWords {
            leagues: words(Category::Leagues),
            clubs: words(Category::Clubs),
            homes: words(Category::Homes),
            players: words(Category::Players),
            coaches: words(Category::Coaches),
            nations: words(Category::Nations),
            continents: words(Category::Continents),
        };

        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &artifact)?;

        Ok(())
    }

    /// Read a vocabulary artifact. A missing or malformed file is a configuration error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            Error::Configuration(format!(
                "unable to open vocabulary {}: {}",
                path.display(),
                e
            ))
        })?;

        let artifact: PopularWords =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                Error::Configuration(format!("malformed vocabulary {}: {}", path.display(), e))
            })?;

        Ok(Self::new([
            (Category::Leagues, artifact.leagues),
            (Category::Clubs, artifact.clubs),
            (Category::Homes, artifact.homes),
            (Category::Players, artifact.players),
            (Category::Coaches, artifact.coaches),
            (Category::Nations, artifact.nations),
            (Category::Continents, artifact.continents),
        ]))
    }
}
