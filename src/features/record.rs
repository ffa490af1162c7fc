use crate::vocabulary::{Category, Vocabulary};

/// Longest prefix or suffix kept for a token
pub const MAX_AFFIX_LEN: usize = 4;

/// One membership flag per vocabulary category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Popularity([u8; Category::COUNT]);

impl Popularity {
    /// Flags for a token, by exact match against each category
    pub fn of(vocabulary: &Vocabulary, word: &str) -> Self {
        let mut flags = [0; Category::COUNT];

        for (flag, category) in flags.iter_mut().zip(Category::ALL) {
            *flag = u8::from(vocabulary.contains(category, word));
        }

        Self(flags)
    }

    /// The flag of a single category
    pub fn get(&self, category: Category) -> u8 {
        self.0[category as usize]
    }

    /// Set the flag of a single category
    pub fn set(&mut self, category: Category, value: u8) {
        self.0[category as usize] = value;
    }
}

/// Features derived for a single token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRecord {
    /// Raw token text
    pub token: String,

    /// 1 when the first character is uppercase
    pub capitalized: u8,

    /// Case-class shape of the token (e.g., "Xxxxx")
    pub word_shape: String,

    /// 1 when any character is a digit
    pub contains_digit: u8,

    /// Proper prefixes, shortest first
    pub prefixes: Vec<String>,

    /// Proper suffixes, shortest first
    pub suffixes: Vec<String>,

    /// Part-of-speech tag
    pub pos: String,

    /// Dependency tag
    pub dep_tag: String,

    /// Text of the syntactic head
    pub head_text: String,

    /// Entity IOB code
    pub is_chunk: String,

    /// Previous token text, absent at the start of a text
    pub prev_word: Option<String>,

    /// Previous token part-of-speech, absent at the start of a text
    pub prev_pos: Option<String>,

    /// Next token text, absent at the end of a text
    pub next_word: Option<String>,

    /// Next token part-of-speech, absent at the end of a text
    pub next_pos: Option<String>,

    /// Vocabulary membership flags
    pub popularity: Popularity,
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// 1 when the first character is uppercase, else 0
pub fn capitalized(word: &str) -> u8 {
    u8::from(word.chars().next().is_some_and(char::is_uppercase))
}

/// Map uppercase letters to `X`, lowercase letters to `x`, digits to `d`, and keep everything else
pub fn word_shape(word: &str) -> String {
    word.chars()
        .map(|c| {
            if c.is_uppercase() {
                'X'
            } else if c.is_lowercase() {
                'x'
            } else if is_digit(c) {
                'd'
            } else {
                c
            }
        })
        .collect()
}

/// 1 when any character is a digit, else 0
pub fn contains_digit(word: &str) -> u8 {
    u8::from(word.chars().any(is_digit))
}

/// Proper prefixes and suffixes of lengths 1 to `min(4, len - 1)`, shortest first
pub fn affixes(word: &str) -> (Vec<String>, Vec<String>) {
    let chars: Vec<char> = word.chars().collect();
    let longest = MAX_AFFIX_LEN.min(chars.len().saturating_sub(1));

    let prefixes = (1..=longest)
        .map(|n| chars[..n].iter().collect())
        .collect();

    let suffixes = (1..=longest)
        .map(|n| chars[chars.len() - n..].iter().collect())
        .collect();

    (prefixes, suffixes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn shapes_follow_character_classes() {
        assert_eq!(word_shape("Messi"), "Xxxxx");
        assert_eq!(word_shape("U-21"), "X-dd");
        assert_eq!(word_shape("PSG's"), "XXX'x");
        assert_eq!(word_shape("Müller"), "Xxxxxx");
    }

    #[test]
    fn shape_has_one_symbol_per_character() {
        for word in ["Barcelona", "1-0", "São", "Ødegaard", "!", "MLS2024"] {
            let shape = word_shape(word);
            assert_eq!(shape.chars().count(), word.chars().count(), "{word}");
        }
    }

    #[test]
    fn capitalization_and_digits() {
        assert_eq!(capitalized("Messi"), 1);
        assert_eq!(capitalized("messi"), 0);
        assert_eq!(capitalized("1860"), 0);
        assert_eq!(capitalized(""), 0);

        assert_eq!(contains_digit("U21"), 1);
        assert_eq!(contains_digit("Chelsea"), 0);
    }

    #[test]
    fn numeric_symbols_are_not_digits() {
        assert_eq!(word_shape("½"), "½");
        assert_eq!(word_shape("3½"), "d½");
        assert_eq!(word_shape("二"), "二");

        assert_eq!(contains_digit("½"), 0);
        assert_eq!(contains_digit("二"), 0);
        assert_eq!(contains_digit("3½"), 1);
    }

    #[test]
    fn affixes_are_bounded_and_ordered() {
        let (prefixes, suffixes) = affixes("Messi");
        assert_eq!(prefixes, vec!["M", "Me", "Mes", "Mess"]);
        assert_eq!(suffixes, vec!["i", "si", "ssi", "essi"]);

        let (prefixes, suffixes) = affixes("Kun");
        assert_eq!(prefixes, vec!["K", "Ku"]);
        assert_eq!(suffixes, vec!["n", "un"]);
    }

    #[test]
    fn short_tokens_have_no_affixes() {
        for word in ["", "a", ".", "é"] {
            let (prefixes, suffixes) = affixes(word);
            assert!(prefixes.is_empty(), "{word}");
            assert!(suffixes.is_empty(), "{word}");
        }
    }

    #[test]
    fn popularity_flags_track_each_category() {
        let vocabulary = Vocabulary::new([
            (Category::Players, vec!["Messi".to_string()]),
            (Category::Clubs, vec!["Barcelona".to_string()]),
            (Category::Homes, vec!["Barcelona".to_string()]),
        ]);

        let messi = Popularity::of(&vocabulary, "Messi");
        assert_eq!(messi.get(Category::Players), 1);
        assert_eq!(messi.get(Category::Clubs), 0);

        let barcelona = Popularity::of(&vocabulary, "Barcelona");
        assert_eq!(barcelona.get(Category::Clubs), 1);
        assert_eq!(barcelona.get(Category::Homes), 1);
        assert_eq!(barcelona.get(Category::Players), 0);
    }
}
