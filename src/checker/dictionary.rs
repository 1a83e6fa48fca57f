use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use memmap2::Mmap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Word-frequency-derived English dictionary backed by an FST set.
///
/// Words are stored lowercase; callers lowercase before lookup.
pub struct Dictionary {
    set: Set<Mmap>,
}

impl Dictionary {
    /// Load dictionary for given language
    pub fn load(language: &str) -> Result<Self> {
        let dict_path = Self::dictionary_path(language)?;

        if !dict_path.exists() {
            // Bootstrap from the embedded wordlist
            return Self::create_embedded(language);
        }

        Self::load_from_path(&dict_path)
    }

    /// Load dictionary from a specific path (useful for testing)
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        // Safety: the dictionary file is never written while mapped.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map dictionary: {}", path.display()))?;
        let set = Set::new(mmap).context("Failed to parse dictionary")?;

        Ok(Self { set })
    }

    /// Check if word exists in dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Get all words in dictionary
    ///
    /// WARNING: loads the whole wordlist into memory; only the correction
    /// search for very short tokens should reach for this.
    pub fn all_words(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                words.push(word);
            }
        }

        words
    }

    /// Build dictionary from word list
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<()> {
        let mut sorted_words = words.to_vec();
        sorted_words.sort();
        sorted_words.dedup();

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted_words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    fn dictionary_path(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(data_dir.join(format!("{}.dict", language)))
    }

    /// Create a minimal embedded dictionary for bootstrapping
    fn create_embedded(language: &str) -> Result<Self> {
        let basic_words = Self::embedded_wordlist();

        let dict_path = Self::dictionary_path(language)?;
        Self::build_from_words(&basic_words, &dict_path)?;

        Self::load(language)
    }

    /// Common English plus the label vocabulary that shows up on packaging
    /// artwork; keeps units and nutrition terms from flooding the report
    /// before a full wordlist is downloaded (`artcheck dict download`).
    fn embedded_wordlist() -> Vec<String> {
        [
            // Most common English words
            "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on",
            "with", "as", "you", "do", "at", "this", "but", "by", "from", "they", "we", "or",
            "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up",
            "out", "if", "about", "who", "get", "which", "go", "me", "when", "make", "can",
            "like", "time", "no", "just", "know", "take", "people", "into", "year", "your",
            "good", "some", "could", "them", "see", "other", "than", "then", "now", "only",
            "come", "its", "over", "also", "back", "after", "use", "two", "how", "our", "work",
            "first", "well", "way", "new", "because", "any", "these", "give", "day", "most",
            "us", "per", "each", "before", "keep", "store", "away", "children", "product",
            "contains", "contain", "may", "water", "free", "best",
            // Label and nutrition vocabulary
            "vitamin", "vitamins", "mineral", "minerals", "calcium", "protein", "sugar",
            "sugars", "sodium", "fat", "calories", "energy", "nutrition", "nutritional",
            "facts", "ingredients", "ingredient", "supplement", "dietary", "serving",
            "servings", "daily", "value", "tablet", "tablets", "capsule", "capsules",
            "dose", "dosage", "intake", "adults", "consult", "physician", "pharmacist",
            "storage", "refrigerate", "expiry", "expiration", "manufactured", "manufacturer",
            "distributed", "imported", "warning", "caution", "directions", "usage",
            // Units as printed on labels
            "mg", "ml", "kg", "mcg", "iu", "kcal", "oz",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = vec![
            "vitamin".to_string(),
            "tablet".to_string(),
            "mg".to_string(),
        ];

        Dictionary::build_from_words(&words, &dict_path).unwrap();

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("vitamin"));
        assert!(dict.contains("mg"));
        assert!(!dict.contains("vitamn"));
    }

    #[test]
    fn test_prefix_stream() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = vec![
            "vitamin".to_string(),
            "vitamins".to_string(),
            "vital".to_string(),
            "tablet".to_string(),
        ];
        Dictionary::build_from_words(&words, &dict_path).unwrap();

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        let hits = dict.words_with_prefix("vit");
        assert_eq!(hits, vec!["vital", "vitamin", "vitamins"]);
    }

    #[test]
    fn test_embedded_wordlist_covers_label_units() {
        let words = Dictionary::embedded_wordlist();
        for unit in ["mg", "ml", "kcal"] {
            assert!(words.iter().any(|w| w == unit), "missing unit {unit}");
        }
    }
}
