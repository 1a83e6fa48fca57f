use crate::checker::dictionary::Dictionary;

/// Pick the single best-guess correction for an unknown word, or `None`
/// when nothing in the dictionary is close enough.
///
/// Strategies run cheapest-first: prefix neighborhood, then one-step
/// transformations, then (for very short tokens only) a bounded scan.
pub fn best_correction(word: &str, dictionary: &Dictionary, max_distance: usize) -> Option<String> {
    let mut best: Option<(usize, String)> = None;

    // 1. Prefix neighborhood (fast): misspellings usually keep their head
    if word.len() >= 3 {
        consider_all(
            &mut best,
            word,
            dictionary.words_with_prefix(&word[..3]),
            max_distance,
        );
    }

    // 2. One-step transformations looked up directly
    if best.as_ref().map(|(d, _)| *d > 1).unwrap_or(true) {
        for candidate in transformations(word) {
            if dictionary.contains(&candidate) {
                consider(&mut best, word, candidate, max_distance);
            }
        }
    }

    // 3. Shorter prefix for words the 3-char prefix missed
    if best.is_none() && word.len() >= 2 {
        consider_all(
            &mut best,
            word,
            dictionary.words_with_prefix(&word[..2]),
            max_distance,
        );
    }

    // 4. Bounded full scan, acceptable only for tokens like "teh" or "mll"
    if best.is_none() && word.len() <= 3 {
        let candidates = dictionary
            .all_words()
            .into_iter()
            .filter(|w| (w.len() as i32 - word.len() as i32).abs() <= 1)
            .take(200);
        for candidate in candidates {
            consider(&mut best, word, candidate, max_distance);
        }
    }

    best.map(|(_, word)| word)
}

fn consider_all(
    best: &mut Option<(usize, String)>,
    word: &str,
    candidates: Vec<String>,
    max_distance: usize,
) {
    for candidate in candidates {
        consider(best, word, candidate, max_distance);
    }
}

fn consider(best: &mut Option<(usize, String)>, word: &str, candidate: String, max_distance: usize) {
    if candidate == word {
        return;
    }
    let distance = edit_distance(word, &candidate);
    if distance > max_distance {
        return;
    }
    match best {
        Some((current, _)) if *current <= distance => {}
        _ => *best = Some((distance, candidate)),
    }
}

/// Calculate Levenshtein distance between two strings
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate().take(a_len + 1) {
        row[0] = i;
    }
    for (j, item) in matrix[0].iter_mut().enumerate().take(b_len + 1) {
        *item = j;
    }

    for (i, a_char) in a_chars.iter().enumerate() {
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };

            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(
                    matrix[i][j + 1] + 1, // deletion
                    matrix[i + 1][j] + 1, // insertion
                ),
                matrix[i][j] + cost, // substitution
            );
        }
    }

    matrix[a_len][b_len]
}

/// Generate common one-step transformations of a word: deletions,
/// insertions of a repeated neighbor, adjacent transpositions.
fn transformations(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();

    // Deletions
    for i in 0..chars.len() {
        let mut w = chars.clone();
        w.remove(i);
        out.push(w.iter().collect());
    }

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut w = chars.clone();
        w.swap(i, i + 1);
        out.push(w.iter().collect());
    }

    // Re-insertions of each letter at every position, catching dropped
    // characters ("vitamn" -> "vitamin")
    for i in 0..=chars.len() {
        for letter in 'a'..='z' {
            let mut w = chars.clone();
            w.insert(i, letter);
            out.push(w.iter().collect());
        }
    }

    out
}
