//! Text helpers shared by the built-in analyzers

/// Words ignored when judging meaning
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "of", "and", "in", "on", "to", "for", "with", "my", "your", "our", "at",
    "by", "from", "is",
];

/// Lower-cased alphanumeric words; apostrophes are dropped
pub fn words(name: &str) -> Vec<String> {
    name.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.replace('\'', "").to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Words that carry meaning (not stopwords, not pure digits)
pub fn content_words(words: &[String]) -> Vec<String> {
    words
        .iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()) && !w.chars().all(|c| c.is_ascii_digit()))
        .cloned()
        .collect()
}

pub fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Lower-cased ASCII letters of a word or name
pub fn letters(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Vowel-group syllable estimate, at least 1 for any word with letters
pub fn syllables(word: &str) -> usize {
    let chars = letters(word);
    if chars.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }
    // Silent trailing 'e' ("stone", "blade") but not "-le" ("hollow" unaffected)
    let n = chars.len();
    if count > 1 && chars[n - 1] == 'e' && n >= 2 && !is_vowel(chars[n - 2]) && chars[n - 2] != 'l'
    {
        count -= 1;
    }
    count.max(1)
}

/// Lengths of consecutive consonant runs
pub fn consonant_runs(chars: &[char]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut current = 0;
    for &c in chars {
        if is_vowel(c) {
            if current > 0 {
                runs.push(current);
            }
            current = 0;
        } else {
            current += 1;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_content_words() {
        let w = words("The Night's  Velvet-Echo 99");
        assert_eq!(w, vec!["the", "nights", "velvet", "echo", "99"]);
        assert_eq!(content_words(&w), vec!["nights", "velvet", "echo"]);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(syllables("stone"), 1);
        assert_eq!(syllables("velvet"), 2);
        assert_eq!(syllables("harmony"), 3);
        assert_eq!(syllables("x"), 1);
        assert_eq!(syllables("42"), 0);
    }

    #[test]
    fn test_consonant_runs() {
        assert_eq!(consonant_runs(&letters("strength")), vec![3, 4]);
        assert_eq!(consonant_runs(&letters("aria")), vec![1]);
    }
}
