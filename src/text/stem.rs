//! Porter stemmer.
//!
//! Reference form of the suffix-stripping algorithm from
//! Porter, M.F. (1980), "An algorithm for suffix stripping", with the
//! `bli`/`logi` step 2 rules of the author's reference implementation.
//! Words of two characters or fewer are returned unchanged.

/// Reduces a token to a normalized root form.
pub trait TokenReducer: Send + Sync {
    fn reduce(&self, token: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenReducer for PorterStemmer {
    fn reduce(&self, token: &str) -> String {
        let mut word = Word(token.chars().collect());
        if word.len() <= 2 {
            return token.to_string();
        }

        word.step1ab();
        if word.len() > 1 {
            word.step1c();
            word.step2();
            word.step3();
            word.step4();
            word.step5();
        }

        word.0.into_iter().collect()
    }
}

const STEP2: [(&str, &str); 21] = [
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3: [(&str, &str); 7] = [
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: [&str; 19] = [
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

struct Word(Vec<char>);

impl Word {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_consonant(&self, i: usize) -> bool {
        match self.0[i] {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in the first `end` characters.
    fn measure(&self, end: usize) -> usize {
        (1..end)
            .filter(|&i| self.is_consonant(i) && !self.is_consonant(i - 1))
            .count()
    }

    fn has_vowel(&self, end: usize) -> bool {
        (0..end).any(|i| !self.is_consonant(i))
    }

    fn ends_double_consonant(&self, end: usize) -> bool {
        end >= 2 && self.0[end - 1] == self.0[end - 2] && self.is_consonant(end - 1)
    }

    /// consonant-vowel-consonant ending, last consonant not w, x or y
    fn ends_cvc(&self, end: usize) -> bool {
        end >= 3
            && self.is_consonant(end - 3)
            && !self.is_consonant(end - 2)
            && self.is_consonant(end - 1)
            && !matches!(self.0[end - 1], 'w' | 'x' | 'y')
    }

    /// Length of the stem left if the word ends with `suffix`.
    fn stem_len(&self, suffix: &str) -> Option<usize> {
        let suffix: Vec<char> = suffix.chars().collect();
        if suffix.len() > self.len() || !self.0.ends_with(&suffix) {
            return None;
        }
        Some(self.len() - suffix.len())
    }

    fn replace_from(&mut self, stem: usize, replacement: &str) {
        self.0.truncate(stem);
        self.0.extend(replacement.chars());
    }

    fn step1ab(&mut self) {
        if self.0.last() == Some(&'s') {
            if let Some(stem) = self.stem_len("sses") {
                self.replace_from(stem, "ss");
            } else if let Some(stem) = self.stem_len("ies") {
                self.replace_from(stem, "i");
            } else if self.0[self.len() - 2] != 's' {
                self.0.pop();
            }
        }

        if let Some(stem) = self.stem_len("eed") {
            if self.measure(stem) > 0 {
                self.0.pop();
            }
            return;
        }

        let stem = match self.stem_len("ed").or_else(|| self.stem_len("ing")) {
            Some(stem) if self.has_vowel(stem) => stem,
            _ => return,
        };
        self.0.truncate(stem);

        if self.stem_len("at").is_some()
            || self.stem_len("bl").is_some()
            || self.stem_len("iz").is_some()
        {
            self.0.push('e');
        } else if self.ends_double_consonant(self.len()) {
            if !matches!(self.0[self.len() - 1], 'l' | 's' | 'z') {
                self.0.pop();
            }
        } else if self.measure(self.len()) == 1 && self.ends_cvc(self.len()) {
            self.0.push('e');
        }
    }

    fn step1c(&mut self) {
        if let Some(stem) = self.stem_len("y") {
            if self.has_vowel(stem) {
                self.0[stem] = 'i';
            }
        }
    }

    fn replace_first_match(&mut self, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if let Some(stem) = self.stem_len(suffix) {
                if self.measure(stem) > 0 {
                    self.replace_from(stem, replacement);
                }
                return;
            }
        }
    }

    fn step2(&mut self) {
        self.replace_first_match(&STEP2);
    }

    fn step3(&mut self) {
        self.replace_first_match(&STEP3);
    }

    fn step4(&mut self) {
        for suffix in STEP4 {
            let Some(stem) = self.stem_len(suffix) else {
                continue;
            };
            if suffix == "ion" && !(stem > 0 && matches!(self.0[stem - 1], 's' | 't')) {
                continue;
            }
            if self.measure(stem) > 1 {
                self.0.truncate(stem);
            }
            return;
        }
    }

    fn step5(&mut self) {
        if let Some(stem) = self.stem_len("e") {
            let m = self.measure(stem);
            if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
                self.0.truncate(stem);
            }
        }

        if self.ends_double_consonant(self.len())
            && self.0.last() == Some(&'l')
            && self.measure(self.len()) > 1
        {
            self.0.pop();
        }
    }
}
