//! Suffix-stripping stemmer (Porter, with NLTK's extensions)
//!
//! Vocabularies exported from the training side hold Porter stems
//! (`fairly` → `fairli`, `generously` → `gener`), so this follows the
//! classic five-step algorithm and the NLTK departures from it:
//! - words of one or two letters are left alone
//! - a handful of irregular forms map straight to their stem (`dying` → `die`)
//! - four-letter `-ies`/`-ied` words keep their `ie` (`ties` → `tie`)
//! - `y` → `i` only after a consonant that is not the first letter
//! - extra step-2 rules for `-alli`, `-bli`, `-fulli`, `-lessli` and `-logi`
//!
//! Tokens reaching the stemmer are lowercase ASCII letters; anything else
//! is returned lowercased but otherwise unchanged.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Irregular forms that bypass the suffix rules
static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect()
});

/// Condition on the part of the word left once a suffix is removed
type Condition = fn(&[u8]) -> bool;

/// (suffix, replacement, condition)
type Rule = (&'static str, &'static str, Condition);

fn always(_: &[u8]) -> bool {
    true
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences: `[C](VC)^m[V]`
fn measure(stem: &[u8]) -> usize {
    let mut m = 0;
    let mut after_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && after_vowel {
            m += 1;
        }
        after_vowel = !consonant;
    }
    m
}

fn positive_measure(stem: &[u8]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[u8]) -> bool {
    measure(stem) > 1
}

/// `y` → `i` needs a consonant before it that is not the first letter
fn follows_inner_consonant(stem: &[u8]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

/// `-logi` is measured with the `l` kept
fn logi_stem_measure(stem: &[u8]) -> bool {
    let mut with_l = stem.to_vec();
    with_l.push(b'l');
    positive_measure(&with_l)
}

fn ion_after_s_or_t(stem: &[u8]) -> bool {
    measure_above_one(stem) && matches!(stem.last(), Some(b's' | b't'))
}

fn contains_vowel(stem: &[u8]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[u8]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// `*o`: consonant-vowel-consonant ending, last letter not `w`, `x` or `y`
fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();
    if n >= 3 {
        is_consonant(word, n - 3)
            && !is_consonant(word, n - 2)
            && is_consonant(word, n - 1)
            && !matches!(word[n - 1], b'w' | b'x' | b'y')
    } else {
        n == 2 && !is_consonant(word, 0) && is_consonant(word, 1)
    }
}

fn replace_suffix(word: &mut Vec<u8>, suffix: &str, replacement: &str) {
    word.truncate(word.len() - suffix.len());
    word.extend_from_slice(replacement.as_bytes());
}

/// Apply the first rule whose suffix matches; a failed condition stops the list
fn apply_rules(word: &mut Vec<u8>, rules: &[Rule]) -> bool {
    for &(suffix, replacement, condition) in rules {
        if word.ends_with(suffix.as_bytes()) {
            let stem = &word[..word.len() - suffix.len()];
            if condition(stem) {
                replace_suffix(word, suffix, replacement);
                return true;
            }
            return false;
        }
    }
    false
}

fn step1a(word: &mut Vec<u8>) {
    if word.len() == 4 && word.ends_with(b"ies") {
        replace_suffix(word, "ies", "ie");
        return;
    }
    apply_rules(
        word,
        &[
            ("sses", "ss", always),
            ("ies", "i", always),
            ("ss", "ss", always),
            ("s", "", always),
        ],
    );
}

fn step1b(word: &mut Vec<u8>) {
    if word.ends_with(b"ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        replace_suffix(word, "ied", replacement);
        return;
    }
    if word.ends_with(b"eed") {
        if positive_measure(&word[..word.len() - 3]) {
            replace_suffix(word, "eed", "ee");
        }
        return;
    }

    let removed = ["ed", "ing"].into_iter().find(|suffix| {
        word.ends_with(suffix.as_bytes()) && contains_vowel(&word[..word.len() - suffix.len()])
    });
    let Some(suffix) = removed else {
        return;
    };
    replace_suffix(word, suffix, "");

    if apply_rules(
        word,
        &[("at", "ate", always), ("bl", "ble", always), ("iz", "ize", always)],
    ) {
        return;
    }
    if ends_double_consonant(word) {
        if !matches!(word[word.len() - 1], b'l' | b's' | b'z') {
            word.pop();
        }
    } else if measure(word) == 1 && ends_cvc(word) {
        word.push(b'e');
    }
}

fn step1c(word: &mut Vec<u8>) {
    apply_rules(word, &[("y", "i", follows_inner_consonant)]);
}

fn step2(word: &mut Vec<u8>) {
    if word.ends_with(b"alli") && positive_measure(&word[..word.len() - 4]) {
        replace_suffix(word, "alli", "al");
        step2(word);
        return;
    }
    apply_rules(
        word,
        &[
            ("ational", "ate", positive_measure),
            ("tional", "tion", positive_measure),
            ("enci", "ence", positive_measure),
            ("anci", "ance", positive_measure),
            ("izer", "ize", positive_measure),
            ("bli", "ble", positive_measure),
            ("alli", "al", positive_measure),
            ("entli", "ent", positive_measure),
            ("eli", "e", positive_measure),
            ("ousli", "ous", positive_measure),
            ("ization", "ize", positive_measure),
            ("ation", "ate", positive_measure),
            ("ator", "ate", positive_measure),
            ("alism", "al", positive_measure),
            ("iveness", "ive", positive_measure),
            ("fulness", "ful", positive_measure),
            ("ousness", "ous", positive_measure),
            ("aliti", "al", positive_measure),
            ("iviti", "ive", positive_measure),
            ("biliti", "ble", positive_measure),
            ("fulli", "ful", positive_measure),
            ("lessli", "less", positive_measure),
            ("logi", "log", logi_stem_measure),
        ],
    );
}

fn step3(word: &mut Vec<u8>) {
    apply_rules(
        word,
        &[
            ("icate", "ic", positive_measure),
            ("ative", "", positive_measure),
            ("alize", "al", positive_measure),
            ("iciti", "ic", positive_measure),
            ("ical", "ic", positive_measure),
            ("ful", "", positive_measure),
            ("ness", "", positive_measure),
        ],
    );
}

fn step4(word: &mut Vec<u8>) {
    apply_rules(
        word,
        &[
            ("al", "", measure_above_one),
            ("ance", "", measure_above_one),
            ("ence", "", measure_above_one),
            ("er", "", measure_above_one),
            ("ic", "", measure_above_one),
            ("able", "", measure_above_one),
            ("ible", "", measure_above_one),
            ("ant", "", measure_above_one),
            ("ement", "", measure_above_one),
            ("ment", "", measure_above_one),
            ("ent", "", measure_above_one),
            ("ion", "", ion_after_s_or_t),
            ("ou", "", measure_above_one),
            ("ism", "", measure_above_one),
            ("ate", "", measure_above_one),
            ("iti", "", measure_above_one),
            ("ous", "", measure_above_one),
            ("ive", "", measure_above_one),
            ("ize", "", measure_above_one),
        ],
    );
}

fn step5a(word: &mut Vec<u8>) {
    if !word.ends_with(b"e") {
        return;
    }
    let stem = &word[..word.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        word.pop();
    }
}

fn step5b(word: &mut Vec<u8>) {
    if word.ends_with(b"ll") && measure_above_one(&word[..word.len() - 1]) {
        word.pop();
    }
}

/// Stateless Porter stemmer
#[derive(Debug, Clone, Copy, Default)]
pub struct Stemmer;

impl Stemmer {
    pub fn porter() -> Self {
        Self
    }

    pub fn stem_word(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(stem) = IRREGULAR.get(lower.as_str()) {
            return stem.to_string();
        }
        if lower.len() <= 2 || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
            return lower;
        }

        let mut stem = lower.into_bytes();
        step1a(&mut stem);
        step1b(&mut stem);
        step1c(&mut stem);
        step2(&mut stem);
        step3(&mut stem);
        step4(&mut stem);
        step5a(&mut stem);
        step5b(&mut stem);

        // Only ASCII letters were pushed or kept
        String::from_utf8(stem).unwrap_or_default()
    }

    /// Stem every whitespace-separated token
    pub fn stem(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.stem_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
