use std::collections::HashMap;

const DELIMITERS: &[char] = &[' ', '.', ',', ';', '!'];
const STOP_WORDS: &[&str] = &[
    "the", "and", "of", "to", "a", "with", "in", "this", "or", "that",
];

/// Skip/take policy for the most-common-words ranking.
///
/// The top `skip` words are dropped as catalog-specific noise before the next
/// `take` are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRanking {
    pub skip: usize,
    pub take: usize,
}

impl Default for WordRanking {
    fn default() -> Self {
        Self { skip: 5, take: 10 }
    }
}

impl WordRanking {
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    pub fn most_common_words<'a, I>(&self, descriptions: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        rank_words(descriptions)
            .into_iter()
            .skip(self.skip)
            .take(self.take)
            .map(|(word, _)| word)
            .collect()
    }
}

/// Every non-stop-word with its count, by count descending then word ascending.
pub fn rank_words<'a, I>(descriptions: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for description in descriptions {
        for token in tokenize(description) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a_word, a_count), (b_word, b_count)| {
        b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
    });
    ranked
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(DELIMITERS)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
}
