use std::collections::HashMap;


// defines the behavior needed for tokenizing a corpus
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits text into maximal runs of ASCII letters, lower cased.
/// Anything else (digits, punctuation, whitespace, non ASCII bytes) is a boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlphaTokenizer;

impl Tokenizer for AlphaTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {

        let mut tokens = Vec::new();
        let mut current = String::new();

        for ch in text.chars() {
            if ch.is_ascii_alphabetic() {
                current.push(ch.to_ascii_lowercase());
            } else if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }
}


/// Bijection between the retained tokens and the ids `0..len()`.
///
/// Ids are opaque. They happen to follow descending frequency (ties broken
/// lexically) so that two runs over the same corpus agree on them.
#[derive(Clone, Debug)]
pub struct Vocab {
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
    counts: Vec<usize>,
}

impl Vocab {

    fn accumulate<'a, I>(tokens: I) -> HashMap<&'a str, usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        // how many times each token appears in the corpus
        let mut token2count: HashMap<&str, usize> = HashMap::new();
        for tok in tokens {
            let val = token2count.entry(tok.as_str()).or_insert(0);
            *val += 1;
        }
        token2count
    }

    /// Keeps every token seen at least `min_count` times, optionally capped to
    /// the `max_size` most frequent ones.
    pub fn build(tokens: &[String], min_count: usize, max_size: Option<usize>) -> Vocab {

        let token2count = Vocab::accumulate(tokens);

        let mut tup = token2count
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .collect::<Vec<(&str, usize)>>();
        tup.sort_by(|(t1, c1), (t2, c2)| c2.cmp(c1).then_with(|| t1.cmp(t2)));

        if let Some(max_size) = max_size {
            tup.truncate(max_size);
        }

        let mut t2i = HashMap::with_capacity(tup.len());
        let mut i2t = Vec::with_capacity(tup.len());
        let mut counts = Vec::with_capacity(tup.len());
        for (i, (tok, count)) in tup.into_iter().enumerate() {
            t2i.insert(tok.to_string(), i);
            i2t.push(tok.to_string());
            counts.push(count);
        }

        Vocab { t2i, i2t, counts }
    }

    /// Maps every in-vocabulary token to its id, silently dropping the rest.
    pub fn encode<'a, I>(&self, tokens: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tokens
            .into_iter()
            .filter_map(|tok| self.get_id(tok))
            .collect()
    }

    pub fn get_id(&self, token: &str) -> Option<usize> {
        self.t2i.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.i2t.get(id).map(|t| t.as_str())
    }

    /// Raw corpus count of `id`. Panics if `id` is out of range.
    pub fn count(&self, id: usize) -> usize {
        self.counts[id]
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.i2t.iter().map(|t| t.as_str())
    }
}
