//! TF-IDF similarity recommender.
//!
//! The index is a sparse vector space built from each event's
//! [`corpus_text`](crate::event::Event::corpus_text). Weights are raw term
//! counts times a smoothed inverse document frequency,
//! `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalized so a dot
//! product is the cosine similarity.
//!
//! The index has no incremental update. Rebuild it whenever the event list
//! changes; [`Catalog`](crate::catalog::Catalog) does this lazily.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::event::Event;

/// English stop words, kept sorted for `binary_search`.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant", "co",
    "computer", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do", "done", "down",
    "due", "during", "each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty",
    "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "except",
    "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly",
    "forty", "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in",
    "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter",
    "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mill",
    "mine", "more", "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name",
    "namely", "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone",
    "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
    "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere",
    "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards",
    "twelve", "twenty", "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was",
    "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// (term id, weight), sorted by term id.
type SparseVector = Vec<(usize, f64)>;

/// A ranked match returned by [`SimilarityIndex::query`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    /// Position of the event in the list the index was built from.
    pub index: usize,
    /// Cosine similarity, always in `(0, 1]`.
    pub score: f64,
}

/// Term-weighted vector space over an event list.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<SparseVector>,
}

/// Split text into lower-cased terms of two or more word characters,
/// dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| {
            token.chars().count() >= 2 && STOP_WORDS.binary_search(token).is_err()
        })
        .map(str::to_string)
        .collect()
}

impl SimilarityIndex {
    /// Build an index with one vector per event, in event order.
    ///
    /// Returns `None` when there is nothing to index.
    pub fn build(events: &[Event]) -> Option<Self> {
        Self::from_documents(events.iter().map(Event::corpus_text))
    }

    /// Build an index over raw documents.
    ///
    /// Returns `None` for an empty corpus or one without a single indexable term.
    pub fn from_documents<I, S>(documents: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokenized: Vec<Vec<String>> = documents
            .into_iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();
        if tokenized.is_empty() {
            return None;
        }

        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return None;
        }
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens.iter().map(|t| vocabulary[t]).collect();
            for id in unique {
                doc_freq[id] += 1;
            }
        }

        let n = tokenized.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            documents: Vec::with_capacity(tokenized.len()),
        };
        index.documents = tokenized.iter().map(|tokens| index.vectorize(tokens)).collect();

        tracing::debug!(
            documents = index.documents.len(),
            terms = index.vocabulary.len(),
            "built similarity index"
        );
        Some(index)
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of `text` against every document, in document order.
    pub fn scores(&self, text: &str) -> Vec<f64> {
        let query = self.vectorize(&tokenize(text));
        self.documents.iter().map(|doc| dot(&query, doc)).collect()
    }

    /// The `top_n` best matches for `text` with a strictly positive score,
    /// best first. Equal scores keep document order.
    pub fn query(&self, text: &str, top_n: usize) -> Vec<Recommendation> {
        let mut ranked: Vec<Recommendation> = self
            .scores(text)
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .map(|(index, score)| Recommendation { index, score })
            .collect();

        // sort_by is stable, so ties stay in document order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_n);
        ranked
    }

    /// Terms outside the vocabulary contribute nothing.
    fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&id) = self.vocabulary.get(token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id]))
            .collect();
        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

/// Dot product of two id-sorted sparse vectors.
fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Build a fresh index over `events` and return the best matches for `text`.
pub fn recommend<'a>(events: &'a [Event], text: &str, top_n: usize) -> Vec<&'a Event> {
    match SimilarityIndex::build(events) {
        Some(index) => index
            .query(text, top_n)
            .into_iter()
            .map(|rec| &events[rec.index])
            .collect(),
        None => Vec::new(),
    }
}
