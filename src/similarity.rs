use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use std::error::Error;

use crate::vocab::Vocab;


pub fn l2_norm(u: ArrayView1<f32>) -> f32 {
    u.dot(&u).sqrt()
}

/// `u.v / (|u| |v|)`. NaN when either vector is all zeros, callers get no special
/// casing for that.
pub fn cosine(u: ArrayView1<f32>, v: ArrayView1<f32>) -> f32 {
    u.dot(&v) / (l2_norm(u) * l2_norm(v))
}

/// Word level queries over one embedding matrix (the center vectors).
pub struct Similarity<'a> {
    w: ArrayView2<'a, f32>,
    vocab: &'a Vocab,
}

impl<'a> Similarity<'a> {

    /// Panics when `w` does not have one row per vocabulary entry.
    pub fn new(w: ArrayView2<'a, f32>, vocab: &'a Vocab) -> Similarity<'a> {
        assert_eq!(w.dim().0, vocab.len(), "inconsistent number of entries in w and tokens");
        Self { w, vocab }
    }

    pub fn get_id(&self, token: &str) -> Option<usize> {
        self.vocab.get_id(token)
    }

    pub fn extract_vec_from_word(&self, token: &str) -> Result<ArrayView1<'a, f32>, Box<dyn Error>> {
        match self.get_id(token) {
            Some(i) => Ok(self.w.index_axis_move(Axis(0), i)),
            None => Err(format!("Word not in vocab: {}", token).into()),
        }
    }

    pub fn norm(&self, token: &str) -> Result<f32, Box<dyn Error>> {
        Ok(l2_norm(self.extract_vec_from_word(token)?))
    }

    pub fn cosine(&self, a: &str, b: &str) -> Result<f32, Box<dyn Error>> {
        let u = self.extract_vec_from_word(a)?;
        let v = self.extract_vec_from_word(b)?;
        Ok(cosine(u, v))
    }

    /// The `k` words closest to `token` by cosine, best first, `token` itself excluded.
    pub fn find_k_most_similar(&self, token: &str, k: usize) -> Result<Vec<(String, f32)>, Box<dyn Error>> {

        let query_id = self.get_id(token).ok_or_else(|| format!("Word not in vocab: {}", token))?;
        let query = self.w.row(query_id);

        let scores: Array1<f32> = self.w.outer_iter().map(|row| cosine(query, row)).collect();
        let mut indexed_scores: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != query_id)
            .collect();

        // sort by most similar in descending order
        indexed_scores.sort_by(|(_i, s), (_j, t)| t.total_cmp(s));
        indexed_scores.truncate(k);

        let sim_tokens = indexed_scores
            .into_iter()
            .filter_map(|(i, score)| self.vocab.token(i).map(|t| (t.to_string(), score)))
            .collect();
        Ok(sim_tokens)
    }

}


#[cfg(test)]
mod tests {

    use ndarray::{array, Array2};
    use super::{cosine, l2_norm, Similarity};
    use crate::vocab::{AlphaTokenizer, Tokenizer, Vocab};

    const TOL: f32 = 1e-6;

    // ids follow descending counts: sea, ship, boat
    fn vocab() -> Vocab {
        let tokens = AlphaTokenizer.tokenize(&"sea sea sea ship ship boat ".repeat(5));
        Vocab::build(&tokens, 5, None)
    }

    #[test]
    fn norm_and_cosine_of_vectors() {
        let u = array![3.0f32, 4.0];
        let v = array![-4.0f32, 3.0];
        assert!((l2_norm(u.view()) - 5.0).abs() < TOL);
        assert!(cosine(u.view(), v.view()).abs() < TOL);
        assert!((cosine(u.view(), u.view()) - 1.0).abs() < TOL);
        assert!((cosine(u.view(), (-&u).view()) + 1.0).abs() < TOL);
    }

    #[test]
    fn cosine_stays_in_bounds() {
        let w = array![[0.3f32, -1.2, 5.0], [-7.0, 0.01, 2.0], [1e-3, 1e-3, -1e-3]];
        for a in w.outer_iter() {
            for b in w.outer_iter() {
                let c = cosine(a, b);
                assert!(c >= -1.0 - TOL && c <= 1.0 + TOL, "cosine {} out of bounds", c);
            }
        }
    }

    #[test]
    fn zero_vector_gives_nan() {
        let z = array![0.0f32, 0.0];
        let u = array![1.0f32, 0.0];
        assert!(cosine(z.view(), u.view()).is_nan());
    }

    #[test]
    fn word_lookups() {
        let vocab = vocab();
        let w: Array2<f32> = array![[1.0, 0.0], [0.0, 2.0], [0.1, 1.0]];
        let sim = Similarity::new(w.view(), &vocab);

        assert!(sim.get_id("sea").is_some());
        assert!(sim.get_id("ocean").is_none());
        assert!((sim.norm("ship").unwrap() - 2.0).abs() < TOL);
        assert!(sim.cosine("sea", "ship").unwrap().abs() < TOL);

        let err = sim.cosine("sea", "ocean").unwrap_err();
        assert_eq!(err.to_string(), "Word not in vocab: ocean");
        assert!(sim.norm("ocean").is_err());
    }

    #[test]
    fn most_similar_excludes_the_query() {
        let vocab = vocab();
        let w: Array2<f32> = array![[1.0, 0.0], [0.0, 2.0], [0.1, 1.0]];
        let sim = Similarity::new(w.view(), &vocab);

        let best = sim.find_k_most_similar("ship", 5).unwrap();
        let words = best.iter().map(|(t, _)| t.as_str()).collect::<Vec<&str>>();
        assert_eq!(words, ["boat", "sea"]);
        assert!(best[0].1 > best[1].1);

        assert_eq!(sim.find_k_most_similar("ship", 1).unwrap().len(), 1);
        assert!(sim.find_k_most_similar("ocean", 1).is_err());
    }

    #[test]
    #[should_panic]
    fn rows_must_match_vocabulary() {
        let vocab = vocab();
        let w: Array2<f32> = Array2::zeros((2, 2));
        Similarity::new(w.view(), &vocab);
    }
}
