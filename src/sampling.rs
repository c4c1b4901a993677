use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::Rng;
use std::error::Error;

use crate::config::NegativeSampling;


/// Per id probability of skipping an occurrence during training,
/// `max(0, 1 - sqrt(t / f))` with `f` the id's share of the training sequence.
pub struct DiscardTable {
    probs: Vec<f32>,
}

impl DiscardTable {

    pub fn new(token_ids: &[usize], vocab_size: usize, sample: f32) -> DiscardTable {

        let mut effective_frequency = vec![0usize; vocab_size];
        for id in token_ids {
            effective_frequency[*id] += 1;
        }

        let total_tokens = token_ids.len() as f32;
        let probs = effective_frequency
            .iter()
            .map(|count| {
                if *count == 0 {
                    return 0.0;
                }
                let f = *count as f32 / total_tokens;
                (1.0 - (sample / f).sqrt()).max(0.0)
            })
            .collect();

        DiscardTable { probs }
    }

    pub fn prob(&self, id: usize) -> f32 {
        self.probs[id]
    }

    pub fn probs(&self) -> &[f32] {
        &self.probs
    }

    /// Draws one uniform value from `rng`, always, and discards when it falls
    /// below the id's probability.
    pub fn discard<R: Rng>(&self, id: usize, rng: &mut R) -> bool {
        rng.gen::<f32>() < self.probs[id]
    }
}


/// Draws candidate negative ids. One draw from the rng per call.
pub enum NegativeSampler {
    Uniform(Uniform<usize>),
    Unigram(WeightedIndex<f64>),
}

impl NegativeSampler {

    const UNIGRAM_POWER: f64 = 0.75;

    pub fn new(kind: NegativeSampling, counts: &[usize]) -> Result<NegativeSampler, Box<dyn Error>> {

        if counts.is_empty() {
            return Err("cannot sample negatives from an empty vocabulary".into());
        }

        let sampler = match kind {
            NegativeSampling::Uniform => NegativeSampler::Uniform(Uniform::new(0, counts.len())),
            NegativeSampling::Unigram => {
                let weights = counts.iter().map(|c| (*c as f64).powf(Self::UNIGRAM_POWER));
                NegativeSampler::Unigram(WeightedIndex::new(weights)?)
            }
        };
        Ok(sampler)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            NegativeSampler::Uniform(dist) => dist.sample(rng),
            NegativeSampler::Unigram(dist) => dist.sample(rng),
        }
    }
}
