use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::time::Instant;

use crate::config::TrainParams;
use crate::embedding::Embeddings;
use crate::pairs::context_pairs;
use crate::sampling::{DiscardTable, NegativeSampler};


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainStats {
    pub positive_updates: u64,
    pub negative_updates: u64,
    pub discarded_centers: u64,
    pub discarded_contexts: u64,
}

struct DisplayProgress {
    epoch_loss: f64,        // summed -ln(pred) over positive pairs of the epoch
    epoch_pairs: u64,       // number of positive pairs of the epoch
    n_positions: usize,     // length of the token id sequence
    report_every: usize,    // positions between two intra epoch lines
}

impl DisplayProgress {

    fn new(n_positions: usize) -> Self {
        Self {
            epoch_loss: 0.0,
            epoch_pairs: 0,
            n_positions,
            report_every: (n_positions / 10).max(1),
        }
    }

    fn reset(&mut self) {
        self.epoch_loss = 0.0;
        self.epoch_pairs = 0;
    }

    fn add_positive(&mut self, pred: f32) {
        self.epoch_loss -= (pred.max(f32::MIN_POSITIVE) as f64).ln();
        self.epoch_pairs += 1;
    }

    fn loss(&self) -> f64 {
        if self.epoch_pairs == 0 {
            return 0.0;
        }
        self.epoch_loss / self.epoch_pairs as f64
    }
}

/// A single training run: the parameters, the one random stream every draw comes
/// from, the embeddings it mutates and the running counters.
pub struct Train {
    params: TrainParams,
    rng: StdRng,
    embeddings: Embeddings,
    discard: DiscardTable,
    negatives: NegativeSampler,
    stats: TrainStats,
}

impl Train {

    /// `counts` holds one corpus count per vocabulary id. The embeddings are
    /// drawn here, before any training draw.
    pub fn new(counts: &[usize], token_ids: &[usize], params: &TrainParams) -> Result<Train, Box<dyn Error>> {

        let vocab_size = counts.len();
        if vocab_size == 0 {
            return Err("the vocabulary is empty, no token reaches min_count".into());
        }
        if let Some(id) = token_ids.iter().find(|id| **id >= vocab_size) {
            return Err(format!("token id {} is outside of the vocabulary of size {}", id, vocab_size).into());
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let embeddings = Embeddings::new(vocab_size, params.embedding_dim, &mut rng);
        let discard = DiscardTable::new(token_ids, vocab_size, params.sample);
        let negatives = NegativeSampler::new(params.negative_sampling, counts)?;

        Ok(Self {
            params: params.clone(),
            rng,
            embeddings,
            discard,
            negatives,
            stats: TrainStats::default(),
        })
    }

    pub fn embeddings(&self) -> &Embeddings {
        &self.embeddings
    }

    pub fn into_embeddings(self) -> Embeddings {
        self.embeddings
    }

    pub fn stats(&self) -> TrainStats {
        self.stats
    }

    pub fn discard_table(&self) -> &DiscardTable {
        &self.discard
    }

    fn train_position(&mut self, token_ids: &[usize], i: usize, progress: &mut DisplayProgress) {

        let center = token_ids[i];
        if self.discard.discard(center, &mut self.rng) {
            self.stats.discarded_centers += 1;
            return;
        }

        let learning_rate = self.params.learning_rate;
        for (center, context) in context_pairs(token_ids, i, self.params.window_size) {

            if self.discard.discard(context, &mut self.rng) {
                self.stats.discarded_contexts += 1;
                continue;
            }

            let pred = self.embeddings.train_positive(center, context, learning_rate);
            progress.add_positive(pred);
            self.stats.positive_updates += 1;

            // a draw equal to the true context is skipped, not redrawn
            for _ in 0..self.params.negative {
                let negative = self.negatives.sample(&mut self.rng);
                if negative == context {
                    continue;
                }
                self.embeddings.train_negative(center, negative, learning_rate);
                self.stats.negative_updates += 1;
            }
        }
    }

    fn do_epoch(&mut self, token_ids: &[usize], epoch: usize, progress: &mut DisplayProgress) {

        let timer = Instant::now();
        progress.reset();
        println!("Epoch {}/{}", epoch + 1, self.params.epochs);

        for i in 0..token_ids.len() {

            if self.params.progress_verbose && i % progress.report_every == 0 && i > 0 {
                let percent = ((i as f32 / progress.n_positions as f32) * 100.0).floor();
                println!("in epoch {} / {}, {}%, loss: {}", epoch + 1, self.params.epochs, percent, progress.loss());
            }

            self.train_position(token_ids, i, progress);
        }

        println!("finished epoch {}, loss is {}, took: {} seconds...", epoch + 1, progress.loss(), timer.elapsed().as_secs());
    }

    pub fn train(&mut self, token_ids: &[usize]) -> TrainStats {

        let mut progress = DisplayProgress::new(token_ids.len());
        for epoch in 0..self.params.epochs {
            self.do_epoch(token_ids, epoch, &mut progress);
        }
        self.stats
    }

    pub fn run(counts: &[usize], token_ids: &[usize], params: &TrainParams) -> Result<Train, Box<dyn Error>> {
        let mut trainer = Train::new(counts, token_ids, params)?;
        trainer.train(token_ids);
        Ok(trainer)
    }

}
