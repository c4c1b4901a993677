mod config;
mod embedding;
mod pairs;
mod pipeline;
mod sampling;
mod similarity;
mod train;
mod vocab;

pub use config::{Config, NegativeSampling, Params, TrainParams};
pub use embedding::{sigmoid, Embeddings};
pub use pairs::context_pairs;
pub use pipeline::{Model, Pipeline, Report};
pub use sampling::{DiscardTable, NegativeSampler};
pub use similarity::{cosine, l2_norm, Similarity};
pub use train::{Train, TrainStats};
pub use vocab::{AlphaTokenizer, Tokenizer, Vocab};
