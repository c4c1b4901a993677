use serde::Deserialize;
use std::{error::Error, fmt::Display, fs::File, io::BufReader};

/// How negative ids are drawn for each positive pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeSampling {
    /// every vocabulary id with equal probability, regardless of corpus frequency
    Uniform,
    /// proportional to count^0.75
    Unigram,
}

impl Display for NegativeSampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegativeSampling::Uniform => write!(f, "uniform"),
            NegativeSampling::Unigram => write!(f, "unigram"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TrainParams {
    pub window_size: usize,
    pub embedding_dim: usize,
    pub learning_rate: f32,
    pub sample: f32,
    pub negative: usize,
    pub negative_sampling: NegativeSampling,
    pub epochs: usize,
    pub seed: u64,
    pub progress_verbose: bool,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            window_size: 2,
            embedding_dim: 50,
            learning_rate: 0.005,
            sample: 1e-5,
            negative: 40,
            negative_sampling: NegativeSampling::Uniform,
            epochs: 5,
            seed: 42,
            progress_verbose: true,
        }
    }
}

impl Display for TrainParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training hyper parameters:
        window_size: {},
        embedding_dim: {},
        learning_rate: {},
        sample: {},
        negative: {},
        negative_sampling: {},
        epochs: {},
        seed: {},
        progress_verbose: {}",
        self.window_size, self.embedding_dim, self.learning_rate, self.sample, self.negative,
        self.negative_sampling, self.epochs, self.seed, self.progress_verbose
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    pub corpus_file: String,
    pub min_count: usize,
    pub max_vocab_size: Option<usize>,
    pub norm_word: String,
    pub eval_pairs: Vec<(String, String)>,
    pub similar_words: Vec<String>,
    pub top_k: usize,
    #[serde(flatten)]
    pub train: TrainParams,
}

impl Default for Params {
    fn default() -> Self {
        let eval_pairs = [
            ("man", "woman"),
            ("the", "and"),
            ("whale", "whales"),
            ("ship", "boat"),
            ("ahab", "starbuck"),
            ("queequeg", "stubb"),
            ("sea", "ocean"),
            ("captain", "crew"),
            ("man", "sea"),
        ];

        Self {
            corpus_file: "data/corpus.txt".to_string(),
            min_count: 5,
            max_vocab_size: None,
            norm_word: "the".to_string(),
            eval_pairs: eval_pairs.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect(),
            similar_words: Vec::new(),
            top_k: 10,
            train: TrainParams::default(),
        }
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        corpus_file: {}
        min_count: {}
        max_vocab_size: {:?}
        norm_word: {}
        eval_pairs: {}
        similar_words: {:?}
        top_k: {}
        Using training hyper-params: {}",
        self.corpus_file, self.min_count, self.max_vocab_size, self.norm_word,
        self.eval_pairs.len(), self.similar_words, self.top_k, self.train)
    }
}

impl Params {

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {

        let train = &self.train;
        if train.window_size == 0 {
            return Err("window_size should be at least 1".into());
        }
        if train.embedding_dim == 0 {
            return Err("embedding_dim should be at least 1".into());
        }
        if !(train.learning_rate.is_finite() && train.learning_rate > 0.0) {
            return Err(format!("learning_rate should be a positive number, got {}", train.learning_rate).into());
        }
        // a zero threshold would give every token a discard probability of 1
        if !(train.sample.is_finite() && train.sample > 0.0) {
            return Err(format!("sample should be a positive number, got {}", train.sample).into());
        }
        if self.min_count == 0 {
            return Err("min_count should be at least 1".into());
        }
        if self.top_k == 0 {
            return Err("top_k should be at least 1".into());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Params, Box<dyn Error>> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(file_path: &str) -> Result<Params, Box<dyn Error>> {
        let f = File::open(file_path)
            .map_err(|e| format!("cannot open json file {}: {}", file_path, e))?;
        let params: Params = serde_json::from_reader(BufReader::new(f))?;
        params.validate()?;
        Ok(params)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    // no argument runs with the defaults, a single argument is a path to a json file
    pub fn new(args: &[String]) -> Result<Config, Box<dyn Error>> {

        let params = match args.len() {
            0 | 1 => Params::default(),
            2 => Params::from_json_file(&args[1])?,
            _ => return Err("input should be a path to json file only".into()),
        };

        Ok(Self { params })
    }

}
