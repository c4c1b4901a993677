// imports
use crate::config::{Config, Params};
use crate::embedding::Embeddings;
use crate::similarity::Similarity;
use crate::train::{Train, TrainStats};
use crate::vocab::{AlphaTokenizer, Tokenizer, Vocab};

use std::env;
use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::time::Instant;


/// Everything a finished run leaves behind.
pub struct Model {
    pub vocab: Vocab,
    pub embeddings: Embeddings,
    pub stats: TrainStats,
}

impl Model {
    pub fn similarity(&self) -> Similarity<'_> {
        Similarity::new(self.embeddings.w_in().view(), &self.vocab)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub negative_updates: u64,
    pub norm: Option<(String, f32)>,
    pub similarities: Vec<(String, String, f32)>,
    pub most_similar: Vec<(String, Vec<(String, f32)>)>,
    pub missing: Vec<String>,
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NEG Updates: {}", self.negative_updates)?;
        if let Some((word, norm)) = &self.norm {
            writeln!(f, "L2 norm of word {}: {}", word, norm)?;
        }
        for (a, b, sim) in &self.similarities {
            writeln!(f, "Cosine similarity between {} and {}: {}", a, b, sim)?;
        }
        for (token, similar) in &self.most_similar {
            writeln!(f, "{} most similar words to {}", similar.len(), token)?;
            for (i, (similar_token, score)) in similar.iter().enumerate() {
                writeln!(f, "{} : {} ? {} = {}", i, token, similar_token, score)?;
            }
        }
        Ok(())
    }
}

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure of 3 steps -
    // -> configuration of arguments
    // -> vocabulary building and training
    // -> evaluation of word pairs

    pub fn run() -> Result<(), Box<dyn Error>> {

        println!("entering program...");
        let args: Vec<String> = env::args().collect();

        println!("building parameters...");
        let params = Config::new(&args)?.get_params();
        println!("{}", params);

        let text = Pipeline::read_corpus(&params.corpus_file)?;

        let timer = Instant::now();
        let model = Pipeline::train_text(&text, &params)?;
        println!("Training completed.");
        println!("finished training, took {} seconds ...", timer.elapsed().as_secs());

        let report = Pipeline::evaluate(&model, &params);
        print!("{}", report);

        Ok(())
    }

    pub fn read_corpus(file_path: &str) -> Result<String, Box<dyn Error>> {

        let bytes = fs::read(file_path)
            .map_err(|e| format!("Failed to open file: {} ({})", file_path, e))?;
        println!("File opened successfully: {}\nsize: {}", file_path, bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn train_text(text: &str, params: &Params) -> Result<Model, Box<dyn Error>> {

        params.validate()?;

        println!("starting vocab building...");
        let tokens = AlphaTokenizer.tokenize(text);
        let vocab = Vocab::build(&tokens, params.min_count, params.max_vocab_size);
        let token_ids = vocab.encode(&tokens);
        println!("using {} tokens with count >= {} out of {} tokens, {} training positions",
            vocab.len(), params.min_count, tokens.len(), token_ids.len());

        let trainer = Train::run(vocab.counts(), &token_ids, &params.train)?;
        let stats = trainer.stats();
        println!("positive updates: {}, discarded centers: {}, discarded contexts: {}",
            stats.positive_updates, stats.discarded_centers, stats.discarded_contexts);

        Ok(Model {
            vocab,
            embeddings: trainer.into_embeddings(),
            stats,
        })
    }

    /// Missing words are reported on stderr and their comparison is skipped.
    pub fn evaluate(model: &Model, params: &Params) -> Report {

        let sim = model.similarity();
        let mut report = Report {
            negative_updates: model.stats.negative_updates,
            ..Report::default()
        };

        let mut note_missing = |e: Box<dyn Error>, word: &str| {
            eprintln!("{}", e);
            report_missing(&mut report.missing, word);
        };

        match sim.norm(&params.norm_word) {
            Ok(norm) => report.norm = Some((params.norm_word.clone(), norm)),
            Err(e) => note_missing(e, params.norm_word.as_str()),
        }

        for (a, b) in &params.eval_pairs {
            let mut present = true;
            for word in [a, b] {
                if sim.get_id(word).is_none() {
                    note_missing(format!("Word not in vocab: {}", word).into(), word.as_str());
                    present = false;
                }
            }
            if !present {
                continue;
            }
            if let Ok(value) = sim.cosine(a, b) {
                report.similarities.push((a.clone(), b.clone(), value));
            }
        }

        for token in &params.similar_words {
            match sim.find_k_most_similar(token, params.top_k) {
                Ok(similar) => report.most_similar.push((token.clone(), similar)),
                Err(e) => note_missing(e, token.as_str()),
            }
        }

        report
    }

}

fn report_missing(missing: &mut Vec<String>, word: &str) {
    if !missing.iter().any(|m| m == word) {
        missing.push(word.to_string());
    }
}


#[cfg(test)]
mod tests {

    use super::Pipeline;
    use crate::config::{Params, TrainParams};

    fn whale_corpus() -> String {
        // the: 3 x 5, whale: 3 x 4, swims and dives: 3 each
        "the whale swims the whale dives the whale the whale the ".repeat(3)
    }

    fn small_params() -> Params {
        Params {
            eval_pairs: vec![
                ("the".to_string(), "whale".to_string()),
                ("the".to_string(), "nonexistent".to_string()),
                ("swims".to_string(), "dives".to_string()),
            ],
            similar_words: vec!["whale".to_string()],
            train: TrainParams {
                progress_verbose: false,
                ..TrainParams::default()
            },
            ..Params::default()
        }
    }

    #[test]
    fn whale_scenario() {
        let params = small_params();
        let model = Pipeline::train_text(&whale_corpus(), &params).unwrap();

        assert_eq!(model.vocab.len(), 2);
        let mut kept = model.vocab.tokens().collect::<Vec<&str>>();
        kept.sort();
        assert_eq!(kept, ["the", "whale"]);
        assert_eq!(model.embeddings.w_in().dim(), (2, 50));

        let sim = model.similarity();
        assert!(sim.get_id("the").is_some());
        assert!(sim.get_id("whale").is_some());
        assert!(sim.get_id("nonexistent").is_none());
        let c = sim.cosine("the", "whale").unwrap();
        assert!(c.is_finite() && (-1.0..=1.0).contains(&c));

        let report = Pipeline::evaluate(&model, &params);
        assert_eq!(report.similarities.len(), 1);
        assert_eq!(report.similarities[0].0, "the");
        assert_eq!(report.similarities[0].1, "whale");
        assert_eq!(report.missing, ["nonexistent", "swims", "dives"]);
        assert!(report.norm.is_some());
        assert_eq!(report.most_similar.len(), 1);
        assert_eq!(report.most_similar[0].1[0].0, "the");

        let text = report.to_string();
        assert!(text.contains("Cosine similarity between the and whale: "));
        assert!(text.contains("L2 norm of word the: "));
        assert!(text.starts_with(&format!("NEG Updates: {}\n", model.stats.negative_updates)));
    }

    #[test]
    fn runs_are_reproducible() {
        let params = small_params();
        let corpus = "call me ishmael some years ago never mind how long precisely ".repeat(6);
        let a = Pipeline::train_text(&corpus, &params).unwrap();
        let b = Pipeline::train_text(&corpus, &params).unwrap();

        assert_eq!(a.embeddings.w_in(), b.embeddings.w_in());
        assert_eq!(a.embeddings.w_out(), b.embeddings.w_out());
        assert_eq!(a.stats, b.stats);
        for token in a.vocab.tokens() {
            assert_eq!(a.vocab.get_id(token), b.vocab.get_id(token));
        }

        let ra = Pipeline::evaluate(&a, &params).to_string();
        let rb = Pipeline::evaluate(&b, &params).to_string();
        assert_eq!(ra, rb);
    }

    #[test]
    fn corpus_without_frequent_words_is_fatal() {
        let params = small_params();
        assert!(Pipeline::train_text("", &params).is_err());
        assert!(Pipeline::train_text("one two three, 4 5 6", &params).is_err());
    }

    #[test]
    fn missing_corpus_file_is_fatal() {
        assert!(Pipeline::read_corpus("no/such/corpus.txt").is_err());
    }

    #[test]
    fn invalid_params_stop_before_training() {
        let mut params = small_params();
        params.train.embedding_dim = 0;
        assert!(Pipeline::train_text(&whale_corpus(), &params).is_err());
    }
}
