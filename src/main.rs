use std::process;
use skipgram_trainer::Pipeline;

// corpus path and hyper parameters come from an optional json file given as the
// only argument, see `Params` for the keys and their defaults

fn main() {
    if let Err(e) = Pipeline::run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}
