use chemfinder::Examples::formula_finder_examples::formula_finder_examples;
use chemfinder::Utils::logger::{init_logger, level_for};

pub fn main() {
    init_logger(level_for(false));
    let task: usize = 0;
    formula_finder_examples(task);
}
