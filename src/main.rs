#![allow(non_snake_case)]
use RustedSolids::Examples::revolution_examples::revolution_examples;
use RustedSolids::Utils::logger::init_logger;
use log::LevelFilter;

fn main() {
    init_logger(LevelFilter::Info, None);
    let example = 0;
    match example {
        0 => {
            // exact volume of |x| about y = x + 4
            revolution_examples(0);
        }
        1 => {
            // Simpson's rule about y = 2x + 2
            revolution_examples(1);
        }
        2 => {
            // picture of x^3 revolved by 2π
            revolution_examples(2);
        }
        3 => {
            // gif of sin(x) + x^2
            revolution_examples(3);
        }
        4 => {
            revolution_examples(4);
        }
        5 => {
            // task document
            revolution_examples(5);
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
