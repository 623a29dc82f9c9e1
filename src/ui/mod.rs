pub mod progress;

pub use progress::{TxProgress, WithProgress};

pub fn print_banner(mode: &str) {
    println!("*** START *** {mode}");
}
