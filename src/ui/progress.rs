use indicatif::{ProgressBar, ProgressStyle};

use crate::tx::CodewordSource;

const TEMPLATE: &str =
    "\u{f048a} SEND [{bar:30.cyan}] {percent}% ({pos}/{len} codewords) {msg}";

/// Progress bar over the outgoing codeword stream.
pub struct TxProgress {
    bar: ProgressBar,
}

impl TxProgress {
    pub fn new(total_words: u64, message: &str) -> Self {
        let bar = ProgressBar::new(total_words);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

/// Source adapter that ticks the bar once per codeword pulled.
pub struct WithProgress<S> {
    inner: S,
    progress: TxProgress,
}

impl<S: CodewordSource> WithProgress<S> {
    pub fn new(inner: S, progress: TxProgress) -> Self {
        Self { inner, progress }
    }

    pub fn finish(&self) {
        self.progress.finish();
    }
}

impl<S: CodewordSource> CodewordSource for WithProgress<S> {
    fn next_codeword(&mut self) -> Option<u32> {
        let word = self.inner.next_codeword();
        if word.is_some() {
            self.progress.bar.inc(1);
        }
        word
    }
}
