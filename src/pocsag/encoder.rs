use tracing::debug;

use crate::error::{TxError, TxResult};
use crate::pocsag::bch;

/// POCSAG batch sync word.
pub const SYNC_WORD: u32 = 0x7CD215D8;

/// POCSAG idle codeword, filling every unused batch slot.
pub const IDLE_WORD: u32 = 0x7A89C197;

/// The preamble is 576 bits of alternating 1/0: 18 words of 0xAAAAAAAA.
pub const PREAMBLE_WORD: u32 = 0xAAAA_AAAA;
pub const PREAMBLE_WORDS: usize = 18;

/// Codewords per batch: 8 frames of 2.
pub const BATCH_CODEWORDS: usize = 16;

/// Builds the on-air codeword stream: preamble, then batches of
/// sync + 16 codewords with messages slotted into the frame selected by
/// the pager's capcode.
pub struct Transmission {
    words: Vec<u32>,
    /// Codewords pushed into the currently open batch, 0..=16.
    slot: usize,
}

impl Transmission {
    /// Start a transmission with the preamble already in place.
    pub fn new() -> Self {
        let mut words = Vec::with_capacity(PREAMBLE_WORDS + 1 + BATCH_CODEWORDS);
        words.extend(std::iter::repeat(PREAMBLE_WORD).take(PREAMBLE_WORDS));
        Self { words, slot: BATCH_CODEWORDS }
    }

    /// Append one alphanumeric page.
    ///
    /// The address codeword lands in frame `capcode & 7`; message codewords
    /// follow in consecutive slots, spilling into further batches as needed.
    /// Characters go out as 7-bit ASCII, least significant bit first; the
    /// final codeword is padded with zero bits. An empty message produces a
    /// tone-only page (address codeword alone).
    pub fn add_message(
        &mut self,
        capcode: u32,
        function: u8,
        message: &str,
    ) -> TxResult<()> {
        if capcode > 0x1F_FFFF {
            return Err(TxError::config(format!(
                "capcode {capcode} does not fit in 21 bits"
            )));
        }
        if function > 3 {
            return Err(TxError::config(format!(
                "function code {function} out of range (0-3)"
            )));
        }

        self.begin_batch();

        // Idle-fill up to the frame addressed by the capcode's low bits.
        let frame = (capcode & 7) as usize;
        for _ in 0..frame * 2 {
            self.push_codeword(IDLE_WORD);
        }

        // Address codeword: flag bit 0, 18 high capcode bits, function.
        let address_data = ((capcode >> 3) & 0x3_FFFF) << 2 | function as u32;
        self.push_codeword(bch::seal(address_data));

        // Message codewords: flag bit 1, 20 data bits each.
        let bits = message_bits(message);
        for chunk in bits.chunks(20) {
            let mut field: u32 = 0;
            for (i, &bit) in chunk.iter().enumerate() {
                if bit {
                    field |= 1 << (19 - i);
                }
            }
            self.push_codeword(bch::seal((1 << 20) | field));
        }

        // Close out the batch.
        while self.slot < BATCH_CODEWORDS {
            self.words.push(IDLE_WORD);
            self.slot += 1;
        }

        debug!(
            "page queued: capcode={capcode}, function={function}, {} chars, {} codewords total",
            message.len(),
            self.words.len()
        );
        Ok(())
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    fn begin_batch(&mut self) {
        self.words.push(SYNC_WORD);
        self.slot = 0;
    }

    fn push_codeword(&mut self, word: u32) {
        if self.slot == BATCH_CODEWORDS {
            self.begin_batch();
        }
        self.words.push(word);
        self.slot += 1;
    }
}

impl Default for Transmission {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a message into transmission-ordered bits: 7-bit ASCII per
/// character, LSB first. Non-ASCII input is masked to 7 bits, matching the
/// byte-oriented behavior of classic encoders.
fn message_bits(message: &str) -> Vec<bool> {
    let mut bits = Vec::with_capacity(message.len() * 7);
    for byte in message.bytes() {
        let ch = byte & 0x7F;
        for i in 0..7 {
            bits.push((ch >> i) & 1 == 1);
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of the encoder's packing, for round-trip checks: pull the
    /// 20-bit fields out of message codewords and rebuild the 7-bit chars.
    fn decode_alpha(words: &[u32]) -> String {
        let mut bits = Vec::new();
        for &w in words {
            if w == SYNC_WORD || w == IDLE_WORD || w & 0x8000_0000 == 0 {
                continue;
            }
            for bit in (11..31).rev() {
                bits.push((w >> bit) & 1 == 1);
            }
        }
        let mut out = String::new();
        for chunk in bits.chunks(7) {
            if chunk.len() < 7 {
                break;
            }
            let val = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &b)| acc | if b { 1 << i } else { 0 });
            if val == 0 {
                break;
            }
            out.push(val as char);
        }
        out
    }

    #[test]
    fn transmission_opens_with_the_preamble() {
        let tx = Transmission::new();
        assert_eq!(tx.words().len(), PREAMBLE_WORDS);
        assert!(tx.words().iter().all(|&w| w == PREAMBLE_WORD));
    }

    #[test]
    fn batches_are_sync_plus_sixteen_codewords() {
        let mut tx = Transmission::new();
        tx.add_message(1234567, 3, "HELLO WORLD").unwrap();
        let words = tx.words();
        let body = &words[PREAMBLE_WORDS..];
        assert_eq!(body[0], SYNC_WORD);
        assert_eq!(body.len() % (BATCH_CODEWORDS + 1), 0);
        for batch in body.chunks(BATCH_CODEWORDS + 1) {
            assert_eq!(batch[0], SYNC_WORD);
            assert_eq!(batch.len(), BATCH_CODEWORDS + 1);
        }
    }

    #[test]
    fn address_codeword_sits_in_the_capcode_frame() {
        for capcode in [0u32, 5, 8, 0x1F_FFFF] {
            let mut tx = Transmission::new();
            tx.add_message(capcode, 0, "").unwrap();
            let body = &tx.words()[PREAMBLE_WORDS..];
            let frame = (capcode & 7) as usize;
            for slot in 0..frame * 2 {
                assert_eq!(body[1 + slot], IDLE_WORD, "capcode {capcode}");
            }
            let addr = body[1 + frame * 2];
            assert_eq!(addr & 0x8000_0000, 0, "address flag bit must be 0");
            assert_eq!((addr >> 13) & 0x3_FFFF, capcode >> 3);
        }
    }

    #[test]
    fn every_generated_codeword_passes_the_bch_check() {
        let mut tx = Transmission::new();
        tx.add_message(196613, 3, "BCH SELF TEST 123").unwrap();
        for &w in &tx.words()[PREAMBLE_WORDS..] {
            assert_eq!(bch::syndrome(w), 0, "codeword {w:08X}");
            assert_eq!(w.count_ones() % 2, 0, "parity of {w:08X}");
        }
    }

    #[test]
    fn alpha_message_round_trips() {
        let mut tx = Transmission::new();
        tx.add_message(42, 3, "RUST ON AIR").unwrap();
        let decoded = decode_alpha(&tx.words()[PREAMBLE_WORDS..]);
        assert_eq!(decoded, "RUST ON AIR");
    }

    #[test]
    fn long_message_spills_into_a_second_batch() {
        let mut tx = Transmission::new();
        let msg = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 0123456789";
        tx.add_message(7, 3, msg).unwrap();
        let body = &tx.words()[PREAMBLE_WORDS..];
        assert!(body.len() > BATCH_CODEWORDS + 1);
        assert_eq!(decode_alpha(body), msg);
    }

    #[test]
    fn tone_only_page_has_no_message_codewords() {
        let mut tx = Transmission::new();
        tx.add_message(99, 1, "").unwrap();
        let body = &tx.words()[PREAMBLE_WORDS..];
        assert!(body.iter().all(|&w| w & 0x8000_0000 == 0));
    }

    #[test]
    fn oversized_capcode_and_function_are_rejected() {
        let mut tx = Transmission::new();
        assert!(tx.add_message(0x20_0000, 0, "X").is_err());
        assert!(tx.add_message(1, 4, "X").is_err());
    }
}
