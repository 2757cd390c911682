//! AES-128 key schedule and block encryption.

use crate::block::Block;
use crate::key::{Aes128Key, RoundKeys, ROUNDS};
use crate::observer::{RoundObserver, Step};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::sbox;

/// Round constants for key expansion. Index 0 is never read.
pub const RCON: [u32; ROUNDS + 1] = [
    0x0000_0000,
    0x0100_0000,
    0x0200_0000,
    0x0400_0000,
    0x0800_0000,
    0x1000_0000,
    0x2000_0000,
    0x4000_0000,
    0x8000_0000,
    0x1b00_0000,
    0x3600_0000,
];

const KEY_WORDS: usize = 4;
const SCHEDULE_WORDS: usize = 4 * (ROUNDS + 1);

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a 128-bit key into 11 round keys.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let mut w = [0u32; SCHEDULE_WORDS];
    for (word, chunk) in w.iter_mut().zip(key.0.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in KEY_WORDS..SCHEDULE_WORDS {
        let mut temp = w[i - 1];
        if i % KEY_WORDS == 0 {
            temp = sub_word(rot_word(temp)) ^ RCON[i / KEY_WORDS];
        }
        w[i] = w[i - KEY_WORDS] ^ temp;
    }

    let mut round_keys = [[0u8; 16]; ROUNDS + 1];
    for (round_key, words) in round_keys.iter_mut().zip(w.chunks_exact(4)) {
        for (column, word) in round_key.chunks_exact_mut(4).zip(words) {
            column.copy_from_slice(&word.to_be_bytes());
        }
    }

    RoundKeys(round_keys)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    encrypt_block_observed(block, round_keys, &mut ())
}

/// Encrypts a block, reporting every intermediate state to `observer`.
///
/// The observer sees the schedule first, then each step of each round, then
/// the state at the end of every round (round 0 being the initial key
/// addition).
pub fn encrypt_block_observed<O: RoundObserver + ?Sized>(
    block: &Block,
    round_keys: &RoundKeys,
    observer: &mut O,
) -> Block {
    let mut state = *block;
    observer.on_key_schedule(round_keys);

    add_round_key(&mut state, round_keys.get(0));
    observer.on_step(0, Step::AddRoundKey, &state);
    observer.on_round(0, &state);

    for round in 1..=ROUNDS {
        sub_bytes(&mut state);
        observer.on_step(round, Step::SubBytes, &state);
        shift_rows(&mut state);
        observer.on_step(round, Step::ShiftRows, &state);
        if round != ROUNDS {
            mix_columns(&mut state);
            observer.on_step(round, Step::MixColumns, &state);
        }
        add_round_key(&mut state, round_keys.get(round));
        observer.on_step(round, Step::AddRoundKey, &state);
        observer.on_round(round, &state);
    }

    state
}

/// An AES-128 encryptor holding its own expanded key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128 {
    round_keys: RoundKeys,
}

impl Aes128 {
    /// Expands `key` and wraps the resulting schedule.
    pub fn new(key: &Aes128Key) -> Self {
        Self {
            round_keys: expand_key(key),
        }
    }

    /// Returns the expanded schedule.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }

    /// Encrypts one block.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        encrypt_block(block, &self.round_keys)
    }

    /// Encrypts one block while reporting to `observer`.
    pub fn encrypt_block_observed<O: RoundObserver + ?Sized>(
        &self,
        block: &Block,
        observer: &mut O,
    ) -> Block {
        encrypt_block_observed(block, &self.round_keys, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const NIST_KEY: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const NIST_CIPHER: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    // FIPS-197 Appendix A.1 key.
    const APPENDIX_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    #[test]
    fn encrypt_matches_nist_vector() {
        let key = Aes128Key::from(NIST_KEY);
        let round_keys = expand_key(&key);
        let ct = encrypt_block(&NIST_PLAIN, &round_keys);
        assert_eq!(ct, NIST_CIPHER);
    }

    #[test]
    fn expansion_matches_appendix_a() {
        let round_keys = expand_key(&Aes128Key::from(APPENDIX_KEY));
        assert_eq!(round_keys.get(0), &APPENDIX_KEY);
        assert_eq!(
            round_keys.get(1),
            &[
                0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a, 0x6c,
                0x76, 0x05
            ]
        );
        assert_eq!(
            round_keys.get(10),
            &[
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6, 0x63,
                0x0c, 0xa6
            ]
        );
    }

    #[test]
    fn expansion_is_deterministic() {
        let key = Aes128Key::from(NIST_KEY);
        let first = expand_key(&key);
        let second = expand_key(&key);
        assert_eq!(first.to_bytes(), second.to_bytes());
        assert_eq!(first.get(0), &NIST_KEY);
    }

    #[test]
    fn encryption_leaves_schedule_untouched() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        let snapshot = round_keys;
        let first = encrypt_block(&NIST_PLAIN, &round_keys);
        for _ in 0..8 {
            assert_eq!(encrypt_block(&NIST_PLAIN, &round_keys), first);
        }
        assert_eq!(round_keys, snapshot);
    }

    #[test]
    fn zero_key_zero_block() {
        let round_keys = expand_key(&Aes128Key::from([0u8; 16]));
        let ct = encrypt_block(&[0u8; 16], &round_keys);
        assert_ne!(ct, [0u8; 16]);
        assert_eq!(
            ct,
            [
                0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca, 0x34,
                0x2b, 0x2e
            ]
        );
    }

    #[test]
    fn matches_reference_crate_random() {
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        for _ in 0..200 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);

            let ours = Aes128::new(&Aes128Key::from(key_bytes)).encrypt_block(&block);

            let reference = aes::Aes128::new(&GenericArray::from(key_bytes));
            let mut expected = GenericArray::from(block);
            reference.encrypt_block(&mut expected);

            assert_eq!(ours[..], expected[..]);
        }
    }

    #[test]
    fn single_bit_flip_avalanches() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let mut key_bytes = [0u8; 16];
        rng.fill_bytes(&mut key_bytes);
        let cipher = Aes128::new(&Aes128Key::from(key_bytes));

        let mut total = 0u32;
        let trials = 128u32;
        for bit in 0..trials {
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut block);
            let base = cipher.encrypt_block(&block);
            block[(bit / 8) as usize] ^= 1 << (bit % 8);
            let flipped = cipher.encrypt_block(&block);
            let changed: u32 = base
                .iter()
                .zip(flipped.iter())
                .map(|(a, b)| (a ^ b).count_ones())
                .sum();
            assert!(changed >= 20, "only {changed} bits changed");
            total += changed;
        }
        let mean = total / trials;
        assert!((48..=80).contains(&mean), "mean flipped bits {mean}");
    }

    #[test]
    fn observer_sees_every_round() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        let mut recorder = RecordingObserver::default();
        let ct = encrypt_block_observed(&NIST_PLAIN, &round_keys, &mut recorder);

        assert_eq!(recorder.schedule, Some(round_keys));
        assert_eq!(recorder.rounds.len(), ROUNDS + 1);
        assert_eq!(recorder.rounds[ROUNDS], ct);
        // Appendix C.1: state after the initial key addition.
        assert_eq!(
            recorder.rounds[0],
            [
                0x00, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xa0, 0xb0, 0xc0, 0xd0,
                0xe0, 0xf0
            ]
        );
        // Four steps per full round, three in the last, one for round 0.
        assert_eq!(recorder.steps, 1 + 4 * (ROUNDS - 1) + 3);
    }
}
