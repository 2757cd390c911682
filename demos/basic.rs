//! Expands a key, encrypts one block and prints the state after each round.

use aes_core::{encrypt_block, expand_key, rows, Aes128, Aes128Key, RecordingObserver};

fn main() {
    // FIPS-197 Appendix C.1.
    let key = Aes128Key::from([
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ]);
    let block = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    let cipher = Aes128::new(&key);
    let mut recorder = RecordingObserver::default();
    let ciphertext = cipher.encrypt_block_observed(&block, &mut recorder);

    for (round, state) in recorder.rounds.iter().enumerate() {
        println!("round {round:2}:");
        for row in rows(state) {
            println!("  {:02x} {:02x} {:02x} {:02x}", row[0], row[1], row[2], row[3]);
        }
    }

    assert_eq!(ciphertext, encrypt_block(&block, &expand_key(&key)));
    println!("example succeeded; ciphertext matches the plain pipeline");
}
