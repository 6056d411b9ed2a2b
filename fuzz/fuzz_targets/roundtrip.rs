#![no_main]
use libfuzzer_sys::fuzz_target;
use ppmc::{text, Compressor, Huffman, PpmModel, ShannonFano, StaticModel};

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (raw, order) = data;
    let order = usize::from(order % 4);

    // Map arbitrary bytes into the 27-symbol alphabet.
    let message: String = raw
        .iter()
        .map(|&b| text::ALPHABET[usize::from(b) % text::ALPHABET.len()])
        .collect();

    let mut compressor = Compressor::new(PpmModel::new(&text::ALPHABET, order), Huffman);
    let bytes = compressor.compress(&message).unwrap();
    let mut decompressor = Compressor::new(PpmModel::new(&text::ALPHABET, order), Huffman);
    assert_eq!(decompressor.decompress(&bytes).unwrap(), message);

    let mut compressor = Compressor::new(StaticModel::portuguese(), ShannonFano);
    let bytes = compressor.compress(&message).unwrap();
    let mut decompressor = Compressor::new(StaticModel::portuguese(), ShannonFano);
    assert_eq!(decompressor.decompress(&bytes).unwrap(), message);
});
