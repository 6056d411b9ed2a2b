//! The compression driver: glues a model to a prefix coder over a
//! bit-serialized container.
//!
//! Compression asks the model for the `(symbol, distribution)` pairs that
//! encode each message symbol, builds a code tree per distribution, and
//! streams the symbol's code word root-first. Decompression mirrors the
//! walk bit by bit, reporting every decoded symbol back to the model so
//! both sides stay in lockstep.
//!
//! Container layout: a little-endian `u32` holding the number of emitted
//! pairs, then the concatenated code words; trailing bits in the last byte
//! are padding. For adaptive models the pair count exceeds the message
//! length by one per escape.

use std::fs;
use std::path::Path;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::model::{Distribution, Model, TextSymbol};
use crate::symbol::Symbol;
use crate::text::{self, ALPHABET};
use crate::tree::{PrefixCoder, LEFT_BIT};

/// Entropy and rate statistics for the last compression run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressionInfo {
    /// Shannon entropy of the message's empirical distribution, in bits
    /// per symbol.
    pub entropy: f64,
    /// Emitted bits per message symbol.
    pub average_length: f64,
}

/// A symmetric compress/decompress pipeline.
///
/// The model is stateful: construct a fresh `Compressor` for every
/// compression or decompression run, with the same model configuration on
/// both sides.
pub struct Compressor<M, C> {
    model: M,
    coder: C,
    info: CompressionInfo,
}

impl<M: Model, C: PrefixCoder> Compressor<M, C> {
    /// A pipeline over `model` and `coder`.
    pub fn new(model: M, coder: C) -> Self {
        Self {
            model,
            coder,
            info: CompressionInfo::default(),
        }
    }

    /// Statistics gathered by the last [`Compressor::compress`] call.
    pub fn compression_info(&self) -> CompressionInfo {
        self.info
    }

    /// Compress `message` into a self-contained byte container.
    ///
    /// # Errors
    ///
    /// [`Error::SymbolOutsideAlphabet`] if the message was not normalized
    /// to the alphabet, [`Error::MessageTooLong`] if the emitted pair
    /// count overflows the container header.
    pub fn compress(&mut self, message: &str) -> Result<Vec<u8>> {
        let mut writer = BitWriter::new();
        writer.write_u32(0); // pair-count placeholder, patched below

        let mut pair_count: u64 = 0;
        let mut symbol_count: usize = 0;
        for ch in message.chars() {
            if !ALPHABET.contains(&ch) {
                return Err(Error::SymbolOutsideAlphabet(ch));
            }
            let symbol = Symbol::new(ch);
            for (emitted, distribution) in self.model.emit(&symbol) {
                self.write_pair(&mut writer, &emitted, &distribution);
                pair_count += 1;
            }
            symbol_count += 1;
        }

        let pair_count =
            u32::try_from(pair_count).map_err(|_| Error::MessageTooLong(symbol_count))?;

        self.info = Self::gather_info(message, writer.bit_len() - 32, symbol_count);

        let mut bytes = writer.into_bytes();
        bytes[..4].copy_from_slice(&pair_count.to_le_bytes());
        Ok(bytes)
    }

    /// Decompress a container produced by [`Compressor::compress`] with
    /// the same model configuration and coder.
    ///
    /// # Errors
    ///
    /// [`Error::MissingHeader`] on a container shorter than its header,
    /// [`Error::TruncatedStream`] if the bit stream ends mid-walk and
    /// [`Error::CorruptStream`] if bits remain past the declared pair
    /// count that cannot be byte-alignment padding.
    pub fn decompress(&mut self, bytes: &[u8]) -> Result<String> {
        if bytes.len() < 4 {
            return Err(Error::MissingHeader);
        }
        let mut reader = BitReader::new(bytes);
        let pair_count = reader.read_u32().expect("header length checked above");

        let mut output = String::new();
        for _ in 0..pair_count {
            let distribution = self.model.current_distribution();
            let symbol = self.read_pair(&mut reader, &distribution)?;
            self.model.observe(&symbol);
            if let Some(&ch) = symbol.inner() {
                output.push(ch);
            }
        }

        // Once the declared pairs are decoded, only the zero bits that
        // padded the last byte may remain; anything else means the header
        // and the stream disagree.
        if reader.remaining() >= 8 {
            return Err(Error::CorruptStream);
        }
        while let Some(bit) = reader.read_bit() {
            if bit != 0 {
                return Err(Error::CorruptStream);
            }
        }

        Ok(output)
    }

    /// Read the UTF-8 text file at `input`, normalize it with
    /// [`text::preprocess`] and write the compressed container to
    /// `output`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] for any file failure, plus everything
    /// [`Compressor::compress`] reports.
    pub fn compress_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
    ) -> Result<()> {
        let raw = fs::read_to_string(input)?;
        let bytes = self.compress(&text::preprocess(&raw))?;
        fs::write(output, bytes)?;
        Ok(())
    }

    /// Decompress the container at `input` and write the recovered text
    /// to `output`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] for any file failure, plus everything
    /// [`Compressor::decompress`] reports.
    pub fn decompress_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
    ) -> Result<()> {
        let bytes = fs::read(input)?;
        let message = self.decompress(&bytes)?;
        fs::write(output, message)?;
        Ok(())
    }

    /// Emit one `(symbol, distribution)` pair: build the tree, look the
    /// code word up, reverse it so the root-adjacent bit goes out first,
    /// and stream its bits. A one-symbol distribution emits nothing.
    fn write_pair(&self, writer: &mut BitWriter, symbol: &TextSymbol, distribution: &Distribution) {
        let code = self.coder.encode(distribution);
        let mut word = code
            .get(symbol)
            .expect("distribution covers the emitted symbol");
        word.reverse_valid_bits();
        for bit in word.iter_bits() {
            writer.write_bit(bit);
        }
    }

    /// Decode one pair: walk the tree from the root, one bit per level,
    /// until a leaf. A one-node tree consumes no bits.
    fn read_pair(&self, reader: &mut BitReader<'_>, distribution: &Distribution) -> Result<TextSymbol> {
        let tree = self.coder.build_tree(distribution);
        let mut index = 0;
        loop {
            let node = tree.node(index);
            if node.is_leaf() {
                return Ok(node.symbol().expect("leaf carries a symbol").clone());
            }
            let bit = reader.read_bit().ok_or(Error::TruncatedStream)?;
            index = if bit == LEFT_BIT {
                node.left_index().expect("branch has a left child")
            } else {
                node.right_index().expect("branch has a right child")
            };
        }
    }

    fn gather_info(message: &str, payload_bits: usize, symbol_count: usize) -> CompressionInfo {
        if symbol_count == 0 {
            return CompressionInfo::default();
        }
        let mut counts = [0usize; ALPHABET.len()];
        for ch in message.chars() {
            let slot = ALPHABET
                .iter()
                .position(|&a| a == ch)
                .expect("message was validated against the alphabet");
            counts[slot] += 1;
        }
        let total = symbol_count as f64;
        let entropy: f64 = counts
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum();
        CompressionInfo {
            entropy,
            average_length: payload_bits as f64 / total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::Huffman;
    use crate::model::StaticModel;
    use crate::ppm::PpmModel;
    use crate::shannon_fano::ShannonFano;

    fn ppm(order: usize) -> PpmModel {
        PpmModel::new(&ALPHABET, order)
    }

    #[test]
    fn empty_message_is_a_bare_header() {
        let mut compressor = Compressor::new(StaticModel::portuguese(), Huffman);
        let bytes = compressor.compress("").unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);

        let mut decompressor = Compressor::new(StaticModel::portuguese(), Huffman);
        assert_eq!(decompressor.decompress(&bytes).unwrap(), "");
    }

    #[test]
    fn single_symbol_alphabet_costs_only_the_header() {
        let mut alphabet = Distribution::new();
        alphabet.push(Symbol::with_attribute('A', 1));

        let mut compressor = Compressor::new(StaticModel::new(alphabet.clone()), Huffman);
        let bytes = compressor.compress("AAAA").unwrap();
        // every code word has length zero, so only the header remains
        assert_eq!(bytes, vec![4, 0, 0, 0]);

        let mut decompressor = Compressor::new(StaticModel::new(alphabet), Huffman);
        assert_eq!(decompressor.decompress(&bytes).unwrap(), "AAAA");
    }

    #[test]
    fn single_symbol_message_round_trips() {
        let mut compressor = Compressor::new(ppm(0), Huffman);
        let bytes = compressor.compress("A").unwrap();
        // one pair drawn from the equiprobable list
        assert_eq!(&bytes[..4], &1u32.to_le_bytes());

        let mut decompressor = Compressor::new(ppm(0), Huffman);
        assert_eq!(decompressor.decompress(&bytes).unwrap(), "A");
    }

    #[test]
    fn known_ppm_trace_round_trips() {
        let mut compressor = Compressor::new(ppm(0), Huffman);
        let bytes = compressor.compress("AII").unwrap();
        // A, (rho, I), I -> four emitted pairs
        assert_eq!(&bytes[..4], &4u32.to_le_bytes());

        let mut decompressor = Compressor::new(ppm(0), Huffman);
        assert_eq!(decompressor.decompress(&bytes).unwrap(), "AII");
    }

    #[test]
    fn static_and_adaptive_pipelines_round_trip() {
        let message = "A VIDA E O MAIS ENGENHOSO DOS FENOMENOS";

        let mut a = Compressor::new(StaticModel::portuguese(), Huffman);
        let mut b = Compressor::new(StaticModel::portuguese(), Huffman);
        assert_eq!(b.decompress(&a.compress(message).unwrap()).unwrap(), message);

        let mut c = Compressor::new(StaticModel::portuguese(), ShannonFano);
        let mut d = Compressor::new(StaticModel::portuguese(), ShannonFano);
        assert_eq!(d.decompress(&c.compress(message).unwrap()).unwrap(), message);

        for order in [0, 1, 2, 3] {
            let mut e = Compressor::new(ppm(order), Huffman);
            let mut f = Compressor::new(ppm(order), Huffman);
            assert_eq!(f.decompress(&e.compress(message).unwrap()).unwrap(), message);
        }
    }

    #[test]
    fn unknown_symbols_are_rejected_before_any_output() {
        let mut compressor = Compressor::new(StaticModel::portuguese(), Huffman);
        match compressor.compress("olá") {
            Err(Error::SymbolOutsideAlphabet(ch)) => assert_eq!(ch, 'o'),
            other => panic!("expected an alphabet error, got {other:?}"),
        }
    }

    #[test]
    fn truncated_containers_fail_loudly() {
        let mut compressor = Compressor::new(StaticModel::portuguese(), Huffman);
        let bytes = compressor.compress("COMPRESSAO SEM PERDAS").unwrap();

        let mut short = Compressor::new(StaticModel::portuguese(), Huffman);
        assert!(matches!(short.decompress(&bytes[..2]), Err(Error::MissingHeader)));

        let mut cut = Compressor::new(StaticModel::portuguese(), Huffman);
        match cut.decompress(&bytes[..5]) {
            Err(Error::TruncatedStream) => {}
            other => panic!("expected a truncated stream, got {other:?}"),
        }
    }

    #[test]
    fn trailing_garbage_bytes_are_detected() {
        let mut compressor = Compressor::new(ppm(0), Huffman);
        let mut bytes = compressor.compress("AII").unwrap();
        bytes.push(0xFF);

        let mut decompressor = Compressor::new(ppm(0), Huffman);
        assert!(matches!(
            decompressor.decompress(&bytes),
            Err(Error::CorruptStream)
        ));
    }

    #[test]
    fn nonzero_padding_bits_are_detected() {
        let mut compressor = Compressor::new(ppm(0), Huffman);
        let mut bytes = compressor.compress("A").unwrap();
        // the single code word is shorter than a byte, so the container's
        // last byte ends in padding bits; flip the lowest one
        assert_eq!(bytes.len(), 5);
        *bytes.last_mut().unwrap() |= 1;

        let mut decompressor = Compressor::new(ppm(0), Huffman);
        assert!(matches!(
            decompressor.decompress(&bytes),
            Err(Error::CorruptStream)
        ));
    }

    #[test]
    fn file_helpers_round_trip_and_surface_io_errors() {
        let dir = std::env::temp_dir();
        let input = dir.join("ppmc_compressor_file_test_input.txt");
        let container = dir.join("ppmc_compressor_file_test.ppmc");
        let output = dir.join("ppmc_compressor_file_test_output.txt");
        std::fs::write(&input, "Fui descalçar as botas!").unwrap();

        let mut compressor = Compressor::new(ppm(2), Huffman);
        compressor.compress_file(&input, &container).unwrap();
        let mut decompressor = Compressor::new(ppm(2), Huffman);
        decompressor.decompress_file(&container, &output).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "FUI DESCALCAR AS BOTAS"
        );

        let missing = dir.join("ppmc_compressor_file_test_missing.txt");
        let _ = std::fs::remove_file(&missing);
        let mut failing = Compressor::new(ppm(2), Huffman);
        assert!(matches!(
            failing.compress_file(&missing, &container),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn compression_info_reflects_the_run() {
        let message = "ABRACADABRA ABRACADABRA ABRACADABRA";
        let mut compressor = Compressor::new(StaticModel::portuguese(), Huffman);
        compressor.compress(message).unwrap();
        let info = compressor.compression_info();
        assert!(info.entropy > 0.0);
        assert!(info.average_length >= info.entropy);
    }
}
