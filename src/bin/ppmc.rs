use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgGroup, Parser, ValueEnum};

use ppmc::{
    text, CompressionInfo, Compressor, Huffman, Model, PpmModel, PrefixCoder, ShannonFano,
    StaticModel,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Prefix-code compressor for normalized Portuguese text")]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// Input file
    #[arg(short = 'i', value_name = "FILE")]
    input: PathBuf,

    /// Output file
    #[arg(short = 'o', value_name = "FILE")]
    output: PathBuf,

    /// Compress the input (text is normalized first)
    #[arg(short = 'c')]
    compress: bool,

    /// Decompress the input
    #[arg(short = 'd')]
    decompress: bool,

    /// Probability model; decompression must match the compressing run
    #[arg(long, value_enum, default_value_t = ModelKind::Ppm)]
    model: ModelKind,

    /// Prefix coder; decompression must match the compressing run
    #[arg(long, value_enum, default_value_t = CoderKind::Huffman)]
    coder: CoderKind,

    /// Maximum PPM context order
    #[arg(long, default_value_t = 2)]
    order: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModelKind {
    /// Fixed Portuguese letter frequencies
    Static,
    /// Adaptive prediction by partial matching
    Ppm,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CoderKind {
    Huffman,
    ShannonFano,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.compress {
        let info = compress_with(&cli)?;
        eprintln!(
            "entropy {:.4} bits/symbol, average code length {:.4} bits/symbol",
            info.entropy, info.average_length,
        );
    } else {
        debug_assert!(cli.decompress);
        decompress_with(&cli)?;
    }

    Ok(())
}

fn compress_with(cli: &Cli) -> anyhow::Result<CompressionInfo> {
    match (cli.model, cli.coder) {
        (ModelKind::Static, CoderKind::Huffman) => {
            run_compress(StaticModel::portuguese(), Huffman, cli)
        }
        (ModelKind::Static, CoderKind::ShannonFano) => {
            run_compress(StaticModel::portuguese(), ShannonFano, cli)
        }
        (ModelKind::Ppm, CoderKind::Huffman) => {
            run_compress(PpmModel::new(&text::ALPHABET, cli.order), Huffman, cli)
        }
        (ModelKind::Ppm, CoderKind::ShannonFano) => {
            run_compress(PpmModel::new(&text::ALPHABET, cli.order), ShannonFano, cli)
        }
    }
}

fn decompress_with(cli: &Cli) -> anyhow::Result<()> {
    match (cli.model, cli.coder) {
        (ModelKind::Static, CoderKind::Huffman) => {
            run_decompress(StaticModel::portuguese(), Huffman, cli)
        }
        (ModelKind::Static, CoderKind::ShannonFano) => {
            run_decompress(StaticModel::portuguese(), ShannonFano, cli)
        }
        (ModelKind::Ppm, CoderKind::Huffman) => {
            run_decompress(PpmModel::new(&text::ALPHABET, cli.order), Huffman, cli)
        }
        (ModelKind::Ppm, CoderKind::ShannonFano) => {
            run_decompress(PpmModel::new(&text::ALPHABET, cli.order), ShannonFano, cli)
        }
    }
}

fn run_compress<M: Model, C: PrefixCoder>(
    model: M,
    coder: C,
    cli: &Cli,
) -> anyhow::Result<CompressionInfo> {
    let mut compressor = Compressor::new(model, coder);
    compressor
        .compress_file(&cli.input, &cli.output)
        .with_context(|| {
            format!(
                "compressing {} into {}",
                cli.input.display(),
                cli.output.display()
            )
        })?;
    Ok(compressor.compression_info())
}

fn run_decompress<M: Model, C: PrefixCoder>(model: M, coder: C, cli: &Cli) -> anyhow::Result<()> {
    let mut compressor = Compressor::new(model, coder);
    compressor
        .decompress_file(&cli.input, &cli.output)
        .with_context(|| {
            format!(
                "decompressing {} into {}",
                cli.input.display(),
                cli.output.display()
            )
        })
}
