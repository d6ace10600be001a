use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use huff_rust::{run, Mode, Properties};

#[derive(Parser, Debug)]
#[command(
    name = "huff",
    about = "Compress or decompress standard input to standard output with per-block Huffman codes",
    group(ArgGroup::new("mode").required(true).args(["compress", "decompress"]))
)]
struct Args {
    /// Compress: read the original data and output compressed data
    #[arg(short, long)]
    compress: bool,
    /// Decompress: read the compressed data and output original data
    #[arg(short, long)]
    decompress: bool,
    /// Block size in bytes, in [1024, 65536]
    #[arg(short, long, requires = "compress", value_parser = clap::value_parser!(u32).range(1024..=65536))]
    block_size: Option<u32>,
    /// Properties file providing defaults (key: blocksize)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print run statistics as JSON on standard error
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let mode = if args.compress { Mode::Compress } else { Mode::Decompress };

    let props = match args.config.as_ref().map(Properties::from_file).transpose() {
        Ok(props) => props.unwrap_or_default(),
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let props = match args.block_size {
        Some(block_size) => match props.set_block_size(block_size as usize) {
            Ok(props) => props,
            Err(e) => {
                eprintln!("Invalid options: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => props,
    };

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    match run(mode, &props, stdin, stdout) {
        Ok(stats) => {
            if args.stats {
                let report = serde_json::json!({ "mode": mode, "properties": props, "stats": stats });
                eprintln!("{report}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match mode {
                Mode::Compress => eprintln!("Compression error: {e}"),
                Mode::Decompress => eprintln!("Decompression error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}
