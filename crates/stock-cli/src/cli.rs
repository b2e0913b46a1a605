use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stock",
    about = "Leather goods inventory: scan, organize, and browse stock by brand and model",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file (data_dir, storage_key)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stock document (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage slot name (overrides config)
    #[arg(long, global = true)]
    pub key: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a barcode under a brand and model
    Add(AddArgs),
    /// Read barcodes from a keyboard-wedge scanner on stdin
    Scan(ScanArgs),
    /// List stock grouped by brand and model
    List(ListArgs),
    /// Find which brand and model hold a barcode
    Find(FindArgs),
    /// Delete a barcode, model, or brand
    Delete(DeleteArgs),
    /// Set the image URL of a brand or model
    Image(ImageArgs),
    /// Print the stored document as JSON
    Export,
}

#[derive(Args)]
pub struct AddArgs {
    pub brand: String,
    pub model: String,
    pub barcode: String,
    #[arg(long)]
    pub brand_image: Option<String>,
    #[arg(long)]
    pub model_image: Option<String>,
}

#[derive(Args)]
pub struct ScanArgs {
    pub brand: String,
    pub model: String,
    #[arg(long)]
    pub brand_image: Option<String>,
    #[arg(long)]
    pub model_image: Option<String>,
    /// Keep reading until end of input instead of stopping after one scan
    #[arg(long)]
    pub continuous: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show this brand
    #[arg(long)]
    pub brand: Option<String>,
}

#[derive(Args)]
pub struct FindArgs {
    pub barcode: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(subcommand)]
    pub target: DeleteTarget,
}

#[derive(Subcommand)]
pub enum DeleteTarget {
    /// Delete one barcode by id (a unique id prefix is enough)
    Barcode { brand: String, model: String, id: String },
    /// Delete a model and all its barcodes
    Model { brand: String, model: String },
    /// Delete a brand and everything under it
    Brand { brand: String },
}

#[derive(Args)]
pub struct ImageArgs {
    #[command(subcommand)]
    pub target: ImageTarget,
}

#[derive(Subcommand)]
pub enum ImageTarget {
    Brand { brand: String, url: String },
    Model { brand: String, model: String, url: String },
}
