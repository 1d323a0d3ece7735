use std::path::PathBuf;

pub use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// The command-line interface for the stego codec: hide a bundled virtual
/// filesystem inside an image, or recover one from a stego image.
#[derive(Parser)]
#[command(version, about, long_about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and folders into a virtual filesystem and hide it inside a
    /// carrier image.
    Embed {
        /// The carrier image to hide the payload inside.
        #[arg(long)]
        image: PathBuf,

        /// A file to include in the payload. May be repeated.
        #[arg(long = "file")]
        files: Vec<PathBuf>,

        /// A folder to include in the payload, recursively. May be repeated.
        #[arg(long = "folder")]
        folders: Vec<PathBuf>,

        /// Where to write the stego image.
        #[arg(long)]
        out: PathBuf,

        /// Use only the local CSPRNG, skipping the hosted quantum RNG call.
        #[arg(long)]
        no_external_rng: bool,
    },

    /// Recover the virtual filesystem hidden inside a stego image and
    /// unpack it into a directory.
    Extract {
        /// The stego image to read the payload from.
        #[arg(long)]
        image: PathBuf,

        /// Directory to unpack the recovered files and folders into.
        #[arg(long = "out-dir")]
        out_dir: PathBuf,
    },

    /// Pack files and folders into a virtual filesystem archive without
    /// hiding it inside an image.
    Pack {
        /// A file to include. May be repeated.
        #[arg(long = "file")]
        files: Vec<PathBuf>,

        /// A folder to include, recursively. May be repeated.
        #[arg(long = "folder")]
        folders: Vec<PathBuf>,

        /// Where to write the archive blob.
        #[arg(long)]
        out: PathBuf,
    },

    /// Unpack a virtual filesystem archive into a directory.
    Unpack {
        /// The archive blob to read.
        archive: PathBuf,

        /// Directory to unpack into.
        #[arg(long = "out-dir")]
        out_dir: PathBuf,
    },

    /// List the contents of a virtual filesystem archive without unpacking.
    List {
        /// The archive blob to read.
        archive: PathBuf,
    },

    /// Generate shell completions for the CLI.
    Completion {
        /// The shell to generate completions for.
        shell: Shell,
    },
}
