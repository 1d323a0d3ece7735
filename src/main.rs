use std::fs;
use std::io;
use std::process::ExitCode;

use clap::CommandFactory;
use clap_complete::generate;

use stegapp_core::cli::{Cli, Commands, Parser};
use stegapp_core::{StegError, StegResult, embed, extract, list_vfs, pack_vfs, unpack_vfs};

/// Maps a [`StegError`] to a process exit code.
///
/// * `3` — the operation is well-formed but the carrier or archive can't
///   hold what was asked of it (capacity, or too small for a header).
/// * `4` — the stego image or archive blob itself is malformed: no
///   delimiter found, a corrupt stream, a corrupt zip, or an unsafe path.
/// * `5` — everything else: image decode/encode failures, unsupported
///   formats, arithmetic overflow, or I/O.
fn exit_code(err: &StegError) -> ExitCode {
    let code = match err {
        StegError::CapacityExceeded(_) | StegError::ImageTooSmall(_) => 3,
        StegError::DelimiterNotFound
        | StegError::CorruptStream(_)
        | StegError::ArchiveCorrupt(_)
        | StegError::UnsafeArchivePath(_) => 4,
        StegError::ImageProcessing(_)
        | StegError::UnsupportedFormat(_)
        | StegError::CalculationOverflow(_)
        | StegError::Io(_) => 5,
    };
    ExitCode::from(code)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stegapp: {}", err);
            exit_code(&err)
        }
    }
}

fn run(command: Commands) -> StegResult<()> {
    match command {
        Commands::Embed {
            image,
            files,
            folders,
            out,
            no_external_rng,
        } => {
            let payload = pack_vfs(&files, &folders)?;
            embed(&image, &payload, &out, !no_external_rng)?;
        }
        Commands::Extract { image, out_dir } => {
            let payload = extract(&image)?;
            unpack_vfs(&payload, &out_dir)?;
        }
        Commands::Pack { files, folders, out } => {
            let blob = pack_vfs(&files, &folders)?;
            fs::write(&out, blob)?;
        }
        Commands::Unpack { archive, out_dir } => {
            let blob = fs::read(&archive)?;
            unpack_vfs(&blob, &out_dir)?;
        }
        Commands::List { archive } => {
            let blob = fs::read(&archive)?;
            for entry in list_vfs(&blob)? {
                println!("{:?}\t{}", entry.kind, entry.name);
            }
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
        }
    }

    Ok(())
}
