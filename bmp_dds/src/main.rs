use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use bmp_dds::{bmp_from_dds, dds_from_bmp, Bmp, ConvertError, Dds, ImageFormat, ReadError};

fn main() -> io::Result<()> {
    println!("Convert 24-bit uncompressed BMP images to DXT1 compressed DDS textures and back.");
    println!();
    println!("Enter the path of a .bmp or .dds file to convert, or 'exit' to quit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command.eq_ignore_ascii_case("exit") {
            break;
        }

        match convert_file(Path::new(command)) {
            Ok(output) => println!("Converted image written to {}", output.display()),
            Err(error) => report(&error),
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("the file extension must be .bmp or .dds")]
    UnknownFormat,

    #[error("error reading image")]
    Read(#[from] ReadError),

    #[error("error converting image")]
    Convert(#[from] ConvertError),

    #[error("error writing image")]
    Io(#[from] io::Error),
}

// The output lands next to the input with the opposite extension.
// Existing files are truncated.
fn convert_file(path: &Path) -> Result<PathBuf, CliError> {
    let format = ImageFormat::from_path(path).ok_or(CliError::UnknownFormat)?;

    match format {
        ImageFormat::Bmp => {
            let mut reader = BufReader::new(File::open(path)?);
            let bmp = Bmp::read(&mut reader)?;

            let dds = dds_from_bmp(&bmp)?;

            let output = path.with_extension("dds");
            let mut writer = BufWriter::new(File::create(&output)?);
            dds.write(&mut writer)?;
            Ok(output)
        }
        ImageFormat::Dds => {
            let mut reader = BufReader::new(File::open(path)?);
            let dds = Dds::read(&mut reader)?;

            let bmp = bmp_from_dds(&dds)?;

            let output = path.with_extension("bmp");
            let mut writer = BufWriter::new(File::create(&output)?);
            bmp.write(&mut writer)?;
            Ok(output)
        }
    }
}

fn report(error: &CliError) {
    eprintln!("{error}");

    // Validation reports one diagnostic per failed check.
    match error {
        CliError::Read(ReadError::Validation(failures))
        | CliError::Convert(ConvertError::Validation(failures)) => {
            for failure in &failures.failures {
                eprintln!("  {failure}");
            }
        }
        _ => {
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
        }
    }
}
