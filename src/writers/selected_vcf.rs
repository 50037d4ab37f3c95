
use anyhow::Context;
use flate2::write::GzEncoder;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::parsing::record_stream::RecordStream;
use crate::sampler::Selection;

/// Copies the header and the selected records from the stream into `writer`.
/// The stream is rewound first, so it may have been fully consumed by the classification pass.
/// Lines are written byte for byte, original line terminators included, in file order.
/// # Arguments
/// * `stream` - the input VCF
/// * `selection` - the selected 0-based record indices
/// * `writer` - where the output lines go
/// # Errors
/// * if rewinding, reading, or writing fails
pub fn write_selected_records<W: Write>(stream: &mut RecordStream, selection: &Selection, writer: &mut W) -> anyhow::Result<usize> {
    stream.rewind()?;
    for line in stream.header().iter() {
        writer.write_all(line)?;
    }

    let mut num_written = 0;
    for (record_index, line) in stream.by_ref().enumerate() {
        let line = line?;
        if selection.contains(record_index) {
            writer.write_all(&line)?;
            num_written += 1;
        }
    }
    Ok(num_written)
}

/// Output handle that optionally gzip compresses
enum OutputHandle {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>)
}

impl OutputHandle {
    fn new(file: File, compress: bool) -> Self {
        let buffered = BufWriter::new(file);
        if compress {
            OutputHandle::Gzip(GzEncoder::new(buffered, flate2::Compression::default()))
        } else {
            OutputHandle::Plain(buffered)
        }
    }

    /// Flushes everything through to the underlying file; errors are not visible if this is skipped
    fn finish(self) -> std::io::Result<()> {
        let mut buffered = match self {
            OutputHandle::Plain(b) => b,
            OutputHandle::Gzip(gz) => gz.finish()?
        };
        buffered.flush()?;
        buffered.get_ref().sync_all()
    }
}

impl Write for OutputHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputHandle::Plain(b) => b.write(buf),
            OutputHandle::Gzip(gz) => gz.write(buf)
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputHandle::Plain(b) => b.flush(),
            OutputHandle::Gzip(gz) => gz.flush()
        }
    }
}

/// A fully written output VCF that has not been moved into place yet.
/// Dropping it without calling `persist` removes the temporary file.
pub struct StagedOutput {
    /// The temporary file holding the output
    temp_path: TempPath,
    /// Where the output goes once persisted
    out_filename: PathBuf,
    /// Number of records in the output
    num_written: usize
}

impl StagedOutput {
    /// Renames the temporary file onto the final output path
    /// # Errors
    /// * if the rename fails, in which case the temporary file is removed
    pub fn persist(self) -> anyhow::Result<usize> {
        let out_filename = self.out_filename;
        self.temp_path.persist(&out_filename)
            .map_err(|e| e.error)
            .with_context(|| format!("Error while moving output into place at {out_filename:?}:"))?;
        info!("Wrote {} selected records to {out_filename:?}", self.num_written);
        Ok(self.num_written)
    }

    // getters
    pub fn num_written(&self) -> usize {
        self.num_written
    }
}

/// Writes the selected records to a temporary file next to `out_filename`, gzip compressed if it ends with ".gz".
/// The temporary file gets the same permissions a plain `File::create` would give.
/// # Arguments
/// * `stream` - the input VCF
/// * `selection` - the selected 0-based record indices
/// * `out_filename` - the final output path
/// # Errors
/// * if the temporary file cannot be created or written; it is removed in that case
pub fn stage_selected_records(stream: &mut RecordStream, selection: &Selection, out_filename: &Path) -> anyhow::Result<StagedOutput> {
    let out_folder = match out_filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from(".")
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".vcf-event-picker.");
    #[cfg(unix)]
    {
        // tempfile defaults to 0600, the umask still applies on top of this
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp_file = builder.tempfile_in(&out_folder)
        .with_context(|| format!("Error while creating temporary output in {out_folder:?}:"))?;
    let (file, temp_path) = temp_file.into_parts();
    debug!("Writing selected records to {:?}...", &*temp_path);

    let compress = out_filename.extension().unwrap_or_default() == "gz";
    let mut handle = OutputHandle::new(file, compress);
    let num_written = write_selected_records(stream, selection, &mut handle)
        .with_context(|| format!("Error while writing selected records for {out_filename:?}:"))?;
    handle.finish()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;

    Ok(StagedOutput {
        temp_path,
        out_filename: out_filename.to_path_buf(),
        num_written
    })
}

/// Writes the selected records to `out_filename`, gzip compressed if it ends with ".gz".
/// Output goes to a temporary file next to the destination which is only renamed into place once complete.
/// On any failure the temporary file is removed and `out_filename` is left untouched.
/// # Arguments
/// * `stream` - the input VCF
/// * `selection` - the selected 0-based record indices
/// * `out_filename` - the final output path
/// # Errors
/// * if the temporary file cannot be created, written, or renamed
pub fn save_selected_records(stream: &mut RecordStream, selection: &Selection, out_filename: &Path) -> anyhow::Result<usize> {
    stage_selected_records(stream, selection, out_filename)?.persist()
}
