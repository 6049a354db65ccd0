use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Archive, Builder, EntryType, Header};

use crate::config::MAX_COMPRESSION;
use crate::error::PersistError;

/// Write a gzip-compressed tar of `inputs` to `dest`, each stored under its base name.
///
/// Headers carry no timestamps or ownership, so archiving the same bytes twice
/// yields the same archive and unchanged backups can be detected by comparison.
pub(crate) fn write_archive<P: AsRef<Path>>(
    inputs: &[P],
    dest: &Path,
    level: u32,
) -> Result<(), PersistError> {
    let file = File::create(dest).map_err(PersistError::io("create", dest))?;
    let level = Compression::new(level.min(MAX_COMPRESSION));
    let mut builder = Builder::new(GzEncoder::new(file, level));

    for input in inputs {
        let input = input.as_ref();
        let name = input.file_name().ok_or_else(|| PersistError::InvalidInput {
            path: input.to_path_buf(),
            reason: "backup input has no file name",
        })?;
        let data = fs::read(input).map_err(PersistError::io("read", input))?;

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder
            .append_data(&mut header, name, data.as_slice())
            .map_err(PersistError::io("archive", dest))?;
    }

    let encoder = builder
        .into_inner()
        .map_err(PersistError::io("archive", dest))?;
    let file = encoder.finish().map_err(PersistError::io("compress", dest))?;
    file.sync_all().map_err(PersistError::io("sync", dest))
}

fn open(archive: &Path) -> Result<Archive<GzDecoder<File>>, PersistError> {
    let file = File::open(archive).map_err(PersistError::missing_or_io("open", archive))?;
    Ok(Archive::new(GzDecoder::new(file)))
}

/// Names of the entries stored in a backup snapshot, in archive order.
pub fn archive_entries(archive: impl AsRef<Path>) -> Result<Vec<String>, PersistError> {
    let path = archive.as_ref();
    let mut archive = open(path)?;
    let mut names = Vec::new();
    for entry in archive
        .entries()
        .map_err(PersistError::io("read archive", path))?
    {
        let entry = entry.map_err(PersistError::io("read archive", path))?;
        let name = entry.path().map_err(PersistError::io("read archive", path))?;
        names.push(name.to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Bytes of the entry called `name` in a backup snapshot, if present.
pub fn read_archive_entry(
    archive: impl AsRef<Path>,
    name: &str,
) -> Result<Option<Vec<u8>>, PersistError> {
    let path = archive.as_ref();
    let mut archive = open(path)?;
    for entry in archive
        .entries()
        .map_err(PersistError::io("read archive", path))?
    {
        let mut entry = entry.map_err(PersistError::io("read archive", path))?;
        let matches = entry
            .path()
            .map_err(PersistError::io("read archive", path))?
            == Path::new(name);
        if matches {
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(PersistError::io("read archive", path))?;
            return Ok(Some(data));
        }
    }
    Ok(None)
}
