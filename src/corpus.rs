use crate::document::DocumentCollection;
use crate::error::{EsaError, EsaResult};
use std::fs;
use std::path::Path;

/// Read a file as UTF-8, falling back to ISO-8859-1 for legacy corpora
pub fn read_text<P: AsRef<Path>>(path: P) -> EsaResult<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| EsaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        // Latin-1 maps every byte to the code point of the same value
        Err(err) => Ok(err.into_bytes().into_iter().map(char::from).collect()),
    }
}

/// Load every regular file of `dir` (non-recursive), keyed by file name
pub fn load_directory<P: AsRef<Path>>(dir: P) -> EsaResult<DocumentCollection> {
    let dir = dir.as_ref();
    let io_err = |source: std::io::Error| EsaError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut collection = DocumentCollection::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        collection.insert(name, read_text(&path)?);
    }

    tracing::debug!(dir = %dir.display(), documents = collection.len(), "loaded corpus");
    Ok(collection)
}

/// Load only the named files of `dir`
pub fn load_files<P, I, S>(dir: P, names: I) -> EsaResult<DocumentCollection>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collection = DocumentCollection::new();
    for name in names {
        add_document(&mut collection, dir.as_ref(), name.as_ref())?;
    }
    Ok(collection)
}

/// Read `dir/name` into the collection under the id `name`
pub fn add_document<P: AsRef<Path>>(
    collection: &mut DocumentCollection,
    dir: P,
    name: &str,
) -> EsaResult<()> {
    let text = read_text(dir.as_ref().join(name))?;
    collection.insert(name, text);
    Ok(())
}
