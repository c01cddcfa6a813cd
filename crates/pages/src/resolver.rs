//! Where page markup comes from.
//!
//! A [`PageResolver`] maps a page name to a [`PageSource`], a handle that
//! yields the raw markup in chunks and must be released when the caller is
//! done with it. Two resolvers ship with the crate: [`StaticResolver`] for
//! in-memory pages and [`DirResolver`] for files under a directory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

/// Raw page data being read.
pub trait PageSource {
    /// Next chunk of markup bytes, or `None` once the source is exhausted.
    /// Chunk boundaries carry no meaning and may split a character.
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Give the underlying resource back. Called exactly once per source.
    fn release(&mut self) -> io::Result<()>;
}

/// Looks up page sources by name.
///
/// `Ok(None)` means the page does not exist; `Err` means the lookup itself
/// failed.
pub trait PageResolver: Send + Sync {
    fn resolve(&self, name: &str) -> io::Result<Option<Box<dyn PageSource>>>;
}

impl<F> PageResolver for F
where
    F: Fn(&str) -> io::Result<Option<Box<dyn PageSource>>> + Send + Sync,
{
    fn resolve(&self, name: &str) -> io::Result<Option<Box<dyn PageSource>>> {
        self(name)
    }
}

/// Serves pages from memory, one line per chunk.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    pages: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(name, markup);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.pages.insert(name.into(), markup.into());
    }
}

impl PageResolver for StaticResolver {
    fn resolve(&self, name: &str) -> io::Result<Option<Box<dyn PageSource>>> {
        Ok(self.pages.get(name).map(|markup| {
            Box::new(LineSource::new(markup)) as Box<dyn PageSource>
        }))
    }
}

#[derive(Debug)]
struct LineSource {
    lines: std::vec::IntoIter<Vec<u8>>,
}

impl LineSource {
    fn new(markup: &str) -> Self {
        let lines: Vec<Vec<u8>> = markup
            .split_inclusive('\n')
            .map(|line| line.as_bytes().to_vec())
            .collect();
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl PageSource for LineSource {
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lines.next())
    }

    fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serves `<root>/<name>.<extension>`, read line by line.
///
/// Names may contain `/` to reach subdirectories but must stay inside the
/// root: absolute names and `..` components are rejected with
/// [`io::ErrorKind::InvalidInput`].
#[derive(Clone, Debug)]
pub struct DirResolver {
    root: PathBuf,
    extension: String,
}

impl DirResolver {
    pub const DEFAULT_EXTENSION: &'static str = "html";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: Self::DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for `name`, or an error when the name is unusable.
    pub fn page_path(&self, name: &str) -> io::Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = name.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)));
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("page name `{name}` does not stay inside the page root"),
            ));
        }
        let mut path = self.root.join(relative);
        let file_name = match path.file_name() {
            Some(file_name) => format!("{}.{}", file_name.to_string_lossy(), self.extension),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("page name `{name}` has no file name"),
                ));
            }
        };
        path.set_file_name(file_name);
        Ok(path)
    }
}

impl PageResolver for DirResolver {
    fn resolve(&self, name: &str) -> io::Result<Option<Box<dyn PageSource>>> {
        let path = self.page_path(name)?;
        match File::open(&path) {
            Ok(file) => {
                log::debug!(target: "pages.resolver", "opened {}", path.display());
                Ok(Some(Box::new(FileSource {
                    reader: Some(BufReader::new(file)),
                })))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!(target: "pages.resolver", "no file at {}", path.display());
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug)]
struct FileSource {
    reader: Option<BufReader<File>>,
}

impl PageSource for FileSource {
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn release(&mut self) -> io::Result<()> {
        // Closing the file is all there is to release.
        self.reader = None;
        Ok(())
    }
}
