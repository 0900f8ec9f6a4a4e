//! Source file access for the renderer.
//!
//! The [`Files`] trait is the interface between the renderer and the source
//! code it annotates. It answers byte → line, byte → column and line → range
//! queries on top of a per-file line-start table, with columns counted in
//! display units (grapheme clusters, tabs expanded to a configurable width).
//!
//! Three implementations are provided: [`SimpleFile`] for a single in-memory
//! file, [`SimpleFiles`] for a growable set of in-memory files, and
//! [`SourceFiles`] for files backed by seekable readers that are only read
//! when a diagnostic actually refers to them.
//!
//! [`Files`]: Files
//! [`SimpleFile`]: SimpleFile
//! [`SimpleFiles`]: SimpleFiles
//! [`SourceFiles`]: SourceFiles

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::render::LineColumn;

/// An error that happened while looking up a file or a position in a file.
#[derive(Debug)]
pub enum Error {
    /// A required file is not in the file database.
    FileNotFound,
    /// The file is present, but does not contain the specified byte index.
    IndexTooLarge {
        /// The given byte index.
        given: usize,
        /// The maximum byte index.
        max: usize,
    },
    /// The file is present, but does not contain the specified line index.
    LineTooLarge {
        /// The given line index.
        given: usize,
        /// The maximum line index.
        max: usize,
    },
    /// An annotation's byte range ends before it starts.
    InvalidSpan {
        /// The start byte index of the span.
        start: usize,
        /// The end byte index of the span.
        end: usize,
    },
    /// There was an error while doing IO.
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound => write!(f, "file not found"),
            Self::IndexTooLarge { given, max } =>
                write!(f, "invalid byte index {}, maximum index is {}", given, max),
            Self::LineTooLarge { given, max } =>
                write!(f, "invalid line index {}, maximum index is {}", given, max),
            Self::InvalidSpan { start, end } =>
                write!(f, "invalid span, {}..{} ends before it starts", start, end),
            Self::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Disambiguates the display column of a byte position.
///
/// The two variants only differ for positions that are used as the exclusive
/// end of a span: [`Inclusive`] is the start column of the grapheme cluster
/// at the position, while [`Exclusive`] is the last column occupied by the
/// cluster *ending* at the position.
///
/// [`Inclusive`]: Boundary::Inclusive
/// [`Exclusive`]: Boundary::Exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// The start column of the cluster beginning at the byte position.
    Inclusive,
    /// The last column of the cluster ending at the byte position, that is,
    /// its start column + its display width − 1.
    Exclusive,
}

/// A user-facing location in a source file, with `1`-based line and
/// column numbers. This is what the `-->` header of a code block prints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// The `1`-based line number.
    pub line_number: usize,
    /// The `1`-based column number, in display columns.
    pub column_number: usize,
}

/// Computes the line-start table for `source`.
///
/// The first line starts at byte `0`; every other line starts directly after
/// a line feed. A line feed that terminates the file does not open another
/// (empty) line.
pub fn line_starts(source: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];

    for (i, byte) in source.iter().enumerate() {
        if *byte == b'\n' && i + 1 < source.len() {
            starts.push(i + 1);
        }
    }

    starts
}

/// A minimal interface for accessing source files when rendering diagnostics.
pub trait Files {
    /// A unique identifier for files. While this can normally
    /// be a `usize` index or an interned path, single-file implementations
    /// can use `()` instead.
    type FileId: Copy + Debug + Eq;

    /// The user-facing name of a file.
    fn name(&self, file: Self::FileId) -> Result<String, Error>;

    /// The raw bytes of a file.
    ///
    /// This is deliberately not `&str`: invalid UTF-8 in the source is not
    /// fatal, it only renders as replacement characters.
    fn source(&self, file: Self::FileId) -> Result<&[u8], Error>;

    /// The line-start table of a file, as computed by [`line_starts`].
    ///
    /// [`line_starts`]: line_starts
    fn line_starts(&self, file: Self::FileId) -> Result<&[usize], Error>;

    /// The index of the line containing the given byte index.
    ///
    /// If the byte index is past the end of the file, this returns the last
    /// line index, so it only fails if the file is not present.
    fn line_index(&self, file: Self::FileId, byte_index: usize) -> Result<usize, Error> {
        let starts = self.line_starts(file)?;
        Ok(starts.partition_point(|&start| start <= byte_index).saturating_sub(1))
    }

    /// The index of the last line of the file.
    fn last_line_index(&self, file: Self::FileId) -> Result<usize, Error> {
        Ok(self.line_starts(file)?.len() - 1)
    }

    /// The user-facing line number of the given line index.
    fn line_number(&self, file: Self::FileId, line_index: usize) -> Result<usize, Error> {
        let _ = file;
        Ok(line_index + 1)
    }

    /// The byte range of the given line, including its trailing line feed.
    fn line_range(&self, file: Self::FileId, line_index: usize) -> Result<Range<usize>, Error> {
        let starts = self.line_starts(file)?;
        let len = self.source(file)?.len();

        match starts.get(line_index) {
            Some(&start) => Ok(start..starts.get(line_index + 1).copied().unwrap_or(len)),
            None => Err(Error::LineTooLarge { given: line_index, max: starts.len() - 1 }),
        }
    }

    /// The display column of the given byte index on the given line.
    ///
    /// This accumulates the display widths of the grapheme clusters starting
    /// before the byte index, counting tabs as `tab_length` columns and every
    /// maximal run of invalid UTF-8 as a single replacement character.
    /// Positions at or past the line's trailing line feed resolve to one
    /// column past the last content column.
    fn column_index(&self, file: Self::FileId, line_index: usize, byte_index: usize,
                    tab_length: usize, boundary: Boundary) -> Result<usize, Error> {
        let range = self.line_range(file, line_index)?;
        let source = self.source(file)?;
        let line = &source[range.start..range.end];
        let content = &line[..line_content_len(line)];
        let relative = byte_index.saturating_sub(range.start);

        if relative > content.len() {
            return Ok(display_width(content, content.len(), tab_length));
        }

        Ok(match boundary {
            Boundary::Inclusive => display_width(content, relative, tab_length),
            Boundary::Exclusive => display_width(content, relative, tab_length).saturating_sub(1),
        })
    }

    /// The line and column indices of the given byte index.
    fn line_column(&self, file: Self::FileId, byte_index: usize,
                   tab_length: usize, boundary: Boundary) -> Result<LineColumn, Error> {
        let line_index = self.line_index(file, byte_index)?;
        Ok(LineColumn::new(line_index,
            self.column_index(file, line_index, byte_index, tab_length, boundary)?))
    }

    /// The user-facing location of the given byte index.
    fn location(&self, file: Self::FileId, byte_index: usize,
                tab_length: usize) -> Result<Location, Error> {
        let line_index = self.line_index(file, byte_index)?;
        Ok(Location {
            line_number: self.line_number(file, line_index)?,
            column_number: self.column_index(file, line_index, byte_index,
                tab_length, Boundary::Inclusive)? + 1,
        })
    }
}

/// A file database containing a single in-memory source file.
#[derive(Clone, Debug)]
pub struct SimpleFile<Name, Source> {
    name: Name,
    source: Source,
    line_starts: Vec<usize>,
}

impl<Name: Display, Source: AsRef<[u8]>> SimpleFile<Name, Source> {
    /// Create a new single-file database.
    pub fn new(name: Name, source: Source) -> Self {
        let starts = line_starts(source.as_ref());

        SimpleFile {
            name, source,
            line_starts: starts,
        }
    }

    /// The name of the file.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The source of the file.
    pub fn source(&self) -> &Source {
        &self.source
    }
}

impl<Name: Display, Source: AsRef<[u8]>> Files for SimpleFile<Name, Source> {
    type FileId = ();

    fn name(&self, (): ()) -> Result<String, Error> {
        Ok(self.name.to_string())
    }

    fn source(&self, (): ()) -> Result<&[u8], Error> {
        Ok(self.source.as_ref())
    }

    fn line_starts(&self, (): ()) -> Result<&[usize], Error> {
        Ok(&self.line_starts)
    }
}

/// A file database containing multiple in-memory source files,
/// identified by `usize` handles.
#[derive(Clone, Debug, Default)]
pub struct SimpleFiles<Name, Source> {
    files: Vec<SimpleFile<Name, Source>>,
}

impl<Name: Display, Source: AsRef<[u8]>> SimpleFiles<Name, Source> {
    /// Create a new, empty database.
    pub fn new() -> Self {
        SimpleFiles {
            files: Vec::new(),
        }
    }

    /// Add a file to the database, returning its id.
    pub fn add(&mut self, name: Name, source: Source) -> usize {
        let file_id = self.files.len();
        self.files.push(SimpleFile::new(name, source));
        file_id
    }

    /// Get the file with the given id.
    pub fn get(&self, file_id: usize) -> Result<&SimpleFile<Name, Source>, Error> {
        self.files.get(file_id).ok_or(Error::FileNotFound)
    }
}

impl<Name: Display, Source: AsRef<[u8]>> Files for SimpleFiles<Name, Source> {
    type FileId = usize;

    fn name(&self, file_id: usize) -> Result<String, Error> {
        Ok(self.get(file_id)?.name().to_string())
    }

    fn source(&self, file_id: usize) -> Result<&[u8], Error> {
        Ok(self.get(file_id)?.source().as_ref())
    }

    fn line_starts(&self, file_id: usize) -> Result<&[usize], Error> {
        Ok(&self.get(file_id)?.line_starts)
    }
}

/// The capabilities [`SourceFiles`] requires of its backing readers:
/// reading bytes, and restarting via an absolute seek.
///
/// This is implemented for everything that is [`Read`] and [`Seek`].
///
/// [`SourceFiles`]: SourceFiles
/// [`Read`]: Read
/// [`Seek`]: Seek
pub trait Source: Read + Seek {}

impl<T: Read + Seek> Source for T {}

#[derive(Debug)]
struct SourceFileEntry<S> {
    name: String,
    reader: RefCell<S>,
    source: OnceCell<Vec<u8>>,
    line_starts: OnceCell<Vec<usize>>,
}

/// A file database backed by seekable readers.
///
/// A file's bytes are read on first use (seeking back to the start, so that
/// readers can be handed over in any state) and retained, together with its
/// lazily computed line-start table, for the life of the database. Files no
/// diagnostic refers to are never read at all.
#[derive(Debug)]
pub struct SourceFiles<FileId, S> {
    files: HashMap<FileId, SourceFileEntry<S>>,
}

impl<FileId: Copy + Debug + Eq + Hash, S: Source> SourceFiles<FileId, S> {
    /// Create a new, empty database.
    pub fn new() -> Self {
        SourceFiles {
            files: HashMap::new(),
        }
    }

    /// Add a file backed by `reader` to the database.
    /// An existing file with the same id is replaced.
    pub fn insert<N: ToString>(&mut self, file_id: FileId, name: N, reader: S) {
        self.files.insert(file_id, SourceFileEntry {
            name: name.to_string(),
            reader: RefCell::new(reader),
            source: OnceCell::new(),
            line_starts: OnceCell::new(),
        });
    }

    fn entry(&self, file_id: FileId) -> Result<&SourceFileEntry<S>, Error> {
        self.files.get(&file_id).ok_or(Error::FileNotFound)
    }
}

impl<FileId: Copy + Debug + Eq + Hash, S: Source> Default for SourceFiles<FileId, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FileId: Copy + Debug + Eq + Hash, S: Source> Files for SourceFiles<FileId, S> {
    type FileId = FileId;

    fn name(&self, file_id: FileId) -> Result<String, Error> {
        Ok(self.entry(file_id)?.name.clone())
    }

    fn source(&self, file_id: FileId) -> Result<&[u8], Error> {
        let entry = self.entry(file_id)?;

        if entry.source.get().is_none() {
            let mut reader = entry.reader.borrow_mut();
            reader.seek(SeekFrom::Start(0))?;

            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            let _ = entry.source.set(buf);
        }

        Ok(entry.source.get().expect("source cache was populated above").as_slice())
    }

    fn line_starts(&self, file_id: FileId) -> Result<&[usize], Error> {
        if self.entry(file_id)?.line_starts.get().is_none() {
            let starts = line_starts(self.source(file_id)?);
            let _ = self.entry(file_id)?.line_starts.set(starts);
        }

        Ok(self.entry(file_id)?.line_starts.get()
            .expect("line start cache was populated above").as_slice())
    }
}

/// The length of a line's content, without its trailing line break.
fn line_content_len(line: &[u8]) -> usize {
    let mut len = line.len();

    if len > 0 && line[len - 1] == b'\n' {
        len -= 1;
    }

    if len > 0 && line[len - 1] == b'\r' {
        len -= 1;
    }

    len
}

fn grapheme_width(grapheme: &str, tab_length: usize) -> usize {
    if grapheme == "\t" {
        tab_length
    } else {
        UnicodeWidthStr::width(grapheme)
    }
}

/// Accumulated display width of the grapheme clusters of `line` that begin
/// before byte offset `upto`. A cluster that merely *ends* past `upto`
/// still counts in full.
pub(crate) fn display_width(line: &[u8], upto: usize, tab_length: usize) -> usize {
    let mut width = 0;
    let mut offset = 0;

    while offset < line.len() && offset < upto {
        match std::str::from_utf8(&line[offset..]) {
            Ok(chunk) => {
                for (i, grapheme) in chunk.grapheme_indices(true) {
                    if offset + i >= upto {
                        return width;
                    }

                    width += grapheme_width(grapheme, tab_length);
                }

                offset = line.len();
            },
            Err(error) => {
                let valid = error.valid_up_to();

                if valid > 0 {
                    let chunk = std::str::from_utf8(&line[offset..offset + valid])
                        .expect("chunk is valid up to this index");

                    for (i, grapheme) in chunk.grapheme_indices(true) {
                        if offset + i >= upto {
                            return width;
                        }

                        width += grapheme_width(grapheme, tab_length);
                    }

                    offset += valid;

                    if offset >= upto {
                        return width;
                    }
                }

                // One replacement character per maximal invalid run
                offset += error.error_len().unwrap_or(line.len() - offset).max(1);

                while let Err(error) = std::str::from_utf8(&line[offset..]) {
                    if error.valid_up_to() > 0 {
                        break;
                    }

                    offset += error.error_len().unwrap_or(line.len() - offset).max(1);
                }

                width += 1;
            },
        }
    }

    width
}

/// Decodes a line of source for printing. Tabs are expanded to `tab_length`
/// spaces and every maximal run of invalid UTF-8 becomes a single replacement
/// character, so that the printed glyphs line up with the display columns
/// computed by [`Files::column_index`].
///
/// [`Files::column_index`]: Files::column_index
pub(crate) fn decode_line(line: &[u8], tab_length: usize) -> String {
    let content = &line[..line_content_len(line)];
    let mut result = String::with_capacity(content.len());
    let mut offset = 0;

    while offset < content.len() {
        match std::str::from_utf8(&content[offset..]) {
            Ok(chunk) => {
                push_expanded(&mut result, chunk, tab_length);
                offset = content.len();
            },
            Err(error) => {
                let valid = error.valid_up_to();

                if valid > 0 {
                    let chunk = std::str::from_utf8(&content[offset..offset + valid])
                        .expect("chunk is valid up to this index");
                    push_expanded(&mut result, chunk, tab_length);
                    offset += valid;
                }

                offset += error.error_len().unwrap_or(content.len() - offset).max(1);

                while let Err(error) = std::str::from_utf8(&content[offset..]) {
                    if error.valid_up_to() > 0 {
                        break;
                    }

                    offset += error.error_len().unwrap_or(content.len() - offset).max(1);
                }

                result.push('\u{FFFD}');
            },
        }
    }

    result
}

fn push_expanded(result: &mut String, chunk: &str, tab_length: usize) {
    for c in chunk.chars() {
        if c == '\t' {
            for _ in 0..tab_length {
                result.push(' ');
            }
        } else {
            result.push(c);
        }
    }
}
