//! The renderer driver.
//!
//! [`DiagnosticRenderer`] walks the diagnostics, groups their annotations by
//! file, decides which source lines to show, and writes the source lines
//! together with the layout rows produced by the [calculator]. All styling
//! goes through a [`ColorConfig`].
//!
//! [`DiagnosticRenderer`]: DiagnosticRenderer
//! [calculator]: calculate
//! [`ColorConfig`]: color::ColorConfig

use std::fmt::Debug;
use std::marker::PhantomData;
use termcolor::WriteColor;
use tracing::trace;
use crate::diagnostic::{Annotation, AnnotationStyle, Diagnostic, Note, Severity};
use crate::file::{self, Error, Files};
use crate::render::color::ColorConfig;
use crate::render::data::AnnotationData;

pub mod color;

mod data;
mod calculate;

/// Result type for methods writing to a [`WriteColor`].
///
/// [`WriteColor`]: WriteColor
type Result = std::result::Result<(), Error>;

/// Represents a location in a specific source file,
/// using line and column indices.
///
/// Note that these are indices and not user-facing numbers,
/// so they are `0`-indexed.
///
/// The column index is a *display* column: grapheme clusters are counted
/// with their terminal width, and tabs with the configured tab length.
///
/// It is not necessarily checked that this position exists
/// in the source file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineColumn {
    /// The `0`-indexed line index.
    pub line_index: usize,
    /// The `0`-indexed column index.
    pub column_index: usize,
}

impl LineColumn {
    /// Creates a new location.
    pub fn new(line_index: usize, column_index: usize) -> Self {
        LineColumn {
            line_index, column_index,
        }
    }
}

impl From<(usize, usize)> for LineColumn {
    #[inline]
    fn from((line_index, column_index): (usize, usize)) -> Self {
        Self::new(line_index, column_index)
    }
}

/// Contains some configuration parameters for [`DiagnosticRenderer`].
///
/// [`DiagnosticRenderer`]: DiagnosticRenderer
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// How many lines of source code to include around annotated lines for context.
    pub surrounding_lines: usize,
    /// How many columns a tab character occupies.
    pub tab_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            surrounding_lines: 1,
            tab_length: 4,
        }
    }
}

/// An ASCII renderer for diagnostics.
#[derive(Debug)]
pub struct DiagnosticRenderer<'w, W, C, FileId, F> {
    f: &'w mut W, colors: C, files: F, config: RenderConfig,
    max_nested_blocks: usize, line_digits: u32,
    _phantom_data: PhantomData<FileId>,
}

impl<'w, W, C, FileId, F> DiagnosticRenderer<'w, W, C, FileId, F> {
    /// Creates a new diagnostics renderer.
    pub fn new(f: &'w mut W, colors: C, files: F, config: RenderConfig) -> Self {
        DiagnosticRenderer {
            f, colors, files, config,
            max_nested_blocks: 0, line_digits: 0,
            _phantom_data: PhantomData,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Fill {
    end: usize,
    c: char,
    style: AnnotationStyle,
    severity: Severity,
}

fn boundary_char(style: AnnotationStyle) -> char {
    match style {
        AnnotationStyle::Primary => '^',
        AnnotationStyle::Secondary => '-',
    }
}

fn continuing_on_line<'a, FileId: Copy>(annotations: &[&'a Annotation<FileId>],
                                        line_spans: &[(usize, usize)],
                                        line_index: usize) -> Vec<&'a Annotation<FileId>> {
    annotations.iter().zip(line_spans.iter())
        .filter(|(_, (start_line, end_line))| *start_line < line_index && *end_line >= line_index)
        .map(|(annotation, _)| *annotation).collect()
}

fn active_on_line<'a, FileId: Copy>(annotations: &[&'a Annotation<FileId>],
                                    line_spans: &[(usize, usize)],
                                    line_index: usize) -> Vec<&'a Annotation<FileId>> {
    annotations.iter().zip(line_spans.iter())
        .filter(|(_, (start_line, end_line))| *start_line == line_index || *end_line == line_index)
        .map(|(annotation, _)| *annotation).collect()
}

impl<'w, W: WriteColor, C: ColorConfig, FileId, F: Files<FileId=FileId>> DiagnosticRenderer<'w, W, C, FileId, F>
    where FileId: Copy + Debug + Eq {
    /// Renders the given diagnostics.
    pub fn render(&mut self, diagnostics: Vec<Diagnostic<FileId>>) -> Result {
        if diagnostics.is_empty() {
            return Ok(());
        }

        let diagnostics_len = diagnostics.len();

        for (i, diagnostic) in diagnostics.into_iter().enumerate() {
            self.render_diagnostic(&diagnostic)?;

            if i < diagnostics_len - 1 {
                writeln!(self.f)?;
            }
        }

        Ok(())
    }

    fn render_diagnostic(&mut self, diagnostic: &Diagnostic<FileId>) -> Result {
        trace!(severity = ?diagnostic.severity, annotations = diagnostic.annotations.len(),
            "rendering diagnostic");

        // Reject out-of-range annotations before writing anything for this
        // diagnostic, so that a failing render call produces no partial block
        for annotation in diagnostic.annotations.iter() {
            if annotation.range.start > annotation.range.end {
                return Err(Error::InvalidSpan {
                    start: annotation.range.start,
                    end: annotation.range.end,
                });
            }

            let source_len = self.files.source(annotation.file_id)?.len();

            if annotation.range.end > source_len {
                return Err(Error::IndexTooLarge {
                    given: annotation.range.end,
                    max: source_len,
                });
            }
        }

        self.render_diagnostic_header(diagnostic)?;

        if !diagnostic.annotations.is_empty() {
            let mut max_line_number = 1;

            for annotation in diagnostic.annotations.iter() {
                let end_byte = if annotation.range.end > annotation.range.start {
                    annotation.range.end - 1
                } else {
                    annotation.range.start
                };
                let end_line_index = self.files.line_index(annotation.file_id, end_byte)?;
                max_line_number = max_line_number.max(self.files.line_number(annotation.file_id, end_line_index)?);
            }

            self.line_digits = (max_line_number + self.config.surrounding_lines).ilog10() + 1;

            // Group annotations by file, preserving the order in which the
            // files first appear in the diagnostic
            let mut groups: Vec<(FileId, Vec<&Annotation<FileId>>)> = Vec::new();

            for annotation in diagnostic.annotations.iter() {
                match groups.iter_mut().find(|(file, _)| *file == annotation.file_id) {
                    Some((_, annotations)) => annotations.push(annotation),
                    None => groups.push((annotation.file_id, vec![annotation])),
                }
            }

            for (file, annotations) in groups.into_iter() {
                self.render_diagnostic_file(diagnostic, file, annotations)?;
            }
        }

        for note in diagnostic.notes.iter() {
            self.render_note(note)?;
        }

        if diagnostic.suppressed_count > 0 {
            writeln!(self.f, "{:>width$} ... and {} more", "", diagnostic.suppressed_count,
                width = self.line_digits as usize)?;
        }

        self.max_nested_blocks = 0;
        self.line_digits = 0;

        Ok(())
    }

    fn render_diagnostic_header(&mut self, diagnostic: &Diagnostic<FileId>) -> Result {
        self.colors.severity(self.f, diagnostic.severity)?;
        write!(self.f, "{}", diagnostic.severity)?;

        if let Some(name) = diagnostic.name.as_ref() {
            write!(self.f, "[")?;
            self.colors.name(self.f, diagnostic.severity)?;
            write!(self.f, "{}", name)?;
            self.colors.severity(self.f, diagnostic.severity)?;
            write!(self.f, "]")?;
        }

        if !diagnostic.message.is_empty() {
            self.colors.message(self.f)?;
            writeln!(self.f, ": {}", &diagnostic.message)?;
        }

        self.colors.reset(self.f)?;

        if diagnostic.message.is_empty() {
            writeln!(self.f)?;
        }

        Ok(())
    }

    fn render_diagnostic_file(&mut self, diagnostic: &Diagnostic<FileId>, file: FileId,
                              mut annotations: Vec<&Annotation<FileId>>) -> Result {
        // Sort by start byte index
        annotations.sort_by_key(|annotation| annotation.range.start);

        // The focal annotation provides the location shown next to the file
        // path: the earliest primary annotation, or simply the earliest one
        // if there is no primary annotation in this file
        let focal = annotations.iter()
            .find(|annotation| annotation.style == AnnotationStyle::Primary)
            .or_else(|| annotations.first())
            .expect("a file group contains at least one annotation");

        self.write_line_number(None, "-->")?;
        write!(self.f, " ")?;
        self.colors.path(self.f)?;
        write!(self.f, "{}", self.files.name(file)?)?;

        let location = self.files.location(file, focal.range.start, self.config.tab_length)?;
        writeln!(self.f, ":{}:{}", location.line_number, location.column_number)?;
        self.colors.reset(self.f)?;

        // The line span of every annotation. An annotation's end line is the
        // line of its last included byte; empty spans sit on a single line.
        let mut line_spans = Vec::with_capacity(annotations.len());

        for annotation in annotations.iter() {
            let start_line_index = self.files.line_index(file, annotation.range.start)?;
            let end_line_index = if annotation.range.end > annotation.range.start {
                self.files.line_index(file, annotation.range.end - 1)?
            } else {
                start_line_index
            };

            line_spans.push((start_line_index, end_line_index));
        }

        // The maximum number of simultaneously open multi-line annotations,
        // which decides how wide the continuing-bar gutter has to be
        {
            let mut max_nested_blocks = 0;
            let mut current_nested_blocks: Vec<usize> = Vec::new();

            for (start_line_index, end_line_index) in line_spans.iter().copied() {
                if start_line_index == end_line_index {
                    continue;
                }

                current_nested_blocks.retain(|&end| end > start_line_index);
                current_nested_blocks.push(end_line_index);
                max_nested_blocks = max_nested_blocks.max(current_nested_blocks.len());
            }

            self.max_nested_blocks = max_nested_blocks;
        }

        // The lines that have annotation rows of their own
        let mut annotated_lines = line_spans.iter()
            .flat_map(|(start_line, end_line)| [*start_line, *end_line])
            .collect::<Vec<_>>();
        annotated_lines.sort_unstable();
        annotated_lines.dedup();

        let last_line_index = self.files.last_line_index(file)?;
        let surrounding_lines = self.config.surrounding_lines;
        let mut last_printed: Option<usize> = None;

        for &line_index in annotated_lines.iter() {
            let window_start = line_index.saturating_sub(surrounding_lines);

            match last_printed {
                None => {
                    for line in window_start..line_index {
                        self.render_context_line(diagnostic, file, line, &annotations, &line_spans)?;
                    }
                },
                Some(last) => {
                    let trailing_end = (last + surrounding_lines).min(last_line_index);

                    if window_start > trailing_end + 1 {
                        // At least one line stays hidden; print the previous
                        // group's trailing context and a single elision row
                        for line in last + 1..=trailing_end {
                            self.render_context_line(diagnostic, file, line, &annotations, &line_spans)?;
                        }

                        let continuing = continuing_on_line(&annotations, &line_spans, trailing_end + 1);
                        self.write_source_line(diagnostic, None, "...", &continuing)?;

                        for line in window_start..line_index {
                            self.render_context_line(diagnostic, file, line, &annotations, &line_spans)?;
                        }
                    } else {
                        for line in last + 1..line_index {
                            self.render_context_line(diagnostic, file, line, &annotations, &line_spans)?;
                        }
                    }
                },
            }

            self.render_annotated_line(diagnostic, file, line_index, &annotations, &line_spans)?;
            last_printed = Some(line_index);
        }

        if let Some(last) = last_printed {
            let trailing_end = (last + surrounding_lines).min(last_line_index);

            for line in last + 1..=trailing_end {
                self.render_context_line(diagnostic, file, line, &annotations, &line_spans)?;
            }
        }

        Ok(())
    }

    fn render_context_line(&mut self, diagnostic: &Diagnostic<FileId>, file: FileId, line_index: usize,
                           annotations: &[&Annotation<FileId>], line_spans: &[(usize, usize)]) -> Result {
        let continuing = continuing_on_line(annotations, line_spans, line_index);
        self.write_source_line(diagnostic, Some((file, line_index)), " |", &continuing)
    }

    fn render_annotated_line(&mut self, diagnostic: &Diagnostic<FileId>, file: FileId, line_index: usize,
                             annotations: &[&Annotation<FileId>], line_spans: &[(usize, usize)]) -> Result {
        let continuing = continuing_on_line(annotations, line_spans, line_index);
        let active = active_on_line(annotations, line_spans, line_index);

        self.write_source_line(diagnostic, Some((file, line_index)), " |", &continuing)?;

        let data = calculate::calculate(diagnostic, &self.files, file, line_index,
            self.config.tab_length, &active, &continuing)?;

        for line_data in data.into_iter() {
            self.write_annotation_row(line_data)?;
        }

        Ok(())
    }

    fn write_annotation_row(&mut self, data: Vec<AnnotationData>) -> Result {
        self.write_line_number(None, " |")?;

        let offset = 2 * self.max_nested_blocks + 1;
        let mut cursor = 0;
        let mut fills: Vec<Fill> = Vec::new();

        for item in data.into_iter() {
            match item {
                AnnotationData::ContinuingMultiline(item) => {
                    self.write_point(&mut cursor, &mut fills,
                        item.vertical_bar_index * 2 + 1, '|', item.style, item.severity)?;
                },
                AnnotationData::ConnectingMultiline(item) => {
                    self.push_fill(&mut cursor, &mut fills,
                        item.vertical_bar_index * 2 + 2, item.end_location.column_index + offset,
                        '_', item.style, item.severity)?;
                },
                AnnotationData::Start(item) => {
                    self.write_point(&mut cursor, &mut fills,
                        item.location.column_index + offset, boundary_char(item.style),
                        item.style, item.severity)?;
                },
                AnnotationData::ConnectingSingleline(item) => {
                    let c = if item.as_multiline { '_' } else { boundary_char(item.style) };
                    self.push_fill(&mut cursor, &mut fills,
                        item.start_column_index + offset, item.end_column_index + offset,
                        c, item.style, item.severity)?;
                },
                AnnotationData::End(item) => {
                    self.write_point(&mut cursor, &mut fills,
                        item.location.column_index + offset, boundary_char(item.style),
                        item.style, item.severity)?;
                },
                AnnotationData::Hanging(item) => {
                    self.write_point(&mut cursor, &mut fills,
                        item.location.column_index + offset, '|', item.style, item.severity)?;
                },
                AnnotationData::Label(item) => {
                    self.write_gap(&mut cursor, &mut fills, item.location.column_index + offset)?;
                    self.colors.annotation(self.f, item.style, item.severity)?;
                    write!(self.f, "{}", &item.label)?;
                    self.colors.reset(self.f)?;
                    cursor += item.label.len();
                },
                AnnotationData::Newline => {
                    // Finish any underline or underscore run that extends
                    // past the last explicit item
                    let flush_to = fills.iter().map(|fill| fill.end).max().unwrap_or(cursor);
                    self.write_gap(&mut cursor, &mut fills, flush_to)?;
                    writeln!(self.f)?;
                },
            }
        }

        Ok(())
    }

    fn write_point(&mut self, cursor: &mut usize, fills: &mut Vec<Fill>,
                   position: usize, c: char, style: AnnotationStyle, severity: Severity) -> Result {
        if position < *cursor {
            // Already drawn over, for example the end marker of a
            // zero-width annotation
            return Ok(());
        }

        self.write_gap(cursor, fills, position)?;

        self.colors.annotation(self.f, style, severity)?;
        write!(self.f, "{}", c)?;
        self.colors.reset(self.f)?;

        *cursor += 1;
        Ok(())
    }

    fn push_fill(&mut self, cursor: &mut usize, fills: &mut Vec<Fill>,
                 start: usize, end: usize, c: char, style: AnnotationStyle, severity: Severity) -> Result {
        if end <= *cursor {
            return Ok(());
        }

        if start > *cursor {
            self.write_gap(cursor, fills, start)?;
        }

        fills.push(Fill { end, c, style, severity });
        Ok(())
    }

    /// Advances to `to`, drawing the innermost active fill (an underline or
    /// underscore run) where one covers the gap, and spaces otherwise.
    fn write_gap(&mut self, cursor: &mut usize, fills: &mut Vec<Fill>, to: usize) -> Result {
        while *cursor < to {
            while fills.last().map_or(false, |fill| fill.end <= *cursor) {
                fills.pop();
            }

            match fills.last().copied() {
                Some(fill) => {
                    let run_end = to.min(fill.end);
                    self.colors.annotation(self.f, fill.style, fill.severity)?;
                    write!(self.f, "{}", fill.c.to_string().repeat(run_end - *cursor))?;
                    self.colors.reset(self.f)?;
                    *cursor = run_end;
                },
                None => {
                    write!(self.f, "{}", " ".repeat(to - *cursor))?;
                    *cursor = to;
                },
            }
        }

        Ok(())
    }

    fn write_line_number(&mut self, line: Option<usize>, separator: &str) -> Result {
        if let Some(line) = line {
            self.colors.line_number(self.f)?;
            write!(self.f, "{:>fill$}", line, fill = self.line_digits as usize)?;
        } else {
            write!(self.f, "{:>fill$}", "", fill = self.line_digits as usize)?;
        }

        self.colors.line_number_separator(self.f)?;
        write!(self.f, "{}", separator)?;
        self.colors.reset(self.f)?;
        Ok(())
    }

    fn write_source_line(&mut self, diagnostic: &Diagnostic<FileId>, line: Option<(FileId, usize)>,
                         separator: &str, continuing_annotations: &[&Annotation<FileId>]) -> Result {
        let line_number = match line.as_ref() {
            Some((file, line_index)) => Some(self.files.line_number(*file, *line_index)?),
            None => None,
        };

        self.write_line_number(line_number, separator)?;

        if separator.len() < 3 && (!continuing_annotations.is_empty() || self.max_nested_blocks > 0) {
            write!(self.f, "{}", " ".repeat(3 - separator.len()))?;
        }

        for (i, annotation) in continuing_annotations.iter().enumerate() {
            self.colors.annotation(self.f, annotation.style, diagnostic.severity)?;
            write!(self.f, "|")?;
            self.colors.reset(self.f)?;

            if i < continuing_annotations.len() - 1 {
                write!(self.f, " ")?;
            }
        }

        if let Some((file, line_index)) = line {
            let range = self.files.line_range(file, line_index)?;
            let source = self.files.source(file)?;
            let content = file::decode_line(&source[range], self.config.tab_length);

            if !content.trim().is_empty() {
                write!(self.f, "{:>nested_blocks$}", "",
                    nested_blocks = (2 * self.max_nested_blocks - (2 * continuing_annotations.len()).saturating_sub(1)).max(1))?;

                self.colors.source(self.f)?;
                write!(self.f, "{}", content)?;
                self.colors.reset(self.f)?;
            }
        }

        writeln!(self.f)?;
        Ok(())
    }

    fn render_note(&mut self, note: &Note) -> Result {
        self.write_line_number(None, " =")?;
        write!(self.f, " ")?;

        let severity = note.severity.to_string();
        self.colors.note_severity(self.f, note.severity)?;
        write!(self.f, "{}:", &severity)?;
        self.colors.note_message(self.f, note.severity)?;

        // Later lines of a multi-line note are aligned under the first
        // message column
        let message_column = self.line_digits as usize + 3 + severity.len() + 2;

        for (i, line) in note.message.split('\n').enumerate() {
            if i == 0 {
                writeln!(self.f, " {}", line)?;
            } else {
                writeln!(self.f, "{:>width$}{}", "", line, width = message_column)?;
            }
        }

        self.colors.reset(self.f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
