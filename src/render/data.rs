//! The typed layout records emitted by the [layout calculator].
//!
//! Every annotated source line expands into a list of rows, and every row is
//! a list of [`AnnotationData`] items ordered left to right, terminated by
//! [`AnnotationData::Newline`]. The renderer turns these records into glyphs;
//! nothing in here writes output itself.
//!
//! [layout calculator]: super::calculate
//! [`AnnotationData`]: AnnotationData
//! [`AnnotationData::Newline`]: AnnotationData::Newline

use crate::diagnostic::{AnnotationStyle, Severity};
use crate::render::LineColumn;

/// Data for a continuing multi-line annotation. This is an annotation that
/// is still open on this line, so it is drawn as a single `"|"` in the
/// continuing vertical bar column `vertical_bar_index` on the left.
///
/// This can occur on any row, multiple times per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContinuingMultilineAnnotationData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    /// the index of this continuing vertical bar, `0` being leftmost
    pub vertical_bar_index: usize,
}

/// Data for a connecting multi-line annotation. This is an annotation that is
/// running from the continuing vertical bars on the left over to its
/// location in the source code on this line.
///
/// This is used for both annotations starting and ending on a line.
/// It can only occur once per row (but of course, multiple times per source line).
///
/// This is drawn as underscores from the vertical bars to `end_location` (exclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectingMultilineAnnotationData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    pub end_location: LineColumn,
    /// the index of the continuing vertical bar on the left
    /// this annotation connects with
    pub vertical_bar_index: usize,
}

/// Data for a starting annotation. That is an annotation,
/// either single-line or multi-line, which starts on this line.
///
/// This is drawn as a single boundary character at `location`.
/// This can occur multiple times per line, but only on row `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartAnnotationLineData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    pub location: LineColumn,
}

/// Data for a connecting single-line annotation. This is an annotation that is
/// entirely on a single line. This data represents the underline showing where
/// that annotation starts and ends.
///
/// This is drawn as underline characters (or underscores if `as_multiline` is `true`)
/// running from `start_column_index` (inclusive) to `end_column_index` (exclusive).
/// This can occur multiple times per line, but only on row `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectingSinglelineAnnotationData {
    pub style: AnnotationStyle, pub as_multiline: bool,
    pub severity: Severity,
    pub line_index: usize,
    pub start_column_index: usize, pub end_column_index: usize,
}

/// Data for an ending annotation. That is an annotation,
/// either single-line or multi-line, which ends on this line.
///
/// This is drawn as a single boundary character at `location`.
/// This can occur multiple times per line, but only on row `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndAnnotationLineData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    pub location: LineColumn,
}

/// Data for a hanging mark. This is drawn for annotations whose connecting
/// line or label is still below the current row, so that the eye can follow
/// the column down to it, and as the terminal cell of a connecting line.
///
/// This is drawn as a single `"|"` character at `location`.
/// This can occur multiple times per row, on rows `>= 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HangingAnnotationLineData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    pub location: LineColumn,
}

/// Data for a single line of an annotation's label.
///
/// The label text is placed so that its first character is at `location`'s
/// column. Labels with line breaks are emitted as one of these per label
/// line, on consecutive rows, all aligned to the same column.
///
/// This is drawn as the label text itself.
/// This can only occur once per row, as the last item before the newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelAnnotationLineData {
    pub style: AnnotationStyle,
    pub severity: Severity,
    pub location: LineColumn,
    pub label: String,
}

/// A single layout item: one typed glyph run on an annotation row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationData {
    ContinuingMultiline(ContinuingMultilineAnnotationData),
    ConnectingMultiline(ConnectingMultilineAnnotationData),
    Start(StartAnnotationLineData),
    ConnectingSingleline(ConnectingSinglelineAnnotationData),
    End(EndAnnotationLineData),
    Hanging(HangingAnnotationLineData),
    Label(LabelAnnotationLineData),
    /// Terminates a row. Every row ends with exactly one of these.
    Newline,
}

impl AnnotationData {
    /// The key items within a row are ordered by: first the gutter items
    /// (continuing bars, then the connecting line), then everything else by
    /// its source column. Items at the same column keep a fixed relative
    /// order, with labels last.
    pub(super) fn sort_rank(&self) -> (u8, usize, u8) {
        match self {
            AnnotationData::ContinuingMultiline(data) => (0, data.vertical_bar_index, 0),
            AnnotationData::ConnectingMultiline(data) => (1, data.vertical_bar_index, 0),
            AnnotationData::Start(data) => (2, data.location.column_index, 0),
            AnnotationData::ConnectingSingleline(data) => (2, data.start_column_index, 1),
            AnnotationData::End(data) => (2, data.location.column_index, 2),
            AnnotationData::Hanging(data) => (2, data.location.column_index, 3),
            AnnotationData::Label(data) => (2, data.location.column_index, 4),
            AnnotationData::Newline => (3, 0, 0),
        }
    }
}

/// How an annotation relates to a single source line: it can start here,
/// end here, or both (a single-line annotation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartEndAnnotationData {
    /// The annotation starts on this line, and ends on a later one.
    Start(StartAnnotationLineData),
    /// The annotation started on an earlier line, and ends on this one.
    End(EndAnnotationLineData),
    /// The annotation starts and ends on this line.
    Both(StartAnnotationLineData, EndAnnotationLineData),
}

/// The vertical placement assigned to an annotation on a source line.
///
/// `connection` is the row its connecting line (underline, underscore run,
/// or terminal bar) is drawn on; `label` is the row the first line of its
/// label is drawn on. Row `0` is the underline row directly below the
/// source line. A `label` of `0` means the label is inline, directly after
/// the annotation's end marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalOffset {
    pub connection: u32,
    pub label: u32,
}
