//! Contains the code for calculating the sequence of [`AnnotationData`]
//! for each line of source code.
//!
//! The entry point is [`calculate`], which turns the annotations that are
//! active on a single source line into a list of layout rows. Row `0` is the
//! underline row directly below the source line; every further row carries
//! hanging bars, connecting lines and labels. The renderer draws the rows
//! exactly as given, so everything about the vertical layout is decided here.
//!
//! [`AnnotationData`]: AnnotationData
//! [`calculate`]: calculate

use std::fmt::Debug;
use tracing::trace;
use crate::diagnostic::{Annotation, Diagnostic};
use crate::file::{Boundary, Error, Files};
use crate::render::data::{AnnotationData, ConnectingMultilineAnnotationData, ConnectingSinglelineAnnotationData, ContinuingMultilineAnnotationData, EndAnnotationLineData, HangingAnnotationLineData, LabelAnnotationLineData, StartAnnotationLineData, StartEndAnnotationData, VerticalOffset};
use crate::render::LineColumn;

/// Calculates the layout rows for a single source line.
///
/// `annotations` are the annotations that start on this line, end on this
/// line, or both; `continuing_annotations` are the multi-line annotations
/// that span across this line, in gutter bar order (ascending start offset).
pub fn calculate<FileId: Copy + Debug>(diagnostic: &Diagnostic<FileId>, files: &impl Files<FileId=FileId>, file: FileId,
                                       line_index: usize, tab_length: usize,
                                       annotations: &[&Annotation<FileId>], continuing_annotations: &[&Annotation<FileId>]) -> Result<Vec<Vec<AnnotationData>>, Error> {
    // Create a list of the start and end points of annotations on this line.
    // Every element is a tuple of a reference to the annotation, and its
    // start / end data.
    //
    // There are three variants of start / end data:
    // - Start: an annotation that starts on this line, and ends on a later one
    // - End:   an annotation that started before this line, and ends here
    // - Both:  an annotation that both starts and ends on this line (single-line)
    //
    // Every annotation falls in one of these categories, because `annotations`
    // only includes such annotations in the first place.
    let mut starts_ends: Vec<(&Annotation<FileId>, StartEndAnnotationData)> = Vec::with_capacity(annotations.len());

    for &annotation in annotations.iter() {
        let start_line_index = files.line_index(file, annotation.range.start)?;
        let end_line_index = if annotation.range.end > annotation.range.start {
            files.line_index(file, annotation.range.end - 1)?
        } else {
            start_line_index
        };

        let start_part = if start_line_index == line_index {
            let column_index = files.column_index(file, line_index, annotation.range.start, tab_length, Boundary::Inclusive)?;

            Some(StartAnnotationLineData {
                style: annotation.style,
                severity: diagnostic.severity,
                location: LineColumn::new(line_index, column_index),
            })
        } else { None };

        let end_part = if end_line_index == line_index {
            // An empty span attaches to its start location
            let column_index = if annotation.range.end > annotation.range.start {
                files.column_index(file, line_index, annotation.range.end, tab_length, Boundary::Exclusive)?
            } else {
                files.column_index(file, line_index, annotation.range.start, tab_length, Boundary::Inclusive)?
            };

            Some(EndAnnotationLineData {
                style: annotation.style,
                severity: diagnostic.severity,
                location: LineColumn::new(line_index, column_index),
            })
        } else { None };

        match (start_part, end_part) {
            (Some(start_part), Some(mut end_part)) => {
                // A cluster of display width zero could make the end column
                // fall before the start column
                end_part.location.column_index = end_part.location.column_index.max(start_part.location.column_index);
                starts_ends.push((annotation, StartEndAnnotationData::Both(start_part, end_part)));
            },
            (Some(start_part), _) => starts_ends.push((annotation, StartEndAnnotationData::Start(start_part))),
            (_, Some(end_part)) => starts_ends.push((annotation, StartEndAnnotationData::End(end_part))),
            _ => panic!("Annotation neither starts nor ends on this line, despite previous check"),
        };
    }

    // Sort by the start / end data's primary location: ending annotations
    // first, in the order they started in (which is their gutter bar order),
    // then starting and single-line annotations by their column on this line.
    starts_ends.sort_by_key(|(annotation, start_end)| match start_end {
        StartEndAnnotationData::End(_) => (0, annotation.range.start, 0),
        StartEndAnnotationData::Start(data) | StartEndAnnotationData::Both(data, _) =>
            (1, data.location.column_index, annotation.range.start),
    });

    if starts_ends.is_empty() {
        return Ok(Vec::new());
    }

    let vertical_offsets = calculate_vertical_offsets(&starts_ends);
    trace!(line_index, ?vertical_offsets, "calculated vertical offsets");

    calculate_final_data(diagnostic, files, file, line_index, &starts_ends, &vertical_offsets, continuing_annotations)
}

/// The column of the leftmost glyph an entry puts on row `0`.
fn row_0_column(start_end: &StartEndAnnotationData) -> usize {
    match start_end {
        StartEndAnnotationData::Start(data) => data.location.column_index,
        StartEndAnnotationData::End(data) => data.location.column_index,
        StartEndAnnotationData::Both(start, _) => start.location.column_index,
    }
}

/// The column of the rightmost glyph an entry puts on row `0`.
fn row_0_rightmost_column(start_end: &StartEndAnnotationData) -> usize {
    match start_end {
        StartEndAnnotationData::Start(data) => data.location.column_index,
        StartEndAnnotationData::End(data) => data.location.column_index,
        StartEndAnnotationData::Both(_, end) => end.location.column_index,
    }
}

/// The column an entry's hanging bars and hanging label are anchored to.
fn label_anchor_column(start_end: &StartEndAnnotationData) -> usize {
    match start_end {
        StartEndAnnotationData::Start(data) => data.location.column_index,
        StartEndAnnotationData::End(data) => data.location.column_index,
        StartEndAnnotationData::Both(start, _) => start.location.column_index,
    }
}

/// Assigns every annotation on the line its [`VerticalOffset`]: the row its
/// connecting line is drawn on, and the row its label starts on.
///
/// Connection rows are given out to ending annotations first, innermost
/// gutter bar first, so that connecting lines never cross:
///
/// ```text
/// 23 | | | pub fn example_function(&mut self, argument: usize) -> usize {
///    | | |   ^    ^
///    | | |___|____|
///    | |_____|    some label
///    |       some other label
/// ```
///
/// Starting annotations connect below the ending ones, leftmost first. A
/// connecting line may run below other boundary markers, but the first one
/// is pushed off the underline row if a marker of an annotation that starts
/// on this line is in its way.
///
/// Labels are inline (directly after the end marker, on row `0`) only for
/// the annotation whose marker is rightmost on the line; all other labels
/// hang below their annotation's column, rightmost annotation first:
///
/// ```text
/// 23 | pub fn example_function(&mut self, argument: usize) -> usize {
///    |                         ---------  --------            ----- return type
///    |                         |          |
///    |                         |          a parameter
///    |                         self parameter
/// ```
///
/// [`VerticalOffset`]: VerticalOffset
pub(crate) fn calculate_vertical_offsets<FileId>(starts_ends: &[(&Annotation<FileId>, StartEndAnnotationData)]) -> Vec<VerticalOffset> {
    let mut vertical_offsets = vec![VerticalOffset::default(); starts_ends.len()];

    // Ending annotations, in descending start offset order. The annotation
    // with the latest start has the innermost (rightmost) gutter bar, so it
    // has to disconnect first.
    let mut ending_indices = starts_ends.iter().enumerate()
        .filter(|(_, (_, start_end))| matches!(start_end, StartEndAnnotationData::End(_)))
        .map(|(i, _)| i).collect::<Vec<_>>();
    ending_indices.sort_by_key(|&i| starts_ends[i].0.range.start);

    let mut next_connection: u32 = 0;

    for &i in ending_indices.iter().rev() {
        let end_column = row_0_rightmost_column(&starts_ends[i].1);

        if next_connection == 0 {
            // The underscore run occupies the underline row from the gutter
            // to the end marker. It may pass below other end markers, but an
            // underline of an annotation starting on this line forces it down.
            let occupied = starts_ends.iter().enumerate().any(|(j, (_, start_end))| j != i && match start_end {
                StartEndAnnotationData::Start(data) => data.location.column_index <= end_column,
                StartEndAnnotationData::Both(start, _) => start.location.column_index <= end_column,
                StartEndAnnotationData::End(_) => false,
            });

            if occupied {
                next_connection = 1;
            }
        }

        vertical_offsets[i].connection = next_connection;
        next_connection += 1;
    }

    // Starting annotations connect below the ending ones, leftmost first
    // (which is also their gutter bar order).
    for (i, (_, start_end)) in starts_ends.iter().enumerate() {
        let start_column = match start_end {
            StartEndAnnotationData::Start(data) => data.location.column_index,
            StartEndAnnotationData::End(_) | StartEndAnnotationData::Both(_, _) => continue,
        };

        if next_connection == 0 {
            let occupied = starts_ends.iter().enumerate()
                .any(|(j, (_, other))| j != i && row_0_column(other) <= start_column);

            if occupied {
                next_connection = 1;
            }
        }

        vertical_offsets[i].connection = next_connection;
        next_connection += 1;
    }

    let max_connection = starts_ends.iter().enumerate()
        .filter(|(_, (_, start_end))| !matches!(start_end, StartEndAnnotationData::Both(_, _)))
        .map(|(i, _)| vertical_offsets[i].connection)
        .max().unwrap_or(0);

    // Labels. The rightmost annotation's label can be displayed inline,
    // directly after its end marker; all others hang below the line,
    // starting below every connecting line, rightmost annotation first.
    let mut labeled_indices = starts_ends.iter().enumerate()
        .filter(|(_, (annotation, start_end))| !annotation.label.is_empty()
            && !matches!(start_end, StartEndAnnotationData::Start(_)))
        .map(|(i, _)| i).collect::<Vec<_>>();
    labeled_indices.sort_by_key(|&i| std::cmp::Reverse(label_anchor_column(&starts_ends[i].1)));

    let mut next_label: u32 = max_connection + 2;

    for &i in labeled_indices.iter() {
        let label_lines = starts_ends[i].0.label.split('\n').count() as u32;
        let anchor = label_anchor_column(&starts_ends[i].1);

        let inline = !starts_ends.iter().enumerate()
            .any(|(j, (_, other))| j != i && row_0_rightmost_column(other) >= anchor);

        if inline {
            vertical_offsets[i].label = 0;
            // Later label lines of an inline label extend downward; hanging
            // labels have to start below them
            next_label = next_label.max(label_lines);
        } else {
            vertical_offsets[i].label = next_label;
            next_label += label_lines;
        }
    }

    vertical_offsets
}

/// Expands the vertical offsets into the final list of layout rows.
#[allow(clippy::too_many_arguments)]
fn calculate_final_data<FileId: Copy + Debug>(diagnostic: &Diagnostic<FileId>, files: &impl Files<FileId=FileId>, file: FileId,
                                              line_index: usize,
                                              starts_ends: &[(&Annotation<FileId>, StartEndAnnotationData)],
                                              vertical_offsets: &[VerticalOffset],
                                              continuing_annotations: &[&Annotation<FileId>]) -> Result<Vec<Vec<AnnotationData>>, Error> {
    // How many elements from the start of continuing_annotations to draw as
    // vertical bars in the gutter. Exclusive, the index referred to is not
    // included. Annotations that only start on this line get their bar
    // through `additional_continuing_indices` once they have connected.
    let mut continuing_end_index: usize = 0;

    for (i, annotation) in continuing_annotations.iter().enumerate() {
        let start_line_index = files.line_index(file, annotation.range.start)?;

        if start_line_index < line_index {
            continuing_end_index = i + 1;
        } else {
            break;
        }
    }

    let mut additional_continuing_indices: Vec<usize> = Vec::new();
    let mut connected = vec![false; starts_ends.len()];

    // The number of rows is decided by the lowest connecting line and the
    // last line of the lowest label.
    let mut last_row: u32 = 0;

    for (i, (annotation, start_end)) in starts_ends.iter().enumerate() {
        if !matches!(start_end, StartEndAnnotationData::Both(_, _)) {
            last_row = last_row.max(vertical_offsets[i].connection);
        }

        if !annotation.label.is_empty() && !matches!(start_end, StartEndAnnotationData::Start(_)) {
            let label_lines = annotation.label.split('\n').count() as u32;
            last_row = last_row.max(vertical_offsets[i].label + label_lines - 1);
        }
    }

    let mut final_data = Vec::with_capacity(last_row as usize + 1);

    for current_row in 0..=last_row {
        let mut data: Vec<AnnotationData> = Vec::new();

        // Continuing vertical bars in the gutter.
        for (bar_index, annotation) in continuing_annotations.iter().take(continuing_end_index).enumerate() {
            data.push(AnnotationData::ContinuingMultiline(ContinuingMultilineAnnotationData {
                style: annotation.style,
                severity: diagnostic.severity,
                vertical_bar_index: bar_index,
            }));
        }

        for (i, &index) in additional_continuing_indices.iter().enumerate() {
            data.push(AnnotationData::ContinuingMultiline(ContinuingMultilineAnnotationData {
                style: starts_ends[index].0.style,
                severity: diagnostic.severity,
                vertical_bar_index: continuing_end_index + i,
            }));
        }

        // The connecting line for this row, if there is one. Ending
        // annotations release the rightmost remaining bar; starting
        // annotations occupy a new bar after the existing ones.
        for i in (0..starts_ends.len()).rev() {
            if vertical_offsets[i].connection != current_row || connected[i] {
                continue;
            }

            let (annotation, start_end) = &starts_ends[i];

            match start_end {
                StartEndAnnotationData::End(end) => {
                    data.push(AnnotationData::ConnectingMultiline(ConnectingMultilineAnnotationData {
                        style: annotation.style,
                        severity: diagnostic.severity,
                        end_location: end.location.clone(),
                        vertical_bar_index: (continuing_end_index + additional_continuing_indices.len()) - 1,
                    }));
                    continuing_end_index -= 1;
                    connected[i] = true;
                },
                StartEndAnnotationData::Start(start) => {
                    data.push(AnnotationData::ConnectingMultiline(ConnectingMultilineAnnotationData {
                        style: annotation.style,
                        severity: diagnostic.severity,
                        end_location: start.location.clone(),
                        vertical_bar_index: continuing_end_index + additional_continuing_indices.len(),
                    }));
                    additional_continuing_indices.push(i);
                    connected[i] = true;
                },
                StartEndAnnotationData::Both(_, _) => continue,
            }

            break;
        }

        for (i, (annotation, start_end)) in starts_ends.iter().enumerate() {
            if current_row == 0 {
                // The underline row has the start and end boundary markers
                // and the underlines of single-line annotations.
                match start_end {
                    StartEndAnnotationData::Start(start) => data.push(AnnotationData::Start(start.clone())),
                    StartEndAnnotationData::End(end) => data.push(AnnotationData::End(end.clone())),
                    StartEndAnnotationData::Both(start, end) => {
                        data.push(AnnotationData::Start(start.clone()));

                        // A zero-width span has no underline, just the two
                        // boundary markers on the same column
                        if annotation.range.end > annotation.range.start {
                            data.push(AnnotationData::ConnectingSingleline(ConnectingSinglelineAnnotationData {
                                style: annotation.style,
                                as_multiline: false,
                                severity: diagnostic.severity,
                                line_index,
                                start_column_index: start.location.column_index,
                                end_column_index: end.location.column_index + 1,
                            }));
                        }

                        data.push(AnnotationData::End(end.clone()));
                    },
                }
            } else {
                // Hanging bars, so that the eye can follow the column down
                // to a label or a connecting line further below. On the
                // connecting row itself this is the terminal cell of the run.
                let connection_pending = !matches!(start_end, StartEndAnnotationData::Both(_, _))
                    && vertical_offsets[i].connection >= current_row;
                let label_pending = !annotation.label.is_empty()
                    && !matches!(start_end, StartEndAnnotationData::Start(_))
                    && vertical_offsets[i].label > current_row;

                if connection_pending || label_pending {
                    data.push(AnnotationData::Hanging(HangingAnnotationLineData {
                        style: annotation.style,
                        severity: diagnostic.severity,
                        location: LineColumn::new(line_index, label_anchor_column(start_end)),
                    }));
                }
            }

            // The label line for this row, if any. Multi-line labels take
            // one row per label line, all aligned to the same column.
            if !annotation.label.is_empty() && !matches!(start_end, StartEndAnnotationData::Start(_)) {
                let label_lines = annotation.label.split('\n').count() as u32;
                let first_label_row = vertical_offsets[i].label;

                if current_row >= first_label_row && current_row < first_label_row + label_lines {
                    let column_index = if first_label_row == 0 {
                        // Inline labels go directly after the end marker
                        match start_end {
                            StartEndAnnotationData::End(end) | StartEndAnnotationData::Both(_, end) =>
                                end.location.column_index + 2,
                            StartEndAnnotationData::Start(_) => unreachable!("starting annotations have no label on this line"),
                        }
                    } else {
                        label_anchor_column(start_end)
                    };

                    let label_line = annotation.label.split('\n').nth((current_row - first_label_row) as usize)
                        .expect("label line index is in bounds");

                    data.push(AnnotationData::Label(LabelAnnotationLineData {
                        style: annotation.style,
                        severity: diagnostic.severity,
                        location: LineColumn::new(line_index, column_index),
                        label: label_line.to_owned(),
                    }));
                }
            }
        }

        // Sort the row: gutter bars, then the connecting line, then
        // everything else in column order.
        data.sort_by_key(|item| item.sort_rank());
        data.push(AnnotationData::Newline);

        final_data.push(data);
    }

    Ok(final_data)
}

#[cfg(test)]
mod tests;
