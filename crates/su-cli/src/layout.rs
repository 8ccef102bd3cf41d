//! Lays a rendered schema tree out as terminal rows of styled spans.

use su_runtime::primitives::{
    Align, ButtonProps, ContainerProps, FlexDirection, FontWeight, GridProps, InputProps, Rgb,
    TextProps,
};
use su_runtime::{Primitive, RenderedNode};

const INPUT_MIN_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SpanStyle {
    pub(crate) fg: Option<Rgb>,
    pub(crate) bg: Option<Rgb>,
    pub(crate) bold: bool,
    pub(crate) dim: bool,
    pub(crate) strike: bool,
    pub(crate) focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ViewSpan {
    pub(crate) text: String,
    pub(crate) style: SpanStyle,
}

pub(crate) type ViewLine = Vec<ViewSpan>;

pub(crate) fn line_text(line: &ViewLine) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}

fn line_width(line: &ViewLine) -> usize {
    line.iter().map(|span| span.text.chars().count()).sum()
}

fn plain(text: impl Into<String>) -> ViewSpan {
    ViewSpan {
        text: text.into(),
        style: SpanStyle::default(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LayoutOptions {
    /// Interactive index to highlight.
    pub(crate) focus: Option<usize>,
    /// Prefix every control with `#N` so line mode can address it.
    pub(crate) show_indices: bool,
}

pub(crate) fn layout_tree(root: &RenderedNode, options: LayoutOptions) -> Vec<ViewLine> {
    let mut next_control = 0usize;
    layout_node(root, &options, &mut next_control)
}

fn layout_node(node: &RenderedNode, options: &LayoutOptions, next_control: &mut usize) -> Vec<ViewLine> {
    match node.primitive {
        Primitive::Text => vec![text_line(node)],
        Primitive::Button => {
            let index = *next_control;
            *next_control += 1;
            vec![button_line(node, index, options)]
        }
        Primitive::Input => {
            let index = *next_control;
            *next_control += 1;
            vec![input_line(node, index, options)]
        }
        Primitive::Container => {
            let view = ContainerProps::from_props(&node.props);
            let blocks = child_blocks(node, options, next_control);
            let lines = match view.flex_direction {
                FlexDirection::Row => join_horizontal(
                    &align_vertically(blocks, view.align_items),
                    column_gap(view.gap),
                ),
                FlexDirection::Column => join_vertical(
                    align_horizontally(blocks, view.align_items),
                    view.gap >= 20.0,
                ),
            };
            indent(lines, padding_columns(view.padding))
        }
        Primitive::Grid => {
            let view = GridProps::from_props(&node.props);
            let blocks = child_blocks(node, options, next_control);
            grid(&blocks, view.columns, column_gap(view.gap))
        }
        Primitive::List | Primitive::ListItem | Primitive::Fragment => {
            join_vertical(child_blocks(node, options, next_control), false)
        }
    }
}

fn child_blocks(
    node: &RenderedNode,
    options: &LayoutOptions,
    next_control: &mut usize,
) -> Vec<Vec<ViewLine>> {
    node.children
        .iter()
        .map(|child| layout_node(child, options, next_control))
        .filter(|block| !block.is_empty())
        .collect()
}

fn column_gap(gap: f64) -> usize {
    ((gap / 8.0).round() as usize).clamp(1, 4)
}

/// Padding is in pixels; two columns at most so nested boxes stay readable.
fn padding_columns(padding: f64) -> usize {
    ((padding / 16.0).round() as usize).min(2)
}

fn indent(lines: Vec<ViewLine>, columns: usize) -> Vec<ViewLine> {
    if columns == 0 {
        return lines;
    }
    lines
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                return line;
            }
            let mut padded = vec![plain(" ".repeat(columns))];
            padded.extend(line);
            padded
        })
        .collect()
}

/// Cross-axis alignment of a column: shifts each child block right.
fn align_horizontally(blocks: Vec<Vec<ViewLine>>, align: Align) -> Vec<Vec<ViewLine>> {
    let width = blocks.iter().map(|block| block_width(block)).max().unwrap_or(0);
    blocks
        .into_iter()
        .map(|block| {
            let slack = width.saturating_sub(block_width(&block));
            let shift = match align {
                Align::Center => slack / 2,
                Align::FlexEnd => slack,
                Align::FlexStart | Align::Stretch => 0,
            };
            indent(block, shift)
        })
        .collect()
}

/// Cross-axis alignment of a row: pushes shorter blocks down.
fn align_vertically(blocks: Vec<Vec<ViewLine>>, align: Align) -> Vec<Vec<ViewLine>> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    blocks
        .into_iter()
        .map(|block| {
            let slack = height.saturating_sub(block.len());
            let shift = match align {
                Align::Center => slack / 2,
                Align::FlexEnd => slack,
                Align::FlexStart | Align::Stretch => 0,
            };
            let mut shifted = vec![ViewLine::new(); shift];
            shifted.extend(block);
            shifted
        })
        .collect()
}

fn text_line(node: &RenderedNode) -> ViewLine {
    let view = TextProps::from_props(&node.props);
    let content = view
        .content
        .clone()
        .or_else(|| node.own_text())
        .unwrap_or_default();
    vec![ViewSpan {
        text: content,
        style: SpanStyle {
            fg: Some(view.color).filter(|color| *color != Rgb(0, 0, 0)),
            bold: view.font_weight == FontWeight::Bold || view.font_size >= 24.0,
            dim: view.dimmed || view.font_weight == FontWeight::Lighter,
            strike: view.strike_through,
            ..SpanStyle::default()
        },
    }]
}

fn control_prefix(index: usize, options: &LayoutOptions) -> Option<ViewSpan> {
    options.show_indices.then(|| plain(format!("#{}", index)))
}

fn button_line(node: &RenderedNode, index: usize, options: &LayoutOptions) -> ViewLine {
    let view = ButtonProps::from_props(&node.props);
    let label = view.label.unwrap_or_default();
    let mut line: ViewLine = control_prefix(index, options).into_iter().collect();
    line.push(ViewSpan {
        text: format!("[ {} ]", label),
        style: SpanStyle {
            fg: Some(view.color),
            bg: Some(view.background),
            bold: true,
            dim: view.disabled,
            focused: options.focus == Some(index),
            ..SpanStyle::default()
        },
    });
    line
}

fn input_line(node: &RenderedNode, index: usize, options: &LayoutOptions) -> ViewLine {
    let view = InputProps::from_props(&node.props);
    let (shown, dim) = if view.value.is_empty() {
        (view.placeholder, true)
    } else {
        (view.value, false)
    };
    let width = INPUT_MIN_WIDTH.max(shown.chars().count() + 1);
    let padded = format!("{:<width$}", shown, width = width);

    let mut line: ViewLine = control_prefix(index, options).into_iter().collect();
    line.push(plain("["));
    line.push(ViewSpan {
        text: padded,
        style: SpanStyle {
            dim,
            focused: options.focus == Some(index),
            ..SpanStyle::default()
        },
    });
    line.push(plain("]"));
    line
}

fn join_vertical(blocks: Vec<Vec<ViewLine>>, spaced: bool) -> Vec<ViewLine> {
    let mut out = Vec::new();
    for (position, block) in blocks.into_iter().enumerate() {
        if spaced && position > 0 {
            out.push(Vec::new());
        }
        out.extend(block);
    }
    out
}

fn block_width(block: &[ViewLine]) -> usize {
    block.iter().map(line_width).max().unwrap_or(0)
}

fn join_horizontal(blocks: &[Vec<ViewLine>], gap: usize) -> Vec<ViewLine> {
    let widths: Vec<usize> = blocks.iter().map(|block| block_width(block)).collect();
    join_with_widths(blocks, &widths, gap)
}

fn join_with_widths(blocks: &[Vec<ViewLine>], widths: &[usize], gap: usize) -> Vec<ViewLine> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|row| {
            let mut line = ViewLine::new();
            for (column, block) in blocks.iter().enumerate() {
                if column > 0 {
                    line.push(plain(" ".repeat(gap)));
                }
                let cell = block.get(row).cloned().unwrap_or_default();
                let pad = widths[column].saturating_sub(line_width(&cell));
                line.extend(cell);
                if pad > 0 && column + 1 < blocks.len() {
                    line.push(plain(" ".repeat(pad)));
                }
            }
            line
        })
        .collect()
}

fn grid(blocks: &[Vec<ViewLine>], columns: usize, gap: usize) -> Vec<ViewLine> {
    let columns = columns.max(1);
    let cell_width = blocks.iter().map(|block| block_width(block)).max().unwrap_or(0);
    blocks
        .chunks(columns)
        .flat_map(|row| {
            let widths = vec![cell_width; row.len()];
            join_with_widths(row, &widths, gap)
        })
        .collect()
}
