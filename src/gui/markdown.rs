//! Markdown Viewer
//! Renders model narratives, which are requested in markdown, with egui rich text.
//!
//! Parsing is split from drawing so the block structure can be tested
//! without a UI context.

use egui::{Color32, RichText};
use pulldown_cmark::{Event, Options, Parser as MdParser, Tag, TagEnd};

/// Inline run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

/// Block-level element of a narrative.
#[derive(Debug, Clone, PartialEq)]
pub enum MdBlock {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    /// `marker` is `"•"`, `"3."` or empty for a continuation line.
    ListItem { depth: usize, marker: String, spans: Vec<Span> },
    CodeBlock(String),
    /// One span list per cell.
    Table {
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Rule,
}

#[derive(Default)]
struct TableState {
    header: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
    row: Vec<Vec<Span>>,
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<MdBlock>,
    spans: Vec<Span>,
    bold: usize,
    italic: usize,
    heading: Option<u8>,
    /// Next number for ordered lists, None for bullet lists.
    lists: Vec<Option<u64>>,
    marker: Option<String>,
    code: Option<String>,
    table: Option<TableState>,
}

impl BlockCollector {
    fn push_text(&mut self, text: &str, code: bool) {
        if let Some(buf) = self.code.as_mut() {
            buf.push_str(text);
            return;
        }
        self.spans.push(Span {
            text: text.to_string(),
            bold: self.bold > 0,
            italic: self.italic > 0,
            code,
        });
    }

    /// Emit buffered spans as a list item or paragraph.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        if self.lists.is_empty() {
            self.blocks.push(MdBlock::Paragraph(spans));
        } else {
            self.blocks.push(MdBlock::ListItem {
                depth: self.lists.len() - 1,
                marker: self.marker.take().unwrap_or_default(),
                spans,
            });
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Event::End(TagEnd::Heading(_)) => {
                let spans = std::mem::take(&mut self.spans);
                let level = self.heading.take().unwrap_or(1);
                self.blocks.push(MdBlock::Heading { level, spans });
            }
            Event::End(TagEnd::Paragraph) => {
                if self.lists.is_empty() {
                    self.flush();
                } else if !self.spans.is_empty() {
                    // Loose list: paragraphs of one item run together
                    self.push_text(" ", false);
                }
            }
            Event::Start(Tag::List(start)) => {
                self.flush();
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}.", n);
                        *n += 1;
                        m
                    }
                    _ => "•".to_string(),
                };
                self.marker = Some(marker);
            }
            Event::End(TagEnd::Item) => {
                if let Some(last) = self.spans.last_mut() {
                    let trimmed = last.text.trim_end().len();
                    last.text.truncate(trimmed);
                }
                self.flush();
                self.marker = None;
            }
            Event::Start(Tag::Strong) => self.bold += 1,
            Event::End(TagEnd::Strong) => self.bold = self.bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.italic += 1,
            Event::End(TagEnd::Emphasis) => self.italic = self.italic.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = self.code.take().unwrap_or_default();
                self.blocks.push(MdBlock::CodeBlock(code.trim_end().to_string()));
            }
            Event::Start(Tag::Table(_)) => {
                self.flush();
                self.table = Some(TableState::default());
            }
            Event::End(TagEnd::TableCell) => {
                let cell = std::mem::take(&mut self.spans);
                if let Some(table) = self.table.as_mut() {
                    table.row.push(cell);
                }
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            Event::End(TagEnd::Table) => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(MdBlock::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            Event::Text(text) => self.push_text(&text, false),
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush();
                self.blocks.push(MdBlock::Rule);
            }
            _ => {}
        }
    }
}

/// Parse markdown into display blocks. GFM tables are recognised.
pub fn parse_markdown(source: &str) -> Vec<MdBlock> {
    let mut collector = BlockCollector::default();
    for event in MdParser::new_ext(source, Options::ENABLE_TABLES) {
        collector.handle(event);
    }
    collector.flush();
    collector.blocks
}

fn span_text(span: &Span, size: f32) -> RichText {
    let mut text = RichText::new(&span.text).size(size);
    if span.bold {
        text = text.strong();
    }
    if span.italic {
        text = text.italics();
    }
    if span.code {
        text = text.code();
    }
    text
}

fn show_spans(ui: &mut egui::Ui, spans: &[Span], size: f32) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            ui.label(span_text(span, size));
        }
    });
}

fn show_table(ui: &mut egui::Ui, id: usize, header: &[Vec<Span>], rows: &[Vec<Vec<Span>>]) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new(("markdown_table", id))
                .striped(true)
                .min_col_width(60.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for cell in header {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 0.0;
                            for span in cell {
                                ui.label(span_text(span, 13.0).strong());
                            }
                        });
                    }
                    ui.end_row();

                    for row in rows {
                        for cell in row {
                            ui.horizontal(|ui| {
                                ui.spacing_mut().item_spacing.x = 0.0;
                                for span in cell {
                                    ui.label(span_text(span, 13.0));
                                }
                            });
                        }
                        ui.end_row();
                    }
                });
        });
    ui.add_space(4.0);
}

/// Draw parsed blocks.
pub fn show_markdown(ui: &mut egui::Ui, blocks: &[MdBlock]) {
    for (index, block) in blocks.iter().enumerate() {
        match block {
            MdBlock::Heading { level, spans } => {
                let size = match level {
                    1 => 22.0,
                    2 => 19.0,
                    3 => 16.5,
                    _ => 14.5,
                };
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for span in spans {
                        ui.label(span_text(span, size).strong());
                    }
                });
                ui.add_space(2.0);
            }
            MdBlock::Paragraph(spans) => {
                show_spans(ui, spans, 13.5);
                ui.add_space(4.0);
            }
            MdBlock::ListItem {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(12.0 + *depth as f32 * 18.0);
                    ui.label(RichText::new(marker).size(13.5).color(Color32::GRAY));
                    ui.add_space(4.0);
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for span in spans {
                        ui.label(span_text(span, 13.5));
                    }
                });
            }
            MdBlock::CodeBlock(code) => {
                egui::Frame::none()
                    .fill(ui.visuals().extreme_bg_color)
                    .rounding(4.0)
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(code).monospace());
                    });
                ui.add_space(4.0);
            }
            MdBlock::Table { header, rows } => show_table(ui, index, header, rows),
            MdBlock::Rule => {
                ui.separator();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            ..Span::default()
        }
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = parse_markdown("## Key Findings\n\nWomen favour **Labour** by 7 points.");
        assert_eq!(
            blocks,
            vec![
                MdBlock::Heading {
                    level: 2,
                    spans: vec![plain("Key Findings")],
                },
                MdBlock::Paragraph(vec![
                    plain("Women favour "),
                    Span {
                        text: "Labour".to_string(),
                        bold: true,
                        ..Span::default()
                    },
                    plain(" by 7 points."),
                ]),
            ]
        );
    }

    #[test]
    fn test_ordered_list_markers() {
        let blocks = parse_markdown("1. First\n2. Second\n");
        let markers: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                MdBlock::ListItem { marker, .. } => Some(marker.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec!["1.", "2."]);
    }

    #[test]
    fn test_nested_bullets_have_depth() {
        let blocks = parse_markdown("- Parties\n  - Labour\n  - Reform\n- Regions\n");
        let items: Vec<(usize, String)> = blocks
            .iter()
            .filter_map(|b| match b {
                MdBlock::ListItem { depth, spans, .. } => Some((*depth, spans[0].text.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            items,
            vec![
                (0, "Parties".to_string()),
                (1, "Labour".to_string()),
                (1, "Reform".to_string()),
                (0, "Regions".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_and_rule() {
        let blocks = parse_markdown("```\nmean = 34.75\n```\n\n---\n\nDone");
        assert_eq!(
            blocks,
            vec![
                MdBlock::CodeBlock("mean = 34.75".to_string()),
                MdBlock::Rule,
                MdBlock::Paragraph(vec![plain("Done")]),
            ]
        );
    }

    #[test]
    fn test_table_cells_are_collected() {
        let blocks =
            parse_markdown("| Party | Male | Female |\n|---|---|---|\n| Labour | 31 | **38** |\n");
        assert_eq!(
            blocks,
            vec![MdBlock::Table {
                header: vec![vec![plain("Party")], vec![plain("Male")], vec![plain("Female")]],
                rows: vec![vec![
                    vec![plain("Labour")],
                    vec![plain("31")],
                    vec![Span {
                        text: "38".to_string(),
                        bold: true,
                        ..Span::default()
                    }],
                ]],
            }]
        );
    }

    #[test]
    fn test_paragraph_after_table_stays_separate() {
        let blocks = parse_markdown("| A |\n|---|\n| 1 |\n\nGap is small.");
        assert!(matches!(blocks[0], MdBlock::Table { .. }));
        assert_eq!(blocks[1], MdBlock::Paragraph(vec![plain("Gap is small.")]));
    }

    #[test]
    fn test_inline_code_and_italics() {
        let blocks = parse_markdown("Use *weighted* `Support`");
        let MdBlock::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks[0]);
        };
        assert!(spans[1].italic);
        assert!(spans[3].code);
        assert_eq!(spans[3].text, "Support");
    }
}
