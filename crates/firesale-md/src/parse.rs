use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

/// One top-level piece of the rendered preview. Holds no egui types so it can
/// be built and tested without a UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Block {
    QuoteStart,
    QuoteEnd,
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph {
        spans: Vec<Span>,
    },
    ListItem {
        depth: usize,
        marker: Marker,
        spans: Vec<Span>,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Table {
        rows: Vec<TableRow>,
    },
    Rule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Marker {
    Bullet,
    Number(u64),
    Task(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TableRow {
    pub(crate) header: bool,
    pub(crate) cells: Vec<Vec<Span>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SpanStyle {
    pub(crate) emphasis: bool,
    pub(crate) strong: bool,
    pub(crate) code: bool,
    pub(crate) strikethrough: bool,
    pub(crate) link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) text: String,
    pub(crate) style: SpanStyle,
}

#[derive(Clone, Copy, Debug)]
enum Open {
    Heading(u8),
    Paragraph,
    ListItem { depth: usize },
}

#[derive(Default)]
struct TableState {
    rows: Vec<TableRow>,
    cells: Vec<Vec<Span>>,
    cell: Option<Vec<Span>>,
    in_head: bool,
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    open: Option<Open>,
    spans: Vec<Span>,
    marker: Option<Marker>,
    /// Next number for each open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    emphasis: usize,
    strong: usize,
    strikethrough: usize,
    links: Vec<String>,
    code: Option<(Option<String>, String)>,
    table: Option<TableState>,
}

/// Parse markdown into preview blocks, with the same extensions as the HTML
/// export.
pub(crate) fn parse(source: &str) -> Vec<Block> {
    let mut builder = Builder::default();
    for event in firesale_core::markdown::parser(source) {
        builder.event(event);
    }
    builder.finish()
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) => self.push_text(&text, true),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, false),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::FootnoteReference(label) => self.push_text(&format!("[{label}]"), false),
            Event::TaskListMarker(checked) => {
                if self.table.is_none() {
                    self.marker = Some(Marker::Task(checked));
                }
            }
            Event::Rule => self.blocks.push(Block::Rule),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::BlockQuote(_) => {
                self.flush_item();
                self.blocks.push(Block::QuoteStart);
            }
            Tag::List(first) => {
                // Text before a nested list belongs to the parent item.
                self.flush_item();
                self.lists.push(first);
            }
            Tag::Item => {
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let number = *next;
                        *next += 1;
                        Marker::Number(number)
                    }
                    _ => Marker::Bullet,
                };
                self.begin(Open::ListItem {
                    depth: self.lists.len().saturating_sub(1),
                });
                self.marker = Some(marker);
            }
            Tag::Paragraph => {
                if self.open.is_none() {
                    self.begin(Open::Paragraph);
                }
            }
            Tag::Heading { level, .. } => self.begin(Open::Heading(heading_level(level))),
            Tag::FootnoteDefinition(label) => {
                self.begin(Open::Paragraph);
                self.push_text(&format!("[{label}]: "), false);
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.links.push(dest_url.into_string());
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.trim();
                        (!lang.is_empty()).then(|| lang.to_owned())
                    }
                    CodeBlockKind::Indented => None,
                };
                self.close();
                self.code = Some((language, String::new()));
            }
            Tag::Table(_) => self.table = Some(TableState::default()),
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(Vec::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, end: TagEnd) {
        match end {
            TagEnd::BlockQuote(_) => {
                self.flush_item();
                self.blocks.push(Block::QuoteEnd);
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link | TagEnd::Image => {
                self.links.pop();
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.blocks.push(Block::Code { language, code });
                }
            }
            TagEnd::Heading(_) => {
                if matches!(self.open, Some(Open::Heading(_))) {
                    self.close();
                }
            }
            TagEnd::Paragraph | TagEnd::FootnoteDefinition => {
                if matches!(self.open, Some(Open::Paragraph)) {
                    self.close();
                }
            }
            TagEnd::Item | TagEnd::HtmlBlock => self.close(),
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                    // The head has no row tag of its own.
                    let cells = std::mem::take(&mut table.cells);
                    table.rows.push(TableRow { header: true, cells });
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut()
                    && let Some(cell) = table.cell.take()
                {
                    table.cells.push(cell);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let cells = std::mem::take(&mut table.cells);
                    table.rows.push(TableRow {
                        header: table.in_head,
                        cells,
                    });
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(Block::Table { rows: table.rows });
                }
            }
            _ => {}
        }
    }

    fn begin(&mut self, open: Open) {
        if self.table.is_some() {
            return;
        }
        self.close();
        self.open = Some(open);
    }

    fn close(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        match self.open.take() {
            Some(Open::Heading(level)) => self.blocks.push(Block::Heading { level, spans }),
            Some(Open::Paragraph) => self.blocks.push(Block::Paragraph { spans }),
            Some(Open::ListItem { depth }) => self.blocks.push(Block::ListItem {
                depth,
                marker: self.marker.take().unwrap_or(Marker::Bullet),
                spans,
            }),
            None => {}
        }
    }

    fn flush_item(&mut self) {
        if matches!(self.open, Some(Open::ListItem { .. })) {
            self.close();
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        let style = SpanStyle {
            emphasis: !code && self.emphasis > 0,
            strong: !code && self.strong > 0,
            code,
            strikethrough: !code && self.strikethrough > 0,
            link: if code { None } else { self.links.last().cloned() },
        };
        let target = match self.table.as_mut() {
            Some(TableState {
                cell: Some(cell), ..
            }) => cell,
            Some(_) => return,
            None => {
                // Loose text, e.g. after a code block inside a list item.
                self.open.get_or_insert(Open::Paragraph);
                &mut self.spans
            }
        };
        push_span(target, text, style);
    }

    fn finish(mut self) -> Vec<Block> {
        self.close();
        self.blocks
    }
}

fn push_span(spans: &mut Vec<Span>, text: &str, style: SpanStyle) {
    if text.is_empty() {
        return;
    }

    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(Span {
            text: text.to_owned(),
            style,
        }),
    }
}

const fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
