use egui::text::{LayoutJob, TextFormat};

use crate::parse::{Block, Marker, Span};

const INDENT: f32 = 12.0;

pub(crate) fn show(ui: &mut egui::Ui, blocks: &[Block]) {
    let mut quote_depth: usize = 0;

    for (index, block) in blocks.iter().enumerate() {
        match block {
            Block::QuoteStart => quote_depth += 1,
            Block::QuoteEnd => quote_depth = quote_depth.saturating_sub(1),
            _ => with_quote(ui, quote_depth, |ui| show_block(ui, index, block)),
        }
    }
}

fn show_block(ui: &mut egui::Ui, index: usize, block: &Block) {
    match block {
        Block::Heading { level, spans } => {
            let font = heading_font(ui, *level);
            spans_label(ui, spans, font);
            ui.add_space(4.0);
        }
        Block::Paragraph { spans } => {
            spans_label(ui, spans, body_font(ui));
            ui.add_space(6.0);
        }
        Block::ListItem {
            depth,
            marker,
            spans,
        } => {
            let font = body_font(ui);
            ui.horizontal_wrapped(|ui| {
                ui.add_space(*depth as f32 * INDENT);
                match marker {
                    Marker::Bullet => {
                        ui.label("•");
                    }
                    Marker::Number(n) => {
                        ui.label(format!("{n}."));
                    }
                    Marker::Task(checked) => {
                        let mut checked = *checked;
                        ui.add_enabled(false, egui::Checkbox::new(&mut checked, ""));
                    }
                }
                spans_label(ui, spans, font);
            });
            ui.add_space(4.0);
        }
        Block::Code { language, code } => {
            if let Some(lang) = language.as_deref() {
                ui.label(egui::RichText::new(lang).weak());
            }
            egui::Frame::group(ui.style())
                .fill(ui.visuals().faint_bg_color)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new(code).monospace())
                            .wrap()
                            .selectable(true),
                    );
                });
            ui.add_space(6.0);
        }
        Block::Table { rows } => {
            let font = body_font(ui);
            let columns = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);

            egui::Grid::new(ui.id().with(("table", index)))
                .striped(true)
                .show(ui, |ui| {
                    for row in rows {
                        for cell in &row.cells {
                            let mut job = layout_job(ui, cell, font.clone());
                            if row.header {
                                for section in &mut job.sections {
                                    section.format.color = ui.visuals().strong_text_color();
                                    section.format.underline =
                                        egui::Stroke::new(1.0, ui.visuals().weak_text_color());
                                }
                            }
                            ui.add(egui::Label::new(job).wrap());
                        }
                        for _ in row.cells.len()..columns {
                            ui.label("");
                        }
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
        }
        Block::Rule => {
            ui.separator();
            ui.add_space(6.0);
        }
        Block::QuoteStart | Block::QuoteEnd => {}
    }
}

fn with_quote(ui: &mut egui::Ui, depth: usize, add_contents: impl FnOnce(&mut egui::Ui)) {
    if depth == 0 {
        add_contents(ui);
        return;
    }

    ui.horizontal(|ui| {
        ui.add_space((depth - 1) as f32 * INDENT);
        ui.colored_label(ui.visuals().weak_text_color(), "|");
        ui.add_space(4.0);
        ui.vertical(add_contents);
    });
}

/// A wrapped label; clicking it follows its first link.
fn spans_label(ui: &mut egui::Ui, spans: &[Span], font: egui::FontId) {
    let job = layout_job(ui, spans, font);
    let link = spans.iter().find_map(|span| span.style.link.as_deref());

    let Some(link) = link else {
        ui.add(egui::Label::new(job).wrap());
        return;
    };
    let response = ui
        .add(egui::Label::new(job).wrap().sense(egui::Sense::click()))
        .on_hover_text(link)
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        ui.ctx().open_url(egui::OpenUrl::new_tab(link));
    }
}

fn body_font(ui: &egui::Ui) -> egui::FontId {
    ui.style()
        .text_styles
        .get(&egui::TextStyle::Body)
        .cloned()
        .unwrap_or_else(|| egui::FontId::proportional(16.0))
}

fn heading_font(ui: &egui::Ui, level: u8) -> egui::FontId {
    let base = ui
        .style()
        .text_styles
        .get(&egui::TextStyle::Heading)
        .cloned()
        .unwrap_or_else(|| egui::FontId::proportional(22.0));

    let scale = match level {
        1 => 1.30,
        2 => 1.15,
        3 => 1.05,
        _ => 1.0,
    };
    egui::FontId {
        size: base.size * scale,
        family: base.family,
    }
}

fn layout_job(ui: &egui::Ui, spans: &[Span], base_font: egui::FontId) -> LayoutJob {
    let mut job = LayoutJob::default();
    let visuals = ui.visuals();

    for span in spans {
        let font_id = if span.style.code {
            egui::FontId::monospace(base_font.size * 0.9)
        } else {
            base_font.clone()
        };
        let mut format = TextFormat {
            font_id,
            color: if span.style.strong {
                visuals.strong_text_color()
            } else {
                visuals.text_color()
            },
            italics: span.style.emphasis,
            ..Default::default()
        };

        if span.style.code {
            format.background = visuals.code_bg_color;
        }
        if span.style.strikethrough {
            format.strikethrough = egui::Stroke::new(1.0, format.color);
        }
        if span.style.link.is_some() {
            format.color = visuals.hyperlink_color;
            format.underline = egui::Stroke::new(1.0, visuals.hyperlink_color);
        }

        job.append(&span.text, 0.0, format);
    }

    job
}
