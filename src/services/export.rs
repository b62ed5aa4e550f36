//! PDF export of a stored trip.
//!
//! Layout is a simple top-to-bottom flow on US Letter pages using the
//! built-in Helvetica faces, so no font files ship with the binary. Widths
//! are measured with an average-glyph estimate, which is good enough for
//! wrapping prose and table cells.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt, Rgb,
};
use tracing::debug;

use crate::{
    error::AppError,
    models::trip::Trip,
    services::dashboard::DashboardView,
};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 30.0;
const PRINTABLE_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;
const CELL_PADDING: f32 = 4.0;
const GLYPH_WIDTH: f32 = 0.5;
const BOLD_GLYPH_WIDTH: f32 = 0.56;

const DISTRIBUTION_COLUMNS: [f32; 4] = [90.0, 70.0, 80.0, 180.0];
const DISTRIBUTION_HEADER: [&str; 4] = ["Category", "Percentage (%)", "Estimated Cost", "Suggestions"];
const DAY_COLUMNS: [f32; 8] = [40.0, 60.0, 60.0, 40.0, 50.0, 50.0, 60.0, 120.0];
const DAY_HEADER: [&str; 8] = [
    "Day",
    "Estimated Spend",
    "Accommodation",
    "Food",
    "Transport",
    "Activities",
    "Miscellaneous",
    "Recommendations",
];

#[derive(Clone, Copy)]
enum Style {
    Title,
    Heading2,
    Heading3,
    Normal,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Style::Title => 18.0,
            Style::Heading2 => 14.0,
            Style::Heading3 => 12.0,
            Style::Normal => 10.0,
        }
    }

    fn bold(self) -> bool {
        !matches!(self, Style::Normal)
    }
}

fn mm(pt: f32) -> Mm {
    Mm::from(Pt(pt))
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Builds the PDF for `trip` and returns its bytes.
pub fn render_pdf(trip: &Trip) -> Result<Vec<u8>, AppError> {
    let view = DashboardView::from_trip(trip);
    let mut pdf = PdfWriter::new(&format!("Trip to {}", trip.destination))?;

    pdf.paragraph(&format!("Trip to {}", trip.destination), Style::Title);
    pdf.space(12.0);

    let summary = &view.summary;
    pdf.paragraph("Trip Summary", Style::Heading2);
    pdf.space(6.0);
    let mut summary_lines = vec![
        format!("Destination: {}", summary.destination),
        format!("Dates: {} ({} days)", summary.dates, summary.day_count),
        format!("Travelers: {}", summary.travelers),
        format!("Budget: {}", summary.budget),
        format!("Mood: {}", summary.mood),
    ];
    if !trip.preferences_text().is_empty() {
        summary_lines.push(format!("Preferences: {}", trip.preferences_text()));
    }
    if !summary.overall_theme.is_empty() {
        summary_lines.push(format!("Overall Theme: {}", summary.overall_theme));
    }
    pdf.paragraph(&summary_lines.join("\n"), Style::Normal);
    pdf.space(12.0);

    if !view.trending.is_empty() {
        pdf.paragraph("Trending Places", Style::Heading2);
        pdf.space(6.0);
        let items: Vec<String> = view
            .trending
            .iter()
            .map(|place| {
                format!(
                    "{}: {} (Rating: {})",
                    place.place, place.description, place.rating
                )
            })
            .collect();
        pdf.bullets(&items);
        pdf.space(12.0);
    }

    if let Some(risk) = &view.risk {
        pdf.paragraph("Risk Alert", Style::Heading2);
        pdf.space(6.0);
        pdf.paragraph(&format!("Level: {}\n{}", risk.level, risk.details), Style::Normal);
        pdf.space(12.0);
    }

    if let Some(crowd) = &view.crowd {
        pdf.paragraph("Crowd Forecast", Style::Heading2);
        pdf.space(6.0);
        pdf.paragraph(&format!("Level: {}\n{}", crowd.level, crowd.reason), Style::Normal);
        pdf.space(12.0);
    }

    if !view.hotels.is_empty() {
        pdf.paragraph("Hotel Recommendations", Style::Heading2);
        pdf.space(6.0);
        let items: Vec<String> = view
            .hotels
            .iter()
            .map(|hotel| {
                format!(
                    "{}: {}, Rating: {} - {}",
                    hotel.name, hotel.price_range, hotel.rating, hotel.highlight
                )
            })
            .collect();
        pdf.bullets(&items);
        pdf.space(12.0);
    }

    if !view.daily_plan.is_empty() {
        pdf.paragraph("Daily Plan", Style::Heading2);
        pdf.space(6.0);
        for day in &view.daily_plan {
            pdf.paragraph(&day.day, Style::Heading3);
            pdf.space(6.0);
            pdf.paragraph(&day.activities, Style::Normal);
            pdf.space(6.0);
        }
        pdf.space(12.0);
    }

    if !view.insights.is_empty() {
        pdf.paragraph("Quick Insights", Style::Heading2);
        pdf.space(6.0);
        pdf.bullets(&view.insights);
        pdf.space(12.0);
    }

    if !view.notes.is_empty() {
        pdf.paragraph("Important Notes", Style::Heading2);
        pdf.space(6.0);
        pdf.bullets(&view.notes);
        pdf.space(12.0);
    }

    pdf.paragraph("Budget Tracking", Style::Heading2);
    pdf.space(6.0);
    if !view.budget_overview.is_empty() {
        pdf.paragraph(&format!("Overview: {}", view.budget_overview), Style::Normal);
        pdf.space(6.0);
    }
    let rows: Vec<Vec<String>> = view
        .budget_rows
        .iter()
        .map(|row| {
            vec![
                row.category.clone(),
                row.percentage.clone(),
                row.cost.clone(),
                row.suggestion.clone(),
            ]
        })
        .collect();
    pdf.table(&DISTRIBUTION_COLUMNS, &DISTRIBUTION_HEADER, &rows, 12.0);
    pdf.space(12.0);
    if !view.optimization_tips.is_empty() {
        pdf.paragraph("Optimization Tips", Style::Heading3);
        pdf.space(6.0);
        pdf.bullets(&view.optimization_tips);
        pdf.space(12.0);
    }

    if !view.daily_budget.is_empty() {
        pdf.paragraph("Day-wise Budget Tracing", Style::Heading2);
        pdf.space(6.0);
        let rows: Vec<Vec<String>> = view
            .daily_budget
            .iter()
            .map(|day| {
                let mut cells = vec![day.day.clone(), day.estimated_spend.clone()];
                cells.extend(day.amounts.iter().cloned());
                cells.push(day.recommendations.clone());
                cells
            })
            .collect();
        pdf.table(&DAY_COLUMNS, &DAY_HEADER, &rows, 10.0);
        pdf.space(12.0);
    }

    debug!(trip_id = trip.id, pages = pdf.pages, "render_pdf: done");
    pdf.finish()
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the cursor from the bottom edge, in points.
    y: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(fold_text(title), mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| AppError::Pdf(err.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| AppError::Pdf(err.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc
            .save_to_bytes()
            .map_err(|err| AppError::Pdf(err.to_string()))
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        self.y -= height;
        if self.y < MARGIN {
            self.new_page();
        }
    }

    fn text(&self, text: &str, size: f32, bold: bool, x: f32, baseline: f32) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, mm(x), mm(baseline), font);
    }

    fn paragraph(&mut self, text: &str, style: Style) {
        self.indented(text, style, 0.0, None);
    }

    fn bullets(&mut self, items: &[String]) {
        for item in items {
            self.indented(item, Style::Normal, 10.0, Some("-"));
            self.space(6.0);
        }
    }

    fn indented(&mut self, text: &str, style: Style, indent: f32, marker: Option<&str>) {
        let size = style.size();
        let leading = size * 1.2;
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
        let lines = wrap(&fold_text(text), width, size, style.bold());
        for (i, line) in lines.iter().enumerate() {
            self.ensure_space(leading);
            self.y -= leading;
            let baseline = self.y + size * 0.25;
            if i == 0 {
                if let Some(marker) = marker {
                    self.text(marker, size, false, MARGIN, baseline);
                }
            }
            self.text(line, size, style.bold(), MARGIN + indent, baseline);
        }
    }

    fn table(&mut self, widths: &[f32], header: &[&str], rows: &[Vec<String>], header_size: f32) {
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        let size = Style::Normal.size();
        // a body row must fit on a fresh page below the repeated header
        let header_height = row_height(widths, &header, header_size, true, usize::MAX);
        let max_lines = lines_fitting(PRINTABLE_HEIGHT - header_height, size);

        self.table_row(widths, &header, header_size, true, usize::MAX);
        for row in rows {
            let height = row_height(widths, row, size, false, max_lines);
            if self.y - height < MARGIN {
                self.new_page();
                self.table_row(widths, &header, header_size, true, usize::MAX);
            }
            self.table_row(widths, row, size, false, max_lines);
        }
    }

    fn table_row(
        &mut self,
        widths: &[f32],
        cells: &[String],
        size: f32,
        bold: bool,
        max_lines: usize,
    ) {
        let height = row_height(widths, cells, size, bold, max_lines);
        self.ensure_space(height);
        let top = self.y;
        let bottom = top - height;
        let leading = size * 1.2;
        let table_width: f32 = widths.iter().sum();

        self.layer.set_fill_color(if bold {
            rgb(0.3, 0.3, 0.3)
        } else {
            rgb(0.0, 0.0, 0.0)
        });
        let mut x = MARGIN;
        for (width, cell) in widths.iter().zip(cells) {
            let mut baseline = top - CELL_PADDING - size;
            for line in cell_lines(cell, width - 2.0 * CELL_PADDING, size, bold, max_lines) {
                self.text(&line, size, bold, x + CELL_PADDING, baseline);
                baseline -= leading;
            }
            x += width;
        }
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));

        self.layer.set_outline_color(rgb(0.0, 0.0, 0.0));
        self.layer.set_outline_thickness(if bold { 1.5 } else { 1.0 });
        self.rule(MARGIN, top, MARGIN + table_width, top);
        self.rule(MARGIN, bottom, MARGIN + table_width, bottom);
        let mut x = MARGIN;
        self.rule(x, top, x, bottom);
        for width in widths {
            x += width;
            self.rule(x, top, x, bottom);
        }

        self.y = bottom;
    }

    fn rule(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x1), mm(y1)), false),
                (Point::new(mm(x2), mm(y2)), false),
            ],
            is_closed: false,
        });
    }
}

fn row_height(widths: &[f32], cells: &[String], size: f32, bold: bool, max_lines: usize) -> f32 {
    let lines = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| {
            cell_lines(cell, width - 2.0 * CELL_PADDING, size, bold, max_lines).len()
        })
        .max()
        .unwrap_or(1)
        .max(1);
    let extra = if bold { 8.0 } else { 0.0 };
    lines as f32 * size * 1.2 + 2.0 * CELL_PADDING + extra
}

/// How many lines of `size` text fit in a cell of height `available`.
fn lines_fitting(available: f32, size: f32) -> usize {
    (((available - 2.0 * CELL_PADDING) / (size * 1.2)).floor() as usize).max(1)
}

/// Wrapped lines of one table cell, cut to `max_lines` with a trailing
/// ellipsis.
fn cell_lines(text: &str, width: f32, size: f32, bold: bool, max_lines: usize) -> Vec<String> {
    let mut lines = wrap(&fold_text(text), width, size, bold);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        let glyph = size * if bold { BOLD_GLYPH_WIDTH } else { GLYPH_WIDTH };
        let max_chars = ((width / glyph).floor() as usize).max(1);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(max_chars.saturating_sub(3)).collect();
            *last = format!("{}...", kept.trim_end());
        }
    }
    lines
}

/// Greedy word wrap against an estimated glyph width. Words longer than a
/// line are split.
fn wrap(text: &str, width: f32, size: f32, bold: bool) -> Vec<String> {
    let glyph = size * if bold { BOLD_GLYPH_WIDTH } else { GLYPH_WIDTH };
    let max_chars = ((width / glyph).floor() as usize).max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(split);
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// The built-in PDF fonts only cover a Latin charset; fold common
/// typography and accents to ASCII and replace anything else.
fn fold_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            c if c.is_ascii() => out.push(c),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{00B7}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{20AC}' => out.push_str("EUR"),
            '\u{00A3}' => out.push_str("GBP"),
            '\u{00A5}' => out.push_str("JPY"),
            '\u{20B9}' => out.push_str("INR"),
            other => out.push_str(fold_letter(other)),
        }
    }
    out
}

fn fold_letter(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'è' | 'é' | 'ê' | 'ë' | 'ē' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ç' => "c",
        'Ç' => "C",
        'ñ' => "n",
        'Ñ' => "N",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'ý' | 'ÿ' => "y",
        _ => "?",
    }
}
