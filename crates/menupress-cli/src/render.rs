//! Plain-text rendering of the packed layouts, for terminal preview and for
//! piping into the print template tooling.

use std::fmt::Write as _;

use menupress_pipeline::layout::{
    FlowerLayout, LayoutTree, Page, PrepackLayout, ProductLine, Section,
};

fn write_section(out: &mut String, section: &Section) {
    let mut header = format!("{} ${}", section.farm, section.price_group);
    if !section.unit_label.is_empty() {
        let _ = write!(header, "  {}", section.unit_label);
    }
    if !section.product_type.is_empty() {
        let _ = write!(header, "  {}", section.product_type);
    }
    let _ = writeln!(out, "{header}");
    for line in &section.lines {
        let _ = writeln!(out, "  {}", format_line(line));
    }
}

fn format_line(line: &ProductLine) -> String {
    match &line.secondary_percent {
        Some(cbd) => format!("{}  {} / {}", line.display_name, line.primary_percent, cbd),
        None => format!("{}  {}", line.display_name, line.primary_percent),
    }
}

fn write_page(out: &mut String, number: usize, page: &Page) {
    match &page.title {
        Some(title) => {
            let _ = writeln!(out, "--- page {number}: {title} ---");
        }
        None => {
            let _ = writeln!(out, "--- page {number} ---");
        }
    }
    for (label, column) in [("left", &page.left), ("right", &page.right)] {
        if column.sections.is_empty() {
            continue;
        }
        let _ = writeln!(out, "[{label}]");
        for section in &column.sections {
            write_section(out, section);
        }
    }
}

/// Renders the two-column product or preroll menu.
#[must_use]
pub fn render_pages(tree: &LayoutTree) -> String {
    if tree.pages.is_empty() {
        return "no products to display\n".to_string();
    }
    let mut out = String::new();
    for (i, page) in tree.pages.iter().enumerate() {
        write_page(&mut out, i + 1, page);
    }
    out
}

/// Renders the flower shelves.
#[must_use]
pub fn render_flower(layout: &FlowerLayout) -> String {
    let mut out = String::new();
    for shelf in &layout.shelves {
        if shelf.pages.is_empty() {
            continue;
        }
        let _ = writeln!(out, "=== {} Shelf ===", shelf.tier.title());
        let _ = writeln!(out, "rec: {}", shelf.tier.rec_prices().join(" | "));
        let _ = writeln!(out, "med: {}", shelf.tier.med_prices().join(" | "));
        for (i, page) in shelf.pages.iter().enumerate() {
            let _ = writeln!(out, "--- page {} ---", i + 1);
            for row in &page.rows {
                let price = if row.price_repeated {
                    String::new()
                } else {
                    row.price_label.clone()
                };
                let mut line = format!(
                    "{:>10}  {} [{}]  {}  THC {}  CBD {}",
                    price, row.strain, row.effect, row.farm, row.thc_percent, row.cbd_cell
                );
                if let Some(sale) = row.sale {
                    let _ = write!(line, "  ({})", sale.label());
                }
                let _ = writeln!(out, "{line}");
            }
        }
    }
    if out.is_empty() {
        out.push_str("no flower to display\n");
    }
    out
}

/// Renders the prepack specials list.
#[must_use]
pub fn render_prepacks(layout: &PrepackLayout) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", layout.title);
    let _ = writeln!(out, "({})", layout.disclaimer);
    for row in &layout.rows {
        let price = if row.price_repeated {
            String::new()
        } else {
            row.price_label.clone()
        };
        let _ = writeln!(
            out,
            "{:>10}  {} [{}]  THC {}  CBD {}",
            price, row.strain, row.effect, row.thc_percent, row.cbd_cell
        );
    }
    if layout.rows.is_empty() {
        out.push_str("no prepacks to display\n");
    }
    out
}
