use jobtrack_store::Record;
use jobtrack_store::types::HEADER;

/// Render records as an aligned text table, with each row's position in
/// the first column.
pub fn render_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "No applications recorded.\n".to_string();
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
    rows.push(
        std::iter::once("#")
            .chain(HEADER)
            .map(str::to_string)
            .collect(),
    );
    for (position, record) in records.iter().enumerate() {
        let mut row = vec![position.to_string()];
        row.extend(record.fields().into_iter().map(single_line));
        rows.push(row);
    }

    let mut widths = vec![0usize; HEADER.len() + 1];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render one record as `field: value` lines, for confirmations.
pub fn render_record(position: usize, record: &Record) -> String {
    let mut out = format!("Application at position {position}:\n");
    for (name, value) in HEADER.iter().zip(record.fields()) {
        out.push_str(&format!("  {name}: {}\n", single_line(value)));
    }
    out
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
