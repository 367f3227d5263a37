// The result table as CSV and as text, and the empty survey template.

use std::fmt::Write as FmtWrite;

use snafu::prelude::*;

use crate::socio::*;

pub const TABLE_HEADER: [&str; 4] = ["Rank", "Name", "Score", "Interpretation"];

pub fn render_result_table_csv(rows: &[ScoreRow]) -> SocioResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(TABLE_HEADER).context(CsvWriteSnafu {})?;
        for row in rows.iter() {
            wtr.write_record([
                row.rank.to_string().as_str(),
                row.name.as_str(),
                row.score.to_string().as_str(),
                row.interpretation(),
            ])
            .context(CsvWriteSnafu {})?;
        }
        wtr.flush().context(CsvFlushSnafu {})?;
    }
    Ok(buf)
}

/// A header line with the expected columns, to be filled in by the participants.
pub fn render_survey_template(columns: &ColumnSettings) -> SocioResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(columns.all_columns())
            .context(CsvWriteSnafu {})?;
        wtr.flush().context(CsvFlushSnafu {})?;
    }
    Ok(buf)
}

/// The table aligned for display in a terminal.
pub fn format_table(rows: &[ScoreRow]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.rank.to_string(),
                r.name.clone(),
                r.score.to_string(),
                r.interpretation().to_string(),
            ]
        })
        .collect();
    let mut widths: [usize; 4] = [0; 4];
    for (i, h) in TABLE_HEADER.iter().enumerate() {
        widths[i] = h.chars().count();
    }
    for line in cells.iter() {
        for (i, c) in line.iter().enumerate() {
            widths[i] = widths[i].max(c.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TABLE_HEADER.iter().map(|s| s.to_string()).collect();
    write_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, &rule, &widths);
    for line in cells.iter() {
        write_line(&mut out, line, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, c) in cells.iter().enumerate() {
        let pad = widths[i].saturating_sub(c.chars().count());
        // Numbers are right-aligned.
        if i == 0 || i == 2 {
            let _ = write!(line, "{}{}", " ".repeat(pad), c);
        } else {
            let _ = write!(line, "{}{}", c, " ".repeat(pad));
        }
        if i + 1 < cells.len() {
            line.push_str("  ");
        }
    }
    let _ = writeln!(out, "{}", line.trim_end());
}
