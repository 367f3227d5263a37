// Word (.docx) document with the table of results.
//
// A docx file is a zip package of XML parts. Only the parts that Word requires are written.

use std::io::{Cursor, Seek, Write};

use serde::Serialize;
use snafu::prelude::*;
use tera::{Context, Tera};

use crate::socio::*;

pub const DOCUMENT_TITLE: &str = "Sociometry Results and Interpretation";
pub const DOCUMENT_HEADER: [&str; 3] = ["Name", "Score", "Interpretation"];

// Column widths, in twentieths of a point.
const COLUMN_WIDTHS: [u32; 3] = [3500, 1200, 4300];

// (template name, path in the package)
const PACKAGE_PARTS: [(&str, &str); 3] = [
    ("docx/content_types.xml", "[Content_Types].xml"),
    ("docx/rels.xml", "_rels/.rels"),
    ("docx/document.xml", "word/document.xml"),
];

#[derive(Debug, Serialize)]
struct DocumentCell {
    text: String,
    width: u32,
}

#[derive(Debug, Serialize)]
struct DocumentRow {
    header: bool,
    cells: Vec<DocumentCell>,
}

#[derive(Debug, Serialize)]
struct DocumentData<'a> {
    title: &'a str,
    subtitle: Option<&'a str>,
    widths: Vec<u32>,
    rows: Vec<DocumentRow>,
}

fn document_templates() -> SocioResult<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            "docx/content_types.xml",
            include_str!("templates/docx/content_types.xml"),
        ),
        ("docx/rels.xml", include_str!("templates/docx/rels.xml")),
        ("docx/document.xml", include_str!("templates/docx/document.xml")),
    ])
    .context(DocumentTemplateSnafu {})?;
    tera.autoescape_on(vec![".xml"]);
    Ok(tera)
}

fn document_row(cells: [&str; 3], header: bool) -> DocumentRow {
    DocumentRow {
        header,
        cells: cells
            .iter()
            .zip(COLUMN_WIDTHS)
            .map(|(text, width)| DocumentCell {
                text: text.to_string(),
                width,
            })
            .collect(),
    }
}

fn document_data<'a>(rows: &[ScoreRow], subtitle: Option<&'a str>) -> DocumentData<'a> {
    let mut doc_rows = vec![document_row(DOCUMENT_HEADER, true)];
    for row in rows.iter() {
        let score = row.score.to_string();
        doc_rows.push(document_row(
            [row.name.as_str(), score.as_str(), row.interpretation()],
            false,
        ));
    }
    DocumentData {
        title: DOCUMENT_TITLE,
        subtitle,
        widths: COLUMN_WIDTHS.to_vec(),
        rows: doc_rows,
    }
}

pub fn render_result_document(rows: &[ScoreRow], subtitle: Option<&str>) -> SocioResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_result_document(rows, subtitle, &mut cursor)?;
    Ok(cursor.into_inner())
}

pub fn write_result_document<W>(
    rows: &[ScoreRow],
    subtitle: Option<&str>,
    writer: W,
) -> SocioResult<()>
where
    W: Write + Seek,
{
    let tera = document_templates()?;
    let context =
        Context::from_serialize(document_data(rows, subtitle)).context(DocumentTemplateSnafu {})?;

    let mut zip = zip::ZipWriter::new(writer);
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (template, part) in PACKAGE_PARTS {
        let xml = tera
            .render(template, &context)
            .context(DocumentTemplateSnafu {})?;
        zip.start_file(part, options).context(DocumentZipSnafu {})?;
        zip.write_all(xml.as_bytes())
            .context(DocumentWriteSnafu {})?;
    }

    // Dropping the writer would also finish the archive, but silently.
    zip.finish().context(DocumentZipSnafu {})?;
    Ok(())
}
