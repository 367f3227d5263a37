// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::socio::{
    io_common::{assemble_response, get_col_index_mapping},
    *,
};

pub fn read_excel_responses(path: String, cfs: &FileSource) -> BSocioResult<Vec<SurveyResponse>> {
    let columns = cfs.columns()?;
    let wrange = get_range(&path, cfs)?;

    let header = wrange
        .rows()
        .next()
        .context(EmptyFileSnafu { path: path.clone() })?;
    debug!("read_excel_responses: header: {:?}", header);

    let col_indexes = get_col_index(&columns.all_columns(), header, &path)?;
    debug!("read_excel_responses: col_indexes: {:?}", col_indexes);

    let mut iter = wrange.rows();
    iter.next();
    let empty = DataType::Empty;
    let mut res: Vec<SurveyResponse> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        debug!("read_excel_responses: lineno: {:?} row: {:?}", lineno, row);
        let mut cells: Vec<Option<String>> = Vec::new();
        for (col_idx, _) in col_indexes.iter() {
            // Short rows are padded with empty cells.
            let cell = row.get(*col_idx).unwrap_or(&empty);
            cells.push(read_cell_calamine(cell, lineno)?);
        }
        if let Some(r) = assemble_response(cells, lineno)? {
            res.push(r);
        }
    }
    Ok(res)
}

/// The text of a cell. Numbers are accepted because names may be participant numbers.
fn read_cell_calamine(cell: &DataType, lineno: usize) -> SocioResult<Option<String>> {
    match cell {
        DataType::String(s) if s.is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(format!("{:.0}", f))),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        DataType::Empty => Ok(None),
        _ => Err(SocioError::ExcelWrongCellType {
            lineno: lineno as u64,
            content: format!("{:?}", cell),
        }),
    }
}

fn get_col_index(
    req_col_names: &[String],
    header: &[DataType],
    path: &str,
) -> BSocioResult<Vec<(usize, String)>> {
    let remapped: Vec<Option<String>> = header
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            DataType::Int(i) => Some(i.to_string()),
            DataType::Float(f) => Some(f.to_string()),
            _ => None,
        })
        .collect();
    get_col_index_mapping(req_col_names, &remapped, path)
}

fn get_range(path: &String, cfs: &FileSource) -> BSocioResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path: path.clone(),
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path: path.clone() })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(SocioError::EmptyWorkbook { path: path.clone() })),
            // Without a name, the first worksheet is read.
            [(worksheet_name, wrange), ..] => {
                debug!(
                    "get_range: path: {:?} worksheet: {:?} (first of {})",
                    &path,
                    &worksheet_name,
                    all_worksheets.len()
                );
                Ok(wrange.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cells() {
        assert_eq!(
            read_cell_calamine(&DataType::String("Anna".to_string()), 2).unwrap(),
            Some("Anna".to_string())
        );
        assert_eq!(
            read_cell_calamine(&DataType::String("".to_string()), 2).unwrap(),
            None
        );
        assert_eq!(read_cell_calamine(&DataType::Empty, 2).unwrap(), None);
        assert_eq!(
            read_cell_calamine(&DataType::Float(12.0), 2).unwrap(),
            Some("12".to_string())
        );
        assert_eq!(
            read_cell_calamine(&DataType::Int(7), 2).unwrap(),
            Some("7".to_string())
        );
        assert_eq!(
            read_cell_calamine(&DataType::Float(1.5), 2).unwrap(),
            Some("1.5".to_string())
        );
    }

    #[test]
    fn rejects_dates() {
        let err = read_cell_calamine(&DataType::DateTime(44000.0), 5).unwrap_err();
        assert!(matches!(err, SocioError::ExcelWrongCellType { lineno: 5, .. }));
    }

    #[test]
    fn header_cells_as_text() {
        let header = vec![
            DataType::String("Name".to_string()),
            DataType::Empty,
            DataType::String("Choice 1".to_string()),
        ];
        let m = get_col_index(
            &["Choice 1".to_string(), "Name".to_string()],
            &header,
            "f.xlsx",
        )
        .unwrap();
        assert_eq!(m, vec![(2, "Choice 1".to_string()), (0, "Name".to_string())]);
    }

    fn sheet_xml(rows: &[&[&str]]) -> String {
        let mut xml = String::from("<worksheet><sheetData>");
        for (i, row) in rows.iter().enumerate() {
            xml.push_str(&format!("<row r=\"{}\">", i + 1));
            for (j, text) in row.iter().enumerate() {
                let cell = format!("{}{}", (b'A' + j as u8) as char, i + 1);
                xml.push_str(&format!(
                    "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    cell, text
                ));
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }

    // A workbook with the survey in "Data" and some instructions in "Help".
    fn write_two_sheet_workbook(path: &std::path::Path) {
        use std::io::Write;
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        let workbook = concat!(
            "<workbook><sheets>",
            "<sheet name=\"Data\" sheetId=\"1\" r:id=\"rId1\"/>",
            "<sheet name=\"Help\" sheetId=\"2\" r:id=\"rId2\"/>",
            "</sheets></workbook>"
        );
        let rels = concat!(
            "<Relationships>",
            "<Relationship Id=\"rId1\" Target=\"worksheets/sheet1.xml\"/>",
            "<Relationship Id=\"rId2\" Target=\"worksheets/sheet2.xml\"/>",
            "</Relationships>"
        );
        let data = sheet_xml(&[
            &["Name", "Choice 1", "Choice 2", "Choice 3"],
            &["Anna", "Ben", "", ""],
            &["Ben", "Anna", "", ""],
        ]);
        let help = sheet_xml(&[&["Instructions"], &["Choose up to three classmates."]]);
        let parts = [
            ("xl/workbook.xml", workbook.to_string()),
            ("xl/_rels/workbook.xml.rels", rels.to_string()),
            ("xl/worksheets/sheet1.xml", data),
            ("xl/worksheets/sheet2.xml", help),
        ];
        for (name, content) in parts.iter() {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn first_worksheet_by_default() {
        let path = std::env::temp_dir().join("sociogram_io_excel_two_sheets.xlsx");
        write_two_sheet_workbook(&path);
        let path_s = path.to_string_lossy().to_string();
        let cfs = SurveyConfig::for_file(&path_s).survey_file_sources[0].clone();
        assert_eq!(cfs.excel_worksheet_name, None);
        let responses = read_excel_responses(path_s.clone(), &cfs).unwrap();
        let names: Vec<&str> = responses.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Anna", "Ben"]);
        assert_eq!(responses[0].choices[0], Some("Ben".to_string()));

        // The instructions sheet has no survey columns.
        let help = FileSource {
            excel_worksheet_name: Some("Help".to_string()),
            ..cfs.clone()
        };
        let err = read_excel_responses(path_s.clone(), &help).unwrap_err();
        assert!(matches!(*err, SocioError::CannotFindColumnInHeader { .. }));

        let missing = FileSource {
            excel_worksheet_name: Some("Sheet9".to_string()),
            ..cfs
        };
        let err = read_excel_responses(path_s, &missing).unwrap_err();
        assert!(matches!(*err, SocioError::MissingWorksheet { .. }));
    }

    #[test]
    fn missing_workbook() {
        let cfs = SurveyConfig::for_file("/nonexistent/survey.xlsx").survey_file_sources[0].clone();
        let err = read_excel_responses("/nonexistent/survey.xlsx".to_string(), &cfs).unwrap_err();
        assert!(matches!(*err, SocioError::OpeningExcel { .. }));
    }
}
