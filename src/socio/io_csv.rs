// Primitives for reading CSV files.

use std::io::Read;

use log::debug;
use snafu::prelude::*;

use crate::socio::{
    io_common::{assemble_response, get_col_index_mapping},
    *,
};

pub fn read_csv_responses(path: String, cfs: &FileSource) -> BSocioResult<Vec<SurveyResponse>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    read_csv_records(rdr, cfs, &path)
}

/// Reads the responses from any source of CSV data. `path` is only used for the messages.
pub fn read_csv_records<R: Read>(
    mut rdr: csv::Reader<R>,
    cfs: &FileSource,
    path: &str,
) -> BSocioResult<Vec<SurveyResponse>> {
    let columns = cfs.columns()?;

    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1_u64 })?
        .iter()
        .map(|s| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        })
        .collect();
    debug!("read_csv_records: header: {:?}", header);
    if header.is_empty() {
        return Err(Box::new(SocioError::EmptyFile {
            path: path.to_string(),
        }));
    }
    let col_indexes = get_col_index_mapping(&columns.all_columns(), &header, path)?;

    let mut res: Vec<SurveyResponse> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {
            path,
            lineno: lineno as u64,
        })?;
        debug!("read_csv_records: lineno: {:?} line: {:?}", lineno, line);
        let cells: Vec<Option<String>> = col_indexes
            .iter()
            .map(|(col_idx, _)| line.get(*col_idx).map(|s| s.to_string()))
            .collect();
        if let Some(r) = assemble_response(cells, lineno)? {
            res.push(r);
        }
    }
    Ok(res)
}
