use std::collections::HashMap;
use std::path::Path;

use log::debug;
use snafu::prelude::*;

use crate::socio::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Given the header of a file (names of each of the columns), and the names of the required columns,
/// finds the mapping from each required column to a column index position.
pub fn get_col_index_mapping(
    req_col_names: &[String],
    header: &[Option<String>],
    path: &str,
) -> BSocioResult<Vec<(usize, String)>> {
    let mut col_names: HashMap<String, usize> = HashMap::new();
    for (idx, x) in header.iter().enumerate() {
        if let Some(s) = x {
            // The first column wins if a header is duplicated.
            col_names.entry(s.clone()).or_insert(idx);
        }
    }

    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<(usize, String)> = Vec::new();
    for cname in req_col_names {
        let idx = col_names
            .get(cname)
            .context(CannotFindColumnInHeaderSnafu {
                column_name: cname,
                path,
            })?;
        col_indexes.push((*idx, cname.clone()));
    }
    Ok(col_indexes)
}

/// Assembles a response from the cells of one row: the name first, then the choices.
///
/// Rows that are completely empty are skipped (None).
pub fn assemble_response(
    cells: Vec<Option<String>>,
    lineno: usize,
) -> BSocioResult<Option<SurveyResponse>> {
    let mut iter = cells.into_iter();
    let name: Option<String> = iter.next().flatten().filter(|s| !s.is_empty());
    let choices: Vec<Option<String>> = iter.map(|c| c.filter(|s| !s.is_empty())).collect();
    match name {
        Some(name) => Ok(Some(SurveyResponse { name, choices })),
        None if choices.iter().all(|c| c.is_none()) => {
            debug!("assemble_response: skipping empty line {}", lineno);
            Ok(None)
        }
        None => Err(Box::new(SocioError::MissingParticipantName {
            lineno: lineno as u64,
        })),
    }
}
