use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use sociometry::graph::Sociogram;
use sociometry::layout::{spring_layout, LayoutSettings};
use sociometry::*;

use crate::args::Args;
use crate::socio::config_reader::*;
use crate::socio::io_common::simplify_file_name;
use crate::socio::render_diagram::render_sociogram_png;
use crate::socio::render_document::render_result_document;
use crate::socio::render_table::*;

pub mod config_reader;
pub mod io_common;
mod io_csv;
mod io_excel;
mod render_diagram;
mod render_document;
mod render_table;

#[derive(Debug, Snafu)]
pub enum SocioError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("Cannot find worksheet {name:?} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The file {path} is empty"))]
    EmptyFile { path: String },
    #[snafu(display("Cannot find column {column_name:?} in the header of {path}"))]
    CannotFindColumnInHeader { column_name: String, path: String },
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Line {lineno}: nominations are given but the participant name is empty"))]
    MissingParticipantName { lineno: u64 },

    #[snafu(display("Error opening file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error writing CSV data: {source}"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error writing CSV data: {source}"))]
    CsvFlush { source: std::io::Error },

    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("No survey file: use --input or --config"))]
    NoInput {},

    #[snafu(display("Invalid survey: {source}"))]
    Scoring { source: SociometryErrors },

    #[snafu(display("Error creating the document: {source}"))]
    DocumentTemplate { source: tera::Error },
    #[snafu(display("Error creating the document: {source}"))]
    DocumentZip { source: zip::result::ZipError },
    #[snafu(display("Error creating the document: {source}"))]
    DocumentWrite { source: std::io::Error },
    #[snafu(display("Error drawing the sociogram: {message}"))]
    Drawing { message: String },
    #[snafu(display("Error drawing the sociogram: the image buffer has the wrong size"))]
    ImageBuffer {},
    #[snafu(display("Error encoding the sociogram: {source}"))]
    EncodingImage { source: image::ImageError },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SocioResult<T> = Result<T, SocioError>;
pub type BSocioResult<T> = Result<T, Box<SocioError>>;

// Where the summary goes.
#[derive(Eq, PartialEq, Debug, Clone)]
enum SummaryOutput {
    Stdout,
    File(PathBuf),
}

/// The artifacts requested for one run.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
struct OutputPaths {
    document: Option<PathBuf>,
    diagram: Option<PathBuf>,
    table: Option<PathBuf>,
    summary: Option<SummaryOutput>,
}

fn results_to_json(rows: &[ScoreRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|r| {
            json!({
                "rank": r.rank,
                "name": r.name,
                "score": r.score,
                "interpretation": r.interpretation()
            })
        })
        .collect()
}

fn nominations_to_json(result: &SociometryResult) -> (Vec<JSValue>, Vec<JSValue>) {
    let nominations = result
        .nominations
        .iter()
        .map(|n| json!({"from": n.nominator, "to": n.nominee, "slot": n.slot}))
        .collect();
    let dropped = result
        .dropped_nominations
        .iter()
        .map(|d| json!({"from": d.nominator, "value": d.value, "slot": d.slot}))
        .collect();
    (nominations, dropped)
}

fn build_summary_js(config: &SurveyConfig, result: &SociometryResult) -> JSValue {
    let c = OutputConfig {
        survey: config.output_settings.survey_name.clone(),
        date: config.output_settings.survey_date.clone(),
        group: config.output_settings.survey_group.clone(),
        participants: result.table.len(),
        nominations: result.total_nominations(),
    };
    let (nominations, dropped) = nominations_to_json(result);
    json!({
        "config": c,
        "results": results_to_json(&result.table),
        "nominations": nominations,
        "droppedNominations": dropped
    })
}

// The line under the title of the document: name, group and date of the survey.
fn document_subtitle(settings: &OutputSettings) -> String {
    let mut parts: Vec<String> = vec![settings.survey_name.clone()];
    for x in [&settings.survey_group, &settings.survey_date].into_iter().flatten() {
        if !x.is_empty() {
            parts.push(x.clone());
        }
    }
    parts.join(", ")
}

fn read_survey_data(root_path: &Path, cfs: &FileSource) -> BSocioResult<Vec<SurveyResponse>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read survey file {:?}", p2);
    match cfs.provider()? {
        Provider::Xlsx => io_excel::read_excel_responses(p2, cfs),
        Provider::Csv => io_csv::read_csv_responses(p2, cfs),
    }
}

/// The command line takes precedence over the configuration file.
fn apply_overrides(mut config: SurveyConfig, args: &Args) -> SurveyConfig {
    if let Some(input) = &args.input {
        let source = SurveyConfig::for_file(input).survey_file_sources;
        config.survey_file_sources = source;
    }
    for cfs in config.survey_file_sources.iter_mut() {
        if args.input_type.is_some() {
            cfs.provider = args.input_type.clone();
        }
        if args.excel_worksheet_name.is_some() {
            cfs.excel_worksheet_name = args.excel_worksheet_name.clone();
        }
        if args.name_column.is_some() {
            cfs.name_column = args.name_column.clone();
        }
        if args.choices.is_some() {
            cfs.choice_columns = args.choices.clone();
        }
    }
    if let Some(seed) = args.seed {
        config.diagram.seed = seed;
    }
    config
}

fn output_paths(config: &SurveyConfig, root_path: &Path, args: &Args) -> OutputPaths {
    let settings = &config.output_settings;
    let out_dir = root_path.join(settings.output_directory.clone().unwrap_or_default());
    let pick = |arg: &Option<String>, generate: Option<bool>, default_name: &str| match arg {
        Some(p) => Some(PathBuf::from(p)),
        None if generate.unwrap_or(false) => Some(out_dir.join(default_name)),
        None => None,
    };
    OutputPaths {
        document: pick(&args.document, settings.generate_document, DEFAULT_DOCUMENT_NAME),
        diagram: pick(&args.diagram, settings.generate_diagram, DEFAULT_DIAGRAM_NAME),
        table: pick(&args.table, settings.generate_table, DEFAULT_TABLE_NAME),
        summary: match args.out.as_deref() {
            Some("stdout") => Some(SummaryOutput::Stdout),
            Some("") | None => None,
            Some(p) => Some(SummaryOutput::File(PathBuf::from(p))),
        },
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> BSocioResult<()> {
    let path_s = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    fs::write(path, bytes).context(WritingOutputSnafu { path: path_s.clone() })?;
    info!("Written {}", path_s);
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> BSocioResult<()> {
    let summary_ref = read_summary(reference_path.to_string())?;
    debug!("check_reference: summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return Err(Box::new(SocioError::ReferenceMismatch {
            path: reference_path.to_string(),
        }));
    }
    Ok(())
}

fn run_survey(
    config: &SurveyConfig,
    root_path: &Path,
    outputs: &OutputPaths,
    check_summary_path: Option<&str>,
) -> BSocioResult<()> {
    if config.survey_file_sources.is_empty() {
        return Err(Box::new(SocioError::NoInput {}));
    }

    let mut data: Vec<SurveyResponse> = Vec::new();
    for cfs in config.survey_file_sources.iter() {
        let mut file_data = read_survey_data(root_path, cfs)?;
        data.append(&mut file_data);
    }
    debug!("run_survey: data: {:?}", data);

    let result = run_sociometry(&data).context(ScoringSnafu {})?;
    info!(
        "run_survey: {} participants, {} nominations, {} dropped",
        result.table.len(),
        result.total_nominations(),
        result.dropped_nominations.len()
    );

    let result_js = build_summary_js(config, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        check_reference(summary_p, &pretty_js_stats)?;
    }

    // Nothing is written until every artifact is rendered.
    let mut artifacts: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    if let Some(p) = &outputs.document {
        let subtitle = document_subtitle(&config.output_settings);
        let bytes = render_result_document(&result.table, Some(subtitle.as_str()))?;
        artifacts.push((p.clone(), bytes));
    }
    if let Some(p) = &outputs.diagram {
        let graph = Sociogram::from_result(&result);
        let bytes = render_sociogram_png(&graph, &config.diagram)?;
        artifacts.push((p.clone(), bytes));
    }
    if let Some(p) = &outputs.table {
        artifacts.push((p.clone(), render_result_table_csv(&result.table)?));
    }
    if let Some(SummaryOutput::File(p)) = &outputs.summary {
        artifacts.push((p.clone(), pretty_js_stats.clone().into_bytes()));
    }

    for (p, bytes) in artifacts.iter() {
        write_output(p, bytes)?;
    }

    match outputs.summary {
        Some(SummaryOutput::Stdout) => println!("{}", pretty_js_stats),
        _ => print!("{}", format_table(&result.table)),
    }
    Ok(())
}

pub fn run(args: &Args) -> BSocioResult<()> {
    if let Some(template_p) = &args.template {
        let columns = ColumnSettings::new(args.name_column.clone(), args.choices.clone())?;
        let bytes = render_survey_template(&columns)?;
        return write_output(Path::new(template_p), &bytes);
    }

    let (config, root_p) = match (&args.config, &args.input) {
        // Files given on the command line are relative to the current directory.
        (_, Some(input)) => {
            let config = match &args.config {
                Some(config_path) => read_config(config_path)?,
                None => SurveyConfig::for_file(input),
            };
            (config, PathBuf::new())
        }
        (Some(config_path), None) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (config, root_p)
        }
        (None, None) => return Err(Box::new(SocioError::NoInput {})),
    };
    let config = apply_overrides(config, args);
    info!("config: {:?}", config);
    config.diagram.check()?;

    let outputs = output_paths(&config, &root_p, args);
    debug!("run: outputs: {:?}", outputs);
    run_survey(&config, &root_p, &outputs, args.reference.as_deref())
}
