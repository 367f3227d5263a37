use clap::Parser;

/// This is a scoring program for sociometric (peer nomination) surveys.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the survey: input files, columns and outputs.
    /// See the manual of the sociometry crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of a survey in JSON format. If provided,
    /// the program will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the survey will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the survey responses. Setting this option overrides the
    /// files that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. By default, it is deduced from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. Only required when
    /// the workbook has several worksheets.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 'Name') The header of the column with the name of each participant.
    #[clap(long, value_parser)]
    pub name_column: Option<String>,

    /// (exactly 3 values, default 'Choice 1', 'Choice 2', 'Choice 3') The headers of the columns
    /// with the nominations, in order.
    #[clap(long, value_parser)]
    pub choices: Option<Vec<String>>,

    /// (file path) Writes the results as a Word document (.docx).
    #[clap(long, value_parser)]
    pub document: Option<String>,

    /// (file path) Writes the sociogram as a PNG image.
    #[clap(long, value_parser)]
    pub diagram: Option<String>,

    /// (file path) Writes the table of results as CSV.
    #[clap(long, value_parser)]
    pub table: Option<String>,

    /// (default 42) The seed for the placement of the nodes in the sociogram.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (file path) Writes an empty survey file (CSV) with the expected columns, and exits.
    #[clap(long, value_parser)]
    pub template: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
