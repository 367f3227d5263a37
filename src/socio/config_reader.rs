use crate::socio::*;

use snafu::prelude::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_NAME_COLUMN: &str = "Name";
pub const DEFAULT_CHOICE_COLUMNS: [&str; NOMINATION_SLOTS] = ["Choice 1", "Choice 2", "Choice 3"];

pub const DEFAULT_DOCUMENT_NAME: &str = "sociometry_results.docx";
pub const DEFAULT_DIAGRAM_NAME: &str = "sociogram.png";
pub const DEFAULT_TABLE_NAME: &str = "sociometry_results.csv";

// Bounds for the settings of the sociogram picture.
pub const MAX_IMAGE_SIDE: u32 = 10_000;
pub const MAX_NODE_RADIUS: u32 = 500;
pub const MAX_FONT_SIZE: f64 = 200.0;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "surveyDate")]
    pub survey_date: Option<String>,
    #[serde(rename = "surveyGroup")]
    pub survey_group: Option<String>,
    #[serde(rename = "generateDocument")]
    pub generate_document: Option<bool>,
    #[serde(rename = "generateDiagram")]
    pub generate_diagram: Option<bool>,
    #[serde(rename = "generateTable")]
    pub generate_table: Option<bool>,
}

/// The part of the configuration that is written back in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub survey: String,
    pub date: Option<String>,
    pub group: Option<String>,
    pub participants: usize,
    pub nominations: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "choiceColumns")]
    pub choice_columns: Option<Vec<String>>,
}

/// The columns to read in a survey file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnSettings {
    pub name_column: String,
    pub choice_columns: Vec<String>,
}

impl ColumnSettings {
    pub fn new(
        name_column: Option<String>,
        choice_columns: Option<Vec<String>>,
    ) -> SocioResult<ColumnSettings> {
        let choice_columns: Vec<String> = match choice_columns {
            Some(cols) if cols.len() == NOMINATION_SLOTS => cols,
            Some(cols) => {
                whatever!(
                    "exactly {} choice columns are expected, got {}: {:?}",
                    NOMINATION_SLOTS,
                    cols.len(),
                    cols
                )
            }
            None => DEFAULT_CHOICE_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        Ok(ColumnSettings {
            name_column: name_column.unwrap_or_else(|| DEFAULT_NAME_COLUMN.to_string()),
            choice_columns,
        })
    }

    /// All the columns to look for in the header: the name first, then the choices.
    pub fn all_columns(&self) -> Vec<String> {
        let mut res = vec![self.name_column.clone()];
        res.extend(self.choice_columns.iter().cloned());
        res
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Xlsx,
    Csv,
}

impl FileSource {
    pub fn columns(&self) -> SocioResult<ColumnSettings> {
        ColumnSettings::new(self.name_column.clone(), self.choice_columns.clone())
    }

    /// The explicit provider, or the one matching the extension of the file.
    pub fn provider(&self) -> SocioResult<Provider> {
        match self.provider.as_deref() {
            Some("xlsx") | Some("excel") => Ok(Provider::Xlsx),
            Some("csv") => Ok(Provider::Csv),
            Some(x) => whatever!("Provider not implemented {:?}", x),
            None => {
                let lower = self.file_path.to_lowercase();
                if lower.ends_with(".xlsx") || lower.ends_with(".xlsm") {
                    Ok(Provider::Xlsx)
                } else {
                    Ok(Provider::Csv)
                }
            }
        }
    }
}

/// Settings for the sociogram picture.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub seed: u64,
    pub iterations: u32,
    #[serde(rename = "imageSize")]
    pub image_size: (u32, u32),
    #[serde(rename = "nodeRadius")]
    pub node_radius: u32,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            seed: LayoutSettings::DEFAULT.seed,
            iterations: LayoutSettings::DEFAULT.iterations,
            image_size: (1000, 800),
            node_radius: 28,
            font_size: 14.0,
        }
    }
}

impl DiagramSettings {
    /// Rejects the sizes that cannot be drawn.
    pub fn check(&self) -> SocioResult<()> {
        let (width, height) = self.image_size;
        if width == 0 || height == 0 || width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
            whatever!(
                "the image size must be between 1 and {} pixels on each side, got {:?}",
                MAX_IMAGE_SIDE,
                self.image_size
            );
        }
        if self.node_radius == 0 || self.node_radius > MAX_NODE_RADIUS {
            whatever!(
                "the node radius must be between 1 and {} pixels, got {}",
                MAX_NODE_RADIUS,
                self.node_radius
            );
        }
        if !(self.font_size > 0.0 && self.font_size <= MAX_FONT_SIZE) {
            whatever!(
                "the font size must be positive and at most {}, got {}",
                MAX_FONT_SIZE,
                self.font_size
            );
        }
        Ok(())
    }

    pub fn layout(&self) -> LayoutSettings {
        LayoutSettings {
            seed: self.seed,
            iterations: self.iterations,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "surveyFileSources")]
    pub survey_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub diagram: DiagramSettings,
}

impl SurveyConfig {
    /// A configuration for a single file, with all the defaults.
    pub fn for_file(path: &str) -> SurveyConfig {
        SurveyConfig {
            output_settings: OutputSettings {
                survey_name: simplify_file_name(path),
                output_directory: None,
                survey_date: None,
                survey_group: None,
                generate_document: None,
                generate_diagram: None,
                generate_table: None,
            },
            survey_file_sources: vec![FileSource {
                provider: None,
                file_path: path.to_string(),
                excel_worksheet_name: None,
                name_column: None,
                choice_columns: None,
            }],
            diagram: DiagramSettings::default(),
        }
    }
}

pub fn read_config(path: &str) -> BSocioResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: String) -> BSocioResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let js = r#"{
            "outputSettings": {
                "surveyName": "Class 7B",
                "outputDirectory": "out",
                "generateDiagram": true
            },
            "surveyFileSources": [
                {
                    "provider": "xlsx",
                    "filePath": "responses.xlsx",
                    "excelWorksheetName": "Sheet1",
                    "nameColumn": "Nama Siswa",
                    "choiceColumns": ["Pilihan 1", "Pilihan 2", "Pilihan 3"]
                }
            ],
            "diagram": { "seed": 7, "imageSize": [640, 480] }
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.survey_name, "Class 7B");
        assert_eq!(config.output_settings.generate_diagram, Some(true));
        assert_eq!(config.output_settings.generate_document, None);
        let source = &config.survey_file_sources[0];
        assert_eq!(source.provider().unwrap(), Provider::Xlsx);
        let columns = source.columns().unwrap();
        assert_eq!(
            columns.all_columns(),
            vec!["Nama Siswa", "Pilihan 1", "Pilihan 2", "Pilihan 3"]
        );
        assert_eq!(config.diagram.seed, 7);
        assert_eq!(config.diagram.image_size, (640, 480));
        // Not specified: default.
        assert_eq!(config.diagram.iterations, 50);
    }

    #[test]
    fn provider_from_extension() {
        let config = SurveyConfig::for_file("data/Class.XLSX");
        assert_eq!(config.output_settings.survey_name, "Class.XLSX");
        let source = &config.survey_file_sources[0];
        assert_eq!(source.provider().unwrap(), Provider::Xlsx);
        let csv_source = FileSource {
            file_path: "data/class.txt".to_string(),
            ..source.clone()
        };
        assert_eq!(csv_source.provider().unwrap(), Provider::Csv);
        let odd = FileSource {
            provider: Some("ods".to_string()),
            ..source.clone()
        };
        assert!(odd.provider().is_err());
    }

    #[test]
    fn diagram_settings_bounds() {
        assert!(DiagramSettings::default().check().is_ok());
        let js = r#"{ "nodeRadius": 4294967295 }"#;
        let settings: DiagramSettings = serde_json::from_str(js).unwrap();
        assert!(settings.check().is_err());
        for image_size in [(0, 10), (10, 0), (MAX_IMAGE_SIDE + 1, 10), (100_000, 100_000)] {
            let settings = DiagramSettings {
                image_size,
                ..DiagramSettings::default()
            };
            assert!(settings.check().is_err(), "{:?}", image_size);
        }
        for font_size in [0.0, -1.0, f64::NAN, 1000.0] {
            let settings = DiagramSettings {
                font_size,
                ..DiagramSettings::default()
            };
            assert!(settings.check().is_err(), "{:?}", font_size);
        }
    }

    #[test]
    fn default_columns() {
        let columns = ColumnSettings::new(None, None).unwrap();
        assert_eq!(
            columns.all_columns(),
            vec!["Name", "Choice 1", "Choice 2", "Choice 3"]
        );
        assert!(ColumnSettings::new(None, Some(vec!["A".to_string()])).is_err());
    }
}
