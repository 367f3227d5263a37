/*!

This is the long-form manual for `sociometry` and `sociogram`.

## The survey

Every participant (for example every student of a class) answers the same question,
such as "Who would you like to work with?", by writing down up to three names. The
answers are collected in a spreadsheet with one row per participant:

| Name  | Choice 1 | Choice 2 | Choice 3 |
|-------|----------|----------|----------|
| Anna  | Bob      | Clara    |          |
| Bob   | Anna     |          |          |
| Clara | Anna     | Bob      | Dan      |
| Dan   |          |          |          |

Other columns (timestamps, e-mail addresses, ...) are ignored. The names of the columns
can be changed with the `--name-column` and `--choices` flags.

Run `sociogram --template template.csv` to get an empty file with the expected header.

## Scoring

The score of a participant is the number of times their name was written in a choice
column. Names must match exactly: `anna` or `Anna ` (with a trailing space) do not count
for `Anna`. Such names are reported as dropped nominations in the logs and in the
summary. A participant may choose themselves; this counts like any other choice.

Each score is then interpreted:

| score | interpretation                        | colour in the sociogram |
|-------|---------------------------------------|-------------------------|
| 0     | Isolated — needs special attention    | red                     |
| 1-2   | Limited social — needs encouragement  | orange                  |
| 3-5   | Adequately social                     | yellow                  |
| 6-9   | Popular — well liked                  | green                   |
| 10+   | Very popular — potential facilitator  | green                   |

The result table is sorted by decreasing score. Participants with the same score keep the
order of the input file.

## Input formats

### `xlsx`

An Excel workbook. If the workbook has more than one worksheet, the name of the worksheet
must be given with `--excel-worksheet-name`. Numbers are read as text (`12.0` is `12`).

### `csv`

Comma separated values. The first row is the header.

When `--input-type` is not given, the format is deduced from the file extension.

## Outputs

```bash
sociogram -i responses.xlsx --document results.docx --diagram sociogram.png --table results.csv
```

- `--document`: a Word document with the table of results.
- `--diagram`: the sociogram, as a PNG image. Every arrow goes from the participant who made
  the choice to the participant who was chosen. Nodes are labelled with their rank in the
  table. The placement of the nodes is random but reproducible: change it with `--seed`.
- `--table`: the table of results, as CSV.
- `--out`: a JSON summary of the results (`stdout` to print it).
- `--reference`: a JSON summary to compare against. The run fails if the results differ.

The table is always printed on the terminal, unless the summary is printed there.

## Configuration

Instead of flags, a JSON configuration file can be passed with `--config`. Paths in the
file are relative to the configuration file. Flags given on the command line take
precedence.

```json
{
  "outputSettings": {
    "surveyName": "Class 7B",
    "surveyDate": "2024-09-01",
    "surveyGroup": "7B",
    "outputDirectory": "out",
    "generateDocument": true,
    "generateDiagram": true,
    "generateTable": false
  },
  "surveyFileSources": [
    {
      "provider": "xlsx",
      "filePath": "responses.xlsx",
      "excelWorksheetName": "Sheet1",
      "nameColumn": "Name",
      "choiceColumns": ["Choice 1", "Choice 2", "Choice 3"]
    }
  ],
  "diagram": {
    "seed": 42,
    "iterations": 50,
    "imageSize": [1000, 800],
    "nodeRadius": 28,
    "fontSize": 14.0
  }
}
```

Several file sources are read one after the other, as if they were one file.
With `outputDirectory`, the `generate*` options write `sociometry_results.docx`,
`sociogram.png` and `sociometry_results.csv` in that directory.

 */
