use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::model::FieldEntry;

/// Name of the first column, holding the PDF filename of each row.
pub const FILENAME_COLUMN: &str = "filename";

/// Column that receives a form field literally named `filename`.
pub const RENAMED_FILENAME_FIELD: &str = "filename (form field)";

/// Something the builder had to decide on while merging fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableWarning {
    /// Two fields of one file landed in the same column; the first value was
    /// kept. `field` names the column.
    DuplicateField {
        filename: String,
        field: String,
        dropped_value: String,
    },
    /// A field collided with the reserved filename column and was stored
    /// under [`RENAMED_FILENAME_FIELD`].
    ReservedName { filename: String, field: String },
}

impl fmt::Display for TableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableWarning::DuplicateField {
                filename,
                field,
                dropped_value,
            } => write!(
                f,
                "{filename}: field '{field}' appears more than once, ignoring value '{dropped_value}'"
            ),
            TableWarning::ReservedName { filename, field } => write!(
                f,
                "{filename}: field '{field}' clashes with the filename column, stored as '{RENAMED_FILENAME_FIELD}'"
            ),
        }
    }
}

/// A rectangular table: one row per PDF, one column per distinct field name.
///
/// Columns keep the order in which they were first seen, `filename` first.
/// Every column holds exactly `row_count()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTable {
    columns: IndexMap<String, Vec<String>>,
    rows: usize,
    warnings: Vec<TableWarning>,
}

impl FieldTable {
    /// Column names in output order.
    pub fn header(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Decisions taken while merging, in the order they happened.
    pub fn warnings(&self) -> &[TableWarning] {
        &self.warnings
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.rows {
            return None;
        }
        Some(
            self.columns
                .values()
                .map(|cells| cells[index].as_str())
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.rows).filter_map(move |i| self.row(i))
    }

    /// The table as a plain grid: row 0 is the header, then one row per file.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows + 1);
        grid.push(self.columns.keys().cloned().collect());
        for row in self.rows() {
            grid.push(row.into_iter().map(str::to_string).collect());
        }
        grid
    }
}

/// Builds a [`FieldTable`] one file at a time.
///
/// Columns are created lazily the first time a name is seen and padded with
/// empty cells for every earlier row. `finish` pads columns that stopped
/// receiving values before the last file.
#[derive(Debug)]
pub struct TableBuilder {
    columns: IndexMap<String, Vec<String>>,
    rows: usize,
    warnings: Vec<TableWarning>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut columns = IndexMap::new();
        columns.insert(FILENAME_COLUMN.to_string(), Vec::new());
        Self {
            columns,
            rows: 0,
            warnings: Vec::new(),
        }
    }

    /// Append one row for `filename` holding its fields.
    pub fn push_file(&mut self, filename: &str, fields: &[FieldEntry]) {
        let row = self.rows;
        self.columns[FILENAME_COLUMN].push(filename.to_string());

        for entry in fields {
            let column_name = if entry.name == FILENAME_COLUMN {
                let warning = TableWarning::ReservedName {
                    filename: filename.to_string(),
                    field: entry.name.clone(),
                };
                warn!("{warning}");
                self.warnings.push(warning);
                RENAMED_FILENAME_FIELD
            } else {
                entry.name.as_str()
            };

            let cells = self.columns.entry(column_name.to_string()).or_default();
            if cells.len() > row {
                let warning = TableWarning::DuplicateField {
                    filename: filename.to_string(),
                    field: column_name.to_string(),
                    dropped_value: entry.value.clone(),
                };
                warn!("{warning}");
                self.warnings.push(warning);
                continue;
            }
            cells.resize(row, String::new());
            cells.push(entry.value.clone());
        }

        self.rows += 1;
    }

    pub fn finish(mut self) -> FieldTable {
        for cells in self.columns.values_mut() {
            cells.resize(self.rows, String::new());
        }
        debug_assert!(self.columns.values().all(|c| c.len() == self.rows));

        FieldTable {
            columns: self.columns,
            rows: self.rows,
            warnings: self.warnings,
        }
    }
}

/// Merge per-file field lists into one table, one row per entry of `files`
/// in the given order. A file missing from `fields` gets a row with only its
/// filename.
pub fn build_table(files: &[String], fields: &HashMap<String, Vec<FieldEntry>>) -> FieldTable {
    let mut builder = TableBuilder::new();
    for filename in files {
        let entries = fields.get(filename).map(Vec::as_slice).unwrap_or(&[]);
        builder.push_file(filename, entries);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(files: &[(&str, &[(&str, &str)])]) -> (Vec<String>, HashMap<String, Vec<FieldEntry>>) {
        let names = files.iter().map(|(f, _)| f.to_string()).collect();
        let fields = files
            .iter()
            .map(|(f, entries)| {
                (
                    f.to_string(),
                    entries
                        .iter()
                        .map(|(n, v)| FieldEntry::new(*n, *v))
                        .collect(),
                )
            })
            .collect();
        (names, fields)
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_second_file_adds_column() {
        let (files, fields) = input(&[
            ("a.pdf", &[("Name", "Alice")]),
            ("b.pdf", &[("Name", "Bob"), ("Age", "30")]),
        ]);
        let table = build_table(&files, &fields);
        assert_eq!(
            table.to_grid(),
            grid(&[
                &["filename", "Name", "Age"],
                &["a.pdf", "Alice", ""],
                &["b.pdf", "Bob", "30"],
            ])
        );
        assert!(table.warnings().is_empty());
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let table = build_table(&[], &HashMap::new());
        assert_eq!(table.to_grid(), grid(&[&["filename"]]));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_trailing_rows_are_padded() {
        let (files, fields) = input(&[
            ("a.pdf", &[("Name", "Alice"), ("Pet", "cat")]),
            ("b.pdf", &[("Name", "Bob")]),
            ("c.pdf", &[("Name", "Carol")]),
        ]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column("Pet").unwrap(), ["cat", "", ""]);
        assert_eq!(
            table.to_grid(),
            grid(&[
                &["filename", "Name", "Pet"],
                &["a.pdf", "Alice", "cat"],
                &["b.pdf", "Bob", ""],
                &["c.pdf", "Carol", ""],
            ])
        );
    }

    #[test]
    fn test_gap_in_the_middle() {
        let (files, fields) = input(&[
            ("a.pdf", &[("Pet", "cat")]),
            ("b.pdf", &[]),
            ("c.pdf", &[("Pet", "dog")]),
        ]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column("Pet").unwrap(), ["cat", "", "dog"]);
    }

    #[test]
    fn test_disjoint_fields_shape() {
        let (files, fields) = input(&[
            ("a.pdf", &[("A1", "1"), ("A2", "2")]),
            ("b.pdf", &[("B1", "3")]),
            ("c.pdf", &[("C1", "4"), ("C2", "5"), ("C3", "6")]),
        ]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column_count(), 1 + 6);
        assert_eq!(table.to_grid().len(), 1 + 3);
        assert_eq!(
            table.header(),
            ["filename", "A1", "A2", "B1", "C1", "C2", "C3"]
        );
        // Each row holds its own fields only.
        let set_cells: usize = table
            .rows()
            .map(|r| r.iter().skip(1).filter(|c| !c.is_empty()).count())
            .sum();
        assert_eq!(set_cells, 6);
        for row in table.rows() {
            assert_eq!(row.len(), table.column_count());
        }
    }

    #[test]
    fn test_first_seen_order_follows_file_order() {
        let (files, fields) = input(&[
            ("a.pdf", &[("Zeta", "1")]),
            ("b.pdf", &[("Alpha", "2"), ("Zeta", "3")]),
        ]);
        let table = build_table(&files, &fields);
        assert_eq!(table.header(), ["filename", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_duplicate_field_keeps_first() {
        let (files, fields) = input(&[("a.pdf", &[("Name", "first"), ("Name", "second")])]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column("Name").unwrap(), ["first"]);
        assert_eq!(
            table.warnings(),
            [TableWarning::DuplicateField {
                filename: "a.pdf".into(),
                field: "Name".into(),
                dropped_value: "second".into(),
            }]
        );
    }

    #[test]
    fn test_filename_field_does_not_clobber_column() {
        let (files, fields) = input(&[("a.pdf", &[("filename", "scan-001")])]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column(FILENAME_COLUMN).unwrap(), ["a.pdf"]);
        assert_eq!(table.column(RENAMED_FILENAME_FIELD).unwrap(), ["scan-001"]);
        assert_eq!(table.warnings().len(), 1);
    }

    #[test]
    fn test_renamed_filename_field_collision_names_the_column() {
        let (files, fields) = input(&[(
            "a.pdf",
            &[("filename", "scan-001"), (RENAMED_FILENAME_FIELD, "other")],
        )]);
        let table = build_table(&files, &fields);
        assert_eq!(table.column(RENAMED_FILENAME_FIELD).unwrap(), ["scan-001"]);
        assert_eq!(
            table.warnings()[1],
            TableWarning::DuplicateField {
                filename: "a.pdf".into(),
                field: RENAMED_FILENAME_FIELD.into(),
                dropped_value: "other".into(),
            }
        );
    }

    #[test]
    fn test_file_without_entry_gets_filename_row() {
        let files = vec!["only.pdf".to_string()];
        let table = build_table(&files, &HashMap::new());
        assert_eq!(table.to_grid(), grid(&[&["filename"], &["only.pdf"]]));
    }

    #[test]
    fn test_building_twice_is_identical() {
        let (files, fields) = input(&[
            ("a.pdf", &[("x", "1"), ("y", "2")]),
            ("b.pdf", &[("y", "3"), ("z", "4")]),
        ]);
        assert_eq!(build_table(&files, &fields), build_table(&files, &fields));
    }

    #[test]
    fn test_row_out_of_range() {
        let table = build_table(&[], &HashMap::new());
        assert!(table.row(0).is_none());
    }
}
