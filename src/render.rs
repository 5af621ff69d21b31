//! Document rendering for extracted table data
//!
//! Converts records (or plain strings) into a spreadsheet file or a report
//! file with a summary section and a table, writing the result into a
//! scratch directory under a unique filename.

use crate::error::{AccordError, Result};
use crate::extract::{field_text, Record, TableData};

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
use uuid::Uuid;

/// Backing format of a generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// An `.xlsx` workbook
    Spreadsheet,
    /// A `.docx` report
    Report,
}

impl DocumentFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Spreadsheet => "xlsx",
            DocumentFormat::Report => "docx",
        }
    }
}

/// Renders table data into document files
pub struct DocumentRenderer {
    workdir: PathBuf,
}

/// Capitalize a field name for a header cell: first character uppercased,
/// the rest lowercased
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Header names taken from the first record, in its field order
fn header_names(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

/// Materialize records into the cell grid both writers consume: one row
/// per record, one cell per header, missing fields as empty strings
fn record_rows(records: &[Record], headers: &[String]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| headers.iter().map(|name| field_text(record, name)).collect())
        .collect()
}

impl DocumentRenderer {
    /// Create a renderer writing into the given scratch directory
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Render table data into a file and return its path
    ///
    /// The filename is `roadmap_{uuid}.{ext}`; collisions are not a concern
    /// at single-process scale.
    pub fn render(
        &self,
        format: DocumentFormat,
        data: &TableData,
        summary: &str,
    ) -> Result<PathBuf> {
        let bytes = match format {
            DocumentFormat::Spreadsheet => render_spreadsheet(data)?,
            DocumentFormat::Report => render_report(data, summary)?,
        };

        let filename = format!("roadmap_{}.{}", Uuid::new_v4(), format.extension());
        let path = self.workdir.join(filename);
        std::fs::create_dir_all(&self.workdir).map_err(AccordError::Io)?;
        std::fs::write(&path, bytes).map_err(AccordError::Io)?;

        tracing::info!("Rendered {:?} document at {}", format, path.display());
        Ok(path)
    }
}

/// Render an `.xlsx` workbook with a single "Plan" sheet
fn render_spreadsheet(data: &TableData) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Plan")
        .map_err(|e| AccordError::Render(e.to_string()))?;

    match data {
        TableData::Records(records) => {
            let headers = header_names(records);
            for (col, name) in headers.iter().enumerate() {
                worksheet
                    .write_string(0, col as u16, &capitalize(name))
                    .map_err(|e| AccordError::Render(e.to_string()))?;
            }
            for (row, cells) in record_rows(records, &headers).iter().enumerate() {
                for (col, cell) in cells.iter().enumerate() {
                    worksheet
                        .write_string(row as u32 + 1, col as u16, cell)
                        .map_err(|e| AccordError::Render(e.to_string()))?;
                }
            }
        }
        TableData::Items(items) => {
            worksheet
                .write_string(0, 0, "Items")
                .map_err(|e| AccordError::Render(e.to_string()))?;
            for (row, item) in items.iter().enumerate() {
                worksheet
                    .write_string(row as u32 + 1, 0, item)
                    .map_err(|e| AccordError::Render(e.to_string()))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AccordError::Render(e.to_string()).into())
}

/// Render a `.docx` report with the fixed skeleton: title, Summary,
/// Details, and a grid table when the data is records
fn render_report(data: &TableData, summary: &str) -> Result<Vec<u8>> {
    let mut docx = Docx::new();

    docx = docx.add_paragraph(
        Paragraph::new().add_run(Run::new().add_text("Project Plan / Roadmap").size(32).bold()),
    );

    docx = docx
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Summary").size(28).bold()))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(summary).size(22)));

    docx = docx
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Details").size(28).bold()));

    if let TableData::Records(records) = data {
        if !records.is_empty() {
            let headers = header_names(records);

            let mut rows = Vec::with_capacity(records.len() + 1);
            let header_cells = headers
                .iter()
                .map(|name| {
                    TableCell::new().add_paragraph(
                        Paragraph::new()
                            .add_run(Run::new().add_text(capitalize(name)).bold()),
                    )
                })
                .collect::<Vec<TableCell>>();
            rows.push(TableRow::new(header_cells));

            for cells in record_rows(records, &headers) {
                let row_cells = cells
                    .into_iter()
                    .map(|cell| {
                        TableCell::new()
                            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(cell)))
                    })
                    .collect::<Vec<TableCell>>();
                rows.push(TableRow::new(row_cells));
            }

            docx = docx.add_table(Table::new(rows));
        }
    }

    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| AccordError::Render(e.to_string()))?;
    Ok(bytes)
}
