use crate::{parse_length, LabelError, Pt};
use std::io::Read;
use std::path::Path;

/// The geometry of one kind of label stock: how many cells fit on a sheet,
/// how big each cell is, the spacing between cells, and the sheet margins.
/// Cell index 0 is the top-left cell, increasing left-to-right then
/// top-to-bottom; a full sheet holds exactly `across * down` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub brand: String,
    pub number: String,
    pub across: usize,
    pub down: usize,
    pub cell_width: Pt,
    pub cell_height: Pt,
    /// Horizontal spacing between adjacent cells
    pub gap_left: Pt,
    /// Vertical spacing between adjacent cells
    pub gap_top: Pt,
    pub paper_width: Pt,
    pub paper_height: Pt,
    pub margin_left: Pt,
    pub margin_top: Pt,
}

impl LabelSpec {
    /// Look up a label spec by brand and product number in the tab-delimited
    /// label table at `path`. The match is case-insensitive; no match is a
    /// fatal error naming both keys.
    pub fn load<P: AsRef<Path>>(path: P, brand: &str, number: &str) -> Result<LabelSpec, LabelError> {
        let file = std::fs::File::open(path)?;
        LabelSpec::from_reader(file, brand, number)
    }

    /// As [LabelSpec::load], from any reader of tab-delimited rows with a
    /// header line: `brand, number, across, down, width, height, padLeft,
    /// padTop, paperWidth, paperHeight, marginLeft, marginTop`
    pub fn from_reader<R: Read>(reader: R, brand: &str, number: &str) -> Result<LabelSpec, LabelError> {
        let mut table = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        for row in table.records() {
            let row = row?;
            let cell = |i: usize| row.get(i).unwrap_or("");
            if !cell(0).eq_ignore_ascii_case(brand) || !cell(1).eq_ignore_ascii_case(number) {
                continue;
            }

            let count = |i: usize| {
                cell(i)
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| LabelError::BadSpecValue(cell(i).to_string()))
            };

            return Ok(LabelSpec {
                brand: cell(0).to_string(),
                number: cell(1).to_string(),
                across: count(2)?,
                down: count(3)?,
                cell_width: parse_length(cell(4))?,
                cell_height: parse_length(cell(5))?,
                gap_left: parse_length(cell(6))?,
                gap_top: parse_length(cell(7))?,
                paper_width: parse_length(cell(8))?,
                paper_height: parse_length(cell(9))?,
                margin_left: parse_length(cell(10))?,
                margin_top: parse_length(cell(11))?,
            });
        }

        Err(LabelError::SpecNotFound {
            brand: brand.to_string(),
            number: number.to_string(),
        })
    }

    /// How many cells a full sheet holds
    pub fn cells_per_page(&self) -> usize {
        self.across * self.down
    }
}
