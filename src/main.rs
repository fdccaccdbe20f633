use clap::Parser;
use label_gen::{
    format_address, load_country_rules, load_font, parse_length, AddressRecord, FieldMapping,
    LabelError, LabelSheet, LabelSpec, Pt,
};
use std::path::PathBuf;

/// Print addresses from a tab-separated file onto sheets of adhesive labels
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Brand of the address labels
    #[arg(short, long, default_value = "Avery")]
    brand: String,

    /// Country to not add to labels, and to assume for addresses without one
    #[arg(short, long, default_value = "USA")]
    country: String,

    /// Draw a box around each label
    #[arg(short, long)]
    drawbox: bool,

    /// Font for the label text: a built-in PDF font name, or the name of a
    /// .ttf/.ttc/.otf file without its extension
    #[arg(short, long, default_value = "Times-Roman")]
    font: String,

    /// Tab-separated file with the addresses to print
    #[arg(short, long, default_value = "address.tsv")]
    input: PathBuf,

    /// Tab-separated file with the label stock definitions
    #[arg(short, long, default_value = "labels.tsv")]
    labels: PathBuf,

    /// JSON file mapping input column names to address fields
    #[arg(short, long, default_value = "mappings.json")]
    mappings: PathBuf,

    /// Label product number to print on
    #[arg(short, long, default_value = "5160")]
    number: String,

    /// PDF file the labels are written to
    #[arg(short, long, default_value = "labels.pdf")]
    output: PathBuf,

    /// Extra padding inside each label, as a length ("4", "2mm", "0.1in")
    #[arg(short, long, default_value = "4")]
    padding: String,

    /// JSON file with the per-country address formats
    #[arg(long, default_value = "countries.json")]
    countries: PathBuf,
}

/// Font sizes to try for each label, largest first
const FONT_SIZES: [Pt; 3] = [Pt(16.0), Pt(14.0), Pt(12.0)];

fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), LabelError> {
    let spec = LabelSpec::load(&args.labels, &args.brand, &args.number)?;
    let rules = load_country_rules(&args.countries)?;
    let mapping = FieldMapping::load(&args.mappings)?;
    let padding = parse_length(&args.padding)?;
    let font = load_font(&args.font);

    let mut sheet = LabelSheet::new(spec, font, FONT_SIZES.to_vec(), padding, args.drawbox);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(&args.input)?;
    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|column| mapping.canonical(column))
        .collect();

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                log::warn!("skipping unreadable row: {err}");
                continue;
            }
        };
        let record = AddressRecord::from_row(&header, &row);
        match format_address(&record, &rules, &args.country) {
            Ok(Some(lines)) => sheet.place(lines),
            Ok(None) => {}
            Err(err) => log::error!("skipping {}: {err}", record.name),
        }
    }

    let out = std::fs::File::create(&args.output)?;
    let summary = sheet.finish(out)?;
    println!("Total {} labels, on {} pages.", summary.labels, summary.pages);

    Ok(())
}
