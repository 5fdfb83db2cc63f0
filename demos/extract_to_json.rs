use std::env;
use std::path::Path;
use std::time::Instant;

use workbook_extractor_mcp::{ServerConfig, process_excel_content, read_workbook_file};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Error: File path required");
        eprintln!("\nUsage: {} <file_path>", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} workpapers.xlsm", args[0]);
        eprintln!("  {} spreadsheet.xlsx > spreadsheet.json", args[0]);
        std::process::exit(1);
    }

    let file_path = &args[1];
    if !Path::new(file_path).exists() {
        eprintln!("Error: File '{}' not found", file_path);
        std::process::exit(1);
    }

    let config = ServerConfig::from_env();
    let (file_name, bytes) = read_workbook_file(file_path, config.max_file_size_bytes)?;
    eprintln!("Processing file: {} ({:.2} MB)", file_name, bytes.len() as f64 / 1_048_576.0);

    let start = Instant::now();
    let document = process_excel_content(&bytes, &file_name)?;
    eprintln!(
        "Extracted {} visible sheets, {} cells in {:?}",
        document.metadata.total_sheets,
        document.cell_count(),
        start.elapsed()
    );

    println!("{}", document.to_json_pretty()?);
    Ok(())
}
