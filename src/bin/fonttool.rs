extern crate rlefont;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use rlefont::{header, raster, rle, table, util};

const GLYPHS_PER_ROW: u32 = 16;

#[derive(Subcommand)]
enum CliCommand {
    /// Generate C font headers
    Generate {
        /// Output directory
        out_dir: PathBuf,
        /// Input TrueType fonts
        fonts: Vec<PathBuf>,
    },
    /// Decode the glyph tables back into BMP contact sheets
    Draw {
        /// Output directory
        out_dir: PathBuf,
        /// Input TrueType fonts
        fonts: Vec<PathBuf>,
    },
    /// Print one glyph as text
    Show {
        /// Input TrueType font
        font: PathBuf,
        /// Pixel size
        size: u32,
        /// Character to show
        ch: char,
    },
}

/// Converts TrueType fonts into run-length encoded bitmap tables
#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    /// Pixel sizes to generate
    #[clap(long, value_delimiter = ',', default_values_t = [20, 22, 24, 28, 32, 48])]
    sizes: Vec<u32>,
    #[command(subcommand)]
    command: CliCommand,
}

// The file stem doubles as the C symbol prefix, so it has to be an identifier
fn font_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("font path {} has no usable file name", path.display()))?;
    let mut chars = stem.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        },
        None => false,
    };
    if !valid {
        return Err(anyhow!("font name '{}' cannot be used as a C identifier", stem));
    }
    Ok(stem.to_string())
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read font {}", path.display()))
}

fn generate(out_dir: &Path, fonts: &[PathBuf], sizes: &[u32]) -> Result<usize> {
    let mut total_memory = 0;
    for font_path in fonts {
        let name = font_name(font_path)?;
        let font_data = read_font(font_path)?;
        for &size in sizes {
            let raster = raster::Rasterizer::new(&font_data, size)?;
            let table = table::GlyphTable::new(&raster);
            let out_file = out_dir.join(format!("{}{}.h", name, size));
            fs::write(&out_file, header::font_header(&name, &table))
                .with_context(|| format!("cannot write {}", out_file.display()))?;
            log::info!("{}: {} columns, {}x{} pixels, {} bytes",
                out_file.display(), table.columns, table.width, table.height, table.memory_usage());
            total_memory += table.memory_usage();
        }
    }
    let struct_file = out_dir.join("FontStruct.h");
    fs::write(&struct_file, header::shared_header(total_memory))
        .with_context(|| format!("cannot write {}", struct_file.display()))?;
    Ok(total_memory)
}

// Lays the decoded glyphs of one table out on a contact sheet, 16 per row.
// What ends up in the image is the run-length data, not the rasterizer
// output, so broken encoding is visible immediately.
fn contact_sheet(table: &table::GlyphTable) -> (u32, u32, Vec<u8>) {
    let rows_needed = (table.rows.len() as u32).div_ceil(GLYPHS_PER_ROW);
    let sheet_width = GLYPHS_PER_ROW * table.width;
    let sheet_height = rows_needed * table.height;
    let mut sheet = vec![0u8; (sheet_width * sheet_height) as usize];
    for (n, row) in table.rows.iter().enumerate() {
        let pixels = (table.width * table.height) as usize;
        let glyph = rle::expand(row, 0, pixels);
        let base_x = (n as u32 % GLYPHS_PER_ROW) * table.width;
        let base_y = (n as u32 / GLYPHS_PER_ROW) * table.height;
        for y in 0..table.height {
            for x in 0..table.width {
                let bit = glyph[(y * table.width + x) as usize];
                sheet[((base_y + y) * sheet_width + base_x + x) as usize] = bit;
            }
        }
    }
    (sheet_width, sheet_height, sheet)
}

fn draw(out_dir: &Path, fonts: &[PathBuf], sizes: &[u32]) -> Result<()> {
    for font_path in fonts {
        let name = font_name(font_path)?;
        let font_data = read_font(font_path)?;
        for &size in sizes {
            let raster = raster::Rasterizer::new(&font_data, size)?;
            let table = table::GlyphTable::new(&raster);
            if table.width == 0 {
                log::warn!("{}{}: empty glyphs, nothing to draw", name, size);
                continue;
            }
            let (sheet_width, sheet_height, sheet) = contact_sheet(&table);
            let out_file = out_dir.join(format!("{}{}.bmp", name, size));
            let fname = out_file
                .to_str()
                .with_context(|| format!("output path {} is not valid UTF-8", out_file.display()))?;
            util::render_bitmap(fname, sheet_width, sheet_height, &sheet)?;
            log::info!("wrote {}", out_file.display());
        }
    }
    Ok(())
}

fn show(font_path: &Path, size: u32, ch: char) -> Result<()> {
    let font_data = read_font(font_path)?;
    let raster = raster::Rasterizer::new(&font_data, size)?;
    let bitmap = raster.glyph(ch);
    if bitmap.width == 0 {
        log::warn!("glyph is zero pixels wide, nothing to show");
        return Ok(());
    }
    let runs: Vec<u32> = rle::Runs::new(&bitmap.bits).collect();
    // Round-trip through the encoding so the printout shows what a consumer
    // of the table would reconstruct
    let first = bitmap.bits.first().copied().unwrap_or(0);
    let bits = rle::expand(&runs, first, bitmap.bits.len());
    for row in bits.chunks(bitmap.width as usize) {
        let line: String = row.iter().map(|&b| if b != 0 { '#' } else { '.' }).collect();
        println!("{}", line);
    }
    Ok(())
}


fn main() -> Result<()> {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match &args.command {
        CliCommand::Generate { out_dir, fonts } => {
            let total_memory = generate(out_dir, fonts, &args.sizes)?;
            println!("Total memory usage: {} bytes", total_memory);
        },
        CliCommand::Draw { out_dir, fonts } => {
            draw(out_dir, fonts, &args.sizes)?;
        },
        CliCommand::Show { font, size, ch } => {
            show(font, *size, *ch)?;
        },
    }
    Ok(())
}
