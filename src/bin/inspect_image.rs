/// Decodes an image written by `turmite` back into color indices
/// and prints how many cells hold each index.
///
/// Usage: inspect_image <image.png> [palette_size]

use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;
use turmite::palette::Palette;
use turmite::render::{decode_grid, read_png};

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!(usage(&args));
    }

    let path = Path::new(&args[1]);
    let palette_size: usize = match args.get(2) {
        Some(s) => s.parse().with_context(|| format!("invalid palette size {:?}", s))?,
        None => 256,
    };

    let palette = Palette::new(palette_size)?;
    let image = read_png(path).with_context(|| format!("reading {}", path.display()))?;
    let grid = decode_grid(&image, &palette)
        .with_context(|| format!("decoding {} with a {}-color palette", path.display(), palette_size))?;

    println!("=== {} ({}x{}, {} colors) ===", path.display(), grid.width, grid.height, palette_size);
    let (cx, cy) = grid.center();
    println!("Center ({}, {}): index {}", cx, cy, grid.get(cx, cy)?);

    let histogram = grid.histogram(palette_size);
    let visited: u64 = histogram.iter().skip(1).sum();
    println!("Cells not at index 0: {}", visited);
    for (index, count) in histogram.iter().enumerate() {
        if *count > 0 {
            println!("  {:3} {:>8}  ({})", index, count, palette.rule(index as u8).symbol());
        }
    }

    Ok(())
}

fn usage(args: &[String]) -> String {
    let program = args.first().map(String::as_str).unwrap_or("inspect_image");
    format!("Usage: {} <image.png> [palette_size]", program)
}
