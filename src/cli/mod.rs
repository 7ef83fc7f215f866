mod progress;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use flat_fs::{
    disk::FileDisk,
    fs::{config::LayoutConfig, BuildReport, FileSpec, ImageBuilder},
    payloads::default_files,
};

use self::progress::ProgressDisk;

/// Write files into the flat boot-disk filesystem of an OS image
#[derive(Debug, Parser)]
#[command(name = "flat-fs", version)]
pub struct Args {
    /// Disk image to write into
    pub image: PathBuf,

    /// Host files to store; the built-in files are used when none are given
    pub files: Vec<PathBuf>,

    /// Create the image (or grow it) to this many sectors first
    #[arg(long, value_name = "SECTORS")]
    pub create: Option<u64>,
}

pub fn run(args: Args) -> Result<()> {
    let config = LayoutConfig::default();
    let builder = ImageBuilder::new(config)?;

    let files = if args.files.is_empty() {
        default_files()
    } else {
        args.files
            .iter()
            .map(|path| load_host_file(path))
            .collect::<Result<Vec<_>>>()?
    };

    let disk = match args.create {
        Some(sectors) => FileDisk::create(&args.image, sectors, config.sector_size),
        None => FileDisk::open(&args.image),
    }
    .with_context(|| format!("cannot open image {}", args.image.display()))?;

    let total: u64 = files.iter().map(|f| f.content.len() as u64).sum::<u64>()
        + config.sector_size as u64;
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.green/black}] {bytes:>9}/{total_bytes} {msg}")?
            .progress_chars("#>-"),
    );

    let mut disk = ProgressDisk::new(disk, bar.clone());
    let report = match builder.build_report(&mut disk, &files) {
        Ok(report) => report,
        Err(e) => {
            bar.abandon();
            return Err(e)
                .with_context(|| format!("failed to build {}", args.image.display()));
        }
    };
    let mut disk = disk.finish("✅ Image written");
    disk.sync()
        .with_context(|| format!("cannot flush {}", args.image.display()))?;

    print_report(&report, &args.image);
    Ok(())
}

// 宿主文件名即目录项名
fn load_host_file(path: &Path) -> Result<FileSpec> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?;
    let content =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;

    Ok(FileSpec::new(name, content))
}

fn print_report(report: &BuildReport, image: &Path) {
    for entry in &report.entries {
        println!(
            "  {:<20} {} {:>8} bytes",
            entry.name_str().cyan(),
            format!("@{:<6}", entry.start).bright_black(),
            entry.size
        );
    }
    println!(
        "{} wrote {} file(s) to {}",
        "mkfs:".green().bold(),
        report.count(),
        image.display()
    );
}
