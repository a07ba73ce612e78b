// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output collaborator: writes the three scan images and the optional JSON
// report to disk.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, PixelWithColorType};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_document::ScanOutput;
use tracing::{debug, info, instrument};

/// Where each scan artefact was written.
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub original: PathBuf,
    pub rectified: PathBuf,
    pub binarized: PathBuf,
}

/// Save original, rectified, and binarized images as
/// `<stem>-original.png`, `<stem>-scanned.png`, and `<stem>-cleaned.png`
/// in `out_dir` (created if missing).
#[instrument(skip(output), fields(out_dir = %out_dir.display()))]
pub fn write_images(out_dir: &Path, stem: &str, output: &ScanOutput) -> Result<WrittenFiles> {
    std::fs::create_dir_all(out_dir)?;

    let files = WrittenFiles {
        original: out_dir.join(format!("{stem}-original.png")),
        rectified: out_dir.join(format!("{stem}-scanned.png")),
        binarized: out_dir.join(format!("{stem}-cleaned.png")),
    };

    save_png(&output.original, &files.original)?;
    save_png(&output.rectified, &files.rectified)?;
    save_png(&output.binarized, &files.binarized)?;

    info!(
        rectified = %files.rectified.display(),
        binarized = %files.binarized.display(),
        "Scan images written"
    );
    Ok(files)
}

/// Write the scan report as pretty-printed JSON.
pub fn write_report(path: &Path, output: &ScanOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(&output.report())?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), "Scan report written");
    Ok(())
}

fn save_png<P>(image: &ImageBuffer<P, Vec<u8>>, path: &Path) -> Result<()>
where
    P: PixelWithColorType<Subpixel = u8>,
{
    image.save_with_format(path, ImageFormat::Png).map_err(|err| {
        ScanwerkError::ImageEncode(format!("failed to write {}: {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use scanwerk_core::ScanConfig;
    use scanwerk_document::DocumentScanner;

    fn scanned_page() -> ScanOutput {
        let mut img = RgbImage::new(300, 400);
        for y in 50..350 {
            for x in 40..260 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        DocumentScanner::from_rgb(img, ScanConfig::default())
            .unwrap()
            .scan()
            .unwrap()
            .into_result()
            .unwrap()
    }

    #[test]
    fn writes_three_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let output = scanned_page();
        let files = write_images(&dir.path().join("out"), "page", &output).unwrap();

        for path in [&files.original, &files.rectified, &files.binarized] {
            assert!(path.exists(), "{} missing", path.display());
        }
        let scanned = image::open(&files.rectified).unwrap();
        assert_eq!((scanned.width(), scanned.height()), (1000, 1414));
    }

    #[test]
    fn report_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let output = scanned_page();
        let path = dir.path().join("report.json");
        write_report(&path, &output).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["output_width"], 1000);
        assert!(value["detection"]["quad"]["top_left"]["x"].is_number());
    }
}
