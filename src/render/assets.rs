use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use opencv::{
    core::{AlgorithmHint, Mat},
    imgcodecs, imgproc,
    prelude::*,
};

use crate::fields::FieldAsset;

/// 起動時に一度だけ読み込むフォーム画像 (BGRA)
#[derive(Default)]
pub struct AssetTable {
    images: HashMap<FieldAsset, Mat>,
}

impl AssetTable {
    /// dir から全アセットを読む。読めなかったものは警告して飛ばす。
    pub fn load(dir: &Path) -> Self {
        let mut images = HashMap::new();
        for asset in FieldAsset::ALL {
            let path = dir.join(asset.file_name());
            match load_bgra(&path) {
                Ok(mat) => {
                    images.insert(asset, mat);
                }
                Err(e) => tracing::warn!(asset = asset.file_name(), "form field image skipped: {:#}", e),
            }
        }
        tracing::info!(
            loaded = images.len(),
            total = FieldAsset::ALL.len(),
            dir = %dir.display(),
            "form field images loaded"
        );
        Self { images }
    }

    pub fn get(&self, asset: FieldAsset) -> Option<&Mat> {
        self.images.get(&asset)
    }

    /// (幅, 高さ) px
    pub fn size(&self, asset: FieldAsset) -> Option<(f32, f32)> {
        self.get(asset).map(|m| (m.cols() as f32, m.rows() as f32))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// PNG をアルファ付きで読み、4ch BGRA にそろえる
fn load_bgra(path: &Path) -> Result<Mat> {
    let path_str = path.to_str().context("Non UTF-8 asset path")?;
    let image = imgcodecs::imread(path_str, imgcodecs::IMREAD_UNCHANGED)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if image.empty() {
        anyhow::bail!("Missing or unreadable image: {}", path.display());
    }

    let code = match image.channels() {
        4 => return Ok(image),
        3 => imgproc::COLOR_BGR2BGRA,
        1 => imgproc::COLOR_GRAY2BGRA,
        n => anyhow::bail!("Unsupported channel count {} in {}", n, path.display()),
    };
    let mut bgra = Mat::default();
    imgproc::cvt_color(&image, &mut bgra, code, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;
    Ok(bgra)
}
