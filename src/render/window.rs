use anyhow::{Context, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

/// minifbを使用したウィンドウ。サイズ変更可。
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .context("Failed to create window")?;
        window.set_target_fps(target_fps);

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
        })
    }

    /// ウィンドウが開いているか (Esc で閉じる)
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// 現在のウィンドウ内寸 (幅, 高さ)
    pub fn size(&self) -> (usize, usize) {
        let (w, h) = self.window.get_size();
        (w.max(1), h.max(1))
    }

    /// このフレームで押されたか (長押しのリピートは無視)
    pub fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// BGR Mat をバッファに変換して表示
    pub fn present(&mut self, frame: &Mat) -> Result<()> {
        let width = frame.cols() as usize;
        let height = frame.rows() as usize;

        let owned;
        let frame = if frame.is_continuous() {
            frame
        } else {
            owned = frame.try_clone()?;
            &owned
        };

        // BGR -> 0RGB
        self.buffer.clear();
        self.buffer.extend(
            frame
                .data_bytes()?
                .chunks_exact(3)
                .map(|p| ((p[2] as u32) << 16) | ((p[1] as u32) << 8) | p[0] as u32),
        );

        self.window
            .update_with_buffer(&self.buffer, width, height)
            .context("Failed to update window")?;
        Ok(())
    }
}
