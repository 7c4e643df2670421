use std::fs::{self, File};
use std::path::{Path, PathBuf};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::board::BOARD_SIZE;
use crate::config::RenderConfig;
use crate::error::BingoError;
use crate::photos::PhotoStore;
use crate::view::{BoardView, CellControl};

const FONT_CANDIDATES: &[&str] = &[
    "Arial", "Helvetica", "DejaVuSans", "LiberationSans", "SegoeUI", "Segoe UI", "NotoSans-Regular", "NotoSans", "Cantarell-Regular"
];

const BACKGROUND: Rgb<u8> = Rgb([245, 245, 245]);
const GRID: Rgb<u8> = Rgb([30, 30, 30]);
const TEXT: Rgb<u8> = Rgb([20, 20, 20]);
const CHECKED: Rgb<u8> = Rgb([187, 247, 208]);
const WIN_RING: Rgb<u8> = Rgb([250, 204, 21]);
const PLACEHOLDER: Rgb<u8> = Rgb([160, 160, 160]);
const BANNER: Rgb<u8> = Rgb([15, 15, 15]);

fn find_system_font_data(preferred: Option<&Path>) -> Option<Vec<u8>> {
    if let Some(path) = preferred {
        match fs::read(path) {
            Ok(bytes) => return Some(bytes),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "configured font unreadable"),
        }
    }
    // Allow explicit override for debugging or custom font selection
    if let Ok(path) = std::env::var("BINGO_FONT_PATH") {
        if let Ok(bytes) = fs::read(&path) { return Some(bytes); }
    }

    let mut search_dirs: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "macos") {
        search_dirs.extend([
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() { search_dirs.push(home.join("Library/Fonts")); }
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") { search_dirs.push(PathBuf::from(win).join("Fonts")); }
        search_dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else { // Linux / BSD
        search_dirs.extend([
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() {
            search_dirs.push(home.join(".fonts"));
            search_dirs.push(home.join(".local/share/fonts"));
        }
    }

    let mut font_files: Vec<PathBuf> = Vec::new();
    for dir in search_dirs {
        if !dir.exists() { continue; }
        for entry in walkdir::WalkDir::new(&dir).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() { continue; }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf") { font_files.push(path.to_path_buf()); }
            }
        }
    }

    if font_files.is_empty() { return None; }

    for &cand in FONT_CANDIDATES {
        if let Some(p) = font_files.iter().find(|p| p.file_stem().and_then(|s| s.to_str()).is_some_and(|s| s.eq_ignore_ascii_case(cand))) {
            if let Ok(data) = fs::read(p) { return Some(data); }
        }
    }

    // Otherwise take the font covering the most printable ASCII.
    let mut best: Option<(usize, Vec<u8>)> = None;
    for path in &font_files {
        let Ok(bytes) = fs::read(path) else { continue };
        let Some(font) = Font::try_from_vec(bytes.clone()) else { continue };
        let score = (32u8..=126u8).filter(|&ch| font.glyph(ch as char).id().0 != 0).count();
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, bytes));
        }
    }
    best.map(|(_, bytes)| bytes)
}

struct TextPainter {
    font: Font<'static>,
    scale: Scale,
    line_height: f32,
}

impl TextPainter {
    fn new(font_data: Vec<u8>, px: f32) -> Result<Self, BingoError> {
        let font = Font::try_from_vec(font_data).ok_or_else(|| BingoError::Render("invalid font data".into()))?;
        let scale = Scale::uniform(px);
        let v = font.v_metrics(scale);
        let line_height = (v.ascent - v.descent + v.line_gap).ceil();
        Ok(Self { font, scale, line_height })
    }

    fn with_scale(&self, px: f32) -> Self {
        let scale = Scale::uniform(px);
        let v = self.font.v_metrics(scale);
        Self { font: self.font.clone(), scale, line_height: (v.ascent - v.descent + v.line_gap).ceil() }
    }

    fn word_width(&self, word: &str) -> f32 {
        let v: Vec<_> = self.font.layout(word, self.scale, point(0.0, 0.0)).collect();
        if let Some(last) = v.last() {
            last.position().x + last.unpositioned().h_metrics().advance_width
        } else { 0.0 }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_wrapped(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, max_w: u32, max_h: u32, color: Rgb<u8>) {
        let mut pen_y = 0.0f32;
        let ascent = self.font.v_metrics(self.scale).ascent;
        let max_wf = max_w as f32;
        let max_hf = max_h as f32;
        let mut line = String::new();
        let mut line_width = 0.0f32;

        let words: Vec<&str> = text.split_whitespace().collect();
        for (i, w) in words.iter().enumerate() {
            let w_width = self.word_width(w);
            let extra = if line.is_empty() { 0.0 } else { self.word_width(" ") };
            if !line.is_empty() && line_width + extra + w_width > max_wf {
                if pen_y + self.line_height > max_hf { break; }
                self.draw_line(img, &line, left, top, pen_y + ascent, color);
                pen_y += self.line_height;
                line.clear();
                line_width = 0.0;
            }
            if !line.is_empty() { line.push(' '); line_width += extra; }
            line.push_str(w);
            line_width += w_width;
            if i == words.len() - 1 {
                if pen_y + self.line_height > max_hf { break; }
                self.draw_line(img, &line, left, top, pen_y + ascent, color);
            }
        }
    }

    fn draw_line(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, baseline_y: f32, color: Rgb<u8>) {
        for glyph in self.font.layout(text, self.scale, point(0.0, baseline_y)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| {
                    if v < 0.05 { return; }
                    let gx = left as i32 + x as i32 + bb.min.x;
                    let gy = top as i32 + y as i32 + bb.min.y;
                    if gx >= 0 && gy >= 0 && (gx as u32) < img.width() && (gy as u32) < img.height() {
                        let dst = img.get_pixel_mut(gx as u32, gy as u32);
                        for i in 0..3 { dst[i] = ((dst[i] as f32) * (1.0 - v) + (color[i] as f32) * v) as u8; }
                    }
                });
            }
        }
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, thickness: u32, color: Rgb<u8>) {
    fill_rect(img, x0, y0, w, thickness, color);
    fill_rect(img, x0, y0 + h.saturating_sub(thickness), w, thickness, color);
    fill_rect(img, x0, y0, thickness, h, color);
    fill_rect(img, x0 + w.saturating_sub(thickness), y0, thickness, h, color);
}

fn draw_placeholder(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    stroke_rect(img, x0, y0, w, h, 1, PLACEHOLDER);
    let steps = w.max(h).max(1);
    for s in 0..steps {
        let x = x0 + s * w / steps;
        let y = y0 + s * h / steps;
        let y_anti = y0 + h - 1 - s * h / steps;
        if x < img.width() && y < img.height() { img.put_pixel(x, y, PLACEHOLDER); }
        if x < img.width() && y_anti < img.height() { img.put_pixel(x, y_anti, PLACEHOLDER); }
    }
}

fn draw_photo(img: &mut RgbImage, photo: &Path, x0: u32, y0: u32, w: u32, h: u32) {
    match image::open(photo) {
        Ok(decoded) => {
            let thumb = decoded.resize_to_fill(w, h, FilterType::Triangle).to_rgb8();
            imageops::overlay(img, &thumb, i64::from(x0), i64::from(y0));
        }
        Err(e) => {
            tracing::warn!(path = %photo.display(), error = %e, "photo could not be decoded");
            draw_placeholder(img, x0, y0, w, h);
        }
    }
}

/// Draws the board as a PNG: labels, checked fill, photo previews, the
/// winning line ring and the BINGO banner.
pub fn render_board_to_png(view: &BoardView, photos: &PhotoStore, config: &RenderConfig, path: &Path) -> Result<(), BingoError> {
    assert_eq!(BOARD_SIZE * BOARD_SIZE, view.cells.len(), "view must hold one entry per cell");
    config.validate()?;

    let board_size = BOARD_SIZE as u32;
    let cell_px = config.cell_px;
    let padding = config.padding;
    let grid_w = board_size * cell_px;
    let grid_h = board_size * cell_px;
    let img_w = grid_w + padding * 2;
    let img_h = grid_h + padding * 2;
    let margin = (cell_px / 12).max(2);

    let mut img = RgbImage::from_pixel(img_w, img_h, BACKGROUND);

    let painter = match find_system_font_data(config.font_path.as_deref()) {
        Some(data) => Some(TextPainter::new(data, config.font_size)?),
        None => {
            tracing::warn!("no system font found, labels are left blank");
            None
        }
    };

    for cell in &view.cells {
        let row = cell.index as u32 / board_size;
        let col = cell.index as u32 % board_size;
        let cx = padding + col * cell_px;
        let cy = padding + row * cell_px;

        if cell.checked {
            fill_rect(&mut img, cx, cy, cell_px, cell_px, CHECKED);
        }

        let inner_w = cell_px - 2 * margin;
        let (text_h, photo_slot) = match &cell.control {
            CellControl::Preview(photo) => (inner_w / 2, Some(photo)),
            _ => (inner_w, None),
        };
        if let Some(painter) = &painter {
            painter.draw_wrapped(&mut img, &cell.label, cx + margin, cy + margin, inner_w, text_h, TEXT);
        }
        if let Some(photo) = photo_slot {
            let (px, py) = (cx + margin, cy + margin + text_h);
            let (pw, ph) = (inner_w, inner_w - text_h);
            match photos.resolve(photo) {
                Some(source) => draw_photo(&mut img, source, px, py, pw, ph),
                None => {
                    tracing::warn!(%photo, "photo handle already released");
                    draw_placeholder(&mut img, px, py, pw, ph);
                }
            }
        }
    }

    // Grid lines
    for i in 0..=board_size {
        let y = padding + i * cell_px;
        if y < img_h { for x in padding..(padding + grid_w).min(img_w) { img.put_pixel(x, y, GRID); } }
        let x = padding + i * cell_px;
        if x < img_w { for y in padding..(padding + grid_h).min(img_h) { img.put_pixel(x, y, GRID); } }
    }

    for cell in view.cells.iter().filter(|c| c.highlighted) {
        let row = cell.index as u32 / board_size;
        let col = cell.index as u32 % board_size;
        stroke_rect(&mut img, padding + col * cell_px + 1, padding + row * cell_px + 1, cell_px - 1, cell_px - 1, 4, WIN_RING);
    }

    if view.banner {
        let banner_h = cell_px;
        let banner_y = padding + (grid_h - banner_h) / 2;
        fill_rect(&mut img, padding + cell_px / 2, banner_y, grid_w - cell_px, banner_h, BANNER);
        if let Some(painter) = &painter {
            let big = painter.with_scale(config.font_size * 3.0);
            let text = "BINGO!";
            let text_w = big.word_width(text).ceil() as u32;
            let left = padding + grid_w.saturating_sub(text_w) / 2;
            let top = banner_y + banner_h.saturating_sub(big.line_height as u32) / 2;
            big.draw_wrapped(&mut img, text, left, top, grid_w, banner_h, WIN_RING);
        }
    }

    let mut file = File::create(path).map_err(|source| BingoError::Io { path: path.to_path_buf(), source })?;
    img.write_to(&mut file, image::ImageFormat::Png)?;
    tracing::debug!(path = %path.display(), "board image written");
    Ok(())
}
