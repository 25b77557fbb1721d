// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{category_breakdown, summarize};
use crate::errors::{CoreError, CoreResult};
use crate::models::{BreakdownEntry, CategoryBreakdown, SummaryResult, Transaction, TxType};

pub type Rgb = [u8; 3];

pub const PALETTE: [Rgb; 6] = [
    [0x6B, 0x4F, 0x3B],
    [0xA3, 0xB1, 0x8A],
    [0xD4, 0xA3, 0x73],
    [0x8C, 0x74, 0x62],
    [0xC6, 0xD2, 0xB1],
    [0xE8, 0xC5, 0xA5],
];
const BACKGROUND: Rgb = [0xFD, 0xFB, 0xF7];
const EMPTY_BAR: Rgb = [0xE5, 0xE0, 0xD8];
const EXPENSE_ACCENT: Rgb = [0xD4, 0xA3, 0x73];
const INCOME_ACCENT: Rgb = [0xA3, 0xB1, 0x8A];

/// Row-major RGB8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Clips to the image bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y.min(self.height)..y_end {
            for col in x.min(self.width)..x_end {
                let i = (row as usize * self.width as usize + col as usize) * 3;
                self.pixels[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Raw bytes of rows `y..y + rows`.
    pub fn rows(&self, y: u32, rows: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = (y as usize * stride).min(self.pixels.len());
        let end = ((y as usize + rows as usize) * stride).min(self.pixels.len());
        &self.pixels[start..end]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The aggregated report region that gets captured into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSurface {
    pub summary: SummaryResult,
    pub expense: CategoryBreakdown,
    pub income: CategoryBreakdown,
}

impl ReportSurface {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            summary: summarize(transactions),
            expense: category_breakdown(transactions, TxType::Expense),
            income: category_breakdown(transactions, TxType::Income),
        }
    }
}

/// Rasterizes a report surface. The snapshot exporter only depends on this
/// trait, so any backend that can produce pixels can be plugged in.
pub trait SurfaceRenderer {
    fn render(&self, surface: &ReportSurface) -> CoreResult<RasterImage>;
}

/// Built-in renderer: one horizontal bar per category, expense section on
/// top, income below, bar length relative to the largest entry of its
/// section.
#[derive(Debug, Clone, Copy)]
pub struct BarChartRenderer {
    pub scale: u32,
}

impl BarChartRenderer {
    pub const WIDTH: u32 = 400;
    const PAD: u32 = 8;
    const HEADER: u32 = 6;
    const ROW: u32 = 16;
    const BAR: u32 = 10;
    const GAP: u32 = 16;

    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    fn section_height(entries: &[BreakdownEntry]) -> u32 {
        Self::HEADER + Self::PAD + Self::ROW * entries.len().max(1) as u32
    }

    /// Logical (unscaled) height for a surface.
    pub fn logical_height(surface: &ReportSurface) -> u32 {
        Self::PAD
            + Self::section_height(&surface.expense)
            + Self::GAP
            + Self::section_height(&surface.income)
            + Self::PAD
    }

    fn draw_section(
        &self,
        img: &mut RasterImage,
        top: u32,
        accent: Rgb,
        entries: &[BreakdownEntry],
    ) -> u32 {
        let s = self.scale;
        let inner = Self::WIDTH - 2 * Self::PAD;
        img.fill_rect(Self::PAD * s, top * s, inner * s, Self::HEADER * s, accent);

        let mut y = top + Self::HEADER + Self::PAD;
        let max = entries.iter().map(|e| e.total).max().unwrap_or(0);
        if entries.is_empty() || max <= 0 {
            img.fill_rect(Self::PAD * s, y * s, inner * s, Self::BAR * s, EMPTY_BAR);
            return top + Self::section_height(entries);
        }
        for (i, entry) in entries.iter().enumerate() {
            let len = ((entry.total.max(0) as u128 * inner as u128) / max as u128) as u32;
            img.fill_rect(
                Self::PAD * s,
                y * s,
                len.max(1) * s,
                Self::BAR * s,
                PALETTE[i % PALETTE.len()],
            );
            y += Self::ROW;
        }
        top + Self::section_height(entries)
    }
}

impl Default for BarChartRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl SurfaceRenderer for BarChartRenderer {
    fn render(&self, surface: &ReportSurface) -> CoreResult<RasterImage> {
        let width = Self::WIDTH
            .checked_mul(self.scale)
            .ok_or_else(|| CoreError::Export("Snapshot scale too large".into()))?;
        let height = Self::logical_height(surface)
            .checked_mul(self.scale)
            .ok_or_else(|| CoreError::Export("Snapshot too tall".into()))?;
        let mut img = RasterImage::new(width, height, BACKGROUND);

        let after_expense = self.draw_section(&mut img, Self::PAD, EXPENSE_ACCENT, &surface.expense);
        self.draw_section(
            &mut img,
            after_expense + Self::GAP,
            INCOME_ACCENT,
            &surface.income,
        );
        Ok(img)
    }
}
