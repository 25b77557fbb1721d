// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Image-based PDF report: the rendered report region scaled to page width,
//! sliced into page-height strips when it does not fit on one page.

use chrono::NaiveDate;
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

use super::render::{RasterImage, ReportSurface, SurfaceRenderer};
use super::{export_file_name, write_atomic, ExportKind};
use crate::errors::{CoreError, CoreResult};
use crate::models::Transaction;

const PT_PER_MM: f64 = 72.0 / 25.4;
pub const TOP_OFFSET_MM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// Where one horizontal strip of the source image lands on its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub src_y: u32,
    pub src_rows: u32,
    pub top_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Splits an `img_width` x `img_height` image, scaled to the page width,
/// into one slice per page.
pub fn paginate(
    img_width: u32,
    img_height: u32,
    page: PageSize,
    top_mm: f64,
) -> CoreResult<Vec<PageSlice>> {
    if img_width == 0 || img_height == 0 {
        return Err(CoreError::Export("Rendered snapshot is empty".into()));
    }
    let mm_per_px = page.width_mm / img_width as f64;
    let usable_mm = (page.height_mm - top_mm).max(mm_per_px);
    let rows_per_page = ((usable_mm / mm_per_px).floor() as u32).max(1);

    let mut slices = Vec::new();
    let mut src_y = 0;
    while src_y < img_height {
        let src_rows = rows_per_page.min(img_height - src_y);
        slices.push(PageSlice {
            src_y,
            src_rows,
            top_mm,
            width_mm: page.width_mm,
            height_mm: src_rows as f64 * mm_per_px,
        });
        src_y += src_rows;
    }
    Ok(slices)
}

#[derive(Debug, Clone)]
pub struct SnapshotDocument {
    image: RasterImage,
    page: PageSize,
    slices: Vec<PageSlice>,
}

impl SnapshotDocument {
    /// Rejects an empty transaction list before the renderer is touched.
    pub fn build<R: SurfaceRenderer + ?Sized>(
        transactions: &[Transaction],
        renderer: &R,
    ) -> CoreResult<Self> {
        if transactions.is_empty() {
            return Err(CoreError::Export("No transactions to export".into()));
        }
        let surface = ReportSurface::from_transactions(transactions);
        let image = renderer.render(&surface)?;
        Self::from_image(image, PageSize::A4_PORTRAIT)
    }

    /// Rejects an image whose pixel buffer does not hold exactly
    /// `width * height` RGB8 pixels.
    pub fn from_image(image: RasterImage, page: PageSize) -> CoreResult<Self> {
        let expected = (image.width as usize)
            .checked_mul(image.height as usize)
            .and_then(|n| n.checked_mul(3));
        if expected != Some(image.pixels.len()) {
            return Err(CoreError::Export(format!(
                "Rendered snapshot is {}x{} but carries {} bytes of pixel data",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }
        let slices = paginate(image.width, image.height, page, TOP_OFFSET_MM)?;
        Ok(Self {
            image,
            page,
            slices,
        })
    }

    pub fn page_count(&self) -> usize {
        self.slices.len()
    }

    pub fn slices(&self) -> &[PageSlice] {
        &self.slices
    }

    pub fn to_pdf(&self) -> CoreResult<Vec<u8>> {
        let page_w = (self.page.width_mm * PT_PER_MM) as f32;
        let page_h = (self.page.height_mm * PT_PER_MM) as f32;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(self.slices.len());
        let media_box: Vec<Object> = vec![0.into(), 0.into(), page_w.into(), page_h.into()];

        for slice in &self.slices {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => self.image.width as i64,
                    "Height" => slice.src_rows as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                self.image.rows(slice.src_y, slice.src_rows).to_vec(),
            ));

            let w = slice.width_mm * PT_PER_MM;
            let h = slice.height_mm * PT_PER_MM;
            let y = f64::from(page_h) - slice.top_mm * PT_PER_MM - h;
            let ops = format!("q {:.3} 0 0 {:.3} 0 {:.3} cm /Im0 Do Q", w, h, y);
            let content_id = doc.add_object(Stream::new(dictionary! {}, ops.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| CoreError::Export(format!("Build PDF: {}", e)))?;
        Ok(buf)
    }

    pub fn write_pdf(
        &self,
        dir: &Path,
        app_name: &str,
        kind: ExportKind,
        date: NaiveDate,
    ) -> CoreResult<PathBuf> {
        let path = dir.join(export_file_name(app_name, kind, date, "pdf"));
        write_atomic(&path, &self.to_pdf()?)?;
        Ok(path)
    }
}
