// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective flattening. Maps a document quadrilateral onto an upright
// rectangle with a projective warp.

use docflat_core::error::{DocflatError, Result};
use docflat_core::{CornerLabel, Normalized, Pixel, PlanId, Quadrilateral};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument};

/// Flatten the region under normalized `quad` at the image's own resolution.
pub fn correct_normalized(
    image: &DynamicImage,
    quad: &Quadrilateral<Normalized>,
    plan: PlanId,
) -> Result<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(DocflatError::ImageError("image has no pixels".into()));
    }
    warp_quad(image, &quad.to_pixel(f64::from(width), f64::from(height)), plan)
}

/// Flatten the region under pixel-space `quad`.
///
/// The output is sized by [`Quadrilateral::output_size`]; pixels that map
/// outside the source are filled white.
#[instrument(skip(image, quad), fields(width = image.width(), height = image.height()))]
pub fn warp_quad(image: &DynamicImage, quad: &Quadrilateral<Pixel>, plan: PlanId) -> Result<DynamicImage> {
    let (out_w, out_h) = quad.output_size();
    if out_w == 0 || out_h == 0 {
        return Err(DocflatError::backend(
            plan,
            format!("corrected size {out_w}x{out_h} is empty"),
        ));
    }

    let corner = |label: CornerLabel| {
        let p = quad[label];
        (p.x as f32, p.y as f32)
    };
    let src = [
        corner(CornerLabel::TopLeft),
        corner(CornerLabel::TopRight),
        corner(CornerLabel::BottomRight),
        corner(CornerLabel::BottomLeft),
    ];
    let dest = [
        (0.0, 0.0),
        (out_w as f32, 0.0),
        (out_w as f32, out_h as f32),
        (0.0, out_h as f32),
    ];

    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        DocflatError::backend(plan, "corners do not define a projective transform")
    })?;

    let rgba_input = image.to_rgba8();
    let mut output = RgbaImage::new(out_w, out_h);
    warp_into(
        &rgba_input,
        &projection,
        Interpolation::Bilinear,
        Rgba([255u8, 255, 255, 255]),
        &mut output,
    );

    debug!(out_w, out_h, "perspective warp applied");
    Ok(DynamicImage::ImageRgba8(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_core::Point2D;
    use image::GenericImageView;

    /// Left half black, right half white.
    fn split_image() -> DynamicImage {
        let img = RgbaImage::from_fn(100, 80, |x, _| {
            if x < 50 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn output_takes_quad_size() {
        let quad = Quadrilateral::<Pixel>::new(
            Point2D::new(10.0, 10.0),
            Point2D::new(70.0, 10.0),
            Point2D::new(10.0, 50.0),
            Point2D::new(70.0, 50.0),
        );
        let out = warp_quad(&split_image(), &quad, PlanId::Native).unwrap();
        assert_eq!(out.dimensions(), (60, 40));
        // Source x = 10 + 10 = 20 is in the black half, x = 10 + 55 = 65 in the white half.
        assert_eq!(out.get_pixel(10, 20).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(55, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn full_frame_keeps_dimensions() {
        let out = correct_normalized(&split_image(), &Quadrilateral::unit_square(), PlanId::Native).unwrap();
        assert_eq!(out.dimensions(), (100, 80));
    }

    #[test]
    fn collapsed_quad_fails() {
        let point = Point2D::new(20.0, 20.0);
        let quad = Quadrilateral::<Pixel>::new(point, point, point, point);
        assert!(matches!(
            warp_quad(&split_image(), &quad, PlanId::Native),
            Err(DocflatError::Backend { plan: PlanId::Native, .. })
        ));
    }

    #[test]
    fn empty_image_fails() {
        let empty = DynamicImage::new_rgba8(0, 0);
        assert!(matches!(
            correct_normalized(&empty, &Quadrilateral::unit_square(), PlanId::Native),
            Err(DocflatError::ImageError(_))
        ));
    }
}
