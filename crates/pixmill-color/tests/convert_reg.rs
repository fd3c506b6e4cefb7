//! Pixel format conversion regression test
//!
//! Tests the channel conversion matrix, luma weighting, bit-depth
//! repacking and the format round trips on synthetic images.

use pixmill_color::{ColorSettings, ConvertOptions, convert, convert_by_name, convert_image};
use pixmill_core::{ImageView, NativeImage, PixelFormat};
use pixmill_test::{RegParams, gradient_image, pixel_raw, uniform_image};

#[test]
fn convert_reg() {
    let mut rp = RegParams::new("convert");
    let defaults = ConvertOptions::default();

    // --- Single-pixel scenarios ---

    // RGBA (10,20,30,255) -> GreyAlpha with BT.601 weights
    let rgba = uniform_image(1, 1, PixelFormat::Rgba, &[10, 20, 30, 255]).unwrap();
    let ga = convert(&rgba, PixelFormat::GreyAlpha, &defaults).unwrap();
    rp.compare_values(18.0, ga.pixel(0, 0)[0] as f64, 0.0);
    rp.compare_values(255.0, ga.pixel(0, 0)[1] as f64, 0.0);

    // Grey 128 -> RGB replicates luminance
    let grey = uniform_image(1, 1, PixelFormat::Grey, &[128]).unwrap();
    let rgb = convert(&grey, PixelFormat::Rgb, &defaults).unwrap();
    rp.compare_bytes(&[128, 128, 128], rgb.pixel(0, 0));

    // Weights (1,1,1) renormalize to thirds
    let rgb = uniform_image(1, 1, PixelFormat::Rgb, &[30, 60, 90]).unwrap();
    let equal = ConvertOptions::new().with_weights(1.0, 1.0, 1.0);
    let thirds = ConvertOptions::new().with_weights(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
    let g1 = convert(&rgb, PixelFormat::Grey, &equal).unwrap();
    let g2 = convert(&rgb, PixelFormat::Grey, &thirds).unwrap();
    rp.compare_values(60.0, g1.pixel(0, 0)[0] as f64, 0.0);
    rp.compare_images(g1.view(), g2.view());

    // GreyAlpha -> RGB keeps the observed rule: d0=s0, d1=s1, d2=0
    let ga = uniform_image(1, 1, PixelFormat::GreyAlpha, &[100, 200]).unwrap();
    let rgb = convert(&ga, PixelFormat::Rgb, &defaults).unwrap();
    rp.compare_bytes(&[100, 200, 0], rgb.pixel(0, 0));

    // GreyAlpha -> RGBA replicates luminance and keeps alpha
    let rgba = convert(&ga, PixelFormat::Rgba, &defaults).unwrap();
    rp.compare_bytes(&[100, 100, 100, 200], rgba.pixel(0, 0));

    // --- Whole-image round trips ---

    // RGBA -> RGB -> RGBA: opaque alpha, RGB unchanged
    let src = gradient_image(17, 9, PixelFormat::Rgba).unwrap();
    let rgb = convert(&src, PixelFormat::Rgb, &defaults).unwrap();
    let back = convert(&rgb, PixelFormat::Rgba, &defaults).unwrap();
    let mut rgb_ok = true;
    let mut alpha_ok = true;
    for y in 0..src.height() {
        for x in 0..src.width() {
            rgb_ok &= src.pixel(x, y)[..3] == back.pixel(x, y)[..3];
            alpha_ok &= back.pixel(x, y)[3] == 255;
        }
    }
    rp.compare_values(1.0, if rgb_ok { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if alpha_ok { 1.0 } else { 0.0 }, 0.0);

    // RGB -> Grey -> RGB: three equal channels equal to the luma
    let src = gradient_image(13, 11, PixelFormat::Rgb).unwrap();
    let luma = convert(&src, PixelFormat::Grey, &defaults).unwrap();
    let back = convert(&luma, PixelFormat::Rgb, &defaults).unwrap();
    let mut equal_ok = true;
    for y in 0..src.height() {
        for x in 0..src.width() {
            let l = luma.pixel(x, y)[0];
            equal_ok &= back.pixel(x, y) == [l, l, l];
        }
    }
    rp.compare_values(1.0, if equal_ok { 1.0 } else { 0.0 }, 0.0);

    // Luma matches the per-pixel formula within rounding
    let settings = ColorSettings::default();
    let p = src.pixel(7, 4);
    let expected = settings.luma(p[0] as f32, p[1] as f32, p[2] as f32);
    rp.compare_values(expected as f64, luma.pixel(7, 4)[0] as f64, 0.51);

    // --- Bit depth ---

    // 8-bit -> 16-bit scales by 257
    let src = gradient_image(9, 5, PixelFormat::GreyAlpha).unwrap();
    let wide = convert(&src, PixelFormat::GreyAlpha16, &defaults).unwrap();
    let mut scale_ok = true;
    for y in 0..src.height() {
        for x in 0..src.width() {
            let narrow = src.pixel(x, y);
            let raw = pixel_raw(&wide, x, y);
            scale_ok &= raw[0] == narrow[0] as u16 * 257 && raw[1] == narrow[1] as u16 * 257;
        }
    }
    rp.compare_values(1.0, if scale_ok { 1.0 } else { 0.0 }, 0.0);

    // 16-bit -> 8-bit -> 16-bit is exact for multiples of 257
    let narrow = convert(&wide, PixelFormat::GreyAlpha, &defaults).unwrap();
    rp.compare_images(src.view(), narrow.view());

    // 16-bit RGB -> 8-bit grey
    let src = uniform_image(3, 3, PixelFormat::Rgb16, &[65535, 65535, 65535]).unwrap();
    let grey = convert(&src, PixelFormat::Grey, &defaults).unwrap();
    rp.compare_values(255.0, grey.pixel(1, 1)[0] as f64, 0.0);

    // --- Every format pair ---

    let mut pairs_ok = true;
    for src_format in PixelFormat::ALL {
        let src = gradient_image(6, 4, src_format).unwrap();
        for dst_format in PixelFormat::ALL {
            let dst = convert_by_name(&src, dst_format.name(), &defaults).unwrap();
            pairs_ok &= dst.format() == dst_format && dst.width() == 6 && dst.height() == 4;
            if src_format == dst_format {
                pairs_ok &= dst.equal_pixels(&src);
            }
        }
    }
    rp.compare_values(1.0, if pairs_ok { 1.0 } else { 0.0 }, 0.0);

    // --- Strided buffers ---

    // A padded caller buffer converts like the packed copy of it
    let packed = gradient_image(5, 4, PixelFormat::Rgb).unwrap();
    let stride = 5 * 3 + 7;
    let mut padded = vec![0xEEu8; stride * 4];
    for y in 0..4 {
        padded[y * stride..y * stride + 15].copy_from_slice(packed.row(y as u32));
    }
    let view = ImageView::new(&padded, 5, 4, stride as u32, PixelFormat::Rgb).unwrap();
    let a = convert(view, PixelFormat::Rgba16, &defaults).unwrap();
    let b = convert(&packed, PixelFormat::Rgba16, &defaults).unwrap();
    rp.compare_images(a.view(), b.view());

    // Writing into a caller-provided strided destination
    let mut out = vec![0u8; 64];
    let mut dst =
        pixmill_core::ImageViewMut::new(&mut out, 5, 4, 16, PixelFormat::Grey).unwrap();
    convert_image(&settings, &packed.view(), &mut dst);
    let expected = convert(&packed, PixelFormat::Grey, &defaults).unwrap();
    let written = NativeImage::from_raw(out, 5, 4, 16, PixelFormat::Grey).unwrap();
    rp.compare_images(expected.view(), written.view());

    assert!(rp.cleanup(), "convert regression test failed");
}
