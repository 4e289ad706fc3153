use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageBuffer, Luma};
use qrcode::QrCode;

/// Target edge length of the rendered image, including the quiet margin.
const TARGET_SIZE_PX: u32 = 256;
/// Quiet-zone width on each side, in modules.
const MARGIN_MODULES: u32 = 2;

#[derive(thiserror::Error, Debug)]
pub enum QrError {
    #[error("QR code generation failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Renders a text payload as a black-on-white QR image and returns it as a
/// PNG data URL (`data:image/png;base64,...`).
///
/// The image is square, sized as close to 256 px as whole modules allow,
/// with a 2-module quiet margin on every side.
pub fn generate_data_url(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload.as_bytes())?;

    let modules = code.width() as u32 + 2 * MARGIN_MODULES;
    let module_px = (TARGET_SIZE_PX / modules).max(1);
    let img_size = modules * module_px;

    let mut img = ImageBuffer::<Luma<u8>, Vec<u8>>::new(img_size, img_size);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let module_x = x / module_px;
        let module_y = y / module_px;

        let in_margin = module_x < MARGIN_MODULES
            || module_y < MARGIN_MODULES
            || module_x >= modules - MARGIN_MODULES
            || module_y >= modules - MARGIN_MODULES;

        let dark = !in_margin
            && code[(
                (module_x - MARGIN_MODULES) as usize,
                (module_y - MARGIN_MODULES) as usize,
            )] == qrcode::types::Color::Dark;

        *pixel = if dark { Luma([0u8]) } else { Luma([255u8]) };
    }

    let mut png_data = Vec::new();
    image::DynamicImage::ImageLuma8(img).write_to(
        &mut std::io::Cursor::new(&mut png_data),
        image::ImageFormat::Png,
    )?;

    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(&png_data)
    ))
}
