use image::imageops::FilterType;
use ndarray::Array4;

pub const INPUT_SIDE: u32 = 28;

/// Decodes an uploaded image into the `(1, 28, 28, 1)` grayscale batch the
/// model was exported with, intensities scaled to `[0, 1]`.
pub fn preprocess(image: &[u8]) -> Result<Array4<f32>, image::ImageError> {
    let gray = image::load_from_memory(image)?.to_luma8();
    let resized = image::imageops::resize(&gray, INPUT_SIDE, INPUT_SIDE, FilterType::CatmullRom);

    let side = INPUT_SIDE as usize;
    Ok(Array4::from_shape_fn((1, side, side, 1), |(_, y, x, _)| {
        resized.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0
    }))
}
