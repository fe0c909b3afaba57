use crate::renderer::Swatch;

/// Compression ratio of a video region, as a rough measure of how much
/// picture structure it holds.
///
/// A blank screen compresses to almost nothing; a screen of uniform palette
/// noise sits in between; arbitrary bytes stay close to 1.0. The ratio uses
/// brotli at quality 2 and is 0.0 for an empty region.
pub fn high_order_entropy(region: &[u8]) -> f64 {
    if region.is_empty() {
        return 0.0;
    }

    let params = brotli::enc::BrotliEncoderParams {
        quality: 2,
        ..Default::default()
    };
    let mut packed = Vec::with_capacity(region.len());
    if brotli::BrotliCompress(&mut &region[..], &mut packed, &params).is_err() {
        return 1.0;
    }
    packed.len() as f64 / region.len() as f64
}

/// Count cells per swatch, in `Swatch::ALL` order, plus the number of
/// bytes that map to no swatch.
pub fn swatch_histogram(data: &[u8]) -> ([usize; 7], usize) {
    let mut hist = [0usize; 7];
    let mut unmapped = 0;
    for &b in data {
        match Swatch::from_byte(b) {
            Some(s) => {
                let idx = Swatch::ALL.iter().position(|&x| x == s).unwrap_or(0);
                hist[idx] += 1;
            }
            None => unmapped += 1,
        }
    }
    (hist, unmapped)
}
