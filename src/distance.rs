use crate::model::Coordinates;

/// Euclidean distance between two points of the same color model
///
/// This is plain distance in the model's own coordinate space, so for LAB it
/// is the CIE76 difference and not a perceptual formula like CIEDE2000.
pub fn distance(a: &Coordinates, b: &Coordinates) -> f64 {
    debug_assert_eq!(a.arity(), b.arity());
    euclidean(a.as_slice(), b.as_slice())
}

/// Normalization denominator for distances measured from the specified query point
///
/// Each channel contributes the larger of its distance to 0 and to 255, at
/// least 127.5, so the value depends on the query and is at least 127.5 times
/// the square root of the model's arity.
pub fn max_diff(query: &Coordinates) -> f64 {
    query
        .as_slice()
        .iter()
        .map(|c| c.abs().max((255.0 - c).abs()).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorModel, convert};

    #[test]
    fn test_distance_to_self_is_zero() {
        for model in ColorModel::ALL {
            let c = convert(model, [12, 200, 99]);
            assert_eq!(distance(&c, &c), 0.0);
        }
    }

    #[test]
    fn test_rgb_distance() {
        let a = convert(ColorModel::Rgb, [0, 0, 0]);
        let b = convert(ColorModel::Rgb, [3, 4, 0]);
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance(&b, &a), 5.0);
    }

    #[test]
    fn test_cmyk_uses_all_four_channels() {
        let white = convert(ColorModel::Cmyk, [255, 255, 255]);
        let black = convert(ColorModel::Cmyk, [0, 0, 0]);
        assert_eq!(distance(&white, &black), 100.0);
    }

    #[test]
    fn test_max_diff_is_query_relative() {
        let black = convert(ColorModel::Rgb, [0, 0, 0]);
        assert!((max_diff(&black) - 255.0 * 3f64.sqrt()).abs() < 1e-9);

        let tint = convert(ColorModel::Rgb, [100, 200, 100]);
        assert!((max_diff(&tint) - 88050f64.sqrt()).abs() < 1e-9);

        let middle = convert(ColorModel::Rgb, [127, 128, 127]);
        assert!(max_diff(&middle) >= 127.5 * 3f64.sqrt());
    }

    #[test]
    fn test_max_diff_floor_scales_with_arity() {
        for model in ColorModel::ALL {
            for rgb in [[0, 0, 0], [127, 128, 127], [255, 255, 255], [140, 200, 100]] {
                let query = convert(model, rgb);
                let floor = 127.5 * (model.arity() as f64).sqrt();
                assert!(max_diff(&query) >= floor, "{model} {rgb:?}");
            }
        }
    }
}
