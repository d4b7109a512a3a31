use crate::models::geometry::Size;
use crate::models::parameters::CameraParameters;

/// Candidates smaller than this are too coarse to decode from.
const MIN_PREVIEW_PIXELS: u64 = 480 * 320;

/// Largest tolerated difference between candidate and screen aspect ratios.
const MAX_ASPECT_DISTORTION: f64 = 0.15;

/// Pick the preview size that best fits `screen`.
///
/// Both the screen and each candidate are compared in landscape form so the
/// result does not depend on how the device is held. An exact match wins,
/// otherwise the largest candidate within the aspect tolerance, otherwise the
/// camera's current preview size. Ties keep the driver's listing order.
pub fn find_best_preview_size(parameters: &CameraParameters, screen: Size) -> Option<Size> {
    let screen = screen.landscape();
    let default_size = parameters.preview_size;

    if parameters.supported_preview_sizes.is_empty() || screen.height == 0 {
        log::warn!("Device returned no supported preview sizes; using default");
        return default_size;
    }

    let mut candidates = parameters.supported_preview_sizes.clone();
    // Stable sort: equal areas stay in driver order.
    candidates.sort_by(|a, b| b.pixels().cmp(&a.pixels()));

    let screen_aspect = screen.width as f64 / screen.height as f64;
    let mut largest = None;

    for candidate in candidates {
        if candidate.pixels() < MIN_PREVIEW_PIXELS {
            continue;
        }
        let oriented = candidate.landscape();
        let aspect = oriented.width as f64 / oriented.height as f64;
        if (aspect - screen_aspect).abs() > MAX_ASPECT_DISTORTION {
            continue;
        }
        if oriented == screen {
            log::debug!("Found preview size exactly matching screen size: {}", candidate);
            return Some(candidate);
        }
        largest.get_or_insert(candidate);
    }

    match largest {
        Some(size) => {
            log::debug!("Using largest suitable preview size: {}", size);
            Some(size)
        }
        None => {
            log::warn!("No suitable preview sizes; using default {:?}", default_size);
            default_size
        }
    }
}

/// Preview size as it appears on `screen`: transposed when the screen and
/// the preview disagree on portrait vs landscape.
pub fn preview_size_on_screen(screen: Size, best_preview: Size) -> Size {
    if screen.is_portrait() == best_preview.is_portrait() {
        best_preview
    } else {
        best_preview.transposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sizes: &[(u32, u32)], default: Option<(u32, u32)>) -> CameraParameters {
        CameraParameters {
            supported_preview_sizes: sizes.iter().map(|&(w, h)| Size::new(w, h)).collect(),
            preview_size: default.map(|(w, h)| Size::new(w, h)),
            ..Default::default()
        }
    }

    #[test]
    fn on_screen_swaps_when_orientations_differ() {
        let on_screen = preview_size_on_screen(Size::new(1080, 1920), Size::new(1280, 720));
        assert_eq!(on_screen, Size::new(720, 1280));
    }

    #[test]
    fn on_screen_keeps_matching_orientation() {
        let on_screen = preview_size_on_screen(Size::new(1920, 1080), Size::new(1280, 720));
        assert_eq!(on_screen, Size::new(1280, 720));

        let on_screen = preview_size_on_screen(Size::new(1080, 1920), Size::new(720, 1280));
        assert_eq!(on_screen, Size::new(720, 1280));
    }

    #[test]
    fn exact_match_wins_over_larger() {
        let p = params(&[(3840, 2160), (1920, 1080), (1280, 720)], Some((640, 480)));
        assert_eq!(
            find_best_preview_size(&p, Size::new(1080, 1920)),
            Some(Size::new(1920, 1080))
        );
    }

    #[test]
    fn largest_within_aspect_tolerance() {
        // screen 16:9, 4:3 candidates are too distorted
        let p = params(&[(640, 480), (1280, 720), (2592, 1944), (960, 540)], Some((640, 480)));
        assert_eq!(
            find_best_preview_size(&p, Size::new(1080, 2000)),
            Some(Size::new(1280, 720))
        );
    }

    #[test]
    fn tiny_candidates_are_dropped() {
        let p = params(&[(320, 240), (176, 144)], Some((320, 240)));
        assert_eq!(
            find_best_preview_size(&p, Size::new(480, 320)),
            Some(Size::new(320, 240))
        );
    }

    #[test]
    fn falls_back_to_default_without_candidates() {
        let p = params(&[], Some((640, 480)));
        assert_eq!(
            find_best_preview_size(&p, Size::new(1080, 1920)),
            Some(Size::new(640, 480))
        );

        let p = params(&[], None);
        assert_eq!(find_best_preview_size(&p, Size::new(1080, 1920)), None);
    }

    #[test]
    fn selection_is_deterministic() {
        let p = params(&[(1280, 720), (1920, 1080), (1600, 900)], None);
        let first = find_best_preview_size(&p, Size::new(1152, 1920));
        for _ in 0..10 {
            assert_eq!(find_best_preview_size(&p, Size::new(1152, 1920)), first);
        }
        assert_eq!(first, Some(Size::new(1920, 1080)));
    }
}
