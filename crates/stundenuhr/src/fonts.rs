use std::path::Path;

use stundenuhr_engine::text::{FontId, FontSystem};

/// Bold serif faces first, then regular sans faces as a fallback.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Bold.ttf",
    "/usr/share/fonts/noto/NotoSerif-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSerif-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Bold.ttf",
    "C:\\Windows\\Fonts\\timesbd.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Loads the first usable numeral font from the system.
pub fn load_numeral_font(fonts: &mut FontSystem) -> Option<FontId> {
    let found = load_first(fonts, FONT_CANDIDATES.iter().map(Path::new));
    if found.is_none() {
        log::warn!("no numeral font found; the face is drawn without numerals");
    }
    found
}

fn load_first<'p>(
    fonts: &mut FontSystem,
    candidates: impl IntoIterator<Item = &'p Path>,
) -> Option<FontId> {
    for path in candidates {
        let Ok(bytes) = std::fs::read(path) else { continue };
        match fonts.load_font(&bytes) {
            Ok(id) => {
                log::info!("numeral font: {}", path.display());
                return Some(id);
            }
            Err(e) => log::warn!("skipping {}: {e}", path.display()),
        }
    }
    None
}
