use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static OG_IMAGE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:image'], meta[name='og:image']").expect("valid selector")
});
static TWITTER_IMAGE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "meta[name='twitter:image'], meta[property='twitter:image'], meta[name='twitter:image:src']",
    )
    .expect("valid selector")
});
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid selector"));

/// File names of decoration rather than content photos. Keywords must stand
/// alone between `-`, `_`, `.`, digits or the ends of the name, so
/// "moule-silicone.jpg" is not an icon.
static ICON_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[-_.])(?:logo|icon|favicon|sprite|avatar|badge|spinner|loader|loading|pixel|placeholder|blank|emoji|spacer)s?(?:[-_.\d]|$)|\.(?:svg|ico|gif)$",
    )
    .expect("valid regex")
});

/// Attributes holding an image source, lazy-loading variants included
const SOURCE_ATTRIBUTES: [&str; 4] = ["src", "data-src", "data-lazy-src", "data-original"];

/// Picks the page's main image.
///
/// Priority: `og:image`, then `twitter:image`, then the first `<img>` that
/// looks like a content photo. An image is rejected as an icon when it
/// declares a width or height below `min_size` pixels, or when its file name
/// looks like a logo, icon, sprite or tracking pixel. Undeclared dimensions
/// do not disqualify an image.
pub struct ImageResolver {
    min_size: u32,
}

impl ImageResolver {
    pub fn new(min_size: u32) -> Self {
        Self { min_size }
    }

    /// The best image URL, absolute against `base` (the final page URL).
    pub fn resolve(&self, document: &Html, base: &Url) -> Option<Url> {
        if let Some(url) = first_meta_content(document, &OG_IMAGE, base) {
            debug!("Image from og:image: {}", url);
            return Some(url);
        }
        if let Some(url) = first_meta_content(document, &TWITTER_IMAGE, base) {
            debug!("Image from twitter:image: {}", url);
            return Some(url);
        }

        let url = document
            .select(&IMG)
            .filter(|img| !self.is_too_small(img))
            .filter_map(|img| image_source(img, base))
            .find(|url| !looks_like_icon(url));
        if let Some(url) = &url {
            debug!("Image from page content: {}", url);
        }
        url
    }

    fn is_too_small(&self, img: &ElementRef) -> bool {
        ["width", "height"]
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .filter_map(declared_pixels)
            .any(|size| size < self.min_size)
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Resolve an image reference against the page URL; only http(s) results count.
pub fn absolutize(raw: &str, base: &Url) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }
    let url = base.join(raw).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

fn first_meta_content(document: &Html, selector: &Selector, base: &Url) -> Option<Url> {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| absolutize(content, base))
}

fn image_source(img: ElementRef, base: &Url) -> Option<Url> {
    SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find_map(|src| absolutize(src, base))
}

fn looks_like_icon(url: &Url) -> bool {
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    ICON_FILENAME.is_match(file_name)
}

/// "120", "120px"; percentages and garbage are ignored.
fn declared_pixels(value: &str) -> Option<u32> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    value.parse::<f32>().ok().filter(|v| *v >= 0.0).map(|v| v as u32)
}
