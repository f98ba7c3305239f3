//! Views
//!
//! View models for the cart page and the header badge, plus terminal rendering.

mod cart_view;
mod header;

pub use cart_view::{CartRow, CartView, CartViewError};
pub use header::HeaderBadge;

/// Resolves a stored image filename against the upload base URL.
///
/// Filenames that are already absolute URLs are returned unchanged. An empty filename has no
/// image.
pub fn image_url(base: &str, filename: &str) -> Option<String> {
    let filename = filename.trim();

    if filename.is_empty() {
        return None;
    }

    if filename.starts_with("http://") || filename.starts_with("https://") {
        return Some(filename.to_string());
    }

    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        filename.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:5000/uploads/categories";

    #[test]
    fn joins_base_and_filename() {
        assert_eq!(
            image_url(BASE, "ao-thun.jpg").as_deref(),
            Some("http://localhost:5000/uploads/categories/ao-thun.jpg")
        );
        assert_eq!(
            image_url(&format!("{BASE}/"), "/ao-thun.jpg").as_deref(),
            Some("http://localhost:5000/uploads/categories/ao-thun.jpg")
        );
    }

    #[test]
    fn keeps_absolute_urls() {
        assert_eq!(
            image_url(BASE, "https://cdn.example.com/a.jpg").as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn empty_filename_has_no_image() {
        assert_eq!(image_url(BASE, "  "), None);
    }
}
