// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Metadata placeholders: `{title}`, `{author}`, `{camera}`, `{location}`

use super::{ResolveContext, ResolveOptions, ResolutionSource, ResolvedValue};
use crate::context::{FileContext, GpsCoordinates, ImageMetadata};
use crate::template::registry::{self, PlaceholderFamily};

pub fn is_metadata_placeholder(name: &str) -> bool {
    registry::family_of(name) == Some(PlaceholderFamily::Metadata)
}

pub fn resolve_metadata(
    name: &str,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> ResolvedValue {
    let image = ctx.file.image.as_ref();
    let found = match name {
        "title" => title(ctx.file),
        "author" => author(ctx.file),
        "camera" => image.and_then(camera).map(|v| (v, ResolutionSource::Exif)),
        "location" => image.and_then(location).map(|v| (v, ResolutionSource::Exif)),
        _ => None,
    };

    match found {
        Some((value, source)) => ResolvedValue::new(value, source),
        None => options.fallback(name),
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn title(file: &FileContext) -> Option<(String, ResolutionSource)> {
    non_empty(file.document.as_ref().and_then(|d| d.title.as_ref()))
        .map(|t| (t, ResolutionSource::Document))
}

fn author(file: &FileContext) -> Option<(String, ResolutionSource)> {
    non_empty(file.document.as_ref().and_then(|d| d.author.as_ref()))
        .map(|a| (a, ResolutionSource::Document))
        .or_else(|| {
            non_empty(file.image.as_ref().and_then(|i| i.artist.as_ref()))
                .map(|a| (a, ResolutionSource::Exif))
        })
}

/// Make and model, without repeating the make when the model already carries it
fn camera(image: &ImageMetadata) -> Option<String> {
    let make = non_empty(image.camera_make.as_ref());
    let model = non_empty(image.camera_model.as_ref());
    match (make, model) {
        (Some(make), Some(model)) => {
            if model.to_lowercase().starts_with(&make.to_lowercase()) {
                Some(model)
            } else {
                Some(format!("{} {}", make, model))
            }
        }
        (Some(make), None) => Some(make),
        (None, Some(model)) => Some(model),
        (None, None) => None,
    }
}

fn location(image: &ImageMetadata) -> Option<String> {
    non_empty(image.location.as_ref()).or_else(|| image.gps.map(format_gps))
}

fn format_gps(gps: GpsCoordinates) -> String {
    format!("{:.4}_{:.4}", gps.latitude, gps.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DocumentMetadata;

    fn image(make: Option<&str>, model: Option<&str>) -> ImageMetadata {
        ImageMetadata {
            camera_make: make.map(String::from),
            camera_model: model.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_camera_combines_make_and_model() {
        let split = image(Some("Canon"), Some("EOS R5"));
        assert_eq!(camera(&split).as_deref(), Some("Canon EOS R5"));
        let repeated = image(Some("Canon"), Some("Canon EOS R5"));
        assert_eq!(camera(&repeated).as_deref(), Some("Canon EOS R5"));
        assert_eq!(camera(&image(None, Some("iPhone 15"))).as_deref(), Some("iPhone 15"));
        assert_eq!(camera(&image(Some("  "), None)), None);
    }

    #[test]
    fn test_title_from_document() {
        let file = FileContext::new("/d/report.pdf").with_document(DocumentMetadata {
            title: Some("Quarterly Report".to_string()),
            ..Default::default()
        });
        let ctx = ResolveContext::new(&file, "{title}");
        let resolved = resolve_metadata("title", &ctx, &ResolveOptions::default());
        assert_eq!(resolved, ResolvedValue::new("Quarterly Report", ResolutionSource::Document));
    }

    #[test]
    fn test_author_falls_back_to_image_artist() {
        let file = FileContext::new("/p/a.jpg").with_image(ImageMetadata {
            artist: Some("Ana".to_string()),
            ..Default::default()
        });
        let ctx = ResolveContext::new(&file, "{author}");
        let resolved = resolve_metadata("author", &ctx, &ResolveOptions::default());
        assert_eq!(resolved, ResolvedValue::new("Ana", ResolutionSource::Exif));
    }

    #[test]
    fn test_location_prefers_place_name_then_gps() {
        let mut meta = ImageMetadata {
            gps: Some(GpsCoordinates { latitude: 48.85837, longitude: 2.294481 }),
            ..Default::default()
        };
        assert_eq!(location(&meta).as_deref(), Some("48.8584_2.2945"));

        meta.location = Some("Paris".to_string());
        assert_eq!(location(&meta).as_deref(), Some("Paris"));
    }

    #[test]
    fn test_missing_metadata_uses_fallback() {
        let file = FileContext::new("/p/a.jpg");
        let ctx = ResolveContext::new(&file, "{camera}");
        let mut options = ResolveOptions::default();
        options.fallbacks.insert("camera".to_string(), "unknown-camera".to_string());
        let resolved = resolve_metadata("camera", &ctx, &options);
        assert_eq!(resolved, ResolvedValue::new("unknown-camera", ResolutionSource::Fallback));
    }
}
