use std::fmt::Write;

use cinefav_core::config::ImageConfig;
use cinefav_core::favorites::FavoriteEntry;
use cinefav_core::models::MovieDetail;
use cinefav_core::screen::{ScreenSnapshot, CONFIRMATION_MESSAGE};

/// Poster URL for a detail, falling back to the placeholder image when the
/// catalog has no poster.
pub fn poster_url(detail: &MovieDetail, images: &ImageConfig) -> String {
    if detail.has_poster() {
        format!(
            "{}/{}",
            images.base_url.trim_end_matches('/'),
            detail.poster_path.trim_start_matches('/')
        )
    } else {
        images.placeholder_url.clone()
    }
}

/// Text rendering of one detail screen.
pub fn render_screen(snapshot: &ScreenSnapshot, images: &ImageConfig) -> String {
    if snapshot.loading {
        return format!("[{}] Loading...\n", snapshot.movie_id);
    }
    if let Some(error) = &snapshot.error {
        return format!("[{}] {error}\n", snapshot.movie_id);
    }

    let detail = &snapshot.detail;
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.title);
    let _ = writeln!(out, "  Popularity: {}", detail.popularity.floor());
    let _ = writeln!(out, "  Votes: {}", detail.vote_count);
    let _ = writeln!(out, "  Poster: {}", poster_url(detail, images));

    if detail.overview.is_empty() {
        let _ = writeln!(out, "  No overview available.");
    } else {
        let _ = writeln!(out, "  Description: {}", detail.overview);
    }

    let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
    let _ = writeln!(out, "  Genres: {}", genres.join(", "));
    let countries: Vec<&str> = detail
        .production_countries
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let _ = writeln!(out, "  Production: {}", countries.join(", "));
    let _ = writeln!(
        out,
        "  Favorite: {}",
        if snapshot.is_favorite { "yes" } else { "no" }
    );

    if snapshot.confirmation_visible {
        let _ = writeln!(out, "{CONFIRMATION_MESSAGE}");
    }
    out
}

/// Favorites list, oldest first.
pub fn render_favorites(entries: &[FavoriteEntry]) -> String {
    if entries.is_empty() {
        return "No favorite movies yet.\n".to_string();
    }
    let mut out = String::from("Favorites:\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "  {} ({}) added {}",
            entry.detail.title,
            entry.detail.id,
            entry.added_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    out
}
