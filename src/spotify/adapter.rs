//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If Spotify changes their response format, only this file and dto.rs
//! need to change.

use super::dto;
use crate::matching::domain::{AlbumHandle, AlbumRef, AlbumTrack, LookupError, TrackMatch};

/// Convert a search response into ranked candidates, keeping service order
pub fn to_matches(response: dto::SearchResponse) -> Result<Vec<TrackMatch>, LookupError> {
    response.tracks.items.into_iter().map(to_match).collect()
}

/// Convert one search hit
pub fn to_match(track: dto::Track) -> Result<TrackMatch, LookupError> {
    if track.track_number == 0 || track.disc_number == 0 {
        return Err(LookupError::InvalidResponse(format!(
            "track {:?} has position {}/{}",
            track.name, track.disc_number, track.track_number
        )));
    }

    Ok(TrackMatch {
        id: track.id.unwrap_or_default(),
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: to_album_ref(track.album),
        track_number: track.track_number,
        disc_number: track.disc_number,
    })
}

fn to_album_ref(album: dto::Album) -> AlbumRef {
    AlbumRef {
        name: album.name,
        release_date: album.release_date,
        artists: album.artists.into_iter().map(|a| a.name).collect(),
        image_urls: image_urls_by_size(album.images),
        handle: AlbumHandle(album.id),
    }
}

/// Order image URLs largest first.
///
/// Spotify already lists the widest image first; the sort is stable so
/// images without dimensions keep their relative position at the end.
fn image_urls_by_size(mut images: Vec<dto::Image>) -> Vec<String> {
    images.sort_by_key(|img| std::cmp::Reverse(img.width.unwrap_or(0)));
    images.into_iter().map(|img| img.url).collect()
}

/// Convert a page of album tracks
pub fn to_album_tracks(items: Vec<dto::AlbumTrack>) -> Vec<AlbumTrack> {
    items
        .into_iter()
        .map(|t| AlbumTrack {
            track_number: t.track_number,
            disc_number: t.disc_number,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_artist(name: &str) -> dto::Artist {
        dto::Artist {
            id: Some(format!("{}-id", name.to_lowercase())),
            name: name.to_string(),
        }
    }

    fn make_image(url: &str, width: Option<u32>) -> dto::Image {
        dto::Image {
            url: url.to_string(),
            height: width,
            width,
        }
    }

    fn make_track(name: &str) -> dto::Track {
        dto::Track {
            id: Some("trk".to_string()),
            name: name.to_string(),
            artists: vec![make_artist("Queen"), make_artist("David Bowie")],
            album: dto::Album {
                id: "alb".to_string(),
                name: "Hot Space".to_string(),
                release_date: "1982-05-21".to_string(),
                release_date_precision: Some("day".to_string()),
                artists: vec![make_artist("Queen")],
                images: vec![],
                href: None,
            },
            track_number: 11,
            disc_number: 1,
            duration_ms: None,
        }
    }

    #[test]
    fn test_convert_track() {
        let m = to_match(make_track("Under Pressure")).unwrap();

        assert_eq!(m.name, "Under Pressure");
        assert_eq!(m.artists, vec!["Queen", "David Bowie"]);
        assert_eq!(m.album.artists, vec!["Queen"]);
        assert_eq!(m.album.handle, AlbumHandle("alb".to_string()));
        assert_eq!(m.track_number, 11);
    }

    #[test]
    fn test_zero_position_is_invalid() {
        let mut track = make_track("Broken");
        track.disc_number = 0;

        assert!(matches!(to_match(track), Err(LookupError::InvalidResponse(_))));
    }

    #[test]
    fn test_images_largest_first() {
        let urls = image_urls_by_size(vec![
            make_image("small", Some(64)),
            make_image("unknown", None),
            make_image("large", Some(640)),
            make_image("medium", Some(300)),
        ]);

        assert_eq!(urls, vec!["large", "medium", "small", "unknown"]);
    }

    #[test]
    fn test_search_order_is_kept() {
        let response = dto::SearchResponse {
            tracks: dto::Paging {
                items: vec![make_track("First"), make_track("Second")],
                next: None,
                total: 2,
            },
        };

        let matches = to_matches(response).unwrap();

        assert_eq!(matches[0].name, "First");
        assert_eq!(matches[1].name, "Second");
    }
}
