use crate::models::{Game, NamedRef, NO_DESCRIPTION, UNKNOWN_TITLE};

use super::raw::{RawGame, RawNamed};

/// Map a raw upstream record onto the view model.
///
/// Total: every missing or malformed optional field is replaced by its
/// default, so this never fails.
pub fn normalize(raw: &RawGame) -> Game {
    Game {
        id: raw.id.unwrap_or_default(),
        title: non_blank(raw.name.as_deref()).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        metacritic: raw.metacritic.map(|score| score.clamp(0, 100) as u8),
        released: non_blank(raw.released.as_deref()),
        cover_image_url: non_blank(raw.background_image.as_deref()),
        genres: named_list(raw.genres.as_deref()),
        platforms: raw
            .platforms
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| named(entry.named()))
            .collect(),
        developers: named_list(raw.developers.as_deref()),
        tags: named_list(raw.tags.as_deref()),
        description: non_blank(raw.description_raw.as_deref())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        trailer_url: raw
            .clip
            .as_ref()
            .and_then(|clip| non_blank(clip.clip.as_deref()))
            .unwrap_or_default(),
    }
}

fn named_list(items: Option<&[RawNamed]>) -> Vec<NamedRef> {
    items
        .unwrap_or_default()
        .iter()
        .filter_map(named)
        .collect()
}

/// Entries without a usable name are dropped; a missing id becomes `0`.
pub(crate) fn named(raw: &RawNamed) -> Option<NamedRef> {
    let name = non_blank(raw.name.as_deref())?;
    Some(NamedRef::new(raw.id.unwrap_or_default(), name))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
