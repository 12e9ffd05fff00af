use anyhow::Result;

use crate::model::{Artist, ImageTagEntry, NewCatalogEntry, TagKind};
use crate::store::traits::Store;

/// Load a small bilingual demo dataset through the store.
///
/// Intended for local development (gated behind LOAD_SEED_DATA in main).
/// Running it twice creates duplicate catalog rows since ids are
/// store-assigned; wipe the database between runs.
pub async fn load_seed_data<S: Store + ?Sized>(store: &S) -> Result<()> {
    let styles = vec![
        NewCatalogEntry {
            name_ja: "和彫り".to_string(),
            name_en: "Japanese Traditional".to_string(),
        },
        NewCatalogEntry {
            name_ja: "ブラック＆グレー".to_string(),
            name_en: "Black & Gray".to_string(),
        },
        NewCatalogEntry {
            name_ja: "トライバル".to_string(),
            name_en: "Tribal".to_string(),
        },
        NewCatalogEntry {
            name_ja: "オールドスクール".to_string(),
            name_en: "Old School".to_string(),
        },
    ];
    let mut style_ids = Vec::new();
    for style in styles {
        let entry = store.create_catalog_entry(TagKind::Style, style).await?;
        style_ids.push(entry.id);
    }

    let motifs = vec![
        NewCatalogEntry {
            name_ja: "龍".to_string(),
            name_en: "Dragon".to_string(),
        },
        NewCatalogEntry {
            name_ja: "鯉".to_string(),
            name_en: "Koi".to_string(),
        },
        NewCatalogEntry {
            name_ja: "桜".to_string(),
            name_en: "Cherry Blossom".to_string(),
        },
    ];
    let mut motif_ids = Vec::new();
    for motif in motifs {
        let entry = store.create_catalog_entry(TagKind::Motif, motif).await?;
        motif_ids.push(entry.id);
    }

    // One artist on the current per-image model.
    let mut horikane = Artist::new("彫兼 (Horikane)".to_string());
    horikane.image_styles = vec![
        ImageTagEntry::new(
            "https://images.example.com/horikane/backpiece.jpg",
            vec![style_ids[0], style_ids[1]],
        ),
        ImageTagEntry::new(
            "https://images.example.com/horikane/sleeve.jpg",
            vec![style_ids[0]],
        ),
    ];
    horikane.image_motifs = vec![ImageTagEntry::new(
        "https://images.example.com/horikane/backpiece.jpg",
        vec![motif_ids[0], motif_ids[2]],
    )];
    horikane.styles = vec!["和彫り".to_string(), "ブラック＆グレー".to_string()];
    store.upsert_artist(horikane).await?;

    // One artist still on the legacy artist-level fields only.
    let mut legacy = Artist::new("Ink Atelier Shibuya".to_string());
    legacy.style_ids = vec![style_ids[2], style_ids[3]];
    legacy.styles = vec!["トライバル".to_string(), "オールドスクール".to_string()];
    store.upsert_artist(legacy).await?;

    Ok(())
}
