//! Fixed headline set served when no API credential is configured.

use chrono::Utc;

use crate::storage::{Article, Source};

/// The stand-in result set for keyless operation: three articles, filtered
/// by the same substring rule the offline cache path uses.
pub(crate) fn sample_headlines() -> Vec<Article> {
    let now = Utc::now();
    vec![
        Article {
            url: "https://example.com/1".to_string(),
            title: "Advanced Client-Side Caching Techniques".to_string(),
            description:
                "Learn how to build high-performance PWAs using Service Workers and IndexedDB."
                    .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1517694712202-14dd9538aa97".to_string(),
            ),
            published_at: now,
            source: Source {
                name: "Tech News".to_string(),
            },
        },
        Article {
            url: "https://example.com/2".to_string(),
            title: "Offline-First Development with React".to_string(),
            description:
                "A comprehensive guide to building reliable web applications that work without internet."
                    .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1555066931-4365d14bab8c".to_string(),
            ),
            published_at: now,
            source: Source {
                name: "Dev Journal".to_string(),
            },
        },
        Article {
            url: "https://example.com/3".to_string(),
            title: "The Future of PWAs in 2025".to_string(),
            description: "Exploring upcoming features and best practices for progressive web apps."
                .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1498050108023-c5249f4df085".to_string(),
            ),
            published_at: now,
            source: Source {
                name: "Web Monthly".to_string(),
            },
        },
    ]
}
