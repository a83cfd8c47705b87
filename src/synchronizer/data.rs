use serde::Serialize;

use crate::collector::Post;

pub(crate) const FEATURED_ICON: &str = "star";
pub(crate) const LATEST_ICON: &str = "newspaper";
pub(crate) const DEFAULT_ICON: &str = "file-text";

#[derive(Serialize, Debug)]
pub(crate) struct CardData<'a> {
    pub title: &'a str,
    pub href: String,
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub icon: &'a str,
}

impl<'a> CardData<'a> {
    pub fn new(post: &'a Post, icon: &'a str) -> Self {
        CardData {
            title: &post.title,
            href: format!("/{}", post.url),
            description: &post.description,
            image: post.image.as_deref(),
            icon,
        }
    }

    /// Category cards use the post's own `icon`, if it set one.
    pub fn with_post_icon(post: &'a Post) -> Self {
        Self::new(post, post.icon.as_deref().unwrap_or(DEFAULT_ICON))
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct CardGroupData<'a> {
    pub cards: Vec<CardData<'a>>,
}
