use std::path::Path;

use handlebars::Handlebars;
use log::debug;
use serde::Serialize;

use crate::collector::Post;
use crate::error::{OrganizeError, Result};
use crate::synchronizer::data::{CardData, CardGroupData, FEATURED_ICON, LATEST_ICON};

const FEATURED: &str = "featured";
const LATEST: &str = "latest";
const CATEGORY: &str = "category";

const FEATURED_TEMPLATE: &str = r#"<Card
  title="{{title}}"
  icon="{{icon}}"
  href="{{href}}"
  {{#if image}}img="{{image}}"
  {{/if}}cta="Read more"
>
  {{description}}
</Card>
"#;

const LATEST_TEMPLATE: &str = r#"<CardGroup cols={2}>
{{#each cards}}
  <Card title="{{title}}" icon="{{icon}}" href="{{href}}">
    {{description}}
  </Card>
{{/each}}
</CardGroup>
"#;

const CATEGORY_TEMPLATE: &str = r#"<CardGroup cols={1}>
{{#each cards}}
  <Card title="{{title}}" icon="{{icon}}" href="{{href}}">
    {{description}}
  </Card>
{{/each}}
</CardGroup>
"#;

/// Renders post cards for the index regions.
pub(crate) struct CardRenderer {
    handlebars: Handlebars<'static>,
}

impl CardRenderer {
    /// Registers the built-in card templates. Any of `featured.hbs`,
    /// `latest.hbs` or `category.hbs` found in `template_dir` replaces the
    /// built-in one.
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, builtin) in [
            (FEATURED, FEATURED_TEMPLATE),
            (LATEST, LATEST_TEMPLATE),
            (CATEGORY, CATEGORY_TEMPLATE),
        ] {
            let custom = template_dir
                .map(|dir| dir.join(format!("{name}.hbs")))
                .filter(|path| path.is_file());
            let registered = match custom {
                Some(path) => {
                    debug!("using card template {path:?}");
                    handlebars.register_template_file(name, &path)
                }
                None => handlebars.register_template_string(name, builtin),
            };
            registered.map_err(|e| OrganizeError::Template {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(CardRenderer { handlebars })
    }

    pub fn featured(&self, post: &Post) -> Result<String> {
        self.render(FEATURED, &CardData::new(post, FEATURED_ICON))
    }

    pub fn latest(&self, posts: &[&Post]) -> Result<String> {
        let cards = posts.iter().map(|p| CardData::new(p, LATEST_ICON)).collect();
        self.render(LATEST, &CardGroupData { cards })
    }

    pub fn category(&self, posts: &[&Post]) -> Result<String> {
        let cards = posts.iter().map(|p| CardData::with_post_icon(p)).collect();
        self.render(CATEGORY, &CardGroupData { cards })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| OrganizeError::Template {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn post(title: &str, image: Option<&str>, icon: Option<&str>) -> Post {
        Post {
            title: title.to_string(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            description: format!("About {title}"),
            image: image.map(str::to_string),
            icon: icon.map(str::to_string),
            category: Some("Architecture".to_string()),
            category_slug: "architecture".to_string(),
            url: format!("categories/architecture/{}", title.to_lowercase()),
        }
    }

    #[test]
    fn featured_card_has_star_image_and_link() {
        let renderer = CardRenderer::new(None).unwrap();
        let card = renderer.featured(&post("Hello", Some("/img/a.png"), None)).unwrap();
        assert!(card.starts_with("<Card"));
        assert!(card.contains(r#"title="Hello""#));
        assert!(card.contains(r#"icon="star""#));
        assert!(card.contains(r#"href="/categories/architecture/hello""#));
        assert!(card.contains(r#"img="/img/a.png""#));
        assert!(card.contains("About Hello"));
        assert!(card.trim_end().ends_with("</Card>"));
    }

    #[test]
    fn featured_card_without_image_omits_img() {
        let renderer = CardRenderer::new(None).unwrap();
        let card = renderer.featured(&post("Hello", None, None)).unwrap();
        assert!(!card.contains("img="));
        assert!(card.contains(r#"cta="Read more""#));
    }

    #[test]
    fn titles_are_escaped() {
        let renderer = CardRenderer::new(None).unwrap();
        let card = renderer.featured(&post(r#"Say "hi""#, None, None)).unwrap();
        assert!(!card.contains(r#"title="Say "hi"""#));
        assert!(card.contains("&quot;hi&quot;"));
    }

    #[test]
    fn card_groups_keep_order_and_icons() {
        let renderer = CardRenderer::new(None).unwrap();
        let a = post("Alpha", None, Some("bolt"));
        let b = post("Beta", None, None);

        let latest = renderer.latest(&[&a, &b]).unwrap();
        assert!(latest.starts_with("<CardGroup cols={2}>"));
        assert!(latest.find("Alpha").unwrap() < latest.find("Beta").unwrap());
        assert_eq!(latest.matches(r#"icon="newspaper""#).count(), 2);

        let category = renderer.category(&[&a, &b]).unwrap();
        assert!(category.starts_with("<CardGroup cols={1}>"));
        assert!(category.contains(r#"icon="bolt""#));
        assert!(category.contains(r#"icon="file-text""#));
    }

    #[test]
    fn empty_group_renders_only_the_wrapper() {
        let renderer = CardRenderer::new(None).unwrap();
        let group = renderer.category(&[]).unwrap();
        assert!(group.contains("<CardGroup cols={1}>"));
        assert!(group.contains("</CardGroup>"));
        assert!(!group.contains("<Card "));
    }

    #[test]
    fn templates_can_be_overridden_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("featured.hbs"), "FEATURED {{title}}").unwrap();
        let renderer = CardRenderer::new(Some(dir.path())).unwrap();
        let p = post("Hello", None, None);
        assert_eq!(renderer.featured(&p).unwrap(), "FEATURED Hello");
        assert!(renderer.latest(&[&p]).unwrap().contains("<CardGroup"));
    }
}
