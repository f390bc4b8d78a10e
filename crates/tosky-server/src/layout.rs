use maud::{html, Markup, PreEscaped, DOCTYPE};
use tosky::SiteConfig;

pub struct SeoMeta {
    pub title: String,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
}

impl SeoMeta {
    /// Meta for a page at `path`, falling back to the site-wide title and
    /// description.
    pub fn for_page(config: &SiteConfig, title: Option<String>, path: &str) -> Self {
        Self {
            title: title.unwrap_or_else(|| config.title.clone()),
            description: None,
            canonical_url: Some(format!("{}{}", config.origin, path)),
        }
    }

    pub fn render(&self, config: &SiteConfig) -> Markup {
        let formatted_title = if self.title == config.title {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, config.title)
        };

        let description = self
            .description
            .clone()
            .unwrap_or_else(|| config.description.clone());

        html! {
            title { (formatted_title) }
            meta name="description" content=(description);

            // Open Graph meta tags
            meta property="og:title" content=(formatted_title);
            meta property="og:description" content=(description);
            meta property="og:type" content="website";
            @if let Some(canonical_url) = &self.canonical_url {
                meta property="og:url" content=(canonical_url);
                link rel="canonical" href=(canonical_url);
            }

            // Twitter Card meta tags
            meta name="twitter:card" content="summary";
            meta name="twitter:title" content=(formatted_title);
            meta name="twitter:description" content=(description);
        }
    }
}

fn header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            div.container {
                a.site-name href="/" { h1 { (config.title) } }
                nav {
                    a href="/about" { "About" }
                    a href="/okx" { "Guide" }
                }
            }
        }
    }
}

fn footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p { (format!("© {}", config.title)) }
        }
    }
}

pub fn layout(main: Markup, seo: &SeoMeta, config: &SiteConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (seo.render(config))
            }
            body {
                (header(config))
                main.container {
                    (main)
                }
                (footer(config))
            }
        }
    }
}

/// Wraps a rendered HTML fragment (markdown output or a raw `page.html`
/// body) in the site layout.
pub fn content_page(body_html: String, seo: &SeoMeta, config: &SiteConfig) -> Markup {
    layout(
        html! {
            article.blog-content {
                (PreEscaped(body_html))
            }
        },
        seo,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config: SiteConfig =
            toml::from_str("origin = \"https://tosky.top\"\ntitle = \"Tosky\"").unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_layout_contains_doctype_and_meta() {
        let config = test_config();
        let seo = SeoMeta::for_page(&config, Some("About".to_string()), "/about");
        let markup = content_page("<p>hi</p>".to_string(), &seo, &config).into_string();

        assert!(markup.starts_with("<!DOCTYPE html>"));
        assert!(markup.contains("<title>About - Tosky</title>"));
        assert!(markup.contains("href=\"https://tosky.top/about\""));
        assert!(markup.contains("<p>hi</p>"));
    }

    #[test]
    fn test_site_title_is_not_doubled() {
        let config = test_config();
        let seo = SeoMeta::for_page(&config, None, "/");
        let markup = layout(html! { p { "home" } }, &seo, &config).into_string();

        assert!(markup.contains("<title>Tosky</title>"));
    }
}
