#[cfg(test)]
pub mod test {
    //! One site config written in each supported format. All three decode to
    //! the same tree.

    pub const SAMPLE_TOML: &str = r#"
[markata-go]
title = "My Site"
url = "https://example.com"
output_dir = "public"
concurrency = 4

[markata-go.glob]
patterns = ["posts/**/*.md", "pages/*.md"]
use_gitignore = true

[markata-go.feed_defaults]
items_per_page = 10

[[markata-go.feeds]]
slug = "blog"
title = "Blog"
filter = "published == True"

[markata-go.feeds.formats]
html = true
rss = true
"#;

    pub const SAMPLE_YAML: &str = r#"
markata-go:
  title: My Site
  url: https://example.com
  output_dir: public
  concurrency: 4
  glob:
    patterns:
      - "posts/**/*.md"
      - "pages/*.md"
    use_gitignore: true
  feed_defaults:
    items_per_page: 10
  feeds:
    - slug: blog
      title: Blog
      filter: "published == True"
      formats:
        html: true
        rss: true
"#;

    pub const SAMPLE_JSON: &str = r#"{
  "markata-go": {
    "title": "My Site",
    "url": "https://example.com",
    "output_dir": "public",
    "concurrency": 4,
    "glob": {
      "patterns": ["posts/**/*.md", "pages/*.md"],
      "use_gitignore": true
    },
    "feed_defaults": {
      "items_per_page": 10
    },
    "feeds": [
      {
        "slug": "blog",
        "title": "Blog",
        "filter": "published == True",
        "formats": { "html": true, "rss": true }
      }
    ]
  }
}
"#;

    /// `SAMPLE_TOML` parsed into the typed config, for tests that start from
    /// a realistic non-default value.
    pub fn sample_config() -> crate::config::MarkataConfig {
        let table: toml::Table = toml::from_str(SAMPLE_TOML).unwrap();
        let site = table["markata-go"].clone();
        site.try_into().unwrap()
    }

    #[test]
    fn sample_config_parses() {
        let config = sample_config();
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.feeds[0].items_per_page, None);
        assert_eq!(config.assets_dir, "static");
    }
}
