//! Markup rendering of selected records
//!
//! `UnitRenderer` is the seam the picker hands a chosen record to.
//! `HtmlRenderer` is the stock implementation producing the game unit
//! fragment; it returns an empty string for records it cannot render.

use url::Url;

use crate::error::{Result, UnitError};
use crate::units::{PicturePairRecord, PollRecord, QuizRecord};

/// Picture pair titles longer than this are cut and given an ellipsis.
pub const MAX_TITLE_CHARS: usize = 48;

const POLL_HEADING: &str = "Take a poll";
const QUIZ_HEADING: &str = "Play the quiz";
const PICTURE_GAME_HEADING: &str = "Which picture wins?";
const ELLIPSIS: &str = "...";

// == Renderer Trait ==
pub trait UnitRenderer: Send + Sync {
    fn render_poll(&self, poll: &PollRecord) -> String;
    fn render_quiz(&self, quiz: &QuizRecord) -> String;
    fn render_picture_pair(&self, pair: &PicturePairRecord) -> String;
}

/// Escapes text content; every markup-significant character is encoded.
fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Escapes a URL for a double-quoted attribute, leaving `/`, `=` and `?` readable.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        title.to_string()
    } else {
        let cut: String = title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}{}", cut, ELLIPSIS)
    }
}

// == HTML Renderer ==
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_url: Url,
    thumbnail_width: u32,
}

impl HtmlRenderer {
    pub fn new(site_url: &str, thumbnail_width: u32) -> Result<Self> {
        let site_url = Url::parse(site_url)
            .map_err(|e| UnitError::Config(format!("site url {:?}: {}", site_url, e)))?;
        if site_url.cannot_be_a_base() {
            return Err(UnitError::Config(format!(
                "site url {:?} cannot be used as a base",
                site_url.as_str()
            )));
        }
        Ok(Self {
            site_url,
            thumbnail_width,
        })
    }

    fn link(&self, segments: &[&str], query: &[(&str, String)]) -> String {
        // Segments go under the base path; a trailing slash on the base is dropped first
        let mut url = self.site_url.clone();
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url.into()
    }

    fn thumbnail(&self, image: &str) -> String {
        let width = format!("{}px", self.thumbnail_width);
        let src = self.link(&["thumb", &width, image], &[]);
        format!(
            r#"<img width="{}" alt="" src="{}"/>"#,
            self.thumbnail_width,
            escape_attribute(&src)
        )
    }

    fn quiz_link(&self, quiz: &QuizRecord) -> String {
        self.link(
            &["quiz"],
            &[
                ("questionGameAction", "renderPermalink".to_string()),
                ("permalinkID", quiz.id.to_string()),
            ],
        )
    }

    fn picture_game_link(&self, pair: &PicturePairRecord) -> String {
        self.link(
            &["picture-game"],
            &[
                ("picGameAction", "renderPermalink".to_string()),
                ("id", pair.id.to_string()),
            ],
        )
    }
}

fn present(image: &Option<String>) -> Option<&str> {
    image.as_deref().map(str::trim).filter(|name| !name.is_empty())
}

impl UnitRenderer for HtmlRenderer {
    fn render_poll(&self, poll: &PollRecord) -> String {
        let link = escape_attribute(&self.link(&["poll", &poll.title], &[]));
        let mut out = format!(
            r#"<div class="game-unit-container" data-unit-kind="poll" data-unit-id="{}"><h2>{}</h2><div class="poll-unit-title">{}</div>"#,
            poll.id,
            POLL_HEADING,
            escape_text(&poll.title)
        );

        if let Some(image) = present(&poll.image) {
            out.push_str(r#"<div class="poll-unit-image">"#);
            out.push_str(&self.thumbnail(image));
            out.push_str("</div>");
        }

        out.push_str(r#"<div class="poll-unit-choices">"#);
        for choice in &poll.choices {
            out.push_str(&format!(
                r#"<a href="{}" rel="nofollow"><input type="radio" name="poll_choice" value="{}"/> {}</a>"#,
                link,
                choice.id,
                escape_text(&choice.choice)
            ));
        }
        out.push_str("</div></div>");
        out
    }

    fn render_quiz(&self, quiz: &QuizRecord) -> String {
        let link = escape_attribute(&self.quiz_link(quiz));
        let mut out = format!(
            r#"<div class="game-unit-container" data-unit-kind="quiz" data-unit-id="{}"><h2>{}</h2><div class="quiz-unit-title"><a href="{}" rel="nofollow">{}</a></div>"#,
            quiz.id,
            QUIZ_HEADING,
            link,
            escape_text(&quiz.text)
        );

        if let Some(image) = present(&quiz.image) {
            out.push_str(&format!(
                r#"<div class="quiz-unit-image"><a href="{}" rel="nofollow">{}</a></div>"#,
                link,
                self.thumbnail(image)
            ));
        }

        out.push_str("</div>");
        out
    }

    fn render_picture_pair(&self, pair: &PicturePairRecord) -> String {
        let (img1, img2) = (pair.img1.trim(), pair.img2.trim());
        if img1.is_empty() || img2.is_empty() {
            return String::new();
        }

        let link = escape_attribute(&self.picture_game_link(pair));
        format!(
            r#"<div class="game-unit-container" data-unit-kind="picture-pair" data-unit-id="{}"><h2>{}</h2><div class="pg-unit-title">{}</div><div class="pg-unit-pictures"><div><a href="{}">{}</a></div><div><a href="{}">{}</a></div></div><div class="visualClear"></div></div>"#,
            pair.id,
            PICTURE_GAME_HEADING,
            escape_text(&truncate_title(&pair.title)),
            link,
            self.thumbnail(img1),
            link,
            self.thumbnail(img2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::PollChoice;

    fn renderer() -> HtmlRenderer {
        HtmlRenderer::new("https://games.example.org", 120).unwrap()
    }

    fn pair(img1: &str, img2: &str) -> PicturePairRecord {
        PicturePairRecord {
            id: 31,
            title: "Sunrise".to_string(),
            img1: img1.to_string(),
            img2: img2.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_rejects_unusable_site_url() {
        assert!(matches!(
            HtmlRenderer::new("not a url", 120),
            Err(UnitError::Config(_))
        ));
        assert!(matches!(
            HtmlRenderer::new("mailto:games@example.org", 120),
            Err(UnitError::Config(_))
        ));
    }

    #[test]
    fn test_picture_pair_missing_image_renders_nothing() {
        assert_eq!(renderer().render_picture_pair(&pair("", "b.png")), "");
        assert_eq!(renderer().render_picture_pair(&pair("a.png", "  ")), "");
    }

    #[test]
    fn test_picture_pair_renders_both_images() {
        let html = renderer().render_picture_pair(&pair("a.png", "b.png"));
        assert!(html.contains(r#"data-unit-id="31""#));
        assert!(html.contains("a.png"));
        assert!(html.contains("b.png"));
        assert_eq!(html.matches("<img").count(), 2);
    }

    #[test]
    fn test_long_title_is_truncated() {
        assert_eq!(truncate_title(&"x".repeat(48)), "x".repeat(48));
        assert_eq!(
            truncate_title(&"y".repeat(60)),
            format!("{}{}", "y".repeat(48), ELLIPSIS)
        );
    }

    #[test]
    fn test_quiz_text_is_escaped() {
        let quiz = QuizRecord {
            id: 7,
            text: "<script>alert(1)</script>".to_string(),
            image: None,
            created_at: None,
        };
        let html = renderer().render_quiz(&quiz);
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"data-unit-id="7""#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_quiz_with_image_has_thumbnail() {
        let quiz = QuizRecord {
            id: 7,
            text: "Capital".to_string(),
            image: Some("Paris.jpg".to_string()),
            created_at: None,
        };
        let html = renderer().render_quiz(&quiz);
        assert!(html.contains(r#"<img width="120""#));
        assert!(html.contains("Paris.jpg"));
    }

    #[test]
    fn test_poll_renders_every_choice() {
        let poll = PollRecord {
            id: 3,
            title: "Favourite season".to_string(),
            image: Some(String::new()),
            choices: vec![
                PollChoice {
                    id: 1,
                    choice: "Spring".to_string(),
                },
                PollChoice {
                    id: 2,
                    choice: "Autumn".to_string(),
                },
            ],
            created_at: None,
        };
        let html = renderer().render_poll(&poll);
        assert_eq!(html.matches(r#"name="poll_choice""#).count(), 2);
        assert!(html.contains("Spring"));
        assert!(html.contains("Autumn"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_links_keep_the_site_base_path() {
        let quiz = QuizRecord {
            id: 7,
            text: "Capital".to_string(),
            image: Some("P.jpg".to_string()),
            created_at: None,
        };

        for base in ["https://games.example.org/wiki/", "https://games.example.org/wiki"] {
            let html = HtmlRenderer::new(base, 80).unwrap().render_quiz(&quiz);
            assert!(
                html.contains(r#"href="https://games.example.org/wiki/quiz?questionGameAction=renderPermalink&amp;permalinkID=7""#),
                "unexpected markup for {}: {}",
                base,
                html
            );
            assert!(html.contains(r#"src="https://games.example.org/wiki/thumb/80px/P.jpg""#));
        }
    }

    #[test]
    fn test_root_site_url_links_from_root() {
        let html = renderer().render_picture_pair(&pair("a.png", "b.png"));
        assert!(html.contains(
            r#"href="https://games.example.org/picture-game?picGameAction=renderPermalink&amp;id=31""#
        ));
        assert!(html.contains(r#"src="https://games.example.org/thumb/120px/a.png""#));
    }

    #[test]
    fn test_escape_attribute_only_touches_markup_characters() {
        assert_eq!(
            escape_attribute(r#"https://x.org/a?b=1&c="2"<'>"#),
            "https://x.org/a?b=1&amp;c=&quot;2&quot;&lt;&#39;&gt;"
        );
    }
}
