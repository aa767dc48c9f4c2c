//! Informational pages: about, research write-ups, legal and contact.
//!
//! Page bodies are authored in the same plain-text style as posts and go
//! through the same formatter, so a short line ending in `:` becomes a
//! heading and a line with a statistic becomes a key finding.

use crate::blocks::render_body;
use crate::templates::{PostCard, SiteMeta};
use askama::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Standalone,
    /// Lists every [`PageKind::Research`] page
    ResearchIndex,
    Research,
}

#[derive(Debug)]
pub struct InfoPage {
    /// Route, with leading and trailing slash
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: PageKind,
    pub body: &'static str,
}

pub const PAGES: &[InfoPage] = &[
    InfoPage {
        path: "/about/",
        title: "About Dating Hub",
        description: "Who we are and why we study online dating.",
        kind: PageKind::Standalone,
        body: "Our Mission:\n\n\
               Dating Hub is an independent research project that studies how people meet, \
               talk and build relationships online.\n\n\
               We publish our findings openly so daters, researchers and app makers can \
               make better decisions.\n\n\
               The Team:\n\n\
               The Dating Hub Research Team combines survey research, data analysis and \
               relationship psychology.",
    },
    InfoPage {
        path: "/research/",
        title: "Research",
        description: "Studies and reports from the Dating Hub Research Team.",
        kind: PageKind::ResearchIndex,
        body: "Each study below explains what we asked, who answered and what we found. \
               Methodology and ethics apply to every study.",
    },
    InfoPage {
        path: "/research/micromance/",
        title: "Micromance: Small Gestures, Big Signals",
        description: "How small everyday gestures sustain modern relationships.",
        kind: PageKind::Research,
        body: "What Is Micromance:\n\n\
               Micromance describes small, frequent gestures such as a saved meme, a \
               coffee order remembered or a quick check-in message.\n\n\
               Key Finding: couples who report daily small gestures also report higher \
               satisfaction than couples who rely on occasional grand gestures.\n\n\
               The Takeaway:\n\n\
               Consistency matters more than scale.",
    },
    InfoPage {
        path: "/research/ai-matchmaking/",
        title: "AI Matchmaking",
        description: "How recommendation algorithms shape who we meet.",
        kind: PageKind::Research,
        body: "How Matching Works:\n\n\
               Most apps rank profiles using stated preferences, behaviour and the \
               behaviour of similar users.\n\n\
               Key Finding: users trust algorithmic matches more when the app explains \
               why a match was suggested.\n\n\
               Open Questions:\n\n\
               Ranking systems can reinforce existing biases, and few apps publish how \
               they measure fairness.",
    },
    InfoPage {
        path: "/research/digital-boundaries/",
        title: "Digital Boundaries",
        description: "Phones, location sharing and privacy inside relationships.",
        kind: PageKind::Research,
        body: "Why Boundaries Matter:\n\n\
               Shared passwords, location tracking and read receipts change how trust \
               works between partners.\n\n\
               Key Finding: couples who talk about device rules early report fewer \
               conflicts about them later.\n\n\
               Starting the Conversation:\n\n\
               Agree on what is shared, what is private and how to revisit the rules.",
    },
    InfoPage {
        path: "/research/methodology/",
        title: "Research Methodology",
        description: "How we collect, clean and analyse survey data.",
        kind: PageKind::Research,
        body: "Data Collection:\n\n\
               Surveys are voluntary and anonymous unless a participant asks to be \
               contacted.\n\n\
               Analysis:\n\n\
               We report sample sizes with every figure and avoid claims the data cannot \
               support.",
    },
    InfoPage {
        path: "/research/ethics/",
        title: "Research Ethics",
        description: "Consent, privacy and the limits of what we publish.",
        kind: PageKind::Research,
        body: "Our Commitments:\n\n\
               Participants give informed consent and may withdraw at any time.\n\n\
               We never publish data that could identify an individual.",
    },
    InfoPage {
        path: "/tools/data-library/",
        title: "Data Library",
        description: "Summary tables and charts from our published studies.",
        kind: PageKind::Standalone,
        body: "The data library collects the summary tables behind our research posts.\n\n\
               Raw responses are never published. Aggregates with fewer than twenty \
               respondents are suppressed.",
    },
    InfoPage {
        path: "/tools/privacy/",
        title: "Privacy Policy",
        description: "What we collect and how we use it.",
        kind: PageKind::Standalone,
        body: "What We Collect:\n\n\
               Survey answers and the email address you give us so we can send your \
               recommendations.\n\n\
               How We Use It:\n\n\
               Your email is used only to reply to your request. Answers are analysed \
               in aggregate.",
    },
    InfoPage {
        path: "/tools/terms/",
        title: "Terms of Use",
        description: "The terms that apply to using this site.",
        kind: PageKind::Standalone,
        body: "Content on this site is provided for general information and is not \
               professional advice.\n\n\
               Recommendations are based on the answers you give and carry no guarantee \
               of any outcome.",
    },
    InfoPage {
        path: "/contact/",
        title: "Contact Us",
        description: "Get in touch with the Dating Hub Research Team.",
        kind: PageKind::Standalone,
        body: "Questions about our research, press enquiries or data requests are \
               welcome.\n\n\
               Email the team and we will reply within three business days.",
    },
];

pub fn find_page(path: &str) -> Option<&'static InfoPage> {
    PAGES.iter().find(|page| page.path == path)
}

/// Research write-ups in menu order
pub fn research_pages() -> impl Iterator<Item = &'static InfoPage> {
    PAGES.iter().filter(|page| page.kind == PageKind::Research)
}

#[derive(Debug, Clone)]
pub struct PageLink {
    pub title: String,
    pub url: String,
    pub description: String,
}

impl From<&InfoPage> for PageLink {
    fn from(page: &InfoPage) -> Self {
        Self {
            title: page.title.to_string(),
            url: page.path.to_string(),
            description: page.description.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct InfoPageTemplate {
    pub site: SiteMeta,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Study list on the research index, sibling studies on a study page
    pub links: Vec<PageLink>,
    pub links_heading: String,
}

impl InfoPageTemplate {
    pub fn build(site: SiteMeta, page: &InfoPage) -> Self {
        let (links, links_heading) = match page.kind {
            PageKind::Standalone => (Vec::new(), String::new()),
            PageKind::ResearchIndex => (
                research_pages().map(PageLink::from).collect(),
                "Studies".to_string(),
            ),
            PageKind::Research => (
                research_pages()
                    .filter(|other| other.path != page.path)
                    .map(PageLink::from)
                    .collect(),
                "More research".to_string(),
            ),
        };

        Self {
            site,
            title: page.title.to_string(),
            description: page.description.to_string(),
            content: render_body(page.body),
            links,
            links_heading,
        }
    }
}

/// Landing page: latest posts, research links and the survey call to action
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site: SiteMeta,
    pub latest: Vec<PostCard>,
    pub research: Vec<PageLink>,
}

impl HomeTemplate {
    pub fn new(site: SiteMeta, latest: Vec<PostCard>) -> Self {
        Self {
            site,
            latest,
            research: research_pages().map(PageLink::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn site() -> SiteMeta {
        SiteMeta {
            name: "Dating Hub".into(),
            description: "Research".into(),
            url: "https://example.com".into(),
            year: 2026,
            google_analytics_id: None,
        }
    }

    #[test]
    fn test_paths_are_unique_and_slash_terminated() {
        let mut seen = HashSet::new();
        for page in PAGES {
            assert!(page.path.starts_with('/') && page.path.ends_with('/'), "{}", page.path);
            assert!(seen.insert(page.path), "duplicate {}", page.path);
        }
    }

    #[test]
    fn test_research_index_lists_studies() {
        let index = find_page("/research/").unwrap();
        let html = InfoPageTemplate::build(site(), index).render().unwrap();
        for study in research_pages() {
            assert!(html.contains(study.path), "missing {}", study.path);
        }
        assert!(html.contains("Studies"));
    }

    #[test]
    fn test_study_page_formats_body_and_links_siblings() {
        let page = find_page("/research/micromance/").unwrap();
        let html = InfoPageTemplate::build(site(), page).render().unwrap();
        assert!(html.contains("<h3 class=\"content-heading\">What Is Micromance:</h3>"));
        assert!(html.contains("<div class=\"key-finding\">Key Finding:"));
        assert!(html.contains("/research/ai-matchmaking/"));
        assert!(!html.contains("href=\"/research/micromance/\""));
    }

    #[test]
    fn test_home_without_posts() {
        let html = HomeTemplate::new(site(), Vec::new()).render().unwrap();
        assert!(html.contains("No posts yet."));
        assert!(html.contains("/tools/dating-recommendations/"));
        assert!(html.contains("/research/ethics/"));
    }

    #[test]
    fn test_unknown_page() {
        assert!(find_page("/research/astrology/").is_none());
    }
}
