// src/checks/rules.rs
// =============================================================================
// One predicate per automated check.
//
// Every predicate takes the CheckContext explicitly and returns
// Result<Verdict, CheckError>. Selector and probe problems propagate with `?`
// and are turned into a `fail` result by the registry; everything else is
// decided here as pass / warn / fail with a message a site owner can act on.
// =============================================================================

use scraper::ElementRef;
use url::Url;

use super::robots::{has_google_publisher, summarize_robots};
use super::{CheckContext, CheckError, CheckKind, Probe, Verdict};
use crate::document::{count_words, element_text, visible_text, Document};

const PRIVACY_KEYWORDS: &[&str] = &[
    "privacy",
    "datenschutz",
    "privacidad",
    "confidentialit",
    "data-protection",
    "data protection",
    "gdpr",
];
const TERMS_KEYWORDS: &[&str] = &[
    "terms",
    "conditions",
    "/tos",
    "legal",
    "disclaimer",
    "nutzungsbedingungen",
];
const ABOUT_KEYWORDS: &[&str] = &["about", "who-we-are", "who we are", "our-story", "our story"];
const CONTACT_KEYWORDS: &[&str] = &["contact", "mailto:", "get in touch", "support", "reach us"];

const NAVIGATION_REGIONS: &str =
    "nav, header, [role=navigation], .nav, .navbar, .menu, #menu, .navigation, #navigation";
const MAIN_CONTENT_REGIONS: &[&str] = &[
    "article",
    "main",
    "[role=main]",
    ".post",
    ".post-content",
    ".entry-content",
    ".content",
    "#content",
    "#main",
];

const ERROR_PHRASES: &[&str] = &[
    "404 not found",
    "page not found",
    "500 internal server error",
    "internal server error",
    "403 forbidden",
    "access denied",
    "this site can't be reached",
    "service unavailable",
    "under construction",
    "coming soon",
    "domain is for sale",
    "account suspended",
];

const SOCIAL_PLATFORMS: &[(&str, &[&str])] = &[
    ("Facebook", &["facebook.com", "fb.com"]),
    ("Twitter/X", &["twitter.com", "x.com"]),
    ("Instagram", &["instagram.com"]),
    ("LinkedIn", &["linkedin.com"]),
    ("YouTube", &["youtube.com", "youtu.be"]),
    ("Pinterest", &["pinterest.com"]),
    ("TikTok", &["tiktok.com"]),
];

const ANALYTICS_SIGNATURES: &[&str] = &[
    "googletagmanager.com",
    "google-analytics.com",
    "gtag(",
    "analytics.js",
    "ga('create'",
    "plausible.io",
    "matomo",
    "piwik",
    "static.cloudflareinsights.com",
    "clarity.ms",
    "hotjar",
    "usefathom.com",
    "cdn.segment.com",
];

const RESPONSIVE_FRAMEWORKS: &[&str] = &["bootstrap", "tailwind", "foundation", "bulma"];

// Dispatches a check kind to its predicate
//
// Manual kinds are filtered out by the registry before they get here.
pub fn evaluate(kind: CheckKind, ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
    match kind {
        CheckKind::SecureConnection => secure_connection(ctx),
        CheckKind::HttpsRedirect => https_redirect(ctx),
        CheckKind::TitleTag => title_tag(ctx.document),
        CheckKind::MetaDescription => meta_description(ctx.document),
        CheckKind::RobotsTxt => robots_txt(ctx.robots),
        CheckKind::Navigation => navigation(ctx.document),
        CheckKind::PrivacyPolicy => privacy_policy(ctx.document),
        CheckKind::TermsOfService => terms_of_service(ctx.document),
        CheckKind::AboutAndContact => about_and_contact(ctx.document),
        CheckKind::MobileResponsive => mobile_responsive(ctx.document),
        CheckKind::ContentVolume => content_volume(ctx.document),
        CheckKind::HeadingStructure => heading_structure(ctx.document),
        CheckKind::ImageAltText => image_alt_text(ctx.document),
        CheckKind::LanguageDeclaration => language_declaration(ctx.document),
        CheckKind::Favicon => favicon(ctx.document),
        CheckKind::PageLoadSpeed => Ok(page_load_speed(ctx.page.elapsed_ms)),
        CheckKind::ErrorPage => error_page(ctx.document),
        CheckKind::SocialLinks => social_links(ctx.document),
        CheckKind::Analytics => analytics(ctx.document),
        CheckKind::AdsTxt => Ok(ads_txt(ctx.ads_txt)),
        CheckKind::StructuredData => structured_data(ctx.document),
        CheckKind::MainContentVolume => main_content_volume(ctx.document),
        CheckKind::ContentOriginality | CheckKind::PolicyCompliance | CheckKind::UserExperience => {
            Err(CheckError::Unevaluable(
                "manual checks cannot be evaluated automatically".to_string(),
            ))
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, CheckError> {
    Url::parse(raw).map_err(|e| CheckError::Unevaluable(format!("invalid URL {}: {}", raw, e)))
}

fn secure_connection(ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
    let final_url = parse_url(&ctx.page.final_url)?;
    Ok(if final_url.scheme() == "https" {
        Verdict::pass("Site is served over HTTPS")
    } else {
        Verdict::fail("Site is not served over HTTPS. Ad networks require a valid SSL certificate.")
    })
}

fn https_redirect(ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
    let requested = parse_url(ctx.requested_url)?;
    let final_url = parse_url(&ctx.page.final_url)?;

    // Wherever we started, we did not end up on https
    if final_url.scheme() != "https" {
        return Ok(Verdict::fail(
            "HTTP traffic is not redirected to HTTPS. Add a permanent redirect to the secure version.",
        ));
    }
    if requested.scheme() == "https" {
        return Ok(Verdict::pass("Site loads directly over HTTPS"));
    }
    if same_site(&requested, &final_url) {
        Ok(Verdict::pass("HTTP requests are redirected to HTTPS"))
    } else {
        Ok(Verdict::warn(format!(
            "HTTP redirects to HTTPS on a different host ({})",
            final_url.host_str().unwrap_or_default()
        )))
    }
}

// Hosts match once a leading "www." is ignored
fn same_site(a: &Url, b: &Url) -> bool {
    let strip = |url: &Url| {
        url.host_str()
            .unwrap_or_default()
            .trim_start_matches("www.")
            .to_ascii_lowercase()
    };
    strip(a) == strip(b)
}

fn title_tag(document: &Document) -> Result<Verdict, CheckError> {
    // Only the first <title> counts, like in browsers
    let title = document
        .first("title")?
        .map(|element| element_text(&element))
        .unwrap_or_default();
    let length = title.chars().count();

    Ok(if title.is_empty() {
        Verdict::fail("Missing <title> tag")
    } else if length < 10 {
        Verdict::fail(format!("Title is too short ({} characters, minimum 10)", length))
    } else if length > 60 {
        Verdict::warn(format!(
            "Title is long ({} characters); search results truncate after about 60",
            length
        ))
    } else {
        Verdict::pass(format!("Title length is good ({} characters)", length))
    })
}

fn meta_description(document: &Document) -> Result<Verdict, CheckError> {
    let description = document
        .attr("meta[name=description i]", "content")?
        .unwrap_or_default();
    let length = description.chars().count();

    Ok(if description.is_empty() {
        Verdict::fail("Missing meta description")
    } else if length < 120 {
        Verdict::warn(format!(
            "Meta description is short ({} characters, aim for 120-160)",
            length
        ))
    } else if length > 160 {
        Verdict::warn(format!(
            "Meta description is long ({} characters, aim for 120-160)",
            length
        ))
    } else {
        Verdict::pass(format!("Meta description length is good ({} characters)", length))
    })
}

// Body of a probe when it answered with a success status
fn probe_body(probe: &Probe) -> Result<&str, String> {
    match probe {
        Ok(outcome) if outcome.is_success() => Ok(&outcome.body),
        Ok(outcome) => Err(format!("HTTP {}", outcome.status_code)),
        Err(e) => Err(e.to_string()),
    }
}

fn robots_txt(probe: &Probe) -> Result<Verdict, CheckError> {
    let body = match probe_body(probe) {
        Ok(body) => body,
        Err(reason) => {
            return Ok(Verdict::warn(format!(
                "robots.txt could not be retrieved ({}). Add one that allows ad crawlers.",
                reason
            )))
        }
    };

    let summary = summarize_robots(body);
    // Blocking beats everything: a sitemap does not help if nobody may crawl
    Ok(if !summary.blocked_agents.is_empty() {
        Verdict::fail(format!(
            "robots.txt blocks the whole site for: {}",
            summary.blocked_agents.join(", ")
        ))
    } else if summary.has_sitemap {
        Verdict::pass("robots.txt allows crawling and declares a sitemap")
    } else {
        Verdict::warn("robots.txt allows crawling but does not declare a sitemap")
    })
}

fn navigation(document: &Document) -> Result<Verdict, CheckError> {
    let regions = document.select(NAVIGATION_REGIONS)?;
    if regions.is_empty() {
        return Ok(Verdict::fail("No navigation menu detected"));
    }

    // Links inside nested regions (a nav in a header) are counted once per match
    let links = document.count(&link_selector_within(NAVIGATION_REGIONS))?;
    Ok(if links >= 5 {
        Verdict::pass(format!("Navigation menu with {} links", links))
    } else if links >= 3 {
        Verdict::warn(format!("Navigation menu is thin ({} links)", links))
    } else {
        Verdict::fail(format!(
            "Navigation menu has only {} links; visitors need a clear site structure",
            links
        ))
    })
}

// "nav, header" -> "nav a[href], header a[href]"
fn link_selector_within(regions: &str) -> String {
    regions
        .split(',')
        .map(|region| format!("{} a[href]", region.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

// True when some link's href or text contains one of the keywords
fn has_keyword_link(document: &Document, keywords: &[&str]) -> Result<bool, CheckError> {
    Ok(document
        .select("a[href]")?
        .iter()
        .any(|link| link_matches(link, keywords)))
}

fn link_matches(link: &ElementRef<'_>, keywords: &[&str]) -> bool {
    let href = link.value().attr("href").unwrap_or_default().to_lowercase();
    let text = element_text(link).to_lowercase();
    keywords
        .iter()
        .any(|keyword| href.contains(keyword) || text.contains(keyword))
}

fn privacy_policy(document: &Document) -> Result<Verdict, CheckError> {
    Ok(if has_keyword_link(document, PRIVACY_KEYWORDS)? {
        Verdict::pass("Privacy policy page is linked")
    } else {
        Verdict::fail(
            "No privacy policy link found. A privacy policy is mandatory for ad networks.",
        )
    })
}

fn terms_of_service(document: &Document) -> Result<Verdict, CheckError> {
    Ok(if has_keyword_link(document, TERMS_KEYWORDS)? {
        Verdict::pass("Terms of service page is linked")
    } else {
        Verdict::warn("No terms of service link found")
    })
}

fn about_and_contact(document: &Document) -> Result<Verdict, CheckError> {
    let about = has_keyword_link(document, ABOUT_KEYWORDS)?;
    let contact = has_keyword_link(document, CONTACT_KEYWORDS)?;

    Ok(match (about, contact) {
        (true, true) => Verdict::pass("About and contact pages are linked"),
        (true, false) => Verdict::warn("About page found, but no contact page"),
        (false, true) => Verdict::warn("Contact page found, but no about page"),
        (false, false) => Verdict::fail("Neither an about page nor a contact page is linked"),
    })
}

fn mobile_responsive(document: &Document) -> Result<Verdict, CheckError> {
    let viewport = document
        .attr("meta[name=viewport i]", "content")?
        .unwrap_or_default()
        .to_lowercase();
    let has_viewport = viewport.contains("width=device-width");

    if !has_viewport {
        return Ok(Verdict::fail(
            "No responsive viewport meta tag (width=device-width)",
        ));
    }

    Ok(if has_responsive_styles(document)? {
        Verdict::pass("Viewport is configured and responsive styles were found")
    } else {
        Verdict::warn(
            "Viewport is configured but no responsive styles (media queries) were detected",
        )
    })
}

fn has_responsive_styles(document: &Document) -> Result<bool, CheckError> {
    // 1. @media rules in inline <style> blocks
    let inline_media = document
        .select("style")?
        .iter()
        .any(|style| style.text().any(|chunk| chunk.contains("@media")));
    if inline_media {
        return Ok(true);
    }

    // 2. Stylesheets loaded with a width media query, or a known responsive framework
    let linked = document.select("link[rel~=stylesheet i]")?;
    let media_link = linked.iter().any(|link| {
        link.value()
            .attr("media")
            .is_some_and(|media| media.contains("width"))
    });
    let framework = linked.iter().any(|link| {
        let href = link.value().attr("href").unwrap_or_default().to_lowercase();
        RESPONSIVE_FRAMEWORKS.iter().any(|name| href.contains(name))
    });

    Ok(media_link || framework)
}

fn word_count_verdict(words: usize, scope: &str) -> Verdict {
    if words > 1500 {
        Verdict::pass(format!("Excellent {} volume ({} words)", scope, words))
    } else if words > 800 {
        Verdict::pass(format!("Good {} volume ({} words)", scope, words))
    } else if words > 300 {
        Verdict::warn(format!(
            "Moderate {} volume ({} words); aim for more than 800",
            scope, words
        ))
    } else {
        Verdict::fail(format!(
            "Thin {} ({} words); ad networks reject low-content pages",
            scope, words
        ))
    }
}

fn content_volume(document: &Document) -> Result<Verdict, CheckError> {
    let words = count_words(&document.text()?);
    Ok(word_count_verdict(words, "content"))
}

fn main_content_volume(document: &Document) -> Result<Verdict, CheckError> {
    // First region in priority order wins, even if a later one is longer
    for region in MAIN_CONTENT_REGIONS {
        if let Some(element) = document.first(region)? {
            let words = count_words(&visible_text(element));
            return Ok(word_count_verdict(words, "main content"));
        }
    }

    // No dedicated content region: fall back to the whole body
    let words = count_words(&document.text()?);
    Ok(word_count_verdict(words, "main content"))
}

fn heading_structure(document: &Document) -> Result<Verdict, CheckError> {
    let h1 = document.count("h1")?;
    let total = document.count("h1, h2, h3, h4, h5, h6")?;

    Ok(match (h1, total) {
        // A page without headings has no H1 either, so it lands in the warn tier
        (_, 0) => Verdict::warn("No headings found; add one H1 and H2/H3 sections"),
        (0, _) => Verdict::warn("No H1 heading found"),
        (1, total) if total >= 3 => {
            Verdict::pass(format!("One H1 and {} headings in total", total))
        }
        (1, total) => Verdict::warn(format!(
            "Only {} headings; structure content with H2/H3 sections",
            total
        )),
        (h1, _) => Verdict::warn(format!("{} H1 headings found; use exactly one", h1)),
    })
}

fn image_alt_text(document: &Document) -> Result<Verdict, CheckError> {
    let images = document.select("img")?;
    if images.is_empty() {
        return Ok(Verdict::pass("No images to optimize"));
    }

    let with_alt = images
        .iter()
        .filter(|image| {
            image
                .value()
                .attr("alt")
                .is_some_and(|alt| !alt.trim().is_empty())
        })
        .count();
    let ratio = with_alt as f64 / images.len() as f64;
    let message = format!(
        "{} of {} images have alt text ({:.0}%)",
        with_alt,
        images.len(),
        ratio * 100.0
    );

    Ok(if ratio >= 0.8 {
        Verdict::pass(message)
    } else if ratio >= 0.5 {
        Verdict::warn(message)
    } else {
        Verdict::fail(message)
    })
}

fn language_declaration(document: &Document) -> Result<Verdict, CheckError> {
    Ok(match document.root_attr("lang").map(str::trim) {
        Some(lang) if !lang.is_empty() => Verdict::pass(format!("Language declared ({})", lang)),
        _ => Verdict::fail("No lang attribute on the <html> element"),
    })
}

fn favicon(document: &Document) -> Result<Verdict, CheckError> {
    let found = document
        .select("link[rel~=icon i], link[rel=\"shortcut icon\" i], link[rel=apple-touch-icon i]")?
        .iter()
        .any(|link| {
            link.value()
                .attr("href")
                .is_some_and(|href| !href.trim().is_empty())
        });

    Ok(if found {
        Verdict::pass("Favicon is declared")
    } else {
        Verdict::warn("No favicon link found")
    })
}

fn page_load_speed(elapsed_ms: u64) -> Verdict {
    if elapsed_ms < 3000 {
        Verdict::pass(format!("Page loaded in {}ms", elapsed_ms))
    } else if elapsed_ms < 5000 {
        Verdict::warn(format!("Page loaded in {}ms; aim for under 3 seconds", elapsed_ms))
    } else {
        Verdict::fail(format!("Page took {}ms to load", elapsed_ms))
    }
}

fn error_page(document: &Document) -> Result<Verdict, CheckError> {
    // Collapse whitespace so "Page   not\nfound" still matches
    let text = document.text()?.to_lowercase();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    Ok(match ERROR_PHRASES.iter().find(|phrase| text.contains(*phrase)) {
        Some(phrase) => Verdict::fail(format!(
            "Page looks like an error or placeholder page (\"{}\")",
            phrase
        )),
        None => Verdict::pass("No error-page content detected"),
    })
}

fn social_links(document: &Document) -> Result<Verdict, CheckError> {
    let hosts: Vec<String> = document
        .select("a[href]")?
        .iter()
        .filter_map(|link| link.value().attr("href"))
        // Relative links fail to parse and are skipped: they are never social
        .filter_map(|href| Url::parse(href).ok())
        .filter_map(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_lowercase()))
        .collect();

    let platforms: Vec<&str> = SOCIAL_PLATFORMS
        .iter()
        .filter(|(_, domains)| {
            hosts.iter().any(|host| {
                domains
                    .iter()
                    .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
            })
        })
        .map(|(name, _)| *name)
        .collect();

    Ok(match platforms.len() {
        0 => Verdict::fail("No social media profiles linked"),
        1 => Verdict::warn(format!("One social profile linked ({})", platforms[0])),
        _ => Verdict::pass(format!("Social profiles linked: {}", platforms.join(", "))),
    })
}

fn analytics(document: &Document) -> Result<Verdict, CheckError> {
    let scripts = document.scripts()?.join("\n").to_lowercase();
    Ok(
        match ANALYTICS_SIGNATURES
            .iter()
            .find(|signature| scripts.contains(*signature))
        {
            Some(signature) => Verdict::pass(format!("Analytics detected ({})", signature)),
            None => Verdict::warn("No analytics script detected"),
        },
    )
}

fn ads_txt(probe: &Probe) -> Verdict {
    match probe_body(probe) {
        Ok(body) if has_google_publisher(body) => {
            Verdict::pass("ads.txt lists a Google publisher account")
        }
        Ok(_) => Verdict::warn("ads.txt exists but has no google.com publisher line"),
        Err(reason) => Verdict::warn(format!(
            "ads.txt not found ({}); add it once your publisher account is approved",
            reason
        )),
    }
}

fn structured_data(document: &Document) -> Result<Verdict, CheckError> {
    Ok(if document.exists("script[type=\"application/ld+json\" i]")? {
        Verdict::pass("JSON-LD structured data found")
    } else {
        Verdict::warn("No JSON-LD structured data found")
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{run_checks, Status};
    use super::*;

    fn doc(head: &str, body: &str) -> Document {
        Document::parse(&format!(
            "<!DOCTYPE html><html lang=\"en\"><head>{}</head><body>{}<p>{}</p></body></html>",
            head,
            body,
            words(30)
        ))
        .unwrap()
    }

    fn title_of(len: usize) -> Document {
        doc(&format!("<title>{}</title>", "t".repeat(len)), "")
    }

    #[test]
    fn test_title_boundaries() {
        assert_eq!(title_tag(&title_of(9)).unwrap().status, Status::Fail);
        assert_eq!(title_tag(&title_of(10)).unwrap().status, Status::Pass);
        assert_eq!(title_tag(&title_of(60)).unwrap().status, Status::Pass);
        assert_eq!(title_tag(&title_of(61)).unwrap().status, Status::Warn);
        assert_eq!(title_tag(&doc("", "")).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_meta_description_lengths() {
        let meta = |len: usize| {
            let tag = format!("<meta name=\"description\" content=\"{}\">", "d".repeat(len));
            doc(&tag, "")
        };
        assert_eq!(meta_description(&doc("", "")).unwrap().status, Status::Fail);
        assert_eq!(meta_description(&meta(119)).unwrap().status, Status::Warn);
        assert_eq!(meta_description(&meta(120)).unwrap().status, Status::Pass);
        assert_eq!(meta_description(&meta(160)).unwrap().status, Status::Pass);
        assert_eq!(meta_description(&meta(161)).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_robots_outcomes() {
        let ok = |body: &str| -> Probe {
            Ok(outcome("https://example.com/robots.txt", 200, body, 10))
        };

        let blocked = robots_txt(&ok("User-agent: *\nDisallow: /\n")).unwrap();
        assert_eq!(blocked.status, Status::Fail);

        let sitemap = robots_txt(&ok(
            "User-agent: *\nDisallow:\nSitemap: https://example.com/s.xml",
        ))
        .unwrap();
        assert_eq!(sitemap.status, Status::Pass);

        let plain = robots_txt(&ok("User-agent: *\nDisallow: /private\n")).unwrap();
        assert_eq!(plain.status, Status::Warn);

        let missing: Probe = Ok(outcome("https://example.com/robots.txt", 404, "", 10));
        assert_eq!(robots_txt(&missing).unwrap().status, Status::Warn);

        let unreachable = unreachable("https://example.com/robots.txt");
        assert_eq!(robots_txt(&unreachable).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_navigation_tiers() {
        let nav = |links: usize| {
            let anchors: String = (0..links)
                .map(|i| format!("<a href=\"/p{}\">Page {}</a>", i, i))
                .collect();
            doc("", &format!("<nav>{}</nav>", anchors))
        };
        assert_eq!(navigation(&nav(5)).unwrap().status, Status::Pass);
        assert_eq!(navigation(&nav(3)).unwrap().status, Status::Warn);
        assert_eq!(navigation(&nav(2)).unwrap().status, Status::Fail);
        assert_eq!(navigation(&doc("", "")).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_privacy_link_by_href_or_text() {
        let by_href = doc("", r#"<a href="/legal/privacy-policy">Legal</a>"#);
        let by_text = doc("", r#"<a href="/p/12">Privacy Policy</a>"#);
        let none = doc("", r#"<a href="/blog">Blog</a>"#);
        assert_eq!(privacy_policy(&by_href).unwrap().status, Status::Pass);
        assert_eq!(privacy_policy(&by_text).unwrap().status, Status::Pass);
        assert_eq!(privacy_policy(&none).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_about_and_contact() {
        let both = doc("", r#"<a href="/about">About</a><a href="mailto:hi@example.com">Mail</a>"#);
        let one = doc("", r#"<a href="/about-us">Us</a>"#);
        let none = doc("", r#"<a href="/blog">Blog</a>"#);
        assert_eq!(about_and_contact(&both).unwrap().status, Status::Pass);
        assert_eq!(about_and_contact(&one).unwrap().status, Status::Warn);
        assert_eq!(about_and_contact(&none).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_mobile_responsive() {
        let viewport = r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#;
        let media = "<style>@media (max-width: 600px) { body { margin: 0 } }</style>";
        let full = doc(&format!("{}{}", viewport, media), "");
        let only_viewport = doc(viewport, "");
        assert_eq!(mobile_responsive(&full).unwrap().status, Status::Pass);
        assert_eq!(mobile_responsive(&only_viewport).unwrap().status, Status::Warn);
        assert_eq!(mobile_responsive(&doc("", "")).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_word_count_tiers() {
        assert_eq!(word_count_verdict(1501, "content").status, Status::Pass);
        assert_eq!(word_count_verdict(801, "content").status, Status::Pass);
        assert_eq!(word_count_verdict(800, "content").status, Status::Warn);
        assert_eq!(word_count_verdict(301, "content").status, Status::Warn);
        assert_eq!(word_count_verdict(300, "content").status, Status::Fail);
    }

    #[test]
    fn test_main_content_prefers_article() {
        let page = Document::parse(&format!(
            "<html><head><title>Main content page</title></head><body>\
             <article><p>{}</p></article><footer><p>{}</p></footer></body></html>",
            words(400),
            words(600)
        ))
        .unwrap();
        assert_eq!(main_content_volume(&page).unwrap().status, Status::Warn);
        assert_eq!(content_volume(&page).unwrap().status, Status::Pass);
    }

    #[test]
    fn test_heading_structure() {
        let good = doc("", "<h1>Title</h1><h2>One</h2><h2>Two</h2>");
        let no_h1 = doc("", "<h2>One</h2><h2>Two</h2><h3>Three</h3>");
        let many_h1 = doc("", "<h1>A</h1><h1>B</h1><h2>C</h2>");
        assert_eq!(heading_structure(&good).unwrap().status, Status::Pass);
        assert_eq!(heading_structure(&no_h1).unwrap().status, Status::Warn);
        assert_eq!(heading_structure(&many_h1).unwrap().status, Status::Warn);
        assert_eq!(heading_structure(&doc("", "")).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_page_without_headings_only_warns() {
        let page = Document::parse(&format!(
            "<html><head><title>Plain page without headings</title></head>\
             <body><p>{}</p></body></html>",
            words(50)
        ))
        .unwrap();
        let verdict = heading_structure(&page).unwrap();
        assert_eq!(verdict.status, Status::Warn);
        assert!(verdict.message.contains("No headings"));
    }

    #[test]
    fn test_image_alt_ratio() {
        let images = |with_alt: usize, without: usize| {
            let mut html = String::new();
            for i in 0..with_alt {
                html.push_str(&format!("<img src=\"/a{}.png\" alt=\"Picture {}\">", i, i));
            }
            for i in 0..without {
                html.push_str(&format!("<img src=\"/b{}.png\" alt=\" \">", i));
            }
            doc("", &html)
        };
        assert_eq!(image_alt_text(&images(4, 1)).unwrap().status, Status::Pass);
        assert_eq!(image_alt_text(&images(1, 1)).unwrap().status, Status::Warn);
        assert_eq!(image_alt_text(&images(1, 3)).unwrap().status, Status::Fail);
        assert_eq!(image_alt_text(&doc("", "")).unwrap().status, Status::Pass);
    }

    #[test]
    fn test_language_and_favicon() {
        let no_lang = Document::parse(&format!(
            "<html><head><title>No lang here</title></head><body>{}</body></html>",
            words(30)
        ))
        .unwrap();
        assert_eq!(language_declaration(&no_lang).unwrap().status, Status::Fail);
        assert_eq!(language_declaration(&doc("", "")).unwrap().status, Status::Pass);

        let icon = doc(r#"<link rel="icon" href="/favicon.ico">"#, "");
        let empty_icon = doc(r#"<link rel="icon" href="">"#, "");
        assert_eq!(favicon(&icon).unwrap().status, Status::Pass);
        assert_eq!(favicon(&empty_icon).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_page_load_speed_tiers() {
        assert_eq!(page_load_speed(2999).status, Status::Pass);
        assert_eq!(page_load_speed(3000).status, Status::Warn);
        assert_eq!(page_load_speed(5000).status, Status::Fail);
    }

    #[test]
    fn test_error_page_phrases() {
        let error = doc("", "<h1>404 Not Found</h1>");
        assert_eq!(error_page(&error).unwrap().status, Status::Fail);
        assert_eq!(error_page(&doc("", "<h1>Welcome</h1>")).unwrap().status, Status::Pass);
    }

    #[test]
    fn test_social_platforms_are_counted_once() {
        let two = doc(
            "",
            r#"<a href="https://www.facebook.com/site">FB</a>
               <a href="https://facebook.com/other">FB</a>
               <a href="https://x.com/site">X</a>"#,
        );
        let one = doc("", r#"<a href="https://www.instagram.com/site">IG</a>"#);
        let lookalike = doc("", r#"<a href="https://notfacebook.com/">Nope</a>"#);
        assert_eq!(social_links(&two).unwrap().status, Status::Pass);
        assert_eq!(social_links(&one).unwrap().status, Status::Warn);
        assert_eq!(social_links(&lookalike).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_analytics_signatures() {
        let tag = doc(
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id=G-1"></script>"#,
            "",
        );
        let inline = doc(
            "<script>window.dataLayer = []; function gtag(){dataLayer.push(arguments);}</script>",
            "",
        );
        assert_eq!(analytics(&tag).unwrap().status, Status::Pass);
        assert_eq!(analytics(&inline).unwrap().status, Status::Pass);
        assert_eq!(analytics(&doc("", "")).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_ads_txt_outcomes() {
        let ads = |body: &str| -> Probe {
            Ok(outcome("https://example.com/ads.txt", 200, body, 5))
        };
        let good = ads("google.com, pub-123, DIRECT, f08c47fec0942fa0");
        let other = ads("example.net, 1, DIRECT");
        assert_eq!(ads_txt(&good).status, Status::Pass);
        assert_eq!(ads_txt(&other).status, Status::Warn);
        assert_eq!(ads_txt(&unreachable("https://example.com/ads.txt")).status, Status::Warn);
    }

    #[test]
    fn test_structured_data() {
        let json_ld = doc(r#"<script type="application/ld+json">{"@type":"WebSite"}</script>"#, "");
        assert_eq!(structured_data(&json_ld).unwrap().status, Status::Pass);
        assert_eq!(structured_data(&doc("", "")).unwrap().status, Status::Warn);
    }

    #[test]
    fn test_https_redirect_cases() {
        let document = doc("", "");
        let robots = unreachable("https://example.com/robots.txt");
        let ads = unreachable("https://example.com/ads.txt");
        let verdict = |requested: &str, landed: &str| {
            let page = outcome(landed, 200, "", 10);
            let ctx = CheckContext {
                document: &document,
                page: &page,
                requested_url: requested,
                robots: &robots,
                ads_txt: &ads,
            };
            https_redirect(&ctx).unwrap().status
        };

        assert_eq!(verdict("http://example.com/", "https://www.example.com/"), Status::Pass);
        assert_eq!(verdict("https://example.com/", "https://example.com/"), Status::Pass);
        assert_eq!(verdict("http://example.com/", "https://other.net/"), Status::Warn);
        assert_eq!(verdict("http://example.com/", "http://example.com/"), Status::Fail);
    }

    // Secure page with robots.txt + sitemap, a privacy link, plenty of text and one H1
    #[test]
    fn test_well_prepared_page_passes_core_checks() {
        let body = format!(
            r#"<!DOCTYPE html><html lang="en"><head>
                <title>Example Garden Journal</title>
                <meta name="viewport" content="width=device-width, initial-scale=1">
                <link rel="icon" href="/favicon.ico">
            </head><body>
                <nav>
                    <a href="/">Home</a><a href="/blog">Blog</a><a href="/guides">Guides</a>
                    <a href="/about">About</a><a href="/contact">Contact</a>
                </nav>
                <main><h1>Growing tomatoes</h1><h2>Soil</h2><h2>Water</h2><p>{}</p></main>
                <footer><a href="/privacy">Privacy Policy</a></footer>
            </body></html>"#,
            words(2000)
        );
        let document = Document::parse(&body).unwrap();
        let page = outcome("https://example.com/", 200, &body, 800);
        let robots: Probe = Ok(outcome(
            "https://example.com/robots.txt",
            200,
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n",
            20,
        ));
        let ads = unreachable("https://example.com/ads.txt");
        let ctx = CheckContext {
            document: &document,
            page: &page,
            requested_url: "https://example.com/",
            robots: &robots,
            ads_txt: &ads,
        };

        let results = run_checks(&ctx);
        let status_of = |name: &str| results.iter().find(|r| r.name == name).unwrap().status;

        assert_eq!(status_of("Secure Connection"), Status::Pass);
        assert_eq!(status_of("Robots.txt Configuration"), Status::Pass);
        assert_eq!(status_of("Privacy Policy Page"), Status::Pass);
        assert_eq!(status_of("Content Volume"), Status::Pass);
        assert_eq!(status_of("Heading Structure"), Status::Pass);
        assert_eq!(status_of("Original Content Quality"), Status::Manual);

        // Only minor checks fail, so no penalties apply
        let report = crate::score::score(&results);
        assert!(report.final_score >= 80, "score {}", report.final_score);
        assert!(report.penalties.is_empty());
    }
}
