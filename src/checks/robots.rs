// src/checks/robots.rs
// =============================================================================
// Small parsers for the two auxiliary files we probe.
//
// robots.txt is read as groups: one or more `User-agent` lines followed by
// rules. A group blocks a crawler when it says `Disallow: /` (or `/*`) and
// does not re-open the root with `Allow: /`.
//
// ads.txt lines look like:
//   google.com, pub-1234567890123456, DIRECT, f08c47fec0942fa0
// =============================================================================

/// Crawlers whose exclusion keeps ads from being served.
const MAJOR_CRAWLERS: &[&str] = &[
    "*",
    "googlebot",
    "mediapartners-google",
    "adsbot-google",
    "bingbot",
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RobotsSummary {
    /// Major crawlers (lower-cased) that are disallowed from the whole site.
    pub blocked_agents: Vec<String>,
    pub has_sitemap: bool,
}

#[derive(Default)]
struct Group {
    agents: Vec<String>,
    disallow_all: bool,
    allow_root: bool,
    has_rules: bool,
}

pub fn summarize_robots(body: &str) -> RobotsSummary {
    let mut summary = RobotsSummary::default();
    let mut groups: Vec<Group> = Vec::new();
    let mut current = Group::default();

    for (key, value) in directives(body) {
        match key.as_str() {
            "user-agent" => {
                if current.has_rules {
                    groups.push(std::mem::take(&mut current));
                }
                current.agents.push(value.to_ascii_lowercase());
            }
            "disallow" => {
                current.has_rules = true;
                if value == "/" || value == "/*" {
                    current.disallow_all = true;
                }
            }
            "allow" => {
                current.has_rules = true;
                if value == "/" {
                    current.allow_root = true;
                }
            }
            "sitemap" if !value.is_empty() => summary.has_sitemap = true,
            _ => {}
        }
    }
    groups.push(current);

    for group in groups {
        if !group.disallow_all || group.allow_root {
            continue;
        }
        for agent in group.agents {
            if MAJOR_CRAWLERS.contains(&agent.as_str())
                && !summary.blocked_agents.contains(&agent)
            {
                summary.blocked_agents.push(agent);
            }
        }
    }

    summary
}

/// True when ads.txt authorizes at least one Google publisher account.
pub fn has_google_publisher(body: &str) -> bool {
    body.lines()
        .map(strip_comment)
        .any(|line| {
            let mut fields = line.split(',').map(str::trim);
            let domain = fields.next().unwrap_or_default().to_ascii_lowercase();
            let account = fields.next().unwrap_or_default().to_ascii_lowercase();
            domain == "google.com" && account.starts_with("pub-")
        })
}

// Yields (lower-cased key, trimmed value) for every `key: value` line
fn directives(body: &str) -> impl Iterator<Item = (String, String)> + '_ {
    body.lines().filter_map(|line| {
        let line = strip_comment(line);
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_ascii_lowercase(), value.trim().to_string()))
    })
}

fn strip_comment(line: &str) -> &str {
    let without_comment = match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    };
    without_comment.trim()
}
