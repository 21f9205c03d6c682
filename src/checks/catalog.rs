// src/checks/catalog.rs
// =============================================================================
// The list of checks, in the order they are reported.
//
// Each entry names a CheckKind; `rules::evaluate` maps the kind to its
// predicate. Manual kinds carry an advisory message instead of a predicate.
// Weights add up to 209 for the automated checks.
// =============================================================================

use super::{Category, CheckError, CheckResult, Status, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    SecureConnection,
    HttpsRedirect,
    TitleTag,
    MetaDescription,
    RobotsTxt,
    Navigation,
    PrivacyPolicy,
    TermsOfService,
    AboutAndContact,
    MobileResponsive,
    ContentVolume,
    HeadingStructure,
    ImageAltText,
    LanguageDeclaration,
    Favicon,
    PageLoadSpeed,
    ErrorPage,
    SocialLinks,
    Analytics,
    AdsTxt,
    StructuredData,
    MainContentVolume,
    ContentOriginality,
    PolicyCompliance,
    UserExperience,
}

impl CheckKind {
    /// Fixed message for checks that need a human reviewer.
    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::ContentOriginality => Some(
                "Review manually: content must be original, substantial and not copied or auto-generated.",
            ),
            Self::PolicyCompliance => Some(
                "Review manually: no prohibited content (adult, violent, copyrighted, illegal) anywhere on the site.",
            ),
            Self::UserExperience => Some(
                "Review manually: the site should be easy to navigate with no broken pages or intrusive pop-ups.",
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CheckSpec {
    pub kind: CheckKind,
    pub name: &'static str,
    pub category: Category,
    pub weight: u32,
    /// A failure here triggers the critical penalty and the score cap.
    pub critical: bool,
}

impl CheckSpec {
    const fn new(kind: CheckKind, name: &'static str, category: Category, weight: u32) -> Self {
        Self {
            kind,
            name,
            category,
            weight,
            critical: false,
        }
    }

    const fn critical(self) -> Self {
        Self {
            critical: true,
            ..self
        }
    }

    const fn manual(kind: CheckKind, name: &'static str, category: Category) -> Self {
        Self::new(kind, name, category, 0)
    }

    // Attaches a rule outcome to this entry; errors become `fail`
    pub(super) fn settle(&self, outcome: Result<Verdict, CheckError>) -> CheckResult {
        let verdict = outcome.unwrap_or_else(|e| {
            tracing::warn!(check = self.name, error = %e, "check could not be evaluated");
            Verdict::fail(format!("Could not evaluate this check: {}", e))
        });

        self.result(verdict.status, verdict.message)
    }

    pub(super) fn manual_result(&self, advisory: &str) -> CheckResult {
        self.result(Status::Manual, advisory.to_string())
    }

    fn result(&self, status: Status, message: String) -> CheckResult {
        CheckResult {
            name: self.name.to_string(),
            category: self.category,
            weight: self.weight,
            status,
            message,
            critical: self.critical,
        }
    }
}

use Category::{Automated, Content, Performance, Structure};
use CheckKind::*;

pub const CATALOG: [CheckSpec; 25] = [
    CheckSpec::new(SecureConnection, "Secure Connection", Automated, 20),
    CheckSpec::new(HttpsRedirect, "HTTPS Redirect", Automated, 15).critical(),
    CheckSpec::new(TitleTag, "SEO Title Tag", Performance, 8),
    CheckSpec::new(MetaDescription, "Meta Description", Performance, 6),
    CheckSpec::new(RobotsTxt, "Robots.txt Configuration", Performance, 12).critical(),
    CheckSpec::new(Navigation, "Navigation Structure", Structure, 10),
    CheckSpec::new(PrivacyPolicy, "Privacy Policy Page", Structure, 25).critical(),
    CheckSpec::new(TermsOfService, "Terms of Service Page", Structure, 8),
    CheckSpec::new(AboutAndContact, "About & Contact", Structure, 12),
    CheckSpec::new(MobileResponsive, "Mobile Responsiveness", Structure, 10),
    CheckSpec::new(ContentVolume, "Content Volume", Content, 20).critical(),
    CheckSpec::new(HeadingStructure, "Heading Structure", Performance, 5),
    CheckSpec::new(ImageAltText, "Image Optimization", Performance, 4),
    CheckSpec::new(LanguageDeclaration, "Language Declaration", Structure, 3),
    CheckSpec::new(Favicon, "Favicon Present", Structure, 2),
    CheckSpec::new(PageLoadSpeed, "Page Load Speed", Performance, 3),
    CheckSpec::new(ErrorPage, "Error Page Detection", Structure, 5),
    CheckSpec::new(SocialLinks, "Social Media Integration", Content, 3),
    CheckSpec::new(Analytics, "Analytics Installed", Performance, 7),
    CheckSpec::new(AdsTxt, "Ads.txt Presence", Automated, 10),
    CheckSpec::new(StructuredData, "Structured Data", Performance, 6),
    CheckSpec::new(MainContentVolume, "Main Content Volume", Content, 15),
    CheckSpec::manual(ContentOriginality, "Original Content Quality", Content),
    CheckSpec::manual(PolicyCompliance, "Content Policy Compliance", Content),
    CheckSpec::manual(UserExperience, "User Experience Quality", Structure),
];
