//! Built-in domain tables.
//!
//! These are the defaults used when no tables file is supplied. Entries are
//! registrable domains, matched exactly.

/// Registrable domains that are never partners.
pub const DENYLIST: &[&str] = &[
    // Directory / portal infrastructure
    "n8n.io",
    "n8n.cloud",
    "partnerpage.io",
    // Social and community platforms
    "x.com",
    "twitter.com",
    "linkedin.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "youtu.be",
    "tiktok.com",
    "reddit.com",
    "github.com",
    "gitlab.com",
    "discord.com",
    "discord.gg",
    "medium.com",
    "producthunt.com",
    // Analytics, tracking and CDN services
    "google.com",
    "goo.gl",
    "googleapis.com",
    "gstatic.com",
    "googletagmanager.com",
    "google-analytics.com",
    "doubleclick.net",
    "hotjar.com",
    "segment.com",
    "cloudflare.com",
    "jsdelivr.net",
    "unpkg.com",
    "cloudfront.net",
    "vimeo.com",
    // Communication and support tools
    "slack.com",
    "intercom.io",
    "zendesk.com",
    "crisp.chat",
    "zoom.us",
    "whatsapp.com",
    "wa.me",
    // Payment, events and calendar SaaS
    "stripe.com",
    "paypal.com",
    "calendly.com",
    "cal.com",
    "eventbrite.com",
    "lu.ma",
    // Generic publishing platforms
    "wordpress.com",
    "substack.com",
    "wix.com",
    "squarespace.com",
    "typeform.com",
    // Cloud and no-code platforms
    "shopify.com",
    "airtable.com",
    "notion.so",
    "webflow.com",
    "zapier.com",
    "make.com",
    "hubspot.com",
    "salesforce.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "bubble.io",
];

/// Observed domain -> canonical domain (alternate registrations of the same company).
pub const DOMAIN_ALIASES: &[(&str, &str)] = &[];

/// Directory slug -> domain, for entries whose profile page resolves wrongly.
pub const SLUG_OVERRIDES: &[(&str, &str)] = &[("bitovi", "bitovi.com")];
