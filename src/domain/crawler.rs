//! Social media crawler detection
//!
//! Card links serve meta tags to crawlers and redirect everyone else,
//! so the split is decided by a User-Agent substring match against the
//! known preview-fetching bots.

/// User-agent fragments for social media and search crawlers
const CRAWLER_USER_AGENTS: &[&str] = &[
    "twitterbot",
    "facebookexternalhit",
    "linkedinbot",
    "slackbot",
    "telegrambot",
    "whatsapp",
    "discordbot",
    "pinterest",
    "tumblr",
    "redditbot",
    "embedly",
    "quora link preview",
    "outbrain",
    "rogerbot",
    "showyoubot",
    "slurp",
    "baiduspider",
    "bingbot",
    "googlebot",
    "applebot",
    "yandexbot",
    "duckduckbot",
];

/// Check whether a User-Agent belongs to a known crawler.
///
/// An empty or missing User-Agent is treated as a regular visitor.
pub fn is_crawler(user_agent: &str) -> bool {
    if user_agent.is_empty() {
        return false;
    }

    let ua = user_agent.to_lowercase();
    CRAWLER_USER_AGENTS.iter().any(|bot| ua.contains(bot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers() {
        assert!(is_crawler("Twitterbot/1.0"));
        assert!(is_crawler(
            "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"
        ));
        assert!(is_crawler("Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)"));
        assert!(is_crawler("WhatsApp/2.19.81 A"));
        assert!(is_crawler(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        ));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_crawler("TWITTERBOT/1.0"));
        assert!(is_crawler("SlackBot-LinkExpanding 1.0"));
    }

    #[test]
    fn test_regular_browsers() {
        assert!(!is_crawler(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        ));
        assert!(!is_crawler("curl/8.4.0"));
    }

    #[test]
    fn test_empty_user_agent() {
        assert!(!is_crawler(""));
    }
}
