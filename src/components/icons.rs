//! Social link icon mapping

/// Returns Phosphor icon classes for a social icon name
///
/// Unknown names fall back to a generic link icon.
///
/// # Arguments
///
/// * `icon`: Icon name from site configuration (e.g. `github`)
pub fn social_icon(icon: &str) -> &'static str {
    match icon.to_ascii_lowercase().as_str() {
        "github" => "ph ph-github-logo",
        "gitlab" => "ph ph-gitlab-logo",
        "codeberg" => "ph ph-git-branch",
        "mastodon" => "ph ph-mastodon-logo",
        "discord" => "ph ph-discord-logo",
        "linkedin" => "ph ph-linkedin-logo",
        "youtube" => "ph ph-youtube-logo",
        "x.com" | "twitter" => "ph ph-x-logo",
        "rss" => "ph ph-rss",
        "email" => "ph ph-envelope",
        _ => "ph ph-link",
    }
}
