//! Name classification
//!
//! Decides whether a folder or job name follows the render layer naming
//! convention and decomposes it into tokens.

use crate::layers::error::{LayerError, Result, TokenRejection};
use crate::layers::tokens::{TokenConfig, DELIMITER};
use std::collections::BTreeSet;
use tracing::warn;

/// Tokens of a valid render layer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTokens {
    pub prefix: String,
    pub role: String,
    pub pass: String,
    /// Every segment except the pass, e.g. `RND_BG` or `RND_BG_MAIN`.
    pub key: String,
}

/// Validate `name` positionally against the allow-lists.
///
/// Rejections are logged at warning level and returned as
/// [`LayerError::InvalidToken`].
pub fn classify(name: &str, tokens: &TokenConfig) -> Result<LayerTokens> {
    let segments: Vec<&str> = name.split(DELIMITER).collect();

    let rejection = if segments.len() < 2 {
        Some(TokenRejection::TooFewSegments)
    } else if !tokens.is_prefix(segments[0]) {
        Some(TokenRejection::UnknownPrefix(segments[0].to_string()))
    } else if !tokens.is_role(segments[1]) {
        Some(TokenRejection::UnknownRole(segments[1].to_string()))
    } else if !tokens.is_pass(segments[segments.len() - 1]) {
        Some(TokenRejection::UnknownPass(segments[segments.len() - 1].to_string()))
    } else {
        None
    };

    if let Some(reason) = rejection {
        warn!(name = %name, reason = %reason, "Invalid render layer found");
        return Err(LayerError::InvalidToken {
            name: name.to_string(),
            reason,
        });
    }

    let (pass, head) = segments
        .split_last()
        .map(|(last, head)| (last.to_string(), head))
        .unwrap_or_default();

    Ok(LayerTokens {
        prefix: segments[0].to_string(),
        role: segments[1].to_string(),
        pass,
        key: head.join("_"),
    })
}

/// Layer keys of every valid name, deduplicated and sorted.
///
/// The order is lexicographic for determinism only; sort by
/// [`TokenConfig::pass_precedence`] where pass priority matters.
pub fn collect_layer_keys<I, S>(names: I, tokens: &TokenConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| classify(name.as_ref(), tokens).ok())
        .map(|layer| layer.key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `{key}_{pass}` for every pass, in precedence order.
pub fn layer_names_for_key(key: &str, tokens: &TokenConfig) -> Vec<String> {
    tokens
        .passes
        .iter()
        .map(|pass| format!("{}{}{}", key, DELIMITER, pass))
        .collect()
}

/// Render layer embedded in a farm job name.
///
/// Job names carry the layer at their end, after the batch name
/// (`LGT_KAF_010_v0026_RND_BG_TECH`); the layer starts at the last
/// occurrence of a valid prefix.
pub fn render_layer_from_job_name<'a>(job_name: &'a str, tokens: &TokenConfig) -> Option<&'a str> {
    tokens
        .prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .filter_map(|prefix| job_name.rfind(prefix.as_str()))
        .max()
        .map(|start| &job_name[start..])
}

/// Check a version folder or batch name against the version prefixes.
pub fn validate_version_token(token: &str, tokens: &TokenConfig) -> Result<()> {
    if tokens.is_valid_version_token(token) {
        return Ok(());
    }
    warn!(version = %token, "Invalid version name");
    Err(LayerError::InvalidToken {
        name: token.to_string(),
        reason: TokenRejection::UnknownVersionPrefix(token.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    #[test]
    fn test_classify_accepts_valid_name() {
        let tokens = TokenConfig::default();
        let layer = classify("RND_BG_TECH", &tokens).unwrap();
        assert_eq!(layer.key, "RND_BG");
        assert_eq!(layer.prefix, "RND");
        assert_eq!(layer.role, "BG");
        assert_eq!(layer.pass, "TECH");
    }

    #[test]
    fn test_classify_keeps_extra_segments_in_key() {
        let tokens = TokenConfig::default();
        let layer = classify("RND_BG_MAIN_BTY", &tokens).unwrap();
        assert_eq!(layer.key, "RND_BG_MAIN");
        assert_eq!(layer.pass, "BTY");
    }

    #[test]
    fn test_classify_rejects_bad_prefix() {
        let tokens = TokenConfig::default();
        let err = classify("XYZ_BG_TECH", &tokens).unwrap_err();
        match err {
            LayerError::InvalidToken { reason, .. } => {
                assert_eq!(reason, TokenRejection::UnknownPrefix("XYZ".to_string()))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_rejects_bad_role_and_pass() {
        let tokens = TokenConfig::default();
        assert!(matches!(
            classify("RND_XX_TECH", &tokens),
            Err(LayerError::InvalidToken { reason: TokenRejection::UnknownRole(_), .. })
        ));
        assert!(matches!(
            classify("RND_BG_RGBA", &tokens),
            Err(LayerError::InvalidToken { reason: TokenRejection::UnknownPass(_), .. })
        ));
        // the role is the last segment here, and it is not a pass
        assert!(matches!(
            classify("RND_BG", &tokens),
            Err(LayerError::InvalidToken { reason: TokenRejection::UnknownPass(_), .. })
        ));
    }

    #[test]
    fn test_short_names_are_rejected_with_warning() {
        let tokens = TokenConfig::default();
        for name in ["", "RND", "BTY", "render"] {
            let (result, logs) = capture_logs(|| classify(name, &tokens));
            assert!(matches!(
                result,
                Err(LayerError::InvalidToken { reason: TokenRejection::TooFewSegments, .. })
            ));
            assert!(logs.contains("WARN"), "missing warning for {name:?}: {logs}");
            assert!(logs.contains("Invalid render layer found"));
        }
    }

    #[test]
    fn test_collect_layer_keys_dedups_and_sorts() {
        let tokens = TokenConfig::default();
        let names = [
            "RND_MG_BTY",
            "RND_FG_CRYPTO",
            "RND_FG_BTY",
            "IGNORE",
            "RND_MG_BAD",
            "XYZ_FG_BTY",
        ];
        assert_eq!(collect_layer_keys(names, &tokens), vec!["RND_FG", "RND_MG"]);
    }

    #[test]
    fn test_layer_names_follow_pass_precedence() {
        let tokens = TokenConfig::default();
        assert_eq!(
            layer_names_for_key("RND_FG", &tokens),
            vec!["RND_FG_CRYPTO", "RND_FG_TECH", "RND_FG_BTY"]
        );
    }

    #[test]
    fn test_render_layer_from_job_name() {
        let tokens = TokenConfig::default();
        assert_eq!(
            render_layer_from_job_name("LGT_KAF_010_v0026_RND_BG_TECH", &tokens),
            Some("RND_BG_TECH")
        );
        assert_eq!(
            render_layer_from_job_name("RND_BG_TECH", &tokens),
            Some("RND_BG_TECH")
        );
        assert_eq!(render_layer_from_job_name("LGT_KAF_010_v0026", &tokens), None);
    }

    #[test]
    fn test_validate_version_token() {
        let tokens = TokenConfig::default();
        assert!(validate_version_token("LGT_KIT_0070_v0019", &tokens).is_ok());
        assert!(validate_version_token("CMP_KIT_0070_v0019", &tokens).is_err());
    }
}
