//! Content filter service.
//!
//! Classifies user-generated content against the admin-owned blocked
//! keyword rules and records one audit entry per call that matched.

use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use tradepost_common::{AppResult, IdGenerator};
use tradepost_db::entities::blocked_keyword::{self, PatternType, Severity};
use tradepost_db::entities::content_filter_log::{self, ContentType, FilterAction};
use tradepost_db::repositories::{FilterLogRepository, KeywordRepository};
use validator::Validate;

/// Maximum length of the audit log content preview.
const PREVIEW_LENGTH: usize = 200;

/// Message returned to callers whose content was blocked.
pub const BLOCKED_MESSAGE: &str =
    "Your content contains inappropriate language and cannot be posted.";

/// Message returned to callers whose content was flagged but allowed.
pub const WARNED_MESSAGE: &str = "Your content may contain inappropriate language.";

/// Input for a content filter check.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckContentInput {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub content_type: ContentType,
    pub content_id: Option<String>,
}

/// A single rule that matched during evaluation.
#[derive(Debug, Clone)]
pub struct MatchedKeyword {
    /// ID of the matching rule.
    pub keyword_id: String,
    /// The rule's keyword text.
    pub keyword: String,
    pub severity: Severity,
}

/// Result of evaluating content against the rule set.
#[derive(Debug, Clone)]
pub struct FilterVerdict {
    /// Whether the content may be posted. Always the inverse of `blocked`.
    pub allowed: bool,
    /// At least one block-severity rule matched.
    pub blocked: bool,
    /// At least one warning-severity rule matched and no block did.
    pub warned: bool,
    /// Every rule that matched, in rule-iteration order.
    pub matched: Vec<MatchedKeyword>,
}

impl FilterVerdict {
    /// The user-facing message for this verdict, if any.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        if self.blocked {
            Some(BLOCKED_MESSAGE)
        } else if self.warned {
            Some(WARNED_MESSAGE)
        } else {
            None
        }
    }
}

/// Lowercase, trim, and collapse whitespace runs to single spaces.
///
/// This is the comparison form for `exact` and `contains` matching.
/// Regex rules run against the original content instead, so patterns
/// sensitive to the original formatting keep working.
#[must_use]
pub fn normalize(content: &str) -> String {
    content
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn rule_matches(rule: &blocked_keyword::Model, original: &str, normalized: &str) -> bool {
    match rule.pattern_type {
        PatternType::Exact => *normalized == normalize(&rule.keyword),
        PatternType::Contains => normalized.contains(&normalize(&rule.keyword)),
        PatternType::Regex => match Regex::new(&format!("(?i){}", rule.keyword)) {
            Ok(re) => re.is_match(original),
            Err(e) => {
                // Bad patterns degrade to substring matching rather than
                // failing the request. Logged so the authoring mistake is
                // visible to operators.
                tracing::warn!(
                    keyword_id = %rule.id,
                    error = %e,
                    "Invalid regex in blocked keyword, falling back to contains"
                );
                normalized.contains(&normalize(&rule.keyword))
            }
        },
    }
}

/// Evaluate content against a rule set.
///
/// Pure classification: only `enabled` rules participate, and a single
/// block-severity match overrides any number of warnings.
#[must_use]
pub fn evaluate(content: &str, rules: &[blocked_keyword::Model]) -> FilterVerdict {
    let normalized = normalize(content);

    let matched: Vec<MatchedKeyword> = rules
        .iter()
        .filter(|rule| rule.enabled)
        .filter(|rule| rule_matches(rule, content, &normalized))
        .map(|rule| MatchedKeyword {
            keyword_id: rule.id.clone(),
            keyword: rule.keyword.clone(),
            severity: rule.severity,
        })
        .collect();

    let blocked = matched.iter().any(|m| m.severity == Severity::Block);
    let warned = !blocked && matched.iter().any(|m| m.severity == Severity::Warning);

    FilterVerdict {
        allowed: !blocked,
        blocked,
        warned,
        matched,
    }
}

/// Service wrapping rule loading, evaluation, and the audit side effect.
#[derive(Clone)]
pub struct ContentFilterService {
    keyword_repo: KeywordRepository,
    filter_log_repo: FilterLogRepository,
    id_gen: IdGenerator,
}

impl ContentFilterService {
    /// Create a new content filter service.
    #[must_use]
    pub const fn new(keyword_repo: KeywordRepository, filter_log_repo: FilterLogRepository) -> Self {
        Self {
            keyword_repo,
            filter_log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Check content for a user, writing exactly one audit entry when at
    /// least one rule matched.
    ///
    /// The entry references the *first* matched rule in rule-iteration
    /// order even when several rules matched. No entry is written for
    /// clean content.
    pub async fn check_content(
        &self,
        user_id: &str,
        input: CheckContentInput,
    ) -> AppResult<FilterVerdict> {
        input.validate()?;

        let rules = self.keyword_repo.find_enabled().await?;
        let verdict = evaluate(&input.content, &rules);

        if let Some(first) = verdict.matched.first() {
            let action = if verdict.blocked {
                FilterAction::Blocked
            } else {
                FilterAction::Warned
            };

            let preview: String = input.content.chars().take(PREVIEW_LENGTH).collect();
            let entry = content_filter_log::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                content_type: Set(input.content_type),
                content_id: Set(input.content_id),
                matched_keyword_id: Set(first.keyword_id.clone()),
                action_taken: Set(action),
                content_preview: Set(preview),
                created_at: Set(chrono::Utc::now().into()),
            };

            // The verdict stands even if the audit insert fails; the user
            // must not be able to post blocked content just because the
            // log write hit a transient error.
            if let Err(e) = self.filter_log_repo.create(entry).await {
                tracing::error!(user_id, error = %e, "Failed to write content filter log entry");
            }
        }

        Ok(verdict)
    }

    /// Page through a user's filter history, newest first, with the
    /// total number of entries on record.
    pub async fn filter_history(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<content_filter_log::Model>, u64)> {
        let entries = self
            .filter_log_repo
            .find_by_user(user_id, limit, offset)
            .await?;
        let total = self.filter_log_repo.count_by_user(user_id).await?;

        Ok((entries, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rule(
        id: &str,
        keyword: &str,
        pattern_type: PatternType,
        severity: Severity,
        enabled: bool,
    ) -> blocked_keyword::Model {
        blocked_keyword::Model {
            id: id.to_string(),
            keyword: keyword.to_string(),
            pattern_type,
            severity,
            enabled,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Fake   ROLEX\twatches "), "fake rolex watches");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_clean_content_is_allowed() {
        let rules = vec![rule("kw1", "scam", PatternType::Contains, Severity::Block, true)];
        let verdict = evaluate("a perfectly honest listing", &rules);

        assert!(verdict.allowed);
        assert!(!verdict.blocked);
        assert!(!verdict.warned);
        assert!(verdict.matched.is_empty());
        assert!(verdict.message().is_none());
    }

    #[test]
    fn test_contains_block_match() {
        let rules = vec![rule(
            "kw1",
            "fake rolex",
            PatternType::Contains,
            Severity::Block,
            true,
        )];
        let verdict = evaluate("Selling fake rolex watches", &rules);

        assert!(verdict.blocked);
        assert!(!verdict.allowed);
        assert!(!verdict.warned);
        assert_eq!(verdict.matched.len(), 1);
        assert_eq!(verdict.matched[0].keyword, "fake rolex");
        assert_eq!(verdict.message(), Some(BLOCKED_MESSAGE));
    }

    #[test]
    fn test_exact_match_uses_normalized_forms() {
        let rules = vec![rule("kw1", "  SPAM  ", PatternType::Exact, Severity::Block, true)];

        assert!(evaluate("spam", &rules).blocked);
        assert!(evaluate(" SPAM ", &rules).blocked);
        assert!(!evaluate("spam and eggs", &rules).blocked);
    }

    #[test]
    fn test_block_overrides_warnings() {
        let rules = vec![
            rule("kw1", "cheap", PatternType::Contains, Severity::Warning, true),
            rule("kw2", "replica", PatternType::Contains, Severity::Block, true),
            rule("kw3", "deal", PatternType::Contains, Severity::Warning, true),
        ];
        let verdict = evaluate("cheap replica, great deal", &rules);

        assert!(verdict.blocked);
        assert!(!verdict.warned);
        assert_eq!(verdict.matched.len(), 3);
        // First match in rule-iteration order drives the audit entry.
        assert_eq!(verdict.matched[0].keyword_id, "kw1");
    }

    #[test]
    fn test_warning_only_match() {
        let rules = vec![rule("kw1", "cheap", PatternType::Contains, Severity::Warning, true)];
        let verdict = evaluate("cheap stuff", &rules);

        assert!(verdict.allowed);
        assert!(verdict.warned);
        assert!(!verdict.blocked);
        assert_eq!(verdict.message(), Some(WARNED_MESSAGE));
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let rules = vec![rule("kw1", "scam", PatternType::Contains, Severity::Block, false)];
        let verdict = evaluate("total scam", &rules);

        assert!(verdict.allowed);
        assert!(verdict.matched.is_empty());
    }

    #[test]
    fn test_regex_match_is_case_insensitive_on_original() {
        let rules = vec![rule(
            "kw1",
            r"r[o0]lex",
            PatternType::Regex,
            Severity::Block,
            true,
        )];

        assert!(evaluate("Buy a R0LEX today", &rules).blocked);
        assert!(!evaluate("a regular watch", &rules).blocked);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_contains() {
        // "(" does not compile; the rule degrades to substring matching
        // on the keyword text instead of failing the request.
        let rules = vec![rule("kw1", "(", PatternType::Regex, Severity::Block, true)];

        let verdict = evaluate("weird ( punctuation", &rules);
        assert!(verdict.blocked);

        let clean = evaluate("no parens here", &rules);
        assert!(clean.allowed);
    }

    #[test]
    fn test_whitespace_variants_still_match_contains() {
        let rules = vec![rule(
            "kw1",
            "fake rolex",
            PatternType::Contains,
            Severity::Block,
            true,
        )];

        assert!(evaluate("FAKE    rolex for sale", &rules).blocked);
    }

    #[tokio::test]
    async fn test_filter_history_pages_entries_with_total() {
        let entry = content_filter_log::Model {
            id: "log1".to_string(),
            user_id: "user1".to_string(),
            content_type: ContentType::ItemTitle,
            content_id: None,
            matched_keyword_id: "kw1".to_string(),
            action_taken: FilterAction::Blocked,
            content_preview: "fake rolex".to_string(),
            created_at: Utc::now().into(),
        };
        let db = std::sync::Arc::new(
            sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let service = ContentFilterService::new(
            KeywordRepository::new(std::sync::Arc::clone(&db)),
            FilterLogRepository::new(db),
        );

        let (entries, total) = service.filter_history("user1", 50, 0).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].matched_keyword_id, "kw1");
        assert_eq!(total, 3);
    }
}
