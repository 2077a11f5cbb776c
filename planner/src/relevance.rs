use crate::keywords::extract_keywords;
use crate::ranges::merge_intervals;
use crate::types::{RelevancePlan, Slice};
use config::PlannerConfig;
use context::Context;
use regex::RegexBuilder;
use tracing::{debug, info, instrument};

/// Locates goal keywords in a context and turns the hits into slices.
#[derive(Debug, Clone, Default)]
pub struct RelevancePlanner {
    config: PlannerConfig,
}

impl RelevancePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Keywords of `goal` and the merged windows around their occurrences.
    ///
    /// Each case-insensitive hit is widened by `window` characters on both
    /// sides, clamped to the text. An empty slice list is a valid result.
    #[instrument(skip(self, ctx, goal), fields(ctx = %ctx.path()))]
    pub fn plan(&self, ctx: &Context, goal: &str, window: usize) -> RelevancePlan {
        let keywords = extract_keywords(goal, self.config.max_keywords);
        let n = ctx.char_len();

        let mut windows = Vec::new();
        for kw in &keywords {
            let Ok(re) = RegexBuilder::new(&regex::escape(kw))
                .case_insensitive(true)
                .build()
            else {
                continue;
            };
            let hits = re
                .find_iter(ctx.text())
                .take(self.config.max_hits_per_keyword);
            let before = windows.len();
            for m in hits {
                let start = ctx.char_offset(m.start());
                let end = ctx.char_offset(m.end());
                windows.push(Slice::new(
                    start.saturating_sub(window),
                    end.saturating_add(window).min(n),
                    kw.as_str(),
                ));
            }
            debug!(kw = %kw, hits = windows.len() - before, "located keyword");
        }

        let slices = merge_intervals(windows);
        info!(
            keywords = keywords.len(),
            slices = slices.len(),
            "relevance plan built"
        );
        RelevancePlan { keywords, slices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::ReadLimits;

    fn ctx(text: &str) -> Context {
        Context::new("t.txt", text.to_string(), ReadLimits::default())
    }

    #[test]
    fn test_hits_are_windowed_and_merged() {
        let text = format!("{}Timeout here{}timeout again{}", "x".repeat(50), "y".repeat(5), "z".repeat(50));
        let plan = RelevancePlanner::default().plan(&ctx(&text), "timeout", 10);

        assert_eq!(plan.keywords, vec!["timeout"]);
        assert_eq!(plan.slices.len(), 1);
        let slice = &plan.slices[0];
        assert_eq!(slice.start, 40);
        assert_eq!(slice.end, 50 + 12 + 5 + 7 + 10);
        assert_eq!(slice.kw, "timeout");
    }

    #[test]
    fn test_windows_clamped_to_text() {
        let plan = RelevancePlanner::default().plan(&ctx("cache miss"), "cache", 1_200);
        assert_eq!(plan.slices, vec![Slice::new(0, 10, "cache")]);
    }

    #[test]
    fn test_distant_hits_stay_separate_and_sorted() {
        let text = format!("alpha{}beta{}alpha", ".".repeat(100), ".".repeat(100));
        let plan = RelevancePlanner::default().plan(&ctx(&text), "beta alpha", 2);

        let starts: Vec<usize> = plan.slices.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 103, 207]);
        for pair in plan.slices.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_hits_per_keyword_bounded() {
        let config = PlannerConfig {
            max_hits_per_keyword: 2,
            ..PlannerConfig::default()
        };
        let text = "err ".repeat(10).replace("err", "error");
        let plan = RelevancePlanner::new(config).plan(&ctx(&text), "error", 0);
        assert_eq!(plan.slices.len(), 2);
    }

    #[test]
    fn test_no_hits_is_empty_plan() {
        let plan = RelevancePlanner::default().plan(&ctx("nothing relevant"), "database", 5);
        assert_eq!(plan.keywords, vec!["database"]);
        assert!(plan.slices.is_empty());
    }

    #[test]
    fn test_offsets_are_characters() {
        let plan = RelevancePlanner::default().plan(&ctx("ééé token"), "token", 0);
        assert_eq!(plan.slices, vec![Slice::new(4, 9, "token")]);
    }

    #[test]
    fn test_huge_window_saturates_to_text() {
        let plan = RelevancePlanner::default().plan(&ctx("xx cache yy"), "cache", usize::MAX);
        assert_eq!(plan.slices, vec![Slice::new(0, 11, "cache")]);
    }
}
