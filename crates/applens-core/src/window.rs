//! Context window management for follow-up conversations.
//!
//! The [`ContextWindow`] selects the longest suffix of a conversation that
//! fits a fixed budget once the system instruction and the pending user
//! message have been accounted for. How much a piece of text "costs" is
//! decided by a [`CostModel`]; character count is the default.

use std::sync::Arc;

use crate::types::ChatMessage;

/// Default budget, in cost units (characters with [`CharCount`]).
pub const DEFAULT_CONTEXT_BUDGET: usize = 60_000;

/// Default characters per token for [`EstimatedTokens`].
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Cost Models
// ─────────────────────────────────────────────────────────────────────────────

/// Measures how much of the budget a piece of text consumes.
pub trait CostModel: Send + Sync + std::fmt::Debug {
    fn cost(&self, text: &str) -> usize;
}

/// Cost is the number of Unicode scalar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCount;

impl CostModel for CharCount {
    fn cost(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Cost is a rough token estimate: characters divided by a fixed ratio,
/// rounded up.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTokens {
    chars_per_token: usize,
}

impl EstimatedTokens {
    /// Create an estimator. A ratio of zero is treated as one.
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for EstimatedTokens {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl CostModel for EstimatedTokens {
    fn cost(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

impl<C: CostModel + ?Sized> CostModel for Arc<C> {
    fn cost(&self, text: &str) -> usize {
        (**self).cost(text)
    }
}

impl<C: CostModel + ?Sized> CostModel for Box<C> {
    fn cost(&self, text: &str) -> usize {
        (**self).cost(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context Window
// ─────────────────────────────────────────────────────────────────────────────

/// Fits conversation history into a fixed budget.
#[derive(Debug, Clone)]
pub struct ContextWindow<C = CharCount> {
    budget: usize,
    cost: C,
}

impl ContextWindow<CharCount> {
    /// Character-counted window with the default budget.
    pub fn new() -> Self {
        Self::with_cost_model(DEFAULT_CONTEXT_BUDGET, CharCount)
    }
}

impl Default for ContextWindow<CharCount> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CostModel> ContextWindow<C> {
    /// Create a window with an explicit budget and cost model.
    pub fn with_cost_model(budget: usize, cost: C) -> Self {
        Self { budget, cost }
    }

    /// Set the budget.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// The total budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Cost of `text` under this window's cost model.
    pub fn cost_of(&self, text: &str) -> usize {
        self.cost.cost(text)
    }

    /// Select the most recent messages that fit alongside `reserved`.
    ///
    /// `reserved` is the text that must accompany the request regardless of
    /// history (system instruction and pending user message). Messages are
    /// taken newest first while the running total stays strictly below the
    /// remaining budget; the first message that does not fit ends the walk,
    /// even if older messages are smaller. The result is a suffix of
    /// `history` in its original order.
    pub fn fit<'a>(&self, history: &'a [ChatMessage], reserved: &str) -> &'a [ChatMessage] {
        let remaining = self.budget.saturating_sub(self.cost.cost(reserved));

        let mut total = 0usize;
        let mut start = history.len();
        for (index, message) in history.iter().enumerate().rev() {
            let cost = self.cost.cost(&message.content);
            if total.saturating_add(cost) >= remaining {
                break;
            }
            total += cost;
            start = index;
        }

        &history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(len: usize) -> ChatMessage {
        ChatMessage::user("x".repeat(len))
    }

    #[test]
    fn test_all_messages_fit() {
        let history = vec![message(40), message(40), message(40)];
        let reserved = "r".repeat(100);

        let window = ContextWindow::new();
        assert_eq!(window.fit(&history, &reserved).len(), 3);
    }

    #[test]
    fn test_oversized_single_message() {
        let history = vec![message(70_000)];
        let window = ContextWindow::new();
        assert!(window.fit(&history, "").is_empty());
    }

    #[test]
    fn test_keeps_newest_suffix() {
        let history = vec![
            ChatMessage::user("a".repeat(50)),
            ChatMessage::model("b".repeat(50)),
            ChatMessage::user("c".repeat(50)),
        ];
        let window = ContextWindow::new().with_budget(130);

        let fitted = window.fit(&history, "0123456789");
        assert_eq!(fitted.len(), 2);
        assert_eq!(fitted[0].content, "b".repeat(50));
        assert_eq!(fitted[1].content, "c".repeat(50));
    }

    #[test]
    fn test_strict_inequality() {
        let history = vec![message(50)];
        // remaining is exactly 50: 0 + 50 < 50 is false
        let window = ContextWindow::new().with_budget(60);
        assert!(window.fit(&history, "0123456789").is_empty());

        let window = ContextWindow::new().with_budget(61);
        assert_eq!(window.fit(&history, "0123456789").len(), 1);
    }

    #[test]
    fn test_oversized_message_stops_walk() {
        let history = vec![message(10), message(500), message(10)];
        let window = ContextWindow::new().with_budget(100);

        let fitted = window.fit(&history, "");
        assert_eq!(fitted.len(), 1);
        assert_eq!(fitted[0].content.len(), 10);
    }

    #[test]
    fn test_reserved_exceeds_budget() {
        let history = vec![message(1)];
        let window = ContextWindow::new().with_budget(10);
        assert!(window.fit(&history, &"r".repeat(20)).is_empty());
    }

    #[test]
    fn test_empty_history() {
        let window = ContextWindow::new();
        assert!(window.fit(&[], "hello").is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let history = vec![ChatMessage::user("é".repeat(40))];
        let window = ContextWindow::new().with_budget(41);
        assert_eq!(window.fit(&history, "").len(), 1);
    }

    #[test]
    fn test_estimated_tokens_admits_more_history() {
        let history = vec![message(400), message(400), message(400)];
        let chars = ContextWindow::new().with_budget(1_000);
        let tokens = ContextWindow::with_cost_model(1_000, EstimatedTokens::default());

        assert_eq!(chars.fit(&history, "").len(), 2);
        assert_eq!(tokens.fit(&history, "").len(), 3);
    }

    #[test]
    fn test_estimated_tokens_cost() {
        let model = EstimatedTokens::new(4);
        assert_eq!(model.cost("hello world"), 3);
        assert_eq!(model.cost(""), 0);
        assert_eq!(EstimatedTokens::new(0).cost("abc"), 3);
    }

    #[test]
    fn test_shared_cost_model() {
        let model: Arc<dyn CostModel> = Arc::new(EstimatedTokens::new(2));
        let window = ContextWindow::with_cost_model(10, model);
        assert_eq!(window.cost_of("abcd"), 2);
    }

    #[test]
    fn test_does_not_mutate_history() {
        let history = vec![message(10), message(20)];
        let before = history.clone();
        let _ = ContextWindow::new().with_budget(25).fit(&history, "");
        assert_eq!(history, before);
    }
}
