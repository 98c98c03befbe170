//! The order-transform hook boundary.
//!
//! Deployments may configure external logic that rewrites an order draft
//! before submission — remapping skus, splitting stores, or skipping
//! orders entirely. The hook is an untrusted boundary: whatever it
//! returns is validated strictly, and any failure is converted into the
//! engine's own error taxonomy.

use ordsync_protocol::{OrderDraft, OrderInfo};

/// What a transform hook returns: the rewritten draft plus optional
/// textual output to surface on the storefront order.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The rewritten draft.
    pub draft: OrderDraft,
    /// Diagnostic output to attach as an order comment.
    pub output: Option<String>,
}

impl TransformOutcome {
    /// Wraps a draft with no diagnostic output.
    pub fn new(draft: OrderDraft) -> Self {
        Self {
            draft,
            output: None,
        }
    }

    /// Attaches diagnostic output.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// External logic that may rewrite an order draft before submission.
///
/// The hook receives the draft (with product records attached to each
/// item) and the original storefront order. It may mutate the draft,
/// mark individual items or the whole order `skip`, or fail with a
/// message; it must leave the draft structurally valid otherwise.
pub trait OrderTransform: Send + Sync {
    /// Applies the transform. An `Err` marks the order failed-to-submit.
    fn apply(&self, draft: OrderDraft, original: &OrderInfo) -> Result<TransformOutcome, String>;
}
