//! Count reconciler.
//!
//! Terraform counts a replacement as both a destroy and a create, so the
//! declared totals map onto categories as:
//!
//! | bucket  | categories          |
//! |---------|---------------------|
//! | add     | Create + Replace    |
//! | change  | Update              |
//! | destroy | Replace + Destroy   |

use crate::types::{
    Bucket, Buckets, ClassificationIndex, DeclarationRecord, OperationCategory,
    ReconciliationResult,
};

/// Fold classified lines into the three declared buckets.
pub fn actual_buckets(index: &ClassificationIndex) -> Buckets {
    let count = |category| index.count(category) as u64;
    Buckets {
        add: count(OperationCategory::Create) + count(OperationCategory::Replace),
        change: count(OperationCategory::Update),
        destroy: count(OperationCategory::Replace) + count(OperationCategory::Destroy),
    }
}

/// Compare classified lines against the plan's declaration.
///
/// Buckets are checked in order and the first disagreement is reported.
pub fn reconcile(index: &ClassificationIndex, declaration: &DeclarationRecord) -> ReconciliationResult {
    let expected = declaration.buckets();
    let actual = actual_buckets(index);

    for bucket in Bucket::ALL {
        if expected.get(bucket) != actual.get(bucket) {
            log::warn!(
                "{bucket} count mismatch: plan declares {}, found {} lines",
                expected.get(bucket),
                actual.get(bucket)
            );
            return ReconciliationResult::Mismatch {
                bucket,
                expected,
                actual,
            };
        }
    }

    ReconciliationResult::Validated {
        counts: index.counts(),
    }
}
