//! Freeze-time invariant checks. Debug builds panic on a violated
//! invariant; release builds skip the scan.

use crate::model::SourceModel;
use crate::relationship::RelationshipKind;

impl SourceModel {
    pub(crate) fn assert_invariants(&self) {
        if cfg!(not(debug_assertions)) {
            return;
        }
        for method in self.methods() {
            debug_assert!(
                self.get_type(&method.owner_fqn).is_some(),
                "method {} has no containing type {} in the model",
                method.fqn,
                method.owner_fqn
            );
        }
        for field in self.fields() {
            debug_assert!(
                self.get_type(&field.owner_fqn).is_some(),
                "field {} has no containing type {} in the model",
                field.fqn,
                field.owner_fqn
            );
        }
        for rel in self.relationships_of_kind(RelationshipKind::Calls) {
            debug_assert!(
                self.contains_method(&rel.source),
                "call relationship source {} is not an application method",
                rel.source
            );
        }
    }
}
