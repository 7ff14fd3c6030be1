//! Marks the document as transformed, e.g. `<html transformed="self;v=1">`.

use crate::config::TransformedIdentifierConfig;
use crate::dom::Document;
use crate::error::{ErrorCollection, TransformError};
use crate::pipeline::{Transformer, TransformerId};

pub struct TransformedIdentifier {
    value: String,
}

impl TransformedIdentifier {
    pub fn new(config: &TransformedIdentifierConfig) -> Self {
        Self {
            value: config.attribute_value(),
        }
    }
}

impl Transformer for TransformedIdentifier {
    fn id(&self) -> TransformerId {
        TransformerId::TransformedIdentifier
    }

    fn transform(
        &self,
        doc: &mut Document,
        _errors: &mut ErrorCollection,
    ) -> Result<(), TransformError> {
        let root = doc.root();
        doc.set_attr(root, "transformed", self.value.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transform::test_util::{assert_idempotent, page, run};

    #[test]
    fn test_sets_transformed_attribute() {
        let mut doc = page("", "");
        run(
            &TransformedIdentifier::new(&TransformedIdentifierConfig::default()),
            &mut doc,
        );
        assert_eq!(doc.attr(doc.root(), "transformed"), Some("self;v=1"));
    }

    #[test]
    fn test_idempotent() {
        let mut doc = page("", "");
        assert_idempotent(
            &TransformedIdentifier::new(&TransformedIdentifierConfig::default()),
            &mut doc,
        );
    }
}
