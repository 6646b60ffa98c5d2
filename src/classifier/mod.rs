/// Upwelling classifier: a pre-trained model evaluated as a black box.
///
/// The training happens elsewhere. This module only reads the serialized
/// artifact ([`svm::SvmModel`]), keeps it loaded ([`cache::ModelCache`]) and
/// exposes it through [`Classifier`].
pub mod cache;
pub mod svm;

use crate::data::model::{Feature, Label};
use crate::error::Result;

/// A trained model viewed as `predict(vector) -> label`.
pub trait Classifier {
    /// Order in which the model was trained on the features. Vectors passed
    /// to [`Classifier::classify`] must follow it.
    fn feature_order(&self) -> &[Feature];

    fn classify(&self, features: &[f64]) -> Result<Label>;
}
